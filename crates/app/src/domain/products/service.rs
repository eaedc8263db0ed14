//! Products service.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    database::Db,
    domain::products::{
        errors::ProductsServiceError,
        models::{
            FilterSummary, NewProduct, PriceRangeBucket, Product, ProductUpdate, Suggestion,
            SuggestionKind,
        },
        predicate::{self, Comparison, Predicate},
        repository::PgProductsRepository,
        search::{MAX_PAGE_SIZE, Page, SearchSpec},
    },
};

/// Queries shorter than this yield no suggestions.
const MIN_SUGGESTION_QUERY_LEN: usize = 2;

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn search_products(
        &self,
        mut spec: SearchSpec,
    ) -> Result<Page<Product>, ProductsServiceError> {
        // The page-size cap applies regardless of how the spec was built.
        spec.page_size = spec.page_size.min(MAX_PAGE_SIZE);

        spec.validate()?;

        // One predicate value serves both the page query and the count, so
        // pagination metadata always agrees with the returned rows.
        let filter = predicate::build(&spec);

        debug!(?filter, page_index = spec.page_index, "searching products");

        let mut tx = self.db.begin_transaction().await?;

        let total = self.repository.count_products(&mut tx, &filter).await?;

        let items = self
            .repository
            .search_products(
                &mut tx,
                &filter,
                spec.sort,
                i64::from(spec.page_size),
                spec.offset(),
            )
            .await?;

        tx.commit().await?;

        Ok(Page {
            items,
            total,
            page_index: spec.page_index,
            page_size: spec.page_size,
        })
    }

    async fn get_product(&self, id: i64) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let product = self.repository.get_product(&mut tx, id).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        validate_price_and_stock(product.price, product.quantity_in_stock)?;

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_product(&mut tx, &product).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        id: i64,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError> {
        validate_price_and_stock(update.price, update.quantity_in_stock)?;

        let mut tx = self.db.begin_transaction().await?;

        let updated = self.repository.update_product(&mut tx, id, &update).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(&self, id: i64) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_product(&mut tx, id).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn brands(&self) -> Result<Vec<String>, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let brands = self.repository.distinct_brands(&mut tx).await?;

        tx.commit().await?;

        Ok(brands)
    }

    async fn types(&self) -> Result<Vec<String>, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let types = self.repository.distinct_types(&mut tx).await?;

        tx.commit().await?;

        Ok(types)
    }

    async fn filter_summary(&self) -> Result<FilterSummary, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let brands = self.repository.brand_facets(&mut tx).await?;
        let types = self.repository.type_facets(&mut tx).await?;
        let stats = self.repository.catalog_stats(&mut tx).await?;

        tx.commit().await?;

        Ok(FilterSummary {
            brands,
            types,
            price: stats.price,
            total_products: stats.total,
            in_stock_products: stats.in_stock,
        })
    }

    async fn suggestions(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Suggestion>, ProductsServiceError> {
        let query = query.trim();

        if query.chars().count() < MIN_SUGGESTION_QUERY_LEN || limit == 0 {
            return Ok(Vec::new());
        }

        let limit = limit as i64;
        let mut tx = self.db.begin_transaction().await?;

        let names = self
            .repository
            .suggest_names(&mut tx, query, (limit / 2).max(1))
            .await?;

        let brands = self
            .repository
            .suggest_brands(&mut tx, query, (limit / 4).max(1))
            .await?;

        let types = self
            .repository
            .suggest_types(&mut tx, query, (limit / 4).max(1))
            .await?;

        tx.commit().await?;

        let mut suggestions: Vec<Suggestion> = names
            .into_iter()
            .map(|name| Suggestion {
                text: name,
                kind: SuggestionKind::Product,
                count: 1,
            })
            .chain(brands.into_iter().map(|facet| Suggestion {
                text: facet.value,
                kind: SuggestionKind::Brand,
                count: facet.count,
            }))
            .chain(types.into_iter().map(|facet| Suggestion {
                text: facet.value,
                kind: SuggestionKind::Type,
                count: facet.count,
            }))
            .collect();

        suggestions.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.text.cmp(&b.text)));
        suggestions.truncate(limit as usize);

        Ok(suggestions)
    }

    async fn price_ranges(&self) -> Result<Vec<PriceRangeBucket>, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;
        let mut buckets = Vec::new();

        for (key, label, min, max) in PRICE_RANGE_PRESETS {
            let min = Decimal::from(*min);
            let max = max.map(Decimal::from);

            let mut clauses = vec![Predicate::Compare(Comparison::PriceAtLeast(min))];

            if let Some(max) = max {
                clauses.push(Predicate::Compare(Comparison::PriceAtMost(max)));
            }

            let count = self
                .repository
                .count_products(&mut tx, &Predicate::And(clauses))
                .await?;

            if count > 0 {
                buckets.push(PriceRangeBucket {
                    key: (*key).to_owned(),
                    label: (*label).to_owned(),
                    min_price: min,
                    max_price: max,
                    count,
                });
            }
        }

        tx.commit().await?;

        Ok(buckets)
    }
}

const PRICE_RANGE_PRESETS: &[(&str, &str, u32, Option<u32>)] = &[
    ("0-25", "Under €25", 0, Some(25)),
    ("25-50", "€25 - €50", 25, Some(50)),
    ("50-100", "€50 - €100", 50, Some(100)),
    ("100-200", "€100 - €200", 100, Some(200)),
    ("200+", "Over €200", 200, None),
];

fn validate_price_and_stock(price: Decimal, stock: i32) -> Result<(), ProductsServiceError> {
    if price <= Decimal::ZERO {
        return Err(ProductsServiceError::NonPositivePrice);
    }

    if stock < 0 {
        return Err(ProductsServiceError::NegativeStock);
    }

    Ok(())
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Run a paged, filtered, sorted search over the catalog.
    async fn search_products(&self, spec: SearchSpec)
    -> Result<Page<Product>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, id: i64) -> Result<Product, ProductsServiceError>;

    /// Create a new catalog product.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;

    /// Update an existing product.
    async fn update_product(
        &self,
        id: i64,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError>;

    /// Delete a product.
    async fn delete_product(&self, id: i64) -> Result<(), ProductsServiceError>;

    /// Distinct brands, ordered.
    async fn brands(&self) -> Result<Vec<String>, ProductsServiceError>;

    /// Distinct types, ordered.
    async fn types(&self) -> Result<Vec<String>, ProductsServiceError>;

    /// Facets and price statistics for the filter surface.
    async fn filter_summary(&self) -> Result<FilterSummary, ProductsServiceError>;

    /// Search suggestions for a query prefix.
    async fn suggestions(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Suggestion>, ProductsServiceError>;

    /// Predefined price-range buckets with product counts; empty buckets are
    /// omitted.
    async fn price_ranges(&self) -> Result<Vec<PriceRangeBucket>, ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::products::search::{SearchSpecError, SortKey},
        test::TestContext,
    };

    use super::*;

    fn new_product(name: &str, brand: &str, product_type: &str, price: i64, stock: i32) -> NewProduct {
        NewProduct {
            name: name.to_owned(),
            description: format!("{name} description"),
            price: Decimal::from(price),
            picture_url: format!("/images/{}.png", name.to_lowercase().replace(' ', "-")),
            product_type: product_type.to_owned(),
            brand: brand.to_owned(),
            quantity_in_stock: stock,
        }
    }

    async fn seed_catalog(ctx: &TestContext) -> TestResult {
        for product in [
            new_product("Air Max 90", "Nike", "Footwear", 120, 10),
            new_product("Pegasus Trail", "Nike", "Footwear", 90, 0),
            new_product("Nike Cap", "Nike", "Accessories", 20, 5),
            new_product("Ultraboost", "Adidas", "Footwear", 150, 3),
            new_product("Adidas Socks", "Adidas", "Accessories", 10, 50),
            new_product("Trail Backpack", "Osprey", "Gear", 180, 2),
        ] {
            ctx.products.create_product(product).await?;
        }

        Ok(())
    }

    #[tokio::test]
    async fn create_and_get_product_round_trips() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .products
            .create_product(new_product("Air Max 90", "Nike", "Footwear", 120, 10))
            .await?;

        let fetched = ctx.products.get_product(created.id).await?;

        assert_eq!(fetched, created);
        assert_eq!(fetched.price, Decimal::from(120));

        Ok(())
    }

    #[tokio::test]
    async fn get_unknown_product_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.get_product(999_999).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_product_rejects_non_positive_price() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .create_product(new_product("Freebie", "Nike", "Footwear", 0, 1))
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::NonPositivePrice)),
            "expected NonPositivePrice, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_product_reflects_changes() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .products
            .create_product(new_product("Air Max 90", "Nike", "Footwear", 120, 10))
            .await?;

        let updated = ctx
            .products
            .update_product(
                created.id,
                ProductUpdate {
                    name: "Air Max 95".to_owned(),
                    description: created.description.clone(),
                    price: Decimal::from(130),
                    picture_url: created.picture_url.clone(),
                    product_type: created.product_type.clone(),
                    brand: created.brand.clone(),
                    quantity_in_stock: 7,
                },
            )
            .await?;

        assert_eq!(updated.name, "Air Max 95");
        assert_eq!(updated.price, Decimal::from(130));
        assert_eq!(updated.quantity_in_stock, 7);

        Ok(())
    }

    #[tokio::test]
    async fn delete_product_makes_it_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .products
            .create_product(new_product("Air Max 90", "Nike", "Footwear", 120, 10))
            .await?;

        ctx.products.delete_product(created.id).await?;

        let result = ctx.products.get_product(created.id).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound after deletion, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_unknown_product_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.delete_product(999_999).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn unfiltered_search_counts_the_whole_catalog() -> TestResult {
        let ctx = TestContext::new().await;
        seed_catalog(&ctx).await?;

        let page = ctx
            .products
            .search_products(SearchSpec::default().with_page_size(50))
            .await?;

        assert_eq!(page.total, 6);
        assert_eq!(page.items.len(), 6);

        Ok(())
    }

    #[tokio::test]
    async fn pages_partition_the_catalog_without_overlap_or_gap() -> TestResult {
        let ctx = TestContext::new().await;
        seed_catalog(&ctx).await?;

        let mut seen = Vec::new();

        for page_index in 1..=3 {
            let page = ctx
                .products
                .search_products(
                    SearchSpec {
                        page_index,
                        sort: SortKey::PriceAsc,
                        ..SearchSpec::default()
                    }
                    .with_page_size(2),
                )
                .await?;

            assert_eq!(page.total, 6);
            assert_eq!(page.items.len(), 2);

            seen.extend(page.items.into_iter().map(|p| p.id));
        }

        let mut deduped = seen.clone();
        deduped.sort_unstable();
        deduped.dedup();

        assert_eq!(deduped.len(), 6, "pages must cover each product exactly once");

        Ok(())
    }

    #[tokio::test]
    async fn inverted_price_range_is_rejected_before_the_store() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .search_products(SearchSpec {
                min_price: Some(Decimal::from(100)),
                max_price: Some(Decimal::from(50)),
                ..SearchSpec::default()
            })
            .await;

        assert!(
            matches!(
                result,
                Err(ProductsServiceError::Validation(
                    SearchSpecError::InvertedPriceRange
                ))
            ),
            "expected InvertedPriceRange, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn and_search_requires_all_terms() -> TestResult {
        let ctx = TestContext::new().await;
        seed_catalog(&ctx).await?;

        let page = ctx
            .products
            .search_products(SearchSpec {
                search: Some("Nike AND Footwear".to_owned()),
                ..SearchSpec::default()
            })
            .await?;

        assert_eq!(page.total, 2);
        assert!(
            page.items
                .iter()
                .all(|p| p.brand == "Nike" && p.product_type == "Footwear"),
            "all results must match both terms"
        );

        Ok(())
    }

    #[tokio::test]
    async fn or_search_accepts_any_term() -> TestResult {
        let ctx = TestContext::new().await;
        seed_catalog(&ctx).await?;

        let page = ctx
            .products
            .search_products(SearchSpec {
                search: Some("Osprey OR Adidas".to_owned()),
                ..SearchSpec::default()
            })
            .await?;

        assert_eq!(page.total, 3);

        Ok(())
    }

    #[tokio::test]
    async fn structural_filters_narrow_the_results() -> TestResult {
        let ctx = TestContext::new().await;
        seed_catalog(&ctx).await?;

        let page = ctx
            .products
            .search_products(SearchSpec {
                brands: vec!["Nike".to_owned()],
                types: vec!["Footwear".to_owned()],
                min_price: Some(Decimal::from(100)),
                ..SearchSpec::default()
            })
            .await?;

        assert_eq!(page.total, 1);
        assert_eq!(
            page.items.first().map(|p| p.name.as_str()),
            Some("Air Max 90")
        );

        Ok(())
    }

    #[tokio::test]
    async fn in_stock_filter_excludes_sold_out_products() -> TestResult {
        let ctx = TestContext::new().await;
        seed_catalog(&ctx).await?;

        let page = ctx
            .products
            .search_products(SearchSpec {
                types: vec!["Footwear".to_owned()],
                in_stock_only: true,
                ..SearchSpec::default()
            })
            .await?;

        assert_eq!(page.total, 2);
        assert!(
            page.items.iter().all(|p| p.quantity_in_stock > 0),
            "sold-out products must be excluded"
        );

        Ok(())
    }

    #[tokio::test]
    async fn price_sort_orders_ascending() -> TestResult {
        let ctx = TestContext::new().await;
        seed_catalog(&ctx).await?;

        let page = ctx
            .products
            .search_products(
                SearchSpec {
                    sort: SortKey::PriceAsc,
                    ..SearchSpec::default()
                }
                .with_page_size(50),
            )
            .await?;

        let prices: Vec<Decimal> = page.items.iter().map(|p| p.price).collect();
        let mut sorted = prices.clone();
        sorted.sort();

        assert_eq!(prices, sorted, "results must be ordered by price");

        Ok(())
    }

    #[tokio::test]
    async fn newest_sort_returns_latest_ids_first() -> TestResult {
        let ctx = TestContext::new().await;
        seed_catalog(&ctx).await?;

        let page = ctx
            .products
            .search_products(SearchSpec {
                sort: SortKey::Newest,
                ..SearchSpec::default()
            })
            .await?;

        let ids: Vec<i64> = page.items.iter().map(|p| p.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));

        assert_eq!(ids, sorted, "newest sort must order by id descending");

        Ok(())
    }

    #[tokio::test]
    async fn distinct_brands_and_types_are_ordered() -> TestResult {
        let ctx = TestContext::new().await;
        seed_catalog(&ctx).await?;

        let brands = ctx.products.brands().await?;
        let types = ctx.products.types().await?;

        assert_eq!(brands, vec!["Adidas", "Nike", "Osprey"]);
        assert_eq!(types, vec!["Accessories", "Footwear", "Gear"]);

        Ok(())
    }

    #[tokio::test]
    async fn filter_summary_reports_facets_and_price_stats() -> TestResult {
        let ctx = TestContext::new().await;
        seed_catalog(&ctx).await?;

        let summary = ctx.products.filter_summary().await?;

        assert_eq!(summary.total_products, 6);
        assert_eq!(summary.in_stock_products, 5);
        assert_eq!(summary.price.min, Decimal::from(10));
        assert_eq!(summary.price.max, Decimal::from(180));

        let nike = summary
            .brands
            .iter()
            .find(|f| f.value == "Nike")
            .expect("Nike facet present");

        assert_eq!(nike.count, 3);

        Ok(())
    }

    #[tokio::test]
    async fn suggestions_merge_products_brands_and_types() -> TestResult {
        let ctx = TestContext::new().await;
        seed_catalog(&ctx).await?;

        let suggestions = ctx.products.suggestions("nik", 10).await?;

        assert!(
            suggestions
                .iter()
                .any(|s| s.kind == SuggestionKind::Brand && s.text == "Nike"),
            "expected a Nike brand suggestion, got {suggestions:?}"
        );
        assert!(
            suggestions
                .iter()
                .any(|s| s.kind == SuggestionKind::Product && s.text == "Nike Cap"),
            "expected a product suggestion, got {suggestions:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn short_suggestion_queries_yield_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        seed_catalog(&ctx).await?;

        assert!(ctx.products.suggestions("n", 10).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn price_ranges_omit_empty_buckets() -> TestResult {
        let ctx = TestContext::new().await;
        seed_catalog(&ctx).await?;

        let buckets = ctx.products.price_ranges().await?;

        assert!(
            buckets.iter().all(|b| b.count > 0),
            "no empty buckets expected"
        );
        assert!(
            buckets.iter().any(|b| b.key == "0-25"),
            "cheap bucket expected, got {buckets:?}"
        );

        Ok(())
    }
}

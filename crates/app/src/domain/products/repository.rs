//! Products Repository
//!
//! Static statements live in `sql/`; the search path assembles its SQL at
//! runtime because predicates are composed per request.

use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, QueryBuilder, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::products::{
    models::{Facet, NewProduct, PriceStats, Product, ProductUpdate},
    predicate::{Comparison, Predicate},
    search::SortKey,
};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");
const DISTINCT_BRANDS_SQL: &str = include_str!("sql/distinct_brands.sql");
const DISTINCT_TYPES_SQL: &str = include_str!("sql/distinct_types.sql");
const BRAND_FACETS_SQL: &str = include_str!("sql/brand_facets.sql");
const TYPE_FACETS_SQL: &str = include_str!("sql/type_facets.sql");
const PRICE_STATS_SQL: &str = include_str!("sql/price_stats.sql");
const SUGGEST_NAMES_SQL: &str = include_str!("sql/suggest_names.sql");
const SUGGEST_BRANDS_SQL: &str = include_str!("sql/suggest_brands.sql");
const SUGGEST_TYPES_SQL: &str = include_str!("sql/suggest_types.sql");

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, picture_url, product_type, brand, quantity_in_stock";

/// Catalog price statistics plus the product counts reported by the filter
/// surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CatalogStats {
    pub(crate) price: PriceStats,
    pub(crate) total: i64,
    pub(crate) in_stock: i64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn search_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        predicate: &Predicate,
        sort: SortKey,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let mut builder =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE "));

        push_predicate(&mut builder, predicate);

        builder.push(" ORDER BY ");
        builder.push(order_clause(sort));
        builder.push(" LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        builder
            .build_query_as::<Product>()
            .fetch_all(&mut **tx)
            .await
    }

    /// Count the products matching `predicate`, ignoring sort and paging.
    pub(crate) async fn count_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        predicate: &Predicate,
    ) -> Result<i64, sqlx::Error> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM products WHERE ");

        push_predicate(&mut builder, predicate);

        let row = builder.build().fetch_one(&mut **tx).await?;

        row.try_get(0)
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(id)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &NewProduct,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.picture_url)
            .bind(&product.product_type)
            .bind(&product.brand)
            .bind(product.quantity_in_stock)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
        update: &ProductUpdate,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(UPDATE_PRODUCT_SQL)
            .bind(id)
            .bind(&update.name)
            .bind(&update.description)
            .bind(update.price)
            .bind(&update.picture_url)
            .bind(&update.product_type)
            .bind(&update.brand)
            .bind(update.quantity_in_stock)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(id)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn distinct_brands(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows = query(DISTINCT_BRANDS_SQL).fetch_all(&mut **tx).await?;

        rows.iter().map(|row| row.try_get("brand")).collect()
    }

    pub(crate) async fn distinct_types(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows = query(DISTINCT_TYPES_SQL).fetch_all(&mut **tx).await?;

        rows.iter().map(|row| row.try_get("product_type")).collect()
    }

    pub(crate) async fn brand_facets(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Facet>, sqlx::Error> {
        query_as::<Postgres, Facet>(BRAND_FACETS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn type_facets(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Facet>, sqlx::Error> {
        query_as::<Postgres, Facet>(TYPE_FACETS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn catalog_stats(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<CatalogStats, sqlx::Error> {
        let row = query(PRICE_STATS_SQL).fetch_one(&mut **tx).await?;

        Ok(CatalogStats {
            price: PriceStats {
                min: row.try_get("min")?,
                max: row.try_get("max")?,
                avg: row.try_get("avg")?,
            },
            total: row.try_get("total")?,
            in_stock: row.try_get("in_stock")?,
        })
    }

    pub(crate) async fn suggest_names(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        needle: &str,
        limit: i64,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows = query(SUGGEST_NAMES_SQL)
            .bind(like_pattern(needle))
            .bind(limit)
            .fetch_all(&mut **tx)
            .await?;

        rows.iter().map(|row| row.try_get("name")).collect()
    }

    pub(crate) async fn suggest_brands(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        needle: &str,
        limit: i64,
    ) -> Result<Vec<Facet>, sqlx::Error> {
        query_as::<Postgres, Facet>(SUGGEST_BRANDS_SQL)
            .bind(like_pattern(needle))
            .bind(limit)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn suggest_types(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        needle: &str,
        limit: i64,
    ) -> Result<Vec<Facet>, sqlx::Error> {
        query_as::<Postgres, Facet>(SUGGEST_TYPES_SQL)
            .bind(like_pattern(needle))
            .bind(limit)
            .fetch_all(&mut **tx)
            .await
    }
}

/// Translate a predicate tree into a SQL boolean expression.
///
/// Mirrors `Predicate::matches`; any change here must keep the two in
/// agreement.
fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::True => {
            builder.push("TRUE");
        }
        Predicate::And(children) => push_group(builder, children, " AND "),
        Predicate::Or(children) => push_group(builder, children, " OR "),
        Predicate::Compare(comparison) => push_comparison(builder, comparison),
        Predicate::TextContains(needle) => {
            let pattern = like_pattern(needle);

            builder.push("(name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR description ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR brand ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR product_type ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
    }
}

fn push_group(builder: &mut QueryBuilder<'_, Postgres>, children: &[Predicate], joiner: &str) {
    if children.is_empty() {
        builder.push("TRUE");
        return;
    }

    builder.push("(");

    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            builder.push(joiner);
        }

        push_predicate(builder, child);
    }

    builder.push(")");
}

fn push_comparison(builder: &mut QueryBuilder<'_, Postgres>, comparison: &Comparison) {
    match comparison {
        Comparison::BrandIn(brands) => {
            builder.push("brand = ANY(");
            builder.push_bind(brands.clone());
            builder.push(")");
        }
        Comparison::TypeIn(types) => {
            builder.push("product_type = ANY(");
            builder.push_bind(types.clone());
            builder.push(")");
        }
        Comparison::PriceAtLeast(min) => {
            builder.push("price >= ");
            builder.push_bind(*min);
        }
        Comparison::PriceAtMost(max) => {
            builder.push("price <= ");
            builder.push_bind(*max);
        }
        Comparison::InStock => {
            builder.push("quantity_in_stock > 0");
        }
    }
}

/// Wrap a needle for ILIKE, escaping the pattern metacharacters.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    format!("%{escaped}%")
}

/// Secondary `id` ordering keeps pagination stable when the primary sort
/// column has duplicates.
fn order_clause(sort: SortKey) -> &'static str {
    match sort {
        SortKey::PriceAsc => "price ASC, id ASC",
        SortKey::PriceDesc => "price DESC, id ASC",
        SortKey::NameAsc | SortKey::Relevance => "name ASC, id ASC",
        SortKey::NameDesc => "name DESC, id ASC",
        SortKey::BrandAsc => "brand ASC, id ASC",
        SortKey::BrandDesc => "brand DESC, id ASC",
        SortKey::TypeAsc => "product_type ASC, id ASC",
        SortKey::TypeDesc => "product_type DESC, id ASC",
        SortKey::Newest => "id DESC",
        SortKey::Popular => "quantity_in_stock DESC, id ASC",
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get::<Decimal, _>("price")?,
            picture_url: row.try_get("picture_url")?,
            product_type: row.try_get("product_type")?,
            brand: row.try_get("brand")?,
            quantity_in_stock: row.try_get("quantity_in_stock")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Facet {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            value: row.try_get("value")?,
            count: row.try_get("count")?,
        })
    }
}

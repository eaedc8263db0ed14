//! Advanced Product Search Handler

use std::{sync::Arc, time::Instant};

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::products::{
    predicate::search_terms,
    search::{
        DEFAULT_PAGE_SIZE, DEFAULT_SIMILARITY_THRESHOLD, SearchSpec, SortKey, parse_csv,
        parse_price_range,
    },
};

use crate::{
    extensions::*, products::errors::into_status_error, products::handlers::get::ProductResponse,
    state::State,
};

/// The filters the search actually applied, echoed back to the caller.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct FiltersAppliedResponse {
    pub brands: Vec<String>,
    pub types: Vec<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort: Option<String>,
    pub in_stock_only: bool,
}

/// Advanced search response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SearchProductsResponse {
    /// The matching page of products
    pub results: Vec<ProductResponse>,

    /// Total number of matches
    pub total_count: i64,

    /// The requested page index (1-based)
    pub page_index: u32,

    /// The applied page size
    pub page_size: u32,

    /// The extracted search terms
    pub search_terms: Vec<String>,

    /// Server-side execution time in milliseconds
    pub execution_time_ms: u64,

    /// Echo of the applied filters
    pub filters_applied: FiltersAppliedResponse,
}

/// Advanced Product Search Handler
///
/// Extends the product listing with in-stock filtering, a fuzzy toggle and
/// price-range shorthands.
#[endpoint(tags("search"), summary = "Search Products")]
#[allow(clippy::too_many_arguments)]
pub(crate) async fn handler(
    page_index: QueryParam<u32, false>,
    page_size: QueryParam<u32, false>,
    search: QueryParam<String, false>,
    brands: QueryParam<String, false>,
    types: QueryParam<String, false>,
    sort: QueryParam<String, false>,
    min_price: QueryParam<String, false>,
    max_price: QueryParam<String, false>,
    price_range: QueryParam<String, false>,
    in_stock_only: QueryParam<bool, false>,
    fuzzy: QueryParam<bool, false>,
    similarity_threshold: QueryParam<f64, false>,
    depot: &mut Depot,
) -> Result<Json<SearchProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let started = Instant::now();

    let sort = sort.into_inner();

    let mut min_price = min_price.into_decimal("min_price")?;
    let mut max_price = max_price.into_decimal("max_price")?;

    // Price-range shorthands only fill bounds the caller left open.
    if let Some(range) = price_range.into_inner() {
        let (range_min, range_max) = parse_price_range(&range);

        min_price = min_price.or(range_min);
        max_price = max_price.or(range_max);
    }

    let spec = SearchSpec {
        page_index: page_index.into_inner().unwrap_or(1),
        search: search.into_inner(),
        brands: parse_csv(brands.into_inner().as_deref()),
        types: parse_csv(types.into_inner().as_deref()),
        sort: SortKey::parse(sort.as_deref()),
        min_price,
        max_price,
        in_stock_only: in_stock_only.into_inner().unwrap_or(false),
        fuzzy: fuzzy.into_inner().unwrap_or(false),
        similarity_threshold: similarity_threshold
            .into_inner()
            .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD),
        ..SearchSpec::default()
    }
    .with_page_size(page_size.into_inner().unwrap_or(DEFAULT_PAGE_SIZE));

    let terms = search_terms(spec.search.as_deref());

    let filters_applied = FiltersAppliedResponse {
        brands: spec.brands.clone(),
        types: spec.types.clone(),
        min_price: spec.min_price.map(|p| p.to_string()),
        max_price: spec.max_price.map(|p| p.to_string()),
        sort,
        in_stock_only: spec.in_stock_only,
    };

    let page = state
        .app
        .products
        .search_products(spec)
        .await
        .map_err(into_status_error)?;

    let execution_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    tracing::info!(execution_time_ms, total = page.total, "search completed");

    Ok(Json(SearchProductsResponse {
        total_count: page.total,
        page_index: page.page_index,
        page_size: page.page_size,
        results: page.items.into_iter().map(Into::into).collect(),
        search_terms: terms,
        execution_time_ms,
        filters_applied,
    }))
}

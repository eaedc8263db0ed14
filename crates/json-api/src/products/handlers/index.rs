//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::products::search::{
    DEFAULT_PAGE_SIZE, Page, SearchSpec, SortKey, parse_csv,
};

use crate::{
    extensions::*, products::errors::into_status_error, products::handlers::get::ProductResponse,
    state::State,
};

/// One page of products plus pagination metadata.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PagedProductsResponse {
    /// The requested page index (1-based)
    pub page_index: u32,

    /// The applied page size
    pub page_size: u32,

    /// Total number of matching products
    pub count: i64,

    /// Total number of pages
    pub total_pages: i64,

    /// Whether a previous page exists
    pub has_previous: bool,

    /// Whether a next page exists
    pub has_next: bool,

    /// The page of products
    pub data: Vec<ProductResponse>,
}

impl From<Page<storefront_app::domain::products::models::Product>> for PagedProductsResponse {
    fn from(page: Page<storefront_app::domain::products::models::Product>) -> Self {
        PagedProductsResponse {
            page_index: page.page_index,
            page_size: page.page_size,
            count: page.total,
            total_pages: page.total_pages(),
            has_previous: page.has_previous(),
            has_next: page.has_next(),
            data: page.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Product Index Handler
///
/// Returns a paged, filtered, sorted product listing.
#[endpoint(tags("products"), summary = "List Products")]
#[allow(clippy::too_many_arguments)]
pub(crate) async fn handler(
    page_index: QueryParam<u32, false>,
    page_size: QueryParam<u32, false>,
    brands: QueryParam<String, false>,
    types: QueryParam<String, false>,
    sort: QueryParam<String, false>,
    search: QueryParam<String, false>,
    min_price: QueryParam<String, false>,
    max_price: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<PagedProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let spec = SearchSpec {
        page_index: page_index.into_inner().unwrap_or(1),
        search: search.into_inner(),
        brands: parse_csv(brands.into_inner().as_deref()),
        types: parse_csv(types.into_inner().as_deref()),
        sort: SortKey::parse(sort.into_inner().as_deref()),
        min_price: min_price.into_decimal("min_price")?,
        max_price: max_price.into_decimal("max_price")?,
        ..SearchSpec::default()
    }
    .with_page_size(page_size.into_inner().unwrap_or(DEFAULT_PAGE_SIZE));

    let page = state
        .app
        .products
        .search_products(spec)
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}

//! Product Filters Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use storefront_app::domain::products::models::{Facet, FilterSummary};

use crate::{extensions::*, state::State};

/// One facet value with its product count
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct FacetResponse {
    pub value: String,
    pub label: String,
    pub count: i64,
}

impl From<Facet> for FacetResponse {
    fn from(facet: Facet) -> Self {
        FacetResponse {
            label: facet.value.clone(),
            value: facet.value,
            count: facet.count,
        }
    }
}

/// Catalog price statistics
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PriceStatsResponse {
    pub min: String,
    pub max: String,
    pub avg: String,
}

/// A selectable sort option
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SortOptionResponse {
    pub value: String,
    pub label: String,
}

/// Everything the filter sidebar needs in one response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct FiltersResponse {
    pub brands: Vec<FacetResponse>,
    pub types: Vec<FacetResponse>,
    pub price_stats: PriceStatsResponse,
    pub total_products: i64,
    pub in_stock_products: i64,
    pub sort_options: Vec<SortOptionResponse>,
}

const SORT_OPTIONS: &[(&str, &str)] = &[
    ("relevance", "Relevance"),
    ("priceasc", "Price: low to high"),
    ("pricedesc", "Price: high to low"),
    ("nameasc", "Name: A-Z"),
    ("namedesc", "Name: Z-A"),
    ("brandasc", "Brand: A-Z"),
    ("branddesc", "Brand: Z-A"),
    ("typeasc", "Type: A-Z"),
    ("typedesc", "Type: Z-A"),
    ("newest", "Newest"),
    ("popular", "Most popular"),
];

impl From<FilterSummary> for FiltersResponse {
    fn from(summary: FilterSummary) -> Self {
        FiltersResponse {
            brands: summary.brands.into_iter().map(Into::into).collect(),
            types: summary.types.into_iter().map(Into::into).collect(),
            price_stats: PriceStatsResponse {
                min: summary.price.min.to_string(),
                max: summary.price.max.to_string(),
                avg: summary.price.avg.to_string(),
            },
            total_products: summary.total_products,
            in_stock_products: summary.in_stock_products,
            sort_options: SORT_OPTIONS
                .iter()
                .map(|(value, label)| SortOptionResponse {
                    value: (*value).to_owned(),
                    label: (*label).to_owned(),
                })
                .collect(),
        }
    }
}

/// Product Filters Handler
///
/// Returns brand/type facets, price statistics and the sort options.
#[endpoint(tags("products"), summary = "Filter Summary")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<FiltersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let summary = state
        .app
        .products
        .filter_summary()
        .await
        .or_500("failed to fetch filter summary")?;

    Ok(Json(summary.into()))
}

//! Price Ranges Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use storefront_app::domain::products::models::PriceRangeBucket;

use crate::{extensions::*, state::State};

/// One predefined price range with its product count
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PriceRangeResponse {
    /// The shorthand key, e.g. `25-50`
    pub key: String,

    /// Human-readable label
    pub label: String,

    /// Lower bound as a decimal string
    pub min_price: String,

    /// Upper bound as a decimal string; open-ended when absent
    pub max_price: Option<String>,

    /// Number of products inside the range
    pub count: i64,
}

impl From<PriceRangeBucket> for PriceRangeResponse {
    fn from(bucket: PriceRangeBucket) -> Self {
        PriceRangeResponse {
            key: bucket.key,
            label: bucket.label,
            min_price: bucket.min_price.to_string(),
            max_price: bucket.max_price.map(|p| p.to_string()),
            count: bucket.count,
        }
    }
}

/// Price ranges response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PriceRangesResponse {
    pub price_ranges: Vec<PriceRangeResponse>,
}

/// Price Ranges Handler
///
/// Returns the predefined price-range buckets that contain products.
#[endpoint(tags("search"), summary = "Price Ranges")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<PriceRangesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let buckets = state
        .app
        .products
        .price_ranges()
        .await
        .or_500("failed to fetch price ranges")?;

    Ok(Json(PriceRangesResponse {
        price_ranges: buckets.into_iter().map(Into::into).collect(),
    }))
}

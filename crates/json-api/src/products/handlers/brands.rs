//! Product Brands Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State};

/// Distinct product brands
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BrandsResponse {
    /// The list of brands, ordered
    pub brands: Vec<String>,
}

/// Product Brands Handler
#[endpoint(tags("products"), summary = "List Brands")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<BrandsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let brands = state
        .app
        .products
        .brands()
        .await
        .or_500("failed to fetch brands")?;

    Ok(Json(BrandsResponse { brands }))
}

//! Apply Discount Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    carts::errors::into_status_error, carts::handlers::get::CartResponse, extensions::*,
    state::State,
};

/// Apply Discount Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ApplyDiscountRequest {
    /// The discount code to apply
    pub code: String,
}

/// Apply Discount Handler
///
/// Validates the code against the cart subtotal; on success the discount is
/// attached and persisted, on rejection the stored cart is untouched and a
/// generic invalid-code message is returned.
#[endpoint(tags("carts"), summary = "Apply Discount")]
pub(crate) async fn handler(
    cart: PathParam<String>,
    json: JsonBody<ApplyDiscountRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    if request.code.trim().is_empty() {
        return Err(StatusError::bad_request().brief("Discount code is required"));
    }

    let updated = state
        .app
        .carts
        .apply_discount(&cart.into_inner(), request.code.trim())
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}

//! Update Cart Item Handler

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

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// The new quantity (≥ 1)
    pub quantity: u32,
}

/// Update Cart Item Handler
///
/// Overwrites the quantity of an existing cart line.
#[endpoint(tags("carts"), summary = "Update Cart Item")]
pub(crate) async fn handler(
    cart: PathParam<String>,
    product: PathParam<i64>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    if request.quantity < 1 {
        return Err(StatusError::bad_request().brief("Quantity must be at least 1"));
    }

    let updated = state
        .app
        .carts
        .update_item_quantity(&cart.into_inner(), product.into_inner(), request.quantity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}

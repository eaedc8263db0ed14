//! Delete Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Delete Cart Handler
///
/// Clears the whole cart. Deleting an absent cart is not an error.
#[endpoint(
    tags("carts"),
    summary = "Delete Cart",
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Cart deleted"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "carts.delete", skip(cart, depot), err)]
pub(crate) async fn handler(
    cart: PathParam<String>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let cart = cart.into_inner();

    let deleted = state
        .app
        .carts
        .delete_cart(&cart)
        .await
        .map_err(into_status_error)?;

    if !deleted {
        info!(cart = %cart, "cart was not found or already deleted");
    }

    Ok(StatusCode::NO_CONTENT)
}

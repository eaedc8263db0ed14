//! Replace Cart Handler

use std::sync::Arc;

use rust_decimal::Decimal;
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::carts::models::{CartItem, ShoppingCart};

use crate::{
    carts::errors::into_status_error, carts::handlers::get::CartResponse, extensions::*,
    state::State,
};

/// Replace Cart Request
///
/// Wholesale overwrite of the cart's items, used for full cart sync. Any
/// previously applied discount is dropped.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReplaceCartRequest {
    /// The cart key; must match the key in the URL
    pub id: String,

    pub items: Vec<ReplaceCartItemRequest>,
}

/// One replacement cart line
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReplaceCartItemRequest {
    pub product_id: i64,
    pub product_name: String,

    /// Unit price as a decimal string
    pub price: String,

    pub quantity: u32,
    pub picture_url: String,
    pub brand: String,

    #[serde(rename = "type")]
    pub product_type: String,
}

/// Replace Cart Handler
#[endpoint(tags("carts"), summary = "Replace Cart")]
pub(crate) async fn handler(
    cart: PathParam<String>,
    json: JsonBody<ReplaceCartRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();
    let cart_id = cart.into_inner();

    if request.id != cart_id {
        return Err(
            StatusError::bad_request().brief("Cart ID in URL does not match cart ID in body")
        );
    }

    let mut replacement = ShoppingCart::new(cart_id);

    for item in request.items {
        if item.quantity < 1 {
            return Err(StatusError::bad_request().brief("Quantity must be at least 1"));
        }

        let price: Decimal = item
            .price
            .parse()
            .or_400("could not parse \"price\" as a decimal")?;

        replacement.merge_item(CartItem {
            product_id: item.product_id,
            product_name: item.product_name,
            price,
            quantity: item.quantity,
            picture_url: item.picture_url,
            brand: item.brand,
            product_type: item.product_type,
        });
    }

    let updated = state
        .app
        .carts
        .replace_cart(replacement)
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}

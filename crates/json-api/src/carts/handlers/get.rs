//! Get Cart Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::{
    carts::models::{CartItem, ShoppingCart},
    discounts::models::{AppliedDiscount, DiscountType},
};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Response
///
/// The derived money fields are computed from the cart's own arithmetic, so
/// they always agree with the values the discount engine validated against.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The cart key
    pub id: String,

    /// The items in the cart
    pub items: Vec<CartItemResponse>,

    /// The applied discount, if any
    pub applied_discount: Option<AppliedDiscountResponse>,

    /// Sum of price × quantity as a decimal string
    pub subtotal: String,

    /// The applied discount amount as a decimal string
    pub discount_amount: String,

    /// Subtotal minus discount as a decimal string
    pub total: String,

    /// Total quantity over all items
    pub total_items: u32,
}

impl From<ShoppingCart> for CartResponse {
    fn from(cart: ShoppingCart) -> Self {
        CartResponse {
            subtotal: cart.subtotal().to_string(),
            discount_amount: cart.discount_amount().to_string(),
            total: cart.total().to_string(),
            total_items: cart.total_items(),
            id: cart.id,
            items: cart.items.into_iter().map(Into::into).collect(),
            applied_discount: cart.discount.map(Into::into),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    pub product_id: i64,
    pub product_name: String,

    /// Unit price captured at add time, as a decimal string
    pub price: String,

    pub quantity: u32,
    pub picture_url: String,
    pub brand: String,

    #[serde(rename = "type")]
    pub product_type: String,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        CartItemResponse {
            product_id: item.product_id,
            product_name: item.product_name,
            price: item.price.to_string(),
            quantity: item.quantity,
            picture_url: item.picture_url,
            brand: item.brand,
            product_type: item.product_type,
        }
    }
}

/// Applied Discount Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AppliedDiscountResponse {
    pub code: String,
    pub name: String,

    /// `Percentage` or `FixedAmount`
    #[serde(rename = "type")]
    pub kind: String,

    /// The nominal discount value as a decimal string
    pub value: String,

    /// The computed discount amount as a decimal string
    pub amount: String,
}

impl From<AppliedDiscount> for AppliedDiscountResponse {
    fn from(discount: AppliedDiscount) -> Self {
        let kind = match discount.kind {
            DiscountType::Percentage => "Percentage",
            DiscountType::FixedAmount => "FixedAmount",
        };

        AppliedDiscountResponse {
            code: discount.code,
            name: discount.name,
            kind: kind.to_owned(),
            value: discount.value.to_string(),
            amount: discount.amount.to_string(),
        }
    }
}

/// Get Cart Handler
///
/// Returns the cart; an absent cart materialises as an empty one.
#[endpoint(tags("carts"), summary = "Get Cart")]
pub(crate) async fn handler(
    cart: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .get_cart(&cart.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

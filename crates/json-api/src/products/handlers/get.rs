//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::products::models::Product;

use crate::{extensions::*, products::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub id: i64,

    /// The product name
    pub name: String,

    /// The product description
    pub description: String,

    /// The price as a decimal string
    pub price: String,

    /// URL of the product picture
    pub picture_url: String,

    /// The product category tag
    #[serde(rename = "type")]
    pub product_type: String,

    /// The product brand
    pub brand: String,

    /// Units currently in stock
    pub quantity_in_stock: i32,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price.to_string(),
            picture_url: product.picture_url,
            product_type: product.product_type,
            brand: product.brand,
            quantity_in_stock: product.quantity_in_stock,
        }
    }
}

/// Get Product Handler
///
/// Returns a product.
#[endpoint(tags("products"), summary = "Get Product")]
pub(crate) async fn handler(
    product: PathParam<i64>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .products
        .get_product(product.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}

//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::products::models::ProductUpdate;

use crate::{
    extensions::*, products::errors::into_status_error, products::handlers::get::ProductResponse,
    state::State,
};

/// Update Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateProductRequest {
    pub name: String,
    pub description: String,

    /// The price as a decimal string
    pub price: String,

    pub picture_url: String,

    #[serde(rename = "type")]
    pub product_type: String,

    pub brand: String,
    pub quantity_in_stock: i32,
}

/// Update Product Handler
#[endpoint(tags("products"), summary = "Update Product")]
pub(crate) async fn handler(
    product: PathParam<i64>,
    json: JsonBody<UpdateProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let price = request
        .price
        .parse()
        .or_400("could not parse \"price\" as a decimal")?;

    let updated = state
        .app
        .products
        .update_product(
            product.into_inner(),
            ProductUpdate {
                name: request.name,
                description: request.description,
                price,
                picture_url: request.picture_url,
                product_type: request.product_type,
                brand: request.brand,
                quantity_in_stock: request.quantity_in_stock,
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}

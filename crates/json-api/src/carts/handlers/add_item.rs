//! Add Cart Item Handler

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

use storefront_app::domain::carts::models::CartItem;

use crate::{
    carts::errors::into_status_error, carts::handlers::get::CartResponse, extensions::*,
    state::State,
};

/// Add Cart Item Request
///
/// Product fields are snapshots: the cart keeps them as sent, without
/// re-reading the catalog.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartItemRequest {
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

/// Add Cart Item Handler
///
/// Adds an item to the cart, incrementing the quantity when the product is
/// already present. The cart is created on first use.
#[endpoint(tags("carts"), summary = "Add Cart Item")]
pub(crate) async fn handler(
    cart: PathParam<String>,
    json: JsonBody<AddCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    if request.quantity < 1 {
        return Err(StatusError::bad_request().brief("Quantity must be at least 1"));
    }

    let price: Decimal = request
        .price
        .parse()
        .or_400("could not parse \"price\" as a decimal")?;

    if price <= Decimal::ZERO {
        return Err(StatusError::bad_request().brief("Price must be greater than 0"));
    }

    let updated = state
        .app
        .carts
        .add_item(
            &cart.into_inner(),
            CartItem {
                product_id: request.product_id,
                product_name: request.product_name,
                price,
                quantity: request.quantity,
                picture_url: request.picture_url,
                brand: request.brand,
                product_type: request.product_type,
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::carts::MockCartsService;

    use crate::test_helpers::{carts_service, make_cart};

    use super::*;

    fn make_service(repo: MockCartsService) -> Service {
        carts_service(repo, Router::with_path("carts/{cart}/items").post(handler))
    }

    fn request_body() -> serde_json::Value {
        json!({
            "product_id": 1,
            "product_name": "Air Max 90",
            "price": "120.00",
            "quantity": 2,
            "picture_url": "/images/air-max-90.png",
            "brand": "Nike",
            "type": "Footwear"
        })
    }

    #[tokio::test]
    async fn test_add_item_returns_updated_cart() -> TestResult {
        let mut repo = MockCartsService::new();

        repo.expect_add_item()
            .once()
            .withf(|id, item| {
                id == "cart-1"
                    && item.product_id == 1
                    && item.quantity == 2
                    && item.price == Decimal::new(12_000, 2)
            })
            .return_once(|id, _| Ok(make_cart(id)));

        let res = TestClient::post("http://example.com/carts/cart-1/items")
            .json(&request_body())
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_zero_quantity_returns_400() -> TestResult {
        let repo = MockCartsService::new();

        let mut body = request_body();
        body["quantity"] = json!(0);

        let res = TestClient::post("http://example.com/carts/cart-1/items")
            .json(&body)
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_malformed_price_returns_400() -> TestResult {
        let repo = MockCartsService::new();

        let mut body = request_body();
        body["price"] = json!("lots");

        let res = TestClient::post("http://example.com/carts/cart-1/items")
            .json(&body)
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}

//! Create Product Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::products::models::NewProduct;

use crate::{
    extensions::*, products::errors::into_status_error, products::handlers::get::ProductResponse,
    state::State,
};

/// Create Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateProductRequest {
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

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let price = request
        .price
        .parse()
        .or_400("could not parse \"price\" as a decimal")?;

    let created = state
        .app
        .products
        .create_product(NewProduct {
            name: request.name,
            description: request.description,
            price,
            picture_url: request.picture_url,
            product_type: request.product_type,
            brand: request.brand,
            quantity_in_stock: request.quantity_in_stock,
        })
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/products/{}", created.id), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(created.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::products::{MockProductsService, ProductsServiceError};

    use crate::test_helpers::{make_product, products_service};

    use super::*;

    fn make_service(repo: MockProductsService) -> Service {
        products_service(repo, Router::with_path("products").post(handler))
    }

    fn request_body() -> serde_json::Value {
        json!({
            "name": "Air Max 90",
            "description": "Classic running shoe",
            "price": "120.00",
            "picture_url": "/images/air-max-90.png",
            "type": "Footwear",
            "brand": "Nike",
            "quantity_in_stock": 10
        })
    }

    #[tokio::test]
    async fn test_create_product_returns_201_with_location() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_create_product()
            .once()
            .withf(|new| new.name == "Air Max 90" && new.brand == "Nike")
            .return_once(|_| Ok(make_product(7)));

        let mut res = TestClient::post("http://example.com/products")
            .json(&request_body())
            .send(&make_service(repo))
            .await;

        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some("/products/7"));

        let body: ProductResponse = res.take_json().await?;

        assert_eq!(body.id, 7);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_rejects_malformed_price() -> TestResult {
        let repo = MockProductsService::new();

        let mut body = request_body();
        body["price"] = json!("twelve");

        let res = TestClient::post("http://example.com/products")
            .json(&body)
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_non_positive_price_returns_400() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_create_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::NonPositivePrice));

        let mut body = request_body();
        body["price"] = json!("0");

        let res = TestClient::post("http://example.com/products")
            .json(&body)
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}

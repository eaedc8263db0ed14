//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    carts::errors::into_status_error, carts::handlers::get::CartResponse, extensions::*,
    state::State,
};

/// Remove Cart Item Handler
///
/// Removes a line from the cart; a missing cart or line is a 404, never a
/// silent no-op.
#[endpoint(tags("carts"), summary = "Remove Cart Item")]
pub(crate) async fn handler(
    cart: PathParam<String>,
    product: PathParam<i64>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let updated = state
        .app
        .carts
        .remove_item(&cart.into_inner(), product.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use storefront_app::domain::carts::{CartsServiceError, MockCartsService};

    use crate::test_helpers::{carts_service, make_cart};

    use super::*;

    fn make_service(repo: MockCartsService) -> Service {
        carts_service(
            repo,
            Router::with_path("carts/{cart}/items/{product}").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_remove_item_returns_updated_cart() -> TestResult {
        let mut repo = MockCartsService::new();

        repo.expect_remove_item()
            .once()
            .withf(|id, product| id == "cart-1" && *product == 1)
            .return_once(|id, _| Ok(make_cart(id)));

        let res = TestClient::delete("http://example.com/carts/cart-1/items/1")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_missing_item_returns_404_not_silent_success() -> TestResult {
        let mut repo = MockCartsService::new();

        repo.expect_remove_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::ItemNotFound));

        let res = TestClient::delete("http://example.com/carts/cart-1/items/99")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_item_from_missing_cart_returns_404() -> TestResult {
        let mut repo = MockCartsService::new();

        repo.expect_remove_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::CartNotFound));

        let res = TestClient::delete("http://example.com/carts/nope/items/1")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}

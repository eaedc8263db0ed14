//! Cart Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use storefront_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::CartNotFound => StatusError::not_found().brief("Cart not found"),
        CartsServiceError::ItemNotFound => {
            StatusError::not_found().brief("Product not found in cart")
        }
        CartsServiceError::DiscountRejected(rejection) => {
            // The precise reason stays in the logs; callers get a generic
            // message.
            warn!("discount rejected: {rejection}");

            StatusError::bad_request().brief("Invalid discount code")
        }
        CartsServiceError::WriteFailed => {
            error!("cart store write failed");

            StatusError::internal_server_error()
        }
        CartsServiceError::Store(source) => {
            error!("cart store error: {source}");

            StatusError::internal_server_error()
        }
    }
}

//! Carts service errors.

use thiserror::Error;

use crate::domain::{carts::store::CartStoreError, discounts::DiscountRejection};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart not found")]
    CartNotFound,

    #[error("item not found in cart")]
    ItemNotFound,

    /// The discount engine declined the code; the reason is for logging, the
    /// stored cart is untouched.
    #[error("discount rejected")]
    DiscountRejected(#[source] DiscountRejection),

    /// The store accepted the write but did not return the stored value.
    #[error("cart store write failed")]
    WriteFailed,

    #[error("cart store error")]
    Store(#[from] CartStoreError),
}

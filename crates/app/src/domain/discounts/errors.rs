//! Discount validation rejections.
//!
//! A rejection is not a hard error: callers surface a generic invalid-code
//! message and the specific reason is only logged.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiscountRejection {
    #[error("discount code not found")]
    NotFound,

    #[error("discount code is not active")]
    Inactive,

    #[error("discount code is outside its validity window")]
    OutOfWindow,

    #[error("subtotal {subtotal} is below the minimum order amount {minimum}")]
    BelowMinimum { minimum: Decimal, subtotal: Decimal },

    #[error("discount code usage limit reached")]
    LimitReached,
}

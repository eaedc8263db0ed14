//! Discount Models

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscountType {
    /// `value` is a percentage of the subtotal.
    Percentage,
    /// `value` is a flat amount.
    FixedAmount,
}

/// An administratively defined discount code.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountCode {
    /// Unique key; matched case-insensitively.
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub kind: DiscountType,
    pub value: Decimal,
    pub min_order_amount: Option<Decimal>,
    pub max_discount_amount: Option<Decimal>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub usage_limit: Option<u32>,
    pub active: bool,
}

/// The snapshot attached to a cart when a code is applied.
///
/// Not a live reference: later changes to the [`DiscountCode`] do not affect
/// carts that already carry the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedDiscount {
    pub code: String,
    pub name: String,
    pub kind: DiscountType,
    pub value: Decimal,
    pub amount: Decimal,
}

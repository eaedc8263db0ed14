//! Discount code domain.

pub mod models;

mod errors;
mod service;

pub use errors::DiscountRejection;
pub use service::{BuiltinDiscountService, DiscountService, MockDiscountService};

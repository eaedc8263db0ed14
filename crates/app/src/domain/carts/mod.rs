//! Shopping cart domain.

pub mod models;
pub mod store;

mod errors;
mod service;

pub use errors::CartsServiceError;
pub use service::{CartsService, MockCartsService, StoreCartsService};

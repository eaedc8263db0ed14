//! Product catalog domain.

pub mod models;
pub mod predicate;
mod repository;
pub mod search;

mod errors;
mod service;

pub use errors::ProductsServiceError;
pub use service::{MockProductsService, PgProductsService, ProductsService};

//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        carts::{CartsService, StoreCartsService, store::RedisCartStore},
        discounts::{BuiltinDiscountService, DiscountService},
        products::{PgProductsService, ProductsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to connect to cart store")]
    CartStore(#[source] redis::RedisError),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub discounts: Arc<dyn DiscountService>,
}

impl AppContext {
    /// Build application context from the database and cart-store URLs.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing either connection fails.
    pub async fn connect(database_url: &str, redis_url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(database_url)
            .await
            .map_err(AppInitError::Database)?;

        let store = RedisCartStore::connect(redis_url, None)
            .await
            .map_err(AppInitError::CartStore)?;

        let discounts: Arc<dyn DiscountService> = Arc::new(BuiltinDiscountService::default());

        Ok(Self {
            products: Arc::new(PgProductsService::new(Db::new(pool))),
            carts: Arc::new(StoreCartsService::new(Arc::new(store), discounts.clone())),
            discounts,
        })
    }
}

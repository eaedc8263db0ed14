//! Cart storage backends.
//!
//! Carts are whole-value JSON blobs in a TTL-backed key-value store. The
//! Redis backend is the production one; the in-memory backend serializes
//! through the same codec so round-trip behaviour is identical.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::carts::models::ShoppingCart;

/// Carts expire 30 days after their last write.
pub const CART_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

#[derive(Debug, Error)]
pub enum CartStoreError {
    #[error("cart store unavailable")]
    Redis(#[from] redis::RedisError),

    #[error("cart serialization failed")]
    Serialization(#[from] serde_json::Error),
}

/// TTL-backed key-value storage for whole carts.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Fetch a cart; missing and expired keys are both absent.
    async fn get(&self, id: &str) -> Result<Option<ShoppingCart>, CartStoreError>;

    /// Store a cart with the full TTL, overwriting any previous value, and
    /// return the freshly stored value (absent when the write did not land).
    async fn set(&self, cart: &ShoppingCart) -> Result<Option<ShoppingCart>, CartStoreError>;

    /// Remove a cart; returns whether a key was actually deleted.
    async fn delete(&self, id: &str) -> Result<bool, CartStoreError>;
}

/// Redis cart store.
pub struct RedisCartStore {
    conn: ConnectionManager,
    key_prefix: String,
}

impl std::fmt::Debug for RedisCartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCartStore")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

impl RedisCartStore {
    /// Connect to Redis.
    ///
    /// # Errors
    ///
    /// Returns an error when the connection cannot be established.
    pub async fn connect(url: &str, key_prefix: Option<&str>) -> Result<Self, redis::RedisError> {
        let client = Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;

        info!(url = %url, "connected to Redis cart store");

        Ok(Self {
            conn,
            key_prefix: key_prefix.unwrap_or("storefront").to_owned(),
        })
    }

    fn cart_key(&self, id: &str) -> String {
        format!("{}:cart:{}", self.key_prefix, id)
    }
}

#[async_trait]
impl CartStore for RedisCartStore {
    async fn get(&self, id: &str) -> Result<Option<ShoppingCart>, CartStoreError> {
        let key = self.cart_key(id);
        let mut conn = self.conn.clone();

        let payload: Option<String> = conn.get(&key).await?;

        payload
            .map(|payload| serde_json::from_str(&payload))
            .transpose()
            .map_err(Into::into)
    }

    async fn set(&self, cart: &ShoppingCart) -> Result<Option<ShoppingCart>, CartStoreError> {
        let key = self.cart_key(&cart.id);
        let mut conn = self.conn.clone();

        let payload = serde_json::to_string(cart)?;
        let _: () = conn.set_ex(&key, payload, CART_TTL.as_secs()).await?;

        debug!(cart = %cart.id, "stored cart");

        self.get(&cart.id).await
    }

    async fn delete(&self, id: &str) -> Result<bool, CartStoreError> {
        let key = self.cart_key(id);
        let mut conn = self.conn.clone();

        let removed: i64 = conn.del(&key).await?;

        debug!(cart = %id, removed, "deleted cart");

        Ok(removed > 0)
    }
}

struct StoredCart {
    payload: String,
    expires_at: Instant,
}

/// In-memory cart store with the same TTL semantics as the Redis backend.
#[derive(Default)]
pub struct MemoryCartStore {
    entries: Mutex<HashMap<String, StoredCart>>,
    ttl: Option<Duration>,
}

impl std::fmt::Debug for MemoryCartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCartStore").finish_non_exhaustive()
    }
}

impl MemoryCartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the TTL; used to exercise expiry without waiting 30 days.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: Some(ttl),
        }
    }

    fn ttl(&self) -> Duration {
        self.ttl.unwrap_or(CART_TTL)
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn get(&self, id: &str) -> Result<Option<ShoppingCart>, CartStoreError> {
        let mut entries = self.entries.lock().await;

        match entries.get(id) {
            None => Ok(None),
            Some(stored) if stored.expires_at <= Instant::now() => {
                entries.remove(id);
                Ok(None)
            }
            Some(stored) => Ok(Some(serde_json::from_str(&stored.payload)?)),
        }
    }

    async fn set(&self, cart: &ShoppingCart) -> Result<Option<ShoppingCart>, CartStoreError> {
        let payload = serde_json::to_string(cart)?;

        let mut entries = self.entries.lock().await;

        entries.insert(
            cart.id.clone(),
            StoredCart {
                payload: payload.clone(),
                expires_at: Instant::now() + self.ttl(),
            },
        );

        Ok(Some(serde_json::from_str(&payload)?))
    }

    async fn delete(&self, id: &str) -> Result<bool, CartStoreError> {
        Ok(self.entries.lock().await.remove(id).is_some())
    }
}

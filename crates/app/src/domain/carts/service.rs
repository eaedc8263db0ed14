//! Carts service.
//!
//! Every operation is a fetch → modify → persist sequence over the cart
//! store. Operations on the same cart id are not isolated against each
//! other: two concurrent writers race and the last write wins.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, info};

use crate::domain::{
    carts::{
        errors::CartsServiceError,
        models::{CartItem, ShoppingCart},
        store::CartStore,
    },
    discounts::DiscountService,
};

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Fetch a cart; an absent cart materialises as an empty one with the
    /// requested id (nothing is persisted until a mutation).
    async fn get_cart(&self, id: &str) -> Result<ShoppingCart, CartsServiceError>;

    /// Wholesale overwrite of a cart.
    async fn replace_cart(&self, cart: ShoppingCart) -> Result<ShoppingCart, CartsServiceError>;

    /// Delete a cart; deleting an absent cart returns `false`, not an error.
    async fn delete_cart(&self, id: &str) -> Result<bool, CartsServiceError>;

    /// Add an item, incrementing the quantity of an existing line for the
    /// same product id.
    async fn add_item(&self, id: &str, item: CartItem)
    -> Result<ShoppingCart, CartsServiceError>;

    /// Overwrite the quantity of an existing line. Callers validate the
    /// quantity (≥ 1) at the boundary.
    async fn update_item_quantity(
        &self,
        id: &str,
        product_id: i64,
        quantity: u32,
    ) -> Result<ShoppingCart, CartsServiceError>;

    /// Remove a line; missing cart or line is a NotFound, never a silent
    /// no-op.
    async fn remove_item(
        &self,
        id: &str,
        product_id: i64,
    ) -> Result<ShoppingCart, CartsServiceError>;

    /// Validate a discount code against the cart subtotal; on success the
    /// snapshot is attached and persisted, on rejection the stored cart is
    /// left untouched.
    async fn apply_discount(&self, id: &str, code: &str)
    -> Result<ShoppingCart, CartsServiceError>;
}

/// Cart service over a key-value [`CartStore`] and the discount engine.
pub struct StoreCartsService {
    store: Arc<dyn CartStore>,
    discounts: Arc<dyn DiscountService>,
}

impl std::fmt::Debug for StoreCartsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCartsService").finish_non_exhaustive()
    }
}

impl StoreCartsService {
    #[must_use]
    pub fn new(store: Arc<dyn CartStore>, discounts: Arc<dyn DiscountService>) -> Self {
        Self { store, discounts }
    }

    async fn persist(&self, cart: ShoppingCart) -> Result<ShoppingCart, CartsServiceError> {
        self.store
            .set(&cart)
            .await?
            .ok_or(CartsServiceError::WriteFailed)
    }
}

#[async_trait]
impl CartsService for StoreCartsService {
    async fn get_cart(&self, id: &str) -> Result<ShoppingCart, CartsServiceError> {
        let cart = self.store.get(id).await?;

        Ok(cart.unwrap_or_else(|| ShoppingCart::new(id)))
    }

    async fn replace_cart(&self, cart: ShoppingCart) -> Result<ShoppingCart, CartsServiceError> {
        info!(cart = %cart.id, items = cart.items.len(), "replacing cart");

        self.persist(cart).await
    }

    async fn delete_cart(&self, id: &str) -> Result<bool, CartsServiceError> {
        let deleted = self.store.delete(id).await?;

        if !deleted {
            debug!(cart = %id, "cart was absent or already deleted");
        }

        Ok(deleted)
    }

    async fn add_item(
        &self,
        id: &str,
        item: CartItem,
    ) -> Result<ShoppingCart, CartsServiceError> {
        let mut cart = self
            .store
            .get(id)
            .await?
            .unwrap_or_else(|| ShoppingCart::new(id));

        debug!(cart = %id, product = item.product_id, quantity = item.quantity, "adding item");

        cart.merge_item(item);

        self.persist(cart).await
    }

    async fn update_item_quantity(
        &self,
        id: &str,
        product_id: i64,
        quantity: u32,
    ) -> Result<ShoppingCart, CartsServiceError> {
        let mut cart = self
            .store
            .get(id)
            .await?
            .ok_or(CartsServiceError::CartNotFound)?;

        let item = cart
            .item_mut(product_id)
            .ok_or(CartsServiceError::ItemNotFound)?;

        item.quantity = quantity;

        self.persist(cart).await
    }

    async fn remove_item(
        &self,
        id: &str,
        product_id: i64,
    ) -> Result<ShoppingCart, CartsServiceError> {
        let mut cart = self
            .store
            .get(id)
            .await?
            .ok_or(CartsServiceError::CartNotFound)?;

        if !cart.remove_item(product_id) {
            return Err(CartsServiceError::ItemNotFound);
        }

        self.persist(cart).await
    }

    async fn apply_discount(
        &self,
        id: &str,
        code: &str,
    ) -> Result<ShoppingCart, CartsServiceError> {
        let mut cart = self
            .store
            .get(id)
            .await?
            .ok_or(CartsServiceError::CartNotFound)?;

        let subtotal = cart.subtotal();

        let applied = self
            .discounts
            .redeem(code, subtotal)
            .await
            .map_err(CartsServiceError::DiscountRejected)?;

        info!(cart = %id, code, amount = %applied.amount, "discount applied");

        cart.discount = Some(applied);

        self.persist(cart).await
    }
}

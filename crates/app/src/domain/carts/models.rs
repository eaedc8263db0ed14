//! Cart Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::discounts::models::AppliedDiscount;

/// One line of a cart.
///
/// Product fields are denormalised: captured from the catalog when the item
/// is added and never re-synchronised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: i64,
    pub product_name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub picture_url: String,
    pub brand: String,
    pub product_type: String,
}

impl CartItem {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A shopping cart, stored whole as one JSON value under its key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingCart {
    pub id: String,

    #[serde(default)]
    pub items: Vec<CartItem>,

    #[serde(default)]
    pub discount: Option<AppliedDiscount>,
}

impl ShoppingCart {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            items: Vec::new(),
            discount: None,
        }
    }

    /// Sum of price × quantity over all items.
    ///
    /// This is the single subtotal formula: discount validation and the
    /// response projection both go through it.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    #[must_use]
    pub fn discount_amount(&self) -> Decimal {
        self.discount
            .as_ref()
            .map_or(Decimal::ZERO, |discount| discount.amount)
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        self.subtotal() - self.discount_amount()
    }

    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Add an item, merging with an existing line for the same product id by
    /// incrementing its quantity.
    pub fn merge_item(&mut self, item: CartItem) {
        if let Some(existing) = self.item_mut(item.product_id) {
            existing.quantity += item.quantity;
        } else {
            self.items.push(item);
        }
    }

    #[must_use]
    pub fn item_mut(&mut self, product_id: i64) -> Option<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|item| item.product_id == product_id)
    }

    /// Remove the line for a product id; returns whether one existed.
    pub fn remove_item(&mut self, product_id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);

        self.items.len() != before
    }
}

//! Product Models

use rust_decimal::Decimal;

/// Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub picture_url: String,
    pub product_type: String,
    pub brand: String,
    pub quantity_in_stock: i32,
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub picture_url: String,
    pub product_type: String,
    pub brand: String,
    pub quantity_in_stock: i32,
}

/// Product Update Model
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub picture_url: String,
    pub product_type: String,
    pub brand: String,
    pub quantity_in_stock: i32,
}

/// One facet bucket of the filter summary (a distinct brand or type and how
/// many products carry it).
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    pub value: String,
    pub count: i64,
}

/// Aggregate price statistics over the whole catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceStats {
    pub min: Decimal,
    pub max: Decimal,
    pub avg: Decimal,
}

/// Brand/type facets plus price statistics, for the filter surface.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSummary {
    pub brands: Vec<Facet>,
    pub types: Vec<Facet>,
    pub price: PriceStats,
    pub total_products: i64,
    pub in_stock_products: i64,
}

/// Kind of a search suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    Product,
    Brand,
    Type,
}

/// A single search suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub text: String,
    pub kind: SuggestionKind,
    pub count: i64,
}

/// A predefined price-range bucket with the number of products inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRangeBucket {
    pub key: String,
    pub label: String,
    pub min_price: Decimal,
    pub max_price: Option<Decimal>,
    pub count: i64,
}

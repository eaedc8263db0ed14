//! Search specification: paging, sorting and filter parameters.

use rust_decimal::Decimal;
use thiserror::Error;

/// Hard upper bound on the page size; caller-supplied values above it are
/// clamped, never rejected.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// Default similarity threshold for the fuzzy matcher.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// A malformed search specification, detected before any store access.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchSpecError {
    #[error("PageIndex must be greater than 0")]
    PageIndex,

    #[error("PageSize must be greater than 0")]
    PageSize,

    #[error("MinPrice cannot be negative")]
    NegativeMinPrice,

    #[error("MaxPrice cannot be negative")]
    NegativeMaxPrice,

    #[error("MinPrice cannot be greater than MaxPrice")]
    InvertedPriceRange,
}

/// Sort order for search results.
///
/// Unrecognised wire keys fall back to [`SortKey::NameAsc`]; the fallback is
/// intentional and mirrors the default ordering of the catalog listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    #[default]
    NameAsc,
    NameDesc,
    BrandAsc,
    BrandDesc,
    TypeAsc,
    TypeDesc,
    /// Highest id first, as a proxy for recency.
    Newest,
    /// Highest stock first, as a proxy for popularity.
    Popular,
    /// No ranking is implemented; orders by name ascending.
    Relevance,
}

impl SortKey {
    /// Parse a wire sort key (case-insensitive).
    #[must_use]
    pub fn parse(key: Option<&str>) -> Self {
        match key.map(str::to_ascii_lowercase).as_deref() {
            Some("priceasc") => Self::PriceAsc,
            Some("pricedesc") => Self::PriceDesc,
            Some("namedesc") => Self::NameDesc,
            Some("brandasc") => Self::BrandAsc,
            Some("branddesc") => Self::BrandDesc,
            Some("typeasc") => Self::TypeAsc,
            Some("typedesc") => Self::TypeDesc,
            Some("newest") => Self::Newest,
            Some("popular") => Self::Popular,
            Some("relevance") => Self::Relevance,
            _ => Self::NameAsc,
        }
    }
}

/// A bundled filter + sort + paging request over the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSpec {
    pub page_index: u32,

    /// Capped at [`MAX_PAGE_SIZE`]; the products service re-applies the cap
    /// on entry, however the spec was built.
    pub page_size: u32,
    pub search: Option<String>,
    pub brands: Vec<String>,
    pub types: Vec<String>,
    pub sort: SortKey,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock_only: bool,
    pub fuzzy: bool,
    pub similarity_threshold: f64,
}

impl Default for SearchSpec {
    fn default() -> Self {
        Self {
            page_index: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            brands: Vec::new(),
            types: Vec::new(),
            sort: SortKey::default(),
            min_price: None,
            max_price: None,
            in_stock_only: false,
            fuzzy: false,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl SearchSpec {
    /// Set the page size, clamping values above [`MAX_PAGE_SIZE`].
    ///
    /// Zero is kept as-is and rejected by [`SearchSpec::validate`].
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.min(MAX_PAGE_SIZE);
        self
    }

    /// Number of items to skip for the requested page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page_size) * (i64::from(self.page_index) - 1)
    }

    /// Check the specification before it reaches the store.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), SearchSpecError> {
        if self.page_index < 1 {
            return Err(SearchSpecError::PageIndex);
        }

        if self.page_size < 1 {
            return Err(SearchSpecError::PageSize);
        }

        if self.min_price.is_some_and(|p| p.is_sign_negative()) {
            return Err(SearchSpecError::NegativeMinPrice);
        }

        if self.max_price.is_some_and(|p| p.is_sign_negative()) {
            return Err(SearchSpecError::NegativeMaxPrice);
        }

        if let (Some(min), Some(max)) = (self.min_price, self.max_price)
            && min > max
        {
            return Err(SearchSpecError::InvertedPriceRange);
        }

        Ok(())
    }
}

/// One page of results plus the pagination metadata needed to navigate.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page_index: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    #[must_use]
    pub fn total_pages(&self) -> i64 {
        let page_size = i64::from(self.page_size.max(1));

        (self.total + page_size - 1) / page_size
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page_index > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        i64::from(self.page_index) < self.total_pages()
    }
}

/// Split a comma-separated filter value into trimmed, non-empty entries.
#[must_use]
pub fn parse_csv(values: Option<&str>) -> Vec<String> {
    values
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse a price-range shorthand into optional bounds.
///
/// Accepts the preset keys (`0-25`, `25-50`, `50-100`, `100-200`, `200-500`,
/// `500+`, `100+`) as well as custom `N-M`, `N+` and `<N` forms. Anything
/// else yields no bounds.
#[must_use]
pub fn parse_price_range(range: &str) -> (Option<Decimal>, Option<Decimal>) {
    let range = range.trim();

    if range.is_empty() {
        return (None, None);
    }

    if let Some(min) = range.strip_suffix('+') {
        return match min.parse::<Decimal>() {
            Ok(min) => (Some(min), None),
            Err(_) => (None, None),
        };
    }

    if let Some(max) = range.strip_prefix('<') {
        return match max.parse::<Decimal>() {
            Ok(max) => (None, Some(max)),
            Err(_) => (None, None),
        };
    }

    if let Some((min, max)) = range.split_once('-')
        && let (Ok(min), Ok(max)) = (min.trim().parse::<Decimal>(), max.trim().parse::<Decimal>())
    {
        return (Some(min), Some(max));
    }

    (None, None)
}

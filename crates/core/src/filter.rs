//! Category/price/discount/stock filters and sorting for product listings.
//!
//! The pipeline applies its stages in a fixed order - category, price range,
//! discount range, stock, then at most one sort - with every stage a no-op
//! when its option is unset. It never raises: malformed numeric bounds are
//! normalized to "unset" up front (see [`parse_bound`]), and an out-of-order
//! range simply yields an empty result.
//!
//! The pipeline consumes an immutable snapshot and returns a new ordered
//! sequence of references; it never mutates the source slice, the category
//! set, or any product record.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::str::FromStr;

use thiserror::Error;

use crate::types::Product;

/// An inclusive numeric range with independently optional bounds.
///
/// An unset bound defaults to `0` (min) or `+infinity` (max).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RangeBounds {
    /// Lower bound, inclusive.
    pub min: Option<f64>,
    /// Upper bound, inclusive.
    pub max: Option<f64>,
}

impl RangeBounds {
    /// Create a range from already-validated bounds.
    #[must_use]
    pub const fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies within the range, inclusive on both ends.
    ///
    /// A min greater than max excludes everything; out-of-order ranges
    /// are treated as empty, not as an error.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        let min = self.min.unwrap_or(0.0);
        let max = self.max.unwrap_or(f64::INFINITY);
        value >= min && value <= max
    }

    /// Whether both bounds are unset, making the range a no-op.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Parse a user-supplied numeric bound.
///
/// This is the single entry point for bound parsing: empty and malformed
/// inputs become `None` ("unset"), and so does a parse that produces `NaN` -
/// a bare `NaN` bound would make every comparison false and silently exclude
/// all records.
#[must_use]
pub fn parse_bound(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Structured filtering criteria for a product listing.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Selected category names; a product matches when its category set
    /// intersects this set. Empty means "all categories".
    pub categories: HashSet<String>,
    /// Range over `price.new_price`.
    pub price_range: Option<RangeBounds>,
    /// Range over `price.percent_discount`.
    pub discount_range: Option<RangeBounds>,
    /// Keep only records with stock remaining.
    pub stock_only: bool,
}

/// Sort orders for a product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Cheapest first, by `price.new_price`.
    PriceAsc,
    /// Most expensive first, by `price.new_price`.
    PriceDesc,
    /// Deepest discount first, by `price.percent_discount`.
    DiscountDesc,
    /// Soonest-expiring offer first, by `timing.end_time`.
    ExpiryAsc,
    /// Largest remaining stock first, by `stock.quantity`.
    StockDesc,
}

/// Error parsing a sort key from its wire string.
#[derive(Debug, Error)]
#[error("unrecognized sort key: {0}")]
pub struct ParseSortKeyError(String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "discount-desc" => Ok(Self::DiscountDesc),
            "expiry-asc" => Ok(Self::ExpiryAsc),
            "stock-desc" => Ok(Self::StockDesc),
            other => Err(ParseSortKeyError(other.to_owned())),
        }
    }
}

impl SortKey {
    /// Comparator between two products for this key.
    ///
    /// Prices and discounts compare via `f64::total_cmp`, so unusual float
    /// values still produce a total order and ties keep their pre-sort
    /// relative position under the stable sort. Records with an absent or
    /// malformed expiry timestamp sort after all dated records.
    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::PriceAsc => a.price.new_price.total_cmp(&b.price.new_price),
            Self::PriceDesc => b.price.new_price.total_cmp(&a.price.new_price),
            Self::DiscountDesc => b.price.percent_discount.total_cmp(&a.price.percent_discount),
            Self::ExpiryAsc => match (a.timing.end_time_utc(), b.timing.end_time_utc()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            Self::StockDesc => b.stock.quantity.cmp(&a.stock.quantity),
        }
    }
}

/// Run the full filter-and-sort pipeline over a product snapshot.
///
/// Returns a new ordered sequence of references into `products`.
#[must_use]
pub fn apply<'a>(
    products: &'a [Product],
    options: &FilterOptions,
    sort: Option<SortKey>,
) -> Vec<&'a Product> {
    let mut result: Vec<&Product> = products
        .iter()
        .filter(|p| matches_categories(p, &options.categories))
        .filter(|p| in_range(options.price_range, p.price.new_price))
        .filter(|p| in_range(options.discount_range, p.price.percent_discount))
        .filter(|p| !options.stock_only || p.in_stock())
        .collect();

    if let Some(key) = sort {
        // slice::sort_by is stable; ties keep filtering order.
        result.sort_by(|a, b| key.compare(a, b));
    }

    result
}

/// Logical OR across the selected categories; empty selection matches all.
fn matches_categories(product: &Product, selected: &HashSet<String>) -> bool {
    selected.is_empty()
        || product
            .categories
            .iter()
            .any(|c| selected.contains(&c.name_da))
}

fn in_range(range: Option<RangeBounds>, value: f64) -> bool {
    range.is_none_or(|r| r.contains(value))
}

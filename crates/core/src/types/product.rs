//! Product wire types.
//!
//! These mirror the backend's JSON shape. The backend omits fields freely,
//! so every nested object deserializes through `#[serde(default)]` rather
//! than failing the whole payload; an absent object behaves like its zero
//! value throughout the pipelines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::Ean;

/// A discounted product inside a store's listing.
///
/// Products are immutable once fetched: the search and filter pipelines only
/// produce new sequences referencing existing records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// European Article Number; the product's identity.
    pub ean: Ean,
    /// Display name (Danish).
    #[serde(default)]
    pub product_name: String,
    /// Categories the product belongs to.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Current and original price plus the server-computed discount.
    #[serde(default)]
    pub price: Price,
    /// Remaining stock at this store.
    #[serde(default)]
    pub stock: Stock,
    /// Offer timing.
    #[serde(default)]
    pub timing: Timing,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Danish category name.
    #[serde(default)]
    pub name_da: String,
}

/// Pricing for a discounted product.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Discounted price.
    #[serde(default)]
    pub new_price: f64,
    /// Price before the discount.
    #[serde(default)]
    pub original_price: f64,
    /// Server-computed percentage reduction.
    #[serde(default)]
    pub percent_discount: f64,
}

/// Stock information.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    /// Units remaining.
    #[serde(default)]
    pub quantity: i64,
}

/// Offer timing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    /// Timestamp string for when the offer ends (RFC 3339).
    #[serde(default)]
    pub end_time: String,
}

impl Timing {
    /// Parse the offer end time.
    ///
    /// Returns `None` when the timestamp is absent or malformed; callers
    /// sorting by expiry place such records last.
    #[must_use]
    pub fn end_time_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.end_time)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl Product {
    /// Whether any units remain in stock.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock.quantity > 0
    }
}

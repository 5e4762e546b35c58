//! Store wire types.

use serde::{Deserialize, Serialize};

use super::id::StoreId;
use super::product::Product;

/// A retail store location with its discounted product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Store identity.
    pub id: StoreId,
    /// Store display name.
    #[serde(default)]
    pub name: String,
    /// Chain branding.
    #[serde(default)]
    pub brand: Brand,
    /// Physical location.
    #[serde(default)]
    pub address: Address,
    /// Discounted products currently listed at this store.
    #[serde(default)]
    pub products: Vec<Product>,
    /// Whether the current user has marked this store favorite.
    ///
    /// Client-computed decoration, not authoritative state: the favorites
    /// registry overwrites this on every fetch from its membership set.
    #[serde(default)]
    pub is_favorite: bool,
}

/// Chain branding for a store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    /// Human-readable chain name.
    #[serde(default)]
    pub display_name: String,
}

/// A store's physical address.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street address line.
    #[serde(default)]
    pub address_line: String,
    /// Postal code and city.
    #[serde(default)]
    pub postal_code: PostalCode,
    /// Latitude in degrees.
    #[serde(default)]
    pub latitude: f64,
    /// Longitude in degrees.
    #[serde(default)]
    pub longitude: f64,
}

/// Postal code with its city name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalCode {
    /// The postal code itself.
    #[serde(default)]
    pub postal_code: String,
    /// City the code belongs to.
    #[serde(default)]
    pub city: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_store_deserializes_backend_shape() {
        let json = r#"{
            "id": "store-1",
            "name": "Netto Østerbro",
            "brand": {"displayName": "Netto"},
            "address": {
                "addressLine": "Østerbrogade 62",
                "postalCode": {"postalCode": "2100", "city": "København Ø"},
                "latitude": 55.7,
                "longitude": 12.58
            },
            "products": []
        }"#;
        let store: Store = serde_json::from_str(json).unwrap();
        assert_eq!(store.id.as_str(), "store-1");
        assert_eq!(store.brand.display_name, "Netto");
        assert_eq!(store.address.postal_code.city, "København Ø");
        // isFavorite never comes from the backend
        assert!(!store.is_favorite);
    }

    #[test]
    fn test_store_minimal_payload() {
        let store: Store = serde_json::from_str(r#"{"id": "s"}"#).unwrap();
        assert!(store.products.is_empty());
        assert_eq!(store.address.postal_code.postal_code, "");
    }
}

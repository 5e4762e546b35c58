//! Upstream text-encoding repair.
//!
//! The backend loses `ø` somewhere in its own ingestion pipeline and serves
//! product names with a literal `#` in its place. The gateway repairs every
//! occurrence right after fetch, before any record reaches a consumer. The
//! rewrite applies only to `productName` inside fetched `products` arrays -
//! store names, cities, and categories are served intact.

use crate::types::Store;

/// Repair a single product name: every `#` becomes `ø`.
#[must_use]
pub fn repair_product_name(name: &str) -> String {
    name.replace('#', "ø")
}

/// Repair every product name in a store's listing in place.
pub fn repair_store(store: &mut Store) {
    for product in &mut store.products {
        if product.product_name.contains('#') {
            product.product_name = repair_product_name(&product.product_name);
        }
    }
}

/// Repair every product name across a fetched store list.
pub fn repair_stores(stores: &mut [Store]) {
    for store in stores {
        repair_store(store);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_repair_product_name() {
        assert_eq!(repair_product_name("Um#rlig"), "Umørlig");
        assert_eq!(repair_product_name("intakt"), "intakt");
    }

    #[test]
    fn test_repair_all_occurrences() {
        assert_eq!(repair_product_name("#l og r#d#l"), "øl og rødøl");
    }

    #[test]
    fn test_repair_store_touches_only_product_names() {
        let mut store: Store = serde_json::from_str(
            r#"{
                "id": "s#1",
                "name": "Netto #sterbro",
                "products": [
                    {"ean": "1", "productName": "Um#rlig"},
                    {"ean": "2", "productName": "Mælk"}
                ]
            }"#,
        )
        .unwrap();

        repair_store(&mut store);

        assert_eq!(store.products[0].product_name, "Umørlig");
        assert_eq!(store.products[1].product_name, "Mælk");
        // The rewrite never touches store-level fields.
        assert_eq!(store.id.as_str(), "s#1");
        assert_eq!(store.name, "Netto #sterbro");
    }
}

//! Newtype IDs for type-safe entity references.
//!
//! The backend issues opaque string identifiers (store UUIDs, product EANs).
//! Use the `define_string_id!` macro to create type-safe wrappers that
//! prevent accidentally mixing IDs from different entity types.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>` / `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use tilbud_core::define_string_id;
/// define_string_id!(StoreId);
/// define_string_id!(Ean);
///
/// let store_id = StoreId::new("a1b2");
/// let ean = Ean::new("5701234567890");
///
/// // These are different types, so this won't compile:
/// // let _: StoreId = ean;
/// ```
#[macro_export]
macro_rules! define_string_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_string_id!(StoreId);
define_string_id!(Ean);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = StoreId::new("abc-123");
        assert_eq!(id.as_str(), "abc-123");
        assert_eq!(id.to_string(), "abc-123");
        assert_eq!(String::from(id), "abc-123");
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = Ean::new("5701234567890");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"5701234567890\"");

        let back: Ean = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

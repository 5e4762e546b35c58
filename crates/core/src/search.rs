//! Free-text substring search over nested record fields.
//!
//! The contract is deliberately simple: given a collection, a set of
//! dot-separated field paths, and a query, keep the records where at least
//! one named field's string or number representation contains the query as a
//! case-insensitive substring. No tokenization, no fuzziness, no ranking.
//!
//! Field access is duck-typed: records are serialized to JSON and paths are
//! resolved against the resulting object, so a missing intermediate key
//! resolves to "no match" rather than an error. This mirrors how the backend
//! omits fields freely.

use serde::Serialize;
use serde_json::Value;

/// Field paths used when searching stores by free text.
pub const STORE_SEARCH_PATHS: &[&str] = &[
    "name",
    "brand.displayName",
    "address.postalCode.city",
    "address.postalCode.postalCode",
];

/// Field paths used when searching a store's product listing.
pub const PRODUCT_SEARCH_PATHS: &[&str] = &["productName"];

/// Filter `records` down to those matching `query` in one of `paths`.
///
/// - An empty or whitespace-only query returns every record, original order.
/// - With an empty `paths` slice, all top-level scalar (string/number)
///   fields of each record are scanned instead.
/// - Matching is case-insensitive substring containment.
///
/// Pure and deterministic in `(records, query, paths)`.
pub fn search<'a, T: Serialize>(records: &'a [T], query: &str, paths: &[&str]) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|record| {
            // Serialization of our wire types cannot fail; a non-object
            // record simply matches nothing.
            serde_json::to_value(record)
                .map(|value| record_matches(&value, &needle, paths))
                .unwrap_or(false)
        })
        .collect()
}

/// Whether any addressed field of `value` contains `needle`.
fn record_matches(value: &Value, needle: &str, paths: &[&str]) -> bool {
    if paths.is_empty() {
        return match value {
            Value::Object(map) => map.values().any(|field| field_contains(field, needle)),
            other => field_contains(other, needle),
        };
    }

    paths
        .iter()
        .filter_map(|path| resolve_path(value, path))
        .any(|field| field_contains(field, needle))
}

/// Walk a dot-separated path through nested JSON objects.
///
/// Returns `None` as soon as any intermediate value is missing or not an
/// object.
fn resolve_path<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.')
        .try_fold(value, |current, key| current.get(key))
}

/// Case-insensitive substring test against a scalar field.
///
/// Only strings and numbers participate; booleans, nulls, arrays, and
/// objects never match.
fn field_contains(field: &Value, needle: &str) -> bool {
    match field {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        _ => false,
    }
}

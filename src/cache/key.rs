// SPDX-License-Identifier: Apache-2.0

//! Canonical key encoding for cache lookups.
//!
//! Request descriptors are arbitrary JSON values (nested maps, sequences,
//! scalars). Two descriptors that differ only in mapping-key order must
//! address the same cache entry, so every mapping is rewritten as a sequence
//! of `[key, value]` pairs sorted by key before the descriptor is serialized
//! into the lookup key. Sequence order is meaningful and is never touched.

use serde_json::Value;

/// Rewrite a JSON value into its canonical, order-independent form.
///
/// - Objects become arrays of two-element `[key, canonicalized value]`
///   arrays, sorted ascending by key.
/// - Arrays keep their order, with each element canonicalized.
/// - Scalars (strings, numbers, booleans, null) pass through unchanged.
///
/// Total over JSON values; no errors. Applying it twice yields the same
/// result as applying it once, since the first pass leaves only arrays and
/// scalars behind.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut pairs: Vec<(&String, &Value)> = map.iter().collect();
            pairs.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Array(
                pairs
                    .into_iter()
                    .map(|(key, val)| {
                        Value::Array(vec![Value::String(key.clone()), canonicalize(val)])
                    })
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        scalar => scalar.clone(),
    }
}

/// Serialize a request descriptor into its deterministic cache key.
pub fn cache_key(descriptor: &Value) -> String {
    // Canonical form contains no objects, so serde_json's compact encoding
    // is deterministic.
    canonicalize(descriptor).to_string()
}

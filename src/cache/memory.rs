// SPDX-License-Identifier: Apache-2.0

//! Process-local cache tier.

use std::collections::HashMap;

use serde_json::Value;

/// Non-persistent key/value store scoped to the process lifetime.
///
/// All operations are synchronous and O(1) expected. A process restart
/// yields an empty cache; the layered coordinator treats this tier as a
/// rebuildable accelerator over the persistent tier.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<String, Value>,
}

impl MemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value. A miss is `None`, never an error.
    pub fn read(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Insert or replace a value.
    pub fn upsert(&mut self, key: String, value: Value) {
        self.entries.insert(key, value);
    }

    /// Remove a value. Deleting an absent key is a no-op.
    pub fn delete(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_miss_returns_none() {
        let cache = MemoryCache::new();
        assert!(cache.read("absent").is_none());
    }

    #[test]
    fn test_upsert_overwrites() {
        let mut cache = MemoryCache::new();
        cache.upsert("k".into(), json!(1));
        cache.upsert("k".into(), json!(2));
        assert_eq!(cache.read("k"), Some(&json!(2)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let mut cache = MemoryCache::new();
        cache.delete("absent");
        assert!(cache.is_empty());

        cache.upsert("k".into(), json!("v"));
        cache.delete("k");
        assert!(cache.read("k").is_none());
    }
}

//! Tests for the layered cache across process restarts
//!
//! Exercises the public cache surface end to end: descriptor
//! canonicalization, read-through fetching, persistent-tier durability, and
//! the absence of caching on failed fetches.

use std::cell::Cell;

use etherlens::{cache_key, CacheError, LayeredCache};
use serde_json::{json, Value};

async fn fetch_counted(counter: &Cell<u32>, value: Value) -> Result<Value, CacheError> {
    counter.set(counter.get() + 1);
    Ok(value)
}

#[tokio::test]
async fn test_fetched_entries_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let descriptor = json!({"op": "abi", "address": "0xabc"});
    let fetches = Cell::new(0);

    {
        let mut cache = LayeredCache::new(dir.path());
        let value: Value = cache
            .read_or_fetch(&descriptor, || fetch_counted(&fetches, json!({"abi": []})))
            .await
            .unwrap();
        assert_eq!(value, json!({"abi": []}));
    }

    // A fresh instance serves the entry from disk without fetching.
    let mut reopened = LayeredCache::new(dir.path());
    let value: Value = reopened
        .read_or_fetch(&descriptor, || fetch_counted(&fetches, json!("unexpected")))
        .await
        .unwrap();
    assert_eq!(value, json!({"abi": []}));
    assert_eq!(fetches.get(), 1);
}

#[tokio::test]
async fn test_descriptor_key_order_is_irrelevant_across_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut cache = LayeredCache::new(dir.path());
        cache
            .upsert(&json!({"a": 1, "b": [2, 3]}), json!("v"))
            .unwrap();
    }

    let mut reopened = LayeredCache::new(dir.path());
    let hit = reopened.read(&json!({"b": [2, 3], "a": 1})).unwrap();
    assert_eq!(hit, Some(json!("v")));
}

#[tokio::test]
async fn test_deleted_entries_stay_deleted_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let descriptor = json!(["events", "0xabc", "Transfer"]);

    {
        let mut cache = LayeredCache::new(dir.path());
        cache.upsert(&descriptor, json!([1, 2])).unwrap();
        cache.delete(&descriptor).unwrap();
    }

    let mut reopened = LayeredCache::new(dir.path());
    assert!(reopened.read(&descriptor).unwrap().is_none());
}

#[tokio::test]
async fn test_failed_fetch_leaves_no_entry_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let descriptor = json!({"op": "flaky"});

    {
        let mut cache = LayeredCache::new(dir.path());
        let result: Result<Value, CacheError> = cache
            .read_or_fetch(&descriptor, || async {
                Err(CacheError::Codec(
                    serde_json::from_str::<Value>("").unwrap_err(),
                ))
            })
            .await;
        assert!(result.is_err());
    }

    let mut reopened = LayeredCache::new(dir.path());
    assert!(reopened.read(&descriptor).unwrap().is_none());
}

#[test]
fn test_cache_key_matches_canonical_form() {
    let descriptor = json!({"b": 1, "a": {"y": 2, "x": 3}});
    assert_eq!(cache_key(&descriptor), r#"[["a",[["x",3],["y",2]]],["b",1]]"#);
}

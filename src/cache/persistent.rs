// SPDX-License-Identifier: Apache-2.0

//! Durable cache tier backed by a single SQLite file.
//!
//! The store lives at `<root>/cache.db` and holds one table,
//! `cache(key TEXT PRIMARY KEY, data BLOB)`. The connection is opened
//! lazily on first access and reused for the component's lifetime; the file
//! and schema are created automatically if absent.
//!
//! Writes accumulate inside a deferred transaction so the coordinator can
//! batch them and amortize fsync cost; [`PersistentCache::commit`] flushes.
//! Without a commit, durability across a crash is not guaranteed, but the
//! store stays internally consistent (SQLite rolls the open transaction back
//! on drop). Reads on the same handle observe uncommitted writes.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use tracing::debug;

use crate::errors::CacheError;

const STORE_FILE: &str = "cache.db";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS cache (key TEXT PRIMARY KEY, data BLOB NOT NULL)";

/// Durable key/value store with lazy schema initialization.
///
/// Requires a single-writer-at-a-time discipline from the surrounding
/// system; the handle itself is not shared across threads.
#[derive(Debug)]
pub struct PersistentCache {
    root: PathBuf,
    conn: Option<Connection>,
    in_transaction: bool,
}

impl PersistentCache {
    /// Create a store rooted at `root`. Nothing is opened until first use.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            conn: None,
            in_transaction: false,
        }
    }

    /// Look up a value. A miss is `None`, never an error.
    pub fn read(&mut self, key: &str) -> Result<Option<Value>, CacheError> {
        let conn = self.conn()?;
        let data: Option<Vec<u8>> = conn
            .query_row("SELECT data FROM cache WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        match data {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Insert or replace a value (last-write-wins, no versioning).
    pub fn upsert(&mut self, key: &str, value: &Value) -> Result<(), CacheError> {
        let data = serde_json::to_vec(value)?;
        self.begin_if_needed()?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO cache (key, data) VALUES (?1, ?2)",
            params![key, data],
        )?;
        Ok(())
    }

    /// Remove a value. Deleting an absent key is a no-op.
    pub fn delete(&mut self, key: &str) -> Result<(), CacheError> {
        self.begin_if_needed()?;
        let conn = self.conn()?;
        conn.execute("DELETE FROM cache WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Flush pending writes to disk. No-op when nothing is pending.
    pub fn commit(&mut self) -> Result<(), CacheError> {
        if self.in_transaction {
            self.conn()?.execute_batch("COMMIT")?;
            self.in_transaction = false;
        }
        Ok(())
    }

    fn begin_if_needed(&mut self) -> Result<(), CacheError> {
        if !self.in_transaction {
            self.conn()?.execute_batch("BEGIN")?;
            self.in_transaction = true;
        }
        Ok(())
    }

    /// Open-or-create the store on first access; reuse the handle afterwards.
    fn conn(&mut self) -> Result<&Connection, CacheError> {
        if self.conn.is_none() {
            self.conn = Some(open_store(&self.root)?);
        }
        match &self.conn {
            Some(conn) => Ok(conn),
            // Assigned above when absent; kept as an error rather than a panic.
            None => Err(CacheError::store_open_failed(
                &self.root,
                std::io::Error::other("store handle missing after open"),
            )),
        }
    }
}

/// Idempotent open-or-create. An unusable root fails fast so permission and
/// disk errors surface instead of hiding behind a silent fallback.
fn open_store(root: &Path) -> Result<Connection, CacheError> {
    std::fs::create_dir_all(root).map_err(|e| CacheError::store_open_failed(root, e))?;
    let path = root.join(STORE_FILE);
    let conn = Connection::open(&path).map_err(|e| CacheError::store_open_failed(root, e))?;
    conn.execute_batch(SCHEMA)?;
    debug!(path = %path.display(), "Opened persistent cache store");
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_miss_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PersistentCache::new(dir.path());
        assert!(cache.read("absent").unwrap().is_none());
    }

    #[test]
    fn test_upsert_read_roundtrip_before_commit() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PersistentCache::new(dir.path());
        cache.upsert("k", &json!({"a": 1})).unwrap();
        // Same handle observes pending writes.
        assert_eq!(cache.read("k").unwrap(), Some(json!({"a": 1})));
    }

    #[test]
    fn test_commit_makes_writes_durable() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut cache = PersistentCache::new(dir.path());
            cache.upsert("k", &json!([1, 2, 3])).unwrap();
            cache.commit().unwrap();
        }
        let mut reopened = PersistentCache::new(dir.path());
        assert_eq!(reopened.read("k").unwrap(), Some(json!([1, 2, 3])));
    }

    #[test]
    fn test_uncommitted_writes_are_rolled_back() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut cache = PersistentCache::new(dir.path());
            cache.upsert("seeded", &json!("v")).unwrap();
            cache.commit().unwrap();
            cache.upsert("pending", &json!("lost")).unwrap();
            // Dropped without commit.
        }
        let mut reopened = PersistentCache::new(dir.path());
        assert_eq!(reopened.read("seeded").unwrap(), Some(json!("v")));
        assert!(reopened.read("pending").unwrap().is_none());
    }

    #[test]
    fn test_upsert_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PersistentCache::new(dir.path());
        cache.upsert("k", &json!(1)).unwrap();
        cache.upsert("k", &json!(2)).unwrap();
        cache.commit().unwrap();
        assert_eq!(cache.read("k").unwrap(), Some(json!(2)));
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PersistentCache::new(dir.path());
        cache.delete("absent").unwrap();
        cache.upsert("k", &json!("v")).unwrap();
        cache.delete("k").unwrap();
        cache.commit().unwrap();
        assert!(cache.read("k").unwrap().is_none());
    }

    #[test]
    fn test_unopenable_root_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let mut cache = PersistentCache::new(&blocker);
        let err = cache.read("k").unwrap_err();
        assert!(matches!(err, CacheError::StoreOpenFailed { .. }));
    }

    #[test]
    fn test_commit_without_writes_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PersistentCache::new(dir.path());
        cache.commit().unwrap();
        cache.commit().unwrap();
    }
}

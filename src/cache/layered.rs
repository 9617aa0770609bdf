// SPDX-License-Identifier: Apache-2.0

//! Read-through coordinator over the memory and persistent cache tiers.

use std::future::Future;
use std::path::PathBuf;

use serde_json::Value;
use tracing::trace;

use crate::cache::key::cache_key;
use crate::cache::memory::MemoryCache;
use crate::cache::persistent::PersistentCache;
use crate::errors::CacheError;

/// Two-tier cache addressed by request descriptors.
///
/// Lookups consult the memory tier, then the persistent tier (promoting hits
/// back into memory), then fall through to a caller-supplied fetcher whose
/// result populates both tiers. A failed fetch caches nothing, so the next
/// lookup retries the fetch.
///
/// Every write-through operation commits the persistent tier before
/// returning. A crash between the memory and persistent writes loses only
/// the memory copy; the persistent tier is the durable source of truth and
/// the memory tier a rebuildable accelerator.
#[derive(Debug)]
pub struct LayeredCache {
    memory: MemoryCache,
    persistent: PersistentCache,
}

impl LayeredCache {
    /// Create a layered cache whose persistent tier lives under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            memory: MemoryCache::new(),
            persistent: PersistentCache::new(root),
        }
    }

    /// Return the cached value for `descriptor`, fetching on a full miss.
    ///
    /// The fetcher runs only when both tiers miss. Its error type just needs
    /// a conversion from [`CacheError`] so tier failures surface through the
    /// same channel as fetch failures.
    pub async fn read_or_fetch<F, Fut, E>(&mut self, descriptor: &Value, fetch: F) -> Result<Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
        E: From<CacheError>,
    {
        let key = cache_key(descriptor);

        if let Some(value) = self.memory.read(&key) {
            trace!(%key, tier = "memory", "Cache hit");
            return Ok(value.clone());
        }

        if let Some(value) = self.persistent.read(&key).map_err(E::from)? {
            trace!(%key, tier = "persistent", "Cache hit, promoting to memory");
            self.memory.upsert(key, value.clone());
            return Ok(value);
        }

        trace!(%key, "Cache miss, invoking fetcher");
        let value = fetch().await?;
        self.memory.upsert(key.clone(), value.clone());
        self.persistent.upsert(&key, &value).map_err(E::from)?;
        self.persistent.commit().map_err(E::from)?;
        Ok(value)
    }

    /// Look up a value without fetching. A miss is `None`, never an error.
    ///
    /// A persistent-tier hit is promoted into the memory tier.
    pub fn read(&mut self, descriptor: &Value) -> Result<Option<Value>, CacheError> {
        let key = cache_key(descriptor);
        if let Some(value) = self.memory.read(&key) {
            return Ok(Some(value.clone()));
        }
        match self.persistent.read(&key)? {
            Some(value) => {
                self.memory.upsert(key, value.clone());
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Insert or replace a value in both tiers, committed.
    pub fn upsert(&mut self, descriptor: &Value, value: Value) -> Result<(), CacheError> {
        let key = cache_key(descriptor);
        self.memory.upsert(key.clone(), value.clone());
        self.persistent.upsert(&key, &value)?;
        self.persistent.commit()
    }

    /// Remove a value from both tiers, committed. Deleting an absent key is
    /// a no-op.
    pub fn delete(&mut self, descriptor: &Value) -> Result<(), CacheError> {
        let key = cache_key(descriptor);
        self.memory.delete(&key);
        self.persistent.delete(&key)?;
        self.persistent.commit()
    }
}

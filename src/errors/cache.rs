// SPDX-License-Identifier: Apache-2.0

//! Error types for the cache tiers.

use std::path::PathBuf;

/// Errors from the memory, persistent, and layered cache tiers.
///
/// A cache *miss* is never an error; these variants cover setup and storage
/// failures only. An unopenable store root fails fast rather than silently
/// falling back to an in-memory-only mode, so permission and disk problems
/// surface at first access instead of hiding behind degraded behavior.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cache root directory could not be created or the store file could
    /// not be opened. Fatal at first access; never retried.
    #[error("failed to open cache store under {root}")]
    StoreOpenFailed {
        /// Configured cache root directory
        root: PathBuf,
        /// The underlying filesystem or SQLite error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A SQLite statement failed after the store was opened.
    #[error("cache store operation failed")]
    Store(#[from] rusqlite::Error),

    /// A cached value could not be serialized or deserialized.
    #[error("cache value codec failure")]
    Codec(#[from] serde_json::Error),
}

impl CacheError {
    /// Helper to create a `StoreOpenFailed` error from any error type.
    pub fn store_open_failed(
        root: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CacheError::StoreOpenFailed {
            root: root.into(),
            source: Box::new(source),
        }
    }
}

// SPDX-License-Identifier: Apache-2.0

//! Configuration for the etherlens client.
//!
//! Loaded from TOML, e.g.:
//!
//! ```toml
//! [cache]
//! root = "/var/lib/etherlens"
//!
//! [rpc]
//! endpoints = ["https://eth.llamarpc.com", "https://rpc.ankr.com/eth"]
//! max_fails = 3
//! fail_window_secs = 60
//!
//! [explorer]
//! chain_id = 1
//! api_key = "..."
//! timeout_secs = 30
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::EtherlensError;
use crate::rpc::FailurePolicy;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtherlensConfig {
    /// Cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// RPC endpoint settings
    pub rpc: RpcConfig,

    /// Block-explorer API settings
    pub explorer: ExplorerConfig,
}

impl EtherlensConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, EtherlensError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EtherlensError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&raw).map_err(|e| {
            EtherlensError::Config(format!("failed to parse {}: {e}", path.display()))
        })
    }
}

/// Cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding the persistent cache store
    #[serde(default = "default_cache_root")]
    pub root: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: default_cache_root(),
        }
    }
}

fn default_cache_root() -> PathBuf {
    PathBuf::from(".etherlens")
}

/// RPC endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// RPC endpoint URLs, all serving the same chain
    pub endpoints: Vec<String>,

    /// Failures within the window that trigger endpoint rotation
    #[serde(default = "default_max_fails")]
    pub max_fails: usize,

    /// Sliding failure window in seconds
    #[serde(default = "default_fail_window_secs")]
    pub fail_window_secs: u64,
}

impl RpcConfig {
    /// The endpoint-rotation policy these settings describe.
    #[must_use]
    pub fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy {
            max_fails: self.max_fails,
            window: Duration::from_secs(self.fail_window_secs),
        }
    }
}

fn default_max_fails() -> usize {
    3
}

fn default_fail_window_secs() -> u64 {
    60
}

/// Block-explorer API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Chain id served by the RPC endpoints
    pub chain_id: u64,

    /// Explorer API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

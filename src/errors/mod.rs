// SPDX-License-Identifier: Apache-2.0

//! Error types for the etherlens library.
//!
//! Each major module has its own error type for fine-grained handling:
//!
//! - [`CacheError`] - Errors from the cache tiers (store open, SQL, codec)
//! - [`RpcError`] - Errors from endpoint pool construction and RPC calls
//! - [`RangeFetchError`] - Errors from adaptive block-range fetching
//! - [`ExplorerError`] - Errors from the block-explorer HTTP API
//!
//! [`EtherlensError`] wraps all of them for callers that don't need to
//! distinguish error sources; every module error converts into it via `From`,
//! so `?` propagates naturally.
//!
//! Cache misses are not errors anywhere in this crate: absent values are
//! `Option::None` so that "miss" stays on the normal return path.

mod cache;
mod explorer;
mod range;
mod rpc;

pub use cache::CacheError;
pub use explorer::ExplorerError;
pub use range::RangeFetchError;
pub use rpc::RpcError;

/// Unified error type for all etherlens operations.
///
/// Caching is strictly additive: fetch callbacks that fail propagate their
/// error unchanged through this type and never leave a cache entry behind.
#[derive(Debug, thiserror::Error)]
pub enum EtherlensError {
    /// Error from the cache tiers.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// Error from the endpoint pool or an RPC call.
    #[error("rpc error: {0}")]
    Rpc(#[from] RpcError),

    /// Error from an adaptive range fetch.
    #[error("range fetch error: {0}")]
    RangeFetch(#[from] RangeFetchError),

    /// Error from the block-explorer API.
    #[error("explorer error: {0}")]
    Explorer(#[from] ExplorerError),

    /// The contract ABI payload could not be parsed.
    #[error("failed to parse contract ABI")]
    AbiParse(#[from] serde_json::Error),

    /// A log could not be decoded against its event definition.
    #[error("failed to decode event log")]
    Decode(#[from] alloy_dyn_abi::Error),

    /// The requested event does not exist in the contract ABI.
    #[error("event `{event}` not found in ABI for {address}")]
    EventNotFound {
        /// Contract address whose ABI was searched
        address: String,
        /// Requested event name
        event: String,
    },

    /// Configuration file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

// SPDX-License-Identifier: Apache-2.0

//! Cached convenience client for on-chain data.
//!
//! etherlens wraps the repetitive parts of chain analytics behind one
//! entry point: contract ABIs fetched from block explorers (with EIP-1967
//! proxy resolution), event queries over large block ranges that adapt to
//! provider limits, flexible block references (number, timestamp, or date),
//! and a two-tier cache so nothing is fetched twice.
//!
//! ```rust,ignore
//! use etherlens::{BlockRef, Etherlens};
//!
//! let mut lens = Etherlens::from_config_file("etherlens.toml")?;
//! let from = BlockRef::parse("2024-01-01")?;
//! let to = BlockRef::parse("2024-02-01")?;
//! let transfers = lens
//!     .get_events(token_address, "Transfer", from, to, true)
//!     .await?;
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod errors;
pub mod events;
pub mod explorer;
pub mod rpc;
mod spans;

pub use cache::{cache_key, canonicalize, LayeredCache, MemoryCache, PersistentCache};
pub use client::Etherlens;
pub use config::EtherlensConfig;
pub use errors::{CacheError, EtherlensError, ExplorerError, RangeFetchError, RpcError};
pub use events::{fetch_range, BlockSpan};
pub use explorer::{BlockRef, Closest, ExplorerClient};
pub use rpc::{EndpointPool, FailurePolicy};

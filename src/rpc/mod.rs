// SPDX-License-Identifier: Apache-2.0

//! RPC endpoint management and chain-state lookups.

pub mod blocks;
pub mod pool;
pub mod proxy;

pub use blocks::block_timestamp;
pub use pool::{EndpointPool, FailurePolicy, PooledProvider};
pub use proxy::implementation_address;

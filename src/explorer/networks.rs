// SPDX-License-Identifier: Apache-2.0

//! Block-explorer API endpoints by chain id.

use crate::errors::ExplorerError;

/// Resolve the explorer API base URL for a chain id.
pub fn api_base(chain_id: u64) -> Result<&'static str, ExplorerError> {
    match chain_id {
        1 => Ok("https://api.etherscan.io"),
        10 => Ok("https://api-optimistic.etherscan.io"),
        137 => Ok("https://api.polygonscan.com"),
        250 => Ok("https://api.ftmscan.com"),
        8453 => Ok("https://api.basescan.org"),
        42161 => Ok("https://api.arbiscan.io"),
        43114 => Ok("https://api.snowscan.xyz"),
        11155111 => Ok("https://api-sepolia.etherscan.io"),
        _ => Err(ExplorerError::UnsupportedChain { chain_id }),
    }
}

// SPDX-License-Identifier: Apache-2.0

//! Shared RPC error types for endpoint pool and provider operations.

/// Errors from endpoint pool construction and blockchain RPC calls.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The pool was constructed with zero endpoints. Fatal at construction
    /// time; never retried.
    #[error("cannot create an endpoint pool with 0 endpoints")]
    NoEndpoints,

    /// An endpoint URL could not be parsed.
    #[error("invalid endpoint URL: {url}")]
    InvalidEndpointUrl {
        /// The offending URL string
        url: String,
    },

    /// Block was not found at the specified block number.
    #[error("block not found: {block_number}")]
    BlockNotFound {
        /// The block number that wasn't found
        block_number: u64,
    },

    /// Failed to fetch block details by number. Different from
    /// `BlockNotFound`: the RPC call itself failed, not the lookup.
    #[error("failed to fetch block {block_number}")]
    GetBlockFailed {
        /// The block number we tried to fetch
        block_number: u64,
        /// The underlying provider error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to read a storage slot (used for proxy resolution).
    #[error("failed to read storage slot for {address}")]
    GetStorageFailed {
        /// Contract address whose storage was read
        address: String,
        /// The underlying provider error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl RpcError {
    /// Helper to create a `GetBlockFailed` error from any error type.
    pub fn get_block_failed(
        block_number: u64,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::GetBlockFailed {
            block_number,
            source: Box::new(source),
        }
    }

    /// Helper to create a `GetStorageFailed` error from any error type.
    pub fn get_storage_failed(
        address: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::GetStorageFailed {
            address: address.into(),
            source: Box::new(source),
        }
    }
}

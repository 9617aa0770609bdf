// SPDX-License-Identifier: Apache-2.0

//! Error types for the block-explorer HTTP API client.

/// Errors from the block-explorer API (Etherscan family).
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    /// No explorer API endpoint is known for the configured chain id.
    #[error("no block-explorer endpoint known for chain id {chain_id}")]
    UnsupportedChain {
        /// The chain id with no known explorer
        chain_id: u64,
    },

    /// The explorer returned its error envelope (`status != "1"`).
    #[error("explorer API error: {message}")]
    Api {
        /// The `result`/`message` text from the explorer response
        message: String,
    },

    /// The explorer response did not have the expected shape.
    #[error("unexpected explorer response: {0}")]
    UnexpectedResponse(String),

    /// The HTTP request itself failed.
    #[error("explorer request failed")]
    Http(#[from] reqwest::Error),

    /// The `result` payload could not be parsed (e.g. a non-JSON ABI body).
    #[error("failed to parse explorer payload")]
    Parse(#[from] serde_json::Error),

    /// A date or timestamp argument could not be interpreted.
    #[error("invalid block reference: {0}")]
    InvalidBlockRef(String),
}

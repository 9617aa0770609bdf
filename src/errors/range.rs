// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for adaptive block-range fetching.
//!
//! The range fetcher distinguishes exactly one recoverable class:
//! [`RangeFetchError::Transient`] makes it halve the current chunk and retry
//! the same cursor. Everything else propagates to the caller unchanged.

use alloy_json_rpc::RpcError as JsonRpcError;
use alloy_transport::TransportError;

/// Errors raised by or through [`fetch_range`](crate::events::fetch_range).
#[derive(Debug, thiserror::Error)]
pub enum RangeFetchError {
    /// Recoverable failure for one sub-range request: the provider rejected
    /// an oversized query, timed out, or returned a malformed response.
    /// Triggers chunk halving inside the range fetcher and is otherwise
    /// invisible to the caller.
    #[error("transient failure fetching blocks {from_block}-{to_block}: {reason}")]
    Transient {
        /// Lower bound of the failed sub-range (inclusive)
        from_block: u64,
        /// Upper bound of the failed sub-range (inclusive)
        to_block: u64,
        /// Short description of the failure class
        reason: String,
    },

    /// Halving reached a zero-size chunk before the range was exhausted.
    /// Fatal; the range cannot be serviced even at minimum granularity.
    #[error(
        "could not fetch blocks {from_block}-{to_block}: minimum chunk size reached at block {cursor}"
    )]
    ChunkExhausted {
        /// Lower bound of the requested range (inclusive)
        from_block: u64,
        /// Upper bound of the requested range (inclusive)
        to_block: u64,
        /// First block that was never successfully fetched
        cursor: u64,
    },

    /// Any other failure from the sub-range callback. Propagates immediately,
    /// never retried.
    #[error("fatal failure fetching blocks {from_block}-{to_block}")]
    Fatal {
        /// Lower bound of the failed sub-range (inclusive)
        from_block: u64,
        /// Upper bound of the failed sub-range (inclusive)
        to_block: u64,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl RangeFetchError {
    /// Classify an alloy transport error for one sub-range request.
    ///
    /// Transient: retryable transport conditions (connection issues, HTTP
    /// 5xx, rate limits), malformed/oversized responses that failed to
    /// deserialize, null responses, and error responses that either carry a
    /// retryable code or complain about the query's block range. Everything
    /// else is fatal.
    pub fn classify_transport(from_block: u64, to_block: u64, error: TransportError) -> Self {
        let transient_reason = match &error {
            JsonRpcError::Transport(kind) if kind.is_retry_err() => Some("transport"),
            JsonRpcError::DeserError { .. } => Some("malformed response"),
            JsonRpcError::NullResp => Some("null response"),
            JsonRpcError::ErrorResp(payload)
                if payload.is_retry_err() || is_range_limit_message(&payload.message) =>
            {
                Some("provider rejected query size")
            }
            _ => None,
        };

        match transient_reason {
            Some(reason) => RangeFetchError::Transient {
                from_block,
                to_block,
                reason: format!("{reason}: {error}"),
            },
            None => RangeFetchError::Fatal {
                from_block,
                to_block,
                source: Box::new(error),
            },
        }
    }
}

/// Providers word their range-limit rejections inconsistently and rarely
/// expose a dedicated error code, so fall back to message sniffing.
fn is_range_limit_message(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("block range")
        || message.contains("too large")
        || message.contains("too many")
        || message.contains("query returned more than")
        || message.contains("exceed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_limit_message_detection() {
        assert!(is_range_limit_message("eth_getLogs block range too large"));
        assert!(is_range_limit_message(
            "query returned more than 10000 results"
        ));
        assert!(is_range_limit_message("Too Many requested blocks"));
        assert!(!is_range_limit_message("execution reverted"));
        assert!(!is_range_limit_message("method not found"));
    }
}

// SPDX-License-Identifier: Apache-2.0

//! Block-explorer HTTP API client (Etherscan family).
//!
//! Uncached: callers are expected to route these lookups through the layered
//! cache, since ABIs and timestamp-to-block mappings rarely change.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::errors::ExplorerError;
use crate::explorer::networks;

/// Which block to pick when no block matches a timestamp exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closest {
    /// Last block at or before the timestamp
    Before,
    /// First block at or after the timestamp
    After,
}

impl Closest {
    /// The query-parameter value the explorer API expects.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Closest::Before => "before",
            Closest::After => "after",
        }
    }
}

/// Client for one chain's explorer API.
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    http: reqwest::Client,
    base: &'static str,
    api_key: Option<String>,
}

impl ExplorerClient {
    /// Create a client for the given chain id.
    ///
    /// # Errors
    ///
    /// [`ExplorerError::UnsupportedChain`] when no explorer endpoint is known
    /// for the chain.
    pub fn new(
        chain_id: u64,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ExplorerError> {
        let base = networks::api_base(chain_id)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base,
            api_key,
        })
    }

    /// Fetch a contract's ABI as parsed JSON.
    ///
    /// The explorer wraps the ABI in a JSON string; unverified contracts come
    /// back as an [`ExplorerError::Api`] with the explorer's message.
    pub async fn abi(&self, address: &str) -> Result<Value, ExplorerError> {
        let result = self
            .fetch(&[
                ("module", "contract"),
                ("action", "getabi"),
                ("address", address),
            ])
            .await?;
        match result {
            Value::String(body) => Ok(serde_json::from_str(&body)?),
            other => Err(ExplorerError::UnexpectedResponse(format!(
                "ABI result is not a string: {other}"
            ))),
        }
    }

    /// Resolve a unix timestamp to a block number.
    pub async fn block_by_timestamp(
        &self,
        timestamp: u64,
        closest: Closest,
    ) -> Result<u64, ExplorerError> {
        let timestamp = timestamp.to_string();
        let result = self
            .fetch(&[
                ("module", "block"),
                ("action", "getblocknobytime"),
                ("timestamp", &timestamp),
                ("closest", closest.as_str()),
            ])
            .await?;
        result
            .as_str()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                ExplorerError::UnexpectedResponse(format!("block number result: {result}"))
            })
    }

    async fn fetch(&self, params: &[(&str, &str)]) -> Result<Value, ExplorerError> {
        let url = format!("{}/api", self.base);
        debug!(url = %url, module = params[0].1, action = params[1].1, "Explorer request");

        let mut request = self.http.get(&url).query(params);
        if let Some(key) = &self.api_key {
            request = request.query(&[("apikey", key.as_str())]);
        }
        let response: Value = request.send().await?.json().await?;
        unwrap_envelope(response)
    }
}

/// Unwrap the explorer's `{status, message, result}` envelope.
fn unwrap_envelope(response: Value) -> Result<Value, ExplorerError> {
    let status = response.get("status").and_then(Value::as_str);
    if status != Some("1") {
        let message = response
            .get("result")
            .and_then(Value::as_str)
            .or_else(|| response.get("message").and_then(Value::as_str))
            .unwrap_or("unknown explorer error")
            .to_string();
        return Err(ExplorerError::Api { message });
    }
    response
        .get("result")
        .cloned()
        .ok_or_else(|| ExplorerError::UnexpectedResponse("envelope without result".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_success() {
        let response = json!({"status": "1", "message": "OK", "result": "12345"});
        assert_eq!(unwrap_envelope(response).unwrap(), json!("12345"));
    }

    #[test]
    fn test_envelope_error_carries_result_text() {
        let response = json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Contract source code not verified"
        });
        match unwrap_envelope(response) {
            Err(ExplorerError::Api { message }) => {
                assert_eq!(message, "Contract source code not verified");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_envelope_error_falls_back_to_message() {
        let response = json!({"status": "0", "message": "NOTOK", "result": []});
        match unwrap_envelope(response) {
            Err(ExplorerError::Api { message }) => assert_eq!(message, "NOTOK"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_chain() {
        let result = ExplorerClient::new(31_337, None, Duration::from_secs(5));
        assert!(matches!(
            result,
            Err(ExplorerError::UnsupportedChain { chain_id: 31_337 })
        ));
    }
}

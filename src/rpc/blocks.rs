// SPDX-License-Identifier: Apache-2.0

//! Block header lookups.

use alloy_network::AnyNetwork;
use alloy_provider::{Provider, RootProvider};

use crate::errors::RpcError;

/// Fetch the timestamp of a specific block.
pub async fn block_timestamp(
    provider: &RootProvider<AnyNetwork>,
    block_number: u64,
) -> Result<u64, RpcError> {
    let block = provider
        .get_block_by_number(block_number.into())
        .await
        .map_err(|e| RpcError::get_block_failed(block_number, e))?
        .ok_or(RpcError::BlockNotFound { block_number })?;

    Ok(block.header.timestamp)
}

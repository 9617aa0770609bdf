// SPDX-License-Identifier: Apache-2.0

//! Proxy contract detection via the EIP-1967 implementation slot.
//!
//! Events on upgradeable proxies are declared in the implementation
//! contract's ABI, not the proxy's, so ABI lookups first check whether the
//! queried address stores an implementation pointer.

use alloy_network::AnyNetwork;
use alloy_primitives::{b256, Address, B256, U256};
use alloy_provider::{Provider, RootProvider};
use tracing::debug;

use crate::errors::RpcError;

/// `keccak256("eip1967.proxy.implementation") - 1`
const IMPLEMENTATION_SLOT: B256 =
    b256!("360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc");

/// Read the EIP-1967 implementation address stored at `address`.
///
/// Returns `None` when the slot is zero, i.e. the contract is not an
/// EIP-1967 proxy (or stores no implementation yet).
pub async fn implementation_address(
    provider: &RootProvider<AnyNetwork>,
    address: Address,
) -> Result<Option<Address>, RpcError> {
    let slot: U256 = provider
        .get_storage_at(address, IMPLEMENTATION_SLOT.into())
        .await
        .map_err(|e| RpcError::get_storage_failed(address.to_string(), e))?;

    if slot.is_zero() {
        return Ok(None);
    }
    let implementation = Address::from_word(B256::from(slot));
    debug!(proxy = %address, implementation = %implementation, "Resolved EIP-1967 proxy");
    Ok(Some(implementation))
}

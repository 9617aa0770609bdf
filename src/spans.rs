// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for etherlens operations.
//!
//! Telemetry lives here instead of `#[instrument]` attributes on the
//! operations themselves, so span names and fields can be reviewed in one
//! place:
//!
//! ```rust,ignore
//! pub async fn my_operation(&mut self, param: Type) -> Result<T> {
//!     let span = spans::my_operation(param_value);
//!     let _guard = span.enter();
//!     // Business logic here
//! }
//! ```

use alloy_primitives::Address;
use tracing::{Level, Span};

/// Span for a cached ABI lookup, including proxy resolution.
#[inline]
pub(crate) fn get_abi(address: Address, resolve_proxy: bool) -> Span {
    tracing::debug_span!(
        "etherlens.get_abi",
        address = %address,
        resolve_proxy = resolve_proxy,
    )
}

/// Span for a cached event query.
///
/// Parent: None (root span for this operation)
/// Children: fetch_sub_range spans (one per attempted sub-range)
#[inline]
pub(crate) fn get_events(address: Address, event: &str) -> Span {
    tracing::span!(
        Level::INFO,
        "etherlens.get_events",
        address = %address,
        event = event,
    )
}

/// Span for one `eth_getLogs` sub-range attempt.
#[inline]
pub(crate) fn fetch_sub_range(from_block: u64, to_block: u64) -> Span {
    tracing::trace_span!(
        "etherlens.fetch_sub_range",
        from_block = from_block,
        to_block = to_block,
    )
}

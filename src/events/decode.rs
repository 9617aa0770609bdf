// SPDX-License-Identifier: Apache-2.0

//! Dynamic event decoding against explorer-supplied ABIs.
//!
//! ABIs arrive at runtime as JSON from the block explorer, so decoding goes
//! through `alloy_dyn_abi` rather than compile-time `sol!` bindings. Decoded
//! logs are rendered as JSON records so they can flow straight into the
//! descriptor-addressed cache.

use alloy_dyn_abi::{DynSolValue, EventExt};
use alloy_json_abi::{Event, JsonAbi};
use alloy_primitives::hex;
use alloy_rpc_types::Log;
use serde_json::{json, Map, Value};

/// Parse an explorer ABI payload into a structured ABI.
pub fn parse_abi(abi: &Value) -> Result<JsonAbi, serde_json::Error> {
    serde_json::from_value(abi.clone())
}

/// Human-readable signatures of every event declared in the ABI, sorted by
/// event name, e.g. `Transfer(indexed address from,indexed address to,uint256 value)`.
#[must_use]
pub fn event_signatures(abi: &JsonAbi) -> Vec<String> {
    abi.events().map(render_signature).collect()
}

fn render_signature(event: &Event) -> String {
    let params: Vec<String> = event
        .inputs
        .iter()
        .map(|param| {
            if param.indexed {
                format!("indexed {} {}", param.ty, param.name)
            } else {
                format!("{} {}", param.ty, param.name)
            }
        })
        .collect();
    format!("{}({})", event.name, params.join(","))
}

/// Look up an event definition by name.
///
/// Overloaded events share a name; the first declaration wins, matching how
/// name-based lookups behave in most ABI tooling.
#[must_use]
pub fn find_event<'a>(abi: &'a JsonAbi, name: &str) -> Option<&'a Event> {
    abi.events.get(name).and_then(|overloads| overloads.first())
}

/// Decode one log against an event definition into a JSON record.
///
/// The record carries the event name, the decoded arguments by parameter
/// name, and the log's position fields (`blockNumber`, `transactionHash`,
/// `logIndex`) so downstream timestamp interpolation can locate it.
pub fn decode_log(event: &Event, log: &Log) -> Result<Value, alloy_dyn_abi::Error> {
    let decoded = event.decode_log_parts(
        log.inner.data.topics().iter().copied(),
        log.inner.data.data.as_ref(),
    )?;

    // Indexed and non-indexed values decode into separate lists; zip them
    // back together in declaration order.
    let mut indexed = decoded.indexed.into_iter();
    let mut body = decoded.body.into_iter();
    let mut args = Map::new();
    for param in &event.inputs {
        let value = if param.indexed {
            indexed.next()
        } else {
            body.next()
        };
        if let Some(value) = value {
            args.insert(param.name.clone(), sol_value_to_json(&value));
        }
    }

    Ok(json!({
        "event": event.name,
        "args": Value::Object(args),
        "address": log.inner.address.to_string(),
        "blockNumber": log.block_number,
        "transactionHash": log.transaction_hash.map(|h| h.to_string()),
        "logIndex": log.log_index,
    }))
}

/// Render a decoded Solidity value as JSON.
///
/// Numbers that fit in 64 bits stay numeric; wider values fall back to
/// decimal strings so nothing loses precision in transit.
fn sol_value_to_json(value: &DynSolValue) -> Value {
    match value {
        DynSolValue::Bool(b) => json!(b),
        DynSolValue::Uint(u, _) => match u64::try_from(*u) {
            Ok(n) => json!(n),
            Err(_) => json!(u.to_string()),
        },
        DynSolValue::Int(i, _) => match i64::try_from(*i) {
            Ok(n) => json!(n),
            Err(_) => json!(i.to_string()),
        },
        DynSolValue::Address(a) => json!(a.to_string()),
        DynSolValue::FixedBytes(b, size) => json!(hex::encode_prefixed(&b[..*size])),
        DynSolValue::Bytes(b) => json!(hex::encode_prefixed(b)),
        DynSolValue::Function(f) => json!(hex::encode_prefixed(f)),
        DynSolValue::String(s) => json!(s),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            Value::Array(items.iter().map(sol_value_to_json).collect())
        }
        _ => Value::Null,
    }
}

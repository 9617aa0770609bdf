// SPDX-License-Identifier: Apache-2.0

//! Adaptive block-range fetching with timestamp interpolation.
//!
//! Providers cap `eth_getLogs` queries inconsistently (by block count, by
//! result count, by response size) and rarely advertise the cap. Instead of
//! guessing a safe chunk size up front, [`fetch_range`] starts with the whole
//! range and halves the chunk size every time the provider pushes back with a
//! transient error, converging on whatever the endpoint tolerates. The chunk
//! size never grows back within one call.

use std::future::Future;

use chrono::DateTime;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::RangeFetchError;

/// An inclusive block range with the timestamps of its boundary blocks.
///
/// The timestamps anchor the linear interpolation that estimates when each
/// fetched record was mined, without one header lookup per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    /// First block of the range (inclusive)
    pub from_block: u64,
    /// Last block of the range (inclusive)
    pub to_block: u64,
    /// Unix timestamp of `from_block`
    pub from_timestamp: u64,
    /// Unix timestamp of `to_block`
    pub to_timestamp: u64,
}

/// Fetch all records in `span`, adapting the sub-range size to the provider.
///
/// `fetch` is called with inclusive sub-range bounds `(from, to)` and returns
/// the records for that sub-range. Sub-ranges are issued sequentially in
/// increasing block order and never overlap, so the concatenated result
/// preserves chain order whenever `fetch` does.
///
/// A [`RangeFetchError::Transient`] from `fetch` halves the current chunk
/// size and retries the same cursor; any other error propagates immediately.
/// Each record that carries a numeric `blockNumber` field gains
/// `estimatedTimestamp` and `estimatedDate` fields interpolated from the
/// span's boundary timestamps.
///
/// # Errors
///
/// - [`RangeFetchError::ChunkExhausted`] when halving reaches zero, including
///   the degenerate single-block span whose initial chunk size is already
///   zero.
/// - Any non-transient error from `fetch`, unchanged.
pub async fn fetch_range<F, Fut>(span: BlockSpan, mut fetch: F) -> Result<Vec<Value>, RangeFetchError>
where
    F: FnMut(u64, u64) -> Fut,
    Fut: Future<Output = Result<Vec<Value>, RangeFetchError>>,
{
    let Some(mut chunk_size) = span.to_block.checked_sub(span.from_block) else {
        return Err(RangeFetchError::Fatal {
            from_block: span.from_block,
            to_block: span.to_block,
            source: format!(
                "inverted range: from_block {} > to_block {}",
                span.from_block, span.to_block
            )
            .into(),
        });
    };

    let mut records = Vec::new();
    let mut cursor = span.from_block;

    while cursor <= span.to_block {
        if chunk_size == 0 {
            return Err(RangeFetchError::ChunkExhausted {
                from_block: span.from_block,
                to_block: span.to_block,
                cursor,
            });
        }

        let sub_to = span.to_block.min(cursor + chunk_size);
        match fetch(cursor, sub_to).await {
            Ok(batch) => {
                debug!(
                    from = cursor,
                    to = sub_to,
                    records = batch.len(),
                    "Fetched sub-range"
                );
                records.extend(batch);
                cursor = sub_to + 1;
            }
            Err(RangeFetchError::Transient {
                from_block,
                to_block,
                reason,
            }) => {
                chunk_size /= 2;
                warn!(
                    from = from_block,
                    to = to_block,
                    reason = %reason,
                    new_chunk_size = chunk_size,
                    "Transient fetch failure, halving chunk size"
                );
            }
            Err(other) => return Err(other),
        }
    }

    annotate_timestamps(&mut records, &span);
    debug!(
        from = span.from_block,
        to = span.to_block,
        total_records = records.len(),
        "Finished range fetch"
    );
    Ok(records)
}

/// Attach `estimatedTimestamp`/`estimatedDate` to records with a numeric
/// `blockNumber`, by linear interpolation over the span's boundary
/// timestamps. Records without one pass through untouched.
fn annotate_timestamps(records: &mut [Value], span: &BlockSpan) {
    // The caller rejects single-block spans, so the denominator is nonzero.
    let block_delta = (span.to_block - span.from_block) as f64;
    let time_delta = span.to_timestamp as f64 - span.from_timestamp as f64;

    for record in records.iter_mut() {
        let Some(map) = record.as_object_mut() else {
            continue;
        };
        let Some(block_number) = map.get("blockNumber").and_then(Value::as_u64) else {
            continue;
        };

        let position = (block_number.saturating_sub(span.from_block)) as f64 / block_delta;
        let estimated = (span.from_timestamp as f64 + position * time_delta) as i64;
        map.insert("estimatedTimestamp".to_string(), json!(estimated));
        if let Some(date) = DateTime::from_timestamp(estimated, 0) {
            map.insert("estimatedDate".to_string(), json!(date.to_rfc3339()));
        }
    }
}

// SPDX-License-Identifier: Apache-2.0

//! Contract event retrieval: adaptive range fetching and dynamic decoding.

pub mod decode;
pub mod range;

pub use decode::{decode_log, event_signatures, find_event, parse_abi};
pub use range::{fetch_range, BlockSpan};

// SPDX-License-Identifier: Apache-2.0

//! Block-explorer integration: ABI retrieval and timestamp-to-block lookup.

pub mod block_ref;
pub mod client;
pub mod networks;

pub use block_ref::BlockRef;
pub use client::{Closest, ExplorerClient};

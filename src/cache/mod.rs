// SPDX-License-Identifier: Apache-2.0

//! Descriptor-addressed caching for fetched chain data.
//!
//! Request descriptors (arbitrary JSON) are canonicalized into deterministic
//! string keys by [`key`], then served through two tiers: a process-local
//! [`MemoryCache`] and a SQLite-backed [`PersistentCache`], coordinated by
//! [`LayeredCache`] with read-through fetch on a full miss.

pub mod key;
pub mod layered;
pub mod memory;
pub mod persistent;

pub use key::{cache_key, canonicalize};
pub use layered::LayeredCache;
pub use memory::MemoryCache;
pub use persistent::PersistentCache;

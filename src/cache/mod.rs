//! Generic in-memory caching layer for reference collections.
//!
//! This module provides a domain-agnostic cache that:
//! - Keeps one entry per key, each with its own freshness window
//! - Serves fresh entries without touching the network (stale-while-valid)
//! - Coalesces concurrent lookups for a key into a single fetch
//! - Drops responses from fetches that were superseded by a later one
//! - Keeps the last good value when a refetch fails

mod clock;
mod store;
mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{CacheOptions, CacheStore, Fetcher, DEFAULT_FRESHNESS};
pub use traits::{CacheKey, EntryState, FetchError, Snapshot};

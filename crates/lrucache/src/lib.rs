//! # lrucache
//!
//! Bounded key-value cache with least-recently-used eviction.
//!
//! ## Architecture
//! - **HashMap**: AHash index from key to list handle (O(1))
//! - **Recency list**: `recencylist::RecencyList`, front is most recently used
//! - **SharedCache**: single `parking_lot` mutex for multi-threaded callers
//!
//! Both `get` and `set` count as a use. Once a set pushes the cache over
//! capacity, the back of the list is evicted.

#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod lru;
mod stats;

pub use cache::SharedCache;
pub use config::{CacheConfig, CAPACITY_ENV, DEFAULT_CAPACITY};
pub use error::{Error, Result};
pub use lru::{LruCache, SetOutcome};
pub use stats::{CacheStats, StatsSnapshot};

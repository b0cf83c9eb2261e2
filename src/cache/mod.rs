//! Cache Module
//!
//! Provides in-memory bucketed caching with TTL expiration and size-bounded
//! LRU eviction.

mod bucket;
mod engine;
mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use bucket::BucketIndex;
pub use engine::CacheEngine;
pub use entry::{approximate_size, CacheEntry};
pub use lru::LruList;
pub use stats::{CacheStats, StatsSnapshot};
pub use store::{CacheStore, Lookup};

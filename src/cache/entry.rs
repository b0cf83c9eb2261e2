//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached value together with its composite key and metadata.
///
/// The entry carries its own `(bucket, key)` so that an entry reached from
/// the recency list (e.g. the LRU tail during eviction) can be unlinked from
/// the index without a reverse lookup.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Bucket (namespace) the entry lives in
    pub bucket: String,
    /// Key within the bucket
    pub key: String,
    /// The stored value
    pub value: String,
    /// Absolute expiration instant
    pub expires_at: Instant,
    /// Approximate size in bytes: bucket + key + value
    pub size: usize,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry that expires `ttl` from now.
    pub fn new(bucket: String, key: String, value: String, ttl: Duration) -> Self {
        let size = approximate_size(&bucket, &key, &value);
        let now = Instant::now();
        let expires_at = now.checked_add(ttl).unwrap_or_else(far_future);

        Self {
            bucket,
            key,
            value,
            expires_at,
            size,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration instant, so a zero TTL expires immediately.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a caller-supplied clock
    /// reading, so a sweep can use one `now` for the whole pass.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

// == Utility Functions ==
/// Approximate footprint of an entry: the byte lengths of bucket, key and value.
pub fn approximate_size(bucket: &str, key: &str, value: &str) -> usize {
    bucket
        .len()
        .saturating_add(key.len())
        .saturating_add(value.len())
}

/// An instant far enough ahead to stand in for "never" when `now + ttl`
/// overflows the platform clock.
fn far_future() -> Instant {
    // ~30 years; Instant has no MAX constant.
    Instant::now() + Duration::from_secs(60 * 60 * 24 * 365 * 30)
}

//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::StatsSnapshot;

/// Response body for a successful read
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// Bucket the key was read from
    pub bucket: String,
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for a successful store
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// Bucket the key was stored in
    pub bucket: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        let bucket = bucket.into();
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully in bucket '{}'", key, bucket),
            bucket,
            key,
        }
    }
}

/// Response body for a successful delete
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// Bucket the key was removed from
    pub bucket: String,
    /// The key that was deleted
    pub key: String,
    /// The value the key held
    pub value: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        let bucket = bucket.into();
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully from bucket '{}'", key, bucket),
            bucket,
            key,
            value: value.into(),
        }
    }
}

/// Response body for a bucket count (`GET /buckets/:bucket`)
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    pub bucket: String,
    /// Keys currently indexed in the bucket
    pub count: usize,
}

impl CountResponse {
    pub fn new(bucket: impl Into<String>, count: usize) -> Self {
        Self {
            bucket: bucket.into(),
            count,
        }
    }
}

/// Response body for bucket and global clears
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl ClearResponse {
    /// Clear of a single bucket
    pub fn bucket(bucket: &str, removed: usize) -> Self {
        Self {
            message: format!("Bucket '{}' cleared", bucket),
            removed,
        }
    }

    /// Clear of every bucket
    pub fn all(removed: usize) -> Self {
        Self {
            message: "All buckets cleared".to_string(),
            removed,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of size-driven evictions
    pub evictions: u64,
    /// Number of TTL expirations
    pub expirations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Current aggregate size in bytes
    pub total_size: usize,
    /// Current number of non-empty buckets
    pub buckets: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<StatsSnapshot> for StatsResponse {
    fn from(stats: StatsSnapshot) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            total_size: stats.total_size,
            buckets: stats.buckets,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET / and GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

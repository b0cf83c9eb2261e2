//! Configuration Module
//!
//! Handles loading server configuration from command-line flags and
//! environment variables, and normalizing the cache engine's construction
//! parameters.

use std::time::Duration;

use clap::Parser;

// == Defaults ==
/// Default TTL in seconds (one hour)
pub const DEFAULT_TTL_SECS: i64 = 60 * 60;
/// Default sweep interval in seconds
pub const DEFAULT_CLEANUP_INTERVAL_SECS: i64 = 300;
/// Bucket used by the `/keys/*` routes
pub const DEFAULT_BUCKET: &str = "__root__";
/// Smallest sweep interval the raw configuration accepts
pub const MIN_CLEANUP_INTERVAL: Duration = Duration::from_secs(1);
/// Largest sweep interval; longer intervals are clamped to one day
pub const MAX_CLEANUP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Server configuration parameters.
///
/// Every value can be given as a flag or through its environment variable;
/// a flag wins over the environment. Sizes and durations are kept signed and
/// raw here; [`Config::engine_settings`] applies the engine's normalization
/// rules.
///
/// | flag                 | environment              | default    |
/// |----------------------|--------------------------|------------|
/// | `--max-entry-size`   | `CACHE_MAX_ENTRY_SIZE`   | unbounded  |
/// | `--max-size`         | `CACHE_MAX_SIZE`         | unbounded  |
/// | `--ttl`              | `CACHE_TTL`              | 3600       |
/// | `--cleanup-interval` | `CACHE_CLEANUP_INTERVAL` | 300        |
/// | `--default-keyspace` | `CACHE_DEFAULT_BUCKET`   | `__root__` |
/// | `--host`             | `SERVER_HOST`            | 0.0.0.0    |
/// | `--port`             | `SERVER_PORT`            | 42069      |
/// | `--log-level`        | `LOG_LEVEL`              | info       |
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Maximum value size in bytes; non-positive means unbounded
    #[arg(long, env = "CACHE_MAX_ENTRY_SIZE", default_value_t = 0, allow_negative_numbers = true)]
    pub max_entry_size: i64,

    /// Maximum aggregate cache size in bytes; non-positive means unbounded
    #[arg(long, env = "CACHE_MAX_SIZE", default_value_t = 0, allow_negative_numbers = true)]
    pub max_size: i64,

    /// Default TTL in seconds
    #[arg(long, env = "CACHE_TTL", default_value_t = DEFAULT_TTL_SECS, allow_negative_numbers = true)]
    pub ttl: i64,

    /// Background sweep interval in seconds
    #[arg(
        long,
        env = "CACHE_CLEANUP_INTERVAL",
        default_value_t = DEFAULT_CLEANUP_INTERVAL_SECS,
        allow_negative_numbers = true
    )]
    pub cleanup_interval: i64,

    /// Bucket used when a route carries only a key
    #[arg(long = "default-keyspace", env = "CACHE_DEFAULT_BUCKET", default_value = DEFAULT_BUCKET)]
    pub default_bucket: String,

    /// HTTP bind host
    #[arg(long = "host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub server_host: String,

    /// HTTP server port
    #[arg(long = "port", env = "SERVER_PORT", default_value_t = 42069)]
    pub server_port: u16,

    /// Default log level for this crate when `RUST_LOG` is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Normalized engine parameters derived from this configuration.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings::from_raw(
            self.max_entry_size,
            self.max_size,
            self.ttl,
            self.cleanup_interval,
        )
    }

    /// `host:port` to bind the HTTP listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entry_size: 0,
            max_size: 0,
            ttl: DEFAULT_TTL_SECS,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL_SECS,
            default_bucket: DEFAULT_BUCKET.to_string(),
            server_host: "0.0.0.0".to_string(),
            server_port: 42069,
            log_level: "info".to_string(),
        }
    }
}

// == Engine Settings ==
/// Construction parameters of the cache engine, already normalized.
///
/// Only obtainable through the constructors, which guarantee:
/// - `max_entry_size` and `max_size` are `usize::MAX` when unbounded
/// - `max_size >= max_entry_size`, so one maximal entry always fits
/// - `cleanup_interval` is non-zero and at most [`MAX_CLEANUP_INTERVAL`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    max_entry_size: usize,
    max_size: usize,
    ttl: Duration,
    cleanup_interval: Duration,
}

impl EngineSettings {
    /// Builds settings from typed values; `None` or zero sizes mean unbounded.
    ///
    /// Sub-second intervals are kept; a zero interval becomes
    /// [`MIN_CLEANUP_INTERVAL`].
    pub fn new(
        max_entry_size: Option<usize>,
        max_size: Option<usize>,
        ttl: Duration,
        cleanup_interval: Duration,
    ) -> Self {
        let max_entry_size = bounded_or_max(max_entry_size);
        let max_size = bounded_or_max(max_size).max(max_entry_size);

        Self {
            max_entry_size,
            max_size,
            ttl,
            cleanup_interval: normalize_interval(cleanup_interval),
        }
    }

    /// Builds settings from signed raw values (bytes and seconds).
    ///
    /// Non-positive sizes become unbounded, a negative TTL becomes zero and a
    /// non-positive interval becomes one second.
    pub fn from_raw(max_entry_size: i64, max_size: i64, ttl_secs: i64, cleanup_secs: i64) -> Self {
        let size = |raw: i64| usize::try_from(raw).ok().filter(|&v| v > 0);
        let secs = |raw: i64| Duration::from_secs(u64::try_from(raw).unwrap_or(0));

        Self::new(
            size(max_entry_size),
            size(max_size),
            secs(ttl_secs),
            secs(cleanup_secs),
        )
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    // == Accessors ==
    /// Largest admissible value, in bytes.
    pub fn max_entry_size(&self) -> usize {
        self.max_entry_size
    }

    /// Aggregate size budget, in bytes.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn cleanup_interval(&self) -> Duration {
        self.cleanup_interval
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_raw(0, 0, DEFAULT_TTL_SECS, DEFAULT_CLEANUP_INTERVAL_SECS)
    }
}

fn bounded_or_max(limit: Option<usize>) -> usize {
    match limit {
        Some(0) | None => usize::MAX,
        Some(limit) => limit,
    }
}

fn normalize_interval(interval: Duration) -> Duration {
    if interval.is_zero() {
        MIN_CLEANUP_INTERVAL
    } else {
        interval.min(MAX_CLEANUP_INTERVAL)
    }
}

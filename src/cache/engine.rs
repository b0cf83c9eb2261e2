//! Cache Engine Module
//!
//! Thread-safe front of the cache: one reader/writer lock around the whole
//! [`CacheStore`], shared statistics, and the lifecycle of the TTL sweeper.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::info;

use crate::cache::{CacheStats, CacheStore, Lookup, StatsSnapshot};
use crate::config::EngineSettings;
use crate::error::Result;
use crate::tasks::Sweeper;

// == Cache Engine ==
/// In-memory bucketed key/value cache with LRU size eviction and TTL expiry.
///
/// All structural state sits behind a single `RwLock`. Every mutation,
/// including the recency promotion of a cache hit, takes the write lock for
/// its whole duration; only probes and counters use the read lock.
///
/// Constructing an engine spawns its sweeper, so it must happen inside a
/// Tokio runtime. Call [`stop`](Self::stop) to halt the sweeper
/// deterministically; dropping the engine also ends it.
#[derive(Debug)]
pub struct CacheEngine {
    store: Arc<RwLock<CacheStore>>,
    stats: Arc<CacheStats>,
    sweeper: Mutex<Option<Sweeper>>,
    settings: EngineSettings,
}

impl CacheEngine {
    // == Constructor ==
    /// Creates an empty cache and starts its background sweeper.
    pub fn new(settings: EngineSettings) -> Self {
        let store = Arc::new(RwLock::new(CacheStore::new(&settings)));
        let stats = Arc::new(CacheStats::new());
        let sweeper = Sweeper::spawn(store.clone(), stats.clone(), settings.cleanup_interval());
        info!("Cache engine started");

        Self {
            store,
            stats,
            sweeper: Mutex::new(Some(sweeper)),
            settings,
        }
    }

    // == Get ==
    /// Returns the value stored under `(bucket, key)`.
    ///
    /// Misses are answered under the read lock. A probe hit escalates to the
    /// write lock, where the key is resolved again from scratch: between the
    /// two locks another caller or the sweeper may have removed or replaced
    /// the entry, so the handle seen under the read lock is never reused.
    /// Under the write lock an expired entry is removed, a live one is moved
    /// to MRU. The TTL is not extended.
    pub fn get(&self, bucket: &str, key: &str) -> Option<String> {
        if self.store.read().probe(bucket, key).is_none() {
            self.stats.record_miss();
            return None;
        }

        let lookup = self.store.write().get(bucket, key);
        match lookup {
            Lookup::Hit(value) => {
                self.stats.record_hit();
                Some(value)
            }
            Lookup::Expired => {
                self.stats.record_miss();
                self.stats.record_expirations(1);
                None
            }
            Lookup::Missing => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `(bucket, key)` with the default TTL.
    ///
    /// An existing entry for the key is always removed first. If the value is
    /// larger than the max entry size nothing is stored and
    /// [`CacheError::EntryTooLarge`](crate::error::CacheError::EntryTooLarge)
    /// is returned, leaving the key absent.
    pub fn set(
        &self,
        bucket: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let evicted = self.store.write().set(bucket.into(), key.into(), value.into())?;
        self.stats.record_evictions(evicted);
        Ok(())
    }

    // == Delete ==
    /// Removes the entry and returns its last value.
    ///
    /// An entry whose TTL already elapsed is removed but reported as absent.
    pub fn delete(&self, bucket: &str, key: &str) -> Option<String> {
        let mut store = self.store.write();
        let had_entry = store.probe(bucket, key).is_some();
        let value = store.delete(bucket, key);
        drop(store);

        if had_entry && value.is_none() {
            self.stats.record_expirations(1);
        }
        value
    }

    // == Clear ==
    /// Removes every entry of `bucket`. Unknown buckets are a no-op.
    pub fn clear(&self, bucket: &str) -> usize {
        self.store.write().clear(bucket)
    }

    // == Clear All ==
    /// Removes every entry of every bucket.
    pub fn clear_all(&self) -> usize {
        self.store.write().clear_all()
    }

    // == Count ==
    /// Number of keys indexed under `bucket`.
    ///
    /// Entries are not expiration-checked, so keys that expired but were not
    /// yet swept or read are still counted.
    pub fn count(&self, bucket: &str) -> usize {
        self.store.read().count(bucket)
    }

    // == Introspection ==
    /// Number of live entries across all buckets.
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    /// Aggregate approximate size of all entries, in bytes.
    pub fn size(&self) -> usize {
        self.store.read().size()
    }

    /// Normalized settings the engine was built with.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Current statistics.
    pub fn stats(&self) -> StatsSnapshot {
        let store = self.store.read();
        self.stats
            .snapshot(store.len(), store.size(), store.bucket_count())
    }

    // == Lifecycle ==
    /// Stops the background sweeper and waits for it to exit.
    ///
    /// Idempotent; the cache itself stays usable, only periodic expiry ends.
    pub async fn stop(&self) {
        let sweeper = self.sweeper.lock().take();
        if let Some(sweeper) = sweeper {
            sweeper.stop().await;
            info!("Cache engine stopped");
        }
    }

    /// Returns true while the sweeper is running.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .lock()
            .as_ref()
            .is_some_and(|sweeper| !sweeper.is_finished())
    }
}

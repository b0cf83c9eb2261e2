//! Cache Store Module
//!
//! The single state bundle behind the engine: recency list, bucket index and
//! size accounting. Nothing here is synchronized; [`CacheEngine`] wraps a
//! store in a lock and decides which mode each operation needs.
//!
//! [`CacheEngine`]: crate::cache::CacheEngine

use std::time::{Duration, Instant};

use generational_arena::Index;
use tracing::debug;

use crate::cache::{BucketIndex, CacheEntry, LruList};
use crate::config::EngineSettings;
use crate::error::{CacheError, Result};

// == Lookup ==
/// Result of a key lookup that is allowed to mutate the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Live entry; it has been promoted to MRU.
    Hit(String),
    /// The entry had expired and was removed by this lookup.
    Expired,
    /// No entry under this key.
    Missing,
}

// == Cache Store ==
/// Size-bounded LRU storage with per-entry TTL and bucket namespaces.
#[derive(Debug)]
pub struct CacheStore {
    /// Recency ordering, MRU at the head
    lru: LruList<CacheEntry>,
    /// (bucket, key) → recency list handle
    index: BucketIndex,
    /// Sum of all live entries' sizes
    current_size: usize,
    /// Largest admissible value, in bytes
    max_entry_size: usize,
    /// Aggregate size budget, in bytes
    max_size: usize,
    /// TTL applied to every stored entry
    ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store using already normalized settings.
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            lru: LruList::new(),
            index: BucketIndex::new(),
            current_size: 0,
            max_entry_size: settings.max_entry_size(),
            max_size: settings.max_size(),
            ttl: settings.ttl(),
        }
    }

    // == Probe ==
    /// Read-only lookup of the entry's handle.
    ///
    /// Does not check expiration or touch recency, so it only needs shared
    /// access. The returned handle must be re-resolved under exclusive
    /// access before anything is mutated.
    pub fn probe(&self, bucket: &str, key: &str) -> Option<Index> {
        self.index.get(bucket, key)
    }

    // == Get ==
    /// Looks up an entry, removing it if expired and promoting it otherwise.
    ///
    /// The TTL is never extended by a read.
    pub fn get(&mut self, bucket: &str, key: &str) -> Lookup {
        let Some(index) = self.index.get(bucket, key) else {
            return Lookup::Missing;
        };

        let expired = match self.lru.get(index) {
            Some(entry) => entry.is_expired(),
            None => return Lookup::Missing,
        };
        if expired {
            self.remove_at(index);
            return Lookup::Expired;
        }

        self.lru.move_to_front(index);
        match self.lru.get(index) {
            Some(entry) => Lookup::Hit(entry.value.clone()),
            None => Lookup::Missing,
        }
    }

    // == Set ==
    /// Stores `value` under `(bucket, key)` with the configured TTL.
    ///
    /// Any existing entry for the key is removed first, so an oversized value
    /// leaves the key empty and returns [`CacheError::EntryTooLarge`].
    /// Otherwise LRU entries are evicted until the size budget holds again;
    /// the number of evicted entries is returned.
    pub fn set(&mut self, bucket: String, key: String, value: String) -> Result<usize> {
        if let Some(index) = self.index.get(&bucket, &key) {
            self.remove_at(index);
        }

        if value.len() > self.max_entry_size {
            debug!(
                bucket = %bucket,
                key = %key,
                size = value.len(),
                max = self.max_entry_size,
                "Rejected oversized entry"
            );
            return Err(CacheError::EntryTooLarge {
                size: value.len(),
                max: self.max_entry_size,
            });
        }

        let entry = CacheEntry::new(bucket, key, value, self.ttl);
        self.current_size = self.current_size.saturating_add(entry.size);

        let index = self.lru.push_front(entry);
        if let Some(entry) = self.lru.get(index) {
            self.index.insert(&entry.bucket, &entry.key, index);
        }

        Ok(self.enforce_size_limit())
    }

    // == Delete ==
    /// Removes an entry and returns its value.
    ///
    /// An entry that has already expired is still removed, but reported as
    /// absent, the same way [`get`](Self::get) would.
    pub fn delete(&mut self, bucket: &str, key: &str) -> Option<String> {
        let index = self.index.get(bucket, key)?;
        let entry = self.remove_at(index)?;
        if entry.is_expired() {
            None
        } else {
            Some(entry.value)
        }
    }

    // == Clear ==
    /// Removes every entry of one bucket, returning how many were removed.
    pub fn clear(&mut self, bucket: &str) -> usize {
        let handles = self.index.take_bucket(bucket);
        let mut removed = 0;
        for index in handles {
            if let Some(entry) = self.lru.remove(index) {
                self.current_size -= entry.size;
                removed += 1;
            }
        }
        removed
    }

    // == Clear All ==
    /// Drops every entry in every bucket, returning how many were dropped.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.lru.len();
        self.lru.clear();
        self.index.clear();
        self.current_size = 0;
        removed
    }

    // == Count ==
    /// Number of keys indexed under the bucket, expired-but-unswept included.
    pub fn count(&self, bucket: &str) -> usize {
        self.index.count(bucket)
    }

    // == Cleanup Expired ==
    /// Removes every expired entry, walking from the LRU tail.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired = self.lru.remove_where(|entry| entry.is_expired_at(now));

        for entry in &expired {
            self.index.remove(&entry.bucket, &entry.key);
            self.current_size -= entry.size;
        }

        expired.len()
    }

    // == Accessors ==
    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.lru.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lru.is_empty()
    }

    /// Aggregate approximate size of all live entries, in bytes.
    pub fn size(&self) -> usize {
        self.current_size
    }

    /// Number of non-empty buckets.
    pub fn bucket_count(&self) -> usize {
        self.index.bucket_count()
    }

    // == Internals ==
    /// Evicts from the LRU tail until the aggregate size fits the budget.
    fn enforce_size_limit(&mut self) -> usize {
        let mut evicted = 0;
        while self.current_size > self.max_size {
            let Some(entry) = self.lru.pop_back() else {
                break;
            };
            self.index.remove(&entry.bucket, &entry.key);
            self.current_size -= entry.size;
            evicted += 1;
            debug!(bucket = %entry.bucket, key = %entry.key, "Evicted LRU entry");
        }
        evicted
    }

    /// Unlinks an entry from the list and the index and releases its size.
    fn remove_at(&mut self, index: Index) -> Option<CacheEntry> {
        let entry = self.lru.remove(index)?;
        self.index.remove(&entry.bucket, &entry.key);
        self.current_size -= entry.size;
        Some(entry)
    }

    /// Panics unless the list, the index and the size total agree.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        assert_eq!(self.lru.len(), self.index.len(), "list and index disagree");

        let mut total = 0;
        for entry in self.lru.iter() {
            let index = self
                .index
                .get(&entry.bucket, &entry.key)
                .expect("listed entry missing from index");
            let indexed = self.lru.get(index).expect("index points at a dead node");
            assert_eq!(indexed.bucket, entry.bucket);
            assert_eq!(indexed.key, entry.key);
            assert!(entry.value.len() <= self.max_entry_size);
            total += entry.size;
        }

        assert_eq!(total, self.current_size, "size total drifted");
        assert!(self.current_size <= self.max_size, "size budget exceeded");
    }
}

//! Bucket Index Module
//!
//! Maps `(bucket, key)` to the entry's handle in the recency list, grouped
//! per bucket so that counting and clearing a bucket never scan the whole
//! cache.

use std::collections::HashMap;

use generational_arena::Index;

// == Bucket Index ==
/// Two-level map: bucket → key → recency list handle.
///
/// A bucket is present only while it holds at least one key.
#[derive(Debug, Default)]
pub struct BucketIndex {
    buckets: HashMap<String, HashMap<String, Index>>,
    len: usize,
}

impl BucketIndex {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Lookup ==
    /// Returns the handle stored for the composite key.
    pub fn get(&self, bucket: &str, key: &str) -> Option<Index> {
        self.buckets.get(bucket)?.get(key).copied()
    }

    // == Insert ==
    /// Records a handle for the composite key, returning the one it replaced.
    pub fn insert(&mut self, bucket: &str, key: &str, index: Index) -> Option<Index> {
        let keys = match self.buckets.get_mut(bucket) {
            Some(keys) => keys,
            None => self.buckets.entry(bucket.to_string()).or_default(),
        };
        let previous = keys.insert(key.to_string(), index);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    // == Remove ==
    /// Forgets the composite key, dropping the bucket once it is empty.
    pub fn remove(&mut self, bucket: &str, key: &str) -> Option<Index> {
        let keys = self.buckets.get_mut(bucket)?;
        let removed = keys.remove(key);
        if keys.is_empty() {
            self.buckets.remove(bucket);
        }
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    // == Take Bucket ==
    /// Removes a whole bucket and returns the handles it held.
    pub fn take_bucket(&mut self, bucket: &str) -> Vec<Index> {
        match self.buckets.remove(bucket) {
            Some(keys) => {
                self.len -= keys.len();
                keys.into_values().collect()
            }
            None => Vec::new(),
        }
    }

    // == Counts ==
    /// Number of keys in the bucket; zero for unknown buckets.
    pub fn count(&self, bucket: &str) -> usize {
        self.buckets.get(bucket).map_or(0, HashMap::len)
    }

    /// Number of non-empty buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of indexed keys across all buckets.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
        self.len = 0;
    }
}

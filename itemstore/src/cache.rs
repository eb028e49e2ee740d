use core::num::NonZeroUsize;

use lru::LruCache;

use crate::error::StoreError;

/// A capacity-bounded map from absolute backend index to loaded item.
///
/// When a `put` grows the cache past its capacity, the least-recently-touched
/// entry is evicted; `get` refreshes recency, `contains` and iteration do not.
/// Overlay entries (locally added or modified items) are kept outside this
/// cache by the store, so capacity pressure can only evict rows that remain
/// re-fetchable from the backend.
///
/// No ordering is exposed beyond index-keyed lookup.
#[derive(Debug)]
pub struct ItemCache<T> {
    entries: LruCache<u64, T>,
}

impl<T> ItemCache<T> {
    /// Creates a cache bounded to `capacity` entries.
    ///
    /// A zero capacity is rejected: a capacity-limited cache that can hold
    /// nothing cannot serve the store contract.
    pub fn new(capacity: usize) -> Result<Self, StoreError> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or(StoreError::InvalidConfig("item cache capacity must be at least 1"))?;
        Ok(Self {
            entries: LruCache::new(capacity),
        })
    }

    /// Inserts or replaces the entry at `index`, returning the replaced item.
    ///
    /// May evict the least-recently-touched entry at a *different* index; the
    /// eviction is silent, matching the contract that evicted rows are simply
    /// re-fetched on their next access.
    pub fn put(&mut self, index: u64, item: T) -> Option<T> {
        self.entries.put(index, item)
    }

    /// Looks up the entry at `index`, refreshing its recency.
    pub fn get(&mut self, index: u64) -> Option<&T> {
        self.entries.get(&index)
    }

    /// Whether an entry is cached at `index`. Does not touch recency.
    pub fn contains(&self, index: u64) -> bool {
        self.entries.contains(&index)
    }

    pub fn remove(&mut self, index: u64) -> Option<T> {
        self.entries.pop(&index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Rebounds the cache. Shrinking below the current size evicts
    /// least-recently-touched entries down to the new bound immediately.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<(), StoreError> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or(StoreError::InvalidConfig("item cache capacity must be at least 1"))?;
        self.entries.resize(capacity);
        Ok(())
    }

    /// Iterates over cached `(index, item)` pairs without touching recency.
    /// Iteration order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&u64, &T)> {
        self.entries.iter()
    }
}

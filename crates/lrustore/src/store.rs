//! LRU (Least Recently Used) store
//!
//! Combines an AHash key index with the arena-backed recency list so that
//! both `update` and `get` run in O(1).

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;

use ahash::RandomState;
use tracing::{debug, trace};

use crate::config::LruConfig;
use crate::error::Result;
use crate::list::{Iter, RecencyList};
use crate::stats::CacheStats;

/// Upper bound on slots reserved up front; larger stores grow on demand.
const MAX_PREALLOC: usize = 4096;

/// Fixed-capacity key-value store that evicts the least recently used entry
///
/// Both [`update`](Self::update) and [`get`](Self::get) count as a use and
/// move the entry to the most recently used position. The store is not
/// synchronized; callers sharing it between threads must wrap the whole store
/// in a lock.
pub struct LruStore<K, V> {
    /// Key -> arena slot of the entry holding that key
    index: HashMap<K, usize, RandomState>,

    /// Entries ordered from most to least recently used
    list: RecencyList<K, V>,

    /// Number of live entries
    len: usize,

    capacity: NonZeroUsize,

    stats: CacheStats,
}

impl<K, V> LruStore<K, V> {
    /// Create an empty store holding at most `capacity` entries
    pub fn new(capacity: NonZeroUsize) -> Self {
        let prealloc = capacity.get().min(MAX_PREALLOC);
        debug!(capacity = capacity.get(), "creating lru store");

        Self {
            index: HashMap::with_capacity_and_hasher(prealloc, RandomState::new()),
            list: RecencyList::with_capacity(prealloc),
            len: 0,
            capacity,
            stats: CacheStats::new(),
        }
    }

    /// Create an empty store, rejecting a zero capacity
    ///
    /// # Errors
    /// * [`Error::ZeroCapacity`](crate::Error::ZeroCapacity) if `capacity` is 0
    pub fn try_new(capacity: usize) -> Result<Self> {
        Self::from_config(&LruConfig::new(capacity))
    }

    /// Create an empty store from a config
    ///
    /// # Errors
    /// * [`Error::ZeroCapacity`](crate::Error::ZeroCapacity) if the configured
    ///   capacity is 0
    pub fn from_config(config: &LruConfig) -> Result<Self> {
        Ok(Self::new(config.validate()?))
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Get usage statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Iterate over entries from most to least recently used
    ///
    /// Iterating does not change the recency order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.list.iter(self.len)
    }

    /// Peek at the most recently used entry
    pub fn mru(&self) -> Option<(&K, &V)> {
        let entry = self.list.entry(self.list.head()?)?;
        Some((&entry.key, &entry.value))
    }

    /// Peek at the least recently used entry, the next one to be evicted
    pub fn lru(&self) -> Option<(&K, &V)> {
        let entry = self.list.entry(self.list.tail()?)?;
        Some((&entry.key, &entry.value))
    }

    /// Remove every entry, keeping the capacity and statistics
    pub fn clear(&mut self) {
        debug!(dropped = self.len, "clearing lru store");
        self.index.clear();
        self.list.clear();
        self.len = 0;
    }
}

impl<K, V> LruStore<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Insert or overwrite a value and mark it most recently used
    ///
    /// Inserting a new key into a full store evicts the least recently used
    /// entry.
    pub fn update(&mut self, key: K, value: V) {
        if let Some(&idx) = self.index.get(&key) {
            self.promote(idx);
            if let Some(entry) = self.list.entry_mut(idx) {
                entry.value = value;
            }
            self.stats.record_update();
            return;
        }

        let idx = self.list.alloc(key.clone(), value);
        self.list.prepend(idx);
        self.len += 1;
        self.index.insert(key, idx);
        self.stats.record_insert();

        self.trim();
    }

    /// Get a value and mark it most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.touch(key)?;
        self.list.entry(idx).map(|entry| &entry.value)
    }

    /// Get a mutable value and mark it most recently used
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.touch(key)?;
        self.list.entry_mut(idx).map(|entry| &mut entry.value)
    }

    /// Get a value without changing the recency order
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let &idx = self.index.get(key)?;
        self.list.entry(idx).map(|entry| &entry.value)
    }

    /// Check for a key without changing the recency order
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Remove a key from the store
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.index.remove(key)?;
        self.list.detach(idx);
        self.len -= 1;
        self.stats.record_removal();
        trace!(slot = idx, len = self.len, "removed entry");

        self.list.release(idx).map(|(_, value)| value)
    }

    /// Look up a key, record the hit or miss, and promote it on a hit.
    fn touch<Q>(&mut self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.index.get(key) {
            Some(&idx) => {
                self.stats.record_hit();
                self.promote(idx);
                Some(idx)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    fn promote(&mut self, idx: usize) {
        if self.list.head() == Some(idx) {
            return;
        }
        self.list.detach(idx);
        self.list.prepend(idx);
    }

    /// Evict from the tail until the store is back within capacity.
    fn trim(&mut self) {
        while self.len > self.capacity.get() {
            let Some(tail) = self.list.tail() else {
                break;
            };
            self.list.detach(tail);
            let Some((key, _)) = self.list.release(tail) else {
                break;
            };
            self.index.remove(&key);
            self.len -= 1;
            self.stats.record_eviction();
            trace!(slot = tail, len = self.len, "evicted least recently used entry");
        }
    }
}

impl<K, V> Extend<(K, V)> for LruStore<K, V>
where
    K: Hash + Eq + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.update(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a LruStore<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LruStore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

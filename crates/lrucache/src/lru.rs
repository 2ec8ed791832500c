//! LRU (Least Recently Used) cache implementation
//!
//! Keys map to handles in a recency list, so touches and evictions are O(1).

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use ahash::RandomState;
use recencylist::{ItemHandle, RecencyList};
use tracing::{debug, warn};

use crate::config::CacheConfig;

/// Upper bound on slots reserved up front; larger caches grow on demand
const PREALLOC_LIMIT: usize = 4096;

/// Payload stored in each list node
struct CacheItem<K, V> {
    key: K,
    value: V,
}

/// What a call to [`LruCache::insert`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome<K, V> {
    /// Key was present; its value was replaced in place
    Updated,

    /// Key was new and fit within capacity
    Inserted,

    /// Key was new and pushed out the least recently used entry
    Evicted {
        /// Key of the evicted entry
        key: K,
        /// Value of the evicted entry
        value: V,
    },
}

impl<K, V> SetOutcome<K, V> {
    /// Check whether the key was already in the cache
    pub fn was_present(&self) -> bool {
        matches!(self, SetOutcome::Updated)
    }
}

/// LRU cache with fixed capacity
pub struct LruCache<K, V> {
    map: HashMap<K, ItemHandle, RandomState>,
    queue: RecencyList<CacheItem<K, V>>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache with the given capacity
    ///
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        if capacity == 0 {
            warn!("cache capacity 0, using 1");
        }
        let capacity = capacity.max(1);
        let reserved = capacity.min(PREALLOC_LIMIT);

        Self {
            map: HashMap::with_capacity_and_hasher(reserved, RandomState::new()),
            queue: RecencyList::with_capacity(reserved),
            capacity,
        }
    }

    /// Create a new LRU cache from a config
    pub fn with_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity())
    }

    /// Insert or update a key-value pair
    ///
    /// # Returns
    /// * `bool` - `true` if the key was already present
    pub fn set(&mut self, key: K, value: V) -> bool {
        self.insert(key, value).was_present()
    }

    /// Insert or update a key-value pair, reporting any eviction
    ///
    /// Capacity is enforced after the new entry is linked, so the entry
    /// just inserted is never the one evicted.
    pub fn insert(&mut self, key: K, value: V) -> SetOutcome<K, V> {
        if let Some(&handle) = self.map.get(&key) {
            if let Some(item) = self.queue.get_mut(handle) {
                item.value = value;
            }
            self.touch(handle);
            return SetOutcome::Updated;
        }

        let handle = self.queue.push_front(CacheItem {
            key: key.clone(),
            value,
        });
        self.map.insert(key, handle);

        if self.queue.len() <= self.capacity {
            return SetOutcome::Inserted;
        }

        match self.evict() {
            Some((key, value)) => SetOutcome::Evicted { key, value },
            None => SetOutcome::Inserted,
        }
    }

    /// Get a value from the cache, marking it most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = *self.map.get(key)?;
        self.touch(handle);
        self.queue.get(handle).map(|item| &item.value)
    }

    /// Get a mutable value from the cache, marking it most recently used
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = *self.map.get(key)?;
        self.touch(handle);
        self.queue.get_mut(handle).map(|item| &mut item.value)
    }

    /// Get a value without changing recency order
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = *self.map.get(key)?;
        self.queue.get(handle).map(|item| &item.value)
    }

    /// Check if a key is cached, without changing recency order
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Remove a key from the cache
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.map.remove(key)?;
        let removed = self.queue.try_remove(handle);
        debug_assert!(removed.is_ok(), "index out of sync with recency list");
        removed.ok().map(|item| item.value)
    }

    /// Get the current size of the cache
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Get the cache capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clear the cache (capacity is kept)
    pub fn clear(&mut self) {
        debug!(len = self.map.len(), "clearing lru cache");
        self.map.clear();
        self.queue.clear();
    }

    /// Iterate entries from most to least recently used, without touching them
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.queue.iter().map(|item| (&item.key, &item.value))
    }

    /// Iterate keys from most to least recently used
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Assert that the index and the recency list agree
    #[doc(hidden)]
    pub fn debug_validate_invariants(&self) {
        self.queue.debug_validate_invariants();
        assert_eq!(self.map.len(), self.queue.len(), "index and list sizes differ");
        assert!(self.queue.len() <= self.capacity, "cache over capacity");

        for (key, &handle) in &self.map {
            match self.queue.get(handle) {
                Some(item) => assert!(item.key == *key, "index points at the wrong node"),
                None => panic!("index holds a handle outside the list"),
            }
        }
    }

    fn touch(&mut self, handle: ItemHandle) {
        let moved = self.queue.try_move_to_front(handle);
        debug_assert!(moved.is_ok(), "index out of sync with recency list");
    }

    fn evict(&mut self) -> Option<(K, V)> {
        let item = self.queue.pop_back()?;
        self.map.remove(&item.key);
        debug!(len = self.map.len(), "evicted least recently used entry");
        Some((item.key, item.value))
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.map.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

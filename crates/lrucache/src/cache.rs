//! SharedCache: thread-safe handle around an LruCache

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::CacheConfig;
use crate::lru::LruCache;
use crate::stats::CacheStats;

/// LRU cache that can be shared between threads
///
/// One mutex guards the key index and the recency list together. Reads take
/// the same lock as writes because every `get` reorders the list. Clones
/// share the same cache and statistics.
pub struct SharedCache<K, V> {
    /// Index + recency list, always locked as a unit
    cache: Arc<Mutex<LruCache<K, V>>>,

    /// Cache statistics
    stats: Arc<CacheStats>,

    /// Effective capacity, fixed at construction
    capacity: usize,
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a new shared cache with the given capacity (0 is clamped to 1)
    pub fn new(capacity: usize) -> Self {
        Self::from_cache(LruCache::new(capacity))
    }

    /// Create a new shared cache from a config
    pub fn with_config(config: &CacheConfig) -> Self {
        Self::from_cache(LruCache::with_config(config))
    }

    fn from_cache(cache: LruCache<K, V>) -> Self {
        let capacity = cache.capacity();
        Self {
            cache: Arc::new(Mutex::new(cache)),
            stats: Arc::new(CacheStats::new()),
            capacity,
        }
    }

    /// Insert or update a value
    ///
    /// # Returns
    /// * `bool` - `true` if the key was already present
    pub fn set(&self, key: K, value: V) -> bool {
        let outcome = self.cache.lock().insert(key, value);
        self.stats.record_set(&outcome);
        outcome.was_present()
    }

    /// Get a copy of a cached value, marking it most recently used
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.cache.lock().get(key).cloned();
        self.stats.record_lookup(value.is_some());
        value
    }

    /// Check if a key is cached, without changing recency order
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.lock().contains(key)
    }

    /// Remove a key from the cache
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.lock().remove(key)
    }

    /// Run several operations under a single lock acquisition
    ///
    /// Nothing else can observe the cache between the steps in `f`.
    /// Statistics are not updated for work done here.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut LruCache<K, V>) -> R) -> R {
        let mut cache = self.cache.lock();
        f(&mut cache)
    }

    /// Clear the cache and its statistics
    pub fn clear(&self) {
        self.cache.lock().clear();
        self.stats.reset();
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get current cache size
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            stats: Arc::clone(&self.stats),
            capacity: self.capacity,
        }
    }
}

impl<K, V> fmt::Debug for SharedCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCache")
            .field("capacity", &self.capacity)
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}

//! Cache statistics tracking

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::lru::SetOutcome;

/// Live counters shared by every clone of a [`SharedCache`](crate::SharedCache)
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    updates: AtomicU64,
    evictions: AtomicU64,
}

impl CacheStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of a lookup
    pub fn record_lookup(&self, hit: bool) {
        let counter = if hit { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the result of a set
    ///
    /// An eviction counts as an insert too, since the new key was added.
    pub fn record_set<K, V>(&self, outcome: &SetOutcome<K, V>) {
        match outcome {
            SetOutcome::Updated => {
                self.updates.fetch_add(1, Ordering::Relaxed);
            }
            SetOutcome::Inserted => {
                self.inserts.fetch_add(1, Ordering::Relaxed);
            }
            SetOutcome::Evicted { .. } => {
                self.inserts.fetch_add(1, Ordering::Relaxed);
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Get total hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Get total misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Get total evictions
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Copy all counters at once
    ///
    /// Counters are read one by one, so a snapshot taken while other
    /// threads are working may mix slightly different moments.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits(),
            misses: self.misses(),
            inserts: self.inserts.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            evictions: self.evictions(),
        }
    }

    /// Reset all statistics
    pub fn reset(&self) {
        for counter in [
            &self.hits,
            &self.misses,
            &self.inserts,
            &self.updates,
            &self.evictions,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Point-in-time copy of [`CacheStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Lookups that found their key
    pub hits: u64,
    /// Lookups that did not
    pub misses: u64,
    /// Sets that added a new key
    pub inserts: u64,
    /// Sets that replaced an existing value
    pub updates: u64,
    /// Entries pushed out by capacity
    pub evictions: u64,
}

impl StatsSnapshot {
    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={} misses={} inserts={} updates={} evictions={} hit_ratio={:.3}",
            self.hits,
            self.misses,
            self.inserts,
            self.updates,
            self.evictions,
            self.hit_ratio()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_lookups() {
        let stats = CacheStats::new();

        stats.record_lookup(true);
        stats.record_lookup(true);
        stats.record_lookup(false);

        assert_eq!(stats.hits(), 2);
        assert_eq!(stats.misses(), 1);
        assert_eq!(stats.snapshot().hit_ratio(), 2.0 / 3.0);
    }

    #[test]
    fn test_stats_sets() {
        let stats = CacheStats::new();

        stats.record_set::<&str, i32>(&SetOutcome::Inserted);
        stats.record_set::<&str, i32>(&SetOutcome::Updated);
        stats.record_set(&SetOutcome::Evicted { key: "a", value: 1 });

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.inserts, 2);
        assert_eq!(snapshot.updates, 1);
        assert_eq!(snapshot.evictions, 1);
    }

    #[test]
    fn test_stats_reset() {
        let stats = CacheStats::new();

        stats.record_lookup(true);
        stats.record_lookup(false);
        stats.record_set::<u8, u8>(&SetOutcome::Inserted);
        stats.reset();

        assert_eq!(stats.snapshot(), StatsSnapshot::default());
        assert_eq!(stats.snapshot().hit_ratio(), 0.0);
    }

    #[test]
    fn test_snapshot_display() {
        let snapshot = StatsSnapshot {
            hits: 3,
            misses: 1,
            ..StatsSnapshot::default()
        };
        assert_eq!(
            snapshot.to_string(),
            "hits=3 misses=1 inserts=0 updates=0 evictions=0 hit_ratio=0.750"
        );
    }
}

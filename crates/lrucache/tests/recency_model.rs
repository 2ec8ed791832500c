// Randomized operation sequences checked against a plain VecDeque model.

use std::collections::VecDeque;

use lrucache::{LruCache, SetOutcome};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Reference LRU: front is most recently used
struct Model {
    entries: VecDeque<(u32, u32)>,
    capacity: usize,
}

impl Model {
    fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    fn take(&mut self, key: u32) -> Option<(u32, u32)> {
        let pos = self.entries.iter().position(|&(k, _)| k == key)?;
        self.entries.remove(pos)
    }

    fn set(&mut self, key: u32, value: u32) -> bool {
        let present = self.take(key).is_some();
        self.entries.push_front((key, value));
        if self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
        present
    }

    fn get(&mut self, key: u32) -> Option<u32> {
        let entry = self.take(key)?;
        self.entries.push_front(entry);
        Some(entry.1)
    }
}

fn snapshot(cache: &LruCache<u32, u32>) -> Vec<(u32, u32)> {
    cache.iter().map(|(&k, &v)| (k, v)).collect()
}

#[test]
fn random_operations_match_model() {
    for seed in 0..32u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let capacity = rng.gen_range(1..=8);
        let mut cache: LruCache<u32, u32> = LruCache::new(capacity);
        let mut model = Model::new(capacity);

        for _ in 0..500 {
            let key: u32 = rng.gen_range(0..16);
            match rng.gen_range(0..100) {
                0..=54 => {
                    let value: u32 = rng.gen();
                    assert_eq!(cache.set(key, value), model.set(key, value));
                }
                55..=94 => {
                    assert_eq!(cache.get(&key).copied(), model.get(key));
                }
                95..=98 => {
                    let removed = cache.remove(&key);
                    assert_eq!(removed, model.take(key).map(|(_, v)| v));
                }
                _ => {
                    cache.clear();
                    model.entries.clear();
                }
            }

            assert!(cache.len() <= capacity);
            assert_eq!(snapshot(&cache), Vec::from(model.entries.clone()));
            cache.debug_validate_invariants();
        }
    }
}

#[test]
fn only_the_newest_keys_survive_a_long_insert_run() {
    let capacity = 5;
    let mut cache = LruCache::new(capacity);

    for k in 0..100u32 {
        cache.set(k, k * 2);
    }

    let keys: Vec<u32> = cache.keys().copied().collect();
    assert_eq!(keys, vec![99, 98, 97, 96, 95]);
    for k in 0..95 {
        assert!(!cache.contains(&k));
    }
}

#[test]
fn get_refreshes_entry_against_later_inserts() {
    let capacity = 4;
    let mut cache = LruCache::new(capacity);
    for k in 0..capacity as u32 {
        cache.set(k, k);
    }

    // 0 is oldest; touching it makes 1 the next victim
    assert_eq!(cache.get(&0), Some(&0));
    for k in 100..(100 + capacity as u32 - 1) {
        cache.set(k, k);
    }
    assert!(cache.contains(&0));
    assert!(!cache.contains(&1));

    // One more insert with no touch in between pushes 0 out
    let outcome = cache.insert(200, 200);
    assert_eq!(outcome, SetOutcome::Evicted { key: 0, value: 0 });
}

#[test]
fn clear_then_refill_evicts_nothing() {
    let capacity = 3;
    let mut cache = LruCache::new(capacity);
    for k in 0..10u32 {
        cache.set(k, k);
    }

    cache.clear();
    for k in 0..10u32 {
        assert_eq!(cache.get(&k), None);
    }
    for k in 20..(20 + capacity as u32) {
        assert_eq!(cache.insert(k, k), SetOutcome::Inserted);
    }
    assert_eq!(cache.len(), capacity);
}

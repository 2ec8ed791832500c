// Multi-threaded access through SharedCache. Needs real threads, so it
// lives outside the crate.

use std::sync::{Arc, Barrier};
use std::thread;

use lrucache::SharedCache;
use rand::{rngs::StdRng, Rng, SeedableRng};

const OPS: u64 = 100_000;

#[test]
fn writer_and_reader_share_one_cache() {
    let cache: SharedCache<String, u64> = SharedCache::new(10);
    let barrier = Arc::new(Barrier::new(2));

    let writer = {
        let cache = cache.clone();
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for i in 0..OPS {
                cache.set(i.to_string(), i);
                assert!(cache.len() <= 10);
            }
        })
    };

    let reader = {
        let cache = cache.clone();
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            let mut rng = StdRng::seed_from_u64(7);
            barrier.wait();
            for _ in 0..OPS {
                let key = rng.gen_range(0..OPS);
                if let Some(value) = cache.get(key.to_string().as_str()) {
                    assert_eq!(value, key);
                }
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();

    let stats = cache.stats().snapshot();
    assert_eq!(stats.hits + stats.misses, OPS);
    assert_eq!(stats.inserts, OPS);
    assert_eq!(stats.evictions, OPS - 10);
    assert_eq!(cache.len(), 10);

    cache.with_lock(|lru| lru.debug_validate_invariants());
}

#[test]
fn concurrent_updates_to_one_key_keep_a_single_entry() {
    let cache: SharedCache<&'static str, usize> = SharedCache::new(4);
    let threads = 4;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let cache = cache.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..1_000 {
                    cache.set("shared", t * 1_000 + i);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 1);
    let stats = cache.stats().snapshot();
    assert_eq!(stats.inserts, 1);
    assert_eq!(stats.updates, (threads * 1_000 - 1) as u64);
    assert_eq!(stats.evictions, 0);
}

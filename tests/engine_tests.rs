//! Engine Behavior Tests
//!
//! Exercises the public engine API: eviction order, TTL paths, and
//! concurrent callers racing the sweeper.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bucket_cache::{CacheEngine, CacheError, Config, EngineSettings};

fn engine(max_entry: usize, max_total: usize, ttl: Duration, sweep: Duration) -> CacheEngine {
    CacheEngine::new(EngineSettings::new(Some(max_entry), Some(max_total), ttl, sweep))
}

const HOUR: Duration = Duration::from_secs(3600);

// == LRU ==

#[tokio::test]
async fn test_untouched_oldest_is_evicted() {
    // Each entry is 1 + 1 + 8 = 10 bytes; the budget admits two
    let cache = engine(8, 20, HOUR, HOUR);

    cache.set("b", "A", "aaaaaaaa").unwrap();
    cache.set("b", "B", "bbbbbbbb").unwrap();
    cache.set("b", "C", "cccccccc").unwrap();
    cache.set("b", "D", "dddddddd").unwrap();

    assert_eq!(cache.get("b", "A"), None);
    assert_eq!(cache.get("b", "B"), None);
    assert_eq!(cache.get("b", "C").as_deref(), Some("cccccccc"));
    assert_eq!(cache.get("b", "D").as_deref(), Some("dddddddd"));

    cache.stop().await;
}

#[tokio::test]
async fn test_read_between_inserts_changes_victim() {
    let cache = engine(8, 20, HOUR, HOUR);

    cache.set("b", "B", "bbbbbbbb").unwrap();
    cache.set("b", "C", "cccccccc").unwrap();
    // B becomes MRU, C is now the LRU tail
    assert!(cache.get("b", "B").is_some());
    cache.set("b", "D", "dddddddd").unwrap();

    assert_eq!(cache.get("b", "C"), None);
    assert_eq!(cache.get("b", "B").as_deref(), Some("bbbbbbbb"));
    assert_eq!(cache.get("b", "D").as_deref(), Some("dddddddd"));

    cache.stop().await;
}

#[tokio::test]
async fn test_eviction_crosses_buckets() {
    let cache = engine(8, 20, HOUR, HOUR);

    cache.set("x", "A", "aaaaaaaa").unwrap();
    cache.set("y", "B", "bbbbbbbb").unwrap();
    cache.set("y", "C", "cccccccc").unwrap();

    assert_eq!(cache.count("x"), 0);
    assert_eq!(cache.count("y"), 2);

    cache.stop().await;
}

// == TTL ==

#[tokio::test]
async fn test_lazy_expiration_on_get() {
    let cache = engine(1024, 999_999, Duration::from_secs(1), HOUR);

    cache.set("b", "k", "v").unwrap();
    assert_eq!(cache.get("b", "k").as_deref(), Some("v"));

    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(cache.get("b", "k"), None);
    // Already removed, not re-derived
    assert_eq!(cache.get("b", "k"), None);
    assert_eq!(cache.count("b"), 0);

    cache.stop().await;
}

#[tokio::test]
async fn test_swept_expiration_without_reads() {
    let cache = engine(1024, 999_999, Duration::from_millis(200), Duration::from_millis(50));

    cache.set("b", "k1", "v").unwrap();
    cache.set("b", "k2", "v").unwrap();
    assert_eq!(cache.count("b"), 2);

    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(cache.count("b"), 0);
    assert_eq!(cache.size(), 0);
    assert_eq!(cache.stats().expirations, 2);

    cache.stop().await;
}

#[tokio::test]
async fn test_zero_ttl_is_immediately_absent() {
    let cache = CacheEngine::new(EngineSettings::from_raw(100, 1000, -5, 0));
    assert_eq!(cache.settings().ttl(), Duration::ZERO);

    cache.set("b", "k", "v").unwrap();
    assert_eq!(cache.get("b", "k"), None);

    cache.stop().await;
}

// == Oversize ==

#[tokio::test]
async fn test_oversized_write_evicts_prior_value() {
    let cache = engine(10, 1000, HOUR, HOUR);

    cache.set("b", "k", "fits").unwrap();
    let result = cache.set("b", "k", "does not fit");

    assert!(matches!(result, Err(CacheError::EntryTooLarge { size: 12, max: 10 })));
    assert_eq!(cache.get("b", "k"), None);
    assert_eq!(cache.count("b"), 0);
    assert_eq!(cache.size(), 0);

    cache.stop().await;
}

#[tokio::test]
async fn test_maximal_entry_admitted_despite_smaller_budget() {
    // The budget is raised to the max entry size at construction
    let cache = CacheEngine::new(EngineSettings::new(
        Some(100),
        Some(10),
        HOUR,
        Duration::ZERO,
    ));
    let value = "v".repeat(40);

    cache.set("b", "k", value.as_str()).unwrap();
    assert_eq!(cache.get("b", "k").as_deref(), Some(value.as_str()));
    assert!(cache.is_sweeping());

    cache.stop().await;
}

// == Configuration Edge Cases ==

#[tokio::test]
async fn test_huge_cleanup_interval_keeps_sweeper_alive() {
    let config = Config {
        cleanup_interval: i64::MAX,
        ..Config::default()
    };
    let cache = CacheEngine::new(config.engine_settings());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(cache.is_sweeping());

    cache.set("b", "k", "v").unwrap();
    assert_eq!(cache.get("b", "k").as_deref(), Some("v"));

    cache.stop().await;
}

#[tokio::test]
async fn test_zero_cleanup_interval_keeps_sweeper_alive() {
    let config = Config {
        cleanup_interval: 0,
        ..Config::default()
    };
    let cache = CacheEngine::new(config.engine_settings());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(cache.is_sweeping());

    cache.stop().await;
}

// == Concurrency ==

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_parallel_readers_and_writers() {
    let cache = Arc::new(engine(1024, 999_999, HOUR, HOUR));

    thread::scope(|scope| {
        for id in 0..10 {
            let cache = &cache;
            scope.spawn(move || {
                for k in 0..100 {
                    cache
                        .set("bucket", format!("key-{}", k), format!("val-{}", k))
                        .unwrap();
                    cache.set(format!("own-{}", id), "k", "v").unwrap();
                }
            });
            scope.spawn(move || {
                for k in 0..100 {
                    if let Some(value) = cache.get("bucket", &format!("key-{}", k)) {
                        assert_eq!(value, format!("val-{}", k));
                    }
                }
            });
        }
    });

    assert_eq!(cache.count("bucket"), 100);
    for id in 0..10 {
        assert_eq!(cache.count(&format!("own-{}", id)), 1);
    }
    assert_eq!(cache.len(), 110);

    cache.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_size_budget_holds_under_contention() {
    // Entries are 1 + up to 3 + 10 bytes; the budget fits a few dozen
    let max_total = 500;
    let cache = Arc::new(engine(10, max_total, HOUR, HOUR));

    thread::scope(|scope| {
        for id in 0..8 {
            let cache = &cache;
            scope.spawn(move || {
                for k in 0..500 {
                    cache
                        .set("b", format!("{}", (k * 7 + id) % 300), "0123456789")
                        .unwrap();
                    let _ = cache.get("b", &format!("{}", (k * 3) % 300));
                    if k % 50 == 0 {
                        cache.delete("b", &format!("{}", k % 300));
                    }
                    assert!(cache.size() <= max_total);
                }
            });
        }
    });

    let stats = cache.stats();
    assert!(stats.total_size <= max_total);
    assert_eq!(stats.total_entries, cache.count("b"));
    assert!(stats.evictions > 0);

    cache.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_readers_race_sweeper_and_clears() {
    let cache = Arc::new(engine(
        64,
        100_000,
        Duration::from_millis(5),
        Duration::from_millis(2),
    ));

    let handles: Vec<_> = (0..4)
        .map(|id| {
            let cache = cache.clone();
            thread::spawn(move || {
                for round in 0..2_000 {
                    let key = format!("k{}", round % 50);
                    cache.set("race", key.as_str(), "value").unwrap();
                    if let Some(value) = cache.get("race", &key) {
                        assert_eq!(value, "value");
                    }
                    if round % 97 == id {
                        cache.clear("race");
                    }
                    if round % 500 == 499 {
                        cache.clear_all();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(cache.count("race"), 0);
    assert_eq!(cache.size(), 0);

    cache.stop().await;
}

// == Lifecycle ==

#[tokio::test]
async fn test_stop_halts_sweeper() {
    let cache = engine(1024, 999_999, Duration::from_millis(50), Duration::from_millis(20));
    assert!(cache.is_sweeping());

    cache.stop().await;
    assert!(!cache.is_sweeping());

    cache.set("b", "k", "v").unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    // Expired, but with no sweeper only a read can remove it
    assert_eq!(cache.count("b"), 1);
    assert_eq!(cache.get("b", "k"), None);
    assert_eq!(cache.count("b"), 0);
}

//! 트리 캐시 동시 첫 로드 테스트.

use pricecast_analytics::{ForecastError, TreeCache};
use pricecast_data::{DataError, TreeArtifactSource};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

/// 로드 횟수를 세는 느린 아티팩트 소스.
struct CountingSource {
    loads: AtomicUsize,
}

impl TreeArtifactSource for CountingSource {
    fn load_definition(&self, identifier: &str) -> Result<Value, DataError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        if identifier == "missing" {
            return Err(DataError::NotFound(identifier.to_string()));
        }
        Ok(json!({
            "field": "lag_00",
            "operator": "<=",
            "value": 1.0,
            "pass": 0.5,
            "fail": 1.5
        }))
    }
}

#[test]
fn concurrent_first_use_loads_once() {
    let source = Arc::new(CountingSource {
        loads: AtomicUsize::new(0),
    });
    let cache = TreeCache::new(source.clone());
    let barrier = Barrier::new(8);

    let trees: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    cache.get("price_mean_tree").unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(source.loads.load(Ordering::SeqCst), 1);
    assert!(trees.iter().all(|t| Arc::ptr_eq(t, &trees[0])));
    assert_eq!(cache.len(), 1);
}

#[test]
fn distinct_identifiers_load_separately() {
    let source = Arc::new(CountingSource {
        loads: AtomicUsize::new(0),
    });
    let cache = TreeCache::new(source.clone());

    let mean = cache.get("price_mean_tree").unwrap();
    let std = cache.get("price_std_tree").unwrap();
    cache.get("price_mean_tree").unwrap();

    assert!(!Arc::ptr_eq(&mean, &std));
    assert_eq!(source.loads.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 2);
}

#[test]
fn failed_load_is_retried() {
    let source = Arc::new(CountingSource {
        loads: AtomicUsize::new(0),
    });
    let cache = TreeCache::new(source.clone());

    for _ in 0..2 {
        assert!(matches!(
            cache.get("missing"),
            Err(ForecastError::InvalidTree(_))
        ));
    }
    assert_eq!(source.loads.load(Ordering::SeqCst), 2);
    assert!(cache.is_empty());
}

//! Eviction Tests
//!
//! Capacity enforcement, LRU ordering of victims, runtime capacity changes,
//! predicate-driven eviction and listener failure handling.

use linked_cache::weigher::CollectionLen;
use linked_cache::config::MAXIMUM_CAPACITY;
use linked_cache::{BoxError, CacheError, EvictionListener, LinkedCache};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::convert::Infallible;
use std::sync::Arc;

const CAPACITY: usize = 100;

/// Listener that records every eviction.
#[derive(Clone, Default)]
struct CollectingListener {
    evicted: Arc<Mutex<Vec<(u32, u32)>>>,
}

impl CollectingListener {
    fn count(&self) -> usize {
        self.evicted.lock().len()
    }

    fn keys(&self) -> Vec<u32> {
        self.evicted.lock().iter().map(|(k, _)| *k).collect()
    }
}

impl EvictionListener<u32, u32> for CollectingListener {
    fn on_eviction(&self, key: u32, value: u32) -> Result<(), BoxError> {
        self.evicted.lock().push((key, value));
        Ok(())
    }
}

/// Listener that records every eviction and then fails.
#[derive(Clone, Default)]
struct FailingListener {
    calls: Arc<Mutex<usize>>,
}

impl EvictionListener<u32, u32> for FailingListener {
    fn on_eviction(&self, key: u32, _value: u32) -> Result<(), BoxError> {
        *self.calls.lock() += 1;
        Err(format!("cannot accept {key}").into())
    }
}

type CollectingCache = LinkedCache<u32, u32, linked_cache::Singleton, CollectingListener>;

fn collecting_cache(capacity: usize) -> (CollectingCache, CollectingListener) {
    let listener = CollectingListener::default();
    let cache = LinkedCache::builder(capacity)
        .segments(1)
        .listener(listener.clone())
        .build()
        .unwrap();
    (cache, listener)
}

/// Inserts keys in order, draining after each put so the recency chain
/// follows insertion order.
fn warm_up<W, L>(cache: &LinkedCache<u32, u32, W, L>, start: u32, end: u32)
where
    W: linked_cache::Weigher<u32>,
    L: EvictionListener<u32, u32>,
{
    for i in start..end {
        let _ = cache.put(i, i);
        let _ = cache.drain();
    }
}

/// Checks the cache agrees with itself after a full drain.
fn assert_valid<W, L>(cache: &LinkedCache<u32, u32, W, L>)
where
    W: linked_cache::Weigher<u32>,
    L: EvictionListener<u32, u32>,
{
    let _ = cache.drain();
    let ascending = cache.ascending_keys();
    let unique: HashSet<_> = ascending.iter().copied().collect();
    assert_eq!(unique.len(), ascending.len(), "a key is linked twice");
    assert_eq!(ascending.len(), cache.size());
    for key in &ascending {
        assert!(cache.contains_key(key), "linked key {key} missing from table");
    }
    let mut descending = cache.descending_keys();
    descending.reverse();
    assert_eq!(descending, ascending);
    assert!(cache.weighted_size() <= cache.capacity());
}

// ============================================================================
// Capacity
// ============================================================================

#[test]
fn test_capacity_increase() {
    let (cache, listener) = collecting_cache(CAPACITY);
    warm_up(&cache, 0, CAPACITY as u32);

    cache.set_capacity(2 * CAPACITY).unwrap();

    assert_valid(&cache);
    assert_eq!(cache.size(), CAPACITY);
    assert_eq!(cache.capacity(), 2 * CAPACITY);
    assert_eq!(listener.count(), 0);
}

#[test]
fn test_capacity_decrease() {
    let (cache, listener) = collecting_cache(CAPACITY);
    warm_up(&cache, 0, CAPACITY as u32);

    cache.set_capacity(CAPACITY / 2).unwrap();

    assert_valid(&cache);
    assert_eq!(cache.size(), CAPACITY / 2);
    assert_eq!(cache.capacity(), CAPACITY / 2);
    assert_eq!(listener.keys(), (0..50).collect::<Vec<_>>());
}

#[test]
fn test_capacity_decrease_to_zero() {
    let (cache, listener) = collecting_cache(CAPACITY);
    warm_up(&cache, 0, CAPACITY as u32);

    cache.set_capacity(0).unwrap();

    assert_valid(&cache);
    assert!(cache.is_empty());
    assert_eq!(cache.weighted_size(), 0);
    assert_eq!(listener.count(), CAPACITY);
}

#[test]
fn test_capacity_out_of_range() {
    let (cache, listener) = collecting_cache(CAPACITY);
    warm_up(&cache, 0, CAPACITY as u32);

    let result = cache.set_capacity(MAXIMUM_CAPACITY + 1);

    assert!(matches!(result, Err(CacheError::InvalidCapacity { .. })));
    assert_eq!(cache.capacity(), CAPACITY);
    assert_eq!(cache.size(), CAPACITY);
    assert_eq!(listener.count(), 0);
}

#[test]
fn test_capacity_decrease_with_failing_listener() {
    let listener = FailingListener::default();
    let cache: LinkedCache<u32, u32, _, _> = LinkedCache::builder(CAPACITY)
        .segments(1)
        .listener(listener.clone())
        .build()
        .unwrap();
    warm_up(&cache, 0, CAPACITY as u32);

    let result = cache.set_capacity(CAPACITY / 2);

    assert!(matches!(result, Err(CacheError::Listener(_))));
    assert_valid(&cache);
    assert_eq!(cache.capacity(), CAPACITY / 2);
    assert_eq!(cache.size(), CAPACITY / 2);
    assert_eq!(*listener.calls.lock(), CAPACITY / 2);
}

// ============================================================================
// Eviction on write
// ============================================================================

#[test]
fn test_evict_to_capacity() {
    let (cache, listener) = collecting_cache(10);
    warm_up(&cache, 0, 20);

    assert_valid(&cache);
    assert_eq!(cache.size(), 10);
    assert_eq!(cache.weighted_size(), 10);
    assert_eq!(listener.count(), 10);
}

#[test]
fn test_evicted_keys_are_distinct_and_not_resident() {
    let (cache, listener) = collecting_cache(10);
    for i in 0..50 {
        cache.put(i, i).unwrap();
        if i % 3 == 0 {
            cache.get(&(i / 2));
        }
    }
    assert_valid(&cache);

    let evicted = listener.keys();
    let unique: HashSet<u32> = evicted.iter().copied().collect();
    assert_eq!(evicted.len(), 40);
    assert_eq!(unique.len(), evicted.len(), "a key was reported twice");
    for key in cache.ascending_keys() {
        assert!(!unique.contains(&key), "resident key {key} was reported");
    }
}

#[test]
fn test_evict_always_discard() {
    let (cache, listener) = collecting_cache(0);
    warm_up(&cache, 0, 100);

    assert_valid(&cache);
    assert!(cache.is_empty());
    assert_eq!(listener.count(), 100);
}

#[test]
fn test_evict_without_explicit_drains() {
    let (cache, listener) = collecting_cache(10);
    for i in 0..1000 {
        cache.put(i, i).unwrap();
    }

    assert_eq!(cache.size(), 10);
    assert_eq!(cache.weighted_size(), 10);
    assert_eq!(listener.count(), 990);
    assert_valid(&cache);
}

#[test]
fn test_evict_weighted() {
    let cache: LinkedCache<u32, Vec<u32>, CollectionLen> = LinkedCache::builder(10)
        .segments(1)
        .weigher(CollectionLen)
        .build()
        .unwrap();

    cache.put(1, vec![1, 2]).unwrap();
    cache.put(2, vec![3, 4, 5, 6, 7]).unwrap();
    cache.put(3, vec![8, 9, 10]).unwrap();
    assert_eq!(cache.weighted_size(), 10);

    // evicts 1
    cache.put(4, vec![11]).unwrap();
    assert!(!cache.contains_key(&1));
    assert_eq!(cache.weighted_size(), 9);

    // evicts 2 and 3
    cache.put(5, vec![12, 13, 14, 15, 16, 17, 18, 19, 20]).unwrap();
    assert_eq!(cache.weighted_size(), 10);
    assert_eq!(cache.size(), 2);
    assert!(cache.contains_key(&4));
    assert!(cache.contains_key(&5));
}

#[test]
fn test_evict_entry_heavier_than_capacity() {
    let cache: LinkedCache<u32, Vec<u32>, CollectionLen> = LinkedCache::builder(5)
        .segments(1)
        .weigher(CollectionLen)
        .build()
        .unwrap();

    cache.put(1, vec![1]).unwrap();
    cache.put(2, vec![0; 6]).unwrap();

    assert!(cache.is_empty());
    assert_eq!(cache.weighted_size(), 0);
}

#[test]
fn test_weight_above_maximum_rejected() {
    let cache = LinkedCache::builder(10)
        .segments(1)
        .weigher(|v: &usize| *v)
        .build()
        .unwrap();
    cache.put(1u32, 5).unwrap();

    for weight in [MAXIMUM_CAPACITY + 1, usize::MAX] {
        assert!(matches!(
            cache.put(2, weight),
            Err(CacheError::InvalidWeight)
        ));
        assert!(matches!(
            cache.put_if_absent(2, weight),
            Err(CacheError::InvalidWeight)
        ));
        assert!(matches!(
            cache.replace(&1, weight),
            Err(CacheError::InvalidWeight)
        ));
    }
    cache.drain().unwrap();

    assert!(!cache.contains_key(&2));
    assert_eq!(cache.get(&1), Some(5));
    assert_eq!(cache.size(), 1);
    assert_eq!(cache.weighted_size(), 5);

    // The largest accepted weight is admitted and then evicted as too heavy
    cache.put(3, MAXIMUM_CAPACITY).unwrap();
    assert!(!cache.contains_key(&3));
    assert!(cache.weighted_size() <= cache.capacity());
}

#[test]
fn test_evict_lru() {
    let (cache, listener) = collecting_cache(10);
    warm_up(&cache, 0, 10);
    assert_eq!(cache.ascending_keys(), (0..10).collect::<Vec<_>>());

    // re-order
    check_reorder(&cache, &[0, 1, 2], &[3, 4, 5, 6, 7, 8, 9, 0, 1, 2]);

    // evict 3, 4, 5
    check_evict(&cache, &[10, 11, 12], &[6, 7, 8, 9, 0, 1, 2, 10, 11, 12]);
    assert_eq!(listener.keys(), vec![3, 4, 5]);

    // re-order
    check_reorder(&cache, &[6, 7, 8], &[9, 0, 1, 2, 10, 11, 12, 6, 7, 8]);

    // evict 9, 0, 1
    check_evict(&cache, &[13, 14, 15], &[2, 10, 11, 12, 6, 7, 8, 13, 14, 15]);
    assert_eq!(listener.keys(), vec![3, 4, 5, 9, 0, 1]);

    assert_valid(&cache);
}

fn check_reorder(cache: &CollectingCache, keys: &[u32], expect: &[u32]) {
    for key in keys {
        cache.get(key);
        cache.drain().unwrap();
    }
    assert_eq!(cache.ascending_keys(), expect);
}

fn check_evict(cache: &CollectingCache, keys: &[u32], expect: &[u32]) {
    for &key in keys {
        cache.put(key, key).unwrap();
        cache.drain().unwrap();
    }
    assert_eq!(cache.ascending_keys(), expect);
}

#[test]
fn test_removed_entries_are_not_reported() {
    let (cache, listener) = collecting_cache(10);
    warm_up(&cache, 0, 10);

    for i in 0..5 {
        cache.remove(&i);
    }
    warm_up(&cache, 10, 15);

    assert_valid(&cache);
    assert_eq!(cache.size(), 10);
    assert_eq!(listener.count(), 0);
}

// ============================================================================
// Listener failures
// ============================================================================

#[test]
fn test_listener_failure_propagates() {
    let listener = FailingListener::default();
    let cache: LinkedCache<u32, u32, _, _> = LinkedCache::builder(10)
        .segments(1)
        .listener(listener.clone())
        .build()
        .unwrap();
    warm_up(&cache, 0, 10);

    for i in 10..20 {
        let result = cache.put(i, i);
        match result {
            Err(CacheError::Listener(source)) => {
                assert!(source.to_string().starts_with("cannot accept"));
            }
            other => panic!("expected listener failure, got {other:?}"),
        }
        assert_eq!(cache.get(&i), Some(i), "the write is applied despite the failure");
    }

    assert_valid(&cache);
    assert_eq!(cache.size(), 10);
    assert_eq!(cache.weighted_size(), 10);
    assert_eq!(*listener.calls.lock(), 10);
}

// ============================================================================
// evict_until
// ============================================================================

fn check_evict_until<F>(predicate: F, expected_size: usize)
where
    F: FnMut(&CollectingCache) -> Result<bool, Infallible>,
{
    let (cache, listener) = collecting_cache(CAPACITY);
    warm_up(&cache, 0, CAPACITY as u32);

    cache.evict_until(predicate).unwrap();

    assert_valid(&cache);
    assert_eq!(cache.size(), expected_size);
    assert_eq!(listener.count(), CAPACITY - expected_size);
}

#[test]
fn test_evict_until_never_discard() {
    check_evict_until(|_| Ok(false), CAPACITY);
}

#[test]
fn test_evict_until_always_discard() {
    check_evict_until(|_| Ok(true), 0);
}

#[test]
fn test_evict_until_size_limit() {
    let limit = CAPACITY / 2;
    check_evict_until(move |cache| Ok(cache.size() > limit), limit);
}

#[test]
fn test_evict_until_evicts_least_recent_first() {
    let (cache, listener) = collecting_cache(CAPACITY);
    warm_up(&cache, 0, 10);
    cache.get(&0);

    cache
        .evict_until(|c| Ok::<_, Infallible>(c.size() > 7))
        .unwrap();

    assert_eq!(listener.keys(), vec![1, 2, 3]);
    assert!(cache.contains_key(&0));
}

#[test]
fn test_evict_until_predicate_fails() {
    let (cache, listener) = collecting_cache(CAPACITY);
    warm_up(&cache, 0, CAPACITY as u32);

    let result = cache.evict_until(|_| Err::<bool, _>("limiter unavailable"));

    match result {
        Err(CacheError::Predicate(source)) => assert_eq!(source.to_string(), "limiter unavailable"),
        other => panic!("expected predicate failure, got {other:?}"),
    }
    assert_valid(&cache);
    assert_eq!(cache.size(), CAPACITY);
    assert_eq!(listener.count(), 0);
}

#[test]
fn test_evict_until_listener_fails() {
    let listener = FailingListener::default();
    let cache: LinkedCache<u32, u32, _, _> = LinkedCache::builder(CAPACITY)
        .segments(1)
        .listener(listener.clone())
        .build()
        .unwrap();
    warm_up(&cache, 0, 10);

    let result = cache.evict_until(|_| Ok::<_, Infallible>(true));

    assert!(matches!(result, Err(CacheError::Listener(_))));
    assert_valid(&cache);
    assert_eq!(cache.size(), 9);
    assert_eq!(*listener.calls.lock(), 1);
}

// ============================================================================
// Drain threshold
// ============================================================================

#[test]
fn test_reads_drain_at_threshold() {
    let cache: LinkedCache<u32, u32> = LinkedCache::builder(CAPACITY)
        .recency_threshold(linked_cache::config::RECENCY_THRESHOLD)
        .build()
        .unwrap();
    warm_up(&cache, 0, CAPACITY as u32);

    let segment = cache.segment_for(&1);
    for _ in 0..linked_cache::config::RECENCY_THRESHOLD - 1 {
        cache.get(&1);
    }
    assert_eq!(
        cache.pending_events(segment),
        linked_cache::config::RECENCY_THRESHOLD - 1
    );

    cache.get(&1);
    assert_eq!(cache.pending_events(segment), 0);
}

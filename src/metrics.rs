//! Cache Metrics System
//!
//! Provides metrics reporting through the [`CacheMetrics`] trait, using
//! BTreeMap-based output for deterministic ordering.
//!
//! Counters are plain atomics updated with relaxed ordering on the hot path;
//! a snapshot taken while other threads are running is approximate.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters maintained by a [`LinkedCache`](crate::LinkedCache).
#[derive(Debug, Default)]
pub struct LinkedCacheMetrics {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    evictions: AtomicU64,
    drains: AtomicU64,
    events_applied: AtomicU64,
}

impl LinkedCacheMetrics {
    /// Records a lookup that found its key.
    #[inline]
    pub(crate) fn record_hit(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a lookup that missed.
    #[inline]
    pub(crate) fn record_miss(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Records entries evicted to honour the capacity.
    #[inline]
    pub(crate) fn record_evictions(&self, count: usize) {
        self.evictions.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Records a drain pass and the number of events it applied.
    #[inline]
    pub(crate) fn record_drain(&self, events: usize) {
        self.drains.fetch_add(1, Ordering::Relaxed);
        self.events_applied.fetch_add(events as u64, Ordering::Relaxed);
    }

    /// Total lookups.
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Lookups that found their key.
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Lookups that missed.
    pub fn cache_misses(&self) -> u64 {
        self.requests().saturating_sub(self.cache_hits())
    }

    /// Entries evicted by the capacity controller.
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Drain passes run.
    pub fn drains(&self) -> u64 {
        self.drains.load(Ordering::Relaxed)
    }

    /// Recency events applied across all drains.
    pub fn events_applied(&self) -> u64 {
        self.events_applied.load(Ordering::Relaxed)
    }

    /// Calculates the hit rate, between 0.0 and 1.0, or 0.0 with no requests.
    pub fn hit_rate(&self) -> f64 {
        match self.requests() {
            0 => 0.0,
            requests => self.cache_hits() as f64 / requests as f64,
        }
    }

    /// Converts the counters to a BTreeMap for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.cache_hits() as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("drains".to_string(), self.drains() as f64);
        metrics.insert("evictions".to_string(), self.evictions() as f64);
        metrics.insert("events_applied".to_string(), self.events_applied() as f64);
        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("requests".to_string(), self.requests() as f64);

        metrics
    }
}

/// Trait for metrics reporting.
///
/// Uses BTreeMap so metrics always appear in the same order.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification.
    fn algorithm_name(&self) -> &'static str;
}

//! Eviction listeners.
//!
//! A listener receives every `(key, value)` pair the cache evicts to stay
//! within capacity. Explicit removals are not reported. Listeners run after
//! the structural lock is released and after the evicted entry is fully
//! retired, so a failing listener cannot leave the cache inconsistent; its
//! error is handed back to the caller whose operation triggered the eviction.

use crate::error::BoxError;

/// Receives entries evicted by the cache.
pub trait EvictionListener<K, V>: Send + Sync {
    /// Called once per evicted entry.
    fn on_eviction(&self, key: K, value: V) -> Result<(), BoxError>;
}

impl<K, V, F> EvictionListener<K, V> for F
where
    F: Fn(K, V) -> Result<(), BoxError> + Send + Sync,
{
    #[inline]
    fn on_eviction(&self, key: K, value: V) -> Result<(), BoxError> {
        self(key, value)
    }
}

/// A listener that ignores evictions.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardingListener;

impl<K, V> EvictionListener<K, V> for DiscardingListener {
    #[inline]
    fn on_eviction(&self, _key: K, _value: V) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Delivers a batch of evicted entries.
///
/// Every entry is delivered even if an earlier delivery fails; the first
/// failure is returned.
pub(crate) fn notify_all<K, V, L>(listener: &L, evicted: Vec<(K, V)>) -> Result<(), BoxError>
where
    L: EvictionListener<K, V> + ?Sized,
{
    let mut first_error = None;
    for (key, value) in evicted {
        if let Err(err) = listener.on_eviction(key, value) {
            first_error.get_or_insert(err);
        }
    }
    first_error.map_or(Ok(()), Err)
}

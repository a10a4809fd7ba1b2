//! Entry weighers.
//!
//! A weigher maps a value to its weight: the amount of capacity it consumes.
//! Weights must be at least 1 and at most
//! [`MAXIMUM_CAPACITY`](crate::config::MAXIMUM_CAPACITY). The cache rejects
//! any other weight with
//! [`CacheError::InvalidWeight`](crate::CacheError::InvalidWeight) so that
//! eviction always makes progress and the weighted size cannot overflow.
//!
//! | Weigher | Weight |
//! |---------|--------|
//! | [`Singleton`] | always 1; capacity is an entry count |
//! | [`ByteLen`] | byte length of `AsRef<[u8]>` values |
//! | [`CollectionLen`] | element count of standard collections |
//! | any `Fn(&V) -> usize` | whatever the closure returns |
//!
//! Weighers must be pure: the same value always yields the same weight.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// Computes the weight of a value.
pub trait Weigher<V>: Send + Sync {
    /// Returns the weight of `value`.
    fn weigh(&self, value: &V) -> usize;
}

impl<V, F> Weigher<V> for F
where
    F: Fn(&V) -> usize + Send + Sync,
{
    #[inline]
    fn weigh(&self, value: &V) -> usize {
        self(value)
    }
}

/// Weighs every value as 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct Singleton;

impl<V> Weigher<V> for Singleton {
    #[inline]
    fn weigh(&self, _value: &V) -> usize {
        1
    }
}

/// Weighs a value by its length in bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ByteLen;

impl<V: AsRef<[u8]>> Weigher<V> for ByteLen {
    #[inline]
    fn weigh(&self, value: &V) -> usize {
        value.as_ref().len()
    }
}

/// Weighs a collection by its number of elements.
#[derive(Debug, Default, Clone, Copy)]
pub struct CollectionLen;

impl<T> Weigher<Vec<T>> for CollectionLen {
    fn weigh(&self, value: &Vec<T>) -> usize {
        value.len()
    }
}

impl<T> Weigher<VecDeque<T>> for CollectionLen {
    fn weigh(&self, value: &VecDeque<T>) -> usize {
        value.len()
    }
}

impl<K, V, S> Weigher<HashMap<K, V, S>> for CollectionLen {
    fn weigh(&self, value: &HashMap<K, V, S>) -> usize {
        value.len()
    }
}

impl<T, S> Weigher<HashSet<T, S>> for CollectionLen {
    fn weigh(&self, value: &HashSet<T, S>) -> usize {
        value.len()
    }
}

impl<K, V> Weigher<BTreeMap<K, V>> for CollectionLen {
    fn weigh(&self, value: &BTreeMap<K, V>) -> usize {
        value.len()
    }
}

impl<T> Weigher<BTreeSet<T>> for CollectionLen {
    fn weigh(&self, value: &BTreeSet<T>) -> usize {
        value.len()
    }
}

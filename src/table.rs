//! Striped concurrent hash table backing the cache index.
//!
//! The key space is partitioned across stripes using the same hash that picks
//! a key's recency segment. Each stripe is a hash map behind its own
//! `parking_lot::RwLock`, so lookups on different stripes never contend and
//! lookups on the same stripe share a read lock.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                        Table (N stripes)                           │
//! │                                                                    │
//! │  ┌──────────┐ ┌──────────┐ ┌──────────┐     ┌──────────┐           │
//! │  │ Stripe 0 │ │ Stripe 1 │ │ Stripe 2 │ ... │Stripe N-1│           │
//! │  │ [RwLock] │ │ [RwLock] │ │ [RwLock] │     │ [RwLock] │           │
//! │  └──────────┘ └──────────┘ └──────────┘     └──────────┘           │
//! │       ▲            ▲            ▲                ▲                 │
//! │  hash(k1)%N   hash(k2)%N   hash(k3)%N       hash(kN)%N             │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every per-key read-modify-write runs while holding the stripe's write lock,
//! which is what makes per-key operations linearizable.

use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// One lock-protected partition of the table.
pub(crate) type Stripe<K, T, S> = HashMap<K, T, S>;

pub(crate) struct Table<K, T, S> {
    stripes: Box<[RwLock<Stripe<K, T, S>>]>,
    hash_builder: S,
}

impl<K, T, S> Table<K, T, S> {
    /// Number of stripes.
    pub(crate) fn stripe_count(&self) -> usize {
        self.stripes.len()
    }
}

impl<K, T, S> Table<K, T, S>
where
    K: Hash + Eq,
    S: BuildHasher + Clone,
{
    /// Creates a table with `stripes` partitions sharing `initial_capacity`.
    pub(crate) fn with_hasher(stripes: usize, initial_capacity: usize, hash_builder: S) -> Self {
        let per_stripe = initial_capacity.div_ceil(stripes.max(1));
        let stripes: Vec<_> = (0..stripes.max(1))
            .map(|_| {
                RwLock::new(HashMap::with_capacity_and_hasher(
                    per_stripe,
                    hash_builder.clone(),
                ))
            })
            .collect();

        Table {
            stripes: stripes.into_boxed_slice(),
            hash_builder,
        }
    }

    /// Hashes a key with the table's hash builder.
    #[inline]
    pub(crate) fn hash<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
    {
        self.hash_builder.hash_one(key)
    }

    #[inline]
    fn stripe(&self, hash: u64) -> &RwLock<Stripe<K, T, S>> {
        &self.stripes[(hash as usize) % self.stripes.len()]
    }

    /// Returns a clone of the entry for `key`.
    pub(crate) fn get<Q>(&self, hash: u64, key: &Q) -> Option<T>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        T: Clone,
    {
        self.stripe(hash).read().get(key).cloned()
    }

    /// Returns true if `key` is indexed.
    pub(crate) fn contains_key<Q>(&self, hash: u64, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.stripe(hash).read().contains_key(key)
    }

    /// Write-locks the stripe owning `hash` for a per-key read-modify-write.
    #[inline]
    pub(crate) fn write(&self, hash: u64) -> RwLockWriteGuard<'_, Stripe<K, T, S>> {
        self.stripe(hash).write()
    }

    /// Read-locks every stripe in turn.
    pub(crate) fn stripes(&self) -> impl Iterator<Item = RwLockReadGuard<'_, Stripe<K, T, S>>> {
        self.stripes.iter().map(|s| s.read())
    }

    /// Total entries across stripes.
    ///
    /// Locks each stripe sequentially, so the value may be slightly stale in
    /// high-concurrency scenarios.
    pub(crate) fn len(&self) -> usize {
        self.stripes.iter().map(|s| s.read().len()).sum()
    }

    /// Returns `true` if no stripe holds an entry.
    pub(crate) fn is_empty(&self) -> bool {
        self.stripes.iter().all(|s| s.read().is_empty())
    }

    /// Snapshots the keys of every stripe.
    pub(crate) fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.stripes()
            .flat_map(|stripe| stripe.keys().cloned().collect::<Vec<_>>())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "hashbrown")]
    use hashbrown::DefaultHashBuilder;

    #[cfg(not(feature = "hashbrown"))]
    use std::collections::hash_map::RandomState as DefaultHashBuilder;

    fn table(stripes: usize) -> Table<String, u32, DefaultHashBuilder> {
        Table::with_hasher(stripes, 64, DefaultHashBuilder::default())
    }

    #[test]
    fn test_insert_get_remove() {
        let table = table(4);
        let key = "a".to_string();
        let hash = table.hash(&key);

        assert_eq!(table.get(hash, "a"), None);
        table.write(hash).insert(key, 1);
        assert_eq!(table.get(hash, "a"), Some(1));
        assert!(table.contains_key(hash, "a"));
        assert_eq!(table.len(), 1);

        assert_eq!(table.write(hash).remove("a"), Some(1));
        assert!(table.is_empty());
    }

    #[test]
    fn test_keys_span_all_stripes() {
        let table = table(8);
        for i in 0..100u32 {
            let key = i.to_string();
            let hash = table.hash(&key);
            table.write(hash).insert(key, i);
        }
        assert_eq!(table.len(), 100);
        let mut keys = table.keys();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 100);
        assert_eq!(table.stripe_count(), 8);
    }

    #[test]
    fn test_zero_stripes_falls_back_to_one() {
        let table = table(0);
        assert_eq!(table.stripe_count(), 1);
    }
}

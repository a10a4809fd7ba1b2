//! Bounded concurrent map with buffered LRU maintenance.
//!
//! # How It Works
//!
//! Reads and writes go straight to a striped hash table. Instead of touching
//! the shared recency chain on every access, each operation records a small
//! event in its key's segment buffer. Events are applied to the chain in
//! batches, under a single structural lock, by whichever thread happens to
//! push a segment over its threshold.
//!
//! ```text
//!  get/put/remove ──▶ Table stripe (RwLock) ──▶ segment buffer ──▶ pending += 1
//!                                                                    │
//!                                          pending >= threshold ─────┤
//!                                                                    ▼
//!                                   try_lock(structural lock) ──▶ drain all segments
//!                                                                    │
//!                                   weighted_size > capacity ◀───────┘
//!                                             │
//!                                             ▼
//!                                  evict from sentinel.next ──▶ listener (unlocked)
//! ```
//!
//! ## Recency chain
//!
//! All entries sit on one circular list anchored at a sentinel: `sentinel.next`
//! is the least recently used entry and `sentinel.prev` the most recently used.
//! Only the structural-lock holder links, moves or unlinks entries.
//!
//! ## Trade-offs
//!
//! - **Pros**: lookups scale with the table; contention on the structural lock
//!   is limited to threads that trip a drain, and those skip instead of waiting.
//! - **Cons**: recency order is approximate. An access becomes visible to the
//!   eviction order only after the next drain of its segment.
//!
//! # Thread Safety
//!
//! `LinkedCache` is `Send + Sync` when its keys, values, weigher, listener and
//! hasher are, and can be shared via `Arc`.
//!
//! # Example
//!
//! ```rust
//! use linked_cache::config::LinkedCacheConfig;
//! use linked_cache::LinkedCache;
//!
//! let cache: LinkedCache<&str, i32> = LinkedCache::init(LinkedCacheConfig::new(2)).unwrap();
//! cache.put("a", 1).unwrap();
//! cache.drain().unwrap();
//! cache.put("b", 2).unwrap();
//! cache.drain().unwrap();
//!
//! cache.get(&"a");
//! cache.drain().unwrap();
//!
//! cache.put("c", 3).unwrap(); // "b" is the least recently used
//! assert_eq!(cache.get(&"b"), None);
//! assert_eq!(cache.ascending_keys(), vec!["a", "c"]);
//! ```

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, trace, warn};
use parking_lot::Mutex;

use crate::buffer::{RecencyBuffers, RecencyEvent};
use crate::builder::Builder;
use crate::config::{LinkedCacheConfig, MAXIMUM_CAPACITY};
use crate::error::{BoxError, CacheError, Result};
use crate::list::List;
use crate::listener::{notify_all, DiscardingListener, EvictionListener};
use crate::metrics::{CacheMetrics, LinkedCacheMetrics};
use crate::node::{Node, NodeState};
use crate::table::{Stripe, Table};
use crate::weigher::{Singleton, Weigher};

#[cfg(feature = "hashbrown")]
pub(crate) use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
pub(crate) use std::collections::hash_map::RandomState as DefaultHashBuilder;

type Chain<K, V> = List<Arc<Node<K, V>>>;

/// A bounded, thread-safe map that evicts in approximate LRU order.
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq + Clone + Send + Sync`.
/// - `V`: Value type. Must implement `Clone + Send + Sync`.
/// - `W`: [`Weigher`] for values. Defaults to [`Singleton`].
/// - `L`: [`EvictionListener`]. Defaults to [`DiscardingListener`].
/// - `S`: Hash builder type. Defaults to `DefaultHashBuilder`.
///
/// # Note on LRU Semantics
///
/// The order is global (one chain for the whole cache) but lags behind the
/// operations that produced it by at most one recency threshold per segment.
/// Call [`drain`](Self::drain) to bring it fully up to date.
pub struct LinkedCache<
    K,
    V,
    W = Singleton,
    L = DiscardingListener,
    S = DefaultHashBuilder,
> {
    table: Table<K, Arc<Node<K, V>>, S>,
    buffers: RecencyBuffers<K, V>,
    chain: Mutex<Chain<K, V>>,
    weighted_size: AtomicUsize,
    capacity: AtomicUsize,
    weigher: W,
    listener: L,
    metrics: LinkedCacheMetrics,
}

impl<K, V> LinkedCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    /// Creates a cache from a configuration, with the default weigher,
    /// listener and hasher.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidCapacity`] or [`CacheError::InvalidConfig`] if the
    /// configuration is out of range.
    pub fn init(config: LinkedCacheConfig) -> Result<Self> {
        Self::from_parts(
            config,
            Singleton,
            DiscardingListener,
            DefaultHashBuilder::default(),
        )
    }

    /// Starts a [`Builder`] for a cache bounded by `capacity`.
    pub fn builder(capacity: usize) -> Builder<K, V> {
        Builder::new(capacity)
    }
}

impl<K, V, W, L, S> LinkedCache<K, V, W, L, S>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Clone + Send + Sync,
    W: Weigher<V>,
    L: EvictionListener<K, V>,
    S: BuildHasher + Clone,
{
    pub(crate) fn from_parts(
        config: LinkedCacheConfig,
        weigher: W,
        listener: L,
        hash_builder: S,
    ) -> Result<Self> {
        check_capacity(config.capacity())?;
        if config.segments() == 0 {
            return Err(CacheError::InvalidConfig { name: "segments" });
        }
        if config.recency_threshold() == 0 {
            return Err(CacheError::InvalidConfig {
                name: "recency_threshold",
            });
        }

        Ok(LinkedCache {
            table: Table::with_hasher(config.segments(), config.initial_capacity(), hash_builder),
            buffers: RecencyBuffers::new(config.segments(), config.recency_threshold()),
            chain: Mutex::new(List::with_capacity(config.initial_capacity())),
            weighted_size: AtomicUsize::new(0),
            capacity: AtomicUsize::new(config.capacity()),
            weigher,
            listener,
            metrics: LinkedCacheMetrics::default(),
        })
    }

    // ------------------------------------------------------------------
    // Map operations
    // ------------------------------------------------------------------

    /// Returns a clone of the value for `key`, recording the access.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.table.hash(key);
        let Some(node) = self.table.get(hash, key) else {
            self.metrics.record_miss();
            return None;
        };
        self.metrics.record_hit();
        let value = node.value();
        self.after_read(node.segment(), RecencyEvent::Access(node));
        Some(value)
    }

    /// Applies `f` to the value for `key` without cloning it, recording the
    /// access.
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        let hash = self.table.hash(key);
        let Some(node) = self.table.get(hash, key) else {
            self.metrics.record_miss();
            return None;
        };
        self.metrics.record_hit();
        let result = node.with_value(f);
        self.after_read(node.segment(), RecencyEvent::Access(node));
        Some(result)
    }

    /// Returns `true` if `key` is present. Does not affect recency.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.table.hash(key);
        self.table.contains_key(hash, key)
    }

    /// Inserts or updates `key`, returning the previous value.
    ///
    /// An update keeps the entry's identity and marks it as recently used. If
    /// the insert pushes the weighted size over capacity, the least recently
    /// used entries are evicted before this returns.
    ///
    /// # Errors
    ///
    /// - [`CacheError::InvalidWeight`] if the weigher returns 0 or more than
    ///   [`MAXIMUM_CAPACITY`]; nothing changes.
    /// - [`CacheError::Listener`] if the listener fails for an entry evicted by
    ///   this call. The write itself has been applied.
    pub fn put(&self, key: K, value: V) -> Result<Option<V>> {
        let weight = self.weigh(&value)?;
        let hash = self.table.hash(&key);

        let mut stripe = self.table.write(hash);
        let existing = stripe.get(&key).cloned();
        let (segment, event, previous) = match existing {
            Some(node) => {
                let (old_value, old_weight) = node.replace(value, weight);
                self.adjust_weight(old_weight, weight);
                (node.segment(), RecencyEvent::Access(node), Some(old_value))
            }
            None => {
                let node = self.insert_node(&mut stripe, hash, key, value, weight);
                (node.segment(), RecencyEvent::Add(node), None)
            }
        };
        drop(stripe);

        self.after_write(segment, event)?;
        Ok(previous)
    }

    /// Inserts `key` only if it is absent.
    ///
    /// Returns the current value if the key was present (recording an access),
    /// or `None` if the value was inserted.
    ///
    /// # Errors
    ///
    /// As for [`put`](Self::put). The value is only weighed when it would be
    /// inserted.
    pub fn put_if_absent(&self, key: K, value: V) -> Result<Option<V>> {
        let hash = self.table.hash(&key);

        let mut stripe = self.table.write(hash);
        let existing = stripe.get(&key).cloned();
        let (segment, event, current) = match existing {
            Some(node) => {
                let current = node.value();
                (node.segment(), RecencyEvent::Access(node), Some(current))
            }
            None => {
                let weight = self.weigh(&value)?;
                let node = self.insert_node(&mut stripe, hash, key, value, weight);
                (node.segment(), RecencyEvent::Add(node), None)
            }
        };
        drop(stripe);

        self.after_write(segment, event)?;
        Ok(current)
    }

    /// Replaces the value for `key` only if it is present, returning the
    /// previous value.
    ///
    /// # Errors
    ///
    /// As for [`put`](Self::put).
    pub fn replace<Q>(&self, key: &Q, value: V) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let weight = self.weigh(&value)?;
        let hash = self.table.hash(key);

        let stripe = self.table.write(hash);
        let Some(node) = stripe.get(key).cloned() else {
            return Ok(None);
        };
        let (old_value, old_weight) = node.replace(value, weight);
        self.adjust_weight(old_weight, weight);
        drop(stripe);

        self.after_write(node.segment(), RecencyEvent::Access(node))?;
        Ok(Some(old_value))
    }

    /// Replaces the value for `key` only if it currently equals `expected`.
    ///
    /// Returns whether the value was replaced.
    ///
    /// # Errors
    ///
    /// As for [`put`](Self::put).
    pub fn replace_if<Q>(&self, key: &Q, expected: &V, value: V) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        let weight = self.weigh(&value)?;
        let hash = self.table.hash(key);

        let stripe = self.table.write(hash);
        let Some(node) = stripe.get(key).cloned() else {
            return Ok(false);
        };
        if !node.with_value(|current| current == expected) {
            return Ok(false);
        }
        let (_, old_weight) = node.replace(value, weight);
        self.adjust_weight(old_weight, weight);
        drop(stripe);

        self.after_write(node.segment(), RecencyEvent::Access(node))?;
        Ok(true)
    }

    /// Removes `key`, returning its value.
    ///
    /// The entry's weight is released immediately; it is unlinked from the
    /// recency chain by a later drain. Removals are not reported to the
    /// eviction listener.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.table.hash(key);
        let mut stripe = self.table.write(hash);
        let node = stripe.remove(key)?;
        self.retire(&node);
        drop(stripe);

        let value = node.value();
        self.after_read(node.segment(), RecencyEvent::Remove(node));
        Some(value)
    }

    /// Removes `key` only if its value equals `expected`.
    pub fn remove_if<Q>(&self, key: &Q, expected: &V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        let hash = self.table.hash(key);
        let mut stripe = self.table.write(hash);
        let matches = stripe
            .get(key)
            .is_some_and(|node| node.with_value(|current| current == expected));
        if !matches {
            return false;
        }
        let Some(node) = stripe.remove(key) else {
            return false;
        };
        self.retire(&node);
        drop(stripe);

        self.after_read(node.segment(), RecencyEvent::Remove(node));
        true
    }

    /// Removes every entry without notifying the listener.
    pub fn clear(&self) {
        for key in self.table.keys() {
            self.remove(&key);
        }
        self.drain_quietly(self.chain.lock());
    }

    // ------------------------------------------------------------------
    // Sizes and capacity
    // ------------------------------------------------------------------

    /// Number of entries.
    ///
    /// Locks each table stripe in turn, so the value may be slightly stale
    /// under concurrent writes.
    pub fn size(&self) -> usize {
        self.table.len()
    }

    /// Alias for [`size`](Self::size).
    pub fn len(&self) -> usize {
        self.size()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Sum of the weights of all live entries.
    ///
    /// May exceed [`capacity`](Self::capacity) briefly between a write and
    /// the drain that evicts for it.
    pub fn weighted_size(&self) -> usize {
        self.weighted_size.load(Ordering::Acquire)
    }

    /// Maximum weighted size.
    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Acquire)
    }

    /// Changes the maximum weighted size, evicting least recently used
    /// entries until the cache fits. Growing never evicts.
    ///
    /// # Errors
    ///
    /// - [`CacheError::InvalidCapacity`] if `capacity` exceeds
    ///   [`MAXIMUM_CAPACITY`]; the capacity is unchanged.
    /// - [`CacheError::Listener`] if the listener fails; the new capacity is
    ///   in effect and the cache fits it.
    pub fn set_capacity(&self, capacity: usize) -> Result<()> {
        check_capacity(capacity)?;
        let evicted = {
            let mut chain = self.chain.lock();
            let previous = self.capacity.swap(capacity, Ordering::AcqRel);
            debug!("capacity changed from {previous} to {capacity}");
            self.drain_locked(&mut chain)
        };
        self.notify(evicted)
    }

    /// Evicts least recently used entries while `predicate` returns `true`.
    ///
    /// Pending recency events are drained first so the order is current. The
    /// predicate runs outside the structural lock and may inspect the cache
    /// through its read methods. The loop also stops when the cache is empty.
    ///
    /// # Errors
    ///
    /// - [`CacheError::Predicate`] if the predicate fails. Entries evicted
    ///   before the failure stay evicted.
    /// - [`CacheError::Listener`] if the listener fails; the loop stops after
    ///   that entry.
    pub fn evict_until<F, E>(&self, mut predicate: F) -> Result<()>
    where
        F: FnMut(&Self) -> core::result::Result<bool, E>,
        E: Into<BoxError>,
    {
        self.drain()?;
        loop {
            let exceeded = predicate(self).map_err(|err| CacheError::Predicate(err.into()))?;
            if !exceeded {
                break;
            }
            let evicted = self.evict_first(&mut self.chain.lock());
            match evicted {
                Some(entry) => {
                    self.metrics.record_evictions(1);
                    self.notify(vec![entry])?;
                }
                None => break,
            }
        }
        self.drain()
    }

    // ------------------------------------------------------------------
    // Draining
    // ------------------------------------------------------------------

    /// Applies every pending recency event and evicts down to capacity.
    ///
    /// Blocks until the structural lock is available.
    ///
    /// # Errors
    ///
    /// [`CacheError::Listener`] if the listener fails for an evicted entry.
    pub fn drain(&self) -> Result<()> {
        let evicted = self.drain_locked(&mut self.chain.lock());
        self.notify(evicted)
    }

    /// Drains only if no other thread is draining.
    fn try_drain(&self) -> Result<()> {
        let Some(mut chain) = self.chain.try_lock() else {
            return Ok(());
        };
        let evicted = self.drain_locked(&mut chain);
        drop(chain);
        self.notify(evicted)
    }

    fn drain_locked(&self, chain: &mut Chain<K, V>) -> Vec<(K, V)> {
        let mut applied = 0;
        if self.buffers.has_pending() {
            for segment in 0..self.buffers.len() {
                applied += self
                    .buffers
                    .drain_segment(segment, |event| self.apply(chain, event));
            }
        }
        if applied > 0 {
            self.metrics.record_drain(applied);
            debug!(
                "applied {applied} recency events across {} segments",
                self.buffers.len()
            );
        }
        self.evict_locked(chain)
    }

    fn apply(&self, chain: &mut Chain<K, V>, event: RecencyEvent<K, V>) {
        match event {
            RecencyEvent::Access(node) => {
                if node.is_alive() {
                    if let Some(slot) = node.slot() {
                        chain.move_to_back(slot);
                    }
                }
            }
            RecencyEvent::Add(node) => {
                if node.is_alive() && node.slot().is_none() {
                    let slot = chain.push_back(Arc::clone(&node));
                    node.set_slot(slot);
                }
            }
            RecencyEvent::Remove(node) => match node.state() {
                NodeState::Dead => {}
                NodeState::Alive | NodeState::Retired => {
                    if node.is_alive() {
                        self.unindex(&node);
                    }
                    if let Some(slot) = node.slot() {
                        chain.remove(slot);
                    }
                    node.mark_dead();
                }
            },
        }
    }

    // ------------------------------------------------------------------
    // Eviction
    // ------------------------------------------------------------------

    fn evict_locked(&self, chain: &mut Chain<K, V>) -> Vec<(K, V)> {
        let capacity = self.capacity();
        let mut evicted = Vec::new();
        while self.weighted_size() > capacity {
            match self.evict_first(chain) {
                Some(entry) => evicted.push(entry),
                None => break,
            }
        }
        if !evicted.is_empty() {
            self.metrics.record_evictions(evicted.len());
            debug!(
                "evicted {} entries, weighted size {} of {capacity}",
                evicted.len(),
                self.weighted_size()
            );
        }
        evicted
    }

    /// Evicts the least recently used live entry and returns a snapshot of it.
    ///
    /// Retired entries found at the front are unlinked on the way. Returns
    /// `None` once the chain is empty.
    fn evict_first(&self, chain: &mut Chain<K, V>) -> Option<(K, V)> {
        loop {
            let node = chain.pop_front()?;
            let unindexed = self.unindex(&node);
            node.mark_dead();
            if unindexed {
                trace!("evicted entry of weight {}", node.weight());
                return Some((node.key().clone(), node.value()));
            }
        }
    }

    /// Removes `node` from the table if it is still the entry for its key,
    /// retiring it. Returns whether this call retired the node.
    fn unindex(&self, node: &Arc<Node<K, V>>) -> bool {
        let hash = self.table.hash(node.key());
        let mut stripe = self.table.write(hash);
        let indexed = stripe
            .get(node.key())
            .is_some_and(|current| Arc::ptr_eq(current, node));
        if !indexed {
            return false;
        }
        stripe.remove(node.key());
        self.retire(node);
        true
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn weigh(&self, value: &V) -> Result<usize> {
        match self.weigher.weigh(value) {
            0 => Err(CacheError::InvalidWeight),
            weight if weight > MAXIMUM_CAPACITY => Err(CacheError::InvalidWeight),
            weight => Ok(weight),
        }
    }

    fn insert_node(
        &self,
        stripe: &mut Stripe<K, Arc<Node<K, V>>, S>,
        hash: u64,
        key: K,
        value: V,
        weight: usize,
    ) -> Arc<Node<K, V>> {
        let segment = self.buffers.segment_for_hash(hash);
        let node = Arc::new(Node::new(key.clone(), value, weight, segment));
        stripe.insert(key, Arc::clone(&node));
        self.weighted_size.fetch_add(weight, Ordering::AcqRel);
        node
    }

    /// Deducts a node's weight as it leaves the table. Stripe lock required.
    fn retire(&self, node: &Node<K, V>) {
        if let Some(weight) = node.retire() {
            self.weighted_size.fetch_sub(weight, Ordering::AcqRel);
        }
    }

    fn adjust_weight(&self, old_weight: usize, new_weight: usize) {
        if new_weight > old_weight {
            self.weighted_size
                .fetch_add(new_weight - old_weight, Ordering::AcqRel);
        } else if old_weight > new_weight {
            self.weighted_size
                .fetch_sub(old_weight - new_weight, Ordering::AcqRel);
        }
    }

    fn is_overflowed(&self) -> bool {
        self.weighted_size() > self.capacity()
    }

    /// Records an event from a read or removal path. Listener failures from
    /// the drain it may trigger have no caller to go to and are logged.
    fn after_read(&self, segment: usize, event: RecencyEvent<K, V>) {
        if self.buffers.record(segment, event) {
            if let Err(err) = self.try_drain() {
                warn!("eviction listener failed during opportunistic drain: {err}");
            }
        }
    }

    /// Records an event from a write path and restores the capacity bound.
    fn after_write(&self, segment: usize, event: RecencyEvent<K, V>) -> Result<()> {
        let should_drain = self.buffers.record(segment, event);
        if self.is_overflowed() {
            self.drain()
        } else if should_drain {
            self.try_drain()
        } else {
            Ok(())
        }
    }

    fn drain_quietly(&self, mut chain: parking_lot::MutexGuard<'_, Chain<K, V>>) {
        let evicted = self.drain_locked(&mut chain);
        drop(chain);
        if let Err(err) = self.notify(evicted) {
            warn!("eviction listener failed: {err}");
        }
    }

    fn notify(&self, evicted: Vec<(K, V)>) -> Result<()> {
        if evicted.is_empty() {
            return Ok(());
        }
        notify_all(&self.listener, evicted).map_err(CacheError::Listener)
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Keys in recency order, least recently used first.
    ///
    /// Reflects only drained events; call [`drain`](Self::drain) first for an
    /// exact order.
    pub fn ascending_keys(&self) -> Vec<K> {
        let chain = self.chain.lock();
        chain
            .iter()
            .filter(|node| node.is_alive())
            .map(|node| node.key().clone())
            .collect()
    }

    /// Keys in recency order, most recently used first.
    pub fn descending_keys(&self) -> Vec<K> {
        let chain = self.chain.lock();
        chain
            .iter()
            .rev()
            .filter(|node| node.is_alive())
            .map(|node| node.key().clone())
            .collect()
    }

    /// Number of recency segments.
    pub fn segment_count(&self) -> usize {
        self.buffers.len()
    }

    /// The segment that buffers recency events for `key`.
    pub fn segment_for<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
    {
        self.buffers.segment_for_hash(self.table.hash(key))
    }

    /// Recency events recorded in `segment` and not yet drained.
    ///
    /// # Panics
    ///
    /// Panics if `segment >= segment_count()`.
    pub fn pending_events(&self, segment: usize) -> usize {
        self.buffers.pending(segment)
    }

    /// Returns the cache's counters.
    pub fn stats(&self) -> &LinkedCacheMetrics {
        &self.metrics
    }
}

fn check_capacity(capacity: usize) -> Result<()> {
    if capacity > MAXIMUM_CAPACITY {
        return Err(CacheError::InvalidCapacity {
            capacity,
            maximum: MAXIMUM_CAPACITY,
        });
    }
    Ok(())
}

impl<K, V, W, L, S> CacheMetrics for LinkedCache<K, V, W, L, S>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Clone + Send + Sync,
    W: Weigher<V>,
    L: EvictionListener<K, V>,
    S: BuildHasher + Clone,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.metrics.to_btreemap();
        metrics.insert("capacity".to_string(), self.capacity() as f64);
        metrics.insert("size".to_string(), self.size() as f64);
        metrics.insert("weighted_size".to_string(), self.weighted_size() as f64);
        metrics
    }

    fn algorithm_name(&self) -> &'static str {
        "LinkedLRU"
    }
}

impl<K, V, W, L, S> fmt::Debug for LinkedCache<K, V, W, L, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedCache")
            .field("segment_count", &self.buffers.len())
            .field("stripe_count", &self.table.stripe_count())
            .field("weighted_size", &self.weighted_size.load(Ordering::Relaxed))
            .field("capacity", &self.capacity.load(Ordering::Relaxed))
            .finish()
    }
}

//! Cache entries and their lifecycle.
//!
//! A [`Node`] is shared between the backing table, the recency buffers and the
//! recency chain through an `Arc`. Its state only moves forward:
//!
//! ```text
//!   ALIVE ──(removed from table)──▶ RETIRED ──(unlinked by drain)──▶ DEAD
//! ```
//!
//! - `ALIVE`: indexed in the table; counted in the weighted size.
//! - `RETIRED`: gone from the table and the weighted size; may still be linked.
//! - `DEAD`: unlinked; every later event naming it is ignored.
//!
//! ALIVE → RETIRED happens under the key's table stripe lock. RETIRED → DEAD
//! happens under the structural lock. The `slot` field is only read or
//! written under the structural lock.

use core::fmt;
use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use parking_lot::RwLock;

/// Slot value of a node that is not linked in the recency chain.
pub(crate) const UNLINKED: usize = usize::MAX;

/// Lifecycle state of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeState {
    /// Indexed in the table and counted in the weighted size.
    Alive = 0,
    /// Removed from the table, weight deducted, possibly still linked.
    Retired = 1,
    /// Unlinked from the recency chain; inert.
    Dead = 2,
}

impl NodeState {
    fn from_u8(raw: u8) -> NodeState {
        match raw {
            0 => NodeState::Alive,
            1 => NodeState::Retired,
            _ => NodeState::Dead,
        }
    }
}

/// A cache entry.
pub(crate) struct Node<K, V> {
    key: K,
    value: RwLock<V>,
    weight: AtomicUsize,
    state: AtomicU8,
    slot: AtomicUsize,
    segment: usize,
}

impl<K, V> Node<K, V> {
    /// Creates an `ALIVE`, unlinked node.
    pub(crate) fn new(key: K, value: V, weight: usize, segment: usize) -> Self {
        Node {
            key,
            value: RwLock::new(value),
            weight: AtomicUsize::new(weight),
            state: AtomicU8::new(NodeState::Alive as u8),
            slot: AtomicUsize::new(UNLINKED),
            segment,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn segment(&self) -> usize {
        self.segment
    }

    #[inline]
    pub(crate) fn weight(&self) -> usize {
        self.weight.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn state(&self) -> NodeState {
        NodeState::from_u8(self.state.load(Ordering::Acquire))
    }

    #[inline]
    pub(crate) fn is_alive(&self) -> bool {
        self.state() == NodeState::Alive
    }

    /// Clones the current value.
    pub(crate) fn value(&self) -> V
    where
        V: Clone,
    {
        self.value.read().clone()
    }

    /// Applies `f` to the current value without cloning it.
    pub(crate) fn with_value<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(&self.value.read())
    }

    /// Swaps in a new value and weight, returning the old value and weight.
    ///
    /// Must be called with the key's table stripe write-locked.
    pub(crate) fn replace(&self, value: V, weight: usize) -> (V, usize) {
        let old_value = core::mem::replace(&mut *self.value.write(), value);
        let old_weight = self.weight.swap(weight, Ordering::AcqRel);
        (old_value, old_weight)
    }

    /// Moves the node from `ALIVE` to `RETIRED`.
    ///
    /// Returns the weight to deduct, or `None` if the node was already retired.
    pub(crate) fn retire(&self) -> Option<usize> {
        self.state
            .compare_exchange(
                NodeState::Alive as u8,
                NodeState::Retired as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .ok()
            .map(|_| self.weight())
    }

    /// Marks the node `DEAD`. Only the structural-lock holder calls this.
    pub(crate) fn mark_dead(&self) {
        self.state.store(NodeState::Dead as u8, Ordering::Release);
        self.slot.store(UNLINKED, Ordering::Relaxed);
    }

    /// Chain slot, or `None` when unlinked. Structural lock required.
    #[inline]
    pub(crate) fn slot(&self) -> Option<usize> {
        match self.slot.load(Ordering::Relaxed) {
            UNLINKED => None,
            slot => Some(slot),
        }
    }

    /// Records the chain slot. Structural lock required.
    #[inline]
    pub(crate) fn set_slot(&self, slot: usize) {
        self.slot.store(slot, Ordering::Relaxed);
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Node<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("weight", &self.weight())
            .field("state", &self.state())
            .field("segment", &self.segment)
            .finish()
    }
}

//! Segmented recency buffers.
//!
//! Each segment owns an unbounded MPMC queue of [`RecencyEvent`]s and a counter
//! of events recorded but not yet drained. Producers never take the
//! structural lock; they push, bump the counter and learn whether the
//! segment has reached its drain threshold. Only the structural-lock holder
//! consumes events.
//!
//! The counter is incremented after the push, so it never exceeds the number
//! of events actually sitting in the queue. A drain takes a snapshot of the
//! counter and consumes exactly that many events; anything recorded during the
//! drain waits for the next pass.

use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::node::Node;

/// A buffered record of a table operation, waiting to be applied to the
/// recency chain.
pub(crate) enum RecencyEvent<K, V> {
    /// The node was read or updated.
    Access(Arc<Node<K, V>>),
    /// The node was inserted into the table.
    Add(Arc<Node<K, V>>),
    /// The node was removed from the table.
    Remove(Arc<Node<K, V>>),
}

struct Segment<K, V> {
    sender: Sender<RecencyEvent<K, V>>,
    receiver: Receiver<RecencyEvent<K, V>>,
    pending: AtomicUsize,
}

pub(crate) struct RecencyBuffers<K, V> {
    segments: Box<[Segment<K, V>]>,
    threshold: usize,
}

impl<K, V> RecencyBuffers<K, V> {
    pub(crate) fn new(segments: usize, threshold: usize) -> Self {
        let segments: Vec<_> = (0..segments.max(1))
            .map(|_| {
                let (sender, receiver) = crossbeam_channel::unbounded();
                Segment {
                    sender,
                    receiver,
                    pending: AtomicUsize::new(0),
                }
            })
            .collect();

        RecencyBuffers {
            segments: segments.into_boxed_slice(),
            threshold,
        }
    }

    /// Number of segments.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.segments.len()
    }

    /// Maps a key hash to its segment.
    #[inline]
    pub(crate) fn segment_for_hash(&self, hash: u64) -> usize {
        (hash as usize) % self.segments.len()
    }

    /// Records an event in `segment`.
    ///
    /// Returns `true` when the segment's pending count has reached the drain
    /// threshold and the caller should attempt a drain.
    pub(crate) fn record(&self, segment: usize, event: RecencyEvent<K, V>) -> bool {
        let segment = &self.segments[segment];
        // The receiver lives as long as the sender, so sending cannot fail.
        if segment.sender.send(event).is_err() {
            return false;
        }
        let pending = segment.pending.fetch_add(1, Ordering::AcqRel) + 1;
        pending >= self.threshold
    }

    /// Events recorded in `segment` and not yet drained.
    #[inline]
    pub(crate) fn pending(&self, segment: usize) -> usize {
        self.segments[segment].pending.load(Ordering::Acquire)
    }

    /// Returns `true` if any segment has pending events.
    pub(crate) fn has_pending(&self) -> bool {
        (0..self.segments.len()).any(|segment| self.pending(segment) > 0)
    }

    /// Consumes the events pending in `segment` at the time of the call, in
    /// FIFO order. Structural lock required.
    ///
    /// Returns the number of events handed to `apply`.
    pub(crate) fn drain_segment(
        &self,
        segment: usize,
        mut apply: impl FnMut(RecencyEvent<K, V>),
    ) -> usize {
        let segment = &self.segments[segment];
        let snapshot = segment.pending.load(Ordering::Acquire);
        let mut drained = 0;
        while drained < snapshot {
            match segment.receiver.try_recv() {
                Ok(event) => {
                    apply(event);
                    drained += 1;
                }
                Err(_) => break,
            }
        }
        segment.pending.fetch_sub(drained, Ordering::AcqRel);
        drained
    }
}

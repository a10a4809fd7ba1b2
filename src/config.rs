//! Cache Configuration Module
//!
//! This module provides the configuration structure for [`LinkedCache`](crate::LinkedCache).
//! The configuration holds only plain numeric settings so it stays `Copy`; the
//! weigher, eviction listener and hasher are attached through the
//! [`Builder`](crate::Builder).
//!
//! # Sizing Guidelines
//!
//! ## Understanding `capacity` and weights
//!
//! - **`capacity`**: The maximum *weighted* size of the cache. With the default
//!   [`Singleton`](crate::weigher::Singleton) weigher every entry weighs 1 and the
//!   capacity is an entry count.
//! - With a custom weigher, capacity is expressed in the weigher's unit (bytes,
//!   elements, ...). A single entry heavier than the capacity is admitted and
//!   then evicted by the next drain.
//!
//! ## Segments and the recency threshold
//!
//! ```text
//! reads ──▶ hash(key) % segments ──▶ segment buffer ──(threshold)──▶ drain
//! ```
//!
//! - **`segments`**: Number of recency buffers (and table stripes). More
//!   segments reduce contention between threads recording accesses.
//! - **`recency_threshold`**: Pending events per segment that trigger an
//!   opportunistic drain. Larger values amortize the structural lock over more
//!   events at the cost of staler recency order.
//!
//! # Examples
//!
//! ```
//! use linked_cache::config::LinkedCacheConfig;
//! use linked_cache::LinkedCache;
//!
//! let config = LinkedCacheConfig::new(10_000)
//!     .with_segments(16)
//!     .with_initial_capacity(1_024);
//! let cache: LinkedCache<String, i32> = LinkedCache::init(config).unwrap();
//! assert_eq!(cache.capacity(), 10_000);
//! ```

use core::fmt;

/// Pending events per segment that trigger an opportunistic drain.
pub const RECENCY_THRESHOLD: usize = 64;

/// Largest accepted weighted capacity.
///
/// Also the largest accepted entry weight. Together the two bounds keep the
/// weighted size accounting, which may briefly exceed the capacity by one
/// entry's weight, clear of overflow.
pub const MAXIMUM_CAPACITY: usize = (isize::MAX as usize) >> 1;

/// Default initial capacity of the backing table.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Returns the default number of segments based on available parallelism.
pub fn default_segment_count() -> usize {
    // Use available parallelism, clamped to reasonable bounds
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(16)
        .clamp(4, 64)
}

/// Configuration for a [`LinkedCache`](crate::LinkedCache).
///
/// # Required Parameters
///
/// - `capacity`: maximum weighted size (set in constructor)
///
/// # Optional Parameters (Builder Methods)
///
/// - `initial_capacity`: table pre-allocation hint (default: 16)
/// - `segments`: number of recency buffers and table stripes (default: based on CPU count)
/// - `recency_threshold`: pending events per segment before a drain is attempted
///   (default: [`RECENCY_THRESHOLD`])
///
/// Values are validated when the cache is built, not here.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LinkedCacheConfig {
    capacity: usize,
    initial_capacity: usize,
    segments: usize,
    recency_threshold: usize,
}

impl LinkedCacheConfig {
    /// Creates a configuration with the given maximum weighted capacity and
    /// defaults for everything else.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            segments: default_segment_count(),
            recency_threshold: RECENCY_THRESHOLD,
        }
    }

    /// Sets the initial capacity hint for the backing table.
    ///
    /// The hint is spread evenly across table stripes.
    #[must_use]
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the number of segments (the expected concurrency level).
    #[must_use]
    pub fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    /// Sets the number of pending events per segment that triggers a drain.
    #[must_use]
    pub fn with_recency_threshold(mut self, recency_threshold: usize) -> Self {
        self.recency_threshold = recency_threshold;
        self
    }

    /// Returns the maximum weighted capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the initial capacity hint.
    #[inline]
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Returns the number of segments.
    #[inline]
    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Returns the recency threshold.
    #[inline]
    pub fn recency_threshold(&self) -> usize {
        self.recency_threshold
    }
}

impl fmt::Debug for LinkedCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedCacheConfig")
            .field("capacity", &self.capacity)
            .field("initial_capacity", &self.initial_capacity)
            .field("segments", &self.segments)
            .field("recency_threshold", &self.recency_threshold)
            .finish()
    }
}

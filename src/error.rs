//! Error types returned by cache operations.
//!
//! Only operations that validate input or hand entries to user code can fail.
//! Races between concurrent operations on the same node are resolved by state
//! checks during a drain and never surface here.

use std::error::Error as StdError;
use thiserror::Error;

/// Boxed error produced by user-supplied sinks such as eviction listeners
/// and `evict_until` predicates.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T, E = CacheError> = core::result::Result<T, E>;

/// Errors reported by [`LinkedCache`](crate::LinkedCache).
#[derive(Debug, Error)]
pub enum CacheError {
    /// The requested weighted capacity is outside the supported range.
    #[error("invalid capacity {capacity}: must not exceed {maximum}")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
        /// The largest accepted capacity.
        maximum: usize,
    },

    /// A segment count or recency threshold of zero was configured.
    #[error("invalid {name}: must be greater than zero")]
    InvalidConfig {
        /// Name of the offending setting.
        name: &'static str,
    },

    /// The weigher assigned a weight of zero, or one larger than
    /// [`MAXIMUM_CAPACITY`](crate::config::MAXIMUM_CAPACITY), to a value.
    #[error("weigher returned an out-of-range weight; entry weights must be between 1 and the maximum capacity")]
    InvalidWeight,

    /// The eviction listener failed. The entry was still evicted and the
    /// cache remains consistent.
    #[error("eviction listener failed")]
    Listener(#[source] BoxError),

    /// The `evict_until` predicate failed. Entries evicted before the failure
    /// stay evicted.
    #[error("eviction predicate failed")]
    Predicate(#[source] BoxError),
}

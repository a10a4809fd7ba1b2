#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                           LinkedCache                               │
//! │                                                                     │
//! │  Table (striped RwLock<HashMap<K, Arc<Node>>>)                      │
//! │     │  per-key read-modify-write under the stripe lock              │
//! │     ▼                                                               │
//! │  RecencyBuffers: segment 0 │ segment 1 │ ... │ segment N-1          │
//! │     │  ACCESS / ADD / REMOVE events, pending counter per segment    │
//! │     ▼                                                               │
//! │  Mutex<List<Arc<Node>>>  (structural lock)                          │
//! │     sentinel ⇄ LRU ⇄ ... ⇄ MRU ⇄ sentinel                           │
//! │     │                                                               │
//! │     ▼                                                               │
//! │  evict from the LRU end while weighted_size > capacity              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Entry lifecycle
//!
//! | State | In table | Counted in weighted size | In chain |
//! |-------|----------|--------------------------|----------|
//! | ALIVE | yes | yes | once its ADD is drained |
//! | RETIRED | no | no | until its REMOVE is drained |
//! | DEAD | no | no | never again |
//!
//! ## Modules
//!
//! - [`cache`]: The cache itself
//! - [`builder`]: Fluent construction with custom weigher, listener and hasher
//! - [`config`]: Numeric configuration and defaults
//! - [`weigher`]: Entry weighers
//! - [`listener`]: Eviction listeners
//! - [`error`]: Error types
//! - [`metrics`]: Counters and the [`CacheMetrics`] trait

/// Bounded concurrent cache with buffered recency maintenance.
pub mod cache;

/// Builder for caches with custom weighers, listeners or hashers.
pub mod builder;

/// Cache configuration.
pub mod config;

/// Error types.
pub mod error;

/// Value weighers.
pub mod weigher;

/// Eviction listeners.
pub mod listener;

/// Cache metrics system.
///
/// Counters for lookups, evictions and drains, reported through the
/// [`CacheMetrics`] trait.
pub mod metrics;

/// Index-linked circular list anchored at a sentinel slot.
///
/// Internal infrastructure for the recency chain.
pub(crate) mod list;

pub(crate) mod buffer;
pub(crate) mod node;
pub(crate) mod table;

pub use builder::Builder;
pub use cache::LinkedCache;
pub use config::LinkedCacheConfig;
pub use error::{BoxError, CacheError, Result};
pub use listener::{DiscardingListener, EvictionListener};
pub use metrics::{CacheMetrics, LinkedCacheMetrics};
pub use weigher::{ByteLen, CollectionLen, Singleton, Weigher};

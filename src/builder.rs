//! Fluent construction of a [`LinkedCache`].
//!
//! ```
//! use linked_cache::weigher::ByteLen;
//! use linked_cache::{BoxError, LinkedCache};
//!
//! let cache: LinkedCache<u64, Vec<u8>, _, _> = LinkedCache::builder(64 * 1024)
//!     .segments(8)
//!     .weigher(ByteLen)
//!     .listener(|key: u64, value: Vec<u8>| -> Result<(), BoxError> {
//!         println!("evicted {key} ({} bytes)", value.len());
//!         Ok(())
//!     })
//!     .build()
//!     .unwrap();
//! assert_eq!(cache.capacity(), 64 * 1024);
//! ```

use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;

use crate::cache::{DefaultHashBuilder, LinkedCache};
use crate::config::LinkedCacheConfig;
use crate::error::Result;
use crate::listener::{DiscardingListener, EvictionListener};
use crate::weigher::{Singleton, Weigher};

/// Builds a [`LinkedCache`] with a custom weigher, listener or hasher.
///
/// Numeric settings mirror [`LinkedCacheConfig`]; they are validated by
/// [`build`](Self::build).
pub struct Builder<K, V, W = Singleton, L = DiscardingListener, S = DefaultHashBuilder> {
    config: LinkedCacheConfig,
    weigher: W,
    listener: L,
    hash_builder: S,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> Builder<K, V> {
    /// Starts a builder for a cache bounded by `capacity`.
    pub fn new(capacity: usize) -> Self {
        Builder {
            config: LinkedCacheConfig::new(capacity),
            weigher: Singleton,
            listener: DiscardingListener,
            hash_builder: DefaultHashBuilder::default(),
            _marker: PhantomData,
        }
    }
}

impl<K, V, W, L, S> Builder<K, V, W, L, S> {
    /// Replaces every numeric setting with `config`.
    #[must_use]
    pub fn config(mut self, config: LinkedCacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the maximum weighted capacity.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config = LinkedCacheConfig::new(capacity)
            .with_initial_capacity(self.config.initial_capacity())
            .with_segments(self.config.segments())
            .with_recency_threshold(self.config.recency_threshold());
        self
    }

    /// Sets the initial capacity hint for the backing table.
    #[must_use]
    pub fn initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.config = self.config.with_initial_capacity(initial_capacity);
        self
    }

    /// Sets the number of segments.
    #[must_use]
    pub fn segments(mut self, segments: usize) -> Self {
        self.config = self.config.with_segments(segments);
        self
    }

    /// Sets the pending events per segment that trigger a drain.
    #[must_use]
    pub fn recency_threshold(mut self, recency_threshold: usize) -> Self {
        self.config = self.config.with_recency_threshold(recency_threshold);
        self
    }

    /// Sets the weigher.
    pub fn weigher<W2>(self, weigher: W2) -> Builder<K, V, W2, L, S>
    where
        W2: Weigher<V>,
    {
        Builder {
            config: self.config,
            weigher,
            listener: self.listener,
            hash_builder: self.hash_builder,
            _marker: PhantomData,
        }
    }

    /// Sets the eviction listener.
    pub fn listener<L2>(self, listener: L2) -> Builder<K, V, W, L2, S>
    where
        L2: EvictionListener<K, V>,
    {
        Builder {
            config: self.config,
            weigher: self.weigher,
            listener,
            hash_builder: self.hash_builder,
            _marker: PhantomData,
        }
    }

    /// Sets the hash builder used by the table and for segment selection.
    pub fn hasher<S2>(self, hash_builder: S2) -> Builder<K, V, W, L, S2>
    where
        S2: BuildHasher + Clone,
    {
        Builder {
            config: self.config,
            weigher: self.weigher,
            listener: self.listener,
            hash_builder,
            _marker: PhantomData,
        }
    }

    /// Builds the cache.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidCapacity`](crate::CacheError::InvalidCapacity) or
    /// [`CacheError::InvalidConfig`](crate::CacheError::InvalidConfig) if a
    /// setting is out of range.
    pub fn build(self) -> Result<LinkedCache<K, V, W, L, S>>
    where
        K: Hash + Eq + Clone + Send + Sync,
        V: Clone + Send + Sync,
        W: Weigher<V>,
        L: EvictionListener<K, V>,
        S: BuildHasher + Clone,
    {
        LinkedCache::from_parts(self.config, self.weigher, self.listener, self.hash_builder)
    }
}

impl<K, V, W, L, S> fmt::Debug for Builder<K, V, W, L, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

//! Builder for [`AccessCountedCache`] instances.
//!
//! Collects policy parameters and the hash strategy, then validates them all
//! at once in [`try_build`](CacheBuilder::try_build).
//!
//! ## Example
//!
//! ```
//! use coldtrim::builder::CacheBuilder;
//! use coldtrim::traits::CoreCache;
//!
//! let mut cache = CacheBuilder::new()
//!     .max_entries(100)
//!     .watermark(75)
//!     .try_build::<u64, String>()
//!     .unwrap();
//! cache.insert(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! ```

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

use crate::error::ConfigError;
use crate::policy::access_counted::{AccessCountedCache, DEFAULT_MAX_ENTRIES};

/// Builder for [`AccessCountedCache`].
///
/// Defaults to [`DEFAULT_MAX_ENTRIES`], no explicit watermark, and the
/// standard library's `RandomState` hasher.
#[derive(Debug)]
pub struct CacheBuilder<S = RandomState> {
    max_entries: usize,
    watermark: Option<usize>,
    hasher: S,
}

impl CacheBuilder<RandomState> {
    /// Creates a builder with default parameters.
    pub fn new() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            watermark: None,
            hasher: RandomState::new(),
        }
    }
}

impl Default for CacheBuilder<RandomState> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> CacheBuilder<S>
where
    S: BuildHasher,
{
    /// Sets the entry ceiling. Must be at least 2.
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Sets an explicit reclaim watermark. Must satisfy
    /// `1 <= watermark < max_entries`; without one, reclaim targets
    /// `max(1, max_entries * 3 / 4)`.
    pub fn watermark(mut self, watermark: usize) -> Self {
        self.watermark = Some(watermark);
        self
    }

    /// Replaces the hash strategy used for key identity.
    ///
    /// # Example
    ///
    /// ```
    /// use coldtrim::builder::CacheBuilder;
    /// use rustc_hash::FxBuildHasher;
    ///
    /// let cache = CacheBuilder::new()
    ///     .max_entries(64)
    ///     .hasher(FxBuildHasher)
    ///     .try_build::<u64, u64>()
    ///     .unwrap();
    /// assert_eq!(cache.max_entries(), 64);
    /// ```
    pub fn hasher<S2: BuildHasher>(self, hasher: S2) -> CacheBuilder<S2> {
        CacheBuilder {
            max_entries: self.max_entries,
            watermark: self.watermark,
            hasher,
        }
    }

    /// Validates the collected parameters and builds the cache.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `max_entries < 2` or a configured watermark
    /// is outside `[1, max_entries)`.
    pub fn try_build<K, V>(self) -> Result<AccessCountedCache<K, V, S>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        AccessCountedCache::try_with_hasher(self.max_entries, self.watermark, self.hasher)
    }
}

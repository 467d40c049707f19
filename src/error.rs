//! Error types for the coldtrim library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when cache policy parameters are invalid
//!   (e.g. `max_entries < 2`, watermark outside `[1, max_entries)`).
//! - [`DuplicateKey`]: Returned by the strict insert path when the key is
//!   already present. The upsert path never produces it.
//! - [`KeyNotFound`]: Returned by the strict read path when the key is absent.
//!   [`get`](crate::traits::CoreCache::get) is the non-failing alternative.
//!
//! All errors are contract violations by the caller and surface synchronously
//! before any state is mutated. Nothing is logged or retried internally.
//!
//! ## Example Usage
//!
//! ```
//! use coldtrim::error::ConfigError;
//! use coldtrim::policy::access_counted::AccessCountedCache;
//!
//! // Fallible constructor for user-configurable parameters
//! let cache: Result<AccessCountedCache<String, i32>, ConfigError> =
//!     AccessCountedCache::try_with_watermark(100, 75);
//! assert!(cache.is_ok());
//!
//! // Out-of-range watermark is caught without panicking
//! let bad = AccessCountedCache::<String, i32>::try_with_watermark(100, 100);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache policy parameters are invalid.
///
/// Produced by the fallible constructors, [`set_capacity`] and
/// [`CacheBuilder::try_build`]. Carries a human-readable description of which
/// parameter failed validation.
///
/// [`set_capacity`]: crate::policy::access_counted::AccessCountedCache::set_capacity
/// [`CacheBuilder::try_build`]: crate::builder::CacheBuilder::try_build
///
/// # Example
///
/// ```
/// use coldtrim::policy::access_counted::AccessCountedCache;
///
/// let err = AccessCountedCache::<u64, u64>::try_new(1).unwrap_err();
/// assert!(err.to_string().contains("max_entries"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// DuplicateKey
// ---------------------------------------------------------------------------

/// Error returned by [`try_insert`] when the key is already present.
///
/// Mirrors dictionary "add" semantics: the strict insert refuses to overwrite.
/// Use the upsert [`insert`](crate::traits::CoreCache::insert) to replace an
/// existing value instead.
///
/// [`try_insert`]: crate::policy::access_counted::AccessCountedCache::try_insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateKey;

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("key already present in cache")
    }
}

impl std::error::Error for DuplicateKey {}

// ---------------------------------------------------------------------------
// KeyNotFound
// ---------------------------------------------------------------------------

/// Error returned by [`fetch`] when the key is absent.
///
/// [`fetch`]: crate::policy::access_counted::AccessCountedCache::fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyNotFound;

impl fmt::Display for KeyNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("key not found in cache")
    }
}

impl std::error::Error for KeyNotFound {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

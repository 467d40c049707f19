//! Convenience re-exports for the common coldtrim surface.

pub use crate::builder::CacheBuilder;
pub use crate::error::{ConfigError, DuplicateKey, KeyNotFound};
pub use crate::policy::access_counted::{
    AccessCountedCache, FxAccessCountedCache, DEFAULT_MAX_ENTRIES,
};
pub use crate::traits::{CoreCache, CountedCacheTrait, MutableCache};

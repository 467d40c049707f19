//! coldtrim: a bounded key/value cache that tracks per-entry read counts and
//! batch-reclaims the coldest entries down to a watermark.
//!
//! The core type is [`policy::access_counted::AccessCountedCache`].

pub mod builder;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod traits;

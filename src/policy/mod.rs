//! Eviction policy implementations.
//!
//! Currently a single policy: [`access_counted`], which ranks entries by read
//! count and batch-reclaims the coldest entries down to a watermark.

pub mod access_counted;

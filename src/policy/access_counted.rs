//! # Access-Counted Cache with Watermark Reclaim
//!
//! A bounded key/value map that tracks how many times each value has been read
//! and, when an insert would push it past `max_entries`, batch-evicts the
//! coldest entries down to a configurable watermark.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                 AccessCountedCache<K, V, S>                  │
//!   │                                                              │
//!   │   ┌────────────────────────────────────────────────────────┐ │
//!   │   │  HashMap<K, Slot<V>, S>                                │ │
//!   │   │                                                        │ │
//!   │   │  ┌─────────┬────────────────┬───────────────────────┐  │ │
//!   │   │  │   Key   │  access_count  │  seq (insert order)   │  │ │
//!   │   │  ├─────────┼────────────────┼───────────────────────┤  │ │
//!   │   │  │ page_1  │      15        │  0   ← hot, survives  │  │ │
//!   │   │  │ page_2  │       0        │  1   ← cold, evicted  │  │ │
//!   │   │  │ page_3  │       3        │  2                    │  │ │
//!   │   │  └─────────┴────────────────┴───────────────────────┘  │ │
//!   │   └────────────────────────────────────────────────────────┘ │
//!   │                                                              │
//!   │   max_entries: usize  (hard ceiling, ≥ 2)                    │
//!   │   watermark:   Option<usize>  (reclaim target, 1..max)       │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reclaim Flow
//!
//! ```text
//!   try_insert(key, value) / insert of a new key
//!        │
//!        ▼
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │ len + 1 ≤ max_entries?                                       │
//!   │                                                              │
//!   │   YES → insert with access_count = 0                         │
//!   │   NO  → reclaim_count = (len + 1) − watermark_count          │
//!   │         rank entries by (access_count, seq) ascending        │
//!   │         remove the first reclaim_count keys, then insert     │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The effective `watermark_count` is the explicit watermark if one was
//! configured, otherwise `max(1, max_entries * 3 / 4)`.
//!
//! ## Core Operations
//!
//! | Method                   | Complexity   | Description                          |
//! |--------------------------|--------------|--------------------------------------|
//! | `try_insert(k, v)`       | O(1)*        | Strict add, errors on duplicate      |
//! | `insert(k, v)`           | O(1)*        | Upsert, returns previous value       |
//! | `get(&k)` / `fetch(&k)`  | O(1)*        | Read, increments access count        |
//! | `peek(&k)`               | O(1)         | Read without counting                |
//! | `remove(&k)`             | O(1)         | Remove by key, never reclaims        |
//! | `set_capacity(max, wm)`  | O(n log n)   | Replace policy params, reclaim now   |
//! | `values()`               | O(n)         | Counted bulk read (see below)        |
//!
//! \* amortized; a triggered reclaim costs O(n log n), a triggered counter
//! rescale costs O(n).
//!
//! ## Reads Mutate State
//!
//! Every successful read through [`get`](CoreCache::get), [`fetch`], or
//! [`values`] increments the matched entry's access count. This is the only
//! way counts increase; inserts and upserts never touch them. Consequently
//! all read paths take `&mut self` and concurrent use requires external
//! mutual exclusion even for "read-only" workloads.
//!
//! [`values`] goes further: enumerating values counts a read against **every
//! live entry**, not just the ones the iterator is advanced over. Use
//! [`peek`] or [`keys`] when counting is not wanted.
//!
//! ## Counter Overflow
//!
//! `access_count` is a `u32`. A read that would increment a counter already at
//! `u32::MAX` first halves every live entry's counter (integer floor division)
//! in a single O(n) pass, then increments. Relative coldness ordering is
//! preserved up to rounding, and counters stay bounded indefinitely.
//!
//! ## Eviction Determinism
//!
//! Entries are ranked by `(access_count, seq)` where `seq` is a monotonically
//! assigned insertion sequence. Among entries with equal counts the oldest
//! inserted is evicted first, so eviction order never depends on map iteration
//! order.
//!
//! ## Thread Safety
//!
//! `AccessCountedCache` is **not** thread-safe and performs no internal
//! locking. Wrap it in a `Mutex` or confine it to one thread for shared use.
//!
//! [`fetch`]: AccessCountedCache::fetch
//! [`peek`]: AccessCountedCache::peek
//! [`keys`]: AccessCountedCache::keys
//! [`values`]: AccessCountedCache::values

use std::collections::hash_map::{self, RandomState};
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;

use rustc_hash::FxBuildHasher;

use crate::error::{ConfigError, DuplicateKey, KeyNotFound};
use crate::traits::{CoreCache, CountedCacheTrait, MutableCache};

/// Default entry ceiling used by [`Default`] and [`CacheBuilder`].
///
/// [`CacheBuilder`]: crate::builder::CacheBuilder
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

/// [`AccessCountedCache`] keyed with the fast FxHash strategy from
/// `rustc-hash`.
pub type FxAccessCountedCache<K, V> = AccessCountedCache<K, V, FxBuildHasher>;

/// Validates cache policy parameters.
///
/// `max_entries` must be at least 2; a watermark, when present, must satisfy
/// `1 <= watermark < max_entries`.
pub(crate) fn validate_config(
    max_entries: usize,
    watermark: Option<usize>,
) -> Result<(), ConfigError> {
    if max_entries < 2 {
        return Err(ConfigError::new(format!(
            "max_entries must be at least 2, got {max_entries}"
        )));
    }
    if let Some(watermark) = watermark {
        if watermark < 1 || watermark >= max_entries {
            return Err(ConfigError::new(format!(
                "watermark must be in 1..{max_entries}, got {watermark}"
            )));
        }
    }
    Ok(())
}

#[derive(Debug)]
struct Slot<V> {
    value: V,
    access_count: u32,
    seq: u64,
}

/// Bounded key/value cache that evicts the least-read entries.
///
/// See the module-level documentation for the full behavioral contract.
///
/// # Example
///
/// ```
/// use coldtrim::policy::access_counted::AccessCountedCache;
/// use coldtrim::traits::{CoreCache, CountedCacheTrait};
///
/// let mut cache = AccessCountedCache::try_with_watermark(4, 2).unwrap();
/// cache.insert("a", 1);
/// cache.insert("b", 2);
///
/// // Reads rank entries; "a" is now warmer than "b".
/// cache.get(&"a");
/// assert_eq!(cache.access_count(&"a"), Some(1));
/// assert_eq!(cache.access_count(&"b"), Some(0));
/// ```
#[derive(Debug)]
pub struct AccessCountedCache<K, V, S = RandomState> {
    entries: HashMap<K, Slot<V>, S>,
    max_entries: usize,
    watermark: Option<usize>,
    next_seq: u64,
}

impl<K, V> AccessCountedCache<K, V, RandomState>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with the given entry ceiling and the default watermark
    /// (`max(1, max_entries * 3 / 4)`, resolved at reclaim time).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `max_entries < 2`.
    pub fn try_new(max_entries: usize) -> Result<Self, ConfigError> {
        Self::try_with_hasher(max_entries, None, RandomState::new())
    }

    /// Creates a cache with an explicit reclaim watermark.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `max_entries < 2` or if the watermark is
    /// outside `[1, max_entries)`.
    ///
    /// # Example
    ///
    /// ```
    /// use coldtrim::policy::access_counted::AccessCountedCache;
    ///
    /// let cache = AccessCountedCache::<u64, u64>::try_with_watermark(10, 7).unwrap();
    /// assert_eq!(cache.watermark(), Some(7));
    ///
    /// assert!(AccessCountedCache::<u64, u64>::try_with_watermark(5, 5).is_err());
    /// ```
    pub fn try_with_watermark(max_entries: usize, watermark: usize) -> Result<Self, ConfigError> {
        Self::try_with_hasher(max_entries, Some(watermark), RandomState::new())
    }
}

impl<K, V> Default for AccessCountedCache<K, V, RandomState>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with [`DEFAULT_MAX_ENTRIES`] and the default watermark.
    fn default() -> Self {
        Self::try_new(DEFAULT_MAX_ENTRIES).expect("default configuration is valid")
    }
}

impl<K, V> FxAccessCountedCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an FxHash-keyed cache with the given entry ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `max_entries < 2`.
    pub fn try_new_fx(max_entries: usize) -> Result<Self, ConfigError> {
        Self::try_with_hasher(max_entries, None, FxBuildHasher)
    }
}

impl<K, V, S> AccessCountedCache<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    /// Creates a cache with a custom hash strategy.
    ///
    /// The hasher is the injected key-identity capability: together with the
    /// key type's `Eq` it decides which keys collide. Pass `None` for
    /// `watermark` to use the 75%-of-capacity default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `max_entries < 2` or if a provided watermark
    /// is outside `[1, max_entries)`.
    pub fn try_with_hasher(
        max_entries: usize,
        watermark: Option<usize>,
        hasher: S,
    ) -> Result<Self, ConfigError> {
        validate_config(max_entries, watermark)?;
        Ok(Self {
            entries: HashMap::with_capacity_and_hasher(max_entries, hasher),
            max_entries,
            watermark,
            next_seq: 0,
        })
    }

    /// Returns the entry ceiling.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Returns the explicitly configured watermark, if any.
    pub fn watermark(&self) -> Option<usize> {
        self.watermark
    }

    /// Returns the entry count a reclaim pass reduces the cache to: the
    /// configured watermark, or `max(1, max_entries * 3 / 4)` when none is set.
    ///
    /// # Example
    ///
    /// ```
    /// use coldtrim::policy::access_counted::AccessCountedCache;
    ///
    /// let cache = AccessCountedCache::<u64, u64>::try_new(10).unwrap();
    /// assert_eq!(cache.watermark_count(), 7);
    ///
    /// let cache = AccessCountedCache::<u64, u64>::try_with_watermark(10, 3).unwrap();
    /// assert_eq!(cache.watermark_count(), 3);
    /// ```
    pub fn watermark_count(&self) -> usize {
        self.watermark
            .unwrap_or_else(|| (self.max_entries * 3 / 4).max(1))
    }

    /// Strictly adds a new entry, starting its access count at 0.
    ///
    /// Runs the reclaim pass first as if one additional entry were about to be
    /// added, so the cache never exceeds `max_entries`. Unlike the upsert
    /// [`insert`](CoreCache::insert), an existing key is an error and leaves
    /// the cache untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateKey`] if the key is already present. No reclaim runs
    /// in that case.
    ///
    /// # Example
    ///
    /// ```
    /// use coldtrim::policy::access_counted::AccessCountedCache;
    /// use coldtrim::error::DuplicateKey;
    ///
    /// let mut cache = AccessCountedCache::try_new(10).unwrap();
    /// assert!(cache.try_insert(1, "first").is_ok());
    /// assert_eq!(cache.try_insert(1, "again"), Err(DuplicateKey));
    /// ```
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(), DuplicateKey> {
        if self.entries.contains_key(&key) {
            return Err(DuplicateKey);
        }
        self.reclaim(1);
        self.insert_new(key, value);
        Ok(())
    }

    /// Strictly reads a value, incrementing its access count.
    ///
    /// The failing counterpart of [`get`](CoreCache::get).
    ///
    /// # Errors
    ///
    /// Returns [`KeyNotFound`] if the key is absent.
    pub fn fetch(&mut self, key: &K) -> Result<&V, KeyNotFound> {
        self.bump(key).ok_or(KeyNotFound)
    }

    /// Reads a value without incrementing its access count.
    ///
    /// Does not affect eviction order; the counted alternative is
    /// [`get`](CoreCache::get).
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|slot| &slot.value)
    }

    /// Replaces the policy parameters and immediately reclaims.
    ///
    /// Both values are validated exactly as at construction. On success the
    /// new parameters take effect at once: a reclaim pass with zero additional
    /// entries runs, so a capacity reduction shrinks the cache down to the new
    /// watermark before this method returns.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the parameters are invalid; the cache is
    /// left unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use coldtrim::policy::access_counted::AccessCountedCache;
    /// use coldtrim::traits::CoreCache;
    ///
    /// let mut cache = AccessCountedCache::try_new(100).unwrap();
    /// for i in 0..50u64 {
    ///     cache.insert(i, i);
    /// }
    ///
    /// cache.set_capacity(10, Some(4)).unwrap();
    /// assert_eq!(cache.len(), 4);
    /// ```
    pub fn set_capacity(
        &mut self,
        max_entries: usize,
        watermark: Option<usize>,
    ) -> Result<(), ConfigError> {
        validate_config(max_entries, watermark)?;
        self.max_entries = max_entries;
        self.watermark = watermark;
        self.reclaim(0);
        Ok(())
    }

    /// Iterates over the keys. Does not count reads.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.entries.keys(),
        }
    }

    /// Iterates over the values, counting a read against **every** live entry.
    ///
    /// This is a counted bulk read: creating the iterator increments the
    /// access count of every entry in the cache (overflow-safe, like any other
    /// read), regardless of how far the iterator is advanced. This keeps bulk
    /// enumeration consistent with the read-increments-counter rule, but it is
    /// easy to misuse — prefer [`keys`](Self::keys) plus [`peek`](Self::peek)
    /// when counting is not wanted.
    ///
    /// # Example
    ///
    /// ```
    /// use coldtrim::policy::access_counted::AccessCountedCache;
    /// use coldtrim::traits::{CoreCache, CountedCacheTrait};
    ///
    /// let mut cache = AccessCountedCache::try_new(10).unwrap();
    /// cache.insert(1, "one");
    /// cache.insert(2, "two");
    ///
    /// let mut values: Vec<&str> = cache.values().copied().collect();
    /// values.sort_unstable();
    /// assert_eq!(values, ["one", "two"]);
    ///
    /// // Enumeration counted a read against both entries.
    /// assert_eq!(cache.access_count(&1), Some(1));
    /// assert_eq!(cache.access_count(&2), Some(1));
    /// ```
    pub fn values(&mut self) -> Values<'_, K, V> {
        if self
            .entries
            .values()
            .any(|slot| slot.access_count == u32::MAX)
        {
            self.rescale_counts();
        }
        for slot in self.entries.values_mut() {
            slot.access_count += 1;
        }
        Values {
            inner: self.entries.values(),
        }
    }

    /// Counted read: increments the entry's access count and returns the
    /// value. Halves every live counter first if this one is saturated.
    fn bump(&mut self, key: &K) -> Option<&V> {
        let saturated = self.entries.get(key)?.access_count == u32::MAX;
        if saturated {
            self.rescale_counts();
        }
        let slot = self
            .entries
            .get_mut(key)
            .expect("entry vanished during rescale");
        slot.access_count += 1;
        Some(&slot.value)
    }

    /// Halves every live access count (integer floor division).
    fn rescale_counts(&mut self) {
        for slot in self.entries.values_mut() {
            slot.access_count /= 2;
        }
    }

    fn insert_new(&mut self, key: K, value: V) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            key,
            Slot {
                value,
                access_count: 0,
                seq,
            },
        );
    }

    /// Evicts the coldest entries if `additional` pending inserts would push
    /// the cache past `max_entries`.
    ///
    /// Entries are ranked ascending by `(access_count, seq)` and exactly
    /// `len + additional - watermark_count` of them are removed, so the cache
    /// lands on the watermark once the pending inserts complete.
    fn reclaim(&mut self, additional: usize) {
        let projected = self.entries.len() + additional;
        if projected <= self.max_entries {
            return;
        }
        let reclaim_count = projected.saturating_sub(self.watermark_count());
        if reclaim_count == 0 {
            return;
        }

        let mut ranked: Vec<(u32, u64, K)> = self
            .entries
            .iter()
            .map(|(key, slot)| (slot.access_count, slot.seq, key.clone()))
            .collect();
        ranked.sort_unstable_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
        for (_, _, key) in ranked.into_iter().take(reclaim_count) {
            self.entries.remove(&key);
        }
    }

    /// Key of the coldest entry under the `(access_count, seq)` ranking.
    fn coldest_key(&self) -> Option<&K> {
        self.entries
            .iter()
            .min_by(|a, b| {
                (a.1.access_count, a.1.seq).cmp(&(b.1.access_count, b.1.seq))
            })
            .map(|(key, _)| key)
    }

    #[cfg(test)]
    fn set_access_count_for_test(&mut self, key: &K, count: u32) {
        self.entries
            .get_mut(key)
            .expect("test key must exist")
            .access_count = count;
    }
}

impl<K, V, S> CoreCache<K, V> for AccessCountedCache<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    /// Upserts a key-value pair.
    ///
    /// An existing key has its value replaced in place — the access count is
    /// untouched and no reclaim runs. A new key behaves like
    /// [`try_insert`](AccessCountedCache::try_insert) except that there is no
    /// duplicate to fail on: the reclaim pass still runs first and the entry
    /// starts with an access count of 0.
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.entries.get_mut(&key) {
            return Some(std::mem::replace(&mut slot.value, value));
        }
        self.reclaim(1);
        self.insert_new(key, value);
        None
    }

    /// Reads a value, incrementing its access count.
    ///
    /// The non-failing counterpart of [`fetch`](AccessCountedCache::fetch).
    /// This (together with `fetch` and `values`) is the only way access
    /// counts increase.
    fn get(&mut self, key: &K) -> Option<&V> {
        self.bump(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the entry ceiling (`max_entries`).
    fn capacity(&self) -> usize {
        self.max_entries
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.next_seq = 0;
    }
}

impl<K, V, S> MutableCache<K, V> for AccessCountedCache<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    /// Removes an entry by key.
    ///
    /// Removal only shrinks the cache; it never triggers a reclaim.
    fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|slot| slot.value)
    }
}

impl<K, V, S> CountedCacheTrait<K, V> for AccessCountedCache<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    fn access_count(&self, key: &K) -> Option<u32> {
        self.entries.get(key).map(|slot| slot.access_count)
    }

    fn peek_coldest(&self) -> Option<(&K, &V)> {
        let key = self.coldest_key()?;
        let slot = &self.entries[key];
        Some((key, &slot.value))
    }

    fn pop_coldest(&mut self) -> Option<(K, V)> {
        let key = self.coldest_key()?.clone();
        let slot = self
            .entries
            .remove(&key)
            .expect("coldest key was just ranked");
        Some((key, slot.value))
    }
}

// ---------------------------------------------------------------------------
// Iterators
// ---------------------------------------------------------------------------

/// Iterator over the keys of an [`AccessCountedCache`].
///
/// Created by [`AccessCountedCache::keys`]; does not count reads.
#[derive(Debug)]
pub struct Keys<'a, K, V> {
    inner: hash_map::Keys<'a, K, Slot<V>>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// Iterator over the values of an [`AccessCountedCache`].
///
/// Created by [`AccessCountedCache::values`], which counts a read against
/// every live entry up front.
#[derive(Debug)]
pub struct Values<'a, K, V> {
    inner: hash_map::Values<'a, K, Slot<V>>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|slot| &slot.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    mod basic_behavior {
        use super::*;

        #[test]
        fn add_then_read_round_trip() {
            let mut cache = AccessCountedCache::try_new(10).unwrap();
            cache.try_insert("key".to_string(), 42).unwrap();

            // New entries start cold.
            assert_eq!(cache.access_count(&"key".to_string()), Some(0));

            // One read returns the stored value and counts exactly once.
            assert_eq!(cache.get(&"key".to_string()), Some(&42));
            assert_eq!(cache.access_count(&"key".to_string()), Some(1));
        }

        #[test]
        fn try_insert_rejects_duplicate_without_mutating() {
            let mut cache = AccessCountedCache::try_new(10).unwrap();
            cache.try_insert(1u64, "first").unwrap();
            cache.get(&1);

            assert_eq!(cache.try_insert(1, "second"), Err(DuplicateKey));

            // Value and count are untouched by the failed add.
            assert_eq!(cache.peek(&1), Some(&"first"));
            assert_eq!(cache.access_count(&1), Some(1));
            assert_eq!(cache.len(), 1);
        }

        #[test]
        fn upsert_replaces_in_place_preserving_count() {
            let mut cache = AccessCountedCache::try_new(10).unwrap();
            cache.insert(1u64, 100);
            cache.get(&1);
            cache.get(&1);
            assert_eq!(cache.access_count(&1), Some(2));

            let previous = cache.insert(1, 999);
            assert_eq!(previous, Some(100));
            assert_eq!(cache.access_count(&1), Some(2));
            assert_eq!(cache.peek(&1), Some(&999));
            assert_eq!(cache.len(), 1);
        }

        #[test]
        fn fetch_is_strict_get() {
            let mut cache = AccessCountedCache::try_new(10).unwrap();
            cache.insert(1u64, "one");

            assert_eq!(cache.fetch(&1), Ok(&"one"));
            assert_eq!(cache.access_count(&1), Some(1));
            assert_eq!(cache.fetch(&99), Err(KeyNotFound));
        }

        #[test]
        fn get_miss_returns_none() {
            let mut cache = AccessCountedCache::<u64, &str>::try_new(10).unwrap();
            assert_eq!(cache.get(&7), None);
        }

        #[test]
        fn peek_and_contains_do_not_count() {
            let mut cache = AccessCountedCache::try_new(10).unwrap();
            cache.insert(1u64, "one");

            assert_eq!(cache.peek(&1), Some(&"one"));
            assert!(cache.contains(&1));
            assert_eq!(cache.access_count(&1), Some(0));
        }

        #[test]
        fn remove_reports_removal() {
            let mut cache = AccessCountedCache::try_new(10).unwrap();
            cache.insert(1u64, "one");

            assert_eq!(cache.remove(&1), Some("one"));
            assert_eq!(cache.remove(&1), None);
            assert!(!cache.contains(&1));
        }

        #[test]
        fn clear_empties_unconditionally() {
            let mut cache = AccessCountedCache::try_new(10).unwrap();
            for i in 0..5u64 {
                cache.insert(i, i);
            }
            cache.clear();
            assert!(cache.is_empty());
            assert_eq!(cache.access_count(&0), None);
        }

        #[test]
        fn default_uses_standard_ceiling() {
            let cache = AccessCountedCache::<u64, u64>::default();
            assert_eq!(cache.max_entries(), DEFAULT_MAX_ENTRIES);
            assert_eq!(cache.watermark(), None);
        }

        #[test]
        fn fx_alias_behaves_identically() {
            let mut cache = FxAccessCountedCache::try_new_fx(4).unwrap();
            cache.insert(1u64, "one");
            assert_eq!(cache.get(&1), Some(&"one"));
            assert_eq!(cache.access_count(&1), Some(1));
        }
    }

    mod config {
        use super::*;

        #[test]
        fn max_entries_below_two_is_rejected() {
            assert!(AccessCountedCache::<u64, u64>::try_new(0).is_err());
            assert!(AccessCountedCache::<u64, u64>::try_new(1).is_err());
            assert!(AccessCountedCache::<u64, u64>::try_new(2).is_ok());
        }

        #[test]
        fn watermark_must_be_below_max_entries() {
            assert!(AccessCountedCache::<u64, u64>::try_with_watermark(5, 5).is_err());
            assert!(AccessCountedCache::<u64, u64>::try_with_watermark(5, 6).is_err());
            assert!(AccessCountedCache::<u64, u64>::try_with_watermark(5, 0).is_err());
            assert!(AccessCountedCache::<u64, u64>::try_with_watermark(5, 4).is_ok());
            assert!(AccessCountedCache::<u64, u64>::try_with_watermark(5, 1).is_ok());
        }

        #[test]
        fn config_errors_name_the_parameter() {
            let err = AccessCountedCache::<u64, u64>::try_new(1).unwrap_err();
            assert!(err.to_string().contains("max_entries"));

            let err = AccessCountedCache::<u64, u64>::try_with_watermark(5, 9).unwrap_err();
            assert!(err.to_string().contains("watermark"));
        }

        #[test]
        fn default_watermark_is_three_quarters_floored() {
            let cache = AccessCountedCache::<u64, u64>::try_new(10).unwrap();
            assert_eq!(cache.watermark_count(), 7);

            let cache = AccessCountedCache::<u64, u64>::try_new(2).unwrap();
            assert_eq!(cache.watermark_count(), 1);

            let cache = AccessCountedCache::<u64, u64>::try_new(1024).unwrap();
            assert_eq!(cache.watermark_count(), 768);
        }

        #[test]
        fn set_capacity_validates_before_applying() {
            let mut cache = AccessCountedCache::<u64, u64>::try_new(10).unwrap();
            for i in 0..8 {
                cache.insert(i, i);
            }

            assert!(cache.set_capacity(1, None).is_err());
            assert!(cache.set_capacity(10, Some(10)).is_err());

            // Failed calls leave the cache untouched.
            assert_eq!(cache.max_entries(), 10);
            assert_eq!(cache.len(), 8);
        }
    }

    mod reclaim {
        use super::*;

        #[test]
        fn scenario_explicit_watermark() {
            // max_entries=4, watermark=2; the three coldest of five are evicted.
            let mut cache = AccessCountedCache::try_with_watermark(4, 2).unwrap();
            cache.try_insert("a", ()).unwrap();
            cache.try_insert("b", ()).unwrap();
            cache.try_insert("c", ()).unwrap();
            cache.try_insert("d", ()).unwrap();
            assert_eq!(cache.len(), 4);

            cache.get(&"a");
            cache.get(&"a");
            cache.get(&"b");

            cache.try_insert("e", ()).unwrap();

            assert_eq!(cache.len(), 2);
            assert!(cache.contains(&"a"));
            assert!(cache.contains(&"e"));
            assert!(!cache.contains(&"b"));
            assert!(!cache.contains(&"c"));
            assert!(!cache.contains(&"d"));
        }

        #[test]
        fn scenario_default_watermark() {
            // max_entries=10, default watermark 7; the 11th insert reclaims.
            let mut cache = AccessCountedCache::try_new(10).unwrap();
            for i in 0..11u64 {
                cache.insert(i, i);
            }
            assert_eq!(cache.len(), 7);
        }

        #[test]
        fn reclaim_lands_exactly_on_watermark() {
            let mut cache = AccessCountedCache::try_with_watermark(8, 3).unwrap();
            for i in 0..8u64 {
                cache.insert(i, i);
            }
            assert_eq!(cache.len(), 8);

            cache.insert(100, 100);

            // Evicts down to watermark - 1, then the pending insert lands.
            assert_eq!(cache.len(), 3);
            assert!(cache.contains(&100));
        }

        #[test]
        fn upsert_of_existing_key_never_reclaims() {
            let mut cache = AccessCountedCache::try_with_watermark(4, 2).unwrap();
            for i in 0..4u64 {
                cache.insert(i, i);
            }
            assert_eq!(cache.len(), 4);

            // Overwrite while full: no eviction.
            cache.insert(0, 999);
            assert_eq!(cache.len(), 4);
            assert_eq!(cache.peek(&0), Some(&999));
        }

        #[test]
        fn remove_never_reclaims() {
            let mut cache = AccessCountedCache::try_with_watermark(4, 2).unwrap();
            for i in 0..4u64 {
                cache.insert(i, i);
            }
            cache.remove(&0);
            assert_eq!(cache.len(), 3);
        }

        #[test]
        fn warmer_entries_survive_colder_ones() {
            let mut cache = AccessCountedCache::try_with_watermark(6, 2).unwrap();
            for i in 0..6u64 {
                cache.insert(i, i);
            }
            // Heat up 4 and 5.
            for _ in 0..3 {
                cache.get(&4);
                cache.get(&5);
            }

            cache.insert(100, 100);

            assert!(cache.contains(&4));
            assert!(cache.contains(&5));
            for i in 0..4u64 {
                assert!(!cache.contains(&i), "cold key {i} should be evicted");
            }
        }

        #[test]
        fn equal_counts_evict_oldest_inserted_first() {
            let mut cache = AccessCountedCache::try_with_watermark(4, 3).unwrap();
            cache.try_insert("first", ()).unwrap();
            cache.try_insert("second", ()).unwrap();
            cache.try_insert("third", ()).unwrap();
            cache.try_insert("fourth", ()).unwrap();

            // All counts equal (0); the oldest insertion goes first.
            cache.try_insert("fifth", ()).unwrap();
            assert!(!cache.contains(&"first"));
            assert!(cache.contains(&"second"));

            cache.try_insert("sixth", ()).unwrap();
            assert!(!cache.contains(&"second"));
            assert!(cache.contains(&"third"));
        }

        #[test]
        fn set_capacity_shrinks_immediately() {
            let mut cache = AccessCountedCache::<u64, u64>::try_new(100).unwrap();
            for i in 0..50 {
                cache.insert(i, i);
            }
            cache.get(&49);

            cache.set_capacity(10, Some(4)).unwrap();

            assert_eq!(cache.len(), 4);
            assert_eq!(cache.max_entries(), 10);
            // The one warmed entry survives the shrink.
            assert!(cache.contains(&49));
        }

        #[test]
        fn set_capacity_without_pressure_keeps_entries() {
            let mut cache = AccessCountedCache::<u64, u64>::try_new(10).unwrap();
            for i in 0..5 {
                cache.insert(i, i);
            }
            cache.set_capacity(6, None).unwrap();
            assert_eq!(cache.len(), 5);
        }

        #[test]
        fn count_never_exceeds_max_entries() {
            let mut cache = AccessCountedCache::try_with_watermark(5, 2).unwrap();
            for i in 0..100u64 {
                cache.insert(i, i);
                assert!(cache.len() <= cache.max_entries());
            }
        }
    }

    mod overflow {
        use super::*;

        #[test]
        fn saturated_read_halves_every_counter() {
            let mut cache = AccessCountedCache::try_new(10).unwrap();
            cache.insert("hot", 1);
            cache.insert("warm", 2);
            cache.insert("cold", 3);
            cache.set_access_count_for_test(&"hot", u32::MAX);
            cache.set_access_count_for_test(&"warm", 10);

            // The read succeeds and rescales first, then counts.
            assert_eq!(cache.get(&"hot"), Some(&1));

            assert_eq!(cache.access_count(&"hot"), Some(u32::MAX / 2 + 1));
            assert_eq!(cache.access_count(&"warm"), Some(5));
            assert_eq!(cache.access_count(&"cold"), Some(0));
        }

        #[test]
        fn rescale_preserves_relative_order() {
            let mut cache = AccessCountedCache::try_new(10).unwrap();
            cache.insert("a", ());
            cache.insert("b", ());
            cache.insert("c", ());
            cache.set_access_count_for_test(&"a", u32::MAX);
            cache.set_access_count_for_test(&"b", 1000);
            cache.set_access_count_for_test(&"c", 10);

            cache.get(&"a");

            let a = cache.access_count(&"a").unwrap();
            let b = cache.access_count(&"b").unwrap();
            let c = cache.access_count(&"c").unwrap();
            assert!(a > b && b > c);
        }

        #[test]
        fn unsaturated_reads_never_rescale() {
            let mut cache = AccessCountedCache::try_new(10).unwrap();
            cache.insert("a", ());
            cache.insert("b", ());
            cache.set_access_count_for_test(&"a", u32::MAX - 1);

            cache.get(&"a");

            assert_eq!(cache.access_count(&"a"), Some(u32::MAX));
            assert_eq!(cache.access_count(&"b"), Some(0));
        }

        #[test]
        fn values_enumeration_rescales_when_saturated() {
            let mut cache = AccessCountedCache::try_new(10).unwrap();
            cache.insert("a", ());
            cache.insert("b", ());
            cache.set_access_count_for_test(&"a", u32::MAX);
            cache.set_access_count_for_test(&"b", 8);

            let visited = cache.values().count();
            assert_eq!(visited, 2);

            assert_eq!(cache.access_count(&"a"), Some(u32::MAX / 2 + 1));
            assert_eq!(cache.access_count(&"b"), Some(5));
        }
    }

    mod observers {
        use super::*;

        #[test]
        fn keys_do_not_count() {
            let mut cache = AccessCountedCache::try_new(10).unwrap();
            cache.insert(1u64, "one");
            cache.insert(2u64, "two");

            let mut keys: Vec<u64> = cache.keys().copied().collect();
            keys.sort_unstable();
            assert_eq!(keys, [1, 2]);
            assert_eq!(cache.access_count(&1), Some(0));
            assert_eq!(cache.access_count(&2), Some(0));
        }

        #[test]
        fn values_count_every_entry() {
            let mut cache = AccessCountedCache::try_new(10).unwrap();
            for i in 0..4u64 {
                cache.insert(i, i * 10);
            }

            let mut values: Vec<u64> = cache.values().copied().collect();
            values.sort_unstable();
            assert_eq!(values, [0, 10, 20, 30]);

            for i in 0..4u64 {
                assert_eq!(cache.access_count(&i), Some(1));
            }
        }

        #[test]
        fn values_count_even_when_not_advanced() {
            let mut cache = AccessCountedCache::try_new(10).unwrap();
            cache.insert(1u64, "one");
            cache.insert(2u64, "two");

            // Counting happens at iterator creation.
            let _ = cache.values();

            assert_eq!(cache.access_count(&1), Some(1));
            assert_eq!(cache.access_count(&2), Some(1));
        }

        #[test]
        fn iterators_report_exact_length() {
            let mut cache = AccessCountedCache::try_new(10).unwrap();
            for i in 0..3u64 {
                cache.insert(i, i);
            }
            assert_eq!(cache.keys().len(), 3);
            assert_eq!(cache.values().len(), 3);
        }

        #[test]
        fn peek_and_pop_coldest_use_deterministic_ranking() {
            let mut cache = AccessCountedCache::try_new(10).unwrap();
            cache.try_insert("old", 1).unwrap();
            cache.try_insert("new", 2).unwrap();
            cache.get(&"old");

            // "new" has the lower count.
            assert_eq!(cache.peek_coldest().map(|(k, _)| *k), Some("new"));
            assert_eq!(cache.pop_coldest(), Some(("new", 2)));

            // Peeking did not count a read.
            assert_eq!(cache.access_count(&"old"), Some(1));

            assert_eq!(cache.pop_coldest(), Some(("old", 1)));
            assert_eq!(cache.pop_coldest(), None);
            assert_eq!(cache.peek_coldest(), None);
        }

        #[test]
        fn pop_coldest_breaks_ties_by_insertion_order() {
            let mut cache = AccessCountedCache::try_new(10).unwrap();
            cache.try_insert("first", ()).unwrap();
            cache.try_insert("second", ()).unwrap();

            assert_eq!(cache.pop_coldest().map(|(k, _)| k), Some("first"));
            assert_eq!(cache.pop_coldest().map(|(k, _)| k), Some("second"));
        }
    }
}

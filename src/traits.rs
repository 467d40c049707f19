//! # Cache Trait Hierarchy
//!
//! Trait layering for the coldtrim cache surface. The split keeps universal
//! map-like operations separate from arbitrary removal and from the
//! access-count observers that only a counted policy can answer.
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │            CoreCache<K, V>              │
//!   │                                         │
//!   │  insert(&mut, K, V) → Option<V>         │
//!   │  get(&mut, &K) → Option<&V>             │
//!   │  contains(&, &K) → bool                 │
//!   │  len / is_empty / capacity              │
//!   │  clear(&mut)                            │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │          MutableCache<K, V>             │
//!   │                                         │
//!   │  remove(&K) → Option<V>                 │
//!   │  remove_batch(&[K]) → Vec<Option<V>>    │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │        CountedCacheTrait<K, V>          │
//!   │                                         │
//!   │  access_count(&K) → Option<u32>         │
//!   │  peek_coldest() → Option<(&K, &V)>      │
//!   │  pop_coldest() → Option<(K, V)>         │
//!   └─────────────────────────────────────────┘
//! ```
//!
//! | Trait               | Extends        | Purpose                             |
//! |---------------------|----------------|-------------------------------------|
//! | `CoreCache`         | -              | Universal map-like operations       |
//! | `MutableCache`      | `CoreCache`    | Arbitrary key removal               |
//! | `CountedCacheTrait` | `MutableCache` | Access-count observers and eviction |
//!
//! Note that `get` takes `&mut self` throughout: reading through a counted
//! cache bumps the entry's access count, so reads are not side-effect-free.

/// Core cache operations that all caches support.
///
/// # Example
///
/// ```
/// use coldtrim::traits::CoreCache;
/// use coldtrim::policy::access_counted::AccessCountedCache;
///
/// fn warm_cache<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.insert(*key, value.clone());
///     }
/// }
///
/// let mut cache = AccessCountedCache::try_new(100).unwrap();
/// warm_cache(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair with upsert semantics, returning the previous
    /// value if the key existed.
    ///
    /// Replacing an existing value never changes its eviction standing; a new
    /// key may first evict entries according to the cache's policy.
    ///
    /// # Example
    ///
    /// ```
    /// use coldtrim::traits::CoreCache;
    /// use coldtrim::policy::access_counted::AccessCountedCache;
    ///
    /// let mut cache = AccessCountedCache::try_new(10).unwrap();
    /// assert_eq!(cache.insert(1, "first"), None);
    /// assert_eq!(cache.insert(1, "second"), Some("first"));
    /// ```
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Gets a reference to a value by key, updating access state.
    ///
    /// Use [`contains`](Self::contains) to check existence without affecting
    /// eviction order.
    ///
    /// # Example
    ///
    /// ```
    /// use coldtrim::traits::CoreCache;
    /// use coldtrim::policy::access_counted::AccessCountedCache;
    ///
    /// let mut cache = AccessCountedCache::try_new(10).unwrap();
    /// cache.insert(1, "value");
    /// assert_eq!(cache.get(&1), Some(&"value"));
    /// assert_eq!(cache.get(&99), None);
    /// ```
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks if a key exists without updating access state.
    fn contains(&self, key: &K) -> bool;

    /// Returns the current number of entries in the cache.
    fn len(&self) -> usize;

    /// Returns `true` if the cache contains no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of entries the cache may hold.
    fn capacity(&self) -> usize;

    /// Removes all entries from the cache.
    fn clear(&mut self);
}

/// Caches that support arbitrary key-based removal.
///
/// # Example
///
/// ```
/// use coldtrim::traits::{CoreCache, MutableCache};
/// use coldtrim::policy::access_counted::AccessCountedCache;
///
/// fn invalidate_keys<C: MutableCache<u64, String>>(cache: &mut C, keys: &[u64]) {
///     for key in keys {
///         cache.remove(key);
///     }
/// }
///
/// let mut cache = AccessCountedCache::try_new(100).unwrap();
/// cache.insert(1, "one".to_string());
/// cache.insert(2, "two".to_string());
/// invalidate_keys(&mut cache, &[1]);
/// assert!(!cache.contains(&1));
/// assert!(cache.contains(&2));
/// ```
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes a specific key-value pair.
    ///
    /// Returns the removed value if the key existed. Removal only shrinks the
    /// cache and never triggers eviction.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes multiple keys, returning results in input order.
    ///
    /// The default implementation loops over [`remove`](Self::remove).
    ///
    /// # Example
    ///
    /// ```
    /// use coldtrim::traits::{CoreCache, MutableCache};
    /// use coldtrim::policy::access_counted::AccessCountedCache;
    ///
    /// let mut cache = AccessCountedCache::try_new(10).unwrap();
    /// cache.insert(1, "one");
    /// cache.insert(2, "two");
    ///
    /// let removed = cache.remove_batch(&[1, 99]);
    /// assert_eq!(removed, vec![Some("one"), None]);
    /// ```
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }
}

/// Operations specific to caches that rank entries by read count.
///
/// The coldest entry is the one with the lowest access count; ties are broken
/// by insertion order, oldest first, so eviction order is deterministic.
///
/// # Example
///
/// ```
/// use coldtrim::traits::{CoreCache, CountedCacheTrait};
/// use coldtrim::policy::access_counted::AccessCountedCache;
///
/// let mut cache = AccessCountedCache::try_new(10).unwrap();
/// cache.insert(1, "first");
/// cache.insert(2, "second");
///
/// // Reads bump the count; key 1 is now warmer.
/// cache.get(&1);
///
/// assert_eq!(cache.access_count(&1), Some(1));
/// assert_eq!(cache.access_count(&2), Some(0));
/// assert_eq!(cache.peek_coldest().map(|(k, _)| *k), Some(2));
/// ```
pub trait CountedCacheTrait<K, V>: MutableCache<K, V> {
    /// Gets the read count for a key without incrementing it.
    ///
    /// Returns `None` if the key is not present.
    fn access_count(&self, key: &K) -> Option<u32>;

    /// Peeks at the coldest entry without removing it or counting a read.
    ///
    /// Returns `None` if the cache is empty.
    fn peek_coldest(&self) -> Option<(&K, &V)>;

    /// Removes and returns the coldest entry.
    ///
    /// Returns `None` if the cache is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use coldtrim::traits::{CoreCache, CountedCacheTrait};
    /// use coldtrim::policy::access_counted::AccessCountedCache;
    ///
    /// let mut cache = AccessCountedCache::try_new(10).unwrap();
    /// cache.insert(1, "first");
    /// cache.insert(2, "second");
    /// cache.get(&2);
    ///
    /// let (key, _) = cache.pop_coldest().unwrap();
    /// assert_eq!(key, 1);
    /// ```
    fn pop_coldest(&mut self) -> Option<(K, V)>;
}

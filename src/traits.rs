//! # Eviction Cache Trait
//!
//! A single capability trait shared by every bounded cache in the crate.
//! Each implementation keeps an ordered sequence whose head is the most
//! recent entry and whose tail is the next eviction victim; the policies
//! differ only in how a re-`put` of an existing key moves an entry.
//!
//! ```text
//!   ┌───────────────────────────────────────────────┐
//!   │              EvictionCache<K, V>              │
//!   │                                               │
//!   │  put(&mut, K, V) → Option<(K, V)>  (evicted)  │
//!   │  del(&mut) → Option<(K, V)>                   │
//!   │  poll(&) → Option<(&K, &V)>                   │
//!   │  exists(&, &K) → bool                         │
//!   │  peek(&, &K) → Option<&V>                     │
//!   │  size(&) / max_size(&) / is_empty(&)          │
//!   │  clear(&mut)                                  │
//!   └──────────────────────┬────────────────────────┘
//!                          │
//!          ┌───────────────┼────────────────┐
//!          ▼               ▼                ▼
//!     LruCache        FifoCache        Cache (builder enum)
//!     re-put moves    re-put moves
//!     to head         only if value
//!                     changed
//! ```
//!
//! | Policy | Re-put, same value | Re-put, new value | Victim |
//! |--------|--------------------|-------------------|--------|
//! | LRU    | moved to head      | moved to head     | tail   |
//! | FIFO   | untouched          | moved to head     | tail   |
//!
//! ## Thread Safety
//!
//! Implementations carry no internal synchronization. Use a single owner, or
//! wrap the cache in external synchronization (see `sync::SharedCache` with
//! the `concurrency` feature).

/// Bounded key/value container with a policy-defined eviction order.
///
/// # Example
///
/// ```
/// use pagekit::traits::EvictionCache;
/// use pagekit::policy::lru::LruCache;
///
/// fn warm<C: EvictionCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.put(*key, value.clone());
///     }
/// }
///
/// let mut cache = LruCache::new(2);
/// warm(&mut cache, &[(1, "one".into()), (2, "two".into()), (3, "three".into())]);
/// assert_eq!(cache.size(), 2);
/// assert!(!cache.exists(&1));
/// ```
pub trait EvictionCache<K, V> {
    /// Inserts or updates `key`.
    ///
    /// Eviction runs synchronously: if the insert pushes the size above
    /// [`max_size`](Self::max_size), the victim is removed and returned.
    /// At most one entry is evicted per call.
    fn put(&mut self, key: K, value: V) -> Option<(K, V)>;

    /// Removes and returns the entry the policy would evict next.
    ///
    /// Returns `None` on an empty cache.
    fn del(&mut self) -> Option<(K, V)>;

    /// Returns the entry [`del`](Self::del) would remove, without removing it.
    fn poll(&self) -> Option<(&K, &V)>;

    /// Returns `true` if `key` is currently cached.
    fn exists(&self, key: &K) -> bool;

    /// Reads a value without changing its position.
    fn peek(&self, key: &K) -> Option<&V>;

    /// Number of cached entries.
    fn size(&self) -> usize;

    /// Capacity fixed at construction.
    fn max_size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Removes every entry.
    fn clear(&mut self);
}

//! # Least Recently Used (LRU) Cache
//!
//! Recency policy: the head of the order list is the most recently used entry
//! and the tail is the eviction victim.
//!
//! ```text
//!   put(D) on a full cache (capacity = 3)
//!
//!   Before:  head ──► [A] ◄──► [B] ◄──► [C] ◄── tail
//!   After:   head ──► [D] ◄──► [A] ◄──► [B] ◄── tail     evicted: C
//!
//!   put(B, b') re-puts an existing key: new value, moved to head
//!
//!   After:   head ──► [B] ◄──► [D] ◄──► [A] ◄── tail
//! ```
//!
//! | Method       | Complexity | Reorders |
//! |--------------|------------|----------|
//! | `put`        | O(1)       | yes      |
//! | `get`        | O(1)       | yes      |
//! | `peek`       | O(1)       | no       |
//! | `del`        | O(1)       | -        |
//! | `poll`       | O(1)       | no       |
//! | `exists`     | O(1)       | no       |
//!
//! `LruCache` is single-owner; see `sync::SharedCache` for a locked wrapper.

use std::fmt;
use std::hash::Hash;

#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::CacheMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::CacheMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CacheMetricsReadRecorder, CoreMetricsRecorder, MetricsSnapshotProvider,
};
use crate::error::{ConfigError, InvariantError};
use crate::policy::ordered::OrderedCore;
use crate::traits::EvictionCache;

/// Bounded cache evicting the least recently used entry.
///
/// # Example
///
/// ```
/// use pagekit::policy::lru::LruCache;
/// use pagekit::traits::EvictionCache;
///
/// let mut cache = LruCache::new(2);
/// cache.put("a", 1);
/// cache.put("b", 2);
/// cache.put("a", 10);                 // "a" becomes most recent
/// assert_eq!(cache.put("c", 3), Some(("b", 2)));
/// assert!(cache.exists(&"a"));
/// assert_eq!(cache.size(), 2);
/// ```
pub struct LruCache<K, V> {
    core: OrderedCore<K, V>,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 is accepted: every `put` evicts the entry it just
    /// inserted. Use [`try_new`](Self::try_new) to reject it instead.
    pub fn new(capacity: usize) -> Self {
        Self {
            core: OrderedCore::new(capacity),
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::default(),
        }
    }

    /// Fallible constructor for user-supplied capacities.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self::new(capacity))
    }

    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let id = self.core.slot(key)?;
        self.core.promote(id);
        self.core.value_at(id)
    }

    /// Entries from most to least recently used.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&K, &V)> {
        self.core.iter()
    }

    /// Position of `key` in recency order (0 = most recent). O(n).
    pub fn recency_rank(&self, key: &K) -> Option<usize> {
        self.core.iter().position(|(k, _)| k == key)
    }

    /// Verifies index/list agreement and the capacity bound.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.core.check_invariants()
    }
}

impl<K, V> EvictionCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_put_call();

        if let Some(id) = self.core.slot(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_put_update();

            self.core.replace_and_promote(id, value);
            debug_assert!(self.core.check_invariants().is_ok());
            return None;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_put_new();

        let evicted = self.core.insert_new(key, value);

        #[cfg(feature = "metrics")]
        {
            if evicted.is_some() {
                self.metrics.record_evicted_entry();
            }
        }

        debug_assert!(self.core.check_invariants().is_ok());
        evicted
    }

    fn del(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_del_call();

        let entry = self.core.pop_back()?;

        #[cfg(feature = "metrics")]
        self.metrics.record_del_found();

        Some(entry)
    }

    fn poll(&self) -> Option<(&K, &V)> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_poll_call();

        let entry = self.core.back()?;

        #[cfg(feature = "metrics")]
        (&self.metrics).record_poll_found();

        Some(entry)
    }

    #[inline]
    fn exists(&self, key: &K) -> bool {
        let found = self.core.contains(key);

        #[cfg(feature = "metrics")]
        {
            (&self.metrics).record_exists_call();
            if found {
                (&self.metrics).record_exists_hit();
            }
        }

        found
    }

    #[inline]
    fn peek(&self, key: &K) -> Option<&V> {
        self.core.value(key)
    }

    #[inline]
    fn size(&self) -> usize {
        self.core.len()
    }

    #[inline]
    fn max_size(&self) -> usize {
        self.core.capacity()
    }

    fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.core.clear();
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.core.len(), self.core.capacity())
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<CacheMetricsSnapshot> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("size", &self.core.len())
            .field("max_size", &self.core.capacity())
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

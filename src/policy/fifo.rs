//! # First In, First Out (FIFO) Cache with change-aware dedup
//!
//! Entries are ordered by (re)insertion: the head is the newest, the tail is
//! the oldest and is evicted first. A re-`put` only counts as a reinsertion
//! when the value actually changed:
//!
//! ```text
//!   head ──► [C=3] ◄──► [B=2] ◄──► [A=1] ◄── tail
//!
//!   put(A, 1)   same value     → no-op, A stays oldest
//!   put(A, 7)   changed value  → head ──► [A=7] ◄──► [C=3] ◄──► [B=2] ◄── tail
//! ```
//!
//! Re-putting identical data is common when a producer republishes a batch;
//! skipping it keeps the order list stable. The changed-value path is the
//! same unlink-and-push-to-head that [`LruCache`](crate::policy::lru::LruCache)
//! uses for every re-put.

use std::fmt;
use std::hash::Hash;

#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::CacheMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::CacheMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CacheMetricsReadRecorder, CoreMetricsRecorder, FifoMetricsRecorder, MetricsSnapshotProvider,
};
use crate::error::{ConfigError, InvariantError};
use crate::policy::ordered::OrderedCore;
use crate::traits::EvictionCache;

/// Bounded cache evicting the oldest inserted entry.
///
/// # Example
///
/// ```
/// use pagekit::policy::fifo::FifoCache;
/// use pagekit::traits::EvictionCache;
///
/// let mut cache = FifoCache::new(2);
/// cache.put("a", 1);
/// cache.put("b", 2);
/// cache.put("a", 1);                  // unchanged: "a" is still the oldest
/// assert_eq!(cache.poll(), Some((&"a", &1)));
///
/// cache.put("a", 5);                  // changed: "a" becomes the newest
/// assert_eq!(cache.poll(), Some((&"b", &2)));
/// ```
pub struct FifoCache<K, V> {
    core: OrderedCore<K, V>,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> FifoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
{
    /// Creates a cache holding at most `capacity` entries.
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

    /// Entries from newest to oldest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&K, &V)> {
        self.core.iter()
    }

    /// Position of `key` counted from the oldest entry (0 = next victim). O(n).
    pub fn age_rank(&self, key: &K) -> Option<usize> {
        let from_head = self.core.iter().position(|(k, _)| k == key)?;
        Some(self.core.len() - 1 - from_head)
    }

    /// Verifies index/list agreement and the capacity bound.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.core.check_invariants()
    }
}

impl<K, V> EvictionCache<K, V> for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
{
    fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_put_call();

        if let Some(id) = self.core.slot(&key) {
            if self.core.value_at(id) == Some(&value) {
                #[cfg(feature = "metrics")]
                self.metrics.record_put_unchanged();
                return None;
            }

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
impl<K, V> FifoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
{
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.core.len(), self.core.capacity())
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<CacheMetricsSnapshot> for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
{
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> fmt::Debug for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoCache")
            .field("size", &self.core.len())
            .field("max_size", &self.core.capacity())
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<K: Eq + Hash + Clone + Copy, V: PartialEq>(cache: &FifoCache<K, V>) -> Vec<K> {
        cache.iter().map(|(k, _)| *k).collect()
    }

    mod basic_behavior {
        use super::*;

        #[test]
        fn new_cache_is_empty() {
            let cache: FifoCache<u32, u32> = FifoCache::new(8);
            assert!(cache.is_empty());
            assert_eq!(cache.max_size(), 8);
        }

        #[test]
        fn try_new_rejects_zero_capacity() {
            assert!(FifoCache::<u32, u32>::try_new(0).is_err());
            assert!(FifoCache::<u32, u32>::try_new(3).is_ok());
        }

        #[test]
        fn evicts_in_insertion_order() {
            let mut cache = FifoCache::new(3);
            cache.put(1, 'a');
            cache.put(2, 'b');
            cache.put(3, 'c');
            assert_eq!(cache.put(4, 'd'), Some((1, 'a')));
            assert_eq!(cache.put(5, 'e'), Some((2, 'b')));
            assert_eq!(keys(&cache), vec![5, 4, 3]);
        }

        #[test]
        fn del_and_poll_on_empty_return_none() {
            let mut cache: FifoCache<u32, u32> = FifoCache::new(2);
            assert_eq!(cache.poll(), None);
            assert_eq!(cache.del(), None);
        }

        #[test]
        fn peek_never_reorders() {
            let mut cache = FifoCache::new(2);
            cache.put(1, 1);
            cache.put(2, 2);
            assert_eq!(cache.peek(&1), Some(&1));
            assert_eq!(cache.put(3, 3), Some((1, 1)));
        }
    }

    mod change_aware_dedup {
        use super::*;

        #[test]
        fn unchanged_re_put_is_a_noop() {
            let mut cache = FifoCache::new(2);
            cache.put('a', 1);
            cache.put('a', 1);
            assert_eq!(cache.size(), 1);
            assert_eq!(cache.peek(&'a'), Some(&1));

            cache.put('b', 2);
            assert_eq!(keys(&cache), vec!['b', 'a']);
            cache.put('a', 1);
            assert_eq!(keys(&cache), vec!['b', 'a']);
            assert_eq!(cache.age_rank(&'a'), Some(0));
        }

        #[test]
        fn changed_re_put_moves_to_newest() {
            let mut cache = FifoCache::new(2);
            cache.put('a', 1);
            cache.put('a', 1);
            cache.put('b', 2);
            assert_eq!(cache.put('a', 2), None);

            assert_eq!(cache.peek(&'a'), Some(&2));
            assert_eq!(keys(&cache), vec!['a', 'b']);
            assert_eq!(cache.poll(), Some((&'b', &2)));
        }

        #[test]
        fn unchanged_re_put_does_not_protect_from_eviction() {
            let mut cache = FifoCache::new(2);
            cache.put("x", 1);
            cache.put("y", 2);
            cache.put("x", 1);
            assert_eq!(cache.put("z", 3), Some(("x", 1)));
        }

        #[test]
        fn changed_re_put_never_evicts() {
            let mut cache = FifoCache::new(1);
            cache.put(1, "v1");
            assert_eq!(cache.put(1, "v2"), None);
            assert_eq!(cache.size(), 1);
        }
    }

    mod edge_cases {
        use super::*;

        #[test]
        fn capacity_zero_never_retains() {
            let mut cache = FifoCache::new(0);
            assert_eq!(cache.put(7, 7), Some((7, 7)));
            assert!(cache.is_empty());
        }

        #[test]
        fn poll_matches_following_del() {
            let mut cache = FifoCache::new(3);
            cache.extend([(1, 10), (2, 20)]);
            let polled = cache.poll().map(|(k, v)| (*k, *v));
            assert_eq!(cache.del(), polled);
            assert_eq!(cache.del(), Some((2, 20)));
            assert_eq!(cache.del(), None);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn age_rank_of_missing_key() {
            let cache: FifoCache<u8, u8> = FifoCache::new(1);
            assert_eq!(cache.age_rank(&0), None);
        }
    }

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn unchanged_re_puts_are_counted() {
            let mut cache = FifoCache::new(2);
            cache.put(1, 1);
            cache.put(1, 1);
            cache.put(1, 2);

            let snap = cache.metrics_snapshot();
            assert_eq!(snap.put_calls, 3);
            assert_eq!(snap.put_new, 1);
            assert_eq!(snap.put_unchanged, 1);
            assert_eq!(snap.put_updates, 1);
            assert_eq!(snap.cache_len, 1);
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[cfg_attr(miri, ignore)]
            #[test]
            fn prop_matches_reference_model(
                capacity in 1usize..10,
                puts in prop::collection::vec((0u8..16, 0u8..3), 0..200)
            ) {
                // Reference: Vec ordered newest first.
                let mut model: Vec<(u8, u8)> = Vec::new();
                let mut cache = FifoCache::new(capacity);

                for (k, v) in puts {
                    let expected = match model.iter().position(|(mk, _)| *mk == k) {
                        Some(i) if model[i].1 == v => None,
                        Some(i) => {
                            model.remove(i);
                            model.insert(0, (k, v));
                            None
                        },
                        None => {
                            model.insert(0, (k, v));
                            if model.len() > capacity { model.pop() } else { None }
                        },
                    };
                    prop_assert_eq!(cache.put(k, v), expected);
                    prop_assert!(cache.size() <= capacity);
                    prop_assert_eq!(keys(&cache), model.iter().map(|(k, _)| *k).collect::<Vec<_>>());
                    for key in 0u8..16 {
                        prop_assert_eq!(cache.exists(&key), model.iter().any(|(mk, _)| *mk == key));
                    }
                }
                prop_assert!(cache.check_invariants().is_ok());
            }
        }
    }
}

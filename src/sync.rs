//! Caller-side synchronization for sharing a cache between threads
//! (feature `concurrency`).
//!
//! The caches themselves stay lock-free single-owner structures;
//! [`SharedCache`] puts one behind an `Arc<parking_lot::Mutex<_>>`. Every
//! operation, including `poll` and `exists`, takes the lock, since the
//! metrics counters are bumped even on read paths.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::traits::EvictionCache;

/// Cloneable handle to a mutex-guarded cache.
///
/// # Example
///
/// ```
/// use pagekit::policy::lru::LruCache;
/// use pagekit::sync::SharedCache;
///
/// let shared = SharedCache::new(LruCache::new(64));
/// let handles: Vec<_> = (0..4u64)
///     .map(|t| {
///         let cache = shared.clone();
///         std::thread::spawn(move || {
///             for i in 0..16 {
///                 cache.put(t * 100 + i, i);
///             }
///         })
///     })
///     .collect();
/// for h in handles {
///     h.join().unwrap();
/// }
/// assert_eq!(shared.size(), 64);
/// ```
pub struct SharedCache<C> {
    inner: Arc<Mutex<C>>,
}

impl<C> Clone for SharedCache<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> SharedCache<C> {
    pub fn new(cache: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Runs `f` with exclusive access to the cache.
    pub fn with<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        let mut cache = self.inner.lock();
        f(&mut cache)
    }

    /// Like [`with`](Self::with) but returns `None` instead of blocking.
    pub fn try_with<R>(&self, f: impl FnOnce(&mut C) -> R) -> Option<R> {
        let mut cache = self.inner.try_lock()?;
        Some(f(&mut cache))
    }

    pub fn put<K, V>(&self, key: K, value: V) -> Option<(K, V)>
    where
        C: EvictionCache<K, V>,
    {
        self.inner.lock().put(key, value)
    }

    pub fn del<K, V>(&self) -> Option<(K, V)>
    where
        C: EvictionCache<K, V>,
    {
        self.inner.lock().del()
    }

    /// Clone of the next victim, if any.
    pub fn poll<K, V>(&self) -> Option<(K, V)>
    where
        C: EvictionCache<K, V>,
        K: Clone,
        V: Clone,
    {
        let cache = self.inner.lock();
        cache.poll().map(|(k, v)| (k.clone(), v.clone()))
    }

    pub fn exists<K, V>(&self, key: &K) -> bool
    where
        C: EvictionCache<K, V>,
    {
        self.inner.lock().exists(key)
    }

    pub fn size<K, V>(&self) -> usize
    where
        C: EvictionCache<K, V>,
    {
        self.inner.lock().size()
    }

    pub fn max_size<K, V>(&self) -> usize
    where
        C: EvictionCache<K, V>,
    {
        self.inner.lock().max_size()
    }

    pub fn clear<K, V>(&self)
    where
        C: EvictionCache<K, V>,
    {
        self.inner.lock().clear()
    }
}

impl<C: fmt::Debug> fmt::Debug for SharedCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(cache) => f.debug_tuple("SharedCache").field(&*cache).finish(),
            None => f.write_str("SharedCache(<locked>)"),
        }
    }
}

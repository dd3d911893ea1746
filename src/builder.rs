//! Unified cache builder for both eviction policies.
//!
//! Lets callers pick the policy at runtime (for example from configuration)
//! while keeping a single concrete type.
//!
//! ## Example
//!
//! ```rust
//! use pagekit::builder::{CacheBuilder, CachePolicy};
//! use pagekit::traits::EvictionCache;
//!
//! let mut cache = CacheBuilder::new(100).build::<u64, String>(CachePolicy::Lru);
//! cache.put(1, "hello".to_string());
//! assert_eq!(cache.peek(&1), Some(&"hello".to_string()));
//! ```

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::policy::fifo::FifoCache;
use crate::policy::lru::LruCache;
use crate::traits::EvictionCache;

/// Available cache eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CachePolicy {
    /// Recency: every re-put refreshes the entry.
    Lru,
    /// Insertion order, re-puts of an unchanged value are ignored.
    Fifo,
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CachePolicy::Lru => "lru",
            CachePolicy::Fifo => "fifo",
        })
    }
}

impl FromStr for CachePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" | "recency" => Ok(CachePolicy::Lru),
            "fifo" | "insertion" => Ok(CachePolicy::Fifo),
            other => Err(ConfigError::invalid(
                "cache_policy",
                other,
                "expected `lru` or `fifo`",
            )),
        }
    }
}

/// Cache whose policy is chosen at construction.
pub struct Cache<K, V> {
    inner: CacheInner<K, V>,
}

enum CacheInner<K, V> {
    Lru(LruCache<K, V>),
    Fifo(FifoCache<K, V>),
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
{
    /// The policy this cache was built with.
    pub fn policy(&self) -> CachePolicy {
        match &self.inner {
            CacheInner::Lru(_) => CachePolicy::Lru,
            CacheInner::Fifo(_) => CachePolicy::Fifo,
        }
    }

    /// Entries from the most recent end to the next victim.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_> {
        match &self.inner {
            CacheInner::Lru(lru) => Box::new(lru.iter()),
            CacheInner::Fifo(fifo) => Box::new(fifo.iter()),
        }
    }
}

impl<K, V> EvictionCache<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
{
    fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.put(key, value),
            CacheInner::Fifo(fifo) => fifo.put(key, value),
        }
    }

    fn del(&mut self) -> Option<(K, V)> {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.del(),
            CacheInner::Fifo(fifo) => fifo.del(),
        }
    }

    fn poll(&self) -> Option<(&K, &V)> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.poll(),
            CacheInner::Fifo(fifo) => fifo.poll(),
        }
    }

    fn exists(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Lru(lru) => lru.exists(key),
            CacheInner::Fifo(fifo) => fifo.exists(key),
        }
    }

    fn peek(&self, key: &K) -> Option<&V> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.peek(key),
            CacheInner::Fifo(fifo) => fifo.peek(key),
        }
    }

    fn size(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.size(),
            CacheInner::Fifo(fifo) => fifo.size(),
        }
    }

    fn max_size(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.max_size(),
            CacheInner::Fifo(fifo) => fifo.max_size(),
        }
    }

    fn clear(&mut self) {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.clear(),
            CacheInner::Fifo(fifo) => fifo.clear(),
        }
    }
}

impl<K, V> fmt::Debug for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            CacheInner::Lru(lru) => fmt::Debug::fmt(lru, f),
            CacheInner::Fifo(fifo) => fmt::Debug::fmt(fifo, f),
        }
    }
}

/// Builder for creating cache instances.
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Create a new cache builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Build a cache with the specified policy.
    ///
    /// ```rust
    /// use pagekit::builder::{CacheBuilder, CachePolicy};
    /// use pagekit::traits::EvictionCache;
    ///
    /// let lru = CacheBuilder::new(16).build::<u64, u64>(CachePolicy::Lru);
    /// let fifo = CacheBuilder::new(16).build::<u64, u64>("fifo".parse().unwrap());
    /// assert_eq!(lru.max_size(), fifo.max_size());
    /// ```
    pub fn build<K, V>(self, policy: CachePolicy) -> Cache<K, V>
    where
        K: Eq + Hash + Clone,
        V: PartialEq,
    {
        let inner = match policy {
            CachePolicy::Lru => CacheInner::Lru(LruCache::new(self.capacity)),
            CachePolicy::Fifo => CacheInner::Fifo(FifoCache::new(self.capacity)),
        };
        Cache { inner }
    }

    /// Like [`build`](Self::build) but rejects a zero capacity.
    pub fn try_build<K, V>(self, policy: CachePolicy) -> Result<Cache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
        V: PartialEq,
    {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(self.build(policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICIES: [CachePolicy; 2] = [CachePolicy::Lru, CachePolicy::Fifo];

    #[test]
    fn test_all_policies_basic_ops() {
        for policy in POLICIES {
            let mut cache = CacheBuilder::new(10).build::<u64, String>(policy);
            assert_eq!(cache.policy(), policy);

            assert_eq!(cache.put(1, "one".to_string()), None);
            assert_eq!(cache.put(2, "two".to_string()), None);

            assert_eq!(cache.peek(&1), Some(&"one".to_string()));
            assert_eq!(cache.peek(&3), None);
            assert!(cache.exists(&1));
            assert!(!cache.exists(&99));
            assert_eq!(cache.size(), 2);

            cache.put(1, "ONE".to_string());
            assert_eq!(cache.peek(&1), Some(&"ONE".to_string()));
            assert_eq!(cache.poll(), Some((&2, &"two".to_string())));

            cache.clear();
            assert!(cache.is_empty());
        }
    }

    #[test]
    fn test_capacity_enforcement() {
        for policy in POLICIES {
            let mut cache = CacheBuilder::new(2).build::<u64, u64>(policy);
            cache.put(1, 1);
            cache.put(2, 2);
            assert_eq!(cache.put(3, 3), Some((1, 1)));
            assert_eq!(cache.size(), 2);
        }
    }

    #[test]
    fn test_policies_diverge_on_unchanged_re_put() {
        let mut lru = CacheBuilder::new(2).build::<u8, u8>(CachePolicy::Lru);
        let mut fifo = CacheBuilder::new(2).build::<u8, u8>(CachePolicy::Fifo);
        for cache in [&mut lru, &mut fifo] {
            cache.put(1, 1);
            cache.put(2, 2);
            cache.put(1, 1);
        }
        assert_eq!(lru.poll(), Some((&2, &2)));
        assert_eq!(fifo.poll(), Some((&1, &1)));
        assert_eq!(lru.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(fifo.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn test_try_build_rejects_zero() {
        let err = CacheBuilder::new(0)
            .try_build::<u8, u8>(CachePolicy::Fifo)
            .unwrap_err();
        assert_eq!(err, ConfigError::ZeroCapacity);
    }

    #[test]
    fn test_policy_parse_and_display() {
        assert_eq!("LRU".parse::<CachePolicy>().unwrap(), CachePolicy::Lru);
        assert_eq!(" insertion ".parse::<CachePolicy>().unwrap(), CachePolicy::Fifo);
        assert!("clock".parse::<CachePolicy>().is_err());
        assert_eq!(CachePolicy::Fifo.to_string(), "fifo");
    }
}

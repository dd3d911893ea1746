//! Hash index + ordered list shared by the eviction policies.
//!
//! ```text
//!   index: FxHashMap<K, SlotId>          order: IntrusiveList<(K, V)>
//!   ┌─────┬────────┐
//!   │ "a" │ id_2 ──┼──────┐       head ─► [id_1 "c"] ◄──► [id_2 "a"] ◄──► [id_3 "b"] ◄── tail
//!   │ "b" │ id_3 ──┼──┐   └──────────────────────────────────┘                 ▲
//!   │ "c" │ id_1   │  └────────────────────────────────────────────────────────┘
//!   └─────┴────────┘
//! ```
//!
//! The index and the list always hold the same key set: every key maps to
//! exactly one node and the node stores that key. Policies decide *when* an
//! entry moves to the head; the core owns the bookkeeping and the capacity
//! check.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::{IntrusiveList, SlotId};
use crate::error::InvariantError;

/// Upper bound on up-front index allocation for very large capacities.
const MAX_PREALLOC: usize = 1 << 16;

#[derive(Debug)]
pub(crate) struct OrderedCore<K, V> {
    index: FxHashMap<K, SlotId>,
    order: IntrusiveList<(K, V)>,
    capacity: usize,
}

impl<K, V> OrderedCore<K, V>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn new(capacity: usize) -> Self {
        let prealloc = capacity.min(MAX_PREALLOC);
        Self {
            index: FxHashMap::with_capacity_and_hasher(prealloc, Default::default()),
            order: IntrusiveList::with_capacity(prealloc),
            capacity,
        }
    }

    #[inline]
    pub(crate) fn slot(&self, key: &K) -> Option<SlotId> {
        self.index.get(key).copied()
    }

    #[inline]
    pub(crate) fn value(&self, key: &K) -> Option<&V> {
        let id = self.slot(key)?;
        self.order.get(id).map(|(_, v)| v)
    }

    #[inline]
    pub(crate) fn value_at(&self, id: SlotId) -> Option<&V> {
        self.order.get(id).map(|(_, v)| v)
    }

    /// Links a key that is not yet cached at the head, then evicts the tail
    /// if the capacity is exceeded.
    pub(crate) fn insert_new(&mut self, key: K, value: V) -> Option<(K, V)> {
        debug_assert!(!self.index.contains_key(&key));
        let id = self.order.push_front((key.clone(), value));
        self.index.insert(key, id);
        if self.index.len() > self.capacity {
            self.pop_back()
        } else {
            None
        }
    }

    /// Stores `value` in an existing node and moves it to the head.
    ///
    /// Returns the previous value, or `None` if `id` is stale.
    pub(crate) fn replace_and_promote(&mut self, id: SlotId, value: V) -> Option<V> {
        let (_, slot_value) = self.order.get_mut(id)?;
        let previous = std::mem::replace(slot_value, value);
        self.order.move_to_front(id);
        Some(previous)
    }

    /// Moves an existing node to the head without touching its value.
    pub(crate) fn promote(&mut self, id: SlotId) -> bool {
        self.order.move_to_front(id)
    }

    pub(crate) fn pop_back(&mut self) -> Option<(K, V)> {
        let (key, value) = self.order.pop_back()?;
        self.index.remove(&key);
        Some((key, value))
    }

    pub(crate) fn back(&self) -> Option<(&K, &V)> {
        self.order.back().map(|(k, v)| (k, v))
    }

    #[inline]
    pub(crate) fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
    }

    /// Entries from most recent to next victim.
    pub(crate) fn iter(&self) -> impl ExactSizeIterator<Item = (&K, &V)> {
        self.order.iter().map(|(k, v)| (k, v))
    }

    pub(crate) fn check_invariants(&self) -> Result<(), InvariantError> {
        self.order.check_invariants()?;
        if self.index.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys, order list holds {} entries",
                self.index.len(),
                self.order.len()
            )));
        }
        for (key, &id) in &self.index {
            match self.order.get(id) {
                Some((stored, _)) if stored == key => {},
                Some(_) => return Err(InvariantError::new("index points at a foreign key")),
                None => return Err(InvariantError::new("index points at a vacant slot")),
            }
        }
        if self.index.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "size {} exceeds capacity {}",
                self.index.len(),
                self.capacity
            )));
        }
        Ok(())
    }
}

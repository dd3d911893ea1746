//! Eviction policies.
//!
//! Both policies share `ordered::OrderedCore`: an `FxHashMap` index into an
//! arena-backed ordered list.

pub mod fifo;
pub mod lru;
pub(crate) mod ordered;

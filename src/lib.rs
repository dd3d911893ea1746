//! pagekit: bounded eviction caches and session-scoped page storage.
//!
//! Two independent halves:
//!
//! - [`policy`] / [`builder`]: capacity-bounded caches behind the
//!   [`traits::EvictionCache`] contract, with recency (LRU) and insertion
//!   (FIFO, change-aware) eviction.
//! - [`session`]: a per-thread [`session::ThreadSession`] owning a lazily
//!   created page registry, torn down by priority-ordered finalizers when the
//!   session ends.
//!
//! Configuration is parsed once into an immutable [`config::SessionConfig`]
//! and shared with every worker.

pub mod builder;
pub mod config;
pub mod ds;
pub mod error;
pub mod policy;
pub mod session;
pub mod traits;

#[cfg(feature = "metrics")]
pub mod metrics;

#[cfg(feature = "concurrency")]
pub mod sync;

pub mod prelude;

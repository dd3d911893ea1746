//! Operation counters for the eviction caches (feature `metrics`).
//!
//! Recorders only write counters, snapshot providers only read them. Counters
//! bumped from `&self` methods (`poll`, `exists`) use [`cell::MetricsCell`].

pub mod cell;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

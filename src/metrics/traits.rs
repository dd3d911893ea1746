//! Recorder and provider traits.
//!
//! ```text
//!   CoreMetricsRecorder ──► FifoMetricsRecorder
//!   CacheMetricsReadRecorder      (&self counters: poll / exists)
//!   MetricsSnapshotProvider<S>    (read side)
//! ```

/// Counters every policy records.
pub trait CoreMetricsRecorder {
    fn record_put_call(&mut self);
    fn record_put_new(&mut self);
    fn record_put_update(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_del_call(&mut self);
    fn record_del_found(&mut self);
    fn record_clear(&mut self);
}

/// Insertion-policy counters.
pub trait FifoMetricsRecorder: CoreMetricsRecorder {
    /// A re-put with an equal value that left the entry untouched.
    fn record_put_unchanged(&mut self);
}

/// Counters recorded from `&self` methods (interior mutability).
pub trait CacheMetricsReadRecorder {
    fn record_poll_call(&self);
    fn record_poll_found(&self);
    fn record_exists_call(&self);
    fn record_exists_hit(&self);
}

/// Produces a point-in-time copy of a cache's counters.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

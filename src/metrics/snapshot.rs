#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetricsSnapshot {
    pub put_calls: u64,
    pub put_new: u64,
    pub put_updates: u64,
    pub put_unchanged: u64, // insertion policy only

    pub evicted_entries: u64,

    pub del_calls: u64,
    pub del_found: u64,

    pub poll_calls: u64,
    pub poll_found: u64,

    pub exists_calls: u64,
    pub exists_hits: u64,

    pub clear_calls: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
}

impl CacheMetricsSnapshot {
    /// Fraction of `exists` probes that found their key.
    pub fn exists_hit_ratio(&self) -> f64 {
        if self.exists_calls == 0 {
            0.0
        } else {
            self.exists_hits as f64 / self.exists_calls as f64
        }
    }
}

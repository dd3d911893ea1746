use crate::metrics::cell::MetricsCell;
use crate::metrics::snapshot::CacheMetricsSnapshot;
use crate::metrics::traits::{CacheMetricsReadRecorder, CoreMetricsRecorder, FifoMetricsRecorder};

#[derive(Debug, Default)]
pub struct CacheMetrics {
    pub put_calls: u64,
    pub put_new: u64,
    pub put_updates: u64,
    pub put_unchanged: u64,
    pub evicted_entries: u64,
    pub del_calls: u64,
    pub del_found: u64,
    pub clear_calls: u64,
    pub poll_calls: MetricsCell,
    pub poll_found: MetricsCell,
    pub exists_calls: MetricsCell,
    pub exists_hits: MetricsCell,
}

impl CacheMetrics {
    /// Copies the counters and attaches the current size gauges.
    pub fn snapshot(&self, cache_len: usize, capacity: usize) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            put_calls: self.put_calls,
            put_new: self.put_new,
            put_updates: self.put_updates,
            put_unchanged: self.put_unchanged,
            evicted_entries: self.evicted_entries,
            del_calls: self.del_calls,
            del_found: self.del_found,
            poll_calls: self.poll_calls.get(),
            poll_found: self.poll_found.get(),
            exists_calls: self.exists_calls.get(),
            exists_hits: self.exists_hits.get(),
            clear_calls: self.clear_calls,
            cache_len,
            capacity,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl CoreMetricsRecorder for CacheMetrics {
    #[inline]
    fn record_put_call(&mut self) {
        self.put_calls += 1;
    }

    #[inline]
    fn record_put_new(&mut self) {
        self.put_new += 1;
    }

    #[inline]
    fn record_put_update(&mut self) {
        self.put_updates += 1;
    }

    #[inline]
    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    #[inline]
    fn record_del_call(&mut self) {
        self.del_calls += 1;
    }

    #[inline]
    fn record_del_found(&mut self) {
        self.del_found += 1;
    }

    #[inline]
    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl FifoMetricsRecorder for CacheMetrics {
    #[inline]
    fn record_put_unchanged(&mut self) {
        self.put_unchanged += 1;
    }
}

impl CacheMetricsReadRecorder for &CacheMetrics {
    #[inline]
    fn record_poll_call(&self) {
        self.poll_calls.incr();
    }

    #[inline]
    fn record_poll_found(&self) {
        self.poll_found.incr();
    }

    #[inline]
    fn record_exists_call(&self) {
        self.exists_calls.incr();
    }

    #[inline]
    fn record_exists_hit(&self) {
        self.exists_hits.incr();
    }
}

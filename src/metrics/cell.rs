use std::cell::Cell;

/// Counter that can be bumped through a shared reference.
///
/// The cell is `Send` but not `Sync`; a cache shared across threads is
/// wrapped in a lock, which serializes every access to its counters.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get() + 1);
    }

    #[inline]
    pub fn reset(&self) {
        self.0.set(0);
    }
}

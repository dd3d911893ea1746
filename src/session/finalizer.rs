//! Priority-ordered callbacks run once at the end of a session.
//!
//! Subsystems whose resources others may still reference register at a
//! higher level so they are released first:
//!
//! ```text
//!   register(Level0, close_files)
//!   register(Level1, drop_pages)        end of session:
//!   register(Level0, flush_stats)  ──►  drop_pages, close_files, flush_stats
//! ```
//!
//! Within one level, callbacks run in registration order.

use std::fmt;

/// Ordering tag for session finalizers. Higher levels run earlier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FinalizerPriority {
    #[default]
    Level0,
    Level1,
    Level2,
    Level3,
}

type Callback<Ctx> = Box<dyn FnOnce(&mut Ctx)>;

struct Registered<Ctx> {
    priority: FinalizerPriority,
    seq: u64,
    callback: Callback<Ctx>,
}

/// Finalizers registered against a context of type `Ctx`.
pub struct SessionFinalizers<Ctx> {
    pending: Vec<Registered<Ctx>>,
    next_seq: u64,
}

impl<Ctx> SessionFinalizers<Ctx> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }

    /// Queues `callback` to run once when the session ends.
    pub fn register<F>(&mut self, priority: FinalizerPriority, callback: F)
    where
        F: FnOnce(&mut Ctx) + 'static,
    {
        self.pending.push(Registered {
            priority,
            seq: self.next_seq,
            callback: Box::new(callback),
        });
        self.next_seq += 1;
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of pending callbacks at `priority`.
    pub fn count_at(&self, priority: FinalizerPriority) -> usize {
        self.pending
            .iter()
            .filter(|entry| entry.priority == priority)
            .count()
    }

    /// Removes every pending callback, highest priority first.
    ///
    /// Used when the context owns its own finalizer list and therefore cannot
    /// lend `&mut self` to [`run`](Self::run).
    pub(crate) fn drain_ordered(&mut self) -> Vec<Box<dyn FnOnce(&mut Ctx)>> {
        let mut pending = std::mem::take(&mut self.pending);
        pending.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.seq.cmp(&b.seq)));
        pending.into_iter().map(|entry| entry.callback).collect()
    }

    /// Runs every pending callback against `ctx` and returns how many ran.
    pub fn run(&mut self, ctx: &mut Ctx) -> usize {
        let ordered = self.drain_ordered();
        let count = ordered.len();
        for callback in ordered {
            callback(ctx);
        }
        count
    }
}

impl<Ctx> Default for SessionFinalizers<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> fmt::Debug for SessionFinalizers<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionFinalizers")
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_in_descending_priority() {
        let mut finalizers = SessionFinalizers::<Vec<&'static str>>::new();
        finalizers.register(FinalizerPriority::Level0, |log| log.push("low"));
        finalizers.register(FinalizerPriority::Level2, |log| log.push("high"));
        finalizers.register(FinalizerPriority::Level1, |log| log.push("mid"));

        let mut log = Vec::new();
        assert_eq!(finalizers.run(&mut log), 3);
        assert_eq!(log, vec!["high", "mid", "low"]);
    }

    #[test]
    fn same_level_keeps_registration_order() {
        let mut finalizers = SessionFinalizers::<Vec<u32>>::new();
        for i in 0..5 {
            finalizers.register(FinalizerPriority::Level1, move |log| log.push(i));
        }
        finalizers.register(FinalizerPriority::Level3, |log| log.push(99));

        let mut log = Vec::new();
        finalizers.run(&mut log);
        assert_eq!(log, vec![99, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn each_callback_runs_exactly_once() {
        let mut finalizers = SessionFinalizers::<u32>::new();
        finalizers.register(FinalizerPriority::default(), |n| *n += 1);

        let mut count = 0;
        assert_eq!(finalizers.run(&mut count), 1);
        assert_eq!(finalizers.run(&mut count), 0);
        assert_eq!(count, 1);
        assert!(finalizers.is_empty());
    }

    #[test]
    fn count_at_filters_by_level() {
        let mut finalizers = SessionFinalizers::<()>::new();
        finalizers.register(FinalizerPriority::Level1, |_| {});
        finalizers.register(FinalizerPriority::Level1, |_| {});
        finalizers.register(FinalizerPriority::Level0, |_| {});
        assert_eq!(finalizers.count_at(FinalizerPriority::Level1), 2);
        assert_eq!(finalizers.count_at(FinalizerPriority::Level3), 0);
        assert_eq!(finalizers.len(), 3);
    }

    #[test]
    fn levels_are_ordered() {
        assert!(FinalizerPriority::Level1 > FinalizerPriority::Level0);
        assert!(FinalizerPriority::Level3 > FinalizerPriority::Level2);
        assert_eq!(FinalizerPriority::default(), FinalizerPriority::Level0);
    }
}

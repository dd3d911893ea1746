//! Per-thread processing sessions.
//!
//! A [`ThreadSession`] is the explicit context a worker thread carries through
//! one job: its local thread id, the shared immutable [`SessionConfig`], its
//! [`PageStore`], and the finalizers to run when the job ends.
//!
//! ```text
//!   ThreadSession::new(tid, Arc<SessionConfig>)
//!        │
//!        │ page_map()   first call: init registry, register teardown @ Level1
//!        ▼
//!   pages accumulate by type ...
//!        │
//!        │ end() / drop  finalizers, highest level first
//!        ▼
//!   Level1: drop_all_pages + free_page_map ──► Level0 finalizers
//! ```
//!
//! `ThreadSession` is neither `Send` nor `Sync`: pages and finalizers are not
//! required to be thread-safe, so the compiler keeps a session on the thread
//! that created it.
//!
//! ```compile_fail
//! fn assert_send<T: Send>() {}
//! assert_send::<pagekit::session::ThreadSession>();
//! ```

pub mod finalizer;
pub mod page;
pub mod store;

use std::fmt;
use std::sync::Arc;
use std::thread;

use tracing::debug;

use crate::config::SessionConfig;
pub use finalizer::{FinalizerPriority, SessionFinalizers};
pub use page::{Page, PageMap, PageTag};
pub use store::{PageStore, RegistryPhase};

/// Level at which the page registry tears down, ahead of default finalizers
/// that may still hold page-backed objects.
pub const PAGE_STORE_PRIORITY: FinalizerPriority = FinalizerPriority::Level1;

/// Explicit per-thread session context.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use pagekit::config::SessionConfig;
/// use pagekit::session::{Page, RegistryPhase, ThreadSession};
///
/// struct Rows(Vec<u64>);
/// impl Page for Rows {
///     fn finalize(&mut self) {
///         self.0.clear();
///     }
/// }
///
/// let mut session = ThreadSession::new(0, Arc::new(SessionConfig::new(1024)));
/// session.page_map().insert(Rows(vec![1, 2, 3]));
/// assert_eq!(session.pages().page_size(), Some(1024));
///
/// session.end();
/// assert_eq!(session.pages().phase(), RegistryPhase::Uninitialized);
/// ```
pub struct ThreadSession {
    local_tid: usize,
    config: Arc<SessionConfig>,
    pages: PageStore,
    finalizers: SessionFinalizers<ThreadSession>,
    teardown_registered: bool,
}

impl ThreadSession {
    pub fn new(local_tid: usize, config: Arc<SessionConfig>) -> Self {
        Self {
            local_tid,
            config,
            pages: PageStore::new(),
            finalizers: SessionFinalizers::new(),
            teardown_registered: false,
        }
    }

    pub fn local_tid(&self) -> usize {
        self.local_tid
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the page map, initializing the registry on first use.
    ///
    /// Initialization records this thread's id and the configured page size
    /// and schedules the registry teardown for the end of the session.
    pub fn page_map(&mut self) -> &mut PageMap {
        if !self.teardown_registered {
            self.teardown_registered = true;
            self.finalizers
                .register(PAGE_STORE_PRIORITY, |session: &mut ThreadSession| {
                    session.teardown_registered = false;
                    session.pages.teardown();
                });
        }
        self.pages
            .get_page_map(self.local_tid, self.config.page_size())
    }

    pub fn pages(&self) -> &PageStore {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut PageStore {
        &mut self.pages
    }

    /// Hands out the next per-thread identifier.
    pub fn next_id(&mut self) -> u64 {
        self.pages.next_id()
    }

    /// Schedules `callback` for the end of this session.
    pub fn register_finalizer<F>(&mut self, priority: FinalizerPriority, callback: F)
    where
        F: FnOnce(&mut ThreadSession) + 'static,
    {
        self.finalizers.register(priority, callback);
    }

    pub fn finalizers(&self) -> &SessionFinalizers<ThreadSession> {
        &self.finalizers
    }

    /// Ends the session: runs every pending finalizer once, highest level
    /// first, and returns how many ran.
    ///
    /// Finalizers registered while this runs are kept for the next `end`.
    /// Calling `end` again with nothing pending is a no-op.
    pub fn end(&mut self) -> usize {
        let ordered = self.finalizers.drain_ordered();
        let count = ordered.len();
        for callback in ordered {
            callback(self);
        }
        if count > 0 {
            debug!(tid = self.local_tid, finalizers = count, "session ended");
        }
        count
    }
}

impl Drop for ThreadSession {
    fn drop(&mut self) {
        self.end();
    }
}

impl fmt::Debug for ThreadSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadSession")
            .field("local_tid", &self.local_tid)
            .field("config", &self.config)
            .field("pages", &self.pages)
            .field("finalizers", &self.finalizers)
            .finish()
    }
}

/// Runs `job` once on each of `workers` scoped threads.
///
/// Every worker gets its own [`ThreadSession`] (local tid `0..workers`)
/// sharing `config`; the session is ended before the thread exits. Results
/// are returned in tid order. A panicking worker re-raises its panic here.
pub fn run_workers<F, R>(config: Arc<SessionConfig>, workers: usize, job: F) -> Vec<R>
where
    F: Fn(&mut ThreadSession) -> R + Sync,
    R: Send,
{
    let job = &job;
    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|tid| {
                let config = Arc::clone(&config);
                scope.spawn(move || {
                    let mut session = ThreadSession::new(tid, config);
                    let out = job(&mut session);
                    session.end();
                    out
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    })
}

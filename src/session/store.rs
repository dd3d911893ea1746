//! Page registry lifecycle.
//!
//! ```text
//!                  get_page_map
//!   Uninitialized ─────────────► Initialized
//!         ▲                           │
//!         └───────────────────────────┘
//!      teardown (drop_all_pages + free_page_map)
//! ```
//!
//! A freed registry is indistinguishable from one never created: the next
//! `get_page_map` builds a fresh, empty map with the counter back at 0.
//!
//! The live registry is an `Option`, so `drop_all_pages` and `free_page_map`
//! can only touch pages in the Initialized phase and are no-ops otherwise.

use tracing::debug;

use crate::session::page::PageMap;

/// Observable lifecycle phase of a [`PageStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryPhase {
    Uninitialized,
    Initialized,
}

#[derive(Debug)]
struct LiveRegistry {
    map: PageMap,
    tid: usize,
    page_size: usize,
}

/// Per-thread page registry.
///
/// Owns every page registered into it. Pages still registered when the store
/// is dropped are finalized first.
#[derive(Debug, Default)]
pub struct PageStore {
    live: Option<LiveRegistry>,
    counter: u64,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RegistryPhase {
        if self.live.is_some() {
            RegistryPhase::Initialized
        } else {
            RegistryPhase::Uninitialized
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.live.is_some()
    }

    /// Returns the live page map, creating an empty one on first use.
    ///
    /// `tid` and `page_size` are recorded only when the registry is created.
    pub fn get_page_map(&mut self, tid: usize, page_size: usize) -> &mut PageMap {
        let live = self.live.get_or_insert_with(|| {
            debug!(tid, page_size, "page registry initialized");
            LiveRegistry {
                map: PageMap::new(),
                tid,
                page_size,
            }
        });
        &mut live.map
    }

    /// The live page map, without initializing.
    pub fn page_map(&self) -> Option<&PageMap> {
        self.live.as_ref().map(|live| &live.map)
    }

    /// Thread that owns the registry; `None` unless initialized.
    pub fn tid(&self) -> Option<usize> {
        self.live.as_ref().map(|live| live.tid)
    }

    /// Page size captured at initialization; `None` unless initialized.
    pub fn page_size(&self) -> Option<usize> {
        self.live.as_ref().map(|live| live.page_size)
    }

    /// Hands out the next per-thread identifier.
    pub fn next_id(&mut self) -> u64 {
        let id = self.counter;
        self.counter += 1;
        id
    }

    /// Current value of the per-thread counter.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Finalizes and drops every page; the registry stays initialized.
    ///
    /// Returns the number of pages dropped. No-op unless initialized.
    pub fn drop_all_pages(&mut self) -> usize {
        let Some(live) = self.live.as_mut() else {
            return 0;
        };
        let dropped = live.map.finalize_all();
        debug!(tid = live.tid, pages = dropped, "dropped all pages");
        dropped
    }

    /// Releases the registry itself and resets the counter.
    ///
    /// Pages still registered are finalized before release. Idempotent.
    pub fn free_page_map(&mut self) {
        if let Some(mut live) = self.live.take() {
            live.map.finalize_all();
            debug!(tid = live.tid, "page registry freed");
        }
        self.counter = 0;
    }

    /// `drop_all_pages` followed by `free_page_map`; returns pages dropped.
    pub fn teardown(&mut self) -> usize {
        let dropped = self.drop_all_pages();
        self.free_page_map();
        dropped
    }
}

impl Drop for PageStore {
    fn drop(&mut self) {
        if let Some(live) = self.live.as_mut() {
            live.map.finalize_all();
        }
    }
}

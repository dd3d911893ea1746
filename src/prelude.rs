pub use crate::builder::{Cache, CacheBuilder, CachePolicy};
pub use crate::config::{Config, SessionConfig};
pub use crate::ds::{IntrusiveList, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::CacheMetricsSnapshot;
pub use crate::policy::fifo::FifoCache;
pub use crate::policy::lru::LruCache;
pub use crate::session::{
    FinalizerPriority, Page, PageMap, PageStore, PageTag, RegistryPhase, SessionFinalizers,
    ThreadSession, run_workers,
};
#[cfg(feature = "concurrency")]
pub use crate::sync::SharedCache;
pub use crate::traits::EvictionCache;

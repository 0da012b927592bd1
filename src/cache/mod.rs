//! Read cache for the todo board.
//!
//! A single memoized snapshot of every stored record, cleared on each mutation.
//!
//! ```toml
//! [cache]
//! enabled = true
//! capacity = 1
//! ```

mod config;
pub(crate) mod lock;
mod snapshot;

pub use config::CacheConfig;
pub use snapshot::{Snapshot, SnapshotCache};
pub(crate) use snapshot::{METRIC_CACHE_HIT, METRIC_CACHE_INVALIDATE, METRIC_CACHE_MISS};

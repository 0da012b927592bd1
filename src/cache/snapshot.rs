//! Whole-list snapshot cache.
//!
//! There is exactly one key (the "all records" read), so the LRU never holds
//! more than one entry. The refresh runs while the cache mutex is held; an
//! invalidation issued after a store mutation therefore always lands after any
//! refresh that could have observed the pre-mutation state.

use std::{future::Future, sync::Arc};

use lru::LruCache;
use metrics::counter;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::entities::TodoRecord;

use super::config::CacheConfig;

pub(crate) const METRIC_CACHE_HIT: &str = "todos_cache_hit_total";
pub(crate) const METRIC_CACHE_MISS: &str = "todos_cache_miss_total";
pub(crate) const METRIC_CACHE_INVALIDATE: &str = "todos_cache_invalidate_total";

/// Immutable copy of the store contents at refresh time.
pub type Snapshot = Arc<[TodoRecord]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct AllTodos;

pub struct SnapshotCache {
    entries: Mutex<LruCache<AllTodos, Snapshot>>,
}

impl SnapshotCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(config.capacity_non_zero())),
        }
    }

    /// Return the memoized snapshot, calling `load` to rebuild it when cleared.
    pub async fn get_snapshot<F, Fut, E>(&self, load: F) -> Result<Snapshot, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<TodoRecord>, E>>,
    {
        let mut entries = self.entries.lock().await;
        if let Some(snapshot) = entries.get(&AllTodos) {
            counter!(METRIC_CACHE_HIT).increment(1);
            return Ok(Arc::clone(snapshot));
        }

        counter!(METRIC_CACHE_MISS).increment(1);
        let snapshot: Snapshot = load().await?.into();
        debug!(
            target: "todos::cache",
            records = snapshot.len(),
            "Refreshed todo snapshot"
        );
        entries.put(AllTodos, Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Drop the snapshot so the next read rebuilds it from the store.
    pub async fn invalidate(&self) {
        self.entries.lock().await.clear();
        counter!(METRIC_CACHE_INVALIDATE).increment(1);
    }

    pub async fn is_warm(&self) -> bool {
        !self.entries.lock().await.is_empty()
    }
}

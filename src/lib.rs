//! Owner-scoped todo board: an in-memory record store behind a whole-list
//! read cache, served as server-rendered HTML.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;

use std::sync::Arc;

use application::todos::TodoService;
use cache::{CacheConfig, SnapshotCache};
use infra::{http::HttpState, memory::InMemoryTodos};

/// Wire the store, cache and service into the state shared by every handler.
pub fn build_http_state(settings: &config::Settings) -> HttpState {
    let store = Arc::new(InMemoryTodos::new(settings.store.id_strategy));
    let cache_config = CacheConfig::from(&settings.cache);
    let cache = cache_config
        .is_enabled()
        .then(|| Arc::new(SnapshotCache::new(&cache_config)));

    let todos = TodoService::new(store).with_cache_opt(cache);
    HttpState {
        todos: Arc::new(todos),
    }
}

use std::sync::Arc;

use crate::{
    config::Config,
    db::MemoryStore,
    services::{MovieCatalog, WatchHistory, WatchLater},
};

/// Shared application state
///
/// Holds only the storage collaborators and request defaults; recommendations
/// are recomputed per request and never kept here.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn MovieCatalog>,
    pub history: Arc<dyn WatchHistory>,
    pub watch_later: Arc<dyn WatchLater>,
    pub defaults: RequestDefaults,
}

/// Fallbacks for query parameters a request leaves out
#[derive(Debug, Clone, Copy)]
pub struct RequestDefaults {
    pub max_results: i64,
    pub recency_window: i64,
}

impl From<&Config> for RequestDefaults {
    fn from(config: &Config) -> Self {
        Self {
            max_results: config.max_results,
            recency_window: config.recency_window,
        }
    }
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        history: Arc<dyn WatchHistory>,
        watch_later: Arc<dyn WatchLater>,
        defaults: RequestDefaults,
    ) -> Self {
        Self {
            catalog,
            history,
            watch_later,
            defaults,
        }
    }

    /// State backed by a single in-memory store serving every collaborator
    pub fn in_memory(store: Arc<MemoryStore>, config: &Config) -> Self {
        Self::new(
            store.clone(),
            store.clone(),
            store,
            RequestDefaults::from(config),
        )
    }
}

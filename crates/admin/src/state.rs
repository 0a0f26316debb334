//! Application state shared across handlers.

use std::sync::Arc;

use quire_store::DataStore;

use crate::config::AdminConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: DataStore,
}

impl AppState {
    /// Create a new application state, opening the configured data directory.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let store = DataStore::open(config.data_dir.clone());
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the data store.
    #[must_use]
    pub fn store(&self) -> &DataStore {
        &self.inner.store
    }
}

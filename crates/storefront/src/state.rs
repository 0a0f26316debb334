//! Application state shared across handlers.

use std::sync::Arc;

use quire_store::DataStore;

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the shared data store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: DataStore,
}

impl AppState {
    /// Create a new application state, opening the configured data directory.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let store = DataStore::open(config.data_dir.clone());
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the data store.
    #[must_use]
    pub fn store(&self) -> &DataStore {
        &self.inner.store
    }
}

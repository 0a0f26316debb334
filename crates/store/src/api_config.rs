//! API configuration repository.
//!
//! The configuration is a singleton. Reading it before anything was saved
//! synthesizes and persists a default (fresh key, CORS on, wildcard origin).

use rand::RngCore;

use quire_core::ApiConfig;

use crate::{DataStore, RepositoryError};

/// Number of random bytes in a generated API key.
pub const API_KEY_BYTES: usize = 16;

/// Generate a new API key: 16 random bytes, hex-encoded.
#[must_use]
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; API_KEY_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Repository for the API access-control settings.
pub struct ApiConfigRepository<'a> {
    store: &'a DataStore,
}

impl<'a> ApiConfigRepository<'a> {
    /// Create a new API configuration repository.
    #[must_use]
    pub const fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Get the configuration, creating the default on first access.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` or `RepositoryError::DataCorruption` if
    /// the file cannot be read or written.
    pub async fn get(&self) -> Result<ApiConfig, RepositoryError> {
        let _guard = self.store.api_config_file().lock().await;
        self.load_or_default().await
    }

    /// Persist `config` verbatim and return it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the file cannot be written.
    pub async fn save(&self, config: ApiConfig) -> Result<ApiConfig, RepositoryError> {
        let file = self.store.api_config_file();
        let _guard = file.lock().await;
        file.write(&config).await?;

        tracing::info!(
            enable_cors = config.enable_cors,
            allowed_origins = config.allowed_origins.len(),
            "API configuration saved"
        );
        Ok(config)
    }

    /// Modify the stored configuration in place under the lock.
    ///
    /// Use this instead of `get` followed by `save` when only some fields
    /// change, so a concurrent save is not overwritten with stale values.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` or `RepositoryError::DataCorruption` if
    /// the file cannot be read or written.
    pub async fn update<F>(&self, change: F) -> Result<ApiConfig, RepositoryError>
    where
        F: FnOnce(&mut ApiConfig) + Send,
    {
        let file = self.store.api_config_file();
        let _guard = file.lock().await;
        let mut config = self.load_or_default().await?;
        change(&mut config);
        file.write(&config).await?;

        tracing::info!(
            enable_cors = config.enable_cors,
            allowed_origins = config.allowed_origins.len(),
            "API configuration updated"
        );
        Ok(config)
    }

    /// Whether `key` matches the stored API key.
    ///
    /// # Errors
    ///
    /// See [`Self::get`].
    pub async fn validate_key(&self, key: &str) -> Result<bool, RepositoryError> {
        Ok(self.get().await?.validate_key(key))
    }

    /// Whether `origin` may read the API cross-origin.
    ///
    /// # Errors
    ///
    /// See [`Self::get`].
    pub async fn is_origin_allowed(&self, origin: &str) -> Result<bool, RepositoryError> {
        Ok(self.get().await?.is_origin_allowed(origin))
    }

    /// Caller must hold the config lock.
    async fn load_or_default(&self) -> Result<ApiConfig, RepositoryError> {
        let file = self.store.api_config_file();
        if let Some(config) = file.read().await? {
            return Ok(config);
        }

        let config = ApiConfig::with_key(generate_api_key());
        file.write(&config).await?;
        tracing::info!(path = %file.path().display(), "Created default API configuration");
        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store() -> (DataStore, tempfile::TempDir) {
        let tmp = tempfile::TempDir::new().unwrap();
        (DataStore::open(tmp.path()), tmp)
    }

    #[test]
    fn test_generate_api_key_shape() {
        let key = generate_api_key();
        assert_eq!(key.len(), API_KEY_BYTES * 2);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(key, generate_api_key());
    }

    #[tokio::test]
    async fn test_first_get_persists_default() {
        let (store, tmp) = store();
        let repo = ApiConfigRepository::new(&store);

        let config = repo.get().await.unwrap();
        assert!(config.enable_cors);
        assert_eq!(config.allowed_origins, vec!["*"]);
        assert_eq!(config.api_key.len(), 32);
        assert!(tmp.path().join(crate::API_CONFIG_FILE).exists());

        // The synthesized key is stable across reads.
        assert_eq!(repo.get().await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let (store, _tmp) = store();
        let repo = ApiConfigRepository::new(&store);
        let saved = ApiConfig {
            allowed_origins: vec!["https://blog.example".to_owned()],
            enable_cors: false,
            api_key: "fixed-key".to_owned(),
        };

        assert_eq!(repo.save(saved.clone()).await.unwrap(), saved);
        assert_eq!(repo.get().await.unwrap(), saved);
    }

    #[tokio::test]
    async fn test_update_keeps_untouched_fields() {
        let (store, _tmp) = store();
        let repo = ApiConfigRepository::new(&store);
        let original = repo.get().await.unwrap();

        let updated = repo.update(|c| c.enable_cors = false).await.unwrap();
        assert!(!updated.enable_cors);
        assert_eq!(updated.api_key, original.api_key);
        assert_eq!(repo.get().await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_validate_key() {
        let (store, _tmp) = store();
        let repo = ApiConfigRepository::new(&store);
        let key = repo.get().await.unwrap().api_key;

        assert!(repo.validate_key(&key).await.unwrap());
        assert!(!repo.validate_key("wrong").await.unwrap());
    }

    #[tokio::test]
    async fn test_is_origin_allowed() {
        let (store, _tmp) = store();
        let repo = ApiConfigRepository::new(&store);
        assert!(repo.is_origin_allowed("https://any.example").await.unwrap());

        repo.save(ApiConfig {
            allowed_origins: vec!["https://blog.example".to_owned()],
            enable_cors: true,
            api_key: "k".to_owned(),
        })
        .await
        .unwrap();
        assert!(repo.is_origin_allowed("https://blog.example").await.unwrap());
        assert!(!repo.is_origin_allowed("https://any.example").await.unwrap());

        repo.update(|c| c.enable_cors = false).await.unwrap();
        assert!(!repo.is_origin_allowed("https://blog.example").await.unwrap());
    }
}

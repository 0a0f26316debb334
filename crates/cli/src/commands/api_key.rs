//! `quire api-key`: show or rotate the read API key.

use quire_store::{ApiConfigRepository, DataStore, generate_api_key};

use super::CommandError;

/// The current key. Synthesises the config if it does not exist yet.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or written.
pub async fn show(store: &DataStore) -> Result<String, CommandError> {
    Ok(ApiConfigRepository::new(store).get().await?.api_key)
}

/// Replace the key, keeping the CORS settings. Returns the new key.
///
/// Clients holding the old key get 401 from the next request on.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or written.
pub async fn rotate(store: &DataStore) -> Result<String, CommandError> {
    let key = generate_api_key();
    let saved = ApiConfigRepository::new(store)
        .update(move |config| config.api_key = key)
        .await?;
    tracing::warn!("API key rotated; update every client that calls the read API");
    Ok(saved.api_key)
}

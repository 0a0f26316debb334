//! `quire init`: prepare a data directory.

use quire_store::{ApiConfigRepository, CategoryRepository, ContentRepository, DataStore};

use super::CommandError;

/// Create the directory, seed categories and synthesise the API config.
///
/// Existing documents are left untouched, so running it twice is harmless.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or an existing file
/// does not decode.
pub async fn run(store: &DataStore) -> Result<Vec<String>, CommandError> {
    store.ensure_dir().await?;

    let categories = CategoryRepository::new(store).list().await?;
    let config = ApiConfigRepository::new(store).get().await?;
    let content = ContentRepository::new(store).list().await?;

    tracing::info!(
        data_dir = %store.dir().display(),
        categories = categories.len(),
        content = content.len(),
        "Data directory ready"
    );

    Ok(vec![
        format!("Data directory: {}", store.dir().display()),
        format!("Categories:     {}", categories.len()),
        format!("Content:        {}", content.len()),
        format!("API key:        {}", config.api_key),
    ])
}

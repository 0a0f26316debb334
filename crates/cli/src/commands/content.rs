//! `quire content`: inspect stored content.

use quire_store::{ContentRepository, DataStore};

use super::CommandError;

/// One line per item, newest first: id, creation date, category and title.
///
/// # Errors
///
/// Returns an error if the content file cannot be read.
pub async fn list(store: &DataStore) -> Result<Vec<String>, CommandError> {
    let items = ContentRepository::new(store).list().await?;
    if items.is_empty() {
        tracing::info!("No content yet");
    }
    Ok(items
        .iter()
        .map(|item| {
            format!(
                "{}  {}  [{}]  {}",
                item.id,
                item.created_at.format("%Y-%m-%d"),
                item.category,
                item.title
            )
        })
        .collect())
}

//! `quire categories`: list and add categories.

use quire_store::{CategoryRepository, DataStore, RepositoryError};

use super::CommandError;

/// One line per category: id and name.
///
/// # Errors
///
/// Returns an error if the categories file cannot be read.
pub async fn list(store: &DataStore) -> Result<Vec<String>, CommandError> {
    let categories = CategoryRepository::new(store).list().await?;
    Ok(categories
        .iter()
        .map(|category| format!("{}  {}", category.id, category.name))
        .collect())
}

/// Add a category and print the stored record.
///
/// # Errors
///
/// Returns an error if the name is blank or the file cannot be written.
pub async fn add(store: &DataStore, name: &str) -> Result<Vec<String>, CommandError> {
    let category = CategoryRepository::new(store)
        .add(name)
        .await
        .inspect_err(|e| {
            if matches!(e, RepositoryError::Validation(_)) {
                tracing::warn!(name, "Rejected category name");
            }
        })?;
    tracing::info!(id = %category.id, name = %category.name, "Category added");
    Ok(vec![format!("{}  {}", category.id, category.name)])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use quire_core::Category;

    use super::*;
    use crate::commands::temp_store;

    #[tokio::test]
    async fn test_list_seeds_defaults() {
        let (store, _tmp) = temp_store();

        let lines = list(&store).await.unwrap();

        assert_eq!(lines.len(), Category::DEFAULT_NAMES.len());
        assert!(lines.iter().any(|l| l.ends_with("  Business")));
    }

    #[tokio::test]
    async fn test_add_appends() {
        let (store, _tmp) = temp_store();

        let added = add(&store, "  Travel ").await.unwrap();
        assert!(added.first().unwrap().ends_with("  Travel"));

        let lines = list(&store).await.unwrap();
        assert_eq!(lines.len(), Category::DEFAULT_NAMES.len() + 1);
        assert!(lines.last().unwrap().ends_with("  Travel"));
    }

    #[tokio::test]
    async fn test_add_blank_name_fails() {
        let (store, _tmp) = temp_store();

        let err = add(&store, "   ").await.unwrap_err();
        assert!(matches!(
            err,
            CommandError::Store(RepositoryError::Validation(_))
        ));
    }
}

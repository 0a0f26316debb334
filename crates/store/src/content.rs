//! Content repository.
//!
//! Records are stored in insertion order and returned newest-first.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use quire_core::{Content, ContentId, ContentUpdate, NewContent};

use crate::{DataStore, RepositoryError};

// =============================================================================
// Stored Record
// =============================================================================

/// On-disk shape. Also accepts the earlier schema, which had a single
/// `imageUrl` and no `subtitle`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentRecord {
    id: ContentId,
    title: String,
    #[serde(default)]
    subtitle: String,
    category: String,
    content: String,
    #[serde(default)]
    image_urls: Vec<String>,
    #[serde(default)]
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl From<ContentRecord> for Content {
    fn from(record: ContentRecord) -> Self {
        let mut image_urls = record.image_urls;
        if image_urls.is_empty()
            && let Some(url) = record.image_url.filter(|u| !u.trim().is_empty())
        {
            image_urls.push(url);
        }

        Self {
            id: record.id,
            title: record.title,
            subtitle: record.subtitle,
            category: record.category,
            body: record.content,
            image_urls,
            created_at: record.created_at,
            updated_at: record.updated_at.unwrap_or(record.created_at),
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for content operations.
pub struct ContentRepository<'a> {
    store: &'a DataStore,
}

impl<'a> ContentRepository<'a> {
    /// Create a new content repository.
    #[must_use]
    pub const fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// List all content, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` or `RepositoryError::DataCorruption` if
    /// the file cannot be read.
    pub async fn list(&self) -> Result<Vec<Content>, RepositoryError> {
        let mut items = {
            let _guard = self.store.content_file().lock().await;
            self.load().await?
        };
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    /// Content whose category matches `name`, ignoring case. Newest first.
    ///
    /// # Errors
    ///
    /// See [`Self::list`].
    pub async fn list_by_category(&self, name: &str) -> Result<Vec<Content>, RepositoryError> {
        let items = self.list().await?;
        Ok(items.into_iter().filter(|c| c.in_category(name)).collect())
    }

    /// Get a content item by id. A missing id is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` or `RepositoryError::DataCorruption` if
    /// the file cannot be read.
    pub async fn get_by_id(&self, id: ContentId) -> Result<Option<Content>, RepositoryError> {
        let _guard = self.store.content_file().lock().await;
        Ok(self.load().await?.into_iter().find(|c| c.id == id))
    }

    /// Create a content item.
    ///
    /// Validation runs before the file is touched, so a rejected payload
    /// leaves the collection unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if a required field is blank or
    /// no usable image URL was supplied.
    /// Returns `RepositoryError::Io` if the file cannot be written.
    pub async fn add(&self, input: NewContent) -> Result<Content, RepositoryError> {
        let content = Content::create(input, Utc::now())?;

        let file = self.store.content_file();
        let _guard = file.lock().await;
        let mut items = self.load().await?;
        items.push(content.clone());
        file.write(&items).await?;

        tracing::info!(id = %content.id, title = %content.title, "Content added");
        Ok(content)
    }

    /// Merge `update` over an existing item and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no item has this id.
    /// Returns `RepositoryError::Validation` if a supplied field is blank.
    /// Returns `RepositoryError::Io` if the file cannot be written.
    pub async fn update(
        &self,
        id: ContentId,
        update: ContentUpdate,
    ) -> Result<Content, RepositoryError> {
        let file = self.store.content_file();
        let _guard = file.lock().await;
        let mut items = self.load().await?;
        let item = items
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        update.apply(item, Utc::now())?;
        let updated = item.clone();
        file.write(&items).await?;

        tracing::info!(id = %updated.id, "Content updated");
        Ok(updated)
    }

    /// Delete a content item. Deleting an unknown id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the file cannot be written.
    pub async fn remove(&self, id: ContentId) -> Result<(), RepositoryError> {
        let file = self.store.content_file();
        let _guard = file.lock().await;
        let mut items = self.load().await?;
        let before = items.len();
        items.retain(|c| c.id != id);

        if items.len() < before {
            file.write(&items).await?;
            tracing::info!(%id, "Content deleted");
        }
        Ok(())
    }

    /// Caller must hold the content lock.
    async fn load(&self) -> Result<Vec<Content>, RepositoryError> {
        let records: Option<Vec<ContentRecord>> = self.store.content_file().read().await?;
        Ok(records
            .unwrap_or_default()
            .into_iter()
            .map(Content::from)
            .collect())
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

    fn input(title: &str, category: &str) -> NewContent {
        NewContent {
            title: title.to_owned(),
            subtitle: "Subtitle".to_owned(),
            category: category.to_owned(),
            content: "Body text".to_owned(),
            image_urls: vec!["https://img.example/1.jpg".to_owned()],
        }
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let (store, _tmp) = store();
        assert!(ContentRepository::new(&store).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_then_get() {
        let (store, _tmp) = store();
        let repo = ContentRepository::new(&store);

        let added = repo.add(input("First", "Health")).await.unwrap();
        let fetched = repo.get_by_id(added.id).await.unwrap().unwrap();

        assert_eq!(fetched, added);
        assert_eq!(fetched.title, "First");
        assert_eq!(fetched.subtitle, "Subtitle");
        assert_eq!(fetched.category, "Health");
        assert_eq!(fetched.body, "Body text");
        assert_eq!(fetched.image_urls, vec!["https://img.example/1.jpg"]);
    }

    #[tokio::test]
    async fn test_add_without_images_changes_nothing() {
        let (store, tmp) = store();
        let repo = ContentRepository::new(&store);
        repo.add(input("Keep", "Health")).await.unwrap();

        let bad = NewContent {
            image_urls: vec![String::new(), "  ".to_owned()],
            ..input("Bad", "Health")
        };
        assert!(matches!(
            repo.add(bad).await,
            Err(RepositoryError::Validation(_))
        ));
        assert_eq!(repo.list().await.unwrap().len(), 1);

        let empty = NewContent {
            image_urls: Vec::new(),
            ..input("Empty", "Health")
        };
        assert!(repo.add(empty).await.is_err());
        assert_eq!(repo.list().await.unwrap().len(), 1);
        assert!(tmp.path().join(crate::CONTENT_FILE).exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_two_handles_on_one_dir_write_without_errors() {
        let (first, tmp) = store();
        let second = DataStore::open(tmp.path());

        let tasks: Vec<_> = (0..100)
            .map(|i| {
                let store = if i % 2 == 0 { first.clone() } else { second.clone() };
                tokio::spawn(async move {
                    ContentRepository::new(&store)
                        .add(input(&format!("Item {i}"), "Health"))
                        .await
                })
            })
            .collect();
        let results: Vec<_> = join_all(tasks).await;

        let errors: Vec<String> = results
            .into_iter()
            .filter_map(|r| r.err().map(|e| e.to_string()))
            .collect();
        assert!(errors.is_empty(), "write errors: {errors:?}");

        // Each handle locks only itself, so adds may be lost but never torn.
        let items = ContentRepository::new(&first).list().await.unwrap();
        assert!(!items.is_empty());
        let entries = std::fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    async fn join_all(
        tasks: Vec<tokio::task::JoinHandle<Result<Content, RepositoryError>>>,
    ) -> Vec<Result<Content, RepositoryError>> {
        let mut results = Vec::with_capacity(tasks.len());
        for task in tasks {
            results.push(task.await.unwrap());
        }
        results
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let (store, _tmp) = store();
        let repo = ContentRepository::new(&store);

        let first = repo.add(input("First", "Health")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = repo.add(input("Second", "Health")).await.unwrap();

        let ids: Vec<ContentId> = repo.list().await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_update_merges_and_bumps_updated_at() {
        let (store, _tmp) = store();
        let repo = ContentRepository::new(&store);
        let added = repo.add(input("Original", "Health")).await.unwrap();

        let updated = repo
            .update(
                added.id,
                ContentUpdate {
                    title: Some("Changed".to_owned()),
                    image_urls: Some(vec!["https://img.example/2.jpg".to_owned()]),
                    ..ContentUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Changed");
        assert_eq!(updated.image_urls, vec!["https://img.example/2.jpg"]);
        assert_eq!(updated.subtitle, added.subtitle);
        assert_eq!(updated.category, added.category);
        assert_eq!(updated.body, added.body);
        assert_eq!(updated.created_at, added.created_at);
        assert!(updated.updated_at > added.updated_at);

        let again = repo.update(added.id, ContentUpdate::default()).await.unwrap();
        assert!(again.updated_at > updated.updated_at);
        assert_eq!(repo.get_by_id(added.id).await.unwrap().unwrap(), again);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let (store, _tmp) = store();
        let repo = ContentRepository::new(&store);

        assert!(matches!(
            repo.update(ContentId::generate(), ContentUpdate::default()).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_invalid_keeps_stored_record() {
        let (store, _tmp) = store();
        let repo = ContentRepository::new(&store);
        let added = repo.add(input("Original", "Health")).await.unwrap();

        let result = repo
            .update(
                added.id,
                ContentUpdate {
                    title: Some("   ".to_owned()),
                    ..ContentUpdate::default()
                },
            )
            .await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
        assert_eq!(repo.get_by_id(added.id).await.unwrap().unwrap(), added);
    }

    #[tokio::test]
    async fn test_remove() {
        let (store, _tmp) = store();
        let repo = ContentRepository::new(&store);
        let added = repo.add(input("Doomed", "Health")).await.unwrap();
        let kept = repo.add(input("Kept", "Health")).await.unwrap();

        repo.remove(added.id).await.unwrap();
        assert!(repo.get_by_id(added.id).await.unwrap().is_none());

        repo.remove(added.id).await.unwrap();
        let remaining = repo.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, kept.id);
    }

    #[tokio::test]
    async fn test_list_by_category_ignores_case() {
        let (store, _tmp) = store();
        let repo = ContentRepository::new(&store);
        repo.add(input("A", "Technology")).await.unwrap();
        repo.add(input("B", "health")).await.unwrap();

        let tech = repo.list_by_category("technology").await.unwrap();
        assert_eq!(tech.len(), 1);
        assert_eq!(tech[0].title, "A");
        assert_eq!(repo.list_by_category("HEALTH").await.unwrap().len(), 1);
        assert!(repo.list_by_category("sports").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reads_legacy_single_image_records() {
        let (store, tmp) = store();
        let legacy = r#"[{
            "id": "0d3f6c1e-8b7a-4f5e-9c2d-1a0b9c8d7e6f",
            "title": "Old post",
            "category": "Business",
            "content": "Written before subtitles existed",
            "imageUrl": "https://img.example/old.jpg",
            "createdAt": "2024-03-01T12:00:00Z"
        }]"#;
        std::fs::write(tmp.path().join(crate::CONTENT_FILE), legacy).unwrap();

        let items = ContentRepository::new(&store).list().await.unwrap();
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.image_urls, vec!["https://img.example/old.jpg"]);
        assert_eq!(item.subtitle, "");
        assert_eq!(item.updated_at, item.created_at);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let (store, tmp) = store();
        std::fs::write(tmp.path().join(crate::CONTENT_FILE), "[{").unwrap();

        assert!(matches!(
            ContentRepository::new(&store).list().await,
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}

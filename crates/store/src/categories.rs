//! Category repository.

use quire_core::{Category, CategoryId};

use crate::{DataStore, RepositoryError};

/// Repository for category operations.
pub struct CategoryRepository<'a> {
    store: &'a DataStore,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// List all categories in persisted order.
    ///
    /// The first call against an empty data directory seeds and persists the
    /// default categories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` or `RepositoryError::DataCorruption` if
    /// the file cannot be read or written.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let _guard = self.store.categories_file().lock().await;
        self.load_or_seed().await
    }

    /// Add a category. Names are not required to be unique.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the name is blank.
    /// Returns `RepositoryError::Io` if the file cannot be written.
    pub async fn add(&self, name: &str) -> Result<Category, RepositoryError> {
        let category = Category::new(name)?;

        let file = self.store.categories_file();
        let _guard = file.lock().await;
        let mut categories = self.load_or_seed().await?;
        categories.push(category.clone());
        file.write(&categories).await?;

        tracing::info!(id = %category.id, name = %category.name, "Category added");
        Ok(category)
    }

    /// Rename a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the name is blank.
    /// Returns `RepositoryError::NotFound` if no category has this id.
    pub async fn update(&self, id: CategoryId, name: &str) -> Result<Category, RepositoryError> {
        let name = Category::validate_name(name)?;

        let file = self.store.categories_file();
        let _guard = file.lock().await;
        let mut categories = self.load_or_seed().await?;
        let category = categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        category.name = name;
        let updated = category.clone();
        file.write(&categories).await?;

        tracing::info!(id = %updated.id, name = %updated.name, "Category renamed");
        Ok(updated)
    }

    /// Delete a category. Deleting an unknown id is a no-op.
    ///
    /// Content that refers to the category by name is left alone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the file cannot be written.
    pub async fn remove(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let file = self.store.categories_file();
        let _guard = file.lock().await;
        let mut categories = self.load_or_seed().await?;
        let before = categories.len();
        categories.retain(|c| c.id != id);

        if categories.len() < before {
            file.write(&categories).await?;
            tracing::info!(%id, "Category deleted");
        }
        Ok(())
    }

    /// Caller must hold the categories lock.
    async fn load_or_seed(&self) -> Result<Vec<Category>, RepositoryError> {
        let file = self.store.categories_file();
        if let Some(categories) = file.read().await? {
            return Ok(categories);
        }

        let defaults = Category::defaults();
        file.write(&defaults).await?;
        tracing::info!(path = %file.path().display(), "Seeded default categories");
        Ok(defaults)
    }
}

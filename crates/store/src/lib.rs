//! Flat-file persistence for Quire.
//!
//! # Data directory
//!
//! Three independent JSON documents, each rewritten wholesale on every
//! mutation:
//!
//! - `content.json` - array of content records
//! - `categories.json` - array of categories
//! - `api-config.json` - the API access-control object
//!
//! # Concurrency
//!
//! Each document has its own async mutex held across the whole
//! read-modify-write, so concurrent mutations inside one process never lose
//! updates. Writes go to a sibling `.tmp` file and are renamed into place, so
//! a reader in another process sees either the old or the new document.
//! There is no cross-process locking.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api_config;
pub mod categories;
pub mod content;
mod file;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use quire_core::ValidationError;
use thiserror::Error;

pub use api_config::{ApiConfigRepository, generate_api_key};
pub use categories::CategoryRepository;
pub use content::ContentRepository;

use file::JsonFile;

/// File name of the content collection.
pub const CONTENT_FILE: &str = "content.json";
/// File name of the category collection.
pub const CATEGORIES_FILE: &str = "categories.json";
/// File name of the API configuration document.
pub const API_CONFIG_FILE: &str = "api-config.json";

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Reading or writing a data file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A data file exists but does not decode.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The record to mutate does not exist.
    #[error("not found")]
    NotFound,

    /// The payload was rejected before anything was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Handle to a data directory.
///
/// Cheaply cloneable; every clone shares the same per-collection locks, so
/// create exactly one per process and pass clones around.
#[derive(Clone)]
pub struct DataStore {
    inner: Arc<DataStoreInner>,
}

struct DataStoreInner {
    dir: PathBuf,
    content: JsonFile,
    categories: JsonFile,
    api_config: JsonFile,
}

impl DataStore {
    /// Open a data directory. Nothing is touched on disk until first use.
    #[must_use]
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            inner: Arc::new(DataStoreInner {
                content: JsonFile::new(dir.join(CONTENT_FILE)),
                categories: JsonFile::new(dir.join(CATEGORIES_FILE)),
                api_config: JsonFile::new(dir.join(API_CONFIG_FILE)),
                dir,
            }),
        }
    }

    /// The data directory path.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    /// Create the data directory if needed and confirm it is a directory.
    ///
    /// Used by readiness checks and `quire init`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the directory cannot be created or
    /// inspected.
    pub async fn ensure_dir(&self) -> Result<(), RepositoryError> {
        tokio::fs::create_dir_all(&self.inner.dir).await?;
        let metadata = tokio::fs::metadata(&self.inner.dir).await?;
        if metadata.is_dir() {
            Ok(())
        } else {
            Err(RepositoryError::Io(std::io::Error::other(format!(
                "{} is not a directory",
                self.inner.dir.display()
            ))))
        }
    }

    pub(crate) fn content_file(&self) -> &JsonFile {
        &self.inner.content
    }

    pub(crate) fn categories_file(&self) -> &JsonFile {
        &self.inner.categories
    }

    pub(crate) fn api_config_file(&self) -> &JsonFile {
        &self.inner.api_config
    }
}

impl std::fmt::Debug for DataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStore")
            .field("dir", &self.inner.dir)
            .finish_non_exhaustive()
    }
}

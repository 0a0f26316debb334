//! Command implementations.
//!
//! Each command returns the lines it wants printed; `main` does the printing.

pub mod api_key;
pub mod categories;
pub mod content;
pub mod init;

use quire_store::RepositoryError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The data directory could not be read or written.
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) fn temp_store() -> (quire_store::DataStore, tempfile::TempDir) {
    let tmp = tempfile::TempDir::new().unwrap();
    (quire_store::DataStore::open(tmp.path().join("data")), tmp)
}

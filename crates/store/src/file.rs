//! A single JSON document on disk guarded by an async mutex.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, MutexGuard};

use crate::RepositoryError;

pub(crate) struct JsonFile {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFile {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Acquire the single-writer lock. Hold the guard across read-modify-write.
    pub(crate) async fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }

    /// Read and decode the document. A missing file is `Ok(None)`.
    pub(crate) async fn read<T: DeserializeOwned>(&self) -> Result<Option<T>, RepositoryError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            RepositoryError::DataCorruption(format!("{}: {e}", self.path.display()))
        })
    }

    /// Replace the document atomically: write a uniquely named sibling, then
    /// rename it over the target. Concurrent writers never share a temp file.
    pub(crate) async fn write<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), RepositoryError> {
        let json = serde_json::to_vec_pretty(value).map_err(|e| {
            RepositoryError::DataCorruption(format!("{}: {e}", self.path.display()))
        })?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.tmp_path();
        let written = match tokio::fs::write(&tmp, &json).await {
            Ok(()) => tokio::fs::rename(&tmp, &self.path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                tracing::debug!(path = %tmp.display(), error = %cleanup, "Temp file not removed");
            }
            return Err(e.into());
        }

        tracing::debug!(path = %self.path.display(), bytes = json.len(), "Wrote data file");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_reads_none() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = JsonFile::new(tmp.path().join("missing.json"));
        let value: Option<Vec<String>> = file.read().await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = JsonFile::new(tmp.path().join("nested").join("list.json"));
        file.write(&vec!["a", "b"]).await.unwrap();

        let value: Option<Vec<String>> = file.read().await.unwrap();
        assert_eq!(value.unwrap(), vec!["a", "b"]);
        let names: Vec<String> = std::fs::read_dir(tmp.path().join("nested"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["list.json"]);
    }

    #[tokio::test]
    async fn test_corrupt_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        std::fs::write(&path, b"{not json").unwrap();
        let file = JsonFile::new(path);

        let result: Result<Option<Vec<String>>, _> = file.read().await;
        assert!(matches!(result, Err(RepositoryError::DataCorruption(_))));
    }

    #[test]
    fn test_tmp_path_is_unique_sibling() {
        let file = JsonFile::new(PathBuf::from("/data/api-config.json"));
        let first = file.tmp_path();
        let second = file.tmp_path();

        assert_ne!(first, second);
        assert_eq!(first.parent(), Some(Path::new("/data")));
        let name = first.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("api-config.json."));
        assert!(name.ends_with(".tmp"));
        assert_eq!(file.path(), Path::new("/data/api-config.json"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_unlocked_writers_on_one_path_never_tear() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("shared.json");

        let tasks: Vec<_> = (0..64)
            .map(|i| {
                let file = JsonFile::new(path.clone());
                tokio::spawn(async move {
                    let value: Vec<u32> = (0..i).collect();
                    file.write(&value).await?;
                    file.read::<Vec<u32>>().await.map(|_| ())
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let value: Option<Vec<u32>> = JsonFile::new(path).read().await.unwrap();
        assert!(value.is_some());
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }
}

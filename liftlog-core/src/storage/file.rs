//! Blob storage backed by one JSON file per key.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::BlobStore;
use crate::error::{Result, StoreError};

/// Stores each key as `<data_dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    data_dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Returns the file path backing `key`.
    pub fn path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.data_dir.join(format!("{key}.json")))
    }
}

// Keys become file names, so only a conservative character set is accepted.
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::invalid(format!("invalid blob key '{key}'")))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key)?;
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key)?;
        fs::create_dir_all(&self.data_dir).await?;

        // Write then rename so readers never observe a partial file.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (FileBlobStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    #[test]
    fn test_store_path() {
        let (store, _temp) = test_store();
        let path = store.path("lifts").unwrap();
        assert!(path.ends_with("lifts.json"));
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let (store, _temp) = test_store();
        assert!(store.path("../lifts").is_err());
        assert!(store.path("").is_err());
        assert!(store.path("a/b").is_err());
    }

    #[tokio::test]
    async fn test_get_nonexistent_returns_none() {
        let (store, _temp) = test_store();
        assert!(store.get("lifts").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested_dir = temp_dir.path().join("nested").join("data");
        let store = FileBlobStore::new(nested_dir.clone());

        store.set("cycles", "{}").await.unwrap();

        assert!(nested_dir.join("cycles.json").exists());
        assert!(!nested_dir.join("cycles.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_overwrite_existing_value() {
        let (store, _temp) = test_store();

        store.set("logs", "{\"version\":1}").await.unwrap();
        store.set("logs", "{\"version\":2}").await.unwrap();

        let loaded = store.get("logs").await.unwrap();
        assert_eq!(loaded.as_deref(), Some("{\"version\":2}"));
    }
}

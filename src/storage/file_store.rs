//! Directory-backed key-value store, one JSON file per key

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use futures::future::{BoxFuture, FutureExt};
use tokio::fs;
use tracing::debug;

use super::KeyValueStore;
use crate::error::StoreError;

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key != "."
            && !key.contains("..")
            && !key.contains(['/', '\\'])
            && !key.contains('\0');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: String) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).await?;

        // write-then-rename so readers never see a torn file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value.as_bytes()).await?;
        fs::rename(&tmp, &path).await?;
        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, StoreError>> {
        self.read(key).boxed()
    }

    fn set<'a>(&'a self, key: &'a str, value: String) -> BoxFuture<'a, Result<(), StoreError>> {
        self.write(key, value).boxed()
    }

    fn remove<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StoreError>> {
        self.delete(key).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_round_trip_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("nested").join("data"));

        assert_eq!(store.get("focus_sessions_v1").await.unwrap(), None);
        store
            .set("focus_sessions_v1", "[]".to_string())
            .await
            .unwrap();

        let on_disk = std::fs::read_to_string(store.dir().join("focus_sessions_v1.json")).unwrap();
        assert_eq!(on_disk, "[]");
        assert_eq!(
            store.get("focus_sessions_v1").await.unwrap(),
            Some("[]".to_string())
        );
        assert!(!store.dir().join("focus_sessions_v1.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());

        store.remove("focus_timer_state_v1").await.unwrap();
        store.set("focus_timer_state_v1", "{}".to_string()).await.unwrap();
        store.remove("focus_timer_state_v1").await.unwrap();
        assert_eq!(store.get("focus_timer_state_v1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());

        for key in ["", "../escape", "a/b", "a\\b", "."] {
            assert!(
                matches!(store.get(key).await, Err(StoreError::InvalidKey(_))),
                "key {:?} should be rejected",
                key
            );
        }
    }
}

use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult, StoreOptions, StoredObject};
use crate::{path_style_url, StorageBackend};
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Objects live under `{base_path}/{bucket}/{key}` and are expected to be
/// served as `{base_url}/{bucket}/{key}`. Cache hints are not persisted.
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
    bucket: String,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/puzzles/storage")
    /// * `bucket` - Bucket directory created under `base_path`
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/storage")
    pub async fn new(
        base_path: impl Into<PathBuf>,
        bucket: impl Into<String>,
        base_url: impl Into<String>,
    ) -> StorageResult<Self> {
        let bucket = bucket.into();
        let root = base_path.into().join(&bucket);

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            root,
            bucket,
            base_url: base_url.into(),
        })
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// `validate_key` rules out `..` and absolute keys, so the joined path
    /// stays under the bucket directory.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store(
        &self,
        key: &str,
        data: Bytes,
        options: &StoreOptions,
    ) -> StorageResult<StoredObject> {
        let path = self.key_to_path(key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = Instant::now();

        let mut open_options = fs::OpenOptions::new();
        open_options.write(true);
        if options.upsert {
            open_options.create(true).truncate(true);
        } else {
            open_options.create_new(true);
        }

        let mut file = open_options.open(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                tracing::warn!(
                    path = %path.display(),
                    key = %key,
                    "Local storage upload rejected, key already exists"
                );
                StorageError::AlreadyExists(key.to_string())
            } else {
                StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            }
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(StoredObject {
            path: key.to_string(),
        })
    }

    fn public_url(&self, key: &str) -> String {
        path_style_url(&self.base_url, &self.bucket, key)
    }

    async fn delete(&self, keys: &[String]) -> StorageResult<()> {
        let paths = keys
            .iter()
            .map(|key| self.key_to_path(key))
            .collect::<StorageResult<Vec<_>>>()?;

        let start = Instant::now();

        for (key, path) in keys.iter().zip(paths) {
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(StorageError::DeleteFailed(format!(
                        "Failed to delete file {}: {}",
                        path.display(),
                        e
                    )));
                }
            }

            tracing::info!(
                path = %path.display(),
                key = %key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Local storage delete successful"
            );
        }

        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage(dir: &Path) -> LocalStorage {
        LocalStorage::new(dir, "puzzle-images", "http://localhost:3000/storage")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_local_storage_store_writes_file() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let stored = storage
            .store(
                "user-42/1-a.png",
                Bytes::from_static(b"test data"),
                &StoreOptions::immutable(3600),
            )
            .await
            .unwrap();

        assert_eq!(stored.path, "user-42/1-a.png");
        let on_disk = std::fs::read(dir.path().join("puzzle-images/user-42/1-a.png")).unwrap();
        assert_eq!(on_disk, b"test data");
        assert_eq!(
            storage.public_url(&stored.path),
            "http://localhost:3000/storage/puzzle-images/user-42/1-a.png"
        );
    }

    #[tokio::test]
    async fn test_local_storage_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;
        let options = StoreOptions::immutable(3600);

        storage
            .store("u/1-a.png", Bytes::from_static(b"first"), &options)
            .await
            .unwrap();
        let result = storage
            .store("u/1-a.png", Bytes::from_static(b"second"), &options)
            .await;
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));

        let on_disk = std::fs::read(dir.path().join("puzzle-images/u/1-a.png")).unwrap();
        assert_eq!(on_disk, b"first");
    }

    #[tokio::test]
    async fn test_local_storage_upsert_replaces() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;
        let options = StoreOptions {
            upsert: true,
            ..StoreOptions::default()
        };

        storage
            .store("u/1-a.png", Bytes::from_static(b"first, longer"), &options)
            .await
            .unwrap();
        storage
            .store("u/1-a.png", Bytes::from_static(b"second"), &options)
            .await
            .unwrap();

        let on_disk = std::fs::read(dir.path().join("puzzle-images/u/1-a.png")).unwrap();
        assert_eq!(on_disk, b"second");
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let result = storage
            .store("../../../etc/passwd", Bytes::new(), &StoreOptions::default())
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete(&["../etc/passwd".to_string()]).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_local_storage_delete_nonexistent() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let result = storage.delete(&["nonexistent/file.png".to_string()]).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_local_storage_exists_and_delete() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        storage
            .store("u/1-a.png", Bytes::from_static(b"x"), &StoreOptions::default())
            .await
            .unwrap();
        assert!(storage.exists("u/1-a.png").await.unwrap());
        assert!(!storage.exists("u/2-b.png").await.unwrap());

        storage.delete(&["u/1-a.png".to_string()]).await.unwrap();
        assert!(!storage.exists("u/1-a.png").await.unwrap());
    }
}

//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Options for a single `store` call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreOptions {
    /// `Cache-Control` value attached to the object, when the backend supports it.
    pub cache_control: Option<String>,
    pub content_type: Option<String>,
    /// Replace an existing object under the same key. When `false` a collision
    /// fails with [`StorageError::AlreadyExists`].
    pub upsert: bool,
}

impl StoreOptions {
    /// Options for content that never changes once written: cacheable for
    /// `max_age_secs` and never overwritten.
    pub fn immutable(max_age_secs: u64) -> Self {
        Self {
            cache_control: Some(format!("max-age={}", max_age_secs)),
            content_type: None,
            upsert: false,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Where a stored object landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Key of the object inside the bucket.
    pub path: String,
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem, memory) implement this trait,
/// so the image manager works with any of them and tests can substitute a
/// fake.
///
/// **Key format:** see the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `key` and return where it was written.
    async fn store(
        &self,
        key: &str,
        data: Bytes,
        options: &StoreOptions,
    ) -> StorageResult<StoredObject>;

    /// Resolve the public URL for a key. Does not check that the object exists.
    fn public_url(&self, key: &str) -> String;

    /// Delete every object in `keys`. Absent keys are not an error.
    async fn delete(&self, keys: &[String]) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Name of the bucket objects are stored in.
    fn bucket(&self) -> &str;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use puzzle_storage::{
    MemoryStorage, Storage, StorageBackend, StorageError, StorageResult, StoreOptions,
    StoredObject,
};
use tokio::sync::Mutex;

/// In-memory bucket that records calls and can be told to fail.
pub struct RecordingStorage {
    inner: MemoryStorage,
    store_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    fail_store: AtomicBool,
    fail_delete: AtomicBool,
    last_options: Mutex<Option<StoreOptions>>,
}

impl RecordingStorage {
    pub fn new(bucket: &str, base_url: &str) -> Self {
        Self {
            inner: MemoryStorage::new(bucket, base_url),
            store_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            fail_store: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            last_options: Mutex::new(None),
        }
    }

    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn fail_stores(&self, fail: bool) {
        self.fail_store.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub async fn last_options(&self) -> Option<StoreOptions> {
        self.last_options.lock().await.clone()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn store(
        &self,
        key: &str,
        data: Bytes,
        options: &StoreOptions,
    ) -> StorageResult<StoredObject> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_options.lock().await = Some(options.clone());
        if self.fail_store.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("quota exceeded".to_string()));
        }
        self.inner.store(key, data, options).await
    }

    fn public_url(&self, key: &str) -> String {
        self.inner.public_url(key)
    }

    async fn delete(&self, keys: &[String]) -> StorageResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed("permission denied".to_string()));
        }
        self.inner.delete(keys).await
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.inner.exists(key).await
    }

    fn bucket(&self) -> &str {
        self.inner.bucket()
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

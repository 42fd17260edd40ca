use crate::object::{delete_objects, object_exists, put_object};
use crate::traits::{Storage, StorageResult, StoreOptions, StoredObject};
use crate::{path_style_url, StorageBackend};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::memory::InMemory;
use std::sync::Arc;

/// In-process bucket backed by `object_store`'s `InMemory` store.
///
/// Clones share the same objects. Nothing survives the process; public URLs
/// are formed like the other backends but nothing serves them.
#[derive(Clone)]
pub struct MemoryStorage {
    store: Arc<InMemory>,
    bucket: String,
    base_url: String,
}

impl MemoryStorage {
    pub fn new(bucket: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            store: Arc::new(InMemory::new()),
            bucket: bucket.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn store(
        &self,
        key: &str,
        data: Bytes,
        options: &StoreOptions,
    ) -> StorageResult<StoredObject> {
        put_object(self.store.as_ref(), &self.bucket, key, data, options).await
    }

    fn public_url(&self, key: &str) -> String {
        path_style_url(&self.base_url, &self.bucket, key)
    }

    async fn delete(&self, keys: &[String]) -> StorageResult<()> {
        delete_objects(self.store.as_ref(), &self.bucket, keys).await
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        object_exists(self.store.as_ref(), key).await
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

use crate::object::{delete_objects, object_exists, put_object};
use crate::traits::{Storage, StorageError, StorageResult, StoreOptions, StoredObject};
use crate::{path_style_url, StorageBackend};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    base_url: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `public_base_url` - Optional base for public URLs, when objects are
    ///   served from somewhere other than the API endpoint (a CDN, or a
    ///   provider's public object route)
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_base_url: Option<String>,
    ) -> StorageResult<Self> {
        // Credentials come from the environment (AWS_ACCESS_KEY_ID, ...).
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        let base_url = public_base_url
            .or(endpoint_url)
            .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", region));

        Ok(S3Storage {
            store,
            bucket,
            base_url,
        })
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn store(
        &self,
        key: &str,
        data: Bytes,
        options: &StoreOptions,
    ) -> StorageResult<StoredObject> {
        put_object(&self.store, &self.bucket, key, data, options).await
    }

    fn public_url(&self, key: &str) -> String {
        path_style_url(&self.base_url, &self.bucket, key)
    }

    async fn delete(&self, keys: &[String]) -> StorageResult<()> {
        delete_objects(&self.store, &self.bucket, keys).await
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        object_exists(&self.store, key).await
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_defaults_to_regional_endpoint() {
        let storage = S3Storage::new(
            "puzzle-images".to_string(),
            "eu-west-1".to_string(),
            None,
            None,
        )
        .unwrap();

        assert_eq!(
            storage.public_url("user-42/1-a.png"),
            "https://s3.eu-west-1.amazonaws.com/puzzle-images/user-42/1-a.png"
        );
        assert_eq!(storage.bucket(), "puzzle-images");
        assert_eq!(storage.backend_type(), StorageBackend::S3);
    }

    #[test]
    fn public_url_prefers_public_base() {
        let storage = S3Storage::new(
            "puzzle-images".to_string(),
            "local".to_string(),
            Some("http://localhost:9000".to_string()),
            Some("https://cdn.example.com/public/".to_string()),
        )
        .unwrap();

        assert_eq!(
            storage.public_url("u/1-a.png"),
            "https://cdn.example.com/public/puzzle-images/u/1-a.png"
        );
    }

    #[test]
    fn public_url_uses_custom_endpoint() {
        let storage = S3Storage::new(
            "puzzle-images".to_string(),
            "local".to_string(),
            Some("http://localhost:9000/".to_string()),
            None,
        )
        .unwrap();

        assert_eq!(
            storage.public_url("u/1-a.png"),
            "http://localhost:9000/puzzle-images/u/1-a.png"
        );
    }
}

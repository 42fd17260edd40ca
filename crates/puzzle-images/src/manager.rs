//! Image lifecycle manager: validate, upload, remove.

use std::sync::Arc;
use std::time::Instant;

use puzzle_core::{CandidateFile, Config, ImageReference, ValidationResult};
use puzzle_storage::{mint_storage_key, Storage, StorageError, StoreOptions};

use crate::error::ImageError;
use crate::validator::ImageValidator;

/// Validates, uploads and removes puzzle images against a shared [`Storage`].
///
/// Holds no per-upload state, so one manager can serve any number of
/// concurrent callers. There are no retries or timeouts here; a failed store
/// call is reported straight back.
#[derive(Clone)]
pub struct ImageManager {
    storage: Arc<dyn Storage>,
    validator: ImageValidator,
    cache_max_age_secs: u64,
}

impl ImageManager {
    pub fn new(
        storage: Arc<dyn Storage>,
        validator: ImageValidator,
        cache_max_age_secs: u64,
    ) -> Self {
        Self {
            storage,
            validator,
            cache_max_age_secs,
        }
    }

    pub fn from_config(storage: Arc<dyn Storage>, config: &Config) -> Self {
        Self::new(
            storage,
            ImageValidator::from_config(config),
            config.cache_max_age_secs,
        )
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Validate a candidate file without touching storage.
    pub fn validate(&self, file: Option<&CandidateFile>) -> ValidationResult {
        self.validator.validate(file)
    }

    /// Upload `file` on behalf of `owner_id`.
    ///
    /// Invalid files fail with [`ImageError::Validation`] before any storage
    /// call. The object is written under a fresh key and never replaces an
    /// existing one.
    #[tracing::instrument(
        skip(self, file),
        fields(
            owner_id = %owner_id,
            file_name = %file.name,
            size_bytes = file.size,
            operation = "upload_image"
        )
    )]
    pub async fn upload(
        &self,
        file: &CandidateFile,
        owner_id: &str,
    ) -> Result<ImageReference, ImageError> {
        if let Err(e) = self.validator.check(Some(file)) {
            tracing::debug!(reason = %e, "Image rejected by validation");
            return Err(e.into());
        }

        let key = mint_storage_key(owner_id, &file.name).map_err(|e| match e {
            StorageError::InvalidKey(reason) => ImageError::Validation(reason),
            other => ImageError::Store(other),
        })?;

        let options = StoreOptions::immutable(self.cache_max_age_secs)
            .with_content_type(file.content_type.clone());

        let start = Instant::now();
        let stored = self
            .storage
            .store(&key, file.data.clone(), &options)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.storage.bucket(),
                    key = %key,
                    "Image upload failed"
                );
                ImageError::Store(e)
            })?;

        let public_url = self.storage.public_url(&stored.path);

        tracing::info!(
            bucket = %self.storage.bucket(),
            key = %stored.path,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image uploaded"
        );

        Ok(ImageReference::new(stored.path, public_url))
    }

    /// Remove the object behind `reference`, using the key it carries.
    #[tracing::instrument(skip(self), fields(key = %reference.key, operation = "remove_image"))]
    pub async fn remove(&self, reference: &ImageReference) -> Result<(), ImageError> {
        self.remove_key(&reference.key).await
    }

    /// Remove an image known only by its public URL.
    ///
    /// The key is recovered from the path segment after the bucket name; URLs
    /// that do not contain it fail with [`ImageError::ReferenceParse`] without
    /// a storage call.
    #[tracing::instrument(skip(self), fields(operation = "remove_image_url"))]
    pub async fn remove_url(&self, url: &str) -> Result<(), ImageError> {
        let reference = self.reference_for_url(url)?;
        self.remove_key(&reference.key).await
    }

    /// Rebuild the reference for a public URL of this manager's bucket.
    pub fn reference_for_url(&self, url: &str) -> Result<ImageReference, ImageError> {
        ImageReference::from_public_url(url, self.storage.bucket()).ok_or_else(|| {
            tracing::warn!(
                url = %url,
                bucket = %self.storage.bucket(),
                "Image URL does not point into bucket"
            );
            ImageError::ReferenceParse(url.to_string())
        })
    }

    async fn remove_key(&self, key: &str) -> Result<(), ImageError> {
        let start = Instant::now();

        match self.storage.delete(&[key.to_string()]).await {
            Ok(()) => {
                tracing::info!(
                    bucket = %self.storage.bucket(),
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Image removed"
                );
                Ok(())
            }
            Err(StorageError::InvalidKey(reason)) => {
                tracing::warn!(key = %key, reason = %reason, "Refusing to remove invalid key");
                Err(ImageError::ReferenceParse(key.to_string()))
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.storage.bucket(),
                    key = %key,
                    "Image removal failed"
                );
                Err(ImageError::Delete(e))
            }
        }
    }
}

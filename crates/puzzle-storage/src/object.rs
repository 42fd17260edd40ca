//! Operations shared by the backends built on the `object_store` crate.

use crate::keys::validate_key;
use crate::traits::{StorageError, StorageResult, StoreOptions, StoredObject};
use bytes::Bytes;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutMode, PutOptions, PutPayload,
};
use std::time::Instant;

fn put_options(options: &StoreOptions) -> PutOptions {
    let mode = if options.upsert {
        PutMode::Overwrite
    } else {
        PutMode::Create
    };

    let mut attributes = Attributes::new();
    if let Some(ref cache_control) = options.cache_control {
        attributes.insert(Attribute::CacheControl, cache_control.clone().into());
    }
    if let Some(ref content_type) = options.content_type {
        attributes.insert(Attribute::ContentType, content_type.clone().into());
    }

    let mut put_options = PutOptions::from(mode);
    put_options.attributes = attributes;
    put_options
}

pub(crate) async fn put_object<S: ObjectStore>(
    store: &S,
    bucket: &str,
    key: &str,
    data: Bytes,
    options: &StoreOptions,
) -> StorageResult<StoredObject> {
    validate_key(key)?;

    let size = data.len() as u64;
    let location = Path::from(key);
    let start = Instant::now();

    match store
        .put_opts(&location, PutPayload::from(data), put_options(options))
        .await
    {
        Ok(_) => {
            tracing::info!(
                bucket = %bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Object store upload successful"
            );
            Ok(StoredObject {
                path: key.to_string(),
            })
        }
        Err(ObjectStoreError::AlreadyExists { .. }) => {
            tracing::warn!(
                bucket = %bucket,
                key = %key,
                "Object store upload rejected, key already exists"
            );
            Err(StorageError::AlreadyExists(key.to_string()))
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                bucket = %bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Object store upload failed"
            );
            Err(StorageError::UploadFailed(e.to_string()))
        }
    }
}

pub(crate) async fn delete_objects<S: ObjectStore>(
    store: &S,
    bucket: &str,
    keys: &[String],
) -> StorageResult<()> {
    for key in keys {
        validate_key(key)?;
    }

    let start = Instant::now();
    for key in keys {
        let location = Path::from(key.as_str());
        match store.delete(&location).await {
            Ok(()) | Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object store delete failed"
                );
                return Err(StorageError::DeleteFailed(e.to_string()));
            }
        }
    }

    tracing::info!(
        bucket = %bucket,
        keys = keys.len(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Object store delete successful"
    );

    Ok(())
}

pub(crate) async fn object_exists<S: ObjectStore>(store: &S, key: &str) -> StorageResult<bool> {
    validate_key(key)?;
    let location = Path::from(key);
    match store.head(&location).await {
        Ok(_) => Ok(true),
        Err(ObjectStoreError::NotFound { .. }) => Ok(false),
        Err(e) => Err(StorageError::BackendError(e.to_string())),
    }
}

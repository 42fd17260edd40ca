//! Puzzle Storage Library
//!
//! This crate provides the object-store boundary used by the puzzle image
//! manager: the `Storage` trait and implementations for S3-compatible buckets,
//! a local directory and an in-process memory bucket.
//!
//! # Storage key format
//!
//! Keys are owner-scoped: `{owner_id}/{epoch_millis}-{base36_suffix}.{ext}`.
//! Keys must not contain `..`, empty segments or a leading `/`. Key generation
//! and checking live in the `keys` module so all backends stay consistent.
//!
//! # Public URL format
//!
//! Every backend publishes objects path-style, `{base_url}/{bucket}/{key}`,
//! so the bucket name always appears as a whole path segment.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-memory")]
pub mod memory;
#[cfg(any(feature = "storage-s3", feature = "storage-memory"))]
mod object;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{mint_storage_key, storage_key_from_parts};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-memory")]
pub use memory::MemoryStorage;
pub use puzzle_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult, StoreOptions, StoredObject};

/// Build the public URL of `key` inside `bucket`, path-style.
///
/// Each key segment is percent-encoded.
pub fn path_style_url(base_url: &str, bucket: &str, key: &str) -> String {
    let encoded_key = key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/{}/{}", base_url.trim_end_matches('/'), bucket, encoded_key)
}

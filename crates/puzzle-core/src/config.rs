//! Configuration module
//!
//! Storage and image settings read from the environment (and a `.env` file
//! when present).

use std::env;

use crate::constants::{
    ALLOWED_IMAGE_CONTENT_TYPES, DEFAULT_BUCKET, DEFAULT_CACHE_MAX_AGE_SECS, MAX_IMAGE_SIZE_BYTES,
};
use crate::storage_types::StorageBackend;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub bucket: String,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, Supabase, etc.)
    pub aws_region: Option<String>,
    pub public_base_url: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Image rules
    pub max_image_size_bytes: u64,
    pub allowed_content_types: Vec<String>,
    pub cache_max_age_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::S3,
        };

        let max_image_size_bytes = match env::var("MAX_IMAGE_SIZE_BYTES") {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("MAX_IMAGE_SIZE_BYTES must be a valid number"))?,
            Err(_) => MAX_IMAGE_SIZE_BYTES,
        };

        let allowed_content_types = match env::var("ALLOWED_IMAGE_CONTENT_TYPES") {
            Ok(value) => value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => default_content_types(),
        };

        let cache_max_age_secs = env::var("IMAGE_CACHE_CONTROL_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_CACHE_MAX_AGE_SECS);

        let config = Config {
            storage_backend,
            bucket: env::var("STORAGE_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.to_string()),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            public_base_url: env::var("STORAGE_PUBLIC_BASE_URL").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            max_image_size_bytes,
            allowed_content_types,
            cache_max_age_secs,
        };

        config.validate()?;
        Ok(config)
    }

    /// In-memory configuration with default image rules. Does not read the
    /// environment.
    pub fn for_memory(bucket: impl Into<String>, base_url: impl Into<String>) -> Self {
        Config {
            storage_backend: StorageBackend::Memory,
            bucket: bucket.into(),
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            public_base_url: Some(base_url.into()),
            local_storage_path: None,
            local_storage_base_url: None,
            max_image_size_bytes: MAX_IMAGE_SIZE_BYTES,
            allowed_content_types: default_content_types(),
            cache_max_age_secs: DEFAULT_CACHE_MAX_AGE_SECS,
        }
    }

    /// S3 region, falling back to `AWS_REGION`.
    pub fn region(&self) -> Option<&str> {
        self.s3_region.as_deref().or(self.aws_region.as_deref())
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.bucket.trim().is_empty() {
            return Err(anyhow::anyhow!("STORAGE_BUCKET must not be empty"));
        }

        if self.bucket.contains('/') {
            return Err(anyhow::anyhow!("STORAGE_BUCKET must not contain '/'"));
        }

        if self.max_image_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_IMAGE_SIZE_BYTES must be greater than zero"
            ));
        }

        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_IMAGE_CONTENT_TYPES must list at least one content type"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.region().is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
            StorageBackend::Memory => {}
        }

        Ok(())
    }
}

fn default_content_types() -> Vec<String> {
    ALLOWED_IMAGE_CONTENT_TYPES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

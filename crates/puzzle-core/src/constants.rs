//! Fixed limits and defaults for puzzle images.

/// Largest accepted image, in bytes (5 MiB). Inclusive.
pub const MAX_IMAGE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Accepted declared media types.
pub const ALLOWED_IMAGE_CONTENT_TYPES: &[&str] =
    &["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Bucket holding uploaded puzzle images.
pub const DEFAULT_BUCKET: &str = "puzzle-images";

/// Cache lifetime hinted to the object store for uploaded images.
pub const DEFAULT_CACHE_MAX_AGE_SECS: u64 = 3600;

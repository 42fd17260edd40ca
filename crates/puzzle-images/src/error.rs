use puzzle_core::{ErrorMetadata, LogLevel};
use puzzle_storage::StorageError;

use crate::validator::ValidationError;

/// Failures of the image lifecycle operations.
///
/// None of these are fatal: a failed upload leaves the caller without a new
/// reference, and a failed removal leaves the object (and the caller's
/// reference to it) in place.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// The file was rejected before any storage call was made.
    #[error("Invalid image: {0}")]
    Validation(String),

    #[error("Image upload failed: {0}")]
    Store(#[source] StorageError),

    /// The reference does not point into our bucket. No storage call was made.
    #[error("Unrecognized image reference: {0}")]
    ReferenceParse(String),

    #[error("Image delete failed: {0}")]
    Delete(#[source] StorageError),
}

impl From<ValidationError> for ImageError {
    fn from(err: ValidationError) -> Self {
        ImageError::Validation(err.to_string())
    }
}

impl ErrorMetadata for ImageError {
    fn error_code(&self) -> &'static str {
        match self {
            ImageError::Validation(_) => "VALIDATION_ERROR",
            ImageError::Store(StorageError::AlreadyExists(_)) => "STORAGE_KEY_CONFLICT",
            ImageError::Store(_) => "STORE_ERROR",
            ImageError::ReferenceParse(_) => "REFERENCE_PARSE_ERROR",
            ImageError::Delete(_) => "DELETE_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            ImageError::Validation(_) | ImageError::ReferenceParse(_) => false,
            ImageError::Store(StorageError::ConfigError(_))
            | ImageError::Delete(StorageError::ConfigError(_)) => false,
            ImageError::Store(_) | ImageError::Delete(_) => true,
        }
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            ImageError::Validation(_) => {
                Some("Choose a JPEG, PNG or WebP image within the size limit")
            }
            ImageError::Store(_) => Some("Try uploading the image again"),
            ImageError::ReferenceParse(_) => Some("Check that the image belongs to this bucket"),
            ImageError::Delete(_) => Some("Keep the image reference and retry later"),
        }
    }

    fn client_message(&self) -> String {
        match self {
            ImageError::Validation(reason) => reason.clone(),
            ImageError::Store(_) => "There was an error uploading your image".to_string(),
            ImageError::ReferenceParse(_) => "Invalid image URL".to_string(),
            ImageError::Delete(_) => "Could not delete the image".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            ImageError::Validation(_) => LogLevel::Debug,
            ImageError::ReferenceParse(_) => LogLevel::Warn,
            ImageError::Store(_) | ImageError::Delete(_) => LogLevel::Error,
        }
    }
}

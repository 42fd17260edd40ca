//! Image models: the candidate file handed in by a caller, the outcome of
//! validating it, and the durable reference returned after upload.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A user-supplied image awaiting validation and upload.
///
/// `size` is the length the caller declared for the file. It normally equals
/// `data.len()`, but validation is done against the declared value so a
/// caller can reject a file before reading its body.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub content_type: String,
    pub size: u64,
    pub data: Bytes,
}

impl CandidateFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size: data.len() as u64,
            data,
        }
    }

    /// Override the declared size.
    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }
}

/// Outcome of validating a [`CandidateFile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid { reason: String },
}

impl ValidationResult {
    pub fn invalid(reason: impl Into<String>) -> Self {
        ValidationResult::Invalid {
            reason: reason.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// The human-readable reason, if the file was rejected.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid { reason } => Some(reason),
        }
    }
}

/// Durable reference to an uploaded image.
///
/// Owners persist the whole pair: `public_url` for display and `key` for
/// deletion, so the key never has to be recovered from the URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageReference {
    pub key: String,
    pub public_url: String,
}

impl ImageReference {
    pub fn new(key: impl Into<String>, public_url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            public_url: public_url.into(),
        }
    }

    /// Rebuild a reference from a bare public URL.
    ///
    /// The key is everything in the URL path after the first `/{bucket}/`
    /// segment, percent-decoded. Query strings and fragments are ignored.
    /// Returns `None` for URLs that do not follow that layout.
    pub fn from_public_url(url: &str, bucket: &str) -> Option<Self> {
        if bucket.is_empty() {
            return None;
        }

        let (_, rest) = url.split_once("://")?;
        let path_start = rest.find('/')?;
        let path = &rest[path_start..];
        let path = path.split(['?', '#']).next().unwrap_or_default();

        let marker = format!("/{}/", bucket);
        let (_, encoded_key) = path.split_once(marker.as_str())?;
        if encoded_key.is_empty() {
            return None;
        }

        let key = urlencoding::decode(encoded_key).ok()?.into_owned();
        Some(Self::new(key, url))
    }
}

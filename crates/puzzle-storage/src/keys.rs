//! Shared key generation and checking for storage backends.
//!
//! Key format: `{owner_id}/{epoch_millis}-{base36_suffix}.{ext}`. The
//! millisecond timestamp plus the random suffix keep sequential uploads from
//! the same owner apart; collisions are possible in principle but are caught
//! by the store because uploads never overwrite.

use crate::{StorageError, StorageResult};
use chrono::Utc;
use rand::Rng;

/// Length of the random base36 part of a key.
pub const SUFFIX_LEN: usize = 8;

const BASE36_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Mint a fresh storage key for an upload by `owner_id` of a file originally
/// named `original_name`.
pub fn mint_storage_key(owner_id: &str, original_name: &str) -> StorageResult<String> {
    let millis = Utc::now().timestamp_millis();
    let suffix = random_base36_suffix(SUFFIX_LEN);
    storage_key_from_parts(owner_id, millis, &suffix, original_name)
}

/// Deterministic core of [`mint_storage_key`].
///
/// Files without a usable extension get a key without one (and without a
/// trailing dot).
pub fn storage_key_from_parts(
    owner_id: &str,
    epoch_millis: i64,
    suffix: &str,
    original_name: &str,
) -> StorageResult<String> {
    let owner_id = owner_id.trim();
    if owner_id.is_empty() {
        return Err(StorageError::InvalidKey(
            "Owner id must not be empty".to_string(),
        ));
    }
    if !owner_id.chars().all(is_owner_char) {
        return Err(StorageError::InvalidKey(format!(
            "Owner id may only contain ASCII letters, digits, '_' and '-': {}",
            owner_id
        )));
    }

    let key = match file_extension(original_name) {
        Some(ext) => format!("{}/{}-{}.{}", owner_id, epoch_millis, suffix, ext),
        None => format!("{}/{}-{}", owner_id, epoch_millis, suffix),
    };
    validate_key(&key)?;
    Ok(key)
}

/// Owner ids become the first key segment verbatim, and every character
/// here is left alone by both object paths and URL encoding.
fn is_owner_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Extension of `name`: the text after its last `.`, lowercased.
///
/// Returns `None` when there is no dot, nothing after it, or the text after it
/// is not plain ASCII alphanumerics.
pub fn file_extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Random lowercase base36 string of `len` characters.
pub fn random_base36_suffix(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| BASE36_ALPHABET[rng.random_range(0..BASE36_ALPHABET.len())] as char)
        .collect()
}

/// Reject keys that could escape the bucket or address a "directory".
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key must be relative: {}",
            key
        )));
    }
    if key.contains("..") || key.split('/').any(str::is_empty) {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains invalid segments: {}",
            key
        )));
    }
    Ok(())
}

//! Test helpers shared by the image integration tests.
//!
//! Run from workspace root: `cargo test -p puzzle-images`.
#![allow(dead_code)]

pub mod fixtures;
pub mod storage;

use std::sync::Arc;

use puzzle_images::{ImageManager, ImageValidator};
use storage::RecordingStorage;

pub const BUCKET: &str = "puzzle-images";
pub const BASE_URL: &str = "http://localhost:3000/storage";

/// Manager over a recording in-memory bucket, with default image rules.
pub fn setup_manager() -> (ImageManager, Arc<RecordingStorage>) {
    let storage = Arc::new(RecordingStorage::new(BUCKET, BASE_URL));
    let manager = ImageManager::new(storage.clone(), ImageValidator::default(), 3600);
    (manager, storage)
}

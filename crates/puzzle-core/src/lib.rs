//! Puzzle Core Library
//!
//! This crate provides the domain models, error metadata, constants and
//! configuration shared by the puzzle image crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{ErrorMetadata, LogLevel};
pub use models::{CandidateFile, ImageReference, ValidationResult};
pub use storage_types::StorageBackend;

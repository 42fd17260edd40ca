//! Puzzle image lifecycle
//!
//! Validates candidate images, uploads them under freshly minted keys, hands
//! back a durable [`ImageReference`] and removes the object again on request.
//! The manager keeps no state between calls; every upload and removal is an
//! independent unit of work against the injected [`Storage`].
//!
//! [`Storage`]: puzzle_storage::Storage

pub mod error;
pub mod manager;
pub mod slot;
pub mod validator;

pub use error::ImageError;
pub use manager::ImageManager;
pub use puzzle_core::{CandidateFile, ImageReference, ValidationResult};
pub use slot::ImageSlot;
pub use validator::{ImageValidator, ValidationError};

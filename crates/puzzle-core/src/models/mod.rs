pub mod image;

pub use image::{CandidateFile, ImageReference, ValidationResult};

use puzzle_core::constants::{ALLOWED_IMAGE_CONTENT_TYPES, MAX_IMAGE_SIZE_BYTES};
use puzzle_core::{CandidateFile, Config, ValidationResult};

const MIB: u64 = 1024 * 1024;

/// Reasons a candidate image is rejected, in the order they are checked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("No file provided")]
    MissingFile,

    #[error("Invalid file type. Please upload a {allowed} image.")]
    InvalidContentType {
        content_type: String,
        allowed: String,
    },

    #[error("File size must not exceed {limit}")]
    FileTooLarge { size: u64, max: u64, limit: String },
}

/// Image file validator
///
/// Pure checks on what the caller declared about a file: presence, media
/// type, then size. The first failing check wins.
#[derive(Debug, Clone)]
pub struct ImageValidator {
    max_file_size: u64,
    allowed_content_types: Vec<String>,
}

impl Default for ImageValidator {
    fn default() -> Self {
        Self::new(
            MAX_IMAGE_SIZE_BYTES,
            ALLOWED_IMAGE_CONTENT_TYPES.iter().map(|s| s.to_string()),
        )
    }
}

impl ImageValidator {
    pub fn new(
        max_file_size: u64,
        allowed_content_types: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            max_file_size,
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|ct| ct.trim().to_string())
                .collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_image_size_bytes,
            config.allowed_content_types.iter().cloned(),
        )
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Validate a candidate file.
    pub fn validate(&self, file: Option<&CandidateFile>) -> ValidationResult {
        match self.check(file) {
            Ok(()) => ValidationResult::Valid,
            Err(e) => ValidationResult::invalid(e.to_string()),
        }
    }

    /// Same checks as [`validate`](Self::validate), with a typed reason.
    pub fn check(&self, file: Option<&CandidateFile>) -> Result<(), ValidationError> {
        let file = file.ok_or(ValidationError::MissingFile)?;
        self.validate_content_type(&file.content_type)?;
        self.validate_file_size(file.size)?;
        Ok(())
    }

    /// Validate content type
    ///
    /// The declared type must equal one of the allowed literals exactly; no
    /// case folding, trimming or parameter stripping.
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == content_type)
        {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: describe_content_types(&self.allowed_content_types),
            });
        }

        Ok(())
    }

    /// Validate file size
    ///
    /// The ceiling itself is accepted; empty files are too.
    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
                limit: describe_size(self.max_file_size),
            });
        }

        Ok(())
    }
}

/// "JPEG, PNG, or WebP" style list of the accepted formats.
fn describe_content_types(content_types: &[String]) -> String {
    let mut labels: Vec<String> = Vec::new();
    for content_type in content_types {
        let subtype = content_type
            .split_once('/')
            .map(|(_, subtype)| subtype)
            .unwrap_or(content_type);
        let label = match subtype {
            "jpeg" | "jpg" => "JPEG".to_string(),
            "webp" => "WebP".to_string(),
            other => other.to_uppercase(),
        };
        if !labels.contains(&label) {
            labels.push(label);
        }
    }

    match labels.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} or {}", first, second),
        [rest @ .., last] => format!("{}, or {}", rest.join(", "), last),
    }
}

fn describe_size(bytes: u64) -> String {
    if bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(content_type: &str, size: u64) -> CandidateFile {
        CandidateFile::new("board.png", content_type, Vec::new()).with_declared_size(size)
    }

    #[test]
    fn test_missing_file() {
        let validator = ImageValidator::default();
        assert_eq!(
            validator.validate(None),
            ValidationResult::invalid("No file provided")
        );
    }

    #[test]
    fn test_allowed_types_accepted() {
        let validator = ImageValidator::default();
        for content_type in ["image/jpeg", "image/jpg", "image/png", "image/webp"] {
            assert!(validator.validate(Some(&file(content_type, 1024))).is_valid());
        }
    }

    #[test]
    fn test_content_type_must_match_exactly() {
        let validator = ImageValidator::default();
        for content_type in [
            "IMAGE/PNG",
            "image/png; charset=binary",
            " image/webp ",
            "Image/Jpeg",
        ] {
            assert!(
                !validator.validate(Some(&file(content_type, 10))).is_valid(),
                "{content_type:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_disallowed_type_rejected() {
        let validator = ImageValidator::default();
        let result = validator.validate(Some(&file("text/plain", 10)));
        assert_eq!(
            result.reason(),
            Some("Invalid file type. Please upload a JPEG, PNG, or WebP image.")
        );

        assert!(!validator.validate(Some(&file("image/gif", 10))).is_valid());
        assert!(!validator.validate(Some(&file("", 10))).is_valid());
    }

    #[test]
    fn test_size_boundary_is_inclusive() {
        let validator = ImageValidator::default();
        assert!(validator
            .validate(Some(&file("image/png", 5_242_880)))
            .is_valid());

        let result = validator.validate(Some(&file("image/png", 5_242_881)));
        assert_eq!(result.reason(), Some("File size must not exceed 5MB"));
    }

    #[test]
    fn test_empty_file_is_valid() {
        let validator = ImageValidator::default();
        assert!(validator.validate(Some(&file("image/jpeg", 0))).is_valid());
    }

    #[test]
    fn test_type_checked_before_size() {
        let validator = ImageValidator::default();
        let result = validator.check(Some(&file("text/plain", 10 * MIB)));
        assert!(matches!(
            result,
            Err(ValidationError::InvalidContentType { .. })
        ));
    }

    #[test]
    fn test_scenario_sizes() {
        let validator = ImageValidator::default();
        assert!(validator
            .validate(Some(&file("image/png", 4 * 1000 * 1000)))
            .is_valid());
        assert!(matches!(
            validator.check(Some(&file("image/jpeg", 6 * 1000 * 1000))),
            Err(ValidationError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_custom_rules() {
        let validator =
            ImageValidator::new(1000, vec!["image/png".to_string(), "image/gif".to_string()]);
        assert!(validator.validate_content_type("image/gif").is_ok());
        assert!(validator.validate_content_type("image/jpeg").is_err());

        let err = validator.validate_file_size(1001).unwrap_err();
        assert_eq!(err.to_string(), "File size must not exceed 1000 bytes");

        let err = validator.validate_content_type("image/jpeg").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid file type. Please upload a PNG or GIF image."
        );
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::for_memory("puzzle-images", "http://localhost");
        config.max_image_size_bytes = 2 * MIB;
        let validator = ImageValidator::from_config(&config);
        assert_eq!(validator.max_file_size(), 2 * MIB);
        assert!(validator.validate_file_size(2 * MIB + 1).is_err());
    }
}

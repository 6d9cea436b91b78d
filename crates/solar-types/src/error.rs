//! Error types for solar-checker

use thiserror::Error;

/// Reasons an image is rejected before any estimate is computed.
///
/// All variants are terminal for the current analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Image resolution {width}x{height} is too low (minimum {min}x{min})")]
    ResolutionTooLow { width: u32, height: u32, min: u32 },

    #[error("Image does not show a rooftop: {0}")]
    InvalidSubject(String),

    #[error("Image contrast {contrast:.1} is too low (minimum {min:.1})")]
    ContrastTooLow { contrast: f64, min: f64 },

    #[error("Image is too dark (brightness {brightness:.1}, minimum {min:.1})")]
    TooDark { brightness: f64, min: f64 },

    #[error("Image is too bright (brightness {brightness:.1}, maximum {max:.1})")]
    TooBright { brightness: f64, max: f64 },

    #[error("Failed to decode image: {0}")]
    DecodeFailure(String),

    #[error("Image statistics are not finite (brightness {brightness}, contrast {contrast})")]
    NonFiniteStatistics { brightness: f64, contrast: f64 },
}

impl ValidationError {
    /// Stable machine-readable code for this rejection
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::ResolutionTooLow { .. } => "resolution_too_low",
            ValidationError::InvalidSubject(_) => "invalid_subject",
            ValidationError::ContrastTooLow { .. } => "contrast_too_low",
            ValidationError::TooDark { .. } => "too_dark",
            ValidationError::TooBright { .. } => "too_bright",
            ValidationError::DecodeFailure(_) => "decode_failure",
            ValidationError::NonFiniteStatistics { .. } => "non_finite_statistics",
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Image rejected: {0}")]
    Validation(#[from] ValidationError),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid image format: {0}")]
    InvalidImageFormat(String),

    #[error("Excel export error: {0}")]
    Excel(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_codes_are_distinct() {
        let errors = [
            ValidationError::ResolutionTooLow { width: 1, height: 1, min: 300 },
            ValidationError::InvalidSubject("face".to_string()),
            ValidationError::ContrastTooLow { contrast: 1.0, min: 10.0 },
            ValidationError::TooDark { brightness: 1.0, min: 50.0 },
            ValidationError::TooBright { brightness: 250.0, max: 200.0 },
            ValidationError::DecodeFailure("bad".to_string()),
            ValidationError::NonFiniteStatistics { brightness: f64::NAN, contrast: 1.0 },
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_validation_message_is_displayable() {
        let err = ValidationError::ResolutionTooLow { width: 200, height: 200, min: 300 };
        assert_eq!(
            err.to_string(),
            "Image resolution 200x200 is too low (minimum 300x300)"
        );
    }

    #[test]
    fn test_validation_error_converts() {
        let err: Error = ValidationError::TooDark { brightness: 20.0, min: 50.0 }.into();
        assert!(matches!(err, Error::Validation(ValidationError::TooDark { .. })));
    }
}

//! Input validation gate
//!
//! Non-finite statistics are refused outright. The remaining rules run in a
//! fixed order and the first failure wins: resolution, subject, contrast,
//! darkness, brightness.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use solar_types::{ImageStatistics, ValidationError};

/// Limits applied by [`ImageValidator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationThresholds {
    /// Minimum width and height in pixels
    pub min_dimension: u32,
    pub min_contrast: f64,
    pub min_brightness: f64,
    pub max_brightness: f64,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            min_dimension: 300,
            min_contrast: 10.0,
            min_brightness: 50.0,
            max_brightness: 200.0,
        }
    }
}

/// Outcome of a content check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectVerdict {
    Accepted,
    /// Image shows something other than a rooftop
    Rejected(String),
}

/// Pluggable content check (e.g. a face detector) run as the second rule
pub trait SubjectValidator: Send + Sync {
    fn check(&self, image: &DynamicImage) -> SubjectVerdict;
}

/// Subject check that accepts every image
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl SubjectValidator for AcceptAll {
    fn check(&self, _image: &DynamicImage) -> SubjectVerdict {
        SubjectVerdict::Accepted
    }
}

/// Rejects images that are unsuitable for estimation
#[derive(Default)]
pub struct ImageValidator {
    thresholds: ValidationThresholds,
    subject: Option<Box<dyn SubjectValidator>>,
}

impl std::fmt::Debug for ImageValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageValidator")
            .field("thresholds", &self.thresholds)
            .field("subject_check", &self.subject.is_some())
            .finish()
    }
}

impl ImageValidator {
    pub fn new(thresholds: ValidationThresholds) -> Self {
        Self {
            thresholds,
            subject: None,
        }
    }

    pub fn with_subject_validator(mut self, subject: Box<dyn SubjectValidator>) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn thresholds(&self) -> &ValidationThresholds {
        &self.thresholds
    }

    /// Validate statistics, consulting the subject check when `image` is given.
    pub fn validate(
        &self,
        stats: &ImageStatistics,
        image: Option<&DynamicImage>,
    ) -> Result<(), ValidationError> {
        let t = &self.thresholds;

        // NaN slips through every threshold comparison below
        if !stats.brightness.is_finite() || !stats.contrast.is_finite() {
            return Err(ValidationError::NonFiniteStatistics {
                brightness: stats.brightness,
                contrast: stats.contrast,
            });
        }

        if stats.width < t.min_dimension || stats.height < t.min_dimension {
            return Err(ValidationError::ResolutionTooLow {
                width: stats.width,
                height: stats.height,
                min: t.min_dimension,
            });
        }

        if let (Some(subject), Some(image)) = (&self.subject, image) {
            if let SubjectVerdict::Rejected(reason) = subject.check(image) {
                return Err(ValidationError::InvalidSubject(reason));
            }
        }

        if stats.contrast < t.min_contrast {
            return Err(ValidationError::ContrastTooLow {
                contrast: stats.contrast,
                min: t.min_contrast,
            });
        }

        if stats.brightness < t.min_brightness {
            return Err(ValidationError::TooDark {
                brightness: stats.brightness,
                min: t.min_brightness,
            });
        }

        if stats.brightness > t.max_brightness {
            return Err(ValidationError::TooBright {
                brightness: stats.brightness,
                max: t.max_brightness,
            });
        }

        Ok(())
    }
}

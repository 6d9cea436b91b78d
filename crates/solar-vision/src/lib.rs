//! Vision module - image statistics and input validation for rooftop analysis

pub mod image_stats;
pub mod validator;

// Re-export main types for convenience
pub use image_stats::{extract_statistics, luminance};
pub use validator::{
    AcceptAll, ImageValidator, SubjectValidator, SubjectVerdict, ValidationThresholds,
};

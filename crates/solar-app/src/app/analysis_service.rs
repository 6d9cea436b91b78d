//! Analysis Service - Core Use Case for Rooftop Image Analysis
//!
//! This service orchestrates the complete analysis workflow:
//! 1. Validate the input path and decode the image
//! 2. Extract image statistics
//! 3. Reject unsuitable images
//! 4. Estimate solar potential
//! 5. Estimate financials
//! 6. Score confidence
//! 7. Decide suitability and build the advisory messages
//!
//! The analyzer holds only read-only tables, so one instance can serve any
//! number of callers at once.

use crate::config::{check_location_factor, Config};
use crate::scanner::validate_image_path;
use image::DynamicImage;
use log::info;
use solar_domain::service::{
    confidence_score, estimate_financials, estimate_solar_potential, recommend,
};
use solar_domain::KnowledgeBase;
use solar_types::{Error, ImageStatistics, Location, Recommendation, ValidationError};
use solar_vision::{extract_statistics, ImageValidator, SubjectValidator};
use std::path::Path;
use thiserror::Error;

/// Errors specific to the analysis service
#[derive(Debug, Error)]
pub enum AnalysisServiceError {
    #[error("Image validation failed: {0}")]
    InvalidImage(String),

    #[error("{0}")]
    Rejected(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AnalysisServiceError {
    /// Machine-readable code, matching `ValidationError::code` for rejections
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisServiceError::InvalidImage(_) => "invalid_image",
            AnalysisServiceError::Rejected(e) => e.code(),
            AnalysisServiceError::ConfigError(_) => "config_error",
        }
    }
}

impl From<Error> for AnalysisServiceError {
    fn from(err: Error) -> Self {
        match err {
            Error::FileNotFound(msg) | Error::InvalidImageFormat(msg) => {
                AnalysisServiceError::InvalidImage(msg)
            }
            Error::Validation(e) => AnalysisServiceError::Rejected(e),
            Error::Image(e) => {
                AnalysisServiceError::Rejected(ValidationError::DecodeFailure(e.to_string()))
            }
            Error::Config(e) => AnalysisServiceError::ConfigError(e.to_string()),
            _ => AnalysisServiceError::InvalidImage(err.to_string()),
        }
    }
}

/// Options for analysis
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Installation region, looked up in the knowledge base
    pub location: Location,

    /// Explicit production multiplier, overrides `location`
    pub location_factor: Option<f64>,
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            location: config.location,
            location_factor: config.location_factor,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn with_location_factor(mut self, factor: f64) -> Self {
        self.location_factor = Some(factor);
        self
    }
}

/// Stateless rooftop analyzer
#[derive(Debug, Default)]
pub struct SolarAnalyzer {
    knowledge_base: KnowledgeBase,
    validator: ImageValidator,
}

impl SolarAnalyzer {
    pub fn new(knowledge_base: KnowledgeBase, validator: ImageValidator) -> Self {
        Self {
            knowledge_base,
            validator,
        }
    }

    /// Build from configuration: knowledge base override and thresholds
    pub fn from_config(config: &Config) -> solar_types::Result<Self> {
        config.validate()?;
        let knowledge_base = config.knowledge_base()?;
        let validator = ImageValidator::new(config.thresholds.clone());
        Ok(Self::new(knowledge_base, validator))
    }

    /// Install a content check run after the resolution rule
    pub fn with_subject_validator(mut self, subject: Box<dyn SubjectValidator>) -> Self {
        self.validator = self.validator.with_subject_validator(subject);
        self
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    /// Production multiplier for the given options
    pub fn location_factor(&self, options: &AnalysisOptions) -> f64 {
        options
            .location_factor
            .unwrap_or_else(|| self.knowledge_base.location_factor(options.location))
    }

    /// Analyze a decoded image
    pub fn analyze(
        &self,
        image: &DynamicImage,
        location_factor: f64,
    ) -> Result<Recommendation, ValidationError> {
        let stats = extract_statistics(image);
        self.validator.validate(&stats, Some(image))?;
        Ok(self.estimate(stats, location_factor))
    }

    /// Analyze pre-computed statistics. The subject check is skipped.
    pub fn analyze_statistics(
        &self,
        stats: ImageStatistics,
        location_factor: f64,
    ) -> Result<Recommendation, ValidationError> {
        self.validator.validate(&stats, None)?;
        Ok(self.estimate(stats, location_factor))
    }

    /// Main entry point: analyze an image file
    pub fn analyze_file(
        &self,
        image_path: &Path,
        options: &AnalysisOptions,
    ) -> Result<Recommendation, AnalysisServiceError> {
        // Step 1: Validate path and options
        validate_image_path(image_path)?;
        if let Some(factor) = options.location_factor {
            check_location_factor(factor)?;
        }

        // Step 2: Decode
        let image = image::open(image_path)
            .map_err(|e| ValidationError::DecodeFailure(e.to_string()))?;

        // Steps 3-7
        let recommendation = self.analyze(&image, self.location_factor(options))?;

        info!(
            "{}: {} ({} panels, confidence {:.2})",
            image_path.display(),
            if recommendation.suitable {
                "suitable"
            } else {
                "not suitable"
            },
            recommendation.solar.max_panels,
            recommendation.confidence
        );

        Ok(recommendation)
    }

    fn estimate(&self, stats: ImageStatistics, location_factor: f64) -> Recommendation {
        let kb = &self.knowledge_base;
        let solar = estimate_solar_potential(&stats, kb, location_factor);
        let financial = estimate_financials(&solar, kb);
        let confidence = confidence_score(&stats, &solar, &kb.confidence);
        recommend(
            stats,
            solar,
            financial,
            confidence,
            location_factor,
            &kb.suitability,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_types::PanelType;

    #[test]
    fn test_analysis_options_builder() {
        let options = AnalysisOptions::new()
            .with_location(Location::Midwest)
            .with_location_factor(0.9);

        assert_eq!(options.location, Location::Midwest);
        assert_eq!(options.location_factor, Some(0.9));
    }

    #[test]
    fn test_explicit_factor_overrides_location() {
        let mut kb = KnowledgeBase::default();
        kb.location_factors.insert("west".to_string(), 1.3);
        let analyzer = SolarAnalyzer::new(kb, ImageValidator::default());

        let by_location = AnalysisOptions::new().with_location(Location::West);
        assert!((analyzer.location_factor(&by_location) - 1.3).abs() < 1e-12);

        let explicit = by_location.with_location_factor(0.5);
        assert!((analyzer.location_factor(&explicit) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_large_roof_pipeline() {
        let analyzer = SolarAnalyzer::default();
        let stats = ImageStatistics::new(2000, 1000, 150.0, 40.0);

        let rec = analyzer.analyze_statistics(stats, 1.0).unwrap();

        assert_eq!(rec.solar.roof_area_sqft, 102_588);
        assert_eq!(rec.solar.max_panels, 3847);
        assert_eq!(rec.solar.panel_type, PanelType::Monocrystalline);

        // panels 3847*300*0.35 + labor 3847*150 + 500 + 1000
        let system_cost = 403_935.0 + 577_050.0 + 1500.0;
        let net_cost = system_cost * 0.7;
        let savings = 380_853.0 * 0.12;
        assert!((rec.financial.system_cost - system_cost).abs() < 1e-6);
        assert!((rec.financial.net_cost - net_cost).abs() < 1e-6);
        assert!((rec.financial.payback_years - net_cost / savings).abs() < 1e-9);

        // Payback of ~15 years fails the 12-year limit
        assert!(!rec.suitable);
        assert!(rec.messages.iter().any(|m| m.contains("Long payback")));
    }

    #[test]
    fn test_rejection_short_circuits() {
        let analyzer = SolarAnalyzer::default();
        let err = analyzer
            .analyze_statistics(ImageStatistics::new(200, 200, 120.0, 30.0), 1.0)
            .unwrap_err();
        assert_eq!(err.code(), "resolution_too_low");
    }

    #[test]
    fn test_nan_brightness_never_reaches_estimation() {
        let analyzer = SolarAnalyzer::default();
        let err = analyzer
            .analyze_statistics(ImageStatistics::new(800, 600, f64::NAN, 35.0), 1.0)
            .unwrap_err();
        assert!(matches!(err, ValidationError::NonFiniteStatistics { .. }));
    }

    #[test]
    fn test_service_error_mapping() {
        let err: AnalysisServiceError = Error::FileNotFound("x.png".to_string()).into();
        assert!(matches!(err, AnalysisServiceError::InvalidImage(_)));

        let err: AnalysisServiceError =
            Error::Validation(ValidationError::TooDark { brightness: 10.0, min: 50.0 }).into();
        assert_eq!(err.code(), "too_dark");
    }
}

//! Confidence scoring
//!
//! Blends image quality (contrast, brightness) with how plausible the sizing
//! result is (roof area, panel count) into one score in [0, 1]. Weights and
//! saturation points come from the knowledge base's [`ConfidenceModel`].

use serde::Serialize;
use solar_types::{ImageStatistics, SolarEstimate};

use crate::model::ConfidenceModel;
use crate::rounding::round_to;

/// Individual signals feeding the confidence score, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceFactors {
    pub image_quality: f64,
    pub roof_factor: f64,
    pub panel_factor: f64,
}

impl ConfidenceFactors {
    pub fn from_estimate(
        stats: &ImageStatistics,
        solar: &SolarEstimate,
        model: &ConfidenceModel,
    ) -> Self {
        Self {
            image_quality: image_quality(stats, model),
            roof_factor: unit(solar.roof_area_sqft as f64 / model.roof_area_full_sqft),
            panel_factor: panel_factor(solar.max_panels, model),
        }
    }

    /// Weighted sum, rounded to 2 decimals and clamped to [0, 1]
    pub fn score(&self, model: &ConfidenceModel) -> f64 {
        let weighted = self.image_quality * model.image_quality_weight
            + self.roof_factor * model.roof_weight
            + self.panel_factor * model.panel_weight;
        round_to(weighted, 2).clamp(0.0, 1.0)
    }
}

pub fn image_quality(stats: &ImageStatistics, model: &ConfidenceModel) -> f64 {
    unit(stats.contrast / model.contrast_full * 0.5 + stats.brightness / 255.0 * 0.5)
}

pub fn panel_factor(max_panels: u64, model: &ConfidenceModel) -> f64 {
    unit(max_panels as f64 / model.panels_full)
}

pub fn confidence_score(
    stats: &ImageStatistics,
    solar: &SolarEstimate,
    model: &ConfidenceModel,
) -> f64 {
    ConfidenceFactors::from_estimate(stats, solar, model).score(model)
}

fn unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

//! Knowledge base: panel specifications, installation costs, incentives and
//! the fixed coefficients of the sizing model.
//!
//! The table is a plain value. Services borrow it; nothing mutates it after
//! construction, so one instance can be shared across threads freely.
//!
//! Every level deserializes with defaults: an override may name one table,
//! one panel technology, or a single field of either.

use serde::{Deserialize, Serialize};
use solar_types::{ConfigError, Location, PanelSpec, PanelType};
use std::collections::BTreeMap;

/// Specification per panel technology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PanelCatalogOverride")]
pub struct PanelCatalog {
    pub monocrystalline: PanelSpec,
    pub polycrystalline: PanelSpec,
    pub thin_film: PanelSpec,
}

impl PanelCatalog {
    pub fn spec(&self, panel_type: PanelType) -> &PanelSpec {
        match panel_type {
            PanelType::Monocrystalline => &self.monocrystalline,
            PanelType::Polycrystalline => &self.polycrystalline,
            PanelType::ThinFilm => &self.thin_film,
        }
    }
}

impl Default for PanelCatalog {
    fn default() -> Self {
        Self {
            monocrystalline: PanelSpec {
                efficiency: 0.22,
                cost_per_watt: 0.35,
                lifespan: 25,
            },
            polycrystalline: PanelSpec {
                efficiency: 0.18,
                cost_per_watt: 0.30,
                lifespan: 25,
            },
            thin_film: PanelSpec {
                efficiency: 0.12,
                cost_per_watt: 0.25,
                lifespan: 20,
            },
        }
    }
}

/// Partially specified panel, merged onto the reference spec
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PanelSpecOverride {
    efficiency: Option<f64>,
    cost_per_watt: Option<f64>,
    lifespan: Option<u32>,
}

impl PanelSpecOverride {
    fn apply(self, base: PanelSpec) -> PanelSpec {
        PanelSpec {
            efficiency: self.efficiency.unwrap_or(base.efficiency),
            cost_per_watt: self.cost_per_watt.unwrap_or(base.cost_per_watt),
            lifespan: self.lifespan.unwrap_or(base.lifespan),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PanelCatalogOverride {
    monocrystalline: PanelSpecOverride,
    polycrystalline: PanelSpecOverride,
    thin_film: PanelSpecOverride,
}

impl From<PanelCatalogOverride> for PanelCatalog {
    fn from(o: PanelCatalogOverride) -> Self {
        let base = PanelCatalog::default();
        Self {
            monocrystalline: o.monocrystalline.apply(base.monocrystalline),
            polycrystalline: o.polycrystalline.apply(base.polycrystalline),
            thin_film: o.thin_film.apply(base.thin_film),
        }
    }
}

/// Fixed installation cost components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallationCosts {
    pub labor_per_panel: f64,
    pub permits: f64,
    pub inverter: f64,
}

impl Default for InstallationCosts {
    fn default() -> Self {
        Self {
            labor_per_panel: 150.0,
            permits: 500.0,
            inverter: 1000.0,
        }
    }
}

/// Incentive rates applied to the system cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Incentives {
    /// Fraction of the system cost returned as tax credit (0-1)
    pub federal_tax_credit: f64,
}

impl Default for Incentives {
    fn default() -> Self {
        Self {
            federal_tax_credit: 0.30,
        }
    }
}

/// Coefficients of the heuristic sizing model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingModel {
    /// Square feet represented by one image pixel
    pub sqft_per_pixel: f64,
    pub brightness_weight: f64,
    pub contrast_weight: f64,
    /// Contrast value treated as a full contribution
    pub contrast_scale: f64,
    pub min_roof_ratio: f64,
    pub max_roof_ratio: f64,
    /// Fraction of the roof usable for panels
    pub usable_fraction: f64,
    pub sqft_per_panel: f64,
    /// Rated power of one panel in watts
    pub panel_watts: f64,
    pub sun_hours_per_year: f64,
    /// Roof area above which monocrystalline panels are chosen
    pub monocrystalline_min_sqft: u64,
    /// Roof area above which polycrystalline panels are chosen
    pub polycrystalline_min_sqft: u64,
}

impl Default for SizingModel {
    fn default() -> Self {
        Self {
            sqft_per_pixel: 0.1,
            brightness_weight: 0.6,
            contrast_weight: 0.4,
            contrast_scale: 100.0,
            min_roof_ratio: 0.3,
            max_roof_ratio: 0.8,
            usable_fraction: 0.75,
            sqft_per_panel: 20.0,
            panel_watts: 300.0,
            sun_hours_per_year: 1500.0,
            monocrystalline_min_sqft: 1000,
            polycrystalline_min_sqft: 500,
        }
    }
}

/// Thresholds of the suitability decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuitabilityPolicy {
    pub min_panels: u64,
    pub max_payback_years: f64,
    pub min_confidence: f64,
    /// Payback at or below this earns an extra callout
    pub fast_payback_years: f64,
}

impl Default for SuitabilityPolicy {
    fn default() -> Self {
        Self {
            min_panels: 6,
            max_payback_years: 12.0,
            min_confidence: 0.6,
            fast_payback_years: 7.0,
        }
    }
}

/// Saturation points and weights of the confidence score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceModel {
    /// Contrast at which contrast alone gives half of the image quality
    pub contrast_full: f64,
    /// Roof area at which the roof factor saturates
    pub roof_area_full_sqft: f64,
    /// Panel count at which the panel factor saturates
    pub panels_full: f64,
    pub image_quality_weight: f64,
    pub roof_weight: f64,
    pub panel_weight: f64,
}

impl Default for ConfidenceModel {
    fn default() -> Self {
        Self {
            contrast_full: 50.0,
            roof_area_full_sqft: 500.0,
            panels_full: 10.0,
            image_quality_weight: 0.4,
            roof_weight: 0.3,
            panel_weight: 0.3,
        }
    }
}

fn default_location_factors() -> BTreeMap<String, f64> {
    Location::ALL
        .iter()
        .map(|location| (location.key().to_string(), 1.0))
        .collect()
}

/// Read-only table consumed by every estimation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default)]
    pub panels: PanelCatalog,
    #[serde(default)]
    pub installation: InstallationCosts,
    #[serde(default)]
    pub incentives: Incentives,
    /// Average electricity price per kWh
    #[serde(default = "default_electricity_rate")]
    pub electricity_rate: f64,
    #[serde(default)]
    pub sizing: SizingModel,
    #[serde(default)]
    pub suitability: SuitabilityPolicy,
    #[serde(default)]
    pub confidence: ConfidenceModel,
    /// Production multiplier per location key
    #[serde(default = "default_location_factors")]
    pub location_factors: BTreeMap<String, f64>,
}

fn default_electricity_rate() -> f64 {
    0.12
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self {
            panels: PanelCatalog::default(),
            installation: InstallationCosts::default(),
            incentives: Incentives::default(),
            electricity_rate: default_electricity_rate(),
            sizing: SizingModel::default(),
            suitability: SuitabilityPolicy::default(),
            confidence: ConfidenceModel::default(),
            location_factors: default_location_factors(),
        }
    }
}

impl KnowledgeBase {
    /// Production multiplier for a location; unknown keys count as 1.0
    pub fn location_factor(&self, location: Location) -> f64 {
        self.location_factors
            .get(location.key())
            .copied()
            .unwrap_or(1.0)
    }

    /// Check that every value is usable by the estimators
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        for panel_type in PanelType::ALL {
            let spec = self.panels.spec(panel_type);
            if !(spec.efficiency > 0.0 && spec.efficiency <= 1.0) {
                problems.push(format!("{} efficiency must be in (0, 1]", panel_type));
            }
            if !is_non_negative(spec.cost_per_watt) {
                problems.push(format!("{} cost_per_watt must be >= 0", panel_type));
            }
        }

        let costs = [
            ("installation.labor_per_panel", self.installation.labor_per_panel),
            ("installation.permits", self.installation.permits),
            ("installation.inverter", self.installation.inverter),
            ("electricity_rate", self.electricity_rate),
        ];
        for (name, value) in costs {
            if !is_non_negative(value) {
                problems.push(format!("{} must be >= 0", name));
            }
        }

        let credit = self.incentives.federal_tax_credit;
        if !(0.0..=1.0).contains(&credit) {
            problems.push("incentives.federal_tax_credit must be in [0, 1]".to_string());
        }

        let sizing = &self.sizing;
        if !(is_non_negative(sizing.max_roof_ratio)
            && sizing.min_roof_ratio >= 0.0
            && sizing.min_roof_ratio <= sizing.max_roof_ratio)
        {
            problems.push("sizing.min_roof_ratio must be >= 0 and <= max_roof_ratio".to_string());
        }
        if !(sizing.usable_fraction > 0.0 && sizing.usable_fraction <= 1.0) {
            problems.push("sizing.usable_fraction must be in (0, 1]".to_string());
        }
        let non_negative = [
            ("sizing.sqft_per_pixel", sizing.sqft_per_pixel),
            ("sizing.brightness_weight", sizing.brightness_weight),
            ("sizing.contrast_weight", sizing.contrast_weight),
            ("suitability.max_payback_years", self.suitability.max_payback_years),
            ("suitability.fast_payback_years", self.suitability.fast_payback_years),
            ("confidence.image_quality_weight", self.confidence.image_quality_weight),
            ("confidence.roof_weight", self.confidence.roof_weight),
            ("confidence.panel_weight", self.confidence.panel_weight),
        ];
        for (name, value) in non_negative {
            if !is_non_negative(value) {
                problems.push(format!("{} must be >= 0", name));
            }
        }
        let positive = [
            ("sizing.contrast_scale", sizing.contrast_scale),
            ("sizing.sqft_per_panel", sizing.sqft_per_panel),
            ("sizing.panel_watts", sizing.panel_watts),
            ("sizing.sun_hours_per_year", sizing.sun_hours_per_year),
            ("confidence.contrast_full", self.confidence.contrast_full),
            ("confidence.roof_area_full_sqft", self.confidence.roof_area_full_sqft),
            ("confidence.panels_full", self.confidence.panels_full),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                problems.push(format!("{} must be > 0", name));
            }
        }
        if !(0.0..=1.0).contains(&self.suitability.min_confidence) {
            problems.push("suitability.min_confidence must be in [0, 1]".to_string());
        }
        if sizing.polycrystalline_min_sqft > sizing.monocrystalline_min_sqft {
            problems.push(
                "sizing.polycrystalline_min_sqft must not exceed monocrystalline_min_sqft"
                    .to_string(),
            );
        }

        for (key, factor) in &self.location_factors {
            if !is_non_negative(*factor) {
                problems.push(format!("location_factors.{} must be >= 0", key));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems.join("; ")))
        }
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(KnowledgeBase::default().validate().is_ok());
    }

    #[test]
    fn test_every_location_defaults_to_one() {
        let kb = KnowledgeBase::default();
        for location in Location::ALL {
            assert!((kb.location_factor(location) - 1.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_missing_location_key_falls_back() {
        let mut kb = KnowledgeBase::default();
        kb.location_factors.clear();
        assert!((kb.location_factor(Location::West) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = PanelCatalog::default();
        assert!((catalog.spec(PanelType::Polycrystalline).efficiency - 0.18).abs() < 1e-12);
        assert_eq!(catalog.spec(PanelType::ThinFilm).lifespan, 20);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let mut kb = KnowledgeBase::default();
        kb.incentives.federal_tax_credit = 1.5;
        kb.panels.thin_film.efficiency = 0.0;
        kb.installation.permits = -1.0;

        kb.sizing.panel_watts = -300.0;
        kb.sizing.sun_hours_per_year = 0.0;
        kb.sizing.usable_fraction = 1.5;
        kb.sizing.sqft_per_pixel = f64::NAN;
        kb.sizing.brightness_weight = -0.6;
        kb.suitability.max_payback_years = f64::INFINITY;
        kb.suitability.min_confidence = 2.0;
        kb.confidence.panels_full = 0.0;

        let err = kb.validate().unwrap_err().to_string();
        for field in [
            "federal_tax_credit",
            "Thin film efficiency",
            "installation.permits",
            "sizing.panel_watts",
            "sizing.sun_hours_per_year",
            "sizing.usable_fraction",
            "sizing.sqft_per_pixel",
            "sizing.brightness_weight",
            "suitability.max_payback_years",
            "suitability.min_confidence",
            "confidence.panels_full",
        ] {
            assert!(err.contains(field), "{} not reported in: {}", field, err);
        }
    }

    #[test]
    fn test_single_panel_technology_override() {
        let kb: KnowledgeBase = toml::from_str(
            r#"
[panels.monocrystalline]
efficiency = 0.24
"#,
        )
        .unwrap();

        let defaults = PanelCatalog::default();
        assert!((kb.panels.monocrystalline.efficiency - 0.24).abs() < 1e-12);
        assert_eq!(
            kb.panels.monocrystalline.cost_per_watt,
            defaults.monocrystalline.cost_per_watt
        );
        assert_eq!(kb.panels.polycrystalline, defaults.polycrystalline);
        assert_eq!(kb.panels.thin_film, defaults.thin_film);
    }

    #[test]
    fn test_single_coefficient_override() {
        let kb: KnowledgeBase = toml::from_str(
            r#"
[sizing]
sun_hours_per_year = 1800.0

[suitability]
min_panels = 8

[confidence]
panel_weight = 0.2
"#,
        )
        .unwrap();

        let sizing = SizingModel {
            sun_hours_per_year: 1800.0,
            ..SizingModel::default()
        };
        assert_eq!(kb.sizing, sizing);
        assert_eq!(kb.suitability.min_panels, 8);
        assert_eq!(
            kb.suitability.max_payback_years,
            SuitabilityPolicy::default().max_payback_years
        );
        assert!((kb.confidence.panel_weight - 0.2).abs() < 1e-12);
        assert_eq!(kb.confidence.contrast_full, 50.0);
        assert!(kb.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let kb: KnowledgeBase = toml::from_str(
            r#"
electricity_rate = 0.20

[incentives]
federal_tax_credit = 0.26
"#,
        )
        .unwrap();

        assert!((kb.electricity_rate - 0.20).abs() < 1e-12);
        assert!((kb.incentives.federal_tax_credit - 0.26).abs() < 1e-12);
        assert_eq!(kb.panels, PanelCatalog::default());
        assert_eq!(kb.location_factors.len(), Location::ALL.len());
    }
}

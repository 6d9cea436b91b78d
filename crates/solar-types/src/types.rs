//! Core types for rooftop solar estimation

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialize an unbounded payback as `null` and read it back as infinity.
mod unbounded_years {
    use super::*;

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<f64>::deserialize(deserializer).map(|opt| opt.unwrap_or(f64::INFINITY))
    }
}

/// Aggregate statistics of a decoded rooftop image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageStatistics {
    pub width: u32,
    pub height: u32,
    /// Mean of all sampled channel intensities (0-255)
    pub brightness: f64,
    /// Population standard deviation of luminance
    pub contrast: f64,
}

impl ImageStatistics {
    pub fn new(width: u32, height: u32, brightness: f64, contrast: f64) -> Self {
        Self {
            width,
            height,
            brightness,
            contrast,
        }
    }

    /// Total pixel footprint
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Photovoltaic panel technology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelType {
    Monocrystalline,
    Polycrystalline,
    ThinFilm,
}

impl PanelType {
    pub const ALL: [PanelType; 3] = [
        PanelType::Monocrystalline,
        PanelType::Polycrystalline,
        PanelType::ThinFilm,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PanelType::Monocrystalline => "Monocrystalline",
            PanelType::Polycrystalline => "Polycrystalline",
            PanelType::ThinFilm => "Thin film",
        }
    }
}

impl std::fmt::Display for PanelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Performance and pricing of one panel technology
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    /// Conversion efficiency (0-1)
    pub efficiency: f64,
    /// Hardware cost per rated watt
    pub cost_per_watt: f64,
    /// Expected service life in years
    pub lifespan: u32,
}

/// Installation region, used to look up a production multiplier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    #[default]
    Default,
    Northeast,
    Southeast,
    Midwest,
    Southwest,
    West,
}

impl Location {
    pub const ALL: [Location; 6] = [
        Location::Default,
        Location::Northeast,
        Location::Southeast,
        Location::Midwest,
        Location::Southwest,
        Location::West,
    ];

    /// Key used in knowledge base tables
    pub fn key(&self) -> &'static str {
        match self {
            Location::Default => "default",
            Location::Northeast => "northeast",
            Location::Southeast => "southeast",
            Location::Midwest => "midwest",
            Location::Southwest => "southwest",
            Location::West => "west",
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Projected roof usage and energy production
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarEstimate {
    pub roof_area_sqft: u64,
    pub max_panels: u64,
    pub panel_type: PanelType,
    pub panel_spec: PanelSpec,
    /// Rounded to 2 decimals
    pub capacity_kw: f64,
    /// Rounded to whole kWh
    pub annual_kwh: f64,
    /// Rounded to 1 decimal
    pub daily_kwh: f64,
}

/// Cost, savings and return of a projected installation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialEstimate {
    pub system_cost: f64,
    pub net_cost: f64,
    pub annual_savings: f64,
    /// `f64::INFINITY` when the system never pays back
    #[serde(with = "unbounded_years")]
    pub payback_years: f64,
    pub total_25yr_savings: f64,
    pub roi_percentage: f64,
}

impl FinancialEstimate {
    pub fn pays_back(&self) -> bool {
        self.payback_years.is_finite()
    }
}

/// Final feasibility decision with the estimates it was derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub suitable: bool,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f64,
    pub messages: Vec<String>,
    pub statistics: ImageStatistics,
    pub solar: SolarEstimate,
    pub financial: FinancialEstimate,
    pub location_factor: f64,
}

/// Successful entry in a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisEntry {
    pub image_path: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub recommendation: Recommendation,
}

/// Image that could not be analysed in a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionEntry {
    pub image_path: String,
    /// Machine-readable reason (see `ValidationError::code`) or `"error"`
    pub code: String,
    pub reason: String,
}

/// Results of a batch run over a folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    pub entries: Vec<AnalysisEntry>,
    #[serde(default)]
    pub rejections: Vec<RejectionEntry>,
    pub total_processed: usize,
    pub successful: usize,
    pub rejected: usize,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

impl BatchResults {
    /// Number of entries judged suitable for installation
    pub fn suitable_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.recommendation.suitable)
            .count()
    }
}

//! Solar potential estimation
//!
//! Turns image statistics into a projected roof area, panel layout and energy
//! production using the sizing coefficients of the knowledge base.

use log::debug;
use solar_types::{ImageStatistics, PanelType, SolarEstimate};

use crate::model::{KnowledgeBase, SizingModel};
use crate::rounding::{round_to, round_whole};

/// Fraction of the image footprint judged to be usable roof.
///
/// `brightness/255 * w_b + contrast/scale * w_c`, clamped to the model's range.
pub fn roof_area_ratio(stats: &ImageStatistics, sizing: &SizingModel) -> f64 {
    let raw = stats.brightness / 255.0 * sizing.brightness_weight
        + stats.contrast / sizing.contrast_scale * sizing.contrast_weight;
    raw.clamp(sizing.min_roof_ratio, sizing.max_roof_ratio)
}

/// Roof area in square feet, rounded to the nearest whole foot
pub fn roof_area_sqft(stats: &ImageStatistics, sizing: &SizingModel) -> u64 {
    let ratio = roof_area_ratio(stats, sizing);
    let area = stats.pixel_count() as f64 * sizing.sqft_per_pixel * ratio;
    round_whole(area).max(0.0) as u64
}

/// Number of panels that fit on the usable part of the roof. Never below 0.
pub fn max_panels(roof_area_sqft: u64, sizing: &SizingModel) -> u64 {
    let panels = (roof_area_sqft as f64 * sizing.usable_fraction / sizing.sqft_per_panel).floor();
    panels.max(0.0) as u64
}

/// Panel technology for a roof of the given size
pub fn select_panel_type(roof_area_sqft: u64, sizing: &SizingModel) -> PanelType {
    if roof_area_sqft > sizing.monocrystalline_min_sqft {
        PanelType::Monocrystalline
    } else if roof_area_sqft > sizing.polycrystalline_min_sqft {
        PanelType::Polycrystalline
    } else {
        PanelType::ThinFilm
    }
}

/// Installed capacity in kW before rounding
pub fn capacity_kw(max_panels: u64, efficiency: f64, sizing: &SizingModel) -> f64 {
    max_panels as f64 * sizing.panel_watts * efficiency / 1000.0
}

/// Estimate roof usage and production.
///
/// Stored fields are rounded: `roof_area_sqft` and `annual_kwh` to whole
/// numbers, `capacity_kw` to 2 decimals, `daily_kwh` to 1 decimal. Production
/// is derived from the unrounded capacity.
pub fn estimate_solar_potential(
    stats: &ImageStatistics,
    kb: &KnowledgeBase,
    location_factor: f64,
) -> SolarEstimate {
    let sizing = &kb.sizing;

    let roof_area_sqft = roof_area_sqft(stats, sizing);
    let max_panels = max_panels(roof_area_sqft, sizing);
    let panel_type = select_panel_type(roof_area_sqft, sizing);
    let panel_spec = *kb.panels.spec(panel_type);

    let capacity = capacity_kw(max_panels, panel_spec.efficiency, sizing);
    let annual = capacity * sizing.sun_hours_per_year * location_factor.max(0.0);
    let daily = annual / 365.0;

    debug!(
        "solar potential: area={}sqft panels={} type={} capacity={:.3}kW annual={:.1}kWh",
        roof_area_sqft, max_panels, panel_type, capacity, annual
    );

    SolarEstimate {
        roof_area_sqft,
        max_panels,
        panel_type,
        panel_spec,
        capacity_kw: round_to(capacity, 2),
        annual_kwh: round_whole(annual),
        daily_kwh: round_to(daily, 1),
    }
}

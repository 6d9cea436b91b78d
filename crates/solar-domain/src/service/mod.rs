//! Domain services

pub mod confidence;
pub mod financial;
pub mod recommendation;
pub mod solar_potential;

pub use confidence::{confidence_score, ConfidenceFactors};
pub use financial::estimate_financials;
pub use recommendation::{is_suitable, recommend};
pub use solar_potential::{estimate_solar_potential, roof_area_ratio};

//! Application use cases

pub mod analysis_service;
pub mod batch_service;

pub use analysis_service::{AnalysisOptions, AnalysisServiceError, SolarAnalyzer};
pub use batch_service::{analyze_batch, ProgressCallback};

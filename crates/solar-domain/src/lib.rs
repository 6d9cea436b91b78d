//! Domain layer for rooftop solar estimation
//!
//! Holds the knowledge base model and the pure estimation services that turn
//! image statistics into a feasibility recommendation.

pub mod model;
pub mod rounding;
pub mod service;

pub use model::KnowledgeBase;

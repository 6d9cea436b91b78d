//! Domain model types

pub mod knowledge_base;

pub use knowledge_base::{
    ConfidenceModel, Incentives, InstallationCosts, KnowledgeBase, PanelCatalog, SizingModel,
    SuitabilityPolicy,
};

//! Knowledge base loading and rendering

pub mod knowledge_base;

pub use knowledge_base::{knowledge_base_to_toml, load_knowledge_base, parse_knowledge_base};

//! Loading a knowledge base override from TOML
//!
//! Anything left out of the file keeps its reference value, so a file can
//! override just the electricity rate, a single panel technology or one
//! sizing coefficient.

use solar_domain::KnowledgeBase;
use solar_types::{ConfigError, Result};
use std::path::Path;

/// Parse and validate a knowledge base from TOML text
pub fn parse_knowledge_base(content: &str) -> Result<KnowledgeBase> {
    let kb: KnowledgeBase =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    kb.validate()?;
    Ok(kb)
}

/// Load and validate a knowledge base file
pub fn load_knowledge_base(path: &Path) -> Result<KnowledgeBase> {
    let content = std::fs::read_to_string(path)?;
    let kb = parse_knowledge_base(&content)?;
    log::debug!("loaded knowledge base from {}", path.display());
    Ok(kb)
}

/// Render a knowledge base as TOML, suitable as a starting override file
pub fn knowledge_base_to_toml(kb: &KnowledgeBase) -> Result<String> {
    toml::to_string_pretty(kb).map_err(|e| ConfigError::SaveError(e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_types::{Error, Location};
    use std::io::Write;

    #[test]
    fn test_default_round_trips_through_toml() {
        let kb = KnowledgeBase::default();
        let text = knowledge_base_to_toml(&kb).unwrap();
        assert!(text.contains("[panels.monocrystalline]"));
        assert_eq!(parse_knowledge_base(&text).unwrap(), kb);
    }

    #[test]
    fn test_override_location_factor() {
        let kb = parse_knowledge_base(
            r#"
[location_factors]
southwest = 1.25
"#,
        )
        .unwrap();

        assert!((kb.location_factor(Location::Southwest) - 1.25).abs() < 1e-12);
        // Keys absent from the override fall back to 1.0
        assert!((kb.location_factor(Location::Northeast) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = parse_knowledge_base("electricity_rate = -0.5").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_negative_panel_watts_rejected() {
        let err = parse_knowledge_base("[sizing]\npanel_watts = -300.0\n").unwrap_err();
        match err {
            Error::Config(ConfigError::Invalid(msg)) => assert!(msg.contains("panel_watts")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_partial_tables_parse() {
        let kb = parse_knowledge_base(
            r#"
[panels.monocrystalline]
efficiency = 0.23
cost_per_watt = 0.40

[sizing]
sun_hours_per_year = 1800.0
"#,
        )
        .unwrap();

        let defaults = KnowledgeBase::default();
        assert!((kb.panels.monocrystalline.cost_per_watt - 0.40).abs() < 1e-12);
        assert_eq!(kb.panels.thin_film, defaults.panels.thin_film);
        assert!((kb.sizing.sun_hours_per_year - 1800.0).abs() < 1e-12);
        assert_eq!(kb.sizing.panel_watts, defaults.sizing.panel_watts);
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = parse_knowledge_base("electricity_rate = ").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "electricity_rate = 0.18").unwrap();

        let kb = load_knowledge_base(file.path()).unwrap();
        assert!((kb.electricity_rate - 0.18).abs() < 1e-12);
    }

    #[test]
    fn test_missing_file() {
        let err = load_knowledge_base(Path::new("/nonexistent/kb.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}

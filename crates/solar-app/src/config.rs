//! Configuration management for solar-checker
//!
//! Config stored at: ~/.config/solar-checker/config.json

use serde::{Deserialize, Serialize};
use solar_domain::KnowledgeBase;
use solar_types::{ConfigError, Location, OutputFormat, Result};
use solar_vision::ValidationThresholds;
use std::path::{Path, PathBuf};

use crate::constants::load_knowledge_base;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,

    /// Installation region used to pick a production multiplier
    #[serde(default)]
    pub location: Location,

    /// Explicit production multiplier, overrides the location table
    #[serde(default)]
    pub location_factor: Option<f64>,

    /// TOML file overriding the built-in knowledge base
    #[serde(default)]
    pub knowledge_base_path: Option<PathBuf>,

    /// Worker threads for batch analysis. 0 = CPU count.
    #[serde(default = "default_batch_jobs")]
    pub batch_jobs: usize,

    /// Image rejection limits
    #[serde(default)]
    pub thresholds: ValidationThresholds,
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_batch_jobs() -> usize {
    4
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_format: default_output_format(),
            location: Location::default(),
            location_factor: None,
            knowledge_base_path: None,
            batch_jobs: default_batch_jobs(),
            thresholds: ValidationThresholds::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("solar-checker");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from the default location, or return defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from a file, or return defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save config to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| ConfigError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Reject values the analyzer cannot work with
    pub fn validate(&self) -> Result<()> {
        if let Some(factor) = self.location_factor {
            check_location_factor(factor)?;
        }

        let t = &self.thresholds;
        if t.min_brightness > t.max_brightness {
            return Err(ConfigError::Invalid(format!(
                "min_brightness {} exceeds max_brightness {}",
                t.min_brightness, t.max_brightness
            ))
            .into());
        }
        if t.min_contrast < 0.0 {
            return Err(ConfigError::Invalid("min_contrast must be >= 0".to_string()).into());
        }

        Ok(())
    }

    /// Knowledge base from the override file, or the built-in table
    pub fn knowledge_base(&self) -> Result<KnowledgeBase> {
        match &self.knowledge_base_path {
            Some(path) => load_knowledge_base(path),
            None => Ok(KnowledgeBase::default()),
        }
    }
}

/// A production multiplier must be a finite, non-negative number
pub fn check_location_factor(factor: f64) -> Result<()> {
    if factor.is_finite() && factor >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "location factor must be a non-negative number, got {}",
            factor
        ))
        .into())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solar Checker Configuration")?;
        writeln!(f, "===========================")?;
        writeln!(f)?;
        writeln!(f, "Output format:    {}", self.output_format)?;
        writeln!(f, "Location:         {}", self.location)?;
        match self.location_factor {
            Some(factor) => writeln!(f, "Location factor:  {:.2}", factor)?,
            None => writeln!(f, "Location factor:  (from knowledge base)")?,
        }
        writeln!(
            f,
            "Knowledge base:   {}",
            self.knowledge_base_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(built-in)".to_string())
        )?;
        writeln!(f, "Batch jobs:       {}", self.batch_jobs)?;
        writeln!(f)?;
        writeln!(f, "Min dimension:    {} px", self.thresholds.min_dimension)?;
        writeln!(f, "Min contrast:     {:.1}", self.thresholds.min_contrast)?;
        writeln!(
            f,
            "Brightness range: {:.1} - {:.1}",
            self.thresholds.min_brightness, self.thresholds.max_brightness
        )?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:      {}", path.display())?;
        }

        Ok(())
    }
}

//! CLI definition using clap

use clap::{Args, Parser, Subcommand};
use solar_types::{Location, OutputFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "solar-checker")]
#[command(version)]
#[command(about = "Rooftop solar feasibility estimation from aerial images")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Where the production multiplier comes from
#[derive(Args, Debug, Clone, Default)]
pub struct LocationArgs {
    /// Installation region. Uses config value if not specified.
    #[arg(long, short = 'l')]
    pub location: Option<Location>,

    /// Explicit production multiplier, overrides --location
    #[arg(long)]
    pub location_factor: Option<f64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a single rooftop image
    Analyze {
        /// Path to image file
        image: PathBuf,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// Estimate from known image statistics, without an image file
    Estimate {
        /// Image width in pixels
        #[arg(long)]
        width: u32,

        /// Image height in pixels
        #[arg(long)]
        height: u32,

        /// Mean brightness (0-255)
        #[arg(long)]
        brightness: f64,

        /// Luminance standard deviation
        #[arg(long)]
        contrast: f64,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// Batch analyze images in a folder
    Batch {
        /// Path to folder containing images
        folder: PathBuf,

        /// Output file for results
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Number of parallel analyses. 0 = auto (CPU count). Uses config value if not specified.
        #[arg(long, short = 'j')]
        jobs: Option<usize>,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// Export batch results to Excel
    Export {
        /// Path to JSON results file
        results: PathBuf,

        /// Output Excel file path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set default installation region
        #[arg(long)]
        set_location: Option<Location>,

        /// Set an explicit production multiplier
        #[arg(long, conflicts_with = "clear_location_factor")]
        set_location_factor: Option<f64>,

        /// Go back to looking up the multiplier by region
        #[arg(long)]
        clear_location_factor: bool,

        /// Set a TOML file overriding the built-in knowledge base
        #[arg(long)]
        set_knowledge_base: Option<PathBuf>,

        /// Set default number of batch workers (0 = CPU count)
        #[arg(long)]
        set_batch_jobs: Option<usize>,

        /// Reset to default configuration
        #[arg(long)]
        reset: bool,
    },

    /// Print the active knowledge base as TOML
    KnowledgeBase,
}

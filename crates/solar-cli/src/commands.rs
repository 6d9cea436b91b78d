//! Command handlers

use crate::cli::{Cli, Commands, LocationArgs};
use crate::output::{output_recommendation, output_rejection};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use solar_app::app::{analyze_batch, AnalysisOptions, AnalysisServiceError, SolarAnalyzer};
use solar_app::config::{check_location_factor, Config};
use solar_app::constants::knowledge_base_to_toml;
use solar_app::export::export_to_excel;
use solar_app::scanner::scan_directory;
use solar_types::{
    BatchResults, ConfigError, Error, ImageStatistics, Location, OutputFormat, Result,
};
use std::path::{Path, PathBuf};

pub fn execute(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Analyze { image, location } => {
            cmd_analyze(&config, &image, &location, output_format)
        }

        Commands::Estimate {
            width,
            height,
            brightness,
            contrast,
            location,
        } => {
            let stats = ImageStatistics::new(width, height, brightness, contrast);
            cmd_estimate(&config, stats, &location, output_format)
        }

        Commands::Batch {
            folder,
            output,
            jobs,
            location,
        } => {
            let job_count = resolve_jobs(jobs.unwrap_or(config.batch_jobs));
            cmd_batch(&config, &folder, output, job_count, &location, output_format)
        }

        Commands::Export { results, output } => cmd_export(&results, output),

        Commands::Config {
            show,
            set_output,
            set_location,
            set_location_factor,
            clear_location_factor,
            set_knowledge_base,
            set_batch_jobs,
            reset,
        } => cmd_config(ConfigUpdate {
            show,
            set_output,
            set_location,
            set_location_factor,
            clear_location_factor,
            set_knowledge_base,
            set_batch_jobs,
            reset,
        }),

        Commands::KnowledgeBase => cmd_knowledge_base(&config),
    }
}

/// 0 = auto (CPU count)
fn resolve_jobs(jobs: usize) -> usize {
    if jobs == 0 {
        num_cpus::get()
    } else {
        jobs
    }
}

/// Config defaults overridden by the command-line location flags
fn analysis_options(config: &Config, args: &LocationArgs) -> AnalysisOptions {
    let mut options = AnalysisOptions::from_config(config);
    if let Some(location) = args.location {
        options = options.with_location(location);
        // An explicit region on the command line beats a saved factor
        options.location_factor = None;
    }
    if let Some(factor) = args.location_factor {
        options = options.with_location_factor(factor);
    }
    options
}

fn into_error(err: AnalysisServiceError) -> Error {
    match err {
        AnalysisServiceError::InvalidImage(msg) => Error::InvalidImageFormat(msg),
        AnalysisServiceError::Rejected(e) => Error::Validation(e),
        AnalysisServiceError::ConfigError(msg) => ConfigError::Invalid(msg).into(),
    }
}

fn cmd_analyze(
    config: &Config,
    image: &Path,
    location: &LocationArgs,
    output_format: OutputFormat,
) -> Result<()> {
    let analyzer = SolarAnalyzer::from_config(config)?;
    let options = analysis_options(config, location);

    match analyzer.analyze_file(image, &options) {
        Ok(rec) => output_recommendation(output_format, &rec),
        Err(AnalysisServiceError::Rejected(e)) => {
            output_rejection(output_format, &image.display().to_string(), &e)
        }
        Err(e) => Err(into_error(e)),
    }
}

fn cmd_estimate(
    config: &Config,
    stats: ImageStatistics,
    location: &LocationArgs,
    output_format: OutputFormat,
) -> Result<()> {
    let analyzer = SolarAnalyzer::from_config(config)?;
    let options = analysis_options(config, location);
    let factor = analyzer.location_factor(&options);
    check_location_factor(factor)?;

    match analyzer.analyze_statistics(stats, factor) {
        Ok(rec) => output_recommendation(output_format, &rec),
        Err(e) => output_rejection(output_format, "(statistics)", &e),
    }
}

fn cmd_batch(
    config: &Config,
    folder: &Path,
    output: Option<PathBuf>,
    jobs: usize,
    location: &LocationArgs,
    output_format: OutputFormat,
) -> Result<()> {
    let analyzer = SolarAnalyzer::from_config(config)?;
    let options = analysis_options(config, location);
    if let Some(factor) = options.location_factor {
        check_location_factor(factor)?;
    }

    let images = scan_directory(folder)?;

    if images.is_empty() {
        return Err(Error::FileNotFound(format!(
            "No images found in {}",
            folder.display()
        )));
    }

    info!(
        "Found {} images to analyze with {} parallel jobs",
        images.len(),
        jobs
    );

    let pb = ProgressBar::new(images.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let on_done = |path: &Path| {
        if let Some(name) = path.file_name() {
            pb.set_message(name.to_string_lossy().into_owned());
        }
        pb.inc(1);
    };

    let results = analyze_batch(&analyzer, &images, &options, jobs, Some(&on_done));
    pb.finish_with_message("done");

    if let Some(output_path) = output {
        let content = serde_json::to_string_pretty(&results)?;
        std::fs::write(&output_path, content)?;
        println!("Results saved to: {}", output_path.display());
    } else if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_batch_summary(&results);
    }

    Ok(())
}

fn print_batch_summary(results: &BatchResults) {
    println!("\nBatch Analysis Complete");
    println!("=======================");
    println!("Total:      {}", results.total_processed);
    println!("Analyzed:   {}", results.successful);
    println!("Suitable:   {}", results.suitable_count());
    println!("Rejected:   {}", results.rejected);
    println!(
        "Duration:   {:.1}s",
        (results.completed_at - results.started_at).num_milliseconds() as f64 / 1000.0
    );

    if !results.entries.is_empty() {
        println!();
        println!(
            "{:<40} {:>8} {:>10} {:>10} {:>9}",
            "Image", "Panels", "kW", "Payback", "Suitable"
        );
        for entry in &results.entries {
            let rec = &entry.recommendation;
            let payback = if rec.financial.pays_back() {
                format!("{:.1}y", rec.financial.payback_years)
            } else {
                "never".to_string()
            };
            println!(
                "{:<40} {:>8} {:>10.1} {:>10} {:>9}",
                display_name(&entry.image_path),
                rec.solar.max_panels,
                rec.solar.capacity_kw,
                payback,
                if rec.suitable { "yes" } else { "no" }
            );
        }
    }

    if !results.rejections.is_empty() {
        println!("\nRejected images:");
        for rejection in &results.rejections {
            println!(
                "  {} [{}] {}",
                display_name(&rejection.image_path),
                rejection.code,
                rejection.reason
            );
        }
    }
}

fn display_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

fn cmd_export(results_path: &Path, output: Option<PathBuf>) -> Result<()> {
    // Load results
    let content = std::fs::read_to_string(results_path)?;
    let results: BatchResults = serde_json::from_str(&content)?;

    // Determine output path
    let output_path = output.unwrap_or_else(|| {
        let stem = results_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("results");
        results_path.with_file_name(format!("{}.xlsx", stem))
    });

    export_to_excel(&results, &output_path)?;

    println!("Exported to: {}", output_path.display());
    Ok(())
}

struct ConfigUpdate {
    show: bool,
    set_output: Option<OutputFormat>,
    set_location: Option<Location>,
    set_location_factor: Option<f64>,
    clear_location_factor: bool,
    set_knowledge_base: Option<PathBuf>,
    set_batch_jobs: Option<usize>,
    reset: bool,
}

fn cmd_config(update: ConfigUpdate) -> Result<()> {
    if update.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let modified = apply_config_update(&mut config, &update);

    if modified {
        config.validate()?;
        // Fail now rather than on the next analysis
        config.knowledge_base()?;
        config.save()?;
        println!("Configuration updated");
    }

    if update.show || !modified {
        println!("{}", config);
    }

    Ok(())
}

/// Apply requested changes, returning whether anything changed
fn apply_config_update(config: &mut Config, update: &ConfigUpdate) -> bool {
    let mut modified = false;

    if let Some(output_format) = update.set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(location) = update.set_location {
        config.location = location;
        modified = true;
    }

    if let Some(factor) = update.set_location_factor {
        config.location_factor = Some(factor);
        modified = true;
    }

    if update.clear_location_factor {
        config.location_factor = None;
        modified = true;
    }

    if let Some(path) = &update.set_knowledge_base {
        config.knowledge_base_path = Some(path.clone());
        modified = true;
    }

    if let Some(jobs) = update.set_batch_jobs {
        config.batch_jobs = jobs;
        modified = true;
    }

    modified
}

fn cmd_knowledge_base(config: &Config) -> Result<()> {
    let kb = config.knowledge_base()?;
    print!("{}", knowledge_base_to_toml(&kb)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_update() -> ConfigUpdate {
        ConfigUpdate {
            show: false,
            set_output: None,
            set_location: None,
            set_location_factor: None,
            clear_location_factor: false,
            set_knowledge_base: None,
            set_batch_jobs: None,
            reset: false,
        }
    }

    #[test]
    fn test_resolve_jobs() {
        assert_eq!(resolve_jobs(3), 3);
        assert!(resolve_jobs(0) >= 1);
    }

    #[test]
    fn test_location_flag_replaces_saved_factor() {
        let config = Config {
            location_factor: Some(1.4),
            ..Default::default()
        };

        let inherited = analysis_options(&config, &LocationArgs::default());
        assert_eq!(inherited.location_factor, Some(1.4));

        let by_region = analysis_options(
            &config,
            &LocationArgs {
                location: Some(Location::Midwest),
                location_factor: None,
            },
        );
        assert_eq!(by_region.location, Location::Midwest);
        assert_eq!(by_region.location_factor, None);

        let explicit = analysis_options(
            &config,
            &LocationArgs {
                location: None,
                location_factor: Some(0.8),
            },
        );
        assert_eq!(explicit.location_factor, Some(0.8));
    }

    #[test]
    fn test_apply_config_update() {
        let mut config = Config::default();
        assert!(!apply_config_update(&mut config, &empty_update()));

        let update = ConfigUpdate {
            set_output: Some(OutputFormat::Json),
            set_location: Some(Location::West),
            set_batch_jobs: Some(8),
            ..empty_update()
        };
        assert!(apply_config_update(&mut config, &update));
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.location, Location::West);
        assert_eq!(config.batch_jobs, 8);

        config.location_factor = Some(1.2);
        let clear = ConfigUpdate {
            clear_location_factor: true,
            ..empty_update()
        };
        assert!(apply_config_update(&mut config, &clear));
        assert_eq!(config.location_factor, None);
    }

    #[test]
    fn test_into_error_maps_invalid_image() {
        let err = into_error(AnalysisServiceError::InvalidImage("x".to_string()));
        assert!(matches!(err, Error::InvalidImageFormat(_)));
    }
}

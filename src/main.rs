// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Main entry point for the vibration velocity analyzer
use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

use rust_vibration::acquisition::{get_sample_source_from_file, SampleSource};
use rust_vibration::calibration::{vibration_measurements, CalibrationExperiment};
use rust_vibration::config::{self, Config};
use rust_vibration::preprocessing::WindowFunction;
use rust_vibration::processing::VelocityProcessor;

/// Vibration velocity analyzer using frequency-domain integration
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Input recording (CSV format)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output file for results (JSON)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Sampling rate of the recording in Hz
    #[arg(long)]
    sampling_rate: Option<u32>,

    /// Number of samples per processing block
    #[arg(long)]
    block_size: Option<usize>,

    /// Lower bound of the filter band in Hz
    #[arg(long)]
    low_freq: Option<f64>,

    /// Upper bound of the filter band in Hz
    #[arg(long)]
    high_freq: Option<f64>,

    /// Window applied before the FFT
    #[arg(long, value_enum)]
    window: Option<WindowFunction>,

    /// Factor applied to the velocity (e.g. 1000 for m/s to mm/s)
    #[arg(long)]
    unit_factor: Option<f64>,

    /// Fail on a filter band that keeps no frequency bin
    #[arg(long)]
    strict_band: bool,

    /// Path to configuration file (YAML format)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to a configuration to validate and exit
    #[arg(long)]
    validate_config: Option<PathBuf>,

    /// Output the configuration schema as JSON and exit
    #[arg(long)]
    show_config_schema: bool,

    /// Enable verbose logging (debug level)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Disable all logging output
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.quiet {
        log::LevelFilter::Off
    } else if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    // Check if --show-config-schema flag is set
    if args.show_config_schema {
        return config::output_config_schema();
    }

    // Validate configuration file if --validate-config is set
    if let Some(validate_path) = args.validate_config {
        if !validate_path.exists() {
            return Err(anyhow::anyhow!(
                "Configuration file does not exist: {}",
                validate_path.display()
            ));
        }

        Config::from_file(&validate_path)
            .map_err(|err| anyhow::anyhow!("Configuration validation failed: {}", err))?;
        println!("Configuration file is valid: {}", validate_path.display());
        return Ok(());
    }

    // Load configuration
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("config.yaml"));
    let mut config = Config::from_file(&config_path)?;

    // Apply command line overrides
    config.apply_args(
        args.sampling_rate,
        args.block_size,
        args.low_freq,
        args.high_freq,
        args.window,
        args.unit_factor,
        args.strict_band,
    );
    config::utils::validate_specific_rules(&config)?;

    let input = match args.input {
        Some(path) => path,
        None => anyhow::bail!("No input recording given, use --input <FILE>"),
    };

    let mut source =
        get_sample_source_from_file(&input, &config.acquisition, config.processing.sampling_rate)?;
    let recording = source
        .read_samples()
        .with_context(|| format!("Failed to read recording {}", input.display()))?;

    let mut processor = VelocityProcessor::new(config.processing.clone())?;
    let analysis = processor.analyze_recording(&recording)?;
    if analysis.block_count() == 0 {
        warn!(
            "Recording is shorter than one block of {} samples",
            config.processing.block_size
        );
    }
    info!("Analyzed {} block(s) per axis", analysis.block_count());

    match &args.output {
        Some(path) => {
            let json = serde_json::to_string_pretty(&analysis)
                .context("Failed to serialize analysis")?;
            fs::write(path, json)
                .with_context(|| format!("Failed to write results to {}", path.display()))?;
            info!("Results written to {}", path.display());
        }
        None => print!("{}", analysis.report()),
    }

    if config.calibration.enabled {
        let experiment = CalibrationExperiment::from_config(&config.calibration);
        let result = experiment.evaluate(&vibration_measurements(&analysis, config.calibration.axis));
        print!("{}", result.report());
        if !result.passed() {
            warn!("Calibration failed: {}", result.description);
        }
    }

    Ok(())
}

// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management for the vibration processing tools
//!
//! This module provides functionality for loading, validating, and applying
//! configuration settings. The configuration is backed by a YAML file and
//! validated against a JSON schema before being deserialized.
//!
//! ## Configuration Structure
//!
//! - `processing`: block geometry, filter band, window and scaling of the
//!   velocity pipeline
//! - `acquisition`: how CSV recordings are read and converted
//! - `calibration`: optional reference excitation to check results against
//!
//! ## Usage
//!
//! ```no_run
//! use rust_vibration::config::Config;
//! use rust_vibration::preprocessing::WindowFunction;
//! use std::path::Path;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file(Path::new("config.yaml")).unwrap();
//!
//! // Apply command line overrides if needed
//! config.apply_args(
//!     Some(1000),                     // Sampling rate
//!     Some(512),                      // Block size
//!     Some(5.0),                      // Low frequency
//!     None,                           // High frequency
//!     Some(WindowFunction::Hamming),  // Window
//!     Some(1000.0),                   // Unit factor
//!     false,                          // Strict band
//! );
//!
//! println!("Block size: {}", config.processing.block_size);
//! ```

pub mod acquisition;
pub mod calibration;
pub mod processing;
pub mod utils;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

pub use acquisition::AcquisitionConfig;
pub use calibration::CalibrationConfig;
pub use processing::ProcessingConfig;
pub use utils::output_config_schema;

use crate::preprocessing::WindowFunction;

/// Root configuration structure
///
/// Every section falls back to its defaults when missing from the file, so
/// an empty YAML document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Velocity pipeline settings
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Recording input settings
    #[serde(default)]
    pub acquisition: AcquisitionConfig,

    /// Calibration reference
    #[serde(default)]
    pub calibration: CalibrationConfig,
}

impl Config {
    /// Helper method to create a sample config file when validation fails
    fn create_sample_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let sample_path = path.with_extension("sample.yaml");
        debug!("Original path: {:?}, Sample path: {:?}", path, sample_path);

        if let Some(parent) = sample_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create parent directory for sample config at {:?}",
                        parent
                    )
                })?;
            }
        }

        Self::default()
            .save_to_file(&sample_path)
            .with_context(|| format!("Failed to save sample config to {:?}", sample_path))?;

        error!(
            "Sample configuration file created at {:?}\nPlease edit and rename it",
            sample_path
        );
        Ok(())
    }

    /// Load configuration from a file
    ///
    /// A missing file is created with the defaults. An invalid file leaves a
    /// `<name>.sample.yaml` with the defaults next to it and fails.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;
        Self::from_yaml_str(&contents, Some(path))
    }

    /// Parse and validate a YAML document
    ///
    /// When `origin` is given, validation failures write a sample file next
    /// to it.
    pub fn from_yaml_str(contents: &str, origin: Option<&Path>) -> Result<Self> {
        let sample = |origin: Option<&Path>| -> Result<()> {
            match origin {
                Some(path) => Self::create_sample_config(path),
                None => Ok(()),
            }
        };

        let yaml_value: serde_yml::Value =
            serde_yml::from_str(contents).context("Failed to parse YAML configuration")?;
        // An empty document means "all defaults"
        let yaml_value = match yaml_value {
            serde_yml::Value::Null => serde_yml::Value::Mapping(serde_yml::Mapping::new()),
            other => other,
        };

        let json_value =
            serde_json::to_value(&yaml_value).context("Failed to convert YAML to JSON for validation")?;

        let schema_str = include_str!("../../resources/config.schema.json");
        let schema: serde_json::Value = serde_json::from_str(schema_str).with_context(|| {
            debug!("JSON schema string: {}", schema_str);
            "Failed to parse JSON schema"
        })?;

        let validator = jsonschema::draft202012::options()
            .should_validate_formats(true)
            .build(&schema)?;

        debug!("Validating configuration against schema");
        if let Err(error) = validator.validate(&json_value) {
            error!("Configuration validation error before deserialization");
            sample(origin)?;
            anyhow::bail!("Configuration validation failed: {}", error);
        }

        debug!("Schema validation passed, deserializing into Config structure");
        let config: Config = match serde_json::from_value(json_value) {
            Ok(config) => config,
            Err(err) => {
                error!("Configuration deserialization error: {}", err);
                if let Err(e) = sample(origin) {
                    error!("Failed to create sample config: {}", e);
                }
                return Err(anyhow::anyhow!("Failed to deserialize configuration: {}", err));
            }
        };

        if let Err(err) = utils::validate_specific_rules(&config) {
            error!("Configuration specific validation error: {}", err);
            sample(origin)?;
            return Err(err);
        }

        Ok(config)
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Apply command line arguments to override configuration values
    ///
    /// Only the values provided override the loaded configuration; the
    /// strict-band flag can only be switched on from the command line.
    #[allow(clippy::too_many_arguments)]
    pub fn apply_args(
        &mut self,
        sampling_rate: Option<u32>,
        block_size: Option<usize>,
        low_freq_hz: Option<f64>,
        high_freq_hz: Option<f64>,
        window: Option<WindowFunction>,
        unit_factor: Option<f64>,
        strict_band: bool,
    ) {
        if let Some(rate) = sampling_rate {
            debug!("Overriding sampling rate from command line: {}", rate);
            self.processing.sampling_rate = rate;
        }
        if let Some(size) = block_size {
            debug!("Overriding block size from command line: {}", size);
            self.processing.block_size = size;
        }
        if let Some(low) = low_freq_hz {
            debug!("Overriding low frequency from command line: {}", low);
            self.processing.low_freq_hz = low;
        }
        if let Some(high) = high_freq_hz {
            debug!("Overriding high frequency from command line: {}", high);
            self.processing.high_freq_hz = high;
        }
        if let Some(window) = window {
            debug!("Overriding window from command line: {}", window);
            self.processing.window = window;
        }
        if let Some(factor) = unit_factor {
            debug!("Overriding unit factor from command line: {}", factor);
            self.processing.unit_factor = factor;
        }
        if strict_band {
            debug!("Enabling strict band checking from command line");
            self.processing.strict_band = true;
        }
    }
}

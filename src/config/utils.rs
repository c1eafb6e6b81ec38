// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration utilities
//!
//! This module provides utility functions for working with configuration
//! settings, including validation and schema management.

use anyhow::{Context, Result};
use log::{debug, warn};

use super::Config;
use crate::spectral::bin_count;

/// Output the embedded JSON schema to the console.
///
/// This function is called when the `--show-config-schema` flag is provided
/// on the command line.
///
/// # Example
///
/// ```bash
/// ./rust_vibration --show-config-schema > config_schema.json
/// ```
pub fn output_config_schema() -> Result<()> {
    let schema_str = include_str!("../../resources/config.schema.json");

    let schema: serde_json::Value =
        serde_json::from_str(schema_str).context("Failed to parse JSON schema")?;

    let formatted_schema =
        serde_json::to_string_pretty(&schema).context("Failed to format JSON schema")?;

    println!("{}", formatted_schema);

    Ok(())
}

/// Validates the configuration against rules the JSON schema cannot express
///
/// # Validation Rules
///
/// - **Sampling**: sampling rate and block size are non-zero
/// - **Band**: bounds are finite; with `strict_band` the band must keep at
///   least one frequency bin
/// - **Scaling**: unit factor and range multiplier are finite and non-zero
/// - **Delimiter**: a single ASCII character
/// - **Calibration**: positive reference frequency and tolerance
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing additional validation checks");
    let processing = &config.processing;

    if processing.sampling_rate == 0 {
        anyhow::bail!("Sampling rate must be greater than zero");
    }
    if processing.block_size == 0 {
        anyhow::bail!("Block size must be greater than zero");
    }
    if !processing.low_freq_hz.is_finite() || !processing.high_freq_hz.is_finite() {
        anyhow::bail!(
            "Filter band bounds must be finite: {} Hz - {} Hz",
            processing.low_freq_hz,
            processing.high_freq_hz
        );
    }

    let nyquist = processing.sampling_rate_hz() / 2.0;
    if processing.high_freq_hz > nyquist {
        debug!(
            "High frequency {} Hz is above Nyquist ({} Hz), the band stops at Nyquist",
            processing.high_freq_hz, nyquist
        );
    }

    let band = processing.band();
    let range = band.bin_range(
        processing.block_size,
        processing.sampling_rate_hz(),
        bin_count(processing.block_size),
    );
    if range.is_empty() || processing.low_freq_hz >= processing.high_freq_hz {
        if processing.strict_band {
            anyhow::bail!(
                "Filter band {} Hz - {} Hz keeps no frequency bin (resolution {} Hz)",
                processing.low_freq_hz,
                processing.high_freq_hz,
                processing.resolution()
            );
        }
        warn!(
            "Filter band {} Hz - {} Hz keeps no frequency bin, velocities will be zero",
            processing.low_freq_hz, processing.high_freq_hz
        );
    }

    if !processing.unit_factor.is_finite() || processing.unit_factor == 0.0 {
        anyhow::bail!("Invalid unit factor: {}", processing.unit_factor);
    }
    let range_multiplier = config.acquisition.range_multiplier;
    if !range_multiplier.is_finite() || range_multiplier == 0.0 {
        anyhow::bail!("Invalid range multiplier: {}", range_multiplier);
    }

    config.acquisition.delimiter_byte()?;

    let calibration = &config.calibration;
    if calibration.enabled {
        if calibration.frequency_hz <= 0.0 {
            anyhow::bail!(
                "Calibration frequency must be positive: {}",
                calibration.frequency_hz
            );
        }
        if calibration.tolerance_pct <= 0.0 {
            anyhow::bail!(
                "Calibration tolerance must be positive: {}",
                calibration.tolerance_pct
            );
        }
    }

    Ok(())
}

// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Recording input configuration
//!
//! This module defines how CSV recordings are read and how their raw values
//! are converted to acceleration.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::acquisition::{CsvLayout, FixedPointFormat, SampleTransform, Unit};

/// Configuration for reading recordings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// Row layout of the CSV files
    #[serde(default)]
    pub layout: CsvLayout,

    /// Field delimiter, a single ASCII character
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Fixed-point format of the raw values
    ///
    /// When absent, values are read as floats already in g (or already in
    /// the target unit when `unit` is `g` and `range_multiplier` is 1).
    #[serde(default)]
    pub input_format: Option<FixedPointFormat>,

    /// Full-scale range of the accelerometer in g, applied after decoding
    #[serde(default = "default_range_multiplier")]
    pub range_multiplier: f64,

    /// Unit of the acceleration fed to the pipeline
    #[serde(default)]
    pub unit: Unit,
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_range_multiplier() -> f64 {
    1.0
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            layout: CsvLayout::default(),
            delimiter: default_delimiter(),
            input_format: None,
            range_multiplier: default_range_multiplier(),
            unit: Unit::default(),
        }
    }
}

impl AcquisitionConfig {
    /// Delimiter as the byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        let mut chars = self.delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() => Ok(c as u8),
            _ => anyhow::bail!(
                "Delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ),
        }
    }

    /// Conversion applied to each raw value
    pub fn transform(&self) -> SampleTransform {
        SampleTransform {
            format: self.input_format,
            range_multiplier: self.range_multiplier,
            unit: self.unit,
        }
    }
}

// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Velocity processing configuration
//!
//! This module defines the parameters of the acceleration to velocity
//! pipeline: block geometry, filter band, window, scaling.

use serde::{Deserialize, Serialize};

use crate::preprocessing::WindowFunction;
use crate::spectral::{FilterBand, ScaleFunction};

/// Configuration for the velocity processing pipeline
///
/// One value of this structure fully describes how a block is turned into
/// velocity; nothing in the pipeline reads global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Sampling rate of the accelerometer in Hz
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: u32,

    /// Number of samples per processing block
    #[serde(default = "default_block_size")]
    pub block_size: usize,

    /// Lower bound of the integration band in Hz
    #[serde(default)]
    pub low_freq_hz: f64,

    /// Upper bound of the integration band in Hz
    ///
    /// Values above Nyquist keep every bin up to Nyquist.
    #[serde(default = "default_high_freq_hz")]
    pub high_freq_hz: f64,

    /// Window applied before the forward FFT
    #[serde(default)]
    pub window: WindowFunction,

    /// Multiplier applied to the velocity samples (e.g. 1000 for m/s to mm/s)
    #[serde(default = "default_unit_factor")]
    pub unit_factor: f64,

    /// Frequency-dependent correction applied to the acceleration spectrum
    #[serde(default)]
    pub scale: ScaleFunction,

    /// Subtract the block mean before the FFT of the analyzed spectrum
    ///
    /// Only the band-limited and velocity figures of a block analysis see
    /// this flag; `accel_rms_no_mean` always removes the mean and the
    /// velocity waveform drops the DC bin anyway.
    #[serde(default = "default_remove_mean")]
    pub remove_mean: bool,

    /// Treat a band keeping no frequency bin as an error
    #[serde(default)]
    pub strict_band: bool,
}

fn default_sampling_rate() -> u32 {
    1000
}

fn default_block_size() -> usize {
    512
}

fn default_high_freq_hz() -> f64 {
    1000.0
}

fn default_unit_factor() -> f64 {
    1.0
}

fn default_remove_mean() -> bool {
    true
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            sampling_rate: default_sampling_rate(),
            block_size: default_block_size(),
            low_freq_hz: 0.0,
            high_freq_hz: default_high_freq_hz(),
            window: WindowFunction::default(),
            unit_factor: default_unit_factor(),
            scale: ScaleFunction::default(),
            remove_mean: default_remove_mean(),
            strict_band: false,
        }
    }
}

impl ProcessingConfig {
    /// Integration band
    pub fn band(&self) -> FilterBand {
        FilterBand::new(self.low_freq_hz, self.high_freq_hz)
    }

    /// Sampling rate as a float, for spectral computations
    pub fn sampling_rate_hz(&self) -> f64 {
        self.sampling_rate as f64
    }

    /// Bin spacing in Hz
    pub fn resolution(&self) -> f64 {
        self.sampling_rate_hz() / self.block_size as f64
    }
}

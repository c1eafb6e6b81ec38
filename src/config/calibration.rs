// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Calibration reference configuration
//!
//! When enabled, the analysis of a recording made on a shaker table is
//! checked against the reference excitation.

use serde::{Deserialize, Serialize};

use crate::acquisition::Axis;

/// Reference excitation of a calibration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Check the analysis against the reference
    #[serde(default)]
    pub enabled: bool,

    /// Axis the shaker excites
    #[serde(default = "default_axis")]
    pub axis: Axis,

    /// Reference acceleration RMS, in the configured unit
    #[serde(default = "default_accel_rms")]
    pub accel_rms: f64,

    /// Excitation frequency in Hz
    #[serde(default = "default_frequency_hz")]
    pub frequency_hz: f64,

    /// Reference velocity RMS
    #[serde(default = "default_velocity_rms")]
    pub velocity_rms: f64,

    /// Accepted error in percent
    #[serde(default = "default_tolerance_pct")]
    pub tolerance_pct: f64,
}

fn default_axis() -> Axis {
    Axis::Z
}

fn default_accel_rms() -> f64 {
    2000.0
}

fn default_frequency_hz() -> f64 {
    80.0
}

fn default_velocity_rms() -> f64 {
    4.0
}

fn default_tolerance_pct() -> f64 {
    5.0
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            axis: default_axis(),
            accel_rms: default_accel_rms(),
            frequency_hz: default_frequency_hz(),
            velocity_rms: default_velocity_rms(),
            tolerance_pct: default_tolerance_pct(),
        }
    }
}

// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Window functions applied before the forward FFT
//!
//! Coefficients use the symmetric definition `w(i) = a − b·cos(2πi/(N−1))`.
//! A window attenuates the signal energy, so an RMS measured on a windowed
//! block has to be divided by [`WindowFunction::gain`] to be comparable with
//! an unwindowed one.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Available window functions
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum WindowFunction {
    /// Rectangular window, every coefficient is 1
    #[default]
    None,
    Hamming,
    Hann,
}

impl WindowFunction {
    /// Coefficient of sample `i` in a block of `n` samples
    ///
    /// Blocks of zero or one sample use 1.0.
    pub fn coefficient(&self, i: usize, n: usize) -> f64 {
        if n <= 1 {
            return 1.0;
        }
        let phase = 2.0 * PI * i as f64 / (n - 1) as f64;
        match self {
            WindowFunction::None => 1.0,
            WindowFunction::Hamming => 0.54 - 0.46 * phase.cos(),
            WindowFunction::Hann => 0.5 - 0.5 * phase.cos(),
        }
    }

    /// All coefficients for a block of `n` samples
    pub fn coefficients(&self, n: usize) -> Vec<f64> {
        (0..n).map(|i| self.coefficient(i, n)).collect()
    }

    /// RMS gain of the window
    ///
    /// These are fixed calibration constants, the square roots of the mean
    /// squared coefficients (0.3974 for Hamming, 0.375 for Hann).
    pub fn gain(&self) -> f64 {
        match self {
            WindowFunction::None => 1.0,
            WindowFunction::Hamming => 0.6303,
            WindowFunction::Hann => 0.6124,
        }
    }

    pub fn is_rectangular(&self) -> bool {
        matches!(self, WindowFunction::None)
    }

    /// Multiply each sample by its coefficient
    pub fn apply(&self, samples: &[f64]) -> Vec<f64> {
        if self.is_rectangular() {
            return samples.to_vec();
        }
        let n = samples.len();
        samples
            .iter()
            .enumerate()
            .map(|(i, &v)| v * self.coefficient(i, n))
            .collect()
    }

    /// Divide each sample by its coefficient, in place
    ///
    /// Samples whose coefficient is zero (the Hann end points) are left as is.
    pub fn invert(&self, samples: &mut [f64]) {
        if self.is_rectangular() {
            return;
        }
        let n = samples.len();
        for (i, value) in samples.iter_mut().enumerate() {
            let w = self.coefficient(i, n);
            if w.abs() > f64::EPSILON {
                *value /= w;
            }
        }
    }

    /// Upper-case name, as used by the firmware tooling
    pub fn name(&self) -> &'static str {
        match self {
            WindowFunction::None => "NONE",
            WindowFunction::Hamming => "HAMMING",
            WindowFunction::Hann => "HANN",
        }
    }
}

impl fmt::Display for WindowFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for WindowFunction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" | "RECTANGULAR" => Ok(WindowFunction::None),
            "HAMMING" => Ok(WindowFunction::Hamming),
            "HANN" | "HANNING" => Ok(WindowFunction::Hann),
            other => anyhow::bail!("Unknown window function '{}'", other),
        }
    }
}

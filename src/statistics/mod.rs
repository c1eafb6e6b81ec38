// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Signal statistics
//!
//! RMS is computed through the energy / power chain used by the calibration
//! benches:
//!
//! ```text
//! energy = Σ (v − m)² / fs
//! power  = energy / T            with T = N / fs
//! rms    = √power
//! ```
//!
//! where `m` is the block mean when it is removed, 0 otherwise. The result
//! equals the plain `√(Σ v² / N)` RMS and does not depend on `fs`.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::preprocessing::mean;

/// Energy of a block, `Σ (v − m)² / fs`
pub fn compute_signal_energy(values: &[f64], sampling_rate: f64, remove_mean: bool) -> f64 {
    let offset = if remove_mean { mean(values) } else { 0.0 };
    values.iter().map(|v| (v - offset).powi(2)).sum::<f64>() / sampling_rate
}

/// Mean power of a block, energy over duration
///
/// An empty block has no power.
pub fn compute_signal_power(values: &[f64], sampling_rate: f64, remove_mean: bool) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let duration = values.len() as f64 / sampling_rate;
    compute_signal_energy(values, sampling_rate, remove_mean) / duration
}

/// Root mean square of a block
pub fn compute_signal_rms(values: &[f64], sampling_rate: f64, remove_mean: bool) -> f64 {
    compute_signal_power(values, sampling_rate, remove_mean).sqrt()
}

/// RMS of the time signal behind a one-sided spectrum (Parseval)
///
/// The DC bin is ignored, so this is the RMS of the zero-mean signal. Every
/// other bin stands for itself and its mirror image, except the Nyquist bin
/// of an even block which has none.
pub fn rms_from_spectrum(bins: &[Complex64], block_size: usize) -> f64 {
    if block_size == 0 {
        return 0.0;
    }
    let nyquist = if block_size % 2 == 0 {
        Some(block_size / 2)
    } else {
        None
    };
    let sum: f64 = bins
        .iter()
        .enumerate()
        .skip(1)
        .map(|(k, bin)| {
            let weight = if Some(k) == nyquist { 1.0 } else { 2.0 };
            weight * bin.norm_sqr()
        })
        .sum();
    sum.sqrt() / block_size as f64
}

/// Combined magnitude of per-axis RMS values, `√(x² + y² + z²)`
pub fn combined_axis_rms(axis_rms: &[f64]) -> f64 {
    axis_rms.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Frequency of the pure tone that would give these RMS values
///
/// For a sine, `a_rms = 2πf · v_rms`. Zero velocity gives an infinite
/// frequency.
pub fn characteristic_frequency(accel_rms: f64, velocity_rms: f64) -> f64 {
    accel_rms / (2.0 * PI * velocity_rms)
}

/// Velocity RMS expected from a pure tone of acceleration RMS `accel_rms`
pub fn theoretical_velocity_rms(accel_rms: f64, frequency_hz: f64) -> f64 {
    accel_rms / (2.0 * PI * frequency_hz)
}

/// Signed error of `value` relative to `reference`, in percent
///
/// There is no relative error against a zero reference.
pub fn relative_error(value: f64, reference: f64) -> Option<f64> {
    if reference == 0.0 {
        return None;
    }
    Some(100.0 * (value - reference) / reference)
}

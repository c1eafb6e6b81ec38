// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).
//! Signal preprocessing module
//!
//! This module handles what happens to a block before the forward FFT:
//! mean removal and windowing.

pub mod window;

pub use window::WindowFunction;

/// Arithmetic mean, 0 for an empty slice
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Copy of `samples` with the mean subtracted
pub fn remove_mean(samples: &[f64]) -> Vec<f64> {
    let m = mean(samples);
    samples.iter().map(|v| v - m).collect()
}

/// Optional mean removal followed by windowing
pub fn prepare_block(samples: &[f64], window: WindowFunction, remove_mean_first: bool) -> Vec<f64> {
    if remove_mean_first {
        window.apply(&remove_mean(samples))
    } else {
        window.apply(samples)
    }
}

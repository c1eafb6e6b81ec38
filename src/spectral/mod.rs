// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).
//!
//! Spectral processing module
//!
//! This module handles the frequency-domain part of the pipeline: the real
//! FFT of a block, the optional front-end scale correction, band filtering
//! with integration, and the inverse transform.

mod fft;
mod integration;

pub use fft::{bin_count, compute_fft_and_scale, inverse, FftEngine, ScaleFunction, SpectrumBlock};
pub use integration::{filter_and_integrate, filter_band, FilterBand, IntegrationOrder};

/// Create an FFT engine with an empty plan cache
pub fn create_fft_engine() -> FftEngine {
    FftEngine::new()
}

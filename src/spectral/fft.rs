// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Real FFT of sample blocks
//!
//! Forward and inverse transforms go through `realfft`, which only keeps the
//! `N/2 + 1` non-redundant bins of a real signal. Neither direction is
//! normalized by the library: forward bins are raw sums (bin 0 is `N·mean`)
//! and the inverse is divided by `N` here.

use log::trace;
use num_complex::Complex64;
use realfft::RealFftPlanner;
use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::preprocessing::{prepare_block, WindowFunction};

/// Frequency-dependent gain applied to each bin after the forward FFT
///
/// `Quadratic` replicates the sensor front-end correction
/// `1 + a·f + b·f²` used by the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScaleFunction {
    #[default]
    Identity,
    Quadratic { a: f64, b: f64 },
}

impl ScaleFunction {
    /// Correction of the reference hardware front end
    pub const TEENSY: ScaleFunction = ScaleFunction::Quadratic {
        a: 0.00136192,
        b: 2.7787264e-05,
    };

    /// Gain at frequency `frequency_hz`
    pub fn factor(&self, frequency_hz: f64) -> f64 {
        match self {
            ScaleFunction::Identity => 1.0,
            ScaleFunction::Quadratic { a, b } => 1.0 + a * frequency_hz + b * frequency_hz * frequency_hz,
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, ScaleFunction::Identity)
    }
}

/// One-sided spectrum of a real block
///
/// Holds `N/2 + 1` bins; bin `k` is at `k · fs / N`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumBlock {
    bins: Vec<Complex64>,
    block_size: usize,
    sampling_rate: f64,
}

impl SpectrumBlock {
    /// Wrap existing bins, checking the bin count against `block_size`
    pub fn new(bins: Vec<Complex64>, block_size: usize, sampling_rate: f64) -> Result<Self> {
        check_sampling_rate(sampling_rate)?;
        let expected = bin_count(block_size);
        if bins.len() != expected {
            return Err(ProcessingError::SpectrumLength {
                block_size,
                expected,
                actual: bins.len(),
            });
        }
        Ok(Self {
            bins,
            block_size,
            sampling_rate,
        })
    }

    pub fn bins(&self) -> &[Complex64] {
        &self.bins
    }

    pub fn bins_mut(&mut self) -> &mut [Complex64] {
        &mut self.bins
    }

    pub fn into_bins(self) -> Vec<Complex64> {
        self.bins
    }

    /// Length N of the time-domain block
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    /// Bin spacing `fs / N` in Hz
    pub fn resolution(&self) -> f64 {
        self.sampling_rate / self.block_size as f64
    }

    /// Frequency of bin `k` in Hz
    pub fn frequency_of(&self, k: usize) -> f64 {
        k as f64 * self.resolution()
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Bin of largest magnitude, DC excluded
    ///
    /// Returns `None` when the spectrum has no bin above DC or is all zero.
    pub fn peak_bin(&self) -> Option<usize> {
        self.bins
            .iter()
            .enumerate()
            .skip(1)
            .map(|(k, c)| (k, c.norm_sqr()))
            .filter(|(_, power)| *power > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(k, _)| k)
    }

    /// Frequency of [`peak_bin`](Self::peak_bin) in Hz
    pub fn peak_frequency(&self) -> Option<f64> {
        self.peak_bin().map(|k| self.frequency_of(k))
    }
}

/// Number of one-sided bins for a block of `block_size` samples
pub fn bin_count(block_size: usize) -> usize {
    block_size / 2 + 1
}

pub(crate) fn check_sampling_rate(sampling_rate: f64) -> Result<()> {
    if !sampling_rate.is_finite() || sampling_rate <= 0.0 {
        return Err(ProcessingError::InvalidSamplingRate(sampling_rate));
    }
    Ok(())
}

/// FFT engine keeping its plans between blocks
///
/// Planning is the expensive part of an FFT; a processor handling many
/// blocks of the same size should keep one engine around.
pub struct FftEngine {
    planner: RealFftPlanner<f64>,
}

impl Default for FftEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FftEngine {
    pub fn new() -> Self {
        Self {
            planner: RealFftPlanner::<f64>::new(),
        }
    }

    /// Forward real FFT, returning `N/2 + 1` unnormalized bins
    pub fn forward(&mut self, samples: &[f64]) -> Result<Vec<Complex64>> {
        if samples.is_empty() {
            return Err(ProcessingError::EmptyBlock);
        }
        let r2c = self.planner.plan_fft_forward(samples.len());
        let mut input = r2c.make_input_vec();
        input.copy_from_slice(samples);
        let mut spectrum = r2c.make_output_vec();
        r2c.process(&mut input, &mut spectrum)?;
        Ok(spectrum)
    }

    /// Inverse real FFT back to `block_size` samples, normalized by `1/N`
    ///
    /// The imaginary parts of the DC bin and, for even sizes, of the Nyquist
    /// bin have no real-signal counterpart and are dropped.
    pub fn inverse(&mut self, bins: &[Complex64], block_size: usize) -> Result<Vec<f64>> {
        if block_size == 0 {
            return Err(ProcessingError::EmptyBlock);
        }
        let expected = bin_count(block_size);
        if bins.len() != expected {
            return Err(ProcessingError::SpectrumLength {
                block_size,
                expected,
                actual: bins.len(),
            });
        }

        let c2r = self.planner.plan_fft_inverse(block_size);
        let mut spectrum = bins.to_vec();
        spectrum[0].im = 0.0;
        if block_size % 2 == 0 {
            spectrum[expected - 1].im = 0.0;
        }
        let mut output = c2r.make_output_vec();
        c2r.process(&mut spectrum, &mut output)?;

        let norm = block_size as f64;
        for value in output.iter_mut() {
            *value /= norm;
        }
        Ok(output)
    }

    /// Window, transform and scale one block
    ///
    /// The mean is subtracted first when `remove_mean` is set, then the
    /// window is applied, then each bin `k` is multiplied by
    /// `scale(k · fs / N)`.
    pub fn compute_fft_and_scale(
        &mut self,
        samples: &[f64],
        sampling_rate: f64,
        window: WindowFunction,
        remove_mean: bool,
        scale: &ScaleFunction,
    ) -> Result<SpectrumBlock> {
        check_sampling_rate(sampling_rate)?;
        if samples.is_empty() {
            return Err(ProcessingError::EmptyBlock);
        }
        let prepared = prepare_block(samples, window, remove_mean);
        let mut bins = self.forward(&prepared)?;

        if !scale.is_identity() {
            let df = sampling_rate / samples.len() as f64;
            for (k, bin) in bins.iter_mut().enumerate() {
                *bin *= scale.factor(k as f64 * df);
            }
        }
        trace!(
            "FFT of {} samples ({} window, mean removed: {})",
            samples.len(),
            window,
            remove_mean
        );
        SpectrumBlock::new(bins, samples.len(), sampling_rate)
    }

    /// Inverse of a [`SpectrumBlock`]
    pub fn inverse_block(&mut self, spectrum: &SpectrumBlock) -> Result<Vec<f64>> {
        self.inverse(spectrum.bins(), spectrum.block_size())
    }
}

/// Window, transform and scale one block with a throwaway planner
pub fn compute_fft_and_scale(
    samples: &[f64],
    sampling_rate: f64,
    window: WindowFunction,
    remove_mean: bool,
    scale: &ScaleFunction,
) -> Result<SpectrumBlock> {
    FftEngine::new().compute_fft_and_scale(samples, sampling_rate, window, remove_mean, scale)
}

/// Inverse real FFT of a spectrum back to its original block length
pub fn inverse(spectrum: &SpectrumBlock) -> Result<Vec<f64>> {
    FftEngine::new().inverse_block(spectrum)
}

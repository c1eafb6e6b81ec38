// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Acceleration to velocity pipeline
//!
//! A block goes through:
//!
//! 1. optional window, forward real FFT (the mean is kept, the DC bin is
//!    dropped by the band filter anyway)
//! 2. band filter and integration, `X(f) / (j2πf)`
//! 3. inverse real FFT
//! 4. division by the window coefficients, sample by sample
//! 5. multiplication by the unit factor
//!
//! Blocks are independent; nothing is carried from one block to the next.
//!
//! ```
//! use rust_vibration::preprocessing::WindowFunction;
//! use rust_vibration::processing::compute_full_velocity;
//! use rust_vibration::utility::ToneSpec;
//!
//! let accel = ToneSpec::from_rms(2000.0, 78.125).generate(1000, 512);
//! let velocity =
//!     compute_full_velocity(&accel, 1000.0, 0.0, 1000.0, 1.0, WindowFunction::None).unwrap();
//! assert_eq!(velocity.len(), 512);
//! ```

mod result;

use chrono::Utc;
use log::{debug, warn};

pub use result::{BlockAnalysis, CombinedBlock, RecordingAnalysis};

use crate::acquisition::{Axis, SampleBlock, TriaxialSamples};
use crate::config::ProcessingConfig;
use crate::error::{ProcessingError, Result};
use crate::preprocessing::WindowFunction;
use crate::spectral::{create_fft_engine, FftEngine, FilterBand, IntegrationOrder, ScaleFunction};
use crate::statistics::{
    characteristic_frequency, combined_axis_rms, compute_signal_rms, rms_from_spectrum,
};

/// Everything needed to integrate one block
struct IntegrationParams {
    sampling_rate: f64,
    band: FilterBand,
    window: WindowFunction,
    unit_factor: f64,
    scale: ScaleFunction,
    order: IntegrationOrder,
    strict: bool,
}

fn integrate_block(engine: &mut FftEngine, samples: &[f64], params: &IntegrationParams) -> Result<Vec<f64>> {
    let spectrum =
        engine.compute_fft_and_scale(samples, params.sampling_rate, params.window, false, &params.scale)?;
    let integrated = spectrum.integrate(params.band, params.order, params.strict)?;
    let mut values = engine.inverse_block(&integrated)?;
    params.window.invert(&mut values);
    if params.unit_factor != 1.0 {
        for value in values.iter_mut() {
            *value *= params.unit_factor;
        }
    }
    Ok(values)
}

/// Velocity of an acceleration block
///
/// A band that keeps no bin gives an all-zero velocity.
pub fn compute_full_velocity(
    accel: &[f64],
    sampling_rate: f64,
    low_hz: f64,
    high_hz: f64,
    unit_factor: f64,
    window: WindowFunction,
) -> Result<Vec<f64>> {
    let params = IntegrationParams {
        sampling_rate,
        band: FilterBand::new(low_hz, high_hz),
        window,
        unit_factor,
        scale: ScaleFunction::Identity,
        order: IntegrationOrder::Velocity,
        strict: false,
    };
    integrate_block(&mut FftEngine::new(), accel, &params)
}

/// Displacement of an acceleration block (double integration)
pub fn compute_full_displacement(
    accel: &[f64],
    sampling_rate: f64,
    low_hz: f64,
    high_hz: f64,
    unit_factor: f64,
    window: WindowFunction,
) -> Result<Vec<f64>> {
    let params = IntegrationParams {
        sampling_rate,
        band: FilterBand::new(low_hz, high_hz),
        window,
        unit_factor,
        scale: ScaleFunction::Identity,
        order: IntegrationOrder::Displacement,
        strict: false,
    };
    integrate_block(&mut FftEngine::new(), accel, &params)
}

/// Block processor bound to one [`ProcessingConfig`]
///
/// Keeps its FFT plans between blocks. Every block must have exactly
/// `block_size` samples.
pub struct VelocityProcessor {
    config: ProcessingConfig,
    engine: FftEngine,
}

impl VelocityProcessor {
    pub fn new(config: ProcessingConfig) -> Result<Self> {
        if config.sampling_rate == 0 {
            return Err(ProcessingError::InvalidSamplingRate(0.0));
        }
        if config.block_size == 0 {
            return Err(ProcessingError::EmptyBlock);
        }
        Ok(Self {
            config,
            engine: create_fft_engine(),
        })
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    fn check_block(&self, samples: &[f64]) -> Result<()> {
        if samples.len() != self.config.block_size {
            return Err(ProcessingError::BlockLength {
                expected: self.config.block_size,
                actual: samples.len(),
            });
        }
        Ok(())
    }

    fn params(&self, order: IntegrationOrder) -> IntegrationParams {
        IntegrationParams {
            sampling_rate: self.config.sampling_rate_hz(),
            band: self.config.band(),
            window: self.config.window,
            unit_factor: self.config.unit_factor,
            scale: self.config.scale,
            order,
            strict: self.config.strict_band,
        }
    }

    /// Velocity samples of one block
    pub fn velocity(&mut self, samples: &[f64]) -> Result<Vec<f64>> {
        self.check_block(samples)?;
        let params = self.params(IntegrationOrder::Velocity);
        integrate_block(&mut self.engine, samples, &params)
    }

    /// Displacement samples of one block
    pub fn displacement(&mut self, samples: &[f64]) -> Result<Vec<f64>> {
        self.check_block(samples)?;
        let params = self.params(IntegrationOrder::Displacement);
        integrate_block(&mut self.engine, samples, &params)
    }

    /// RMS figures of one block
    ///
    /// The velocity RMS is taken on the integrated spectrum of the windowed
    /// block and divided by the window gain, so it stays comparable with
    /// an unwindowed measurement. The per-sample inversion used by
    /// [`velocity`](Self::velocity) is not applied here; it blows up where
    /// the window approaches zero.
    pub fn analyze_block(&mut self, block: &SampleBlock, index: usize) -> Result<BlockAnalysis> {
        let samples = block.samples();
        self.check_block(samples)?;
        if block.sampling_rate() != self.config.sampling_rate {
            warn!(
                "Block sampled at {} Hz analyzed with a {} Hz configuration",
                block.sampling_rate(),
                self.config.sampling_rate
            );
        }

        let fs = self.config.sampling_rate_hz();
        let window = self.config.window;
        let gain = window.gain();
        let band = self.config.band();
        let strict = self.config.strict_band;
        let n = samples.len();

        let accel_rms = compute_signal_rms(samples, fs, false);
        let accel_rms_no_mean = compute_signal_rms(samples, fs, true);

        let spectrum = self.engine.compute_fft_and_scale(
            samples,
            fs,
            window,
            self.config.remove_mean,
            &self.config.scale,
        )?;

        let filtered = spectrum.band_limited(band, strict)?;
        let filtered_accel_rms = rms_from_spectrum(filtered.bins(), n) / gain;

        let velocity = spectrum.integrate(band, IntegrationOrder::Velocity, strict)?;
        let velocity_rms = rms_from_spectrum(velocity.bins(), n) / gain * self.config.unit_factor.abs();

        let dominant_frequency_hz = filtered.peak_frequency();
        let characteristic_frequency_hz = if velocity_rms > 0.0 {
            Some(characteristic_frequency(
                filtered_accel_rms,
                velocity_rms / self.config.unit_factor.abs(),
            ))
        } else {
            None
        };

        debug!(
            "Axis {} block {}: accel RMS {:.4}, velocity RMS {:.4}",
            block.axis(),
            index,
            accel_rms_no_mean,
            velocity_rms
        );

        Ok(BlockAnalysis {
            axis: block.axis(),
            index,
            accel_rms,
            accel_rms_no_mean,
            filtered_accel_rms,
            velocity_rms,
            dominant_frequency_hz,
            characteristic_frequency_hz,
        })
    }

    /// Split a recording into blocks and analyze every block of every axis
    ///
    /// Trailing samples that do not fill a block on every axis are ignored.
    pub fn analyze_recording(&mut self, recording: &TriaxialSamples) -> Result<RecordingAnalysis> {
        let block_size = self.config.block_size;
        let sampling_rate = self.config.sampling_rate;
        let count = recording.block_count(block_size);
        debug!(
            "Analyzing {} block(s) of {} samples per axis",
            count, block_size
        );

        let mut per_axis: Vec<Vec<BlockAnalysis>> = Vec::with_capacity(Axis::ALL.len());
        for axis in Axis::ALL {
            let axis_blocks = recording
                .blocks(axis, block_size, sampling_rate)
                .iter()
                .enumerate()
                .map(|(index, block)| self.analyze_block(block, index))
                .collect::<Result<Vec<_>>>()?;
            per_axis.push(axis_blocks);
        }

        let combined = (0..count)
            .map(|index| {
                let at_index: Vec<&BlockAnalysis> =
                    per_axis.iter().filter_map(|blocks| blocks.get(index)).collect();
                let accel: Vec<f64> = at_index.iter().map(|b| b.accel_rms_no_mean).collect();
                let velocity: Vec<f64> = at_index.iter().map(|b| b.velocity_rms).collect();
                CombinedBlock {
                    index,
                    accel_rms: combined_axis_rms(&accel),
                    velocity_rms: combined_axis_rms(&velocity),
                }
            })
            .collect();
        let blocks: Vec<BlockAnalysis> = per_axis.into_iter().flatten().collect();

        Ok(RecordingAnalysis {
            timestamp: Utc::now(),
            sampling_rate,
            block_size,
            window: self.config.window,
            band: self.config.band(),
            blocks,
            combined,
        })
    }
}

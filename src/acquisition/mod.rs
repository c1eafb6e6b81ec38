// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Sample acquisition module
//!
//! This module turns what the collectors produce (CSV dumps of raw or
//! converted accelerometer values, fixed-point byte buffers) into
//! tri-axial sample series ready to be split into processing blocks.

pub mod block;
pub mod csv_source;
pub mod fixed_point;

use std::path::Path;

use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};

pub use block::{Axis, SampleBlock, TriaxialSamples};
pub use csv_source::{CsvLayout, CsvSource};
pub use fixed_point::{FixedPointFormat, Unit};

use crate::config::AcquisitionConfig;
use crate::utility::signal_generator::{SignalGenerator, ToneSpec};

/// Represents a source of tri-axial accelerometer samples
pub trait SampleSource: Send {
    /// Read the whole recording
    fn read_samples(&mut self) -> Result<TriaxialSamples>;

    /// Get the sampling rate of this source in Hz
    fn sampling_rate(&self) -> u32;
}

/// Conversion applied to each raw value at load time
///
/// The raw value is optionally decoded from fixed point (giving g), multiplied
/// by the accelerometer range multiplier (the firmware stores ±4 g readings
/// as Q15 of the reading / 4) and converted from g to the target unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleTransform {
    /// Fixed-point format of the raw values, `None` when already in g
    pub format: Option<FixedPointFormat>,
    /// Multiplier applied after decoding
    pub range_multiplier: f64,
    /// Unit of the produced samples
    pub unit: Unit,
}

impl Default for SampleTransform {
    fn default() -> Self {
        Self {
            format: None,
            range_multiplier: 1.0,
            unit: Unit::G,
        }
    }
}

impl SampleTransform {
    pub fn apply(&self, raw: f64) -> f64 {
        let g = match self.format {
            Some(format) => raw / format.scale(),
            None => raw,
        };
        g * self.range_multiplier * self.unit.factor_from_g()
    }

    pub fn is_identity(&self) -> bool {
        self.format.is_none() && self.range_multiplier == 1.0 && self.unit == Unit::G
    }
}

/// Sample source producing tones and noise, for bench setups without a shaker
pub struct SyntheticSource {
    generator: SignalGenerator,
    sampling_rate: u32,
    sample_count: usize,
    tones: Vec<(Axis, ToneSpec)>,
    noise_rms: f64,
}

impl SyntheticSource {
    pub fn new(seed: u32, sampling_rate: u32, sample_count: usize) -> Self {
        Self {
            generator: SignalGenerator::new(seed),
            sampling_rate,
            sample_count,
            tones: Vec::new(),
            noise_rms: 0.0,
        }
    }

    /// Add a tone on one axis
    pub fn with_tone(mut self, axis: Axis, tone: ToneSpec) -> Self {
        self.tones.push((axis, tone));
        self
    }

    /// Add Gaussian noise of the given RMS on every axis
    pub fn with_noise(mut self, noise_rms: f64) -> Self {
        self.noise_rms = noise_rms;
        self
    }
}

impl SampleSource for SyntheticSource {
    fn read_samples(&mut self) -> Result<TriaxialSamples> {
        let mut samples = TriaxialSamples::new(
            vec![0.0; self.sample_count],
            vec![0.0; self.sample_count],
            vec![0.0; self.sample_count],
        );
        for (axis, tone) in &self.tones {
            let signal = tone.generate(self.sampling_rate, self.sample_count);
            for (value, tone_value) in samples.axis_mut(*axis).iter_mut().zip(signal) {
                *value += tone_value;
            }
        }
        if self.noise_rms > 0.0 {
            for axis in Axis::ALL {
                let noise = self.generator.generate_noise(self.sample_count, self.noise_rms);
                for (value, n) in samples.axis_mut(axis).iter_mut().zip(noise) {
                    *value += n;
                }
            }
        }
        Ok(samples)
    }

    fn sampling_rate(&self) -> u32 {
        self.sampling_rate
    }
}

/// Get a sample source for the CSV recording at `path`
pub fn get_sample_source_from_file<P: AsRef<Path>>(
    path: P,
    config: &AcquisitionConfig,
    sampling_rate: u32,
) -> Result<Box<dyn SampleSource>> {
    info!("Using recording: {}", path.as_ref().display());
    let source = CsvSource::new(path, config.layout, sampling_rate)
        .with_delimiter(config.delimiter_byte()?)
        .with_transform(config.transform());
    Ok(Box::new(source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_q15_to_mms2() {
        let transform = SampleTransform {
            format: Some(FixedPointFormat::Q15),
            range_multiplier: 4.0,
            unit: Unit::MillimetersPerSecond2,
        };
        // 8192 / 32768 * 4 = 1 g
        assert!((transform.apply(8192.0) - 9806.65).abs() < 1e-9);
        assert!(!transform.is_identity());
        assert!(SampleTransform::default().is_identity());
    }

    #[test]
    fn test_synthetic_source() {
        let mut source = SyntheticSource::new(42, 1000, 512)
            .with_tone(Axis::Z, ToneSpec::from_rms(100.0, 80.0));
        let samples = source.read_samples().unwrap();
        assert_eq!(samples.z.len(), 512);
        assert!(samples.x.iter().all(|&v| v == 0.0));
        assert!(samples.z.iter().any(|&v| v != 0.0));
        assert_eq!(source.sampling_rate(), 1000);
    }
}

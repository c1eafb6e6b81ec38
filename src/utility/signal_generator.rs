// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Synthetic Vibration Signals
//!
//! Test tones and Gaussian noise for exercising the velocity pipeline without
//! a shaker table. Calibration fixtures are described by an acceleration RMS
//! and a frequency (e.g. 2000 mm/s² at 80 Hz), so tones can be built directly
//! from an RMS value.
//!
//! ## Examples
//!
//! ```rust
//! use rust_vibration::utility::signal_generator::{SignalGenerator, ToneSpec};
//!
//! // 2000 mm/s² RMS at 80 Hz, 512 samples at 1 kHz
//! let tone = ToneSpec::from_rms(2000.0, 80.0);
//! let accel = tone.generate(1000, 512);
//! assert_eq!(accel.len(), 512);
//!
//! // Add reproducible noise
//! let mut generator = SignalGenerator::new(12345);
//! let noise = generator.generate_noise(512, 10.0);
//! ```

use std::f64::consts::PI;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Shape of a test tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Cosine,
    Sine,
}

/// A pure tone `amplitude · cos(2π f t + phase)` (or sine)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneSpec {
    /// Peak amplitude
    pub amplitude: f64,
    /// Frequency in Hz
    pub frequency_hz: f64,
    /// Phase offset in radians
    #[serde(default)]
    pub phase: f64,
    #[serde(default)]
    pub waveform: Waveform,
}

impl ToneSpec {
    pub fn new(amplitude: f64, frequency_hz: f64) -> Self {
        Self {
            amplitude,
            frequency_hz,
            phase: 0.0,
            waveform: Waveform::Cosine,
        }
    }

    /// Build a cosine tone whose RMS is `rms`
    pub fn from_rms(rms: f64, frequency_hz: f64) -> Self {
        Self::new(rms * std::f64::consts::SQRT_2, frequency_hz)
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = phase;
        self
    }

    /// Theoretical RMS of the tone over a whole number of periods
    pub fn rms(&self) -> f64 {
        self.amplitude / std::f64::consts::SQRT_2
    }

    /// Value at time `t` in seconds
    pub fn value_at(&self, t: f64) -> f64 {
        let angle = 2.0 * PI * self.frequency_hz * t + self.phase;
        match self.waveform {
            Waveform::Cosine => self.amplitude * angle.cos(),
            Waveform::Sine => self.amplitude * angle.sin(),
        }
    }

    /// Sample the tone `sample_count` times at `sampling_rate`
    pub fn generate(&self, sampling_rate: u32, sample_count: usize) -> Vec<f64> {
        let dt = 1.0 / sampling_rate as f64;
        (0..sample_count)
            .map(|i| self.value_at(i as f64 * dt))
            .collect()
    }
}

/// Random number generator using the XORShift algorithm
///
/// Fast and reproducible, not suitable for anything cryptographic.
pub struct SignalGenerator {
    rng_state: u32,
}

impl SignalGenerator {
    /// Create a generator from a seed; the same seed gives the same sequence
    pub fn new(seed: u32) -> Self {
        // XORShift never leaves the all-zero state
        let rng_state = if seed == 0 { 0x9E37_79B9 } else { seed };
        Self { rng_state }
    }

    pub fn new_from_system_time() -> Self {
        let seed = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_millis() as u32)
            .unwrap_or(1);
        Self::new(seed)
    }

    /// Uniform value in [-1, 1]
    pub fn random_float(&mut self) -> f64 {
        self.rng_state ^= self.rng_state << 13;
        self.rng_state ^= self.rng_state >> 17;
        self.rng_state ^= self.rng_state << 5;

        (self.rng_state as f64 / u32::MAX as f64) * 2.0 - 1.0
    }

    /// Standard normal value (Box-Muller)
    pub fn random_gaussian(&mut self) -> f64 {
        let u1 = (self.random_float() + 1.0) / 2.0;
        let u2 = (self.random_float() + 1.0) / 2.0;

        // Avoid ln(0)
        let u1 = u1.max(1e-12);

        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Gaussian white noise with the given RMS
    pub fn generate_noise(&mut self, sample_count: usize, rms: f64) -> Vec<f64> {
        (0..sample_count)
            .map(|_| self.random_gaussian() * rms)
            .collect()
    }

    /// A tone with additive Gaussian noise
    pub fn generate_noisy_tone(
        &mut self,
        tone: &ToneSpec,
        sampling_rate: u32,
        sample_count: usize,
        noise_rms: f64,
    ) -> Vec<f64> {
        tone.generate(sampling_rate, sample_count)
            .into_iter()
            .map(|v| v + self.random_gaussian() * noise_rms)
            .collect()
    }
}

/// Quantize values in g to Q15 the way the firmware stores them
///
/// `range_multiplier` is the accelerometer full scale in g (values are stored
/// as `value / range`). Out-of-range values saturate.
pub fn quantize_q15(values_in_g: &[f64], range_multiplier: f64) -> Vec<i16> {
    values_in_g
        .iter()
        .map(|&v| (v / range_multiplier * 32768.0).round().clamp(-32768.0, 32767.0) as i16)
        .collect()
}

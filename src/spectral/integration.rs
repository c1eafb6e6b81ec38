// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Band filtering and integration in the frequency domain
//!
//! Integrating a signal once divides its spectrum by `jω`, twice by `(jω)²`.
//! Bins outside the requested band, and always the DC bin, are zeroed: a
//! constant offset in acceleration would otherwise turn into an unbounded
//! drift in velocity.
//!
//! The retained bins are `[min_idx, max_idx)` with
//!
//! ```text
//! df      = fs / N
//! min_idx = max(ceil(low / df), 1)
//! max_idx = min(floor(high / df), bins)
//! ```

use std::ops::Range;

use log::debug;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::fft::{bin_count, check_sampling_rate, SpectrumBlock};
use crate::error::{ProcessingError, Result};

/// How many times the spectrum is integrated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationOrder {
    /// Acceleration to velocity
    Velocity,
    /// Acceleration to displacement
    Displacement,
}

impl IntegrationOrder {
    pub fn exponent(&self) -> u32 {
        match self {
            IntegrationOrder::Velocity => 1,
            IntegrationOrder::Displacement => 2,
        }
    }
}

/// Pass band in Hz
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterBand {
    pub low_hz: f64,
    pub high_hz: f64,
}

impl FilterBand {
    pub fn new(low_hz: f64, high_hz: f64) -> Self {
        Self { low_hz, high_hz }
    }

    /// Bins kept for a spectrum of `bins` bins computed on `block_size`
    /// samples at `sampling_rate`
    ///
    /// The range is empty when the band retains nothing (inverted bounds,
    /// band below the first bin, ...). Bounds beyond Nyquist are clamped.
    pub fn bin_range(&self, block_size: usize, sampling_rate: f64, bins: usize) -> Range<usize> {
        let df = sampling_rate / block_size as f64;
        let min_idx = (self.low_hz / df).ceil().max(1.0);
        let max_idx = (self.high_hz / df).floor().max(0.0);
        // Saturating float to int casts keep huge bounds at usize::MAX
        let min_idx = min_idx as usize;
        let max_idx = (max_idx as usize).min(bins);
        if min_idx >= max_idx {
            return 0..0;
        }
        min_idx..max_idx
    }

    /// Reject bands that keep no bin
    pub fn check_retains_bins(&self, block_size: usize, sampling_rate: f64, bins: usize) -> Result<()> {
        if self.low_hz >= self.high_hz || self.bin_range(block_size, sampling_rate, bins).is_empty() {
            return Err(ProcessingError::EmptyPassband {
                low_hz: self.low_hz,
                high_hz: self.high_hz,
            });
        }
        Ok(())
    }
}

fn check_layout(spectrum: &[Complex64], block_size: usize, sampling_rate: f64) -> Result<()> {
    check_sampling_rate(sampling_rate)?;
    if block_size == 0 {
        return Err(ProcessingError::EmptyBlock);
    }
    let expected = bin_count(block_size);
    if spectrum.len() != expected {
        return Err(ProcessingError::SpectrumLength {
            block_size,
            expected,
            actual: spectrum.len(),
        });
    }
    Ok(())
}

/// Zero the bins outside `band` and divide the others by `(jω)^exponent`
fn apply_band(
    spectrum: &[Complex64],
    block_size: usize,
    sampling_rate: f64,
    band: FilterBand,
    exponent: u32,
) -> Result<Vec<Complex64>> {
    check_layout(spectrum, block_size, sampling_rate)?;
    let df = sampling_rate / block_size as f64;
    let range = band.bin_range(block_size, sampling_rate, spectrum.len());
    if range.is_empty() {
        debug!(
            "Band {} Hz - {} Hz keeps no bin (df = {} Hz)",
            band.low_hz, band.high_hz, df
        );
    }

    let zero = Complex64::new(0.0, 0.0);
    let output = spectrum
        .iter()
        .enumerate()
        .map(|(k, &bin)| {
            if !range.contains(&k) {
                return zero;
            }
            // k is at least 1 inside the range; the guard keeps bin 0 finite
            let omega = 2.0 * std::f64::consts::PI * df * k.max(1) as f64;
            match exponent {
                0 => bin,
                1 => bin / Complex64::new(0.0, omega),
                2 => bin / Complex64::new(-omega * omega, 0.0),
                n => bin / Complex64::new(0.0, omega).powu(n),
            }
        })
        .collect();
    Ok(output)
}

/// Band-limit and integrate a one-sided spectrum
///
/// `spectrum` must hold `block_size / 2 + 1` bins. Bins below
/// `min_idx` and from `max_idx` on are set to zero; the others are divided
/// by `(j·2π·k·df)^order`. A band that keeps no bin gives an all-zero
/// spectrum.
pub fn filter_and_integrate(
    spectrum: &[Complex64],
    block_size: usize,
    sampling_rate: f64,
    low_hz: f64,
    high_hz: f64,
    order: IntegrationOrder,
) -> Result<Vec<Complex64>> {
    apply_band(
        spectrum,
        block_size,
        sampling_rate,
        FilterBand::new(low_hz, high_hz),
        order.exponent(),
    )
}

/// Band-limit a one-sided spectrum without integrating
///
/// Same bin selection as [`filter_and_integrate`], DC always removed.
pub fn filter_band(
    spectrum: &[Complex64],
    block_size: usize,
    sampling_rate: f64,
    band: FilterBand,
) -> Result<Vec<Complex64>> {
    apply_band(spectrum, block_size, sampling_rate, band, 0)
}

impl SpectrumBlock {
    /// Band-limited, integrated copy of this spectrum
    ///
    /// With `strict` set, a band that keeps no bin is an
    /// [`ProcessingError::EmptyPassband`] error instead of a zero spectrum.
    pub fn integrate(&self, band: FilterBand, order: IntegrationOrder, strict: bool) -> Result<SpectrumBlock> {
        if strict {
            band.check_retains_bins(self.block_size(), self.sampling_rate(), self.len())?;
        }
        let bins = filter_and_integrate(
            self.bins(),
            self.block_size(),
            self.sampling_rate(),
            band.low_hz,
            band.high_hz,
            order,
        )?;
        SpectrumBlock::new(bins, self.block_size(), self.sampling_rate())
    }

    /// Band-limited copy of this spectrum
    pub fn band_limited(&self, band: FilterBand, strict: bool) -> Result<SpectrumBlock> {
        if strict {
            band.check_retains_bins(self.block_size(), self.sampling_rate(), self.len())?;
        }
        let bins = filter_band(self.bins(), self.block_size(), self.sampling_rate(), band)?;
        SpectrumBlock::new(bins, self.block_size(), self.sampling_rate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::WindowFunction;
    use crate::spectral::fft::{compute_fft_and_scale, inverse, ScaleFunction};
    use std::f64::consts::PI;

    const FS: f64 = 1000.0;
    const N: usize = 512;

    fn cosine(amplitude: f64, frequency: f64) -> Vec<f64> {
        (0..N)
            .map(|i| amplitude * (2.0 * PI * frequency * i as f64 / FS).cos())
            .collect()
    }

    fn spectrum_of(signal: &[f64]) -> SpectrumBlock {
        compute_fft_and_scale(signal, FS, WindowFunction::None, false, &ScaleFunction::Identity).unwrap()
    }

    #[test]
    fn test_bin_range() {
        let band = FilterBand::new(0.0, 1000.0);
        // High bound past Nyquist is clamped to the bin count
        assert_eq!(band.bin_range(N, FS, 257), 1..257);
        // 10 Hz / 1.953125 = 5.12 -> 6 ; 100 / 1.953125 = 51.2 -> 51
        assert_eq!(FilterBand::new(10.0, 100.0).bin_range(N, FS, 257), 6..51);
        assert!(FilterBand::new(200.0, 100.0).bin_range(N, FS, 257).is_empty());
        assert!(FilterBand::new(-50.0, -10.0).bin_range(N, FS, 257).is_empty());
        // 3 Hz floors to bin 1, which is also the first bin kept
        assert!(FilterBand::new(-50.0, 3.0).bin_range(N, FS, 257).is_empty());
    }

    #[test]
    fn test_velocity_of_bin_centred_tone() {
        // Bin 40: 78.125 Hz
        let f = 78.125;
        let amplitude = 2000.0;
        let spectrum = spectrum_of(&cosine(amplitude, f));
        let velocity = spectrum
            .integrate(FilterBand::new(0.0, 1000.0), IntegrationOrder::Velocity, false)
            .unwrap();
        let v = inverse(&velocity).unwrap();

        // cos integrates to sin / ω
        let omega = 2.0 * PI * f;
        for (i, value) in v.iter().enumerate() {
            let expected = amplitude / omega * (omega * i as f64 / FS).sin();
            assert!((value - expected).abs() < 1e-6, "sample {}: {} vs {}", i, value, expected);
        }
    }

    #[test]
    fn test_displacement_of_bin_centred_tone() {
        let f = 78.125;
        let spectrum = spectrum_of(&cosine(1.0, f));
        let displacement = spectrum
            .integrate(FilterBand::new(0.0, 1000.0), IntegrationOrder::Displacement, false)
            .unwrap();
        let d = inverse(&displacement).unwrap();
        let omega = 2.0 * PI * f;
        // Double integration of cos is -cos / ω²
        for (i, value) in d.iter().enumerate() {
            let expected = -(omega * i as f64 / FS).cos() / (omega * omega);
            assert!((value - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_dc_always_removed() {
        let signal: Vec<f64> = cosine(1.0, 78.125).iter().map(|v| v + 50.0).collect();
        let spectrum = spectrum_of(&signal);
        let filtered = filter_and_integrate(spectrum.bins(), N, FS, 0.0, 1000.0, IntegrationOrder::Velocity).unwrap();
        assert_eq!(filtered[0], Complex64::new(0.0, 0.0));
        let banded = filter_band(spectrum.bins(), N, FS, FilterBand::new(-10.0, 1000.0)).unwrap();
        assert_eq!(banded[0], Complex64::new(0.0, 0.0));
        // In-band bins untouched without integration
        assert_eq!(banded[40], spectrum.bins()[40]);
    }

    #[test]
    fn test_out_of_band_tone_removed() {
        let spectrum = spectrum_of(&cosine(1.0, 78.125));
        let filtered =
            filter_and_integrate(spectrum.bins(), N, FS, 100.0, 400.0, IntegrationOrder::Velocity).unwrap();
        assert!(filtered.iter().all(|c| c.norm() < 1e-9));
    }

    #[test]
    fn test_degenerate_band_permissive_and_strict() {
        let spectrum = spectrum_of(&cosine(1.0, 78.125));
        let inverted = FilterBand::new(300.0, 100.0);
        let zeroed = spectrum.integrate(inverted, IntegrationOrder::Velocity, false).unwrap();
        assert!(zeroed.bins().iter().all(|c| c.norm() == 0.0));

        assert_eq!(
            spectrum.integrate(inverted, IntegrationOrder::Velocity, true),
            Err(ProcessingError::EmptyPassband {
                low_hz: 300.0,
                high_hz: 100.0
            })
        );
        // Narrower than one bin
        let narrow = FilterBand::new(100.1, 100.2);
        assert!(spectrum.band_limited(narrow, true).is_err());
        assert!(spectrum.band_limited(FilterBand::new(0.0, 1000.0), true).is_ok());
    }

    #[test]
    fn test_wrong_spectrum_length() {
        let bins = vec![Complex64::new(1.0, 0.0); 100];
        assert!(matches!(
            filter_and_integrate(&bins, N, FS, 0.0, 1000.0, IntegrationOrder::Velocity),
            Err(ProcessingError::SpectrumLength { .. })
        ));
        assert_eq!(
            filter_band(&bins, N, -1.0, FilterBand::new(0.0, 10.0)),
            Err(ProcessingError::InvalidSamplingRate(-1.0))
        );
    }
}

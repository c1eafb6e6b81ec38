// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Fixed-point sample decoding and unit conversion
//!
//! Accelerometer firmware ships samples as signed fixed-point integers
//! (Q15 for the 16-bit pipelines, Q31 for the 32-bit ones, Q4.11 for the
//! oldest boards). Values are decoded as `raw / 2^fractional_bits` and are
//! expressed in g.
//!
//! An integer outside the nominal range of the format is divided all the
//! same and yields a value outside `[-1, 1)`; nothing is clamped.
//!
//! # Example
//!
//! ```
//! use rust_vibration::acquisition::fixed_point::{decode_q15_bytes, g_to_mms2, q15_to_float};
//!
//! assert_eq!(q15_to_float(-32768), -1.0);
//!
//! let bytes = [0x00, 0x40, 0x00, 0xC0]; // 16384, -16384 little-endian
//! let values = decode_q15_bytes(&bytes).unwrap();
//! assert_eq!(values, vec![0.5, -0.5]);
//!
//! assert!((g_to_mms2(1.0) - 9806.65).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};

/// Standard gravity in m/s²
pub const STANDARD_GRAVITY: f64 = 9.80665;

const Q15_SCALE: f64 = 32768.0;
const Q31_SCALE: f64 = 2147483648.0;
const Q4_11_SCALE: f64 = 2048.0;

/// Fixed-point encodings produced by the sensor firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedPointFormat {
    /// 16-bit, 15 fractional bits
    Q15,
    /// 32-bit, 31 fractional bits
    Q31,
    /// 16-bit, 11 fractional bits
    #[serde(rename = "q4_11")]
    Q4_11,
}

impl FixedPointFormat {
    /// Width of one encoded value in bytes
    pub fn width(&self) -> usize {
        match self {
            FixedPointFormat::Q15 | FixedPointFormat::Q4_11 => 2,
            FixedPointFormat::Q31 => 4,
        }
    }

    /// Divisor applied to the raw integer
    pub fn scale(&self) -> f64 {
        match self {
            FixedPointFormat::Q15 => Q15_SCALE,
            FixedPointFormat::Q31 => Q31_SCALE,
            FixedPointFormat::Q4_11 => Q4_11_SCALE,
        }
    }

    /// Decode a raw integer already widened to `i64`
    pub fn to_float(&self, raw: i64) -> f64 {
        raw as f64 / self.scale()
    }
}

/// Physical unit of acceleration samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Multiples of standard gravity
    #[default]
    G,
    /// m/s²
    MetersPerSecond2,
    /// mm/s²
    MillimetersPerSecond2,
}

impl Unit {
    /// Multiplier converting a value in g into this unit
    pub fn factor_from_g(&self) -> f64 {
        match self {
            Unit::G => 1.0,
            Unit::MetersPerSecond2 => STANDARD_GRAVITY,
            Unit::MillimetersPerSecond2 => 9806.65,
        }
    }
}

/// Decode a Q15 value
pub fn q15_to_float(raw: i32) -> f64 {
    raw as f64 / Q15_SCALE
}

/// Decode a Q31 value
pub fn q31_to_float(raw: i64) -> f64 {
    raw as f64 / Q31_SCALE
}

/// Decode a Q4.11 value
pub fn q4_11_to_float(raw: i32) -> f64 {
    raw as f64 / Q4_11_SCALE
}

/// Convert g to m/s²
pub fn g_to_ms2(value: f64) -> f64 {
    STANDARD_GRAVITY * value
}

/// Convert g to mm/s²
pub fn g_to_mms2(value: f64) -> f64 {
    9806.65 * value
}

fn check_width(bytes: &[u8], width: usize) -> Result<()> {
    if bytes.len() % width != 0 {
        return Err(ProcessingError::SizeMismatch {
            len: bytes.len(),
            width,
        });
    }
    Ok(())
}

/// Decode a little-endian buffer of Q15 values
pub fn decode_q15_bytes(bytes: &[u8]) -> Result<Vec<f64>> {
    check_width(bytes, 2)?;
    Ok(bytes
        .chunks_exact(2)
        .map(|chunk| q15_to_float(i16::from_le_bytes([chunk[0], chunk[1]]) as i32))
        .collect())
}

/// Decode a little-endian buffer of Q31 values
pub fn decode_q31_bytes(bytes: &[u8]) -> Result<Vec<f64>> {
    check_width(bytes, 4)?;
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| {
            q31_to_float(i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as i64)
        })
        .collect())
}

/// Decode a little-endian buffer in any supported format
pub fn decode_bytes(format: FixedPointFormat, bytes: &[u8]) -> Result<Vec<f64>> {
    match format {
        FixedPointFormat::Q15 => decode_q15_bytes(bytes),
        FixedPointFormat::Q31 => decode_q31_bytes(bytes),
        FixedPointFormat::Q4_11 => {
            check_width(bytes, 2)?;
            Ok(bytes
                .chunks_exact(2)
                .map(|chunk| q4_11_to_float(i16::from_le_bytes([chunk[0], chunk[1]]) as i32))
                .collect())
        }
    }
}

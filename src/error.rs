// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Error types for the velocity processing core

use thiserror::Error;

/// Errors raised by the numerical core
///
/// Configuration loading and the command line tools wrap these into
/// `anyhow::Error`; the library itself never panics on malformed input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessingError {
    #[error("Byte buffer of {len} bytes is not a multiple of the {width}-byte element width")]
    SizeMismatch { len: usize, width: usize },

    #[error("Expected a block of {expected} samples, got {actual}")]
    BlockLength { expected: usize, actual: usize },

    #[error("Cannot process an empty sample block")]
    EmptyBlock,

    #[error("Spectrum has {actual} bins but a block of {block_size} samples needs {expected}")]
    SpectrumLength {
        block_size: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid sampling rate: {0} Hz")]
    InvalidSamplingRate(f64),

    #[error("Filter band {low_hz} Hz - {high_hz} Hz retains no frequency bin")]
    EmptyPassband { low_hz: f64, high_hz: f64 },

    #[error("FFT computation failed: {0}")]
    Fft(String),
}

impl From<realfft::FftError> for ProcessingError {
    fn from(err: realfft::FftError) -> Self {
        ProcessingError::Fft(err.to_string())
    }
}

/// Result alias used throughout the numerical core
pub type Result<T> = std::result::Result<T, ProcessingError>;

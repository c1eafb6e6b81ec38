// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Rust Vibration library
//!
//! This library turns blocks of accelerometer samples into vibration
//! velocity by band-limited integration in the frequency domain, and
//! checks the results against shaker-table calibration references.

pub mod acquisition;
pub mod calibration;
pub mod config;
pub mod error;
pub mod preprocessing;
pub mod processing;
pub mod spectral;
pub mod statistics;
pub mod utility;

pub use error::ProcessingError;
pub use processing::{compute_full_displacement, compute_full_velocity, VelocityProcessor};

// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Analysis results
//!
//! Per-block figures produced by [`VelocityProcessor`](super::VelocityProcessor)
//! and their aggregation over a whole recording.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::acquisition::Axis;
use crate::preprocessing::WindowFunction;
use crate::spectral::FilterBand;

/// Figures of one block on one axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockAnalysis {
    pub axis: Axis,
    /// Position of the block in the recording
    pub index: usize,
    /// RMS of the raw acceleration, offset included
    pub accel_rms: f64,
    /// RMS of the acceleration with the block mean removed
    pub accel_rms_no_mean: f64,
    /// RMS of the acceleration restricted to the filter band
    pub filtered_accel_rms: f64,
    /// RMS of the velocity, corrected for the window gain
    pub velocity_rms: f64,
    /// Frequency of the strongest acceleration bin, if any
    pub dominant_frequency_hz: Option<f64>,
    /// Frequency of the pure tone with the same acceleration and velocity RMS
    pub characteristic_frequency_hz: Option<f64>,
}

/// Tri-axial figures of one block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedBlock {
    pub index: usize,
    /// `√(x² + y² + z²)` of the mean-removed acceleration RMS
    pub accel_rms: f64,
    /// `√(x² + y² + z²)` of the velocity RMS
    pub velocity_rms: f64,
}

/// Analysis of a complete recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingAnalysis {
    pub timestamp: DateTime<Utc>,
    pub sampling_rate: u32,
    pub block_size: usize,
    pub window: WindowFunction,
    pub band: FilterBand,
    /// Every analyzed block, axis by axis in recording order
    pub blocks: Vec<BlockAnalysis>,
    pub combined: Vec<CombinedBlock>,
}

impl RecordingAnalysis {
    /// Number of blocks per axis
    pub fn block_count(&self) -> usize {
        self.combined.len()
    }

    /// Blocks of one axis, in order
    pub fn axis_blocks(&self, axis: Axis) -> impl Iterator<Item = &BlockAnalysis> {
        self.blocks.iter().filter(move |b| b.axis == axis)
    }

    /// Block `index` of `axis`
    pub fn block(&self, axis: Axis, index: usize) -> Option<&BlockAnalysis> {
        self.axis_blocks(axis).find(|b| b.index == index)
    }

    fn mean_of<F: Fn(&BlockAnalysis) -> f64>(&self, axis: Axis, f: F) -> Option<f64> {
        let values: Vec<f64> = self.axis_blocks(axis).map(f).collect();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Mean over blocks of the mean-removed acceleration RMS
    pub fn mean_accel_rms(&self, axis: Axis) -> Option<f64> {
        self.mean_of(axis, |b| b.accel_rms_no_mean)
    }

    /// Mean over blocks of the velocity RMS
    pub fn mean_velocity_rms(&self, axis: Axis) -> Option<f64> {
        self.mean_of(axis, |b| b.velocity_rms)
    }

    /// Mean over blocks of the dominant frequency, ignoring blocks without one
    pub fn mean_dominant_frequency(&self, axis: Axis) -> Option<f64> {
        let values: Vec<f64> = self
            .axis_blocks(axis)
            .filter_map(|b| b.dominant_frequency_hz)
            .collect();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Human-readable summary, one section per block
    pub fn report(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Conditions: window {} - filtering {} Hz - {} Hz\n",
            self.window, self.band.low_hz, self.band.high_hz
        ));
        out.push_str(&format!(
            "Block size: {} samples at {} Hz, {} block(s)\n",
            self.block_size,
            self.sampling_rate,
            self.block_count()
        ));
        let per_axis: Vec<(Axis, Vec<&BlockAnalysis>)> = Axis::ALL
            .iter()
            .map(|&axis| (axis, self.axis_blocks(axis).collect()))
            .collect();
        for combined in &self.combined {
            out.push_str(&format!(
                "\nBlock {} (starts at {} ms)\n",
                combined.index,
                combined.index * self.block_size * 1000 / self.sampling_rate.max(1) as usize
            ));
            for (axis, blocks) in &per_axis {
                if let Some(block) = blocks.get(combined.index) {
                    out.push_str(&format!(
                        "  Axis {}: accel RMS {:.4} (no mean {:.4}, in band {:.4}), velocity RMS {:.4}",
                        axis,
                        block.accel_rms,
                        block.accel_rms_no_mean,
                        block.filtered_accel_rms,
                        block.velocity_rms
                    ));
                    if let Some(f) = block.dominant_frequency_hz {
                        out.push_str(&format!(", peak {:.2} Hz", f));
                    }
                    if let Some(f) = block.characteristic_frequency_hz {
                        out.push_str(&format!(", characteristic {:.2} Hz", f));
                    }
                    out.push('\n');
                }
            }
            out.push_str(&format!(
                "  All axes: accel RMS {:.4}, velocity RMS {:.4}\n",
                combined.accel_rms, combined.velocity_rms
            ));
        }

        if self.block_count() > 0 {
            out.push_str("\nMean over blocks\n");
            for axis in Axis::ALL {
                if let (Some(accel), Some(velocity)) =
                    (self.mean_accel_rms(axis), self.mean_velocity_rms(axis))
                {
                    out.push_str(&format!(
                        "  Axis {}: accel RMS {:.4}, velocity RMS {:.4}",
                        axis, accel, velocity
                    ));
                    if let Some(f) = self.mean_dominant_frequency(axis) {
                        out.push_str(&format!(", peak {:.2} Hz", f));
                    }
                    out.push('\n');
                }
            }
        }
        out
    }
}

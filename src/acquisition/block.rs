// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Sample blocks and tri-axial recordings

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Accelerometer axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in recording order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Axis {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "X" => Ok(Axis::X),
            "Y" => Ok(Axis::Y),
            "Z" => Ok(Axis::Z),
            other => anyhow::bail!("Unknown axis '{}'", other),
        }
    }
}

/// A fixed-size block of samples captured on one axis
///
/// Blocks are immutable once built; every processing stage derives new
/// values from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleBlock {
    axis: Axis,
    sampling_rate: u32,
    samples: Vec<f64>,
}

impl SampleBlock {
    pub fn new(axis: Axis, sampling_rate: u32, samples: Vec<f64>) -> Self {
        Self {
            axis,
            sampling_rate,
            samples,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Sampling rate in Hz
    pub fn sampling_rate(&self) -> u32 {
        self.sampling_rate
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration covered by the block in seconds
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sampling_rate as f64
    }
}

/// The three axis series of one recording
///
/// Series may have different lengths (a collector can drop the tail of one
/// axis); block splitting only uses the part all axes have in common.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriaxialSamples {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl TriaxialSamples {
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> Self {
        Self { x, y, z }
    }

    pub fn axis(&self, axis: Axis) -> &[f64] {
        match axis.index() {
            0 => &self.x,
            1 => &self.y,
            _ => &self.z,
        }
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut Vec<f64> {
        match axis.index() {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => &mut self.z,
        }
    }

    /// Append one tri-axial sample
    pub fn push(&mut self, x: f64, y: f64, z: f64) {
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
    }

    /// Number of complete blocks of `block_size` available on every axis
    pub fn block_count(&self, block_size: usize) -> usize {
        if block_size == 0 {
            return 0;
        }
        Axis::ALL
            .iter()
            .map(|&axis| self.axis(axis).len() / block_size)
            .min()
            .unwrap_or(0)
    }

    /// Split one axis into consecutive full blocks
    ///
    /// The trailing partial block is dropped, and so are blocks that exist on
    /// this axis but not on the shortest one.
    pub fn blocks(&self, axis: Axis, block_size: usize, sampling_rate: u32) -> Vec<SampleBlock> {
        let count = self.block_count(block_size);
        self.axis(axis)
            .chunks_exact(block_size.max(1))
            .take(count)
            .map(|chunk| SampleBlock::new(axis, sampling_rate, chunk.to_vec()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_parsing() {
        assert_eq!("x".parse::<Axis>().unwrap(), Axis::X);
        assert_eq!(" Z ".parse::<Axis>().unwrap(), Axis::Z);
        assert!("W".parse::<Axis>().is_err());
        assert_eq!(Axis::Y.to_string(), "Y");
    }

    #[test]
    fn test_block_count_uses_shortest_axis() {
        let samples = TriaxialSamples::new(vec![0.0; 1100], vec![0.0; 1024], vec![0.0; 2048]);
        assert_eq!(samples.block_count(512), 2);
        assert_eq!(samples.blocks(Axis::Z, 512, 1000).len(), 2);
        assert_eq!(samples.block_count(0), 0);
    }

    #[test]
    fn test_blocks_are_consecutive() {
        let values: Vec<f64> = (0..10).map(|v| v as f64).collect();
        let samples = TriaxialSamples::new(values.clone(), values.clone(), values);
        let blocks = samples.blocks(Axis::X, 4, 100);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].samples(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(blocks[1].samples(), &[4.0, 5.0, 6.0, 7.0]);
        assert_eq!(blocks[1].axis(), Axis::X);
        assert!((blocks[0].duration() - 0.04).abs() < 1e-12);
    }
}

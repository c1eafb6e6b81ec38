// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! CSV recordings produced by the serial and BLE collectors
//!
//! Two layouts are found in the field:
//!
//! - **columns**: one row per instant, `x,y,z`
//! - **inline**: one row per sample, `axis,value` (e.g. `Z,1234`)
//!
//! Rows that cannot be parsed are skipped with a warning rather than
//! aborting the whole recording; collectors sometimes interleave status lines.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::block::{Axis, TriaxialSamples};
use super::{SampleSource, SampleTransform};

/// Row layout of a CSV recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CsvLayout {
    #[default]
    Columns,
    Inline,
}

/// Sample source backed by a CSV file
pub struct CsvSource {
    path: PathBuf,
    layout: CsvLayout,
    delimiter: u8,
    transform: SampleTransform,
    sampling_rate: u32,
}

impl CsvSource {
    /// Create a new source reading `path` with the default comma delimiter
    pub fn new<P: AsRef<Path>>(path: P, layout: CsvLayout, sampling_rate: u32) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            layout,
            delimiter: b',',
            transform: SampleTransform::default(),
            sampling_rate,
        }
    }

    /// Set the field delimiter (`' '` for the parsed collector dumps)
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the conversion applied to each raw value
    pub fn with_transform(mut self, transform: SampleTransform) -> Self {
        self.transform = transform;
        self
    }

    fn parse_value(&self, field: Option<&str>) -> Option<f64> {
        field
            .and_then(|f| f.trim().parse::<f64>().ok())
            .map(|raw| self.transform.apply(raw))
    }

    fn read_from<R: std::io::Read>(&self, reader: R) -> Result<TriaxialSamples> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .delimiter(self.delimiter)
            .from_reader(reader);

        let mut samples = TriaxialSamples::default();
        let mut skipped = 0usize;

        for (line, record) in csv_reader.records().enumerate() {
            let record =
                record.with_context(|| format!("Failed to read CSV row {}", line + 1))?;
            match self.layout {
                CsvLayout::Columns => {
                    let x = self.parse_value(record.get(0));
                    let y = self.parse_value(record.get(1));
                    let z = self.parse_value(record.get(2));
                    match (x, y, z) {
                        (Some(x), Some(y), Some(z)) => samples.push(x, y, z),
                        _ => {
                            skipped += 1;
                            warn!("Skipping malformed row {}: {:?}", line + 1, record);
                        }
                    }
                }
                CsvLayout::Inline => {
                    let axis = record.get(0).and_then(|a| a.parse::<Axis>().ok());
                    let value = self.parse_value(record.get(1));
                    match (axis, value) {
                        (Some(axis), Some(value)) => samples.axis_mut(axis).push(value),
                        _ => {
                            skipped += 1;
                            warn!("Skipping malformed row {}: {:?}", line + 1, record);
                        }
                    }
                }
            }
        }

        debug!(
            "Read {} / {} / {} samples (X/Y/Z), {} rows skipped",
            samples.x.len(),
            samples.y.len(),
            samples.z.len(),
            skipped
        );
        Ok(samples)
    }
}

impl SampleSource for CsvSource {
    fn read_samples(&mut self) -> Result<TriaxialSamples> {
        debug!("Reading {:?} recording from {:?}", self.layout, self.path);
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("Failed to open recording {:?}", self.path))?;
        self.read_from(file)
    }

    fn sampling_rate(&self) -> u32 {
        self.sampling_rate
    }
}

/// Write a tri-axial recording in the columns layout
pub fn write_columns<P: AsRef<Path>>(path: P, samples: &TriaxialSamples, delimiter: u8) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("Failed to create recording {:?}", path))?;

    let rows = samples.x.len().min(samples.y.len()).min(samples.z.len());
    for i in 0..rows {
        writer.write_record(&[
            samples.x[i].to_string(),
            samples.y[i].to_string(),
            samples.z[i].to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::fixed_point::{FixedPointFormat, Unit};
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_columns_layout() {
        let file = write_temp("1,2,3\n4,5,6\n");
        let mut source = CsvSource::new(file.path(), CsvLayout::Columns, 1000);
        let samples = source.read_samples().unwrap();
        assert_eq!(samples.x, vec![1.0, 4.0]);
        assert_eq!(samples.z, vec![3.0, 6.0]);
        assert_eq!(source.sampling_rate(), 1000);
    }

    #[test]
    fn test_inline_layout_with_malformed_rows() {
        let file = write_temp("Z,1\nX,2\nstatus ok\nZ,3\nW,9\n");
        let mut source = CsvSource::new(file.path(), CsvLayout::Inline, 1000);
        let samples = source.read_samples().unwrap();
        assert_eq!(samples.z, vec![1.0, 3.0]);
        assert_eq!(samples.x, vec![2.0]);
        assert!(samples.y.is_empty());
    }

    #[test]
    fn test_space_delimiter_and_q15_transform() {
        let file = write_temp("16384 -16384 0\n");
        let transform = SampleTransform {
            format: Some(FixedPointFormat::Q15),
            range_multiplier: 4.0,
            unit: Unit::G,
        };
        let mut source = CsvSource::new(file.path(), CsvLayout::Columns, 1000)
            .with_delimiter(b' ')
            .with_transform(transform);
        let samples = source.read_samples().unwrap();
        assert_eq!(samples.x, vec![2.0]);
        assert_eq!(samples.y, vec![-2.0]);
    }

    #[test]
    fn test_write_then_read_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recording.csv");
        let mut samples = TriaxialSamples::default();
        samples.push(0.25, -1.5, 3.0);
        write_columns(&path, &samples, b',').unwrap();

        let mut source = CsvSource::new(&path, CsvLayout::Columns, 1000);
        assert_eq!(source.read_samples().unwrap(), samples);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut source = CsvSource::new("/nonexistent/recording.csv", CsvLayout::Columns, 1000);
        assert!(source.read_samples().is_err());
    }
}

// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Calibration experiments
//!
//! A calibration run excites one axis of the sensor on a shaker table with a
//! known acceleration RMS and frequency. Each measured quantity (acceleration
//! RMS, frequency, velocity RMS) is averaged over the run and compared with
//! its reference; a field passes when `|error| < tolerance`, with
//!
//! ```text
//! error = 100 · (average − reference) / reference
//! ```
//!
//! ```
//! use std::collections::BTreeMap;
//! use rust_vibration::acquisition::Axis;
//! use rust_vibration::calibration::CalibrationExperiment;
//!
//! let experiment = CalibrationExperiment::vibration(Axis::Z, [2000.0, 80.0, 4.0], [5.0, 5.0, 5.0]);
//! let measurement = BTreeMap::from([
//!     ("rmsZ".to_string(), 1990.0),
//!     ("freqZ".to_string(), 80.1),
//!     ("velocityZ".to_string(), 3.96),
//! ]);
//! let result = experiment.evaluate(&[measurement]);
//! assert!(result.passed());
//! ```

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::acquisition::Axis;
use crate::config::CalibrationConfig;
use crate::processing::RecordingAnalysis;
use crate::statistics::relative_error;

/// One measurement: field key to measured value
pub type Measurement = BTreeMap<String, f64>;

/// A checked quantity of an experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationField {
    /// Key of the value in a [`Measurement`], e.g. `rmsZ`
    pub key: String,
    /// Name shown in reports
    pub verbose_name: String,
    pub unit: String,
    pub reference: f64,
    pub tolerance_pct: f64,
    /// Multiplier applied to raw measured values (e.g. 1000 for m/s² to mm/s²)
    pub conversion_factor: f64,
}

/// Outcome of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldResult {
    pub key: String,
    pub verbose_name: String,
    pub unit: String,
    pub reference: f64,
    /// Average of the measured values, `None` without measurements
    pub measured: Option<f64>,
    /// Relative error in percent, `None` without measurements or with a zero reference
    pub error_pct: Option<f64>,
    pub tolerance_pct: f64,
    pub passed: bool,
}

/// Outcome of a whole experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub description: String,
    pub fields: Vec<FieldResult>,
}

impl CalibrationResult {
    /// True when every field passed
    pub fn passed(&self) -> bool {
        !self.fields.is_empty() && self.fields.iter().all(|f| f.passed)
    }

    pub fn field(&self, key: &str) -> Option<&FieldResult> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Human-readable report, one section per field
    pub fn report(&self) -> String {
        let mut out = format!("Calibration: {}\n", self.description);
        for field in &self.fields {
            let measured = field
                .measured
                .map(|v| format!("{:.2}", v))
                .unwrap_or_else(|| "__".to_string());
            let error = field
                .error_pct
                .map(|v| format!("{:.2}", v))
                .unwrap_or_else(|| "__".to_string());
            out.push_str("----------------------------------------------------\n");
            out.push_str(&format!(
                "  Expected {}: {} {}\n",
                field.verbose_name, field.reference, field.unit
            ));
            out.push_str(&format!(
                "  Measured {}: {} {}\n",
                field.verbose_name, measured, field.unit
            ));
            out.push_str(&format!("  Error: {} %\n", error));
            out.push_str(&format!("  Tolerance: +/-{} %\n", field.tolerance_pct));
            out.push_str(&format!(
                "  Result: {}\n",
                if field.passed { "OK" } else { "NOT OK" }
            ));
        }
        out.push_str("----------------------------------------------------\n");
        out
    }
}

/// A set of reference values checked together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationExperiment {
    pub description: String,
    pub fields: Vec<CalibrationField>,
}

impl CalibrationExperiment {
    pub fn new<S: Into<String>>(description: S) -> Self {
        Self {
            description: description.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field with a conversion factor of 1
    pub fn with_field(
        mut self,
        key: &str,
        verbose_name: &str,
        unit: &str,
        reference: f64,
        tolerance_pct: f64,
    ) -> Self {
        self.fields.push(CalibrationField {
            key: key.to_string(),
            verbose_name: verbose_name.to_string(),
            unit: unit.to_string(),
            reference,
            tolerance_pct,
            conversion_factor: 1.0,
        });
        self
    }

    /// Vibration along one axis
    ///
    /// `references` and `tolerances` are, in order, acceleration RMS
    /// (mm/s²), frequency (Hz) and velocity RMS (mm/s). Fields are keyed
    /// `rms<axis>`, `freq<axis>` and `velocity<axis>`.
    pub fn vibration(axis: Axis, references: [f64; 3], tolerances: [f64; 3]) -> Self {
        Self::new(format!("Vibrations along {} axis", axis))
            .with_field(&format!("rms{}", axis), "Accel. RMS", "mm/s2", references[0], tolerances[0])
            .with_field(&format!("freq{}", axis), "Frequency", "Hz", references[1], tolerances[1])
            .with_field(
                &format!("velocity{}", axis),
                "Velocity RMS",
                "mm/s",
                references[2],
                tolerances[2],
            )
    }

    /// Vibration along one axis, measured values reported by the sensor in
    /// m/s² for the acceleration
    pub fn vibration_from_sensor(axis: Axis, references: [f64; 3], tolerances: [f64; 3]) -> Self {
        let mut experiment = Self::vibration(axis, references, tolerances);
        experiment.fields[0].conversion_factor = 1000.0;
        experiment
    }

    /// Vibration experiment described by the `calibration` configuration
    /// section, with the same tolerance on every field
    pub fn from_config(config: &CalibrationConfig) -> Self {
        let tolerance = config.tolerance_pct;
        Self::vibration(
            config.axis,
            [config.accel_rms, config.frequency_hz, config.velocity_rms],
            [tolerance; 3],
        )
    }

    /// Shaker-table fixtures run on every axis of a new sensor
    pub fn standard_vibration_fixtures() -> Vec<Self> {
        const REFERENCES: [[f64; 3]; 9] = [
            [1000.0, 15.92, 10.0],
            [2000.0, 15.92, 20.0],
            [1000.0, 40.0, 4.0],
            [2000.0, 40.0, 8.0],
            [5000.0, 40.0, 20.0],
            [1000.0, 80.0, 2.0],
            [2000.0, 80.0, 4.0],
            [5000.0, 80.0, 10.0],
            [10000.0, 80.0, 20.0],
        ];
        Axis::ALL
            .iter()
            .flat_map(|&axis| {
                REFERENCES
                    .iter()
                    .map(move |refs| Self::vibration(axis, *refs, [5.0, 5.0, 5.0]))
            })
            .collect()
    }

    /// Average the measurements per field and compare with the references
    ///
    /// Measurements missing a field are ignored for that field; a field with
    /// no value at all fails.
    pub fn evaluate(&self, measurements: &[Measurement]) -> CalibrationResult {
        let fields = self
            .fields
            .iter()
            .map(|field| {
                let values: Vec<f64> = measurements
                    .iter()
                    .filter_map(|m| m.get(&field.key))
                    .map(|v| v * field.conversion_factor)
                    .collect();
                let measured = if values.is_empty() {
                    None
                } else {
                    Some(values.iter().sum::<f64>() / values.len() as f64)
                };
                let error_pct = measured.and_then(|avg| relative_error(avg, field.reference));
                let passed = error_pct
                    .map(|err| err.abs() < field.tolerance_pct)
                    .unwrap_or(false);
                debug!(
                    "{}: measured {:?} against {} ({:?} %)",
                    field.key, measured, field.reference, error_pct
                );
                FieldResult {
                    key: field.key.clone(),
                    verbose_name: field.verbose_name.clone(),
                    unit: field.unit.clone(),
                    reference: field.reference,
                    measured,
                    error_pct,
                    tolerance_pct: field.tolerance_pct,
                    passed,
                }
            })
            .collect();

        CalibrationResult {
            description: self.description.clone(),
            fields,
        }
    }
}

/// One vibration measurement per analyzed block of `axis`
///
/// The frequency is the characteristic frequency of the block, or its
/// dominant frequency when the velocity is zero.
pub fn vibration_measurements(analysis: &RecordingAnalysis, axis: Axis) -> Vec<Measurement> {
    analysis
        .axis_blocks(axis)
        .map(|block| {
            let mut measurement = Measurement::new();
            measurement.insert(format!("rms{}", axis), block.accel_rms_no_mean);
            if let Some(freq) = block
                .characteristic_frequency_hz
                .or(block.dominant_frequency_hz)
            {
                measurement.insert(format!("freq{}", axis), freq);
            }
            measurement.insert(format!("velocity{}", axis), block.velocity_rms);
            measurement
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurement(values: &[(&str, f64)]) -> Measurement {
        values.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_from_config() {
        let config = CalibrationConfig {
            enabled: true,
            axis: Axis::X,
            accel_rms: 5000.0,
            frequency_hz: 80.0,
            velocity_rms: 10.0,
            tolerance_pct: 2.0,
        };
        let experiment = CalibrationExperiment::from_config(&config);
        assert_eq!(experiment.description, "Vibrations along X axis");
        assert_eq!(experiment.fields[2].key, "velocityX");
        assert_eq!(experiment.fields[2].reference, 10.0);
        assert!(experiment.fields.iter().all(|f| f.tolerance_pct == 2.0));
    }

    #[test]
    fn test_vibration_fields() {
        let experiment = CalibrationExperiment::vibration(Axis::Y, [2000.0, 80.0, 4.0], [5.0, 5.0, 5.0]);
        let keys: Vec<&str> = experiment.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["rmsY", "freqY", "velocityY"]);
        assert_eq!(experiment.description, "Vibrations along Y axis");
    }

    #[test]
    fn test_evaluate_averages_and_checks() {
        let experiment = CalibrationExperiment::vibration(Axis::Z, [2000.0, 80.0, 4.0], [5.0, 5.0, 5.0]);
        let result = experiment.evaluate(&[
            measurement(&[("rmsZ", 1900.0), ("freqZ", 80.0), ("velocityZ", 4.4)]),
            measurement(&[("rmsZ", 2000.0), ("freqZ", 80.0), ("velocityZ", 4.4)]),
        ]);

        let rms = result.field("rmsZ").unwrap();
        assert_eq!(rms.measured, Some(1950.0));
        assert!((rms.error_pct.unwrap() + 2.5).abs() < 1e-9);
        assert!(rms.passed);

        let velocity = result.field("velocityZ").unwrap();
        assert!((velocity.error_pct.unwrap() - 10.0).abs() < 1e-9);
        assert!(!velocity.passed);
        assert!(!result.passed());
    }

    #[test]
    fn test_error_at_tolerance_fails() {
        let experiment = CalibrationExperiment::new("Audio").with_field("freq", "Frequency", "Hz", 100.0, 5.0);
        let result = experiment.evaluate(&[measurement(&[("freq", 105.0)])]);
        assert!(!result.passed());
        let result = experiment.evaluate(&[measurement(&[("freq", 104.9)])]);
        assert!(result.passed());
    }

    #[test]
    fn test_missing_measurements_fail() {
        let experiment = CalibrationExperiment::vibration(Axis::X, [1000.0, 40.0, 4.0], [5.0, 5.0, 5.0]);
        let result = experiment.evaluate(&[measurement(&[("rmsX", 1000.0)])]);
        let freq = result.field("freqX").unwrap();
        assert_eq!(freq.measured, None);
        assert_eq!(freq.error_pct, None);
        assert!(!freq.passed);
        assert!(result.field("rmsX").unwrap().passed);
        assert!(result.report().contains("Measured Frequency: __ Hz"));
    }

    #[test]
    fn test_zero_reference_fails() {
        let experiment = CalibrationExperiment::new("Off axis").with_field("rmsX", "Accel. RMS", "mm/s2", 0.0, 5.0);
        let result = experiment.evaluate(&[measurement(&[("rmsX", 0.0)])]);
        assert_eq!(result.fields[0].error_pct, None);
        assert!(!result.passed());
    }

    #[test]
    fn test_sensor_conversion_factor() {
        let experiment =
            CalibrationExperiment::vibration_from_sensor(Axis::Z, [2000.0, 80.0, 4.0], [5.0, 5.0, 5.0]);
        let result = experiment.evaluate(&[measurement(&[("rmsZ", 2.01), ("freqZ", 80.0), ("velocityZ", 4.0)])]);
        assert!((result.field("rmsZ").unwrap().measured.unwrap() - 2010.0).abs() < 1e-9);
        assert!(result.passed());
    }

    #[test]
    fn test_standard_fixtures_are_consistent() {
        let fixtures = CalibrationExperiment::standard_vibration_fixtures();
        assert_eq!(fixtures.len(), 27);
        let z_80hz = CalibrationExperiment::vibration(Axis::Z, [2000.0, 80.0, 4.0], [5.0, 5.0, 5.0]);
        assert!(fixtures.contains(&z_80hz));
        for fixture in &fixtures {
            // Reference velocity matches the tone within the 5 % tolerance
            let accel = fixture.fields[0].reference;
            let freq = fixture.fields[1].reference;
            let velocity = fixture.fields[2].reference;
            let theoretical = crate::statistics::theoretical_velocity_rms(accel, freq);
            assert!((theoretical - velocity).abs() / velocity < 0.05);
        }
    }

    #[test]
    fn test_report_format() {
        let experiment = CalibrationExperiment::vibration(Axis::Z, [2000.0, 80.0, 4.0], [5.0, 5.0, 5.0]);
        let result = experiment.evaluate(&[measurement(&[("rmsZ", 2000.0), ("freqZ", 80.0), ("velocityZ", 4.0)])]);
        let report = result.report();
        assert!(report.contains("Expected Accel. RMS: 2000 mm/s2"));
        assert!(report.contains("Result: OK"));
        assert!(!report.contains("NOT OK"));
    }
}

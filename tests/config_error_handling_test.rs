// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use anyhow::Result;
use rust_vibration::config::Config;
use std::fs;
use std::path::Path;
use std::sync::Once;
use tempfile::tempdir;

static INIT: Once = Once::new();

// Setup logger for tests
fn setup() {
    INIT.call_once(|| {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .init();
    });
}

/// Write `yaml` to a fresh config file, load it and return the result
/// together with the path of the sample file it may have produced
fn load(yaml: &str) -> Result<(Result<Config>, std::path::PathBuf, tempfile::TempDir)> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, yaml)?;
    let result = Config::from_file(&config_path);
    Ok((result, config_path.with_extension("sample.yaml"), temp_dir))
}

#[test]
fn test_config_type_error_creates_sample_file() -> Result<()> {
    setup();
    let invalid_yaml = r#"
processing:
  sampling_rate: "fast"   # Integer field with string value
  block_size: -3          # Below the schema minimum
  window: 12              # String field with number value
"#;

    let (result, sample_path, _dir) = load(invalid_yaml)?;

    // Assert loading failed
    assert!(result.is_err(), "Config loading should have failed");

    // Assert sample file was created
    assert!(Path::new(&sample_path).exists(), "Sample config file was not created");

    // Load and verify the sample file is valid
    let sample_config = Config::from_file(&sample_path)?;
    assert_eq!(sample_config, Config::default());

    Ok(())
}

#[test]
fn test_unknown_window_is_rejected() -> Result<()> {
    setup();
    let (result, sample_path, _dir) = load("processing:\n  window: blackman\n")?;
    assert!(result.is_err());
    assert!(sample_path.exists());
    Ok(())
}

#[test]
fn test_unknown_field_is_rejected() -> Result<()> {
    setup();
    let yaml = r#"
processing:
  sampling_rate: 1000
  overlap: 0.5
"#;
    let (result, sample_path, _dir) = load(yaml)?;
    assert!(result.is_err(), "Unknown fields must not be silently ignored");
    assert!(sample_path.exists());
    Ok(())
}

#[test]
fn test_strict_empty_band_is_rejected() -> Result<()> {
    setup();
    let yaml = r#"
processing:
  low_freq_hz: 100
  high_freq_hz: 50
  strict_band: true
"#;
    let (result, sample_path, _dir) = load(yaml)?;
    let err = result.expect_err("Strict mode must reject an empty band");
    assert!(err.to_string().contains("keeps no frequency bin"));
    assert!(sample_path.exists());
    Ok(())
}

#[test]
fn test_permissive_empty_band_is_accepted() -> Result<()> {
    setup();
    let yaml = r#"
processing:
  low_freq_hz: 100
  high_freq_hz: 50
"#;
    let (result, sample_path, _dir) = load(yaml)?;
    let config = result?;
    assert_eq!(config.processing.low_freq_hz, 100.0);
    assert!(!sample_path.exists());
    Ok(())
}

#[test]
fn test_band_narrower_than_a_bin_in_strict_mode() -> Result<()> {
    setup();
    // Resolution is 1000 / 512 = 1.95 Hz, no bin between 10.1 and 11.5 Hz
    let yaml = r#"
processing:
  low_freq_hz: 10.1
  high_freq_hz: 11.5
  strict_band: true
"#;
    let (result, _, _dir) = load(yaml)?;
    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_invalid_delimiter_is_rejected() -> Result<()> {
    setup();
    // Too long for the schema
    let (result, _, _dir) = load("acquisition:\n  delimiter: \";;\"\n")?;
    assert!(result.is_err());

    // One character but not ASCII
    let (result, sample_path, _dir) = load("acquisition:\n  delimiter: \"é\"\n")?;
    assert!(result.is_err());
    assert!(sample_path.exists());
    Ok(())
}

#[test]
fn test_zero_unit_factor_is_rejected() -> Result<()> {
    setup();
    let (result, _, _dir) = load("processing:\n  unit_factor: 0\n")?;
    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_calibration_requires_positive_frequency() -> Result<()> {
    setup();
    let yaml = r#"
calibration:
  enabled: true
  frequency_hz: 0
"#;
    let (result, _, _dir) = load(yaml)?;
    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_malformed_yaml_fails_without_panic() -> Result<()> {
    setup();
    let (result, _, _dir) = load("processing: [unclosed\n")?;
    assert!(result.is_err());
    Ok(())
}

// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use anyhow::Result;
use rust_vibration::config::{self, Config};

#[test]
fn test_config_schema_output() -> Result<()> {
    // The schema goes to stdout; only check the call succeeds
    config::output_config_schema()?;
    Ok(())
}

#[test]
fn test_default_config_matches_schema() -> Result<()> {
    let schema: serde_json::Value =
        serde_json::from_str(include_str!("../resources/config.schema.json"))?;
    let validator = jsonschema::draft202012::options().build(&schema)?;

    let default_config = serde_json::to_value(Config::default())?;
    assert!(validator.is_valid(&default_config));

    // Every section of the configuration is described by the schema
    let properties = schema["properties"].as_object().unwrap();
    for section in default_config.as_object().unwrap().keys() {
        assert!(properties.contains_key(section), "{} missing from schema", section);
    }
    Ok(())
}

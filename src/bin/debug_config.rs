// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Load a configuration file and report what the processor would use
use anyhow::Result;
use clap::Parser;
use rust_vibration::config::Config;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(author, version, about = "Check config.yaml for detecting errors", long_about = None)]
struct Args {
    /// Input file path (.yaml)
    ///
    /// The path where the configuration file is located.
    /// should be .yaml or .yml format.
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // Check if input file exists
    if !Path::new(&args.input).exists() {
        eprintln!(
            "Error: Input file '{}' does not exist",
            args.input.display()
        );
        std::process::exit(1);
    }

    let path = Path::new(args.input.as_path());

    println!("Testing file: {:?}", path);

    match Config::from_file(path) {
        Ok(config) => {
            let processing = &config.processing;
            println!("Validation succeeded for file: {:?}", path);
            println!(
                "Blocks of {} samples at {} Hz ({:.4} Hz per bin)",
                processing.block_size,
                processing.sampling_rate,
                processing.resolution()
            );
            println!(
                "Band {} Hz - {} Hz, window {}, unit factor {}",
                processing.low_freq_hz, processing.high_freq_hz, processing.window, processing.unit_factor
            );
        }
        Err(e) => println!("Validation failed: {}", e),
    }

    Ok(())
}

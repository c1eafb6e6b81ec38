// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Synthetic accelerometer recording generator
// Writes a tri-axial CSV with a tone on one axis and Gaussian noise on all axes

use clap::Parser;
use std::path::PathBuf;

use rust_vibration::acquisition::csv_source::write_columns;
use rust_vibration::acquisition::{Axis, SampleSource, SyntheticSource, TriaxialSamples};
use rust_vibration::utility::signal_generator::quantize_q15;
use rust_vibration::utility::{ToneSpec, Waveform};

/// Synthetic accelerometer recording generator
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output file path (.csv)
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Axis carrying the tone (X, Y or Z)
    #[arg(short, long, default_value = "Z")]
    axis: Axis,

    /// RMS of the tone, in the unit of the recording
    #[arg(short, long, default_value_t = 2000.0)]
    rms: f64,

    /// Frequency of the tone in Hz
    #[arg(short, long, default_value_t = 80.0)]
    frequency: f64,

    /// RMS of the Gaussian noise added to every axis
    #[arg(short, long, default_value_t = 0.0)]
    noise: f64,

    /// Use a sine instead of a cosine
    #[arg(long, default_value_t = false)]
    sine: bool,

    /// Sampling rate in Hz
    #[arg(short, long, default_value_t = 1000)]
    sample_rate: u32,

    /// Number of samples per axis
    #[arg(short = 'c', long, default_value_t = 2048)]
    count: usize,

    /// Seed of the noise generator
    #[arg(long, default_value_t = 1)]
    seed: u32,

    /// Field delimiter
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,

    /// Write raw Q15 values of a ±RANGE g accelerometer (tone and noise in g)
    #[arg(long, value_name = "RANGE")]
    q15: Option<f64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    if args.sample_rate == 0 {
        eprintln!("Error: Sampling rate must be greater than zero");
        std::process::exit(1);
    }

    if !args.delimiter.is_ascii() {
        eprintln!("Error: Delimiter must be a single ASCII character");
        std::process::exit(1);
    }

    if args.rms < 0.0 || args.noise < 0.0 {
        eprintln!("Error: Tone and noise RMS must be positive");
        std::process::exit(1);
    }

    let nyquist = args.sample_rate as f64 / 2.0;
    if args.frequency <= 0.0 || args.frequency >= nyquist {
        eprintln!(
            "Error: Frequency must be between 0 and {} Hz (Nyquist)",
            nyquist
        );
        std::process::exit(1);
    }

    let waveform = if args.sine {
        Waveform::Sine
    } else {
        Waveform::Cosine
    };
    let tone = ToneSpec::from_rms(args.rms, args.frequency).with_waveform(waveform);

    println!(
        "Generating {} samples at {} Hz...",
        args.count, args.sample_rate
    );
    println!(
        "Tone on axis {}: {} Hz, RMS {} (peak {:.3})",
        args.axis, args.frequency, args.rms, tone.amplitude
    );
    println!("Noise RMS: {}", args.noise);

    let mut source = SyntheticSource::new(args.seed, args.sample_rate, args.count)
        .with_tone(args.axis, tone)
        .with_noise(args.noise);
    let mut samples = source.read_samples()?;

    if let Some(range) = args.q15 {
        if range <= 0.0 {
            eprintln!("Error: Q15 range must be positive");
            std::process::exit(1);
        }
        println!("Quantizing to Q15 with a ±{} g range", range);
        let quantize = |values: &[f64]| -> Vec<f64> {
            quantize_q15(values, range)
                .into_iter()
                .map(f64::from)
                .collect()
        };
        samples = TriaxialSamples::new(
            quantize(&samples.x),
            quantize(&samples.y),
            quantize(&samples.z),
        );
    }

    write_columns(&args.output, &samples, args.delimiter as u8)?;
    println!(
        "Recording successfully generated and saved to: {}",
        args.output.display()
    );

    Ok(())
}

// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Velocity pipeline benchmarks
//!
//! Run with: cargo bench --bench velocity

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use rust_vibration::acquisition::{Axis, SampleBlock, SampleSource, SyntheticSource};
use rust_vibration::config::ProcessingConfig;
use rust_vibration::preprocessing::WindowFunction;
use rust_vibration::processing::{compute_full_velocity, VelocityProcessor};
use rust_vibration::utility::ToneSpec;

const FS: u32 = 1000;

fn bench_compute_full_velocity(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_full_velocity");

    for size in [256usize, 512, 2048, 8192] {
        let accel = ToneSpec::from_rms(2000.0, 80.0).generate(FS, size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("hann", size), &accel, |b, accel| {
            b.iter(|| {
                compute_full_velocity(
                    black_box(accel),
                    FS as f64,
                    5.0,
                    500.0,
                    1.0,
                    WindowFunction::Hann,
                )
            })
        });
    }

    group.finish();
}

fn bench_processor(c: &mut Criterion) {
    let mut group = c.benchmark_group("velocity_processor");

    for window in [WindowFunction::None, WindowFunction::Hamming, WindowFunction::Hann] {
        let mut processor = VelocityProcessor::new(ProcessingConfig {
            window,
            ..ProcessingConfig::default()
        })
        .expect("valid processing configuration");
        let block_size = processor.config().block_size;
        let accel = ToneSpec::from_rms(2000.0, 80.0).generate(FS, block_size);
        let block = SampleBlock::new(Axis::Z, FS, accel.clone());

        group.bench_function(BenchmarkId::new("velocity", window), |b| {
            b.iter(|| processor.velocity(black_box(&accel)))
        });
        group.bench_function(BenchmarkId::new("analyze_block", window), |b| {
            b.iter(|| processor.analyze_block(black_box(&block), 0))
        });
    }

    group.finish();
}

fn bench_recording(c: &mut Criterion) {
    let recording = SyntheticSource::new(1, FS, 60 * FS as usize)
        .with_tone(Axis::Z, ToneSpec::from_rms(2000.0, 80.0))
        .with_noise(20.0)
        .read_samples()
        .expect("synthetic recording");
    let mut processor =
        VelocityProcessor::new(ProcessingConfig::default()).expect("valid processing configuration");

    c.bench_function("analyze_recording_60s", |b| {
        b.iter(|| processor.analyze_recording(black_box(&recording)))
    });
}

criterion_group!(benches, bench_compute_full_velocity, bench_processor, bench_recording);
criterion_main!(benches);

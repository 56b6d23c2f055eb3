//! Field Sampling Benchmarks
//!
//! Compares sequential vs parallel frame sampling and measures the cost of
//! the address mapper on its own.
//!
//! Run with: cargo bench -p sbsa-core --bench field_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use sbsa_core::parallel::par_sample_range;
use sbsa_core::prelude::*;

fn field() -> WaveField {
    WaveField::new(
        Hypercube::sbsa(),
        vec![
            WaveComponent::new(1.0, 1.0, 0.0),
            WaveComponent::new(2.5, 0.25, 1.0).with_wavenumber(3.0),
            WaveComponent::new(7.0, 0.1, 0.3).with_wavenumber(11.0),
        ],
        SpatialPhase::Radial,
    )
    .unwrap()
}

/// Benchmark frame sampling: sequential vs parallel
fn bench_frame_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_sampling");
    group.measurement_time(Duration::from_secs(10));

    let field = field();
    for frame_len in [1_024u64, 16_384, 262_144].iter() {
        group.throughput(Throughput::Elements(*frame_len));

        group.bench_with_input(
            BenchmarkId::new("sequential", frame_len),
            frame_len,
            |b, &len| b.iter(|| sample_range(&field, 0..len, black_box(0.5)).unwrap()),
        );

        group.bench_with_input(
            BenchmarkId::new("parallel", frame_len),
            frame_len,
            |b, &len| b.iter(|| par_sample_range(&field, 0..len, black_box(0.5)).unwrap()),
        );
    }

    group.finish();
}

/// Benchmark encode/decode round trips on the SBSA hypercube
fn bench_addressing(c: &mut Criterion) {
    let cube = Hypercube::sbsa();
    let coords = [12_345u64, 39_999, 512, 777];

    c.bench_function("encode", |b| b.iter(|| cube.encode(black_box(&coords)).unwrap()));

    let address = cube.encode(&coords).unwrap();
    let mut out = [0u64; 4];
    c.bench_function("decode_into", |b| {
        b.iter(|| cube.decode_into(black_box(address), &mut out).unwrap())
    });
}

criterion_group!(benches, bench_frame_sampling, bench_addressing);
criterion_main!(benches);

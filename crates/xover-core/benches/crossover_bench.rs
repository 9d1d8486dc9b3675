//! Criterion benchmarks for xover-core
//!
//! Run with: cargo bench -p xover-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use xover_core::{Biquad, CrossoverConfig, CrossoverEngine, FilterCoefficients};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("Biquad");
    let coefficients = FilterCoefficients::lowpass(1000.0, SAMPLE_RATE).unwrap();

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut biquad = Biquad::new(coefficients);
                b.iter(|| {
                    for &sample in &input {
                        black_box(biquad.process(black_box(sample)));
                    }
                });
            },
        );
    }

    group.bench_function("coefficient_calc", |b| {
        b.iter(|| {
            black_box(FilterCoefficients::lowpass(
                black_box(1000.0),
                black_box(SAMPLE_RATE),
            ))
        });
    });

    group.finish();
}

fn bench_crossover(c: &mut Criterion) {
    let mut group = c.benchmark_group("Crossover");
    let config = CrossoverConfig::new(1000.0, SAMPLE_RATE).unwrap();

    for &block_size in BLOCK_SIZES {
        let left = generate_test_signal(block_size);
        let right: Vec<f32> = left.iter().map(|s| -0.5 * s).collect();
        let mut low = vec![0.0f32; block_size];
        let mut high = vec![0.0f32; block_size];

        group.bench_with_input(
            BenchmarkId::new("process_buffer", block_size),
            &block_size,
            |b, &n| {
                let mut engine = CrossoverEngine::new(config).unwrap();
                b.iter(|| {
                    engine.process_buffer(
                        n,
                        |frame, channel| if channel == 0 { left[frame] } else { right[frame] },
                        |frame, channel, value| {
                            if channel == 0 {
                                low[frame] = value;
                            } else {
                                high[frame] = value;
                            }
                        },
                    );
                    black_box(&low);
                    black_box(&high);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_biquad, bench_crossover);
criterion_main!(benches);

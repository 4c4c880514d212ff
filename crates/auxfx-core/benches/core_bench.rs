//! Criterion benchmarks for auxfx-core DSP primitives
//!
//! Run with: cargo bench -p auxfx-core
#![allow(missing_docs)]

use auxfx_core::{
    BUFFER_LINE_SIZE, Biquad, BiquadType, Complex, DelayLine, MAX_UPDATE_SAMPLES, Stft,
    analytic_spectrum, buffer_lines, mix_samples,
};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

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

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        let mut output = vec![0.0; block_size];

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut biquad = Biquad::new();
                biquad.set_params_from_bandwidth(
                    BiquadType::Peaking,
                    2.0,
                    1000.0 / SAMPLE_RATE,
                    1.0,
                );
                b.iter(|| {
                    biquad.process(black_box(&input), &mut output);
                    black_box(&output);
                });
            },
        );
    }

    // Coefficient calculation cost, paid once per update
    group.bench_function("coefficient_calc", |b| {
        let mut biquad = Biquad::new();
        b.iter(|| {
            biquad.set_params_from_slope(
                black_box(BiquadType::LowShelf),
                black_box(2.0),
                black_box(200.0 / SAMPLE_RATE),
                black_box(0.75),
            );
        });
    });

    group.finish();
}

fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("DelayLine");
    let input = generate_test_signal(BUFFER_LINE_SIZE);

    group.bench_function("write_read_cubic", |b| {
        let mut line = DelayLine::new();
        line.ensure_capacity(2048).unwrap();
        b.iter(|| {
            for &sample in &input {
                line.write(sample);
                black_box(line.read_cubic(black_box(700), black_box(0.3)));
            }
        });
    });

    group.finish();
}

fn bench_mix_samples(c: &mut Criterion) {
    let mut group = c.benchmark_group("MixSamples");
    let input = generate_test_signal(BUFFER_LINE_SIZE);

    for channels in [2usize, 6, 8] {
        group.bench_with_input(
            BenchmarkId::new("chunked_ramp", channels),
            &channels,
            |b, &channels| {
                let mut output = buffer_lines(channels);
                let target = vec![0.5; channels];
                b.iter(|| {
                    let mut current = vec![0.0; channels];
                    let mut base = 0;
                    while base < BUFFER_LINE_SIZE {
                        let todo = MAX_UPDATE_SAMPLES.min(BUFFER_LINE_SIZE - base);
                        mix_samples(
                            &input[base..base + todo],
                            &mut output,
                            &mut current,
                            &target,
                            BUFFER_LINE_SIZE - base,
                            base,
                        );
                        base += todo;
                    }
                    black_box(&output);
                });
            },
        );
    }

    group.finish();
}

fn bench_stft(c: &mut Criterion) {
    let mut group = c.benchmark_group("Stft");
    let input = generate_test_signal(BUFFER_LINE_SIZE);
    let mut output = vec![Complex::new(0.0, 0.0); BUFFER_LINE_SIZE];

    group.bench_function("analytic_block", |b| {
        let mut stft = Stft::new();
        stft.allocate().unwrap();
        b.iter(|| {
            stft.process(black_box(&input), &mut output, analytic_spectrum);
            black_box(&output);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_biquad, bench_delay, bench_mix_samples, bench_stft);
criterion_main!(benches);

//! Criterion benchmarks for auxfx effects
//!
//! Run with: cargo bench -p auxfx-effects
#![allow(missing_docs)]

use auxfx_core::{
    ChannelLayout, DeviceParams, EffectProps, EffectState, EffectTarget, EffectType,
    FloatBufferLine, buffer_lines,
};
use auxfx_effects::{
    ChorusState, CompressorState, DistortionState, EchoState, EqualizerState, FshifterState,
    PshifterState, VmorpherState,
};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const SAMPLE_RATE: u32 = 48000;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_send() -> Vec<FloatBufferLine> {
    let mut send = buffer_lines(1);
    for (i, s) in send[0].iter_mut().enumerate() {
        let t = i as f32 / SAMPLE_RATE as f32;
        *s = (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5;
    }
    send
}

fn bench_effect<S: EffectState>(c: &mut Criterion, name: &str, mut state: S, kind: EffectType) {
    let device = DeviceParams::new(SAMPLE_RATE, ChannelLayout::Stereo);
    state.device_update(&device).unwrap();
    state.update(&EffectTarget::new(device, 1.0, 1), &EffectProps::default_for(kind));

    let send = generate_send();
    let mut group = c.benchmark_group(name);

    for &block_size in BLOCK_SIZES {
        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, &block_size| {
                let mut output = buffer_lines(2);
                b.iter(|| {
                    state.process(block_size, black_box(&send), &mut output);
                    black_box(output[0][0])
                })
            },
        );
    }

    group.finish();
}

fn bench_chorus(c: &mut Criterion) {
    bench_effect(c, "Chorus", ChorusState::chorus(), EffectType::Chorus);
}

fn bench_echo(c: &mut Criterion) {
    bench_effect(c, "Echo", EchoState::new(), EffectType::Echo);
}

fn bench_distortion(c: &mut Criterion) {
    bench_effect(c, "Distortion", DistortionState::new(), EffectType::Distortion);
}

fn bench_equalizer(c: &mut Criterion) {
    bench_effect(c, "Equalizer", EqualizerState::new(), EffectType::Equalizer);
}

fn bench_compressor(c: &mut Criterion) {
    bench_effect(c, "Compressor", CompressorState::new(), EffectType::Compressor);
}

fn bench_vocal_morpher(c: &mut Criterion) {
    bench_effect(c, "VocalMorpher", VmorpherState::new(), EffectType::VocalMorpher);
}

// The spectral effects pay for a frame transform every 256 samples.
fn bench_frequency_shifter(c: &mut Criterion) {
    bench_effect(c, "FrequencyShifter", FshifterState::new(), EffectType::FrequencyShifter);
}

fn bench_pitch_shifter(c: &mut Criterion) {
    bench_effect(c, "PitchShifter", PshifterState::new(), EffectType::PitchShifter);
}

criterion_group!(
    benches,
    bench_chorus,
    bench_echo,
    bench_distortion,
    bench_equalizer,
    bench_compressor,
    bench_vocal_morpher,
    bench_frequency_shifter,
    bench_pitch_shifter,
);

criterion_main!(benches);

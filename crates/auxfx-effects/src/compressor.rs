//! Automatic gain control.
//!
//! A one-pole RMS follower on the first input channel is read once per
//! 64-sample chunk. Above the threshold the gain target is
//! `threshold / rms` (hard knee); the applied gain moves toward the target
//! with the same attack/release one-pole, so level changes stay smooth.
//! When switched off the target is unity and the gain relaxes back to it.

use auxfx_core::{
    DeviceParams, EffectError, EffectProps, EffectState, EffectTarget, EffectType, FloatBufferLine,
    MAX_INPUT_CHANNELS, MAX_UPDATE_SAMPLES, OutputGains, lerp,
};
use libm::{expf, sqrtf};

/// Seconds for the envelope to rise.
const ATTACK_TIME: f32 = 0.1;
/// Seconds for the envelope to fall.
const RELEASE_TIME: f32 = 0.2;
/// RMS level above which gain is reduced.
const THRESHOLD: f32 = 0.5;

/// Compressor effect state.
#[derive(Debug, Clone)]
pub struct CompressorState {
    enabled: bool,
    attack_coeff: f32,
    release_coeff: f32,
    mean_square: f32,
    gain: f32,
    gains: [OutputGains; MAX_INPUT_CHANNELS],
    active: usize,
}

impl CompressorState {
    /// Creates an enabled compressor at unity gain.
    pub fn new() -> Self {
        Self {
            enabled: true,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            mean_square: 0.0,
            gain: 1.0,
            gains: [OutputGains::new(); MAX_INPUT_CHANNELS],
            active: 0,
        }
    }

    /// Current applied gain.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    #[inline]
    fn follow(&self, target: f32, state: f32) -> f32 {
        let coeff = if target > state {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        lerp(target, state, coeff)
    }
}

impl Default for CompressorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectState for CompressorState {
    fn device_update(&mut self, device: &DeviceParams) -> Result<(), EffectError> {
        device.validate()?;
        let frequency = device.frequency();
        self.attack_coeff = expf(-1.0 / (frequency * ATTACK_TIME));
        self.release_coeff = expf(-1.0 / (frequency * RELEASE_TIME));
        self.mean_square = 0.0;
        self.gain = 1.0;
        for gains in &mut self.gains {
            gains.reset();
        }
        Ok(())
    }

    fn update(&mut self, target: &EffectTarget, props: &EffectProps) {
        let EffectProps::Compressor(props) = props else {
            return;
        };
        self.enabled = props.on;
        self.active = target.input_channels.clamp(1, MAX_INPUT_CHANNELS);
        for (index, gains) in self.gains[..self.active].iter_mut().enumerate() {
            gains.set_target(target.channel_gains(index));
        }
    }

    fn process(
        &mut self,
        samples_to_do: usize,
        input: &[FloatBufferLine],
        output: &mut [FloatBufferLine],
    ) {
        let Some(first) = input.first() else {
            return;
        };

        let mut base = 0;
        while base < samples_to_do {
            let todo = MAX_UPDATE_SAMPLES.min(samples_to_do - base);

            for &x in &first[base..base + todo] {
                self.mean_square = self.follow(x * x, self.mean_square);
            }
            let rms = sqrtf(self.mean_square);
            let target = if self.enabled && rms > THRESHOLD {
                THRESHOLD / rms
            } else {
                1.0
            };

            // Gain reduction is an attack; recovery toward unity a release.
            let mut gain_curve = [0.0f32; MAX_UPDATE_SAMPLES];
            for g in &mut gain_curve[..todo] {
                let coeff = if target < self.gain {
                    self.attack_coeff
                } else {
                    self.release_coeff
                };
                self.gain = lerp(target, self.gain, coeff);
                *g = self.gain;
            }

            for (gains, line) in self.gains[..self.active].iter_mut().zip(input) {
                let mut buffer = [0.0f32; MAX_UPDATE_SAMPLES];
                let samples = buffer.iter_mut().zip(&line[base..base + todo]);
                for ((out, &x), &g) in samples.zip(&gain_curve) {
                    *out = x * g;
                }
                gains.mix(&buffer[..todo], output, samples_to_do - base, base);
            }
            base += todo;
        }
    }

    fn effect_type(&self) -> EffectType {
        EffectType::Compressor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auxfx_core::{BUFFER_LINE_SIZE, ChannelLayout, CompressorProps, buffer_lines};

    fn run(state: &mut CompressorState, amplitude: f32, blocks: usize) -> f32 {
        let mut input = buffer_lines(1);
        let mut peak = 0.0f32;
        for block in 0..blocks {
            for (i, s) in input[0].iter_mut().enumerate() {
                let n = (block * BUFFER_LINE_SIZE + i) as f32;
                *s = amplitude * (core::f32::consts::TAU * 500.0 * n / 48000.0).sin();
            }
            let mut output = buffer_lines(1);
            state.process(BUFFER_LINE_SIZE, &input, &mut output);
            peak = output[0].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        }
        peak
    }

    fn configured(on: bool) -> CompressorState {
        let device = DeviceParams::new(48000, ChannelLayout::Mono);
        let mut state = CompressorState::new();
        state.device_update(&device).unwrap();
        state.update(
            &EffectTarget::new(device, 1.0, 1),
            &EffectProps::Compressor(CompressorProps { on }),
        );
        state
    }

    #[test]
    fn test_loud_signal_reduced_toward_threshold() {
        let mut state = configured(true);
        let peak = run(&mut state, 1.0, 100);
        // RMS of a full-scale sine is 0.707; it settles at the threshold.
        assert!((peak - THRESHOLD * core::f32::consts::SQRT_2).abs() < 0.05, "peak {peak}");
        assert!(state.gain() < 0.75);
    }

    #[test]
    fn test_quiet_signal_untouched() {
        let mut state = configured(true);
        let peak = run(&mut state, 0.25, 50);
        assert!((peak - 0.25).abs() < 1e-3, "peak {peak}");
        assert_eq!(state.gain(), 1.0);
    }

    #[test]
    fn test_switching_off_relaxes_to_unity() {
        let mut state = configured(true);
        run(&mut state, 1.0, 100);
        let compressed = state.gain();
        state.update(
            &EffectTarget::new(DeviceParams::new(48000, ChannelLayout::Mono), 1.0, 1),
            &EffectProps::Compressor(CompressorProps { on: false }),
        );
        run(&mut state, 1.0, 1);
        let after_one_block = state.gain();
        assert!(after_one_block > compressed && after_one_block < 1.0);
        run(&mut state, 1.0, 200);
        assert!((state.gain() - 1.0).abs() < 1e-3);
    }
}

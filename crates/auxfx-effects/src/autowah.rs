//! Envelope-controlled peaking filter.
//!
//! An asymmetric one-pole follower tracks `peak_gain * |x|` of the first
//! input channel. The envelope sweeps a resonant peaking filter between
//! 20 Hz and 2.5 kHz; coefficients are recomputed every sample.

use auxfx_core::{
    AutowahProps, Biquad, BiquadType, DeviceParams, EffectError, EffectProps, EffectState,
    EffectTarget, EffectType, FloatBufferLine, MAX_INPUT_CHANNELS, MAX_UPDATE_SAMPLES, OutputGains,
    lerp,
};
use libm::{expf, fabsf, log10f, sqrtf};

const MIN_FREQ: f32 = 20.0;
const MAX_FREQ: f32 = 2500.0;
const Q_FACTOR: f32 = 5.0;
/// Highest normalized filter frequency the sweep may reach.
const MAX_F0NORM: f32 = 0.46;

#[derive(Debug, Clone, Default)]
struct ChannelFilter {
    filter: Biquad,
    gains: OutputGains,
}

/// Autowah effect state.
#[derive(Debug, Clone)]
pub struct AutowahState {
    attack_rate: f32,
    release_rate: f32,
    resonance_gain: f32,
    peak_gain: f32,
    freq_min_norm: f32,
    bandwidth_norm: f32,
    env_delay: f32,

    channels: [ChannelFilter; MAX_INPUT_CHANNELS],
    active: usize,
}

impl AutowahState {
    /// Creates an autowah with neutral settings.
    pub fn new() -> Self {
        Self {
            attack_rate: 1.0,
            release_rate: 1.0,
            resonance_gain: 10.0,
            peak_gain: 4.5,
            freq_min_norm: 4.5e-4,
            bandwidth_norm: 0.05,
            env_delay: 0.0,
            channels: Default::default(),
            active: 0,
        }
    }
}

impl Default for AutowahState {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectState for AutowahState {
    fn device_update(&mut self, device: &DeviceParams) -> Result<(), EffectError> {
        device.validate()?;
        *self = Self::new();
        Ok(())
    }

    fn update(&mut self, target: &EffectTarget, props: &EffectProps) {
        let EffectProps::Autowah(props) = props else {
            return;
        };
        let frequency = target.device.frequency();
        let release_time = props.release_time.clamp(0.001, 1.0);

        self.attack_rate = expf(-1.0 / (props.attack_time * frequency));
        self.release_rate = expf(-1.0 / (release_time * frequency));
        // 0 to 20 dB resonance peak.
        self.resonance_gain = sqrtf(log10f(props.resonance) * 10.0 / 3.0);
        self.peak_gain = 1.0 - log10f(props.peak_gain / AutowahProps::MAX_PEAK_GAIN);
        self.freq_min_norm = MIN_FREQ / frequency;
        self.bandwidth_norm = (MAX_FREQ - MIN_FREQ) / frequency;

        self.active = target.input_channels.clamp(1, MAX_INPUT_CHANNELS);
        for (index, channel) in self.channels[..self.active].iter_mut().enumerate() {
            channel.gains.set_target(target.channel_gains(index));
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

            // Envelope of the first channel drives every channel's filter.
            let mut f0norm = [0.0f32; MAX_UPDATE_SAMPLES];
            for (f0, &x) in f0norm.iter_mut().zip(&first[base..base + todo]) {
                let sample = self.peak_gain * fabsf(x);
                let a = if sample > self.env_delay {
                    self.attack_rate
                } else {
                    self.release_rate
                };
                self.env_delay = lerp(sample, self.env_delay, a);
                *f0 = (self.bandwidth_norm * self.env_delay + self.freq_min_norm).min(MAX_F0NORM);
            }

            for (channel, line) in self.channels[..self.active].iter_mut().zip(input) {
                let mut buffer = [0.0f32; MAX_UPDATE_SAMPLES];
                let samples = buffer.iter_mut().zip(&line[base..base + todo]);
                for ((out, &x), &f0) in samples.zip(&f0norm) {
                    channel
                        .filter
                        .set_params(BiquadType::Peaking, self.resonance_gain, f0, 1.0 / Q_FACTOR);
                    *out = channel.filter.process_sample(x);
                }
                channel.gains.mix(&buffer[..todo], output, samples_to_do - base, base);
            }
            base += todo;
        }
    }

    fn effect_type(&self) -> EffectType {
        EffectType::Autowah
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auxfx_core::{BUFFER_LINE_SIZE, ChannelLayout, buffer_lines};

    fn configured(props: AutowahProps) -> AutowahState {
        let device = DeviceParams::new(48000, ChannelLayout::Stereo);
        let mut state = AutowahState::new();
        state.device_update(&device).unwrap();
        state.update(&EffectTarget::new(device, 1.0, 1), &EffectProps::Autowah(props));
        state
    }

    #[test]
    fn test_envelope_rises_with_input_and_decays() {
        let mut state = configured(AutowahProps::default());
        let loud = vec![[0.5; BUFFER_LINE_SIZE]];
        let mut output = buffer_lines(2);
        state.process(BUFFER_LINE_SIZE, &loud, &mut output);
        let raised = state.env_delay;
        assert!(raised > 0.0);

        let silence = buffer_lines(1);
        for _ in 0..8 {
            state.process(BUFFER_LINE_SIZE, &silence, &mut output);
        }
        assert!(state.env_delay < raised * 0.5);
    }

    #[test]
    fn test_resonance_gain_range() {
        let low = configured(AutowahProps {
            resonance: 2.0,
            ..AutowahProps::default()
        });
        let high = configured(AutowahProps {
            resonance: 1000.0,
            ..AutowahProps::default()
        });
        assert!((high.resonance_gain - sqrtf(10.0)).abs() < 1e-4);
        assert!(low.resonance_gain < high.resonance_gain);
    }

    #[test]
    fn test_sweep_capped_below_nyquist() {
        let mut state = configured(AutowahProps {
            peak_gain: AutowahProps::MAX_PEAK_GAIN,
            attack_time: 0.0001,
            ..AutowahProps::default()
        });
        state.peak_gain = 1.0e6;
        let input = vec![[1.0; BUFFER_LINE_SIZE]];
        let mut output = buffer_lines(2);
        state.process(BUFFER_LINE_SIZE, &input, &mut output);
        assert!(output.iter().all(|line| line.iter().all(|s| s.is_finite())));
    }
}

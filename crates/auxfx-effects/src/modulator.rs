//! Ring modulator.
//!
//! Each input channel passes a one-pole highpass and is multiplied by a
//! carrier. The carrier phase is a 24-bit fixed-point accumulator so the
//! frequency stays exact over long runs; the waveform is evaluated once per
//! chunk and shared by every channel.

use auxfx_core::{
    DeviceParams, EffectError, EffectProps, EffectState, EffectTarget, EffectType, FloatBufferLine,
    MAX_INPUT_CHANNELS, MAX_UPDATE_SAMPLES, ModulatorWaveform, OnePole, OutputGains,
};
use core::f32::consts::TAU;
use libm::sinf;

const WAVEFORM_FRACBITS: u32 = 24;
const WAVEFORM_FRACONE: u32 = 1 << WAVEFORM_FRACBITS;
const WAVEFORM_FRACMASK: u32 = WAVEFORM_FRACONE - 1;

/// Highpass cutoff bounds, as a fraction of the sample rate.
const MIN_HIGHPASS_NORM: f32 = 1.0 / 512.0;
const MAX_HIGHPASS_NORM: f32 = 0.49;

#[inline]
fn sine(index: u32) -> f32 {
    sinf(index as f32 * (TAU / WAVEFORM_FRACONE as f32))
}

#[inline]
fn sawtooth(index: u32) -> f32 {
    index as f32 * (2.0 / WAVEFORM_FRACONE as f32) - 1.0
}

#[inline]
fn square(index: u32) -> f32 {
    // Bit 23 selects the half period: 0 -> -1, 2 -> +1.
    (((index >> (WAVEFORM_FRACBITS - 2)) & 2) as i32 - 1) as f32
}

#[derive(Debug, Clone, Default)]
struct ChannelFilter {
    highpass: OnePole,
    gains: OutputGains,
}

/// Ring modulator effect state.
#[derive(Debug, Clone)]
pub struct ModulatorState {
    waveform: ModulatorWaveform,
    index: u32,
    step: u32,
    channels: [ChannelFilter; MAX_INPUT_CHANNELS],
    active: usize,
}

impl ModulatorState {
    /// Creates a modulator with a sine carrier.
    pub fn new() -> Self {
        Self {
            waveform: ModulatorWaveform::Sinusoid,
            index: 0,
            step: 1,
            channels: Default::default(),
            active: 0,
        }
    }

    fn fill_carrier(&mut self, carrier: &mut [f32]) {
        if self.step == 0 {
            carrier.fill(1.0);
            return;
        }
        let shape: fn(u32) -> f32 = match self.waveform {
            ModulatorWaveform::Sinusoid => sine,
            ModulatorWaveform::Sawtooth => sawtooth,
            ModulatorWaveform::Square => square,
        };
        for value in carrier {
            *value = shape(self.index);
            self.index = (self.index + self.step) & WAVEFORM_FRACMASK;
        }
    }
}

impl Default for ModulatorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectState for ModulatorState {
    fn device_update(&mut self, device: &DeviceParams) -> Result<(), EffectError> {
        device.validate()?;
        self.index = 0;
        for channel in &mut self.channels {
            channel.highpass.reset();
            channel.gains.reset();
        }
        Ok(())
    }

    fn update(&mut self, target: &EffectTarget, props: &EffectProps) {
        let EffectProps::RingModulator(props) = props else {
            return;
        };
        let frequency = target.device.frequency();

        let step = props.frequency / frequency * WAVEFORM_FRACONE as f32;
        self.step = (step as u32).min(WAVEFORM_FRACONE - 1);
        self.waveform = props.waveform;

        let f0norm =
            (props.high_pass_cutoff / frequency).clamp(MIN_HIGHPASS_NORM, MAX_HIGHPASS_NORM);
        self.active = target.input_channels.clamp(1, MAX_INPUT_CHANNELS);
        for (index, channel) in self.channels[..self.active].iter_mut().enumerate() {
            channel.highpass.set_cutoff(f0norm);
            channel.gains.set_target(target.channel_gains(index));
        }
    }

    fn process(
        &mut self,
        samples_to_do: usize,
        input: &[FloatBufferLine],
        output: &mut [FloatBufferLine],
    ) {
        let mut base = 0;
        while base < samples_to_do {
            let todo = MAX_UPDATE_SAMPLES.min(samples_to_do - base);
            let mut carrier = [0.0f32; MAX_UPDATE_SAMPLES];
            self.fill_carrier(&mut carrier[..todo]);

            for (channel, line) in self.channels[..self.active].iter_mut().zip(input) {
                let mut buffer = [0.0f32; MAX_UPDATE_SAMPLES];
                let samples = buffer.iter_mut().zip(&line[base..base + todo]);
                for ((out, &x), &c) in samples.zip(&carrier) {
                    *out = channel.highpass.process_highpass(x) * c;
                }
                channel.gains.mix(&buffer[..todo], output, samples_to_do - base, base);
            }
            base += todo;
        }
    }

    fn effect_type(&self) -> EffectType {
        EffectType::RingModulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auxfx_core::{BUFFER_LINE_SIZE, ChannelLayout, ModulatorProps, buffer_lines};

    fn configured(props: ModulatorProps) -> ModulatorState {
        let device = DeviceParams::new(48000, ChannelLayout::Mono);
        let mut state = ModulatorState::new();
        state.device_update(&device).unwrap();
        state.update(&EffectTarget::new(device, 1.0, 1), &EffectProps::RingModulator(props));
        state
    }

    #[test]
    fn test_waveform_shapes() {
        let quarter = WAVEFORM_FRACONE / 4;
        assert!((sine(quarter) - 1.0).abs() < 1e-6);
        assert_eq!(sawtooth(0), -1.0);
        assert_eq!(sawtooth(WAVEFORM_FRACONE / 2), 0.0);
        assert_eq!(square(0), -1.0);
        assert_eq!(square(quarter), -1.0);
        assert_eq!(square(WAVEFORM_FRACONE / 2), 1.0);
        assert_eq!(square(WAVEFORM_FRACMASK), 1.0);
    }

    #[test]
    fn test_step_from_frequency() {
        let state = configured(ModulatorProps {
            frequency: 480.0,
            ..ModulatorProps::default()
        });
        assert_eq!(state.step, WAVEFORM_FRACONE / 100);

        // Frequencies at or above the sample rate stop just short of a full cycle.
        let mut state = ModulatorState::new();
        state.update(
            &EffectTarget::new(DeviceParams::new(8000, ChannelLayout::Mono), 1.0, 1),
            &EffectProps::RingModulator(ModulatorProps {
                frequency: 8000.0,
                ..ModulatorProps::default()
            }),
        );
        assert_eq!(state.step, WAVEFORM_FRACONE - 1);
    }

    #[test]
    fn test_zero_frequency_passes_highpassed_input() {
        let mut state = configured(ModulatorProps {
            frequency: 0.0,
            high_pass_cutoff: 0.0,
            ..ModulatorProps::default()
        });
        assert_eq!(state.step, 0);
        let mut carrier = [0.0f32; 8];
        state.fill_carrier(&mut carrier);
        assert!(carrier.iter().all(|&c| c == 1.0));
    }

    #[test]
    fn test_carrier_phase_wraps() {
        let mut state = configured(ModulatorProps {
            frequency: 12000.0,
            waveform: ModulatorWaveform::Sawtooth,
            ..ModulatorProps::default()
        });
        let mut carrier = [0.0f32; 8];
        state.fill_carrier(&mut carrier);
        assert_eq!(carrier, [-1.0, -0.5, 0.0, 0.5, -1.0, -0.5, 0.0, 0.5]);
        assert!(state.index < WAVEFORM_FRACONE);
    }

    #[test]
    fn test_highpass_removes_dc() {
        let mut state = configured(ModulatorProps {
            frequency: 0.0,
            ..ModulatorProps::default()
        });
        let input = vec![[1.0; BUFFER_LINE_SIZE]];
        let mut output = buffer_lines(1);
        for _ in 0..4 {
            output[0].fill(0.0);
            state.process(BUFFER_LINE_SIZE, &input, &mut output);
        }
        assert!(output[0][BUFFER_LINE_SIZE - 1].abs() < 1e-3);
    }
}

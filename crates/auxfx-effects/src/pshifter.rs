//! Phase-vocoder pitch shifter.
//!
//! The first input channel runs through the STFT engine; every frame's
//! partials are moved to `bin * ratio` by [`PhaseVocoder`] and resynthesized.
//! The output is the real part, panned to the front, one frame late.
//!
//! The ratio is quantized to 16 fractional bits so bin mapping can use an
//! integer multiply and shift; the phase rate uses the same quantized value.

use auxfx_core::{
    Complex, DeviceParams, EffectError, EffectProps, EffectState, EffectTarget, EffectType,
    FRONT, FloatBufferLine, MAX_UPDATE_SAMPLES, OutputGains, PhaseVocoder, STFT_LATENCY, Stft,
    pan_gains,
};
use libm::roundf;

/// Pitch shifter effect state.
#[derive(Debug)]
pub struct PshifterState {
    stft: Stft,
    vocoder: PhaseVocoder,
    shift: u32,
    ratio: f64,
    gains: OutputGains,
}

impl PshifterState {
    /// Creates a shifter at unity ratio with no spectral storage.
    pub fn new() -> Self {
        Self {
            stft: Stft::new(),
            vocoder: PhaseVocoder::new(),
            shift: PhaseVocoder::FRAC_ONE,
            ratio: 1.0,
            gains: OutputGains::new(),
        }
    }
}

impl Default for PshifterState {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectState for PshifterState {
    fn device_update(&mut self, device: &DeviceParams) -> Result<(), EffectError> {
        device.validate()?;
        self.stft.allocate()?;
        self.vocoder.allocate()?;
        self.shift = PhaseVocoder::FRAC_ONE;
        self.ratio = 1.0;
        self.gains.reset();
        tracing::debug!(latency = STFT_LATENCY, "pitch shifter ready");
        Ok(())
    }

    fn update(&mut self, target: &EffectTarget, props: &EffectProps) {
        let EffectProps::PitchShifter(props) = props else {
            return;
        };
        self.shift = roundf(props.ratio() * PhaseVocoder::FRAC_ONE as f32) as u32;
        self.ratio = f64::from(self.shift) / f64::from(PhaseVocoder::FRAC_ONE);
        self.gains
            .set_target(pan_gains(target.device.layout, FRONT, target.slot_gain));
    }

    fn process(
        &mut self,
        samples_to_do: usize,
        input: &[FloatBufferLine],
        output: &mut [FloatBufferLine],
    ) {
        let Some(line) = input.first() else {
            return;
        };
        if !self.stft.is_allocated() {
            return;
        }

        let (shift, ratio) = (self.shift, self.ratio);
        let mut base = 0;
        while base < samples_to_do {
            let todo = MAX_UPDATE_SAMPLES.min(samples_to_do - base);
            let mut frame_out = [Complex::new(0.0, 0.0); MAX_UPDATE_SAMPLES];
            let vocoder = &mut self.vocoder;
            self.stft.process(&line[base..base + todo], &mut frame_out[..todo], |spectrum| {
                vocoder.shift(spectrum, shift, ratio);
            });

            let mut buffer = [0.0f32; MAX_UPDATE_SAMPLES];
            for (out, c) in buffer.iter_mut().zip(&frame_out[..todo]) {
                *out = c.re as f32;
            }
            self.gains.mix(&buffer[..todo], output, samples_to_do - base, base);
            base += todo;
        }
    }

    fn latency_samples(&self) -> usize {
        STFT_LATENCY
    }

    fn effect_type(&self) -> EffectType {
        EffectType::PitchShifter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auxfx_core::{BUFFER_LINE_SIZE, ChannelLayout, PshifterProps, STFT_SIZE, buffer_lines};
    use core::f32::consts::TAU;

    fn configured(coarse_tune: i32, fine_tune: i32) -> PshifterState {
        let device = DeviceParams::new(48000, ChannelLayout::Mono);
        let mut state = PshifterState::new();
        state.device_update(&device).unwrap();
        state.update(
            &EffectTarget::new(device, 1.0, 1),
            &EffectProps::PitchShifter(PshifterProps { coarse_tune, fine_tune }),
        );
        state
    }

    /// Dominant bin of the output's steady-state tail.
    fn dominant_bin(state: &mut PshifterState, bin: f32) -> usize {
        let freq = bin / STFT_SIZE as f32;
        let mut tail = Vec::new();
        for block in 0..12 {
            let mut input = buffer_lines(1);
            for (i, s) in input[0].iter_mut().enumerate() {
                *s = 0.5 * (TAU * freq * (block * BUFFER_LINE_SIZE + i) as f32).sin();
            }
            let mut output = buffer_lines(1);
            state.process(BUFFER_LINE_SIZE, &input, &mut output);
            if block >= 8 {
                tail.extend_from_slice(&output[0]);
            }
        }

        // Correlate against candidate bins over the tail.
        (1..STFT_SIZE / 2)
            .map(|k| {
                let w = TAU * k as f32 / STFT_SIZE as f32;
                let (re, im) = tail.iter().enumerate().fold((0.0f32, 0.0f32), |(re, im), (n, &x)| {
                    (re + x * (w * n as f32).cos(), im + x * (w * n as f32).sin())
                });
                (k, re * re + im * im)
            })
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(k, _)| k)
            .unwrap_or(0)
    }

    #[test]
    fn test_ratio_quantization() {
        let state = configured(12, 0);
        assert_eq!(state.shift, 2 * PhaseVocoder::FRAC_ONE);
        assert_eq!(state.ratio, 2.0);

        let state = configured(0, 0);
        assert_eq!(state.shift, PhaseVocoder::FRAC_ONE);

        let state = configured(-12, -50);
        assert!(state.ratio > 0.47 && state.ratio < 0.49);
    }

    #[test]
    fn test_octave_up_doubles_frequency() {
        let mut state = configured(12, 0);
        assert_eq!(dominant_bin(&mut state, 24.0), 48);
    }

    #[test]
    fn test_octave_down_halves_frequency() {
        let mut state = configured(-12, 0);
        assert_eq!(dominant_bin(&mut state, 48.0), 24);
    }

    #[test]
    fn test_reports_frame_latency() {
        assert_eq!(PshifterState::new().latency_samples(), STFT_SIZE);
    }
}

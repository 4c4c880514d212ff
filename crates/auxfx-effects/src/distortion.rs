//! Oversampled waveshaping distortion.
//!
//! Signal flow, at four times the device rate:
//!
//! ```text
//! in ─► zero-stuff ×4 ─► lowpass ─► shaper ─► -shaper ─► shaper ─► bandpass ─► keep 1 of 4 ─► out
//! ```
//!
//! The lowpass doubles as the interpolation filter for the zero-stuffed
//! signal. Each shaper stage is `(1 + k) x / (1 + k |x|)` with `k` derived
//! from the edge parameter; at edge 0 the stages are the identity and the
//! chain is linear.

use auxfx_core::{
    Biquad, BiquadType, DeviceParams, EffectError, EffectProps, EffectState, EffectTarget,
    EffectType, FRONT, FloatBufferLine, MAX_UPDATE_SAMPLES, OutputGains, pan_gains,
};
use core::f32::consts::FRAC_PI_2;
use libm::{fabsf, sinf};

const OVERSAMPLE: usize = 4;

/// Filter frequencies are clamped below Nyquist of the oversampled rate.
const MAX_F0NORM: f32 = 0.49;

/// Distortion effect state.
#[derive(Debug, Clone, Default)]
pub struct DistortionState {
    lowpass: Biquad,
    bandpass: Biquad,
    edge_coeff: f32,
    gains: OutputGains,
}

impl DistortionState {
    /// Creates a distortion with a clean shaper.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn shape(&self, sample: f32) -> f32 {
        let k = self.edge_coeff;
        let stage = |x: f32| (1.0 + k) * x / (1.0 + k * fabsf(x));
        stage(-stage(stage(sample)))
    }
}

impl EffectState for DistortionState {
    fn device_update(&mut self, device: &DeviceParams) -> Result<(), EffectError> {
        device.validate()?;
        self.lowpass.clear();
        self.bandpass.clear();
        self.gains.reset();
        Ok(())
    }

    fn update(&mut self, target: &EffectTarget, props: &EffectProps) {
        let EffectProps::Distortion(props) = props else {
            return;
        };
        let oversampled_rate = target.device.frequency() * OVERSAMPLE as f32;

        let edge = sinf(FRAC_PI_2 * props.edge).min(0.99);
        self.edge_coeff = 2.0 * edge / (1.0 - edge);

        // Lowpass bandwidth is constant in octaves.
        let cutoff = props.lowpass_cutoff;
        let bandwidth = (cutoff * 0.5) / (cutoff * 0.67);
        self.lowpass.set_params_from_bandwidth(
            BiquadType::LowPass,
            1.0,
            (cutoff / oversampled_rate).min(MAX_F0NORM),
            bandwidth,
        );

        // EQ bandwidth is given in Hz.
        let center = props.eq_center;
        let bandwidth = props.eq_bandwidth / (center * 0.67);
        self.bandpass.set_params_from_bandwidth(
            BiquadType::BandPass,
            1.0,
            (center / oversampled_rate).min(MAX_F0NORM),
            bandwidth,
        );

        self.gains
            .set_target(pan_gains(target.device.layout, FRONT, target.slot_gain * props.gain));
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

        let mut base = 0;
        while base < samples_to_do {
            let todo = MAX_UPDATE_SAMPLES.min(samples_to_do - base);
            let mut oversampled = [0.0f32; MAX_UPDATE_SAMPLES * OVERSAMPLE];
            let buffer = &mut oversampled[..todo * OVERSAMPLE];

            // Scale by the oversampling factor to keep the signal's level.
            let frames = buffer.chunks_exact_mut(OVERSAMPLE);
            for (frame, &sample) in frames.zip(&line[base..base + todo]) {
                frame[0] = sample * OVERSAMPLE as f32;
            }

            self.lowpass.process_in_place(buffer);
            for sample in buffer.iter_mut() {
                *sample = self.shape(*sample);
            }
            self.bandpass.process_in_place(buffer);

            let mut decimated = [0.0f32; MAX_UPDATE_SAMPLES];
            for (out, frame) in decimated.iter_mut().zip(buffer.chunks_exact(OVERSAMPLE)) {
                *out = frame[0];
            }

            self.gains.mix(&decimated[..todo], output, samples_to_do - base, base);
            base += todo;
        }
    }

    fn effect_type(&self) -> EffectType {
        EffectType::Distortion
    }
}

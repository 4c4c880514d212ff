//! Single-sideband frequency shifter.
//!
//! The first input channel runs through the STFT engine with an analytic
//! (Hilbert) transform, giving `x + j·H(x)` delayed by one frame. Each
//! output direction then multiplies the analytic signal by its own carrier
//! and keeps the real part:
//!
//! ```text
//!   up:   re·cos φ − im·sin φ   (every partial moves up by f)
//!   down: re·cos φ + im·sin φ   (every partial moves down by f)
//!   off:  re                    (phase held at zero)
//! ```
//!
//! The carrier phase is a 16-bit fixed-point accumulator. The left
//! direction is panned hard left, the right direction hard right.

use auxfx_core::{
    Complex, DeviceParams, EffectError, EffectProps, EffectState, EffectTarget, EffectType,
    FloatBufferLine, LEFT, MAX_UPDATE_SAMPLES, OutputGains, RIGHT, STFT_LATENCY, ShiftDirection,
    Stft, analytic_spectrum, pan_gains,
};
use core::f64::consts::TAU;

const PHASE_FRACBITS: u32 = 16;
const PHASE_FRACONE: u32 = 1 << PHASE_FRACBITS;
const PHASE_FRACMASK: u32 = PHASE_FRACONE - 1;

/// Carrier for one output direction.
#[derive(Debug, Clone, Copy)]
struct Carrier {
    phase: u32,
    step: u32,
    /// +1 shifts up, -1 shifts down.
    sign: f64,
}

impl Default for Carrier {
    fn default() -> Self {
        Self {
            phase: 0,
            step: 0,
            sign: 1.0,
        }
    }
}

impl Carrier {
    fn set(&mut self, direction: ShiftDirection, step: u32) {
        match direction {
            ShiftDirection::Up => {
                self.step = step;
                self.sign = 1.0;
            }
            ShiftDirection::Down => {
                self.step = step;
                self.sign = -1.0;
            }
            ShiftDirection::Off => {
                self.phase = 0;
                self.step = 0;
            }
        }
    }

    #[inline]
    fn modulate(&mut self, analytic: Complex<f64>) -> f32 {
        let phase = f64::from(self.phase) * (TAU / f64::from(PHASE_FRACONE));
        self.phase = (self.phase + self.step) & PHASE_FRACMASK;
        (analytic.re * phase.cos() - self.sign * analytic.im * phase.sin()) as f32
    }
}

/// Frequency shifter effect state.
#[derive(Debug, Default)]
pub struct FshifterState {
    stft: Stft,
    carriers: [Carrier; 2],
    gains: [OutputGains; 2],
}

impl FshifterState {
    /// Creates a shifter with no spectral storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EffectState for FshifterState {
    fn device_update(&mut self, device: &DeviceParams) -> Result<(), EffectError> {
        device.validate()?;
        self.stft.allocate()?;
        self.carriers = [Carrier::default(); 2];
        for gains in &mut self.gains {
            gains.reset();
        }
        tracing::debug!(latency = STFT_LATENCY, "frequency shifter ready");
        Ok(())
    }

    fn update(&mut self, target: &EffectTarget, props: &EffectProps) {
        let EffectProps::FrequencyShifter(props) = props else {
            return;
        };
        let step = (props.frequency / target.device.frequency()).min(1.0);
        let step = (step * PHASE_FRACONE as f32) as u32;
        self.carriers[0].set(props.left_direction, step);
        self.carriers[1].set(props.right_direction, step);

        let layout = target.device.layout;
        self.gains[0].set_target(pan_gains(layout, LEFT, target.slot_gain));
        self.gains[1].set_target(pan_gains(layout, RIGHT, target.slot_gain));
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

        let mut base = 0;
        while base < samples_to_do {
            let todo = MAX_UPDATE_SAMPLES.min(samples_to_do - base);
            let mut analytic = [Complex::new(0.0, 0.0); MAX_UPDATE_SAMPLES];
            self.stft
                .process(&line[base..base + todo], &mut analytic[..todo], analytic_spectrum);

            let counter = samples_to_do - base;
            for (carrier, gains) in self.carriers.iter_mut().zip(&mut self.gains) {
                let mut buffer = [0.0f32; MAX_UPDATE_SAMPLES];
                for (out, &a) in buffer.iter_mut().zip(&analytic[..todo]) {
                    *out = carrier.modulate(a);
                }
                gains.mix(&buffer[..todo], output, counter, base);
            }
            base += todo;
        }
    }

    fn latency_samples(&self) -> usize {
        STFT_LATENCY
    }

    fn effect_type(&self) -> EffectType {
        EffectType::FrequencyShifter
    }
}

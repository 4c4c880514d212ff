//! Two-tap echo with damped feedback.
//!
//! Both taps read one delay line. The second tap sits `lr_delay` behind the
//! first and also feeds back, through a one-pole lowpass, into the sample
//! just written. Each tap is panned on its own; `spread` pushes them apart.
//!
//! Tap delays are `round(seconds * rate) + 1`, so even a zero delay reads
//! the previous sample rather than the one being written.

use auxfx_core::{
    DelayLine, DeviceParams, EchoProps, EffectError, EffectProps, EffectState, EffectTarget,
    EffectType, FloatBufferLine, MAX_UPDATE_SAMPLES, OnePole, OutputGains, pan_gains,
};
use libm::{asinf, roundf};

/// Frequency at which the damping gain is specified.
const DAMPING_REFERENCE_HZ: f32 = 5000.0;
/// Lowest damping gain (-24 dB).
const MIN_DAMPING_GAIN: f32 = 0.0625;

/// Echo effect state.
#[derive(Debug, Clone, Default)]
pub struct EchoState {
    line: DelayLine,
    taps: [usize; 2],
    damping: OnePole,
    feedback: f32,
    gains: [OutputGains; 2],
}

impl EchoState {
    /// Creates an echo with no delay storage.
    pub fn new() -> Self {
        Self {
            taps: [1, 1],
            ..Self::default()
        }
    }
}

impl EffectState for EchoState {
    fn device_update(&mut self, device: &DeviceParams) -> Result<(), EffectError> {
        device.validate()?;
        let frequency = device.frequency();
        let required = roundf(EchoProps::MAX_DELAY * frequency) as usize
            + roundf(EchoProps::MAX_LR_DELAY * frequency) as usize
            + 2;
        self.line.ensure_capacity(required)?;
        self.damping.reset();
        for gains in &mut self.gains {
            gains.reset();
        }
        tracing::debug!(len = self.line.len(), "echo delay line sized");
        Ok(())
    }

    fn update(&mut self, target: &EffectTarget, props: &EffectProps) {
        let EffectProps::Echo(props) = props else {
            return;
        };
        let frequency = target.device.frequency();

        self.taps[0] = roundf(props.delay * frequency) as usize + 1;
        self.taps[1] = self.taps[0] + roundf(props.lr_delay * frequency) as usize;

        let gain = (1.0 - props.damping).max(MIN_DAMPING_GAIN);
        self.damping.set_gain_at(gain, (DAMPING_REFERENCE_HZ / frequency).min(0.5));
        self.feedback = props.feedback;

        // Spread is the lateral position; positive puts the first tap on the left.
        let angle = asinf(props.spread.clamp(-1.0, 1.0));
        let layout = target.device.layout;
        self.gains[0].set_target(pan_gains(layout, -angle, target.slot_gain));
        self.gains[1].set_target(pan_gains(layout, angle, target.slot_gain));
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
        if self.line.is_empty() {
            return;
        }

        let mut base = 0;
        while base < samples_to_do {
            let todo = MAX_UPDATE_SAMPLES.min(samples_to_do - base);
            let mut first = [0.0f32; MAX_UPDATE_SAMPLES];
            let mut second = [0.0f32; MAX_UPDATE_SAMPLES];

            for i in 0..todo {
                self.line.write(line[base + i]);
                first[i] = self.line.read(self.taps[0]);
                second[i] = self.line.read(self.taps[1]);
                let fed_back = self.damping.process_lowpass(second[i]) * self.feedback;
                self.line.add(0, fed_back);
            }

            let counter = samples_to_do - base;
            self.gains[0].mix(&first[..todo], output, counter, base);
            self.gains[1].mix(&second[..todo], output, counter, base);
            base += todo;
        }
    }

    fn effect_type(&self) -> EffectType {
        EffectType::Echo
    }
}

//! Stereo chorus and flanger.
//!
//! Both run the same engine: one delay line read by two taps whose delays
//! are swept by a shared LFO, the right tap displaced in phase. Feedback is
//! taken at the unmodulated delay and added back at the write head.
//!
//! ```text
//! in ──► [write] ──► delay line ──┬── tap(L, lfo) ──► pan left
//!           ▲                     ├── tap(R, lfo + disp) ──► pan right
//!           └──── × feedback ◄────┘ (base delay)
//! ```
//!
//! ## Delay modulation
//!
//! With `base` the delay in samples and `depth` in `0..=1`:
//!
//! | Waveform | Delay |
//! |----------|-------|
//! | Triangle | `base + depth * base * (2 - |2 - x|)`, `x` in `[0, 4)` |
//! | Sinusoid | `base + depth * base * (1 + sin x)`, `x` in `[0, 2π)` |
//!
//! so the swept delay stays in `[base, 3 * base]`. Fractional delays are
//! read with cubic interpolation.

use auxfx_core::{
    ChorusProps, ChorusWaveform, DelayLine, DeviceParams, EffectError, EffectProps, EffectState,
    EffectTarget, EffectType, FloatBufferLine, LEFT, MAX_UPDATE_SAMPLES, OutputGains, RIGHT,
    pan_gains,
};
use core::f32::consts::TAU;
use libm::{fabsf, floorf, roundf, sinf};

/// Longest LFO period in samples, so the displacement product fits in `u32`.
const MAX_LFO_RANGE: f32 = (i32::MAX / 360 - 180) as f32;

/// Chorus or flanger effect state.
///
/// # Example
///
/// ```rust
/// use auxfx_core::{
///     DeviceParams, EffectProps, EffectState, EffectTarget, EffectType, buffer_lines,
/// };
/// use auxfx_effects::ChorusState;
///
/// let device = DeviceParams::default();
/// let mut chorus = ChorusState::chorus();
/// chorus.device_update(&device).unwrap();
/// chorus.update(
///     &EffectTarget::new(device, 1.0, 1),
///     &EffectProps::default_for(EffectType::Chorus),
/// );
///
/// let input = buffer_lines(1);
/// let mut output = buffer_lines(2);
/// chorus.process(256, &input, &mut output);
/// ```
#[derive(Debug, Clone)]
pub struct ChorusState {
    kind: EffectType,
    line: DelayLine,

    lfo_offset: u32,
    lfo_range: u32,
    lfo_scale: f32,
    lfo_disp: u32,

    waveform: ChorusWaveform,
    base_delay: f32,
    depth: f32,
    feedback: f32,
    avg_delay: usize,

    gains: [OutputGains; 2],
}

impl ChorusState {
    fn with_kind(kind: EffectType) -> Self {
        Self {
            kind,
            line: DelayLine::new(),
            lfo_offset: 0,
            lfo_range: 1,
            lfo_scale: 0.0,
            lfo_disp: 0,
            waveform: ChorusWaveform::Triangle,
            base_delay: 1.0,
            depth: 0.0,
            feedback: 0.0,
            avg_delay: 1,
            gains: [OutputGains::new(); 2],
        }
    }

    /// Creates a chorus.
    pub fn chorus() -> Self {
        Self::with_kind(EffectType::Chorus)
    }

    /// Creates a flanger.
    pub fn flanger() -> Self {
        Self::with_kind(EffectType::Flanger)
    }

    fn max_delay(&self) -> f32 {
        match self.kind {
            EffectType::Flanger => ChorusProps::FLANGER_MAX_DELAY,
            _ => ChorusProps::CHORUS_MAX_DELAY,
        }
    }

    /// Swept delay in samples at LFO position `offset`.
    #[inline]
    fn modulated_delay(&self, offset: u32) -> f32 {
        let x = offset as f32 * self.lfo_scale;
        let sweep = match self.waveform {
            ChorusWaveform::Triangle => 2.0 - fabsf(2.0 - x),
            ChorusWaveform::Sinusoid => 1.0 + sinf(x),
        };
        self.base_delay + self.depth * sweep
    }

    #[inline]
    fn tap(&self, delay: f32) -> f32 {
        let whole = floorf(delay);
        self.line.read_cubic(whole as usize, delay - whole)
    }
}

impl EffectState for ChorusState {
    fn device_update(&mut self, device: &DeviceParams) -> Result<(), EffectError> {
        device.validate()?;
        let required = (self.max_delay() * 3.0 * device.frequency()) as usize + 4;
        self.line.ensure_capacity(required)?;
        for gains in &mut self.gains {
            gains.reset();
        }
        tracing::debug!(kind = self.kind.id(), len = self.line.len(), "chorus delay line sized");
        Ok(())
    }

    fn update(&mut self, target: &EffectTarget, props: &EffectProps) {
        let props = match (self.kind, props) {
            (EffectType::Chorus, EffectProps::Chorus(p))
            | (EffectType::Flanger, EffectProps::Flanger(p)) => p,
            _ => return,
        };
        let frequency = target.device.frequency();

        self.waveform = props.waveform;
        self.base_delay = (props.delay * frequency).max(1.0);
        self.depth = props.depth * self.base_delay;
        self.feedback = props.feedback;
        self.avg_delay = (roundf(self.base_delay) as usize).max(1);

        let layout = target.device.layout;
        self.gains[0].set_target(pan_gains(layout, LEFT, target.slot_gain));
        self.gains[1].set_target(pan_gains(layout, RIGHT, target.slot_gain));

        if props.rate > 0.0 {
            let range = (frequency / props.rate + 0.5).min(MAX_LFO_RANGE) as u32;
            let range = range.max(1);
            // Keep the LFO at the same relative position across rate changes.
            self.lfo_offset = (u64::from(self.lfo_offset) * u64::from(range)
                / u64::from(self.lfo_range)) as u32;
            self.lfo_range = range;
            self.lfo_scale = match self.waveform {
                ChorusWaveform::Triangle => 4.0 / range as f32,
                ChorusWaveform::Sinusoid => TAU / range as f32,
            };
            let phase = if props.phase < 0 { 360 + props.phase } else { props.phase };
            self.lfo_disp = (range * phase as u32 + 180) / 360;
        } else {
            self.lfo_offset = 0;
            self.lfo_range = 1;
            self.lfo_scale = 0.0;
            self.lfo_disp = 0;
        }
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
            let mut left = [0.0f32; MAX_UPDATE_SAMPLES];
            let mut right = [0.0f32; MAX_UPDATE_SAMPLES];

            for i in 0..todo {
                self.line.write(line[base + i]);

                let right_offset = (self.lfo_offset + self.lfo_disp) % self.lfo_range;
                left[i] = self.tap(self.modulated_delay(self.lfo_offset));
                right[i] = self.tap(self.modulated_delay(right_offset));

                let fed_back = self.line.read(self.avg_delay) * self.feedback;
                self.line.add(0, fed_back);

                self.lfo_offset += 1;
                if self.lfo_offset >= self.lfo_range {
                    self.lfo_offset = 0;
                }
            }

            let counter = samples_to_do - base;
            self.gains[0].mix(&left[..todo], output, counter, base);
            self.gains[1].mix(&right[..todo], output, counter, base);
            base += todo;
        }
    }

    fn effect_type(&self) -> EffectType {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auxfx_core::{BUFFER_LINE_SIZE, ChannelLayout, buffer_lines};

    fn setup(state: &mut ChorusState, props: EffectProps) -> DeviceParams {
        let device = DeviceParams::new(48000, ChannelLayout::Stereo);
        state.device_update(&device).unwrap();
        state.update(&EffectTarget::new(device, 1.0, 1), &props);
        device
    }

    #[test]
    fn test_buffer_sized_per_kind() {
        let mut chorus = ChorusState::chorus();
        chorus.device_update(&DeviceParams::default()).unwrap();
        assert_eq!(chorus.line.len(), 4096);

        let mut flanger = ChorusState::flanger();
        flanger.device_update(&DeviceParams::default()).unwrap();
        assert_eq!(flanger.line.len(), 1024);
    }

    #[test]
    fn test_rate_zero_holds_base_delay() {
        let mut props = ChorusProps::chorus();
        props.rate = 0.0;
        props.waveform = ChorusWaveform::Triangle;
        props.feedback = 0.0;
        props.delay = 0.001;
        let mut state = ChorusState::chorus();
        setup(&mut state, EffectProps::Chorus(props));
        assert_eq!(state.lfo_range, 1);
        assert_eq!(state.modulated_delay(0), 48.0);

        // Impulse comes out after exactly 48 samples, left side only.
        let mut input = buffer_lines(1);
        input[0][0] = 1.0;
        let mut output = buffer_lines(2);
        state.process(BUFFER_LINE_SIZE, &input, &mut output);
        let peak = output[0]
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
            .map(|(i, _)| i);
        assert_eq!(peak, Some(48));
    }

    #[test]
    fn test_sweep_stays_within_bounds() {
        for waveform in ChorusWaveform::ALL {
            let mut props = ChorusProps::chorus();
            props.waveform = *waveform;
            props.depth = 1.0;
            props.rate = 5.0;
            let mut state = ChorusState::chorus();
            setup(&mut state, EffectProps::Chorus(props));
            let base = state.base_delay;
            for offset in 0..state.lfo_range {
                let d = state.modulated_delay(offset);
                assert!(d >= base - 1e-3 && d <= 3.0 * base + 1e-3, "{waveform:?}: {d}");
            }
        }
    }

    #[test]
    fn test_phase_displacement() {
        let mut props = ChorusProps::chorus();
        props.rate = 1.0;
        props.phase = -90;
        let mut state = ChorusState::chorus();
        setup(&mut state, EffectProps::Chorus(props));
        assert_eq!(state.lfo_range, 48000);
        assert_eq!(state.lfo_disp, 36000);
    }

    #[test]
    fn test_rate_change_rescales_offset() {
        let mut props = ChorusProps::chorus();
        props.rate = 1.0;
        let mut state = ChorusState::chorus();
        setup(&mut state, EffectProps::Chorus(props));
        state.lfo_offset = 24000;
        props.rate = 2.0;
        state.update(
            &EffectTarget::new(DeviceParams::default(), 1.0, 1),
            &EffectProps::Chorus(props),
        );
        assert_eq!(state.lfo_offset, 12000);
    }

    #[test]
    fn test_feedback_bounded() {
        for feedback in [-0.99f32, 0.99] {
            let mut props = ChorusProps::flanger();
            props.feedback = feedback;
            let mut state = ChorusState::flanger();
            setup(&mut state, EffectProps::Flanger(props));

            let mut input = buffer_lines(1);
            input[0][0] = 1.0;
            let silence = buffer_lines(1);
            let mut peak = 0.0f32;
            for block in 0..200 {
                let mut output = buffer_lines(2);
                let src = if block == 0 { &input } else { &silence };
                state.process(BUFFER_LINE_SIZE, src, &mut output);
                for line in &output {
                    peak = line.iter().fold(peak, |m, s| m.max(s.abs()));
                }
            }
            assert!(peak.is_finite() && peak < 10.0, "feedback {feedback}: peak {peak}");
        }
    }

    #[test]
    fn test_unallocated_process_is_silent() {
        let mut state = ChorusState::chorus();
        let input = buffer_lines(1);
        let mut output = buffer_lines(2);
        state.process(64, &input, &mut output);
        assert!(output[0].iter().all(|&s| s == 0.0));
    }
}

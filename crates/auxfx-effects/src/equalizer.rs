//! Four-band equalizer.
//!
//! ```text
//!  gain
//!   │ ▔▔▔╲        ╱▔╲          ╱▔╲        ╱▔▔▔
//!   │     ╲______╱   ╲________╱   ╲______╱
//!   └──────────────────────────────────────── freq
//!     low shelf   mid 1        mid 2   high shelf
//! ```
//!
//! Every input channel runs its own cascade of the same four filters. Band
//! gains are in dB. Shelf and peaking filters specify their gain at the
//! middle of the transition, so each filter gets the square root of the band
//! gain to make the shelf or peak itself reach it.

use auxfx_core::{
    Biquad, BiquadType, DeviceParams, EffectError, EffectProps, EffectState, EffectTarget,
    EffectType, FloatBufferLine, MAX_INPUT_CHANNELS, MAX_UPDATE_SAMPLES, OutputGains, db_to_linear,
};
use libm::sqrtf;

/// Shelf slope used by both shelving bands.
const SHELF_SLOPE: f32 = 0.75;

/// Band frequencies are held below Nyquist on low-rate devices.
const MAX_F0NORM: f32 = 0.49;

#[derive(Debug, Clone, Default)]
struct ChannelBands {
    filters: [Biquad; 4],
    gains: OutputGains,
}

/// Equalizer effect state.
#[derive(Debug, Clone, Default)]
pub struct EqualizerState {
    channels: [ChannelBands; MAX_INPUT_CHANNELS],
    active: usize,
}

impl EqualizerState {
    /// Creates an equalizer with flat filters.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EffectState for EqualizerState {
    fn device_update(&mut self, device: &DeviceParams) -> Result<(), EffectError> {
        device.validate()?;
        for channel in &mut self.channels {
            for filter in &mut channel.filters {
                filter.clear();
            }
            channel.gains.reset();
        }
        Ok(())
    }

    fn update(&mut self, target: &EffectTarget, props: &EffectProps) {
        let EffectProps::Equalizer(props) = props else {
            return;
        };
        let frequency = target.device.frequency();
        let band_gain = |db: f32| sqrtf(db_to_linear(db));
        let norm = |hz: f32| (hz / frequency).min(MAX_F0NORM);

        let [low, mid1, mid2, high] = &mut self.channels[0].filters;
        low.set_params_from_slope(
            BiquadType::LowShelf,
            band_gain(props.low_gain),
            norm(props.low_cutoff),
            SHELF_SLOPE,
        );
        mid1.set_params_from_bandwidth(
            BiquadType::Peaking,
            band_gain(props.mid1_gain),
            norm(props.mid1_center),
            props.mid1_width,
        );
        mid2.set_params_from_bandwidth(
            BiquadType::Peaking,
            band_gain(props.mid2_gain),
            norm(props.mid2_center),
            props.mid2_width,
        );
        high.set_params_from_slope(
            BiquadType::HighShelf,
            band_gain(props.high_gain),
            norm(props.high_cutoff),
            SHELF_SLOPE,
        );

        self.active = target.input_channels.clamp(1, MAX_INPUT_CHANNELS);
        let (first, rest) = self.channels.split_at_mut(1);
        for channel in &mut rest[..self.active - 1] {
            for (filter, source) in channel.filters.iter_mut().zip(&first[0].filters) {
                filter.copy_params_from(source);
            }
        }
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
        for (channel, line) in self.channels[..self.active].iter_mut().zip(input) {
            let mut base = 0;
            while base < samples_to_do {
                let todo = MAX_UPDATE_SAMPLES.min(samples_to_do - base);
                let mut buffer = [0.0f32; MAX_UPDATE_SAMPLES];
                let chunk = &mut buffer[..todo];
                chunk.copy_from_slice(&line[base..base + todo]);
                for filter in &mut channel.filters {
                    filter.process_in_place(chunk);
                }
                channel.gains.mix(chunk, output, samples_to_do - base, base);
                base += todo;
            }
        }
    }

    fn effect_type(&self) -> EffectType {
        EffectType::Equalizer
    }
}

//! The [`EffectState`] contract every auxiliary effect implements.
//!
//! ## Lifecycle
//!
//! ```text
//! new() ──► device_update() ──► update() ──► process() ─┐
//!               ▲                  ▲                    │
//!               │                  └── props changed ───┤
//!               └──────── sample rate / layout changed ─┘
//! ```
//!
//! ## Design Decisions
//!
//! - **One allocation point**: only [`EffectState::device_update`] may
//!   allocate. It either finishes or leaves the previous buffers in place.
//!
//! - **Pure updates**: [`EffectState::update`] derives coefficients, LFO
//!   steps and target gains from already-validated parameters. It never
//!   fails; degenerate values take an identity or zero-modulation path.
//!
//! - **Additive output**: [`EffectState::process`] adds into the output
//!   accumulator through [`mix_samples`](crate::mix_samples), ramping from
//!   current to target gains. Several slots share one accumulator.
//!
//! - **Dynamic dispatch**: `process` runs once per block, so
//!   `Box<dyn EffectState>` costs nothing measurable.

use crate::{
    ChannelLayout, EffectError, EffectProps, EffectType, FloatBufferLine, MAX_OUTPUT_CHANNELS,
    pan_gains,
};

/// Output device description consumed by `device_update` and `update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceParams {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Output channel layout.
    pub layout: ChannelLayout,
}

impl DeviceParams {
    /// Creates a device description.
    pub const fn new(sample_rate: u32, layout: ChannelLayout) -> Self {
        Self {
            sample_rate,
            layout,
        }
    }

    /// Sample rate as `f32`.
    #[inline]
    pub fn frequency(&self) -> f32 {
        self.sample_rate as f32
    }

    /// Returns an error if the sample rate is unusable.
    pub fn validate(&self) -> Result<(), EffectError> {
        if self.sample_rate == 0 {
            return Err(EffectError::InvalidSampleRate(self.sample_rate));
        }
        Ok(())
    }
}

impl Default for DeviceParams {
    fn default() -> Self {
        Self::new(48000, ChannelLayout::Stereo)
    }
}

/// Routing context for `update`: where the slot's output goes and how loud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectTarget {
    /// Output device.
    pub device: DeviceParams,
    /// Wet-send gain of the owning slot.
    pub slot_gain: f32,
    /// Channels in the slot's input buffer. A single channel is a mono send.
    pub input_channels: usize,
}

impl EffectTarget {
    /// Creates a routing context.
    pub const fn new(device: DeviceParams, slot_gain: f32, input_channels: usize) -> Self {
        Self {
            device,
            slot_gain,
            input_channels,
        }
    }

    /// Target gains for input channel `channel` of an effect that processes
    /// each input channel independently.
    ///
    /// A mono send is panned to the front. Otherwise input channel *i* feeds
    /// output channel *i* at the slot gain.
    pub fn channel_gains(&self, channel: usize) -> [f32; MAX_OUTPUT_CHANNELS] {
        if self.input_channels <= 1 {
            return pan_gains(self.device.layout, 0.0, self.slot_gain);
        }
        let mut gains = [0.0; MAX_OUTPUT_CHANNELS];
        if channel < self.device.layout.channel_count() {
            gains[channel] = self.slot_gain;
        }
        gains
    }
}

/// Polymorphic per-slot effect state.
///
/// Implementations are constructed with no device-dependent storage, then
/// sized by `device_update` before the first `update`/`process`. Calling
/// `process` on an effect that has never been device-updated produces no
/// output.
pub trait EffectState: Send {
    /// (Re)computes sample-rate constants and (re)allocates buffers.
    ///
    /// Clears all history. On error the effect keeps its previous state.
    fn device_update(&mut self, device: &DeviceParams) -> Result<(), EffectError>;

    /// Derives per-block constants from `props` and routing from `target`.
    ///
    /// Props for a different effect type are ignored.
    fn update(&mut self, target: &EffectTarget, props: &EffectProps);

    /// Renders `samples_to_do` samples of `input` and adds the result into
    /// `output`.
    ///
    /// `samples_to_do` must not exceed [`BUFFER_LINE_SIZE`](crate::BUFFER_LINE_SIZE).
    /// Never allocates.
    fn process(
        &mut self,
        samples_to_do: usize,
        input: &[FloatBufferLine],
        output: &mut [FloatBufferLine],
    );

    /// Group delay introduced by the effect, in samples.
    fn latency_samples(&self) -> usize {
        0
    }

    /// Variant tag of this state.
    fn effect_type(&self) -> EffectType;
}

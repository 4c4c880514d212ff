//! Auxiliary effect slot.
//!
//! An [`AuxSlot`] owns one effect state together with the properties and
//! routing it renders with. Property, gain and routing changes only mark the
//! slot dirty; the pending `update` is applied at the start of the next
//! `process`, so a block never sees half-applied parameters.
//!
//! ```text
//!   new / set_effect ──► device_update ──► (dirty) ──► update ──► process ...
//!                             ▲                           ▲
//!                        set_device                set_props / set_gain
//! ```

use crate::create_state;
use auxfx_core::{
    DeviceParams, EffectError, EffectProps, EffectState, EffectTarget, EffectType, FloatBufferLine,
    MAX_INPUT_CHANNELS, ParameterInfo,
};

/// One auxiliary effect slot.
pub struct AuxSlot {
    state: Box<dyn EffectState>,
    props: EffectProps,
    gain: f32,
    device: DeviceParams,
    input_channels: usize,
    dirty: bool,
}

impl AuxSlot {
    /// Creates a slot running the null effect at unity gain.
    ///
    /// `input_channels` is the width of the send buffer (1 for a mono send).
    pub fn new(device: DeviceParams, input_channels: usize) -> Result<Self, EffectError> {
        device.validate()?;
        let mut state = create_state(EffectType::Null);
        state.device_update(&device)?;
        Ok(Self {
            state,
            props: EffectProps::Null,
            gain: 1.0,
            device,
            input_channels: input_channels.clamp(1, MAX_INPUT_CHANNELS),
            dirty: true,
        })
    }

    /// Variant currently loaded.
    pub fn effect_type(&self) -> EffectType {
        self.state.effect_type()
    }

    /// Properties the slot renders with.
    pub fn props(&self) -> &EffectProps {
        &self.props
    }

    /// Wet-send gain.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Output device the state is sized for.
    pub fn device(&self) -> DeviceParams {
        self.device
    }

    /// Group delay of the loaded effect in samples.
    pub fn latency_samples(&self) -> usize {
        self.state.latency_samples()
    }

    /// Replaces the loaded effect with a fresh `kind` state at default
    /// properties.
    ///
    /// The new state is sized before it replaces the old one; on error the
    /// slot keeps running its previous effect.
    pub fn set_effect(&mut self, kind: EffectType) -> Result<(), EffectError> {
        if kind == self.effect_type() {
            return Ok(());
        }
        let mut state = create_state(kind);
        state.device_update(&self.device)?;
        tracing::debug!(from = self.effect_type().id(), to = kind.id(), "slot retargeted");
        self.state = state;
        self.props = EffectProps::default_for(kind);
        self.dirty = true;
        Ok(())
    }

    /// Sets the properties, switching effect type first if they belong to
    /// another effect.
    pub fn set_props(&mut self, props: EffectProps) -> Result<(), EffectError> {
        self.set_effect(props.effect_type())?;
        self.props = props;
        self.dirty = true;
        Ok(())
    }

    /// Sets one parameter of the loaded effect by index. Out-of-range values
    /// are clamped.
    pub fn set_param(&mut self, index: usize, value: f32) {
        self.props.set_param(index, value);
        self.dirty = true;
    }

    /// Sets the wet-send gain, clamped to `0..=1`.
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
        self.dirty = true;
    }

    /// Sets the width of the send buffer.
    pub fn set_input_channels(&mut self, channels: usize) {
        self.input_channels = channels.clamp(1, MAX_INPUT_CHANNELS);
        self.dirty = true;
    }

    /// Resizes the loaded state for a new output device.
    pub fn set_device(&mut self, device: DeviceParams) -> Result<(), EffectError> {
        self.state.device_update(&device)?;
        tracing::debug!(
            sample_rate = device.sample_rate,
            layout = device.layout.name(),
            effect = self.effect_type().id(),
            "slot device updated"
        );
        self.device = device;
        self.dirty = true;
        Ok(())
    }

    /// Applies any pending update, then renders `samples_to_do` samples of
    /// `input` into `output`.
    pub fn process(
        &mut self,
        samples_to_do: usize,
        input: &[FloatBufferLine],
        output: &mut [FloatBufferLine],
    ) {
        if self.dirty {
            let target = EffectTarget::new(self.device, self.gain, self.input_channels);
            self.state.update(&target, &self.props);
            self.dirty = false;
        }
        self.state.process(samples_to_do, input, output);
    }
}

impl core::fmt::Debug for AuxSlot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuxSlot")
            .field("effect", &self.effect_type())
            .field("props", &self.props)
            .field("gain", &self.gain)
            .field("device", &self.device)
            .field("input_channels", &self.input_channels)
            .field("dirty", &self.dirty)
            .finish()
    }
}

//! Dedicated dialog and LFE routing.
//!
//! Neither variant filters. The send is scaled by `slot_gain * gain` and
//! placed on one speaker: dialog on front center (panned to the front when
//! the layout has no center speaker), LFE on the LFE channel (silent when the
//! layout has none).

use auxfx_core::{
    DeviceParams, EffectError, EffectProps, EffectState, EffectTarget, EffectType, FRONT,
    FloatBufferLine, MAX_OUTPUT_CHANNELS, OutputGains, Speaker, pan_gains,
};

/// Which speaker a [`DedicatedState`] feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedicatedChannel {
    /// Front center, for dialog.
    Dialog,
    /// Low-frequency effects.
    Lfe,
}

/// Gain-only pass-through to a fixed speaker.
#[derive(Debug, Clone)]
pub struct DedicatedState {
    channel: DedicatedChannel,
    gains: OutputGains,
}

impl DedicatedState {
    /// Creates a router for `channel`.
    pub const fn new(channel: DedicatedChannel) -> Self {
        Self {
            channel,
            gains: OutputGains::new(),
        }
    }

    /// Dialog router.
    pub const fn dialog() -> Self {
        Self::new(DedicatedChannel::Dialog)
    }

    /// LFE router.
    pub const fn lfe() -> Self {
        Self::new(DedicatedChannel::Lfe)
    }
}

impl EffectState for DedicatedState {
    fn device_update(&mut self, _device: &DeviceParams) -> Result<(), EffectError> {
        self.gains.reset();
        Ok(())
    }

    fn update(&mut self, target: &EffectTarget, props: &EffectProps) {
        let props = match (self.channel, props) {
            (DedicatedChannel::Dialog, EffectProps::DedicatedDialog(p))
            | (DedicatedChannel::Lfe, EffectProps::DedicatedLfe(p)) => p,
            _ => return,
        };
        let gain = target.slot_gain * props.gain;
        let layout = target.device.layout;

        let mut gains = [0.0; MAX_OUTPUT_CHANNELS];
        match self.channel {
            DedicatedChannel::Dialog => match layout.channel_of(Speaker::FrontCenter) {
                Some(index) => gains[index] = gain,
                None => gains = pan_gains(layout, FRONT, gain),
            },
            DedicatedChannel::Lfe => {
                if let Some(index) = layout.channel_of(Speaker::Lfe) {
                    gains[index] = gain;
                }
            }
        }
        self.gains.set_target(gains);
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
        self.gains.mix(&line[..samples_to_do], output, samples_to_do, 0);
    }

    fn effect_type(&self) -> EffectType {
        match self.channel {
            DedicatedChannel::Dialog => EffectType::DedicatedDialog,
            DedicatedChannel::Lfe => EffectType::DedicatedLfe,
        }
    }
}

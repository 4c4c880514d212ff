//! The effect an empty slot runs.

use auxfx_core::{
    DeviceParams, EffectError, EffectProps, EffectState, EffectTarget, EffectType, FloatBufferLine,
};

/// Contributes nothing to the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullState;

impl NullState {
    /// Creates the null effect.
    pub const fn new() -> Self {
        Self
    }
}

impl EffectState for NullState {
    fn device_update(&mut self, _device: &DeviceParams) -> Result<(), EffectError> {
        Ok(())
    }

    fn update(&mut self, _target: &EffectTarget, _props: &EffectProps) {}

    fn process(
        &mut self,
        _samples_to_do: usize,
        _input: &[FloatBufferLine],
        _output: &mut [FloatBufferLine],
    ) {
    }

    fn effect_type(&self) -> EffectType {
        EffectType::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auxfx_core::buffer_lines;

    #[test]
    fn test_null_leaves_output_untouched() {
        let mut state = NullState::new();
        state.device_update(&DeviceParams::default()).unwrap();
        state.update(&EffectTarget::new(DeviceParams::default(), 1.0, 1), &EffectProps::Null);

        let input = vec![[1.0; auxfx_core::BUFFER_LINE_SIZE]];
        let mut output = buffer_lines(2);
        output[1][5] = 0.25;
        state.process(512, &input, &mut output);
        assert!(output[0].iter().all(|&s| s == 0.0));
        assert_eq!(output[1][5], 0.25);
    }
}

//! Effect registry and slot driver for auxfx.
//!
//! This crate maps every [`EffectType`] to a constructor for its state and
//! carries the metadata needed to list effects and build parameter UIs.
//! [`AuxSlot`] drives one state through its lifecycle the way a mixer's
//! auxiliary effect slot does.
//!
//! # Features
//!
//! - **Effect Discovery**: List all available effects with metadata
//! - **Factory Pattern**: Create effect states by type or by id
//! - **Category System**: Effects organized by what they do to the send
//! - **Slot Driver**: Retargeting, lazy `update`, device changes
//!
//! # Example
//!
//! ```rust
//! use auxfx_core::{buffer_lines, DeviceParams, EffectType, BUFFER_LINE_SIZE};
//! use auxfx_registry::{AuxSlot, EffectCategory, EffectRegistry};
//!
//! let registry = EffectRegistry::new();
//! for effect in registry.effects_in_category(EffectCategory::Pitch) {
//!     println!("{}: {}", effect.id, effect.description);
//! }
//!
//! let mut slot = AuxSlot::new(DeviceParams::default(), 1).unwrap();
//! slot.set_effect(EffectType::Echo).unwrap();
//!
//! let input = buffer_lines(1);
//! let mut output = buffer_lines(2);
//! slot.process(BUFFER_LINE_SIZE, &input, &mut output);
//! ```

pub mod slot;

pub use slot::AuxSlot;

use auxfx_core::{EffectProps, EffectState, EffectType, ParameterInfo};
use auxfx_effects::{
    AutowahState, ChorusState, CompressorState, DedicatedState, DistortionState, EchoState,
    EqualizerState, FshifterState, ModulatorState, NullState, PshifterState, VmorpherState,
};

/// Category of effect for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectCategory {
    /// Level control (compressor)
    Dynamics,
    /// Waveshaping
    Distortion,
    /// LFO or carrier driven effects (chorus, flanger, ring modulator)
    Modulation,
    /// Delay based effects (echo)
    TimeBased,
    /// Filter effects (equalizer, autowah, vocal morpher)
    Filter,
    /// Spectral pitch and frequency shifting
    Pitch,
    /// Routing only (null, dedicated channels)
    Utility,
}

impl EffectCategory {
    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            EffectCategory::Dynamics => "Dynamics",
            EffectCategory::Distortion => "Distortion",
            EffectCategory::Modulation => "Modulation",
            EffectCategory::TimeBased => "Time-Based",
            EffectCategory::Filter => "Filter",
            EffectCategory::Pitch => "Pitch",
            EffectCategory::Utility => "Utility",
        }
    }
}

/// Describes an effect in the registry.
#[derive(Debug, Clone)]
pub struct EffectDescriptor {
    /// Variant this entry creates.
    pub kind: EffectType,
    /// Stable identifier, as used in configuration files.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description of the effect.
    pub description: &'static str,
    /// Category for organization.
    pub category: EffectCategory,
    /// Number of parameters.
    pub param_count: usize,
}

/// Constructs the empty state for `kind`.
///
/// The state has no device storage yet; call `device_update` before use.
pub fn create_state(kind: EffectType) -> Box<dyn EffectState> {
    match kind {
        EffectType::Null => Box::new(NullState::new()),
        EffectType::Chorus => Box::new(ChorusState::chorus()),
        EffectType::Flanger => Box::new(ChorusState::flanger()),
        EffectType::Echo => Box::new(EchoState::new()),
        EffectType::Distortion => Box::new(DistortionState::new()),
        EffectType::Equalizer => Box::new(EqualizerState::new()),
        EffectType::Compressor => Box::new(CompressorState::new()),
        EffectType::RingModulator => Box::new(ModulatorState::new()),
        EffectType::Autowah => Box::new(AutowahState::new()),
        EffectType::FrequencyShifter => Box::new(FshifterState::new()),
        EffectType::PitchShifter => Box::new(PshifterState::new()),
        EffectType::VocalMorpher => Box::new(VmorpherState::new()),
        EffectType::DedicatedDialog => Box::new(DedicatedState::dialog()),
        EffectType::DedicatedLfe => Box::new(DedicatedState::lfe()),
    }
}

/// Registry of all available effects.
pub struct EffectRegistry {
    entries: Vec<EffectDescriptor>,
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectRegistry {
    /// Create a new registry with all built-in effects registered.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(EffectType::ALL.len()),
        };
        registry.register_builtin_effects();
        registry
    }

    fn register_builtin_effects(&mut self) {
        self.register(EffectType::Null, "Null", "Silent placeholder", EffectCategory::Utility);
        self.register(
            EffectType::Chorus,
            "Chorus",
            "Stereo LFO-modulated delay",
            EffectCategory::Modulation,
        );
        self.register(
            EffectType::Flanger,
            "Flanger",
            "Short modulated delay with feedback",
            EffectCategory::Modulation,
        );
        self.register(
            EffectType::Echo,
            "Echo",
            "Two-tap delay with damped feedback",
            EffectCategory::TimeBased,
        );
        self.register(
            EffectType::Distortion,
            "Distortion",
            "4x oversampled waveshaper with pre-lowpass and post-EQ",
            EffectCategory::Distortion,
        );
        self.register(
            EffectType::Equalizer,
            "Equalizer",
            "Low shelf, two peaking bands, high shelf",
            EffectCategory::Filter,
        );
        self.register(
            EffectType::Compressor,
            "Compressor",
            "RMS automatic gain control",
            EffectCategory::Dynamics,
        );
        self.register(
            EffectType::RingModulator,
            "Ring Modulator",
            "Carrier multiplication after an input highpass",
            EffectCategory::Modulation,
        );
        self.register(
            EffectType::Autowah,
            "Autowah",
            "Envelope-swept resonant peaking filter",
            EffectCategory::Filter,
        );
        self.register(
            EffectType::FrequencyShifter,
            "Frequency Shifter",
            "Single-sideband shift of every partial by a fixed amount",
            EffectCategory::Pitch,
        );
        self.register(
            EffectType::PitchShifter,
            "Pitch Shifter",
            "Phase-vocoder pitch shift up to an octave",
            EffectCategory::Pitch,
        );
        self.register(
            EffectType::VocalMorpher,
            "Vocal Morpher",
            "Cross-fade between two vowel formant sets",
            EffectCategory::Filter,
        );
        self.register(
            EffectType::DedicatedDialog,
            "Dedicated Dialog",
            "Routes the send to the front-center speaker",
            EffectCategory::Utility,
        );
        self.register(
            EffectType::DedicatedLfe,
            "Dedicated LFE",
            "Routes the send to the LFE channel",
            EffectCategory::Utility,
        );
    }

    fn register(
        &mut self,
        kind: EffectType,
        name: &'static str,
        description: &'static str,
        category: EffectCategory,
    ) {
        self.entries.push(EffectDescriptor {
            kind,
            id: kind.id(),
            name,
            description,
            category,
            param_count: EffectProps::default_for(kind).param_count(),
        });
    }

    /// Returns descriptors for all registered effects.
    pub fn all_effects(&self) -> Vec<&EffectDescriptor> {
        self.entries.iter().collect()
    }

    /// Returns descriptors for effects in a specific category.
    pub fn effects_in_category(&self, category: EffectCategory) -> Vec<&EffectDescriptor> {
        self.entries.iter().filter(|e| e.category == category).collect()
    }

    /// Get a descriptor by effect ID.
    pub fn get(&self, id: &str) -> Option<&EffectDescriptor> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Create an effect state by ID.
    ///
    /// Returns `None` if the effect ID is not found.
    pub fn create(&self, id: &str) -> Option<Box<dyn EffectState>> {
        self.get(id).map(|e| create_state(e.kind))
    }

    /// Find a parameter index by name for a given effect.
    ///
    /// Matches the parameter's `string_id` or, ignoring case, its display name.
    pub fn param_index_by_name(&self, effect_id: &str, param_name: &str) -> Option<usize> {
        let props = EffectProps::default_for(self.get(effect_id)?.kind);
        let lower = param_name.to_lowercase();
        (0..props.param_count()).find(|&i| {
            props
                .param_info(i)
                .is_some_and(|desc| {
                    desc.string_id == param_name || desc.name.to_lowercase() == lower
                })
        })
    }

    /// Returns the number of registered effects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no effects are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auxfx_core::{BUFFER_LINE_SIZE, DeviceParams, EffectTarget, buffer_lines};

    #[test]
    fn test_registry_creation() {
        let registry = EffectRegistry::new();
        assert_eq!(registry.len(), EffectType::ALL.len());
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_get_effect() {
        let registry = EffectRegistry::new();

        let echo = registry.get("echo").unwrap();
        assert_eq!(echo.name, "Echo");
        assert_eq!(echo.kind, EffectType::Echo);
        assert_eq!(echo.param_count, 5);

        assert!(registry.get("reverb").is_none());
    }

    #[test]
    fn test_effects_by_category() {
        let registry = EffectRegistry::new();

        let modulation = registry.effects_in_category(EffectCategory::Modulation);
        assert_eq!(modulation.len(), 3); // Chorus, Flanger, RingModulator

        let filter = registry.effects_in_category(EffectCategory::Filter);
        assert_eq!(filter.len(), 3); // Equalizer, Autowah, VocalMorpher

        let pitch = registry.effects_in_category(EffectCategory::Pitch);
        assert_eq!(pitch.len(), 2);

        let utility = registry.effects_in_category(EffectCategory::Utility);
        assert_eq!(utility.len(), 3); // Null, Dialog, LFE
    }

    #[test]
    fn test_category_names() {
        assert_eq!(EffectCategory::TimeBased.name(), "Time-Based");
        assert_eq!(EffectCategory::Pitch.name(), "Pitch");
    }

    #[test]
    fn test_created_state_matches_type() {
        for kind in EffectType::ALL {
            assert_eq!(create_state(kind).effect_type(), kind);
        }
    }

    #[test]
    fn test_param_index_by_name() {
        let registry = EffectRegistry::new();
        assert_eq!(registry.param_index_by_name("echo", "lr_delay"), Some(1));
        assert_eq!(registry.param_index_by_name("echo", "LR Delay"), Some(1));
        assert_eq!(registry.param_index_by_name("echo", "rate"), None);
        assert_eq!(registry.param_index_by_name("nope", "rate"), None);
    }

    #[test]
    fn test_all_effects_can_be_created() {
        let registry = EffectRegistry::new();
        let device = DeviceParams::default();

        for descriptor in registry.all_effects() {
            let mut state = registry.create(descriptor.id).unwrap();
            state.device_update(&device).unwrap();
            state.update(
                &EffectTarget::new(device, 1.0, 1),
                &EffectProps::default_for(descriptor.kind),
            );

            let mut input = buffer_lines(1);
            input[0].fill(0.5);
            let mut output = buffer_lines(2);
            state.process(BUFFER_LINE_SIZE, &input, &mut output);
            assert!(
                output.iter().all(|line| line.iter().all(|s| s.is_finite())),
                "Effect {} produced non-finite output",
                descriptor.id
            );
        }
    }
}

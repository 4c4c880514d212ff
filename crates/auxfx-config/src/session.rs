//! Session file format: an output device plus the auxiliary slots feeding it.

use auxfx_core::{ChannelLayout, DeviceParams, EffectProps, EffectType, ParameterInfo};
use auxfx_registry::AuxSlot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;
use crate::validation::{EffectValidator, ValidationError, normalize_param_name};

/// Output device description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    /// Sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Channel layout name: `mono`, `stereo`, `quad`, `5.1`, `6.1` or `7.1`.
    #[serde(default = "default_layout")]
    pub layout: String,
}

fn default_sample_rate() -> u32 {
    48000
}

fn default_layout() -> String {
    ChannelLayout::Stereo.name().to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            layout: default_layout(),
        }
    }
}

impl DeviceConfig {
    /// Describes `device`.
    pub fn from_device(device: DeviceParams) -> Self {
        Self {
            sample_rate: device.sample_rate,
            layout: device.layout.name().to_string(),
        }
    }

    /// Resolves the layout name and checks the sample rate.
    pub fn to_device_params(&self) -> Result<DeviceParams, ConfigError> {
        let layout = ChannelLayout::from_name(&self.layout)
            .ok_or_else(|| ConfigError::UnknownLayout(self.layout.clone()))?;
        let device = DeviceParams::new(self.sample_rate, layout);
        device.validate()?;
        Ok(device)
    }
}

/// One auxiliary slot: which effect, its send gain and its parameters.
///
/// Parameters not listed keep the effect's defaults.
///
/// # TOML Format
///
/// ```toml
/// effect = "echo"
/// gain = 0.8
///
/// [params]
/// delay = 0.25
/// feedback = 0.4
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlotConfig {
    /// Effect id (e.g., `"echo"`, `"pitch_shifter"`).
    pub effect: String,

    /// Wet-send gain in `0..=1`.
    #[serde(default = "default_gain")]
    pub gain: f32,

    /// Parameter values keyed by `string_id`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, f32>,
}

fn default_gain() -> f32 {
    1.0
}

impl SlotConfig {
    /// Create a slot config for `effect` at unity gain and default parameters.
    pub fn new(effect: impl Into<String>) -> Self {
        Self {
            effect: effect.into(),
            gain: default_gain(),
            params: BTreeMap::new(),
        }
    }

    /// Set the send gain.
    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    /// Set a parameter value.
    pub fn with_param(mut self, name: impl Into<String>, value: f32) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Captures a slot's effect, gain and every parameter value.
    pub fn from_props(props: &EffectProps, gain: f32) -> Self {
        let params = (0..props.param_count())
            .filter_map(|i| {
                props
                    .param_info(i)
                    .map(|info| (info.string_id.to_string(), props.get_param(i)))
            })
            .collect();
        Self {
            effect: props.effect_type().id().to_string(),
            gain,
            params,
        }
    }

    /// Checks the effect id, the gain and every parameter, collecting all
    /// failures.
    pub fn validate(&self, validator: &mut EffectValidator) -> Result<(), ConfigError> {
        self.check_gain()?;
        validator.validate_params(
            &self.effect,
            self.params.iter().map(|(name, &value)| (name.as_str(), value)),
        )?;
        Ok(())
    }

    /// Builds validated properties for this slot's effect.
    pub fn build_props(&self) -> Result<EffectProps, ConfigError> {
        let kind = EffectType::from_id(&self.effect)
            .ok_or_else(|| ValidationError::UnknownEffect(self.effect.clone()))?;
        let mut props = EffectProps::default_for(kind);

        let mut errors = Vec::new();
        for (name, &value) in &self.params {
            let Some(index) = props.find_param(&normalize_param_name(name)) else {
                errors.push(ValidationError::UnknownParameter {
                    effect: self.effect.clone(),
                    param: name.clone(),
                });
                continue;
            };
            let Some(info) = props.param_info(index) else {
                continue;
            };
            if info.accepts(value) {
                props.set_param(index, value);
            } else if value >= info.min && value <= info.max {
                errors.push(ValidationError::InvalidFormat {
                    param: name.clone(),
                    reason: format!("expected a whole number, got {}", value),
                });
            } else {
                errors.push(ValidationError::OutOfRange {
                    param: name.clone(),
                    value,
                    min: info.min,
                    max: info.max,
                });
            }
        }
        ValidationError::from_list(errors)?;
        Ok(props)
    }

    /// Creates a ready-to-process slot on `device`.
    ///
    /// `input_channels` is the width of the send buffer the slot will be fed.
    pub fn build_slot(
        &self,
        device: DeviceParams,
        input_channels: usize,
    ) -> Result<AuxSlot, ConfigError> {
        self.check_gain()?;
        let props = self.build_props()?;
        let mut slot = AuxSlot::new(device, input_channels)?;
        slot.set_props(props)?;
        slot.set_gain(self.gain);
        tracing::debug!(effect = %self.effect, gain = self.gain, "slot built from config");
        Ok(slot)
    }

    fn check_gain(&self) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&self.gain) {
            Ok(())
        } else {
            Err(ConfigError::InvalidParameter {
                effect: self.effect.clone(),
                param: "gain".to_string(),
                reason: format!("send gain {} must be within [0, 1]", self.gain),
            })
        }
    }
}

/// A session document.
///
/// # TOML Format
///
/// ```toml
/// [device]
/// sample_rate = 48000
/// layout = "stereo"
///
/// [[slots]]
/// effect = "chorus"
/// gain = 0.5
///
/// [[slots]]
/// effect = "pitch_shifter"
/// [slots.params]
/// coarse_tune = -12
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Output device.
    #[serde(default)]
    pub device: DeviceConfig,

    /// Auxiliary slots, in mix order.
    #[serde(default)]
    pub slots: Vec<SlotConfig>,
}

impl SessionConfig {
    /// Create an empty session for `device`.
    pub fn new(device: DeviceConfig) -> Self {
        Self {
            device,
            slots: Vec::new(),
        }
    }

    /// Add a slot to the session.
    pub fn with_slot(mut self, slot: SlotConfig) -> Self {
        self.slots.push(slot);
        self
    }

    /// Load a session from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let session = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), slots = session.slots.len(), "session loaded");
        Ok(session)
    }

    /// Load a session from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the session to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the session to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the device and every slot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.device.to_device_params()?;
        let mut validator = EffectValidator::new();
        for slot in &self.slots {
            slot.validate(&mut validator)?;
        }
        Ok(())
    }

    /// Builds every slot for the session's device.
    pub fn build_slots(&self, input_channels: usize) -> Result<Vec<AuxSlot>, ConfigError> {
        let device = self.device.to_device_params()?;
        self.slots
            .iter()
            .map(|slot| slot.build_slot(device, input_channels))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auxfx_core::{EchoProps, PshifterProps};

    #[test]
    fn test_device_defaults() {
        let session = SessionConfig::from_toml("").unwrap();
        assert_eq!(session.device, DeviceConfig::default());
        assert_eq!(session.device.to_device_params().unwrap(), DeviceParams::default());
        assert!(session.slots.is_empty());
    }

    #[test]
    fn test_device_layouts() {
        let device = DeviceConfig {
            sample_rate: 44100,
            layout: "5.1".to_string(),
        };
        let params = device.to_device_params().unwrap();
        assert_eq!(params.layout, ChannelLayout::Surround51);
        assert_eq!(DeviceConfig::from_device(params), device);

        let bad = DeviceConfig {
            sample_rate: 44100,
            layout: "atmos".to_string(),
        };
        assert!(matches!(bad.to_device_params(), Err(ConfigError::UnknownLayout(_))));

        let silent = DeviceConfig {
            sample_rate: 0,
            layout: "mono".to_string(),
        };
        assert!(matches!(silent.to_device_params(), Err(ConfigError::Effect(_))));
    }

    #[test]
    fn test_parse_slots() {
        let session = SessionConfig::from_toml(
            r#"
            [device]
            sample_rate = 44100
            layout = "quad"

            [[slots]]
            effect = "echo"
            gain = 0.5
            [slots.params]
            delay = 0.2
            feedback = 0.25

            [[slots]]
            effect = "pitch_shifter"
            "#,
        )
        .unwrap();

        assert_eq!(session.device.sample_rate, 44100);
        assert_eq!(session.slots.len(), 2);
        assert_eq!(session.slots[0].gain, 0.5);
        assert_eq!(session.slots[0].params.get("delay"), Some(&0.2));
        assert_eq!(session.slots[1].gain, 1.0);
        assert!(session.slots[1].params.is_empty());
        session.validate().unwrap();
    }

    #[test]
    fn test_build_props_applies_values() {
        let props = SlotConfig::new("echo")
            .with_param("delay", 0.2)
            .with_param("lr_delay", 0.0)
            .build_props()
            .unwrap();
        let EffectProps::Echo(echo) = props else {
            panic!("expected echo props, got {props:?}");
        };
        assert_eq!(echo.delay, 0.2);
        assert_eq!(echo.lr_delay, 0.0);
        assert_eq!(echo.feedback, EchoProps::default().feedback);
    }

    #[test]
    fn test_build_props_rejects_bad_values() {
        let err = SlotConfig::new("echo").with_param("feedback", 2.0).build_props().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ValidationError::OutOfRange { .. })));

        let err = SlotConfig::new("echo")
            .with_param("feedback", 2.0)
            .with_param("size", 1.0)
            .build_props()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ValidationError::Multiple(_))));

        let err = SlotConfig::new("reverb").build_props().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ValidationError::UnknownEffect(_))));
    }

    #[test]
    fn test_gain_out_of_range() {
        let slot = SlotConfig::new("echo").with_gain(1.5);
        assert!(matches!(
            slot.build_slot(DeviceParams::default(), 1),
            Err(ConfigError::InvalidParameter { .. })
        ));
        assert!(slot.validate(&mut EffectValidator::new()).is_err());
    }

    #[test]
    fn test_build_slot() {
        let slot = SlotConfig::new("pitch_shifter")
            .with_gain(0.75)
            .with_param("coarse_tune", -12.0)
            .build_slot(DeviceParams::default(), 1)
            .unwrap();
        assert_eq!(slot.effect_type(), EffectType::PitchShifter);
        assert_eq!(slot.gain(), 0.75);
        assert_eq!(
            slot.props(),
            &EffectProps::PitchShifter(PshifterProps {
                coarse_tune: -12,
                fine_tune: 0,
            })
        );
    }

    #[test]
    fn test_from_props_captures_everything() {
        let props = EffectProps::default_for(EffectType::Equalizer);
        let config = SlotConfig::from_props(&props, 0.3);
        assert_eq!(config.effect, "equalizer");
        assert_eq!(config.params.len(), props.param_count());
        assert_eq!(config.build_props().unwrap(), props);
    }

    #[test]
    fn test_toml_round_trip() {
        let session = SessionConfig::new(DeviceConfig::default())
            .with_slot(SlotConfig::new("chorus").with_gain(0.5).with_param("rate", 2.0))
            .with_slot(SlotConfig::new("dedicated_lfe"));
        let text = session.to_toml().unwrap();
        assert_eq!(SessionConfig::from_toml(&text).unwrap(), session);
    }
}

//! Effect and parameter validation.
//!
//! The effect states assume their properties are already in range. This
//! module is the layer in front of them: it checks effect ids against the
//! registry and parameter names and values against each effect's
//! [`ParamDescriptor`](auxfx_core::ParamDescriptor) metadata.
//!
//! # Example
//!
//! ```rust
//! use auxfx_config::{EffectValidator, ValidationError};
//!
//! let mut validator = EffectValidator::new();
//! validator.validate_effect("echo").unwrap();
//! validator.validate_param_value("echo", "feedback", 0.5).unwrap();
//!
//! let err = validator.validate_param_value("echo", "feedback", 1.5).unwrap_err();
//! assert!(matches!(err, ValidationError::OutOfRange { .. }));
//! ```

use auxfx_core::{EffectProps, ParameterInfo};
use auxfx_registry::EffectRegistry;
use std::collections::HashMap;
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown effect type.
    #[error("unknown effect type: {0}")]
    UnknownEffect(String),

    /// Unknown parameter name.
    #[error("unknown parameter '{param}' for effect '{effect}'")]
    UnknownParameter {
        /// Id of the effect.
        effect: String,
        /// Name of the unrecognized parameter.
        param: String,
    },

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Invalid parameter format.
    #[error("invalid format for parameter '{param}': {reason}")]
    InvalidFormat {
        /// Name of the parameter.
        param: String,
        /// Description of the format error.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", join_errors(.0))]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Collapses a list of errors: `Ok` when empty, the error itself when
    /// there is exactly one, [`Multiple`](Self::Multiple) otherwise.
    pub fn from_list(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple(errors)),
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Effect parameter metadata for validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamValidationInfo {
    /// Parameter name (the descriptor's `string_id`).
    pub name: String,
    /// Parameter index in the effect's properties.
    pub index: usize,
    /// Minimum value.
    pub min: f32,
    /// Maximum value.
    pub max: f32,
    /// Default value.
    pub default: f32,
    /// Only whole numbers are accepted.
    pub stepped: bool,
}

/// Validator for effects and their parameters.
///
/// Parameter metadata is read once per effect from its default properties
/// and cached.
pub struct EffectValidator {
    registry: EffectRegistry,
    /// Maps effect id -> `Vec<ParamValidationInfo>`
    param_cache: HashMap<String, Vec<ParamValidationInfo>>,
}

impl Default for EffectValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectValidator {
    /// Create a new effect validator.
    pub fn new() -> Self {
        Self {
            registry: EffectRegistry::new(),
            param_cache: HashMap::new(),
        }
    }

    /// Get or create cached parameter info for an effect.
    fn get_params(&mut self, effect_id: &str) -> Option<&Vec<ParamValidationInfo>> {
        if !self.param_cache.contains_key(effect_id) {
            let kind = self.registry.get(effect_id)?.kind;
            let props = EffectProps::default_for(kind);
            let params = (0..props.param_count())
                .filter_map(|index| {
                    props.param_info(index).map(|desc| ParamValidationInfo {
                        name: desc.string_id.to_string(),
                        index,
                        min: desc.min,
                        max: desc.max,
                        default: desc.default,
                        stepped: desc.stepped,
                    })
                })
                .collect();
            self.param_cache.insert(effect_id.to_string(), params);
        }
        self.param_cache.get(effect_id)
    }

    /// Validate that an effect type exists.
    pub fn validate_effect(&self, effect_type: &str) -> ValidationResult<()> {
        if self.registry.get(effect_type).is_some() {
            Ok(())
        } else {
            Err(ValidationError::UnknownEffect(effect_type.to_string()))
        }
    }

    /// Validate a parameter name for an effect.
    pub fn validate_param_name(
        &mut self,
        effect_type: &str,
        param_name: &str,
    ) -> ValidationResult<()> {
        self.lookup(effect_type, param_name).map(|_| ())
    }

    /// Validate a parameter value for an effect.
    pub fn validate_param_value(
        &mut self,
        effect_type: &str,
        param_name: &str,
        value: f32,
    ) -> ValidationResult<()> {
        let param = self.lookup(effect_type, param_name)?;

        if !(value >= param.min && value <= param.max) {
            return Err(ValidationError::OutOfRange {
                param: param_name.to_string(),
                value,
                min: param.min,
                max: param.max,
            });
        }
        if param.stepped && value.fract() != 0.0 {
            return Err(ValidationError::InvalidFormat {
                param: param_name.to_string(),
                reason: format!("expected a whole number, got {}", value),
            });
        }
        Ok(())
    }

    /// Validates every `(name, value)` pair for one effect, collecting all
    /// failures.
    pub fn validate_params<'a>(
        &mut self,
        effect_type: &str,
        params: impl IntoIterator<Item = (&'a str, f32)>,
    ) -> ValidationResult<()> {
        self.validate_effect(effect_type)?;
        let errors = params
            .into_iter()
            .filter_map(|(name, value)| self.validate_param_value(effect_type, name, value).err())
            .collect();
        ValidationError::from_list(errors)
    }

    /// Get all valid effect type IDs.
    pub fn effect_ids(&self) -> Vec<&str> {
        self.registry.all_effects().iter().map(|e| e.id).collect()
    }

    /// Get parameter info for an effect type.
    pub fn effect_params(&mut self, effect_type: &str) -> Option<Vec<ParamValidationInfo>> {
        self.get_params(effect_type).cloned()
    }

    /// Find a parameter index by name for an effect type.
    ///
    /// Returns `None` if the effect or parameter is not found.
    pub fn find_param_index(&mut self, effect_type: &str, param_name: &str) -> Option<usize> {
        self.lookup(effect_type, param_name).ok().map(|p| p.index)
    }

    fn lookup(
        &mut self,
        effect_type: &str,
        param_name: &str,
    ) -> ValidationResult<ParamValidationInfo> {
        self.validate_effect(effect_type)?;
        let params = self
            .get_params(effect_type)
            .ok_or_else(|| ValidationError::UnknownEffect(effect_type.to_string()))?;

        let normalized_name = normalize_param_name(param_name);
        params
            .iter()
            .find(|p| p.name == normalized_name)
            .cloned()
            .ok_or_else(|| ValidationError::UnknownParameter {
                effect: effect_type.to_string(),
                param: param_name.to_string(),
            })
    }
}

/// Normalize a parameter name for consistent lookup.
///
/// Lowercases and maps spaces and dashes to underscores.
pub fn normalize_param_name(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Parse a parameter value from a string.
///
/// Accepts plain numbers plus a few unit suffixes, converted to the units the
/// effect properties use:
///
/// - `"6dB"`, `"440Hz"` - taken as is
/// - `"2.5kHz"` - converted to Hz
/// - `"120ms"` - converted to seconds
/// - `"50%"` - converted to a 0-1 fraction
pub fn parse_param_value(param_name: &str, value_str: &str) -> ValidationResult<f32> {
    let s = value_str.trim();
    let (number, scale) = if let Some(v) = s.strip_suffix("dB").or_else(|| s.strip_suffix("db")) {
        (v, 1.0)
    } else if let Some(v) = s.strip_suffix("kHz").or_else(|| s.strip_suffix("khz")) {
        (v, 1000.0)
    } else if let Some(v) = s.strip_suffix("Hz").or_else(|| s.strip_suffix("hz")) {
        (v, 1.0)
    } else if let Some(v) = s.strip_suffix("ms") {
        (v, 0.001)
    } else if let Some(v) = s.strip_suffix('%') {
        (v, 0.01)
    } else {
        (s, 1.0)
    };

    let number = number.trim();
    number
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v * scale)
        .ok_or_else(|| ValidationError::InvalidFormat {
            param: param_name.to_string(),
            reason: format!("cannot parse '{}' as number", number),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use auxfx_core::EffectType;

    #[test]
    fn test_validate_known_effects() {
        let validator = EffectValidator::new();
        for kind in EffectType::ALL {
            assert!(
                validator.validate_effect(kind.id()).is_ok(),
                "effect '{}' should be valid",
                kind.id()
            );
        }
        assert_eq!(validator.effect_ids().len(), EffectType::ALL.len());
    }

    #[test]
    fn test_validate_unknown_effect() {
        let validator = EffectValidator::new();
        let result = validator.validate_effect("reverb");
        assert!(matches!(result, Err(ValidationError::UnknownEffect(_))));
    }

    #[test]
    fn test_validate_param_name() {
        let mut validator = EffectValidator::new();

        assert!(validator.validate_param_name("echo", "lr_delay").is_ok());
        assert!(validator.validate_param_name("echo", "LR-Delay").is_ok());
        assert!(validator.validate_param_name("flanger", "feedback").is_ok());
        assert!(validator.validate_param_name("vocal_morpher", "phoneme_b").is_ok());

        let result = validator.validate_param_name("echo", "room_size");
        assert!(matches!(result, Err(ValidationError::UnknownParameter { .. })));

        let result = validator.validate_param_name("null", "gain");
        assert!(matches!(result, Err(ValidationError::UnknownParameter { .. })));
    }

    #[test]
    fn test_validate_param_value_range() {
        let mut validator = EffectValidator::new();

        assert!(validator.validate_param_value("echo", "damping", 0.0).is_ok());
        assert!(validator.validate_param_value("echo", "damping", 0.99).is_ok());
        assert_eq!(
            validator.validate_param_value("echo", "damping", 1.0),
            Err(ValidationError::OutOfRange {
                param: "damping".to_string(),
                value: 1.0,
                min: 0.0,
                max: 0.99,
            })
        );

        // Chorus and flanger share fields with different delay limits.
        assert!(validator.validate_param_value("chorus", "delay", 0.01).is_ok());
        assert!(validator.validate_param_value("flanger", "delay", 0.01).is_err());
    }

    #[test]
    fn test_rejects_nan() {
        let mut validator = EffectValidator::new();
        assert!(matches!(
            validator.validate_param_value("echo", "feedback", f32::NAN),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_stepped_params_need_whole_numbers() {
        let mut validator = EffectValidator::new();
        assert!(validator.validate_param_value("ring_modulator", "waveform", 2.0).is_ok());
        assert!(matches!(
            validator.validate_param_value("ring_modulator", "waveform", 1.5),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_params_collects_errors() {
        let mut validator = EffectValidator::new();
        assert!(
            validator
                .validate_params("echo", [("delay", 0.2), ("feedback", 0.3)])
                .is_ok()
        );

        let err = validator
            .validate_params("echo", [("delay", 5.0), ("wobble", 0.3), ("spread", 0.0)])
            .unwrap_err();
        assert_eq!(err.to_string().matches("; ").count(), 1);
        match err {
            ValidationError::Multiple(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected multiple errors, got {other:?}"),
        }

        let err = validator.validate_params("echo", [("delay", 5.0)]).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn test_param_metadata_cached() {
        let mut validator = EffectValidator::new();
        let params = validator.effect_params("echo").unwrap();
        assert_eq!(params.len(), 5);
        assert_eq!(params[1].name, "lr_delay");
        assert_eq!(validator.find_param_index("echo", "spread"), Some(4));
        assert!(validator.param_cache.contains_key("echo"));
        assert!(validator.effect_params("reverb").is_none());
    }

    #[test]
    fn test_parse_param_value_plain_numbers() {
        assert_eq!(parse_param_value("x", "0.5"), Ok(0.5));
        assert_eq!(parse_param_value("x", " -6 "), Ok(-6.0));
        assert_eq!(parse_param_value("x", "12"), Ok(12.0));
    }

    #[test]
    fn test_parse_param_value_units() {
        assert_eq!(parse_param_value("gain", "-6dB"), Ok(-6.0));
        assert_eq!(parse_param_value("freq", "440 Hz"), Ok(440.0));
        assert_eq!(parse_param_value("freq", "2kHz"), Ok(2000.0));
        assert_eq!(parse_param_value("delay", "250ms"), Ok(0.25));
        assert_eq!(parse_param_value("depth", "50%"), Ok(0.5));
    }

    #[test]
    fn test_parse_param_value_invalid() {
        assert!(matches!(
            parse_param_value("delay", "soon"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(parse_param_value("delay", "inf").is_err());
        assert!(parse_param_value("delay", "ms").is_err());
    }
}

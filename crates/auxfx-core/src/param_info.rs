//! Parameter introspection for effect property structs.
//!
//! Every effect's parameter block implements [`ParameterInfo`], which exposes
//! its fields by index together with a [`ParamDescriptor`] carrying name,
//! unit, range and default. The configuration layer uses this to validate
//! user input by name before anything reaches an effect's `update`, and the
//! CLI uses it to list parameters.
//!
//! Enumerated parameters (waveforms, directions, phonemes, switches) are
//! exposed as stepped values: the variant's index as an `f32`.
//!
//! # Example
//!
//! ```rust
//! use auxfx_core::{EchoProps, ParameterInfo};
//!
//! let mut echo = EchoProps::default();
//! let index = echo.find_param("feedback").unwrap();
//! echo.set_param(index, 0.75);
//! assert_eq!(echo.feedback, 0.75);
//!
//! let info = echo.param_info(index).unwrap();
//! assert_eq!((info.min, info.max), (0.0, 1.0));
//! ```

/// Unit a parameter value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamUnit {
    /// Seconds - delay and envelope times.
    Seconds,
    /// Hertz - frequencies and LFO rates.
    Hertz,
    /// Decibels - band gains.
    Decibels,
    /// Degrees - LFO phase offsets.
    Degrees,
    /// Semitones - coarse pitch.
    Semitones,
    /// Cents - fine pitch.
    Cents,
    /// Octaves - filter bandwidth.
    Octaves,
    /// No unit - dimensionless amounts and enumerations.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Seconds => " s",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Decibels => " dB",
            ParamUnit::Degrees => " deg",
            ParamUnit::Semitones => " st",
            ParamUnit::Cents => " ct",
            ParamUnit::Octaves => " oct",
            ParamUnit::None => "",
        }
    }
}

/// Metadata for one effect parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Display name (e.g., "LR Delay").
    pub name: &'static str,

    /// Stable snake_case identifier used in configuration files
    /// (e.g., `"lr_delay"`).
    pub string_id: &'static str,

    /// Unit for display.
    pub unit: ParamUnit,

    /// Minimum allowed value.
    pub min: f32,

    /// Maximum allowed value.
    pub max: f32,

    /// Value of a freshly constructed property block.
    pub default: f32,

    /// Only whole-number values are meaningful.
    pub stepped: bool,
}

impl ParamDescriptor {
    /// Describes a continuous parameter.
    pub const fn new(
        name: &'static str,
        string_id: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            string_id,
            unit,
            min,
            max,
            default,
            stepped: false,
        }
    }

    /// Describes an enumerated parameter with `count` variants.
    pub const fn choice(
        name: &'static str,
        string_id: &'static str,
        count: usize,
        default: usize,
    ) -> Self {
        Self {
            name,
            string_id,
            unit: ParamUnit::None,
            min: 0.0,
            max: (count - 1) as f32,
            default: default as f32,
            stepped: true,
        }
    }

    /// Marks the parameter as taking whole numbers only.
    pub const fn stepped(mut self) -> Self {
        self.stepped = true;
        self
    }

    /// Returns `true` if `value` is within range (and whole, if stepped).
    pub fn accepts(&self, value: f32) -> bool {
        value >= self.min && value <= self.max && (!self.stepped || value.fract() == 0.0)
    }

    /// Clamps `value` into range, rounding stepped values.
    pub fn clamp(&self, value: f32) -> f32 {
        let value = if self.stepped { value.round() } else { value };
        value.clamp(self.min, self.max)
    }
}

/// Index-based access to an effect's parameters.
///
/// Indices are stable for a given type. `set_param` clamps out-of-range
/// values; strict rejection is the configuration layer's job.
pub trait ParameterInfo {
    /// Number of parameters.
    fn param_count(&self) -> usize;

    /// Descriptor for the parameter at `index`, or `None` past the end.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value of the parameter at `index` (0.0 past the end).
    fn get_param(&self, index: usize) -> f32;

    /// Sets the parameter at `index`. Ignored past the end.
    fn set_param(&mut self, index: usize, value: f32);

    /// Finds a parameter index by its `string_id`.
    fn find_param(&self, string_id: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i)
                .is_some_and(|info| info.string_id == string_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_range() {
        let desc = ParamDescriptor::choice("Waveform", "waveform", 3, 1);
        assert_eq!(desc.min, 0.0);
        assert_eq!(desc.max, 2.0);
        assert_eq!(desc.default, 1.0);
        assert!(desc.accepts(2.0));
        assert!(!desc.accepts(1.5));
        assert!(!desc.accepts(3.0));
    }

    #[test]
    fn test_clamp_rounds_stepped() {
        let desc = ParamDescriptor::new(
            "Coarse",
            "coarse_tune",
            ParamUnit::Semitones,
            -12.0,
            12.0,
            0.0,
        )
        .stepped();
        assert_eq!(desc.clamp(3.4), 3.0);
        assert_eq!(desc.clamp(40.0), 12.0);
    }

    #[test]
    fn test_suffix() {
        assert_eq!(ParamUnit::Hertz.suffix(), " Hz");
        assert_eq!(ParamUnit::None.suffix(), "");
    }
}

//! Session configuration for auxfx.
//!
//! This crate loads and saves TOML session files describing an output device
//! and the auxiliary slots that feed it, and validates effect ids and
//! parameter values before they reach an effect state.
//!
//! # Features
//!
//! - **Session Files**: [`SessionConfig`] with a [`DeviceConfig`] and a list of [`SlotConfig`]s
//! - **Validation**: Effect ids checked against the registry, parameter values
//!   against each effect's declared ranges
//! - **Slot Construction**: Turn a slot config into a ready [`auxfx_registry::AuxSlot`]
//!
//! # Example
//!
//! ```rust
//! use auxfx_config::{SessionConfig, SlotConfig};
//!
//! let session = SessionConfig::from_toml(
//!     r#"
//!     [device]
//!     sample_rate = 48000
//!     layout = "stereo"
//!
//!     [[slots]]
//!     effect = "echo"
//!     gain = 0.8
//!     [slots.params]
//!     delay = 0.25
//!     feedback = 0.4
//!     "#,
//! )
//! .unwrap();
//!
//! session.validate().unwrap();
//! let slots = session.build_slots(1).unwrap();
//! assert_eq!(slots.len(), 1);
//!
//! let bad = SlotConfig::new("echo").with_param("feedback", 3.0);
//! assert!(bad.build_props().is_err());
//! ```

mod error;
mod session;

/// Effect and parameter validation.
pub mod validation;

pub use error::ConfigError;
pub use session::{DeviceConfig, SessionConfig, SlotConfig};
pub use validation::{
    EffectValidator, ParamValidationInfo, ValidationError, ValidationResult, normalize_param_name,
    parse_param_value,
};

//! Error type for effect device configuration.
//!
//! Only [`EffectState::device_update`](crate::EffectState::device_update) can
//! fail. Parameter updates and block processing have no error path: degenerate
//! parameter values are handled inline, and anything else is a contract
//! violation by the caller.

use thiserror::Error;

/// Errors raised while (re)configuring an effect for an output device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EffectError {
    /// A device-dependent buffer could not be allocated.
    ///
    /// The effect keeps its previous buffers, so the slot can be retried or
    /// disabled.
    #[error("failed to allocate effect storage of {requested} samples")]
    Allocation {
        /// Number of elements that were requested.
        requested: usize,
    },

    /// The device reported a sample rate the effects cannot run at.
    #[error("invalid device sample rate: {0} Hz")]
    InvalidSampleRate(u32),
}

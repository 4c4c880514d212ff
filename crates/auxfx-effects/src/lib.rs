//! auxfx Effects - Auxiliary-send effect states
//!
//! Every type here implements [`auxfx_core::EffectState`] and renders one
//! auxiliary slot's send into the shared output accumulator:
//!
//! - [`ChorusState`] - Chorus and flanger (LFO-modulated stereo delay)
//! - [`EchoState`] - Two-tap echo with damped feedback
//! - [`DistortionState`] - 4x oversampled waveshaper with pre/post filters
//! - [`EqualizerState`] - Low shelf, two peaking bands, high shelf
//! - [`CompressorState`] - RMS automatic gain control
//! - [`ModulatorState`] - Ring modulator with input highpass
//! - [`AutowahState`] - Envelope-swept peaking filter
//! - [`FshifterState`] - Single-sideband frequency shifter (STFT Hilbert)
//! - [`PshifterState`] - Phase-vocoder pitch shifter
//! - [`VmorpherState`] - Two-vowel formant filter cross-fade
//! - [`DedicatedState`] - Dialog / LFE gain-only routing
//! - [`NullState`] - Silent placeholder
//!
//! ## Example
//!
//! ```rust
//! use auxfx_core::{
//!     buffer_lines, ChannelLayout, DeviceParams, EchoProps, EffectProps, EffectState,
//!     EffectTarget, BUFFER_LINE_SIZE,
//! };
//! use auxfx_effects::EchoState;
//!
//! let device = DeviceParams::new(48000, ChannelLayout::Stereo);
//! let mut echo = EchoState::new();
//! echo.device_update(&device).unwrap();
//! echo.update(&EffectTarget::new(device, 1.0, 1), &EffectProps::Echo(EchoProps::default()));
//!
//! let mut input = buffer_lines(1);
//! input[0][0] = 1.0;
//! let mut output = buffer_lines(2);
//! echo.process(BUFFER_LINE_SIZE, &input, &mut output);
//! ```
//!
//! States are built empty; `device_update` sizes their buffers. Until then
//! `process` adds nothing.

pub mod autowah;
pub mod chorus;
pub mod compressor;
pub mod dedicated;
pub mod distortion;
pub mod echo;
pub mod equalizer;
pub mod fshifter;
pub mod modulator;
pub mod null;
pub mod pshifter;
pub mod vmorpher;

// Re-export main types at crate root
pub use autowah::AutowahState;
pub use chorus::ChorusState;
pub use compressor::CompressorState;
pub use dedicated::{DedicatedChannel, DedicatedState};
pub use distortion::DistortionState;
pub use echo::EchoState;
pub use equalizer::EqualizerState;
pub use fshifter::FshifterState;
pub use modulator::ModulatorState;
pub use null::NullState;
pub use pshifter::PshifterState;
pub use vmorpher::VmorpherState;

//! auxfx Core - DSP primitives and the effect-state contract
//!
//! This crate provides the building blocks shared by every auxiliary-send
//! effect: filters, delay lines, the STFT engine, the additive mix bus, and
//! the [`EffectState`] trait that ties them to a mixer.
//!
//! # Core Abstractions
//!
//! ## Effect System
//!
//! - [`EffectState`] - Object-safe trait for all slot effects
//! - [`DeviceParams`] - Sample rate and channel layout of the output device
//! - [`EffectTarget`] - Slot gain and routing handed to `update`
//! - [`EffectProps`] / [`EffectType`] - Tagged parameter blocks per effect
//!
//! ## Mix Bus
//!
//! - [`mix_samples`] - Adds a mono line into output channels with gain ramps
//! - [`OutputGains`] - Current/target gain pair for one output tap
//! - [`FloatBufferLine`] - One channel of [`BUFFER_LINE_SIZE`] samples
//! - [`pan_gains`] - Per-speaker gains for a direction
//!
//! ## Filters
//!
//! - [`Biquad`] - Second-order IIR with RBJ cookbook coefficients
//! - [`OnePole`] - One-pole lowpass/highpass
//!
//! ## Delay Lines
//!
//! - [`DelayLine`] - Power-of-two ring buffer with cubic fractional reads
//!
//! ## Spectral Processing
//!
//! - [`Stft`] - 1024-point overlap-add analysis/resynthesis
//! - [`PhaseVocoder`] - Bin remapping with phase bookkeeping
//!
//! ## Parameters
//!
//! - [`ParameterInfo`] - Index-based parameter introspection
//! - [`ParamDescriptor`] - Name, unit, range and default of one parameter
//!
//! # Example
//!
//! ```rust
//! use auxfx_core::{Biquad, BiquadType, DelayLine};
//!
//! let mut lowpass = Biquad::new();
//! lowpass.set_params_from_bandwidth(BiquadType::LowPass, 1.0, 1000.0 / 48000.0, 1.0);
//!
//! let mut delay = DelayLine::new();
//! delay.ensure_capacity(4800).unwrap();
//! delay.write(lowpass.process_sample(1.0));
//! assert!(delay.read(0) > 0.0);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: allocation happens only in `device_update`
//! - **Additive output**: effects sum into a shared accumulator
//! - **Object-safe traits**: slots hold `Box<dyn EffectState>`
//! - **Fallible configuration**: allocation failure is an [`EffectError`], not a panic

pub mod biquad;
pub mod delay;
pub mod effect;
pub mod error;
pub mod layout;
pub mod math;
pub mod mixbus;
pub mod one_pole;
pub mod param_info;
pub mod props;
pub mod spectral;

// Re-export main types at crate root
pub use biquad::{Biquad, BiquadType, rcp_q_from_bandwidth, rcp_q_from_slope};
pub use delay::DelayLine;
pub use effect::{DeviceParams, EffectState, EffectTarget};
pub use error::EffectError;
pub use layout::{BACK, ChannelLayout, FRONT, LEFT, RIGHT, Speaker, pan_gains};
pub use math::{db_to_linear, flush_denormal, lerp};
pub use mixbus::{
    BUFFER_LINE_SIZE, FloatBufferLine, GAIN_SILENCE_THRESHOLD, MAX_INPUT_CHANNELS,
    MAX_OUTPUT_CHANNELS, MAX_UPDATE_SAMPLES, OutputGains, buffer_lines, mix_samples,
};
pub use one_pole::OnePole;
pub use param_info::{ParamDescriptor, ParamUnit, ParameterInfo};
pub use props::{
    AutowahProps, ChorusProps, ChorusWaveform, CompressorProps, DedicatedProps, DistortionProps,
    EchoProps, EffectProps, EffectType, EqualizerProps, FshifterProps, ModulatorProps,
    ModulatorWaveform, MorpherWaveform, Phoneme, PshifterProps, ShiftDirection, VmorpherProps,
};
pub use rustfft::num_complex::Complex;
pub use spectral::{
    FftPair, FrequencyBin, PhaseVocoder, STFT_HALF_SIZE, STFT_LATENCY, STFT_SIZE, STFT_STEP, Stft,
    analytic_spectrum, wrap_phase,
};

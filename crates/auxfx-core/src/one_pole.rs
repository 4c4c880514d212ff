//! One-pole filter for damping and DC-removal paths.
//!
//! A single-pole IIR lowpass with the difference equation:
//!
//! ```text
//! y[n] = x[n] + coeff * (y[n-1] - x[n])
//!      = (1 - coeff) * x[n] + coeff * y[n-1]
//! ```
//!
//! The complementary highpass is `x[n] - y[n]`. A coefficient of zero makes
//! the lowpass an exact passthrough.
//!
//! Two ways to pick the coefficient:
//!
//! - [`OnePole::set_cutoff`]: `coeff = exp(-2π * f0norm)`
//! - [`OnePole::set_gain_at`]: solve for the coefficient that gives a chosen
//!   linear gain at a reference frequency. Echo damping uses this so that
//!   "damping" reads as "how much of 5 kHz survives each repeat".
//!
//! # Reference
//!
//! Julius O. Smith III, "Introduction to Digital Filters with Audio Applications",
//! Section: One-Pole Filter.

use crate::flush_denormal;
use core::f32::consts::TAU;
use libm::{cosf, expf, sqrtf};

/// Smallest magnitude [`OnePole::set_gain_at`] will target.
const MIN_GAIN_AT: f32 = 0.004;

/// One-pole (6 dB/oct) lowpass with a complementary highpass output.
///
/// # Invariants
///
/// - `coeff` is always in [0, 1) for stable operation
/// - `state` is flushed to zero when below 1e-20 (denormal protection)
#[derive(Debug, Clone, Default)]
pub struct OnePole {
    state: f32,
    coeff: f32,
}

impl OnePole {
    /// Creates a passthrough filter (`coeff = 0`).
    pub const fn new() -> Self {
        Self {
            state: 0.0,
            coeff: 0.0,
        }
    }

    /// Sets the -3 dB cutoff from a normalized frequency (`f0 / sample_rate`).
    pub fn set_cutoff(&mut self, f0norm: f32) {
        self.coeff = expf(-TAU * f0norm);
    }

    /// Chooses the coefficient so the lowpass response at `f0norm` has the
    /// given linear magnitude.
    ///
    /// Gains at or above ~1 give a passthrough. Gains are floored at -48 dB
    /// so the coefficient stays below 1.
    pub fn set_gain_at(&mut self, gain: f32, f0norm: f32) {
        let power = (gain * gain).max(MIN_GAIN_AT * MIN_GAIN_AT);
        self.coeff = if power < 0.9999 {
            let cw = cosf(TAU * f0norm);
            (1.0 - power * cw - sqrtf(2.0 * power * (1.0 - cw) - power * power * (1.0 - cw * cw)))
                / (1.0 - power)
        } else {
            0.0
        };
    }

    /// Current coefficient.
    #[inline]
    pub fn coeff(&self) -> f32 {
        self.coeff
    }

    /// Processes one sample through the lowpass.
    #[inline]
    pub fn process_lowpass(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(input + self.coeff * (self.state - input));
        self.state
    }

    /// Processes one sample through the complementary highpass.
    #[inline]
    pub fn process_highpass(&mut self, input: f32) -> f32 {
        input - self.process_lowpass(input)
    }

    /// Resets the filter state to zero.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}

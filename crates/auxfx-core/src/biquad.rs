//! Biquad (bi-quadratic) filter section.
//!
//! A second-order IIR filter configured from the RBJ Audio EQ Cookbook
//! formulas. Frequencies are normalized (`f0 / sample_rate`, so 0.5 is
//! Nyquist) and bandwidth is passed as the reciprocal of Q, which lets the
//! shelf-slope and octave-bandwidth forms share one coefficient routine.
//!
//! Shelf and peaking gains are the cookbook's `A`, the square root of the
//! linear gain at the band center. Callers that want a band to reach a
//! linear gain `g` pass `sqrt(g)`.

use core::f32::consts::{LN_2, TAU};
use libm::{cosf, sinf, sinhf, sqrtf};

/// Response shape of a [`Biquad`] section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiquadType {
    /// Boosts or cuts everything below the corner frequency.
    LowShelf,
    /// Boosts or cuts everything above the corner frequency.
    HighShelf,
    /// Bell-shaped boost or cut around the center frequency.
    Peaking,
    /// Second-order low-pass.
    LowPass,
    /// Second-order high-pass.
    HighPass,
    /// Constant 0 dB peak gain band-pass.
    BandPass,
}

/// Second-order IIR filter with its two-sample input/output history.
///
/// Implements the Direct Form I structure:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
///
/// Coefficients are normalized by `a0`. Recomputing coefficients never
/// touches the history, so parameter changes do not click.
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    /// Input history: x[n-1], x[n-2]
    x1: f32,
    x2: f32,

    /// Output history: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a passthrough biquad (`y[n] = x[n]`) with cleared history.
    pub const fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Computes coefficients for the given response.
    ///
    /// # Arguments
    ///
    /// * `kind` - Filter response
    /// * `gain` - Cookbook `A` for shelf/peaking types; ignored otherwise
    /// * `f0norm` - Reference frequency divided by sample rate, in (0, 0.5)
    /// * `rcp_q` - Reciprocal of the filter Q
    pub fn set_params(&mut self, kind: BiquadType, gain: f32, f0norm: f32, rcp_q: f32) {
        let w0 = TAU * f0norm;
        let sin_w0 = sinf(w0);
        let cos_w0 = cosf(w0);
        let alpha = sin_w0 / 2.0 * rcp_q;

        let (b, a) = match kind {
            BiquadType::HighShelf => {
                let sqrtgain_alpha_2 = 2.0 * sqrtf(gain) * alpha;
                (
                    [
                        gain * ((gain + 1.0) + (gain - 1.0) * cos_w0 + sqrtgain_alpha_2),
                        -2.0 * gain * ((gain - 1.0) + (gain + 1.0) * cos_w0),
                        gain * ((gain + 1.0) + (gain - 1.0) * cos_w0 - sqrtgain_alpha_2),
                    ],
                    [
                        (gain + 1.0) - (gain - 1.0) * cos_w0 + sqrtgain_alpha_2,
                        2.0 * ((gain - 1.0) - (gain + 1.0) * cos_w0),
                        (gain + 1.0) - (gain - 1.0) * cos_w0 - sqrtgain_alpha_2,
                    ],
                )
            }
            BiquadType::LowShelf => {
                let sqrtgain_alpha_2 = 2.0 * sqrtf(gain) * alpha;
                (
                    [
                        gain * ((gain + 1.0) - (gain - 1.0) * cos_w0 + sqrtgain_alpha_2),
                        2.0 * gain * ((gain - 1.0) - (gain + 1.0) * cos_w0),
                        gain * ((gain + 1.0) - (gain - 1.0) * cos_w0 - sqrtgain_alpha_2),
                    ],
                    [
                        (gain + 1.0) + (gain - 1.0) * cos_w0 + sqrtgain_alpha_2,
                        -2.0 * ((gain - 1.0) + (gain + 1.0) * cos_w0),
                        (gain + 1.0) + (gain - 1.0) * cos_w0 - sqrtgain_alpha_2,
                    ],
                )
            }
            BiquadType::Peaking => (
                [1.0 + alpha * gain, -2.0 * cos_w0, 1.0 - alpha * gain],
                [1.0 + alpha / gain, -2.0 * cos_w0, 1.0 - alpha / gain],
            ),
            BiquadType::LowPass => (
                [(1.0 - cos_w0) / 2.0, 1.0 - cos_w0, (1.0 - cos_w0) / 2.0],
                [1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha],
            ),
            BiquadType::HighPass => (
                [(1.0 + cos_w0) / 2.0, -(1.0 + cos_w0), (1.0 + cos_w0) / 2.0],
                [1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha],
            ),
            BiquadType::BandPass => (
                [alpha, 0.0, -alpha],
                [1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha],
            ),
        };

        self.set_coefficients(b[0], b[1], b[2], a[0], a[1], a[2]);
    }

    /// Computes coefficients with the bandwidth given as a shelf slope.
    ///
    /// A slope of 1 is the steepest shelf without overshoot. The gain is
    /// floored at 0.001 to keep the slope formula finite.
    pub fn set_params_from_slope(&mut self, kind: BiquadType, gain: f32, f0norm: f32, slope: f32) {
        let gain = gain.max(0.001);
        self.set_params(kind, gain, f0norm, rcp_q_from_slope(gain, slope));
    }

    /// Computes coefficients with the bandwidth given in octaves.
    pub fn set_params_from_bandwidth(
        &mut self,
        kind: BiquadType,
        gain: f32,
        f0norm: f32,
        bandwidth: f32,
    ) {
        self.set_params(kind, gain, f0norm, rcp_q_from_bandwidth(f0norm, bandwidth));
    }

    /// Sets raw coefficients, normalizing by `a0`.
    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) {
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }

    /// Copies another filter's coefficients, keeping this filter's history.
    pub fn copy_params_from(&mut self, other: &Biquad) {
        self.b0 = other.b0;
        self.b1 = other.b1;
        self.b2 = other.b2;
        self.a1 = other.a1;
        self.a2 = other.a2;
    }

    /// Processes a single sample.
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Filters `src` into `dst`. Processes `min(src.len(), dst.len())` samples.
    pub fn process(&mut self, src: &[f32], dst: &mut [f32]) {
        for (out, &input) in dst.iter_mut().zip(src) {
            *out = self.process_sample(input);
        }
    }

    /// Filters a buffer in place.
    pub fn process_in_place(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    /// Clears the history. Coefficients are kept.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

/// Reciprocal Q for a shelf of the given gain and slope.
///
/// `1/Q = sqrt((A + 1/A) * (1/S - 1) + 2)`
pub fn rcp_q_from_slope(gain: f32, slope: f32) -> f32 {
    sqrtf((gain + 1.0 / gain) * (1.0 / slope - 1.0) + 2.0)
}

/// Reciprocal Q for a band `bandwidth` octaves wide, measured between the
/// -3 dB points of the bilinear-warped response.
///
/// `1/Q = 2 * sinh(ln(2)/2 * BW * w0 / sin(w0))`
pub fn rcp_q_from_bandwidth(f0norm: f32, bandwidth: f32) -> f32 {
    let w0 = TAU * f0norm;
    2.0 * sinhf(LN_2 / 2.0 * bandwidth * w0 / sinf(w0))
}

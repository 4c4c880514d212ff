//! Short-time Fourier transform engine for the spectral effects.
//!
//! [`Stft`] runs a fixed 1024-point analysis/resynthesis loop with 4x
//! overlap. Input samples accumulate in a FIFO; each time a full frame is
//! available it is Hann-windowed, transformed, handed to a caller-supplied
//! spectral transform, inverse-transformed, windowed again and overlap-added
//! into the output accumulator.
//!
//! ```text
//!   Accumulating ──(count == STFT_SIZE)──► Analyzing ──► Resynthesizing
//!        ▲                                                    │
//!        └──────────── count = FIFO_LATENCY, shift by hop ◄───┘
//! ```
//!
//! The squared periodic Hann window sums to 1.5 at 4x overlap, so with an
//! identity transform the output equals the input delayed by
//! [`STFT_LATENCY`] samples. Output is complex: the frequency shifter needs
//! the analytic signal, the pitch shifter takes the real part.
//!
//! [`PhaseVocoder`] holds the per-bin phase bookkeeping used to move
//! partials between bins without smearing their phase.
//!
//! All buffers are allocated by [`Stft::allocate`] / [`PhaseVocoder::allocate`],
//! which effects call from `device_update`. FFT plans come from
//! [`rustfft`], in `f64` so phase accumulation stays exact over long runs.

use crate::EffectError;
use core::f64::consts::{PI, TAU};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Frame length in samples.
pub const STFT_SIZE: usize = 1024;
/// Bins from DC to Nyquist inclusive, minus one.
pub const STFT_HALF_SIZE: usize = STFT_SIZE / 2;
/// Frames overlapping each output sample.
pub const OVERSAMPLE: usize = 4;
/// Hop between frames.
pub const STFT_STEP: usize = STFT_SIZE / OVERSAMPLE;
/// Samples already in the FIFO when a new hop starts filling it.
pub const FIFO_LATENCY: usize = STFT_STEP * (OVERSAMPLE - 1);
/// Delay from input to output of an identity transform.
pub const STFT_LATENCY: usize = STFT_SIZE;

/// Normalizes the unscaled inverse FFT and the summed squared window.
const OLA_SCALE: f64 = 1.0 / (STFT_SIZE as f64 * 1.5);

const ZERO: Complex<f64> = Complex { re: 0.0, im: 0.0 };

fn try_filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>, EffectError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| EffectError::Allocation { requested: len })?;
    buffer.resize(len, value);
    Ok(buffer)
}

/// Forward and inverse FFT plans of one size with shared scratch space.
pub struct FftPair {
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl FftPair {
    /// Plans both directions for `size`-point transforms.
    pub fn new(size: usize) -> Result<Self, EffectError> {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        Ok(Self {
            forward,
            inverse,
            scratch: try_filled(scratch_len, ZERO)?,
        })
    }

    /// Unnormalized forward transform in place.
    pub fn forward(&mut self, buffer: &mut [Complex<f64>]) {
        self.forward.process_with_scratch(buffer, &mut self.scratch);
    }

    /// Unnormalized inverse transform in place.
    pub fn inverse(&mut self, buffer: &mut [Complex<f64>]) {
        self.inverse.process_with_scratch(buffer, &mut self.scratch);
    }
}

impl core::fmt::Debug for FftPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FftPair")
            .field("size", &self.forward.len())
            .finish_non_exhaustive()
    }
}

/// Overlap-add STFT engine with a fixed frame size of [`STFT_SIZE`].
#[derive(Debug)]
pub struct Stft {
    fft: Option<FftPair>,
    window: Vec<f64>,
    in_fifo: Vec<f64>,
    out_fifo: Vec<Complex<f64>>,
    accum: Vec<Complex<f64>>,
    frame: Vec<Complex<f64>>,
    count: usize,
}

impl Stft {
    /// Creates an engine with no storage.
    pub const fn new() -> Self {
        Self {
            fft: None,
            window: Vec::new(),
            in_fifo: Vec::new(),
            out_fifo: Vec::new(),
            accum: Vec::new(),
            frame: Vec::new(),
            count: FIFO_LATENCY,
        }
    }

    /// Allocates buffers and FFT plans on first use, then clears all state.
    pub fn allocate(&mut self) -> Result<(), EffectError> {
        if self.fft.is_none() {
            let window = (0..STFT_SIZE)
                .map(|i| {
                    let s = (PI * i as f64 / STFT_SIZE as f64).sin();
                    s * s
                })
                .collect::<Vec<_>>();
            let in_fifo = try_filled(STFT_SIZE, 0.0)?;
            let out_fifo = try_filled(STFT_STEP, ZERO)?;
            let accum = try_filled(STFT_SIZE, ZERO)?;
            let frame = try_filled(STFT_SIZE, ZERO)?;
            let fft = FftPair::new(STFT_SIZE)?;

            self.window = window;
            self.in_fifo = in_fifo;
            self.out_fifo = out_fifo;
            self.accum = accum;
            self.frame = frame;
            self.fft = Some(fft);

            #[cfg(feature = "tracing")]
            tracing::debug!(frame = STFT_SIZE, hop = STFT_STEP, "stft allocated");
        }
        self.reset();
        Ok(())
    }

    /// Returns `true` once [`allocate`](Self::allocate) has succeeded.
    pub fn is_allocated(&self) -> bool {
        self.fft.is_some()
    }

    /// Clears the FIFOs and accumulator.
    pub fn reset(&mut self) {
        self.in_fifo.fill(0.0);
        self.out_fifo.fill(ZERO);
        self.accum.fill(ZERO);
        self.frame.fill(ZERO);
        self.count = FIFO_LATENCY;
    }

    /// Streams `input` through the engine, writing one complex output sample
    /// per input sample.
    ///
    /// `transform` receives each frame's full spectrum (DC at index 0,
    /// negative frequencies in the upper half) and may rewrite it in place.
    /// Processes `min(input.len(), output.len())` samples; writes zeros if
    /// the engine is not allocated.
    pub fn process<F>(&mut self, input: &[f32], output: &mut [Complex<f64>], mut transform: F)
    where
        F: FnMut(&mut [Complex<f64>]),
    {
        let Some(fft) = self.fft.as_mut() else {
            output.fill(ZERO);
            return;
        };

        for (&sample, out) in input.iter().zip(output.iter_mut()) {
            self.in_fifo[self.count] = f64::from(sample);
            *out = self.out_fifo[self.count - FIFO_LATENCY];
            self.count += 1;
            if self.count < STFT_SIZE {
                continue;
            }
            self.count = FIFO_LATENCY;

            for ((bin, &x), &w) in self.frame.iter_mut().zip(&self.in_fifo).zip(&self.window) {
                *bin = Complex::new(x * w, 0.0);
            }
            fft.forward(&mut self.frame);
            transform(&mut self.frame);
            fft.inverse(&mut self.frame);

            for ((acc, &bin), &w) in self.accum.iter_mut().zip(&self.frame).zip(&self.window) {
                *acc += bin * (w * OLA_SCALE);
            }

            self.out_fifo.copy_from_slice(&self.accum[..STFT_STEP]);
            self.accum.copy_within(STFT_STEP.., 0);
            self.accum[STFT_SIZE - STFT_STEP..].fill(ZERO);
            self.in_fifo.copy_within(STFT_STEP.., 0);
        }
    }
}

impl Default for Stft {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns a full spectrum into the spectrum of its analytic signal: DC and
/// Nyquist kept, positive frequencies doubled, negative frequencies zeroed.
///
/// The inverse transform of the result has the original signal as its real
/// part and the signal's Hilbert transform as its imaginary part.
pub fn analytic_spectrum(bins: &mut [Complex<f64>]) {
    let half = bins.len() / 2;
    for bin in &mut bins[1..half] {
        *bin *= 2.0;
    }
    for bin in &mut bins[half + 1..] {
        *bin = ZERO;
    }
}

/// Wraps a phase into [-π, π].
#[inline]
pub fn wrap_phase(phase: f64) -> f64 {
    phase - TAU * (phase / TAU).round()
}

/// Amplitude and true frequency (in fractional bins) of one partial.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrequencyBin {
    /// Magnitude of the bin.
    pub amplitude: f64,
    /// Instantaneous frequency measured in bins.
    pub frequency: f64,
}

/// Phase-vocoder state for bin remapping between STFT frames.
///
/// Analysis recovers each bin's true frequency from the phase advance since
/// the previous frame; synthesis accumulates phase at the remapped frequency.
#[derive(Debug, Clone, Default)]
pub struct PhaseVocoder {
    last_phase: Vec<f64>,
    sum_phase: Vec<f64>,
    analysis: Vec<FrequencyBin>,
    synthesis: Vec<FrequencyBin>,
}

impl PhaseVocoder {
    /// Fixed-point fraction bits of the bin shift factor.
    pub const FRAC_BITS: u32 = 16;
    /// Fixed-point one.
    pub const FRAC_ONE: u32 = 1 << Self::FRAC_BITS;

    /// Creates a vocoder with no storage.
    pub const fn new() -> Self {
        Self {
            last_phase: Vec::new(),
            sum_phase: Vec::new(),
            analysis: Vec::new(),
            synthesis: Vec::new(),
        }
    }

    /// Allocates per-bin state on first use, then clears it.
    pub fn allocate(&mut self) -> Result<(), EffectError> {
        let bins = STFT_HALF_SIZE + 1;
        if self.last_phase.len() != bins {
            let last_phase = try_filled(bins, 0.0)?;
            let sum_phase = try_filled(bins, 0.0)?;
            let analysis = try_filled(bins, FrequencyBin::default())?;
            let synthesis = try_filled(bins, FrequencyBin::default())?;
            self.last_phase = last_phase;
            self.sum_phase = sum_phase;
            self.analysis = analysis;
            self.synthesis = synthesis;
        }
        self.reset();
        Ok(())
    }

    /// Clears phase history.
    pub fn reset(&mut self) {
        self.last_phase.fill(0.0);
        self.sum_phase.fill(0.0);
        self.analysis.fill(FrequencyBin::default());
        self.synthesis.fill(FrequencyBin::default());
    }

    /// Rewrites `spectrum` (one full [`STFT_SIZE`] frame) with every partial
    /// moved by the pitch ratio.
    ///
    /// `shift` is the ratio in [`FRAC_BITS`](Self::FRAC_BITS) fixed point;
    /// `ratio` is the same value as a float. Partials whose new bin lies
    /// above Nyquist are dropped. The result is an analytic spectrum.
    pub fn shift(&mut self, spectrum: &mut [Complex<f64>], shift: u32, ratio: f64) {
        if self.analysis.len() != STFT_HALF_SIZE + 1 || spectrum.len() != STFT_SIZE {
            return;
        }
        let expected = TAU / OVERSAMPLE as f64;

        for (k, (bin, last)) in self.analysis.iter_mut().zip(&mut self.last_phase).enumerate() {
            let (amplitude, phase) = spectrum[k].to_polar();
            let delta = wrap_phase(phase - *last - k as f64 * expected);
            *last = phase;
            *bin = FrequencyBin {
                amplitude,
                frequency: k as f64 + delta / expected,
            };
        }

        self.synthesis.fill(FrequencyBin::default());
        for (k, bin) in self.analysis.iter().enumerate() {
            let j = (k * shift as usize) >> Self::FRAC_BITS;
            if j > STFT_HALF_SIZE {
                break;
            }
            self.synthesis[j].amplitude += bin.amplitude;
            self.synthesis[j].frequency = bin.frequency * ratio;
        }

        for (k, (bin, sum)) in self.synthesis.iter().zip(&mut self.sum_phase).enumerate() {
            *sum = wrap_phase(*sum + bin.frequency * expected);
            spectrum[k] = Complex::from_polar(bin.amplitude, *sum);
        }
        analytic_spectrum(spectrum);
    }
}

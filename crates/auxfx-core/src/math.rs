//! Small scalar helpers shared by the effects.

use libm::powf;

/// Flush denormal (subnormal) floats to zero.
///
/// Recursive filter states decay toward zero and can land in the subnormal
/// range, where some CPUs slow down by orders of magnitude.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Linear interpolation: `a + (b - a) * t`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Convert decibels to linear amplitude.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    powf(10.0, db / 20.0)
}

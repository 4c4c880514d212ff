//! Power-of-two circular delay line.
//!
//! The buffer length is always a power of two, so wrapping an index is a
//! bitmask AND. The write head only moves forward: it survives buffer
//! resizes and is never reset, which keeps read offsets relative to the
//! most recent write valid across [`DelayLine::ensure_capacity`].
//!
//! | Effect | Longest delay |
//! |--------|---------------|
//! | Flanger | 8 ms (twice the maximum delay) |
//! | Chorus | 32 ms (twice the maximum delay) |
//! | Echo | 0.207 s + 0.404 s |

use crate::EffectError;

/// Circular float buffer with a masked write head.
///
/// `read(0)` returns the sample most recently passed to [`write`](Self::write);
/// `read(n)` returns the sample written `n` writes earlier.
///
/// # Example
///
/// ```rust
/// use auxfx_core::DelayLine;
///
/// let mut line = DelayLine::new();
/// line.ensure_capacity(100).unwrap();
/// assert_eq!(line.len(), 128);
///
/// line.write(0.5);
/// line.write(0.25);
/// assert_eq!(line.read(0), 0.25);
/// assert_eq!(line.read(1), 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DelayLine {
    buffer: Vec<f32>,
    mask: usize,
    head: usize,
}

impl DelayLine {
    /// Creates an empty delay line. No storage is allocated until
    /// [`ensure_capacity`](Self::ensure_capacity).
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            mask: 0,
            head: 0,
        }
    }

    /// Sizes the buffer to the smallest power of two holding `required`
    /// samples and zero-fills all of it.
    ///
    /// A new buffer is only allocated when the length changes. If the
    /// allocation fails the previous buffer stays in place untouched.
    pub fn ensure_capacity(&mut self, required: usize) -> Result<(), EffectError> {
        let size = required.max(1).next_power_of_two();
        if size != self.buffer.len() {
            let mut fresh = Vec::new();
            fresh
                .try_reserve_exact(size)
                .map_err(|_| EffectError::Allocation { requested: size })?;
            fresh.resize(size, 0.0);
            self.buffer = fresh;
            self.mask = size - 1;

            #[cfg(feature = "tracing")]
            tracing::debug!(samples = size, "delay line resized");
        } else {
            self.buffer.fill(0.0);
        }
        Ok(())
    }

    /// Buffer length in samples (a power of two, or zero before sizing).
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` until the line has been sized.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Advances the head and stores `sample` there.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.head = self.head.wrapping_add(1);
        self.buffer[self.head & self.mask] = sample;
    }

    /// Reads the sample written `offset` writes ago.
    #[inline]
    pub fn read(&self, offset: usize) -> f32 {
        self.buffer[self.head.wrapping_sub(offset) & self.mask]
    }

    /// Adds `value` to the sample written `offset` writes ago.
    ///
    /// Feedback paths use `add(0, ...)` to mix into the sample just written.
    #[inline]
    pub fn add(&mut self, offset: usize, value: f32) {
        let index = self.head.wrapping_sub(offset) & self.mask;
        self.buffer[index] += value;
    }

    /// Reads at a fractional delay of `offset + frac` samples using 4-point
    /// cubic interpolation.
    ///
    /// `offset` must be at least 1 so the newer neighbor has been written.
    #[inline]
    pub fn read_cubic(&self, offset: usize, frac: f32) -> f32 {
        let y0 = self.read(offset - 1);
        let y1 = self.read(offset);
        let y2 = self.read(offset + 1);
        let y3 = self.read(offset + 2);

        let a0 = y3 - y2 - y0 + y1;
        let a1 = y0 - y1 - a0;
        let a2 = y2 - y0;

        ((a0 * frac + a1) * frac + a2) * frac + y1
    }

    /// Zeroes the buffer without moving the head.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_of_two_sizing() {
        let mut line = DelayLine::new();
        for (required, expected) in [(1, 1), (2, 2), (3, 4), (4800, 8192), (8192, 8192)] {
            line.ensure_capacity(required).unwrap();
            assert_eq!(line.len(), expected, "required {required}");
        }
    }

    #[test]
    fn test_read_zero_returns_last_write() {
        let mut line = DelayLine::new();
        line.ensure_capacity(16).unwrap();
        for i in 0..100 {
            let x = i as f32;
            line.write(x);
            assert_eq!(line.read(0), x);
        }
    }

    #[test]
    fn test_read_offset_wraps() {
        let mut line = DelayLine::new();
        line.ensure_capacity(8).unwrap();
        for i in 0..20 {
            line.write(i as f32);
        }
        assert_eq!(line.read(3), 16.0);
        assert_eq!(line.read(7), 12.0);
    }

    #[test]
    fn test_resize_zero_fills_and_keeps_head() {
        let mut line = DelayLine::new();
        line.ensure_capacity(8).unwrap();
        for _ in 0..5 {
            line.write(1.0);
        }
        let head = line.head;

        // Same size: zero-filled in place.
        line.ensure_capacity(7).unwrap();
        assert!((0..8).all(|i| line.read(i) == 0.0));
        assert_eq!(line.head, head);

        // Grow then shrink: always fully zeroed.
        line.write(1.0);
        line.ensure_capacity(64).unwrap();
        assert_eq!(line.len(), 64);
        assert!((0..64).all(|i| line.read(i) == 0.0));
        line.ensure_capacity(4).unwrap();
        assert_eq!(line.len(), 4);
        assert!((0..4).all(|i| line.read(i) == 0.0));
    }

    #[test]
    fn test_add_accumulates_at_head() {
        let mut line = DelayLine::new();
        line.ensure_capacity(4).unwrap();
        line.write(0.5);
        line.add(0, 0.25);
        assert_eq!(line.read(0), 0.75);
    }

    #[test]
    fn test_cubic_hits_integer_positions() {
        let mut line = DelayLine::new();
        line.ensure_capacity(16).unwrap();
        for i in 0..10 {
            line.write(i as f32 * 0.1);
        }
        assert!((line.read_cubic(3, 0.0) - line.read(3)).abs() < 1e-6);
    }

    #[test]
    fn test_cubic_linear_ramp_is_exact() {
        let mut line = DelayLine::new();
        line.ensure_capacity(16).unwrap();
        for i in 0..10 {
            line.write(i as f32);
        }
        // read(2) = 7, read(3) = 6; halfway is 6.5.
        assert!((line.read_cubic(2, 0.5) - 6.5).abs() < 1e-5);
    }
}

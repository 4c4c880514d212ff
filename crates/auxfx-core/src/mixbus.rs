//! Block protocol shared by every effect: fixed-size buffer lines,
//! chunked processing, and click-free gain ramps into the output.
//!
//! An effect renders into a small stack buffer of at most
//! [`MAX_UPDATE_SAMPLES`] samples, then calls [`mix_samples`] to add that
//! chunk into the output accumulator. `mix_samples` ramps each channel's gain
//! from its current value toward its target; when a block is processed in
//! several chunks, passing the samples remaining in the block as `counter`
//! and the chunk start as `out_pos` makes the chunks form one continuous
//! ramp that lands exactly on the target at the end of the block.
//!
//! ```text
//!  block:  |----- chunk 0 -----|----- chunk 1 -----|-- chunk 2 --|
//!  gain:   current ....................................... target
//!          counter = N         counter = N - 64    counter = N - 128
//! ```

/// Maximum number of samples an effect is asked to process per call.
pub const BUFFER_LINE_SIZE: usize = 1024;

/// Size of the per-chunk stack buffers effects render into.
pub const MAX_UPDATE_SAMPLES: usize = 64;

/// Upper bound on output channels an effect keeps gains for.
pub const MAX_OUTPUT_CHANNELS: usize = 16;

/// Upper bound on input channels a per-channel effect keeps state for.
pub const MAX_INPUT_CHANNELS: usize = 16;

/// Gains at or below this magnitude are treated as silent and skipped.
pub const GAIN_SILENCE_THRESHOLD: f32 = 0.00001;

/// One channel of samples, as exchanged between the mixer and effects.
pub type FloatBufferLine = [f32; BUFFER_LINE_SIZE];

/// Allocates `channels` zeroed buffer lines on the heap.
pub fn buffer_lines(channels: usize) -> Vec<FloatBufferLine> {
    vec![[0.0; BUFFER_LINE_SIZE]; channels]
}

/// Adds `input` into each output channel, scaled by a per-channel gain that
/// ramps linearly from `current` toward `target`.
///
/// # Arguments
///
/// * `input` - Samples to mix
/// * `outputs` - Output accumulator, one line per channel
/// * `current` - Per-channel gains; updated in place to the gain reached
/// * `target` - Per-channel gains to ramp toward
/// * `counter` - Samples remaining until the ramp must reach `target`
/// * `out_pos` - Offset into each output line where `input[0]` lands
///
/// Channels beyond the shortest of `outputs`, `current` and `target` are left
/// untouched. `out_pos + input.len()` must not exceed [`BUFFER_LINE_SIZE`].
pub fn mix_samples(
    input: &[f32],
    outputs: &mut [FloatBufferLine],
    current: &mut [f32],
    target: &[f32],
    counter: usize,
    out_pos: usize,
) {
    let delta = if counter > 0 {
        1.0 / counter as f32
    } else {
        0.0
    };
    let min_len = counter.min(input.len());

    for ((output, gain_now), &gain_target) in outputs.iter_mut().zip(current).zip(target) {
        let dst = &mut output[out_pos..out_pos + input.len()];

        let mut gain = *gain_now;
        let diff = gain_target - gain;
        let mut pos = 0;
        if diff.abs() > f32::EPSILON {
            let step = diff * delta;
            let mut step_count = 0.0f32;
            while pos < min_len {
                dst[pos] += input[pos] * (gain + step * step_count);
                step_count += 1.0;
                pos += 1;
            }
            gain = if pos == counter {
                gain_target
            } else {
                gain + step * step_count
            };
        } else {
            gain = gain_target;
        }
        *gain_now = gain;

        if gain.abs() <= GAIN_SILENCE_THRESHOLD {
            continue;
        }
        for (out, &sample) in dst[pos..].iter_mut().zip(&input[pos..]) {
            *out += sample * gain;
        }
    }
}

/// Current and target gains for one mixed signal.
///
/// Effects keep one of these per output tap. `update` writes the target;
/// `process` ramps toward it through [`mix`](Self::mix).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputGains {
    /// Gains reached at the end of the last mix.
    pub current: [f32; MAX_OUTPUT_CHANNELS],
    /// Gains to ramp toward.
    pub target: [f32; MAX_OUTPUT_CHANNELS],
}

impl OutputGains {
    /// All gains zero.
    pub const fn new() -> Self {
        Self {
            current: [0.0; MAX_OUTPUT_CHANNELS],
            target: [0.0; MAX_OUTPUT_CHANNELS],
        }
    }

    /// Sets the gains the next blocks ramp toward.
    pub fn set_target(&mut self, target: [f32; MAX_OUTPUT_CHANNELS]) {
        self.target = target;
    }

    /// Zeroes both current and target gains, so output fades in after the
    /// next `update`.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// [`mix_samples`] with these gains.
    #[inline]
    pub fn mix(
        &mut self,
        input: &[f32],
        outputs: &mut [FloatBufferLine],
        counter: usize,
        out_pos: usize,
    ) {
        mix_samples(input, outputs, &mut self.current, &self.target, counter, out_pos);
    }
}

impl Default for OutputGains {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_gain_accumulates() {
        let mut out = buffer_lines(2);
        out[0][0] = 1.0;
        let mut current = [0.5, 0.25];
        let target = [0.5, 0.25];
        mix_samples(&[2.0; 4], &mut out, &mut current, &target, 4, 0);
        assert_eq!(out[0][0], 2.0);
        assert_eq!(out[0][3], 1.0);
        assert_eq!(out[1][2], 0.5);
        assert_eq!(out[1][4], 0.0);
    }

    #[test]
    fn test_ramp_reaches_target_exactly() {
        let mut out = buffer_lines(1);
        let mut current = [0.0];
        let target = [1.0];
        mix_samples(&[1.0; 256], &mut out, &mut current, &target, 256, 0);
        assert_eq!(current[0], 1.0);
        assert_eq!(out[0][0], 0.0);
        assert!((out[0][128] - 0.5).abs() < 1e-6);
        assert!((out[0][255] - 255.0 / 256.0).abs() < 1e-6);
    }

    #[test]
    fn test_chunked_ramp_matches_single_call() {
        let input: Vec<f32> = (0..200).map(|i| (i as f32 * 0.1).sin()).collect();

        let mut whole = buffer_lines(1);
        let mut current = [0.2];
        mix_samples(&input, &mut whole, &mut current, &[0.9], 200, 0);
        assert_eq!(current[0], 0.9);

        let mut chunked = buffer_lines(1);
        let mut current = [0.2];
        let mut base = 0;
        while base < input.len() {
            let todo = MAX_UPDATE_SAMPLES.min(input.len() - base);
            mix_samples(
                &input[base..base + todo],
                &mut chunked,
                &mut current,
                &[0.9],
                input.len() - base,
                base,
            );
            base += todo;
        }
        assert_eq!(current[0], 0.9);
        for i in 0..200 {
            assert!((whole[0][i] - chunked[0][i]).abs() < 1e-5, "sample {i}");
        }
    }

    #[test]
    fn test_short_input_continues_ramp() {
        // Counter longer than the input: the ramp is left part-way.
        let mut out = buffer_lines(1);
        let mut current = [0.0];
        mix_samples(&[1.0; 10], &mut out, &mut current, &[1.0], 20, 0);
        assert!((current[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_silent_channel_is_skipped() {
        let mut out = buffer_lines(1);
        let mut current = [0.0];
        mix_samples(&[1.0; 8], &mut out, &mut current, &[0.0], 8, 0);
        assert!(out[0].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_out_pos_offsets_destination() {
        let mut out = buffer_lines(1);
        let mut current = [1.0];
        mix_samples(&[1.0; 4], &mut out, &mut current, &[1.0], 4, 10);
        assert_eq!(out[0][9], 0.0);
        assert_eq!(out[0][10], 1.0);
        assert_eq!(out[0][13], 1.0);
        assert_eq!(out[0][14], 0.0);
    }

    #[test]
    fn test_output_gains_fade_in_after_reset() {
        let mut gains = OutputGains::new();
        gains.set_target([0.5; MAX_OUTPUT_CHANNELS]);
        let mut out = buffer_lines(2);
        gains.mix(&[1.0; 8], &mut out, 8, 0);
        assert_eq!(out[0][0], 0.0);
        assert_eq!(gains.current[0], 0.5);
        assert_eq!(gains.current[2], 0.0, "channels past the output stay put");

        gains.reset();
        assert_eq!(gains, OutputGains::default());
    }
}

//! Interleaved buffer accessors.

use xover_core::AudioContext;

/// One interleaved input/output buffer pair, as delivered by cpal.
///
/// Frame `n`, channel `c` lives at `n * channels + c`. The frame count is
/// the smaller of the two buffers' frame counts.
///
/// - Reading a channel the input does not have returns channel 0 of that
///   frame (or silence if the input has no channels at all).
/// - Writing a channel the output does not have is ignored.
/// - The output is silenced on construction, so channels the crossover never
///   writes stay at zero.
pub struct InterleavedContext<'a> {
    input: &'a [f32],
    input_channels: usize,
    output: &'a mut [f32],
    output_channels: usize,
    frames: usize,
}

impl<'a> InterleavedContext<'a> {
    /// Wraps an input and output buffer. Zeroes `output`.
    pub fn new(
        input: &'a [f32],
        input_channels: usize,
        output: &'a mut [f32],
        output_channels: usize,
    ) -> Self {
        output.fill(0.0);

        let input_frames = input.len().checked_div(input_channels).unwrap_or(0);
        let output_frames = output.len().checked_div(output_channels).unwrap_or(0);

        Self {
            input,
            input_channels,
            output,
            output_channels,
            frames: input_frames.min(output_frames),
        }
    }

    /// The output buffer.
    pub fn output(&self) -> &[f32] {
        self.output
    }
}

impl AudioContext for InterleavedContext<'_> {
    fn frame_count(&self) -> usize {
        self.frames
    }

    fn input_channels(&self) -> usize {
        self.input_channels
    }

    fn output_channels(&self) -> usize {
        self.output_channels
    }

    #[inline]
    fn read_sample(&self, frame: usize, channel: usize) -> f32 {
        if self.input_channels == 0 {
            return 0.0;
        }
        let channel = if channel < self.input_channels { channel } else { 0 };
        self.input[frame * self.input_channels + channel]
    }

    #[inline]
    fn write_sample(&mut self, frame: usize, channel: usize, value: f32) {
        if channel < self.output_channels {
            self.output[frame * self.output_channels + channel] = value;
        }
    }
}

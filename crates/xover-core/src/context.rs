//! The seam between the crossover and whatever is driving audio.
//!
//! An audio platform hands the engine one [`AudioContext`] per buffer. The
//! engine only ever asks for the frame count and reads/writes individual
//! samples; buffer layout (interleaved, planar, DMA ring) is the platform's
//! business.

/// Output channel that receives the low band.
pub const LOW_BAND_CHANNEL: usize = 0;

/// Output channel that receives the high band.
pub const HIGH_BAND_CHANNEL: usize = 1;

/// One audio buffer as seen by the crossover.
///
/// Implementations must be cheap: every method is called per sample on the
/// audio thread and must not allocate, block, or make system calls.
pub trait AudioContext {
    /// Number of frames in this buffer.
    fn frame_count(&self) -> usize;

    /// Number of input channels per frame.
    fn input_channels(&self) -> usize;

    /// Number of output channels per frame.
    fn output_channels(&self) -> usize;

    /// Reads the input sample at `frame` on `channel`.
    fn read_sample(&self, frame: usize, channel: usize) -> f32;

    /// Writes the output sample at `frame` on `channel`.
    fn write_sample(&mut self, frame: usize, channel: usize, value: f32);
}

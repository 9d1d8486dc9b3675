//! Stereo to mono mixdown.

/// Averages a left/right pair into one mono sample.
#[inline]
pub fn mix(left: f32, right: f32) -> f32 {
    (left + right) / 2.0
}

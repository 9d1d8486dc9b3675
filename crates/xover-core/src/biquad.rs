//! Biquad (bi-quadratic) filter structure.
//!
//! A second-order IIR section in Direct Form I, with separate delay lines for
//! input and output history. Coefficients come from
//! [`FilterCoefficients`](crate::FilterCoefficients).

use crate::FilterCoefficients;

/// Delay-line contents of one biquad.
///
/// Read-only from outside the filter: the only code that changes it is
/// [`Biquad::process`] and [`Biquad::reset`], so the update order cannot be
/// bypassed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterState {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl FilterState {
    /// Most recent input, `x[n-1]`.
    pub fn x1(&self) -> f32 {
        self.x1
    }

    /// Second most recent input, `x[n-2]`.
    pub fn x2(&self) -> f32 {
        self.x2
    }

    /// Most recent output, `y[n-1]`.
    pub fn y1(&self) -> f32 {
        self.y1
    }

    /// Second most recent output, `y[n-2]`.
    pub fn y2(&self) -> f32 {
        self.y2
    }

    /// True when every delay element is zero.
    pub fn is_zero(&self) -> bool {
        self.x1 == 0.0 && self.x2 == 0.0 && self.y1 == 0.0 && self.y2 == 0.0
    }
}

/// Second-order IIR filter: one coefficient set plus its delay lines.
///
/// Implements the Direct Form I structure:
/// ```text
/// y[n] = a0*x[n] + a1*x[n-1] + a2*x[n-2]
///                - b1*y[n-1] - b2*y[n-2]
/// ```
///
/// No internal clamping or NaN guarding: non-finite coefficients or input
/// propagate to the output.
#[derive(Debug, Clone)]
pub struct Biquad {
    coefficients: FilterCoefficients,
    state: FilterState,
}

impl Biquad {
    /// Creates a biquad with the given coefficients and zeroed state.
    pub fn new(coefficients: FilterCoefficients) -> Self {
        Self {
            coefficients,
            state: FilterState::default(),
        }
    }

    /// Replaces the coefficients. Delay lines are left untouched.
    pub fn set_coefficients(&mut self, coefficients: FilterCoefficients) {
        self.coefficients = coefficients;
    }

    /// Current coefficients.
    pub fn coefficients(&self) -> &FilterCoefficients {
        &self.coefficients
    }

    /// Snapshot of the delay lines.
    pub fn state(&self) -> FilterState {
        self.state
    }

    /// Processes a single sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let FilterCoefficients { a0, a1, a2, b1, b2 } = self.coefficients;
        let s = &mut self.state;

        let output = a0 * input + a1 * s.x1 + a2 * s.x2 - b1 * s.y1 - b2 * s.y2;

        // x2 before x1, y2 before y1
        s.x2 = s.x1;
        s.x1 = input;
        s.y2 = s.y1;
        s.y1 = output;

        output
    }

    /// Filters `buffer` in place, sample by sample.
    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Clears the delay lines, keeping the coefficients.
    pub fn reset(&mut self) {
        self.state = FilterState::default();
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new(FilterCoefficients::identity())
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use alloc::vec::Vec;

    use super::*;

    fn lowpass() -> FilterCoefficients {
        FilterCoefficients::lowpass(1000.0, 44100.0).unwrap()
    }

    #[test]
    fn test_biquad_passthrough() {
        let mut biquad = Biquad::default();

        for i in 0..10 {
            let input = i as f32 * 0.1;
            let output = biquad.process(input);
            assert!((output - input).abs() < 0.0001);
        }
    }

    #[test]
    fn test_biquad_reset() {
        let mut biquad = Biquad::new(lowpass());

        for _ in 0..10 {
            biquad.process(1.0);
        }
        assert!(!biquad.state().is_zero());

        biquad.reset();

        assert!(biquad.state().is_zero());
        assert_eq!(*biquad.coefficients(), lowpass());
    }

    #[test]
    fn test_state_shifts_in_order() {
        let mut biquad = Biquad::new(lowpass());

        let y0 = biquad.process(0.5);
        let y1 = biquad.process(-0.25);

        let state = biquad.state();
        assert_eq!(state.x1(), -0.25);
        assert_eq!(state.x2(), 0.5);
        assert_eq!(state.y1(), y1);
        assert_eq!(state.y2(), y0);
    }

    #[test]
    fn test_output_uses_pre_update_state() {
        let c = FilterCoefficients {
            a0: 0.5,
            a1: 0.25,
            a2: 0.125,
            b1: -0.3,
            b2: 0.1,
        };
        let mut biquad = Biquad::new(c);
        biquad.process(1.0);
        biquad.process(2.0);

        let before = biquad.state();
        let x = 3.0;
        let expected = c.a0 * x + c.a1 * before.x1() + c.a2 * before.x2()
            - c.b1 * before.y1()
            - c.b2 * before.y2();
        assert_eq!(biquad.process(x), expected);
    }

    #[test]
    fn test_silence_in_silence_out() {
        let mut low = Biquad::new(lowpass());
        let mut high = Biquad::new(FilterCoefficients::highpass(1000.0, 44100.0).unwrap());
        for _ in 0..256 {
            assert_eq!(low.process(0.0), 0.0);
            assert_eq!(high.process(0.0), 0.0);
        }
    }

    #[test]
    fn test_set_coefficients_keeps_state() {
        let mut biquad = Biquad::new(lowpass());
        biquad.process(1.0);
        let state = biquad.state();

        biquad.set_coefficients(FilterCoefficients::identity());
        assert_eq!(biquad.state(), state);
    }

    #[test]
    fn test_nan_input_propagates() {
        let mut biquad = Biquad::new(lowpass());
        assert!(biquad.process(f32::NAN).is_nan());
        // Poisoned history keeps producing NaN until reset
        assert!(biquad.process(0.0).is_nan());
        biquad.reset();
        assert_eq!(biquad.process(0.0), 0.0);
    }

    #[test]
    fn test_process_block_matches_per_sample() {
        let input: Vec<f32> = (0..64).map(|i| ((i * 7) % 11) as f32 / 11.0 - 0.5).collect();

        let mut a = Biquad::new(lowpass());
        let expected: Vec<f32> = input.iter().map(|&x| a.process(x)).collect();

        let mut b = Biquad::new(lowpass());
        let mut buffer = input.clone();
        b.process_block(&mut buffer);

        assert_eq!(buffer, expected);
    }
}

//! Crossover filter coefficient derivation.
//!
//! Both bands use a second-order Butterworth prototype mapped to the digital
//! domain with the bilinear transform. The cutoff is prewarped through
//! `tan(pi * fc / fs)` so the -3 dB point lands exactly on the crossover
//! frequency.
//!
//! ```text
//! Lowpass:  c = 1 / tan(pi*fc/fs)        Highpass: c = tan(pi*fc/fs)
//!           a0 = 1 / (1 + sqrt2*c + c^2)           a0 = 1 / (1 + sqrt2*c + c^2)
//!           a1 = 2*a0                              a1 = -2*a0
//!           a2 = a0                                a2 = a0
//!           b1 = 2*a0*(1 - c^2)                    b1 = 2*a0*(c^2 - 1)
//!           b2 = a0*(1 - sqrt2*c + c^2)            b2 = a0*(1 - sqrt2*c + c^2)
//! ```
//!
//! The prewarp and the coefficient arithmetic run in `f64`; results are stored
//! as `f32`. At a 20 Hz crossover `c^2` is in the hundreds of thousands, and
//! single precision loses most of `b1` to cancellation.

use crate::CrossoverError;
use core::f64::consts::{PI, SQRT_2};

/// Which band a coefficient set filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Passes content below the crossover frequency.
    Lowpass,
    /// Passes content above the crossover frequency.
    Highpass,
}

impl FilterKind {
    /// Short lowercase label, used for log fields and CLI output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Lowpass => "low",
            Self::Highpass => "high",
        }
    }
}

/// Coefficients for one Direct Form I biquad.
///
/// `a*` are feedforward taps, `b*` are feedback taps (subtracted):
///
/// ```text
/// y[n] = a0*x[n] + a1*x[n-1] + a2*x[n-2] - b1*y[n-1] - b2*y[n-2]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCoefficients {
    /// Gain applied to the current input.
    pub a0: f32,
    /// Gain applied to the previous input.
    pub a1: f32,
    /// Gain applied to the input two samples back.
    pub a2: f32,
    /// Gain applied to the previous output.
    pub b1: f32,
    /// Gain applied to the output two samples back.
    pub b2: f32,
}

impl FilterCoefficients {
    /// Passthrough: `y[n] = x[n]`.
    pub const fn identity() -> Self {
        Self {
            a0: 1.0,
            a1: 0.0,
            a2: 0.0,
            b1: 0.0,
            b2: 0.0,
        }
    }

    /// Derives coefficients for `kind` at crossover `frequency` and `sample_rate`.
    pub fn compute(
        kind: FilterKind,
        frequency: f32,
        sample_rate: f32,
    ) -> Result<Self, CrossoverError> {
        match kind {
            FilterKind::Lowpass => Self::lowpass(frequency, sample_rate),
            FilterKind::Highpass => Self::highpass(frequency, sample_rate),
        }
    }

    /// Butterworth lowpass at `frequency` Hz.
    ///
    /// # Errors
    ///
    /// [`CrossoverError::InvalidSampleRate`] if `sample_rate` is not finite and
    /// positive, [`CrossoverError::InvalidFrequency`] if `frequency` is not
    /// strictly inside `(0, sample_rate / 2)`.
    pub fn lowpass(frequency: f32, sample_rate: f32) -> Result<Self, CrossoverError> {
        let t = prewarp(frequency, sample_rate)?;
        let c = 1.0 / t;
        let c2 = c * c;
        let a0 = 1.0 / (1.0 + SQRT_2 * c + c2);

        finish(
            [
                a0,
                2.0 * a0,
                a0,
                2.0 * a0 * (1.0 - c2),
                a0 * (1.0 - SQRT_2 * c + c2),
            ],
            frequency,
            sample_rate,
        )
    }

    /// Butterworth highpass at `frequency` Hz.
    ///
    /// `b1` is `2*a0*(c^2 - 1)`, the sign mirror of the lowpass term because
    /// `c` here is `tan` rather than `cot`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`FilterCoefficients::lowpass`].
    pub fn highpass(frequency: f32, sample_rate: f32) -> Result<Self, CrossoverError> {
        let c = prewarp(frequency, sample_rate)?;
        let c2 = c * c;
        let a0 = 1.0 / (1.0 + SQRT_2 * c + c2);

        finish(
            [
                a0,
                -2.0 * a0,
                a0,
                2.0 * a0 * (c2 - 1.0),
                a0 * (1.0 - SQRT_2 * c + c2),
            ],
            frequency,
            sample_rate,
        )
    }

    /// Returns true if all five coefficients are finite.
    pub fn is_finite(&self) -> bool {
        self.a0.is_finite()
            && self.a1.is_finite()
            && self.a2.is_finite()
            && self.b1.is_finite()
            && self.b2.is_finite()
    }

    /// Magnitude response at `frequency` Hz, evaluated on the unit circle.
    ///
    /// Used to check crossover behaviour without running a signal through.
    pub fn magnitude_at(&self, frequency: f32, sample_rate: f32) -> f32 {
        let w = 2.0 * PI * f64::from(frequency) / f64::from(sample_rate);
        let (cos1, sin1) = (libm::cos(w), libm::sin(w));
        let (cos2, sin2) = (libm::cos(2.0 * w), libm::sin(2.0 * w));

        let (a0, a1, a2) = (
            f64::from(self.a0),
            f64::from(self.a1),
            f64::from(self.a2),
        );
        let (b1, b2) = (f64::from(self.b1), f64::from(self.b2));

        // H(z) with z^-1 = e^{-jw}
        let num_re = a0 + a1 * cos1 + a2 * cos2;
        let num_im = -(a1 * sin1 + a2 * sin2);
        let den_re = 1.0 + b1 * cos1 + b2 * cos2;
        let den_im = -(b1 * sin1 + b2 * sin2);

        let num = libm::sqrt(num_re * num_re + num_im * num_im);
        let den = libm::sqrt(den_re * den_re + den_im * den_im);
        (num / den) as f32
    }
}

impl Default for FilterCoefficients {
    fn default() -> Self {
        Self::identity()
    }
}

/// Validates inputs and returns `tan(pi * fc / fs)`.
fn prewarp(frequency: f32, sample_rate: f32) -> Result<f64, CrossoverError> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(CrossoverError::InvalidSampleRate(sample_rate));
    }
    let invalid = CrossoverError::InvalidFrequency {
        frequency,
        sample_rate,
    };
    if !frequency.is_finite() || frequency <= 0.0 || frequency >= sample_rate / 2.0 {
        return Err(invalid);
    }

    let t = libm::tan(PI * f64::from(frequency) / f64::from(sample_rate));
    if !t.is_finite() || t <= 0.0 {
        return Err(invalid);
    }
    Ok(t)
}

fn finish(
    [a0, a1, a2, b1, b2]: [f64; 5],
    frequency: f32,
    sample_rate: f32,
) -> Result<FilterCoefficients, CrossoverError> {
    let coefficients = FilterCoefficients {
        a0: a0 as f32,
        a1: a1 as f32,
        a2: a2 as f32,
        b1: b1 as f32,
        b2: b2 as f32,
    };
    if coefficients.is_finite() {
        Ok(coefficients)
    } else {
        Err(CrossoverError::InvalidFrequency {
            frequency,
            sample_rate,
        })
    }
}

//! Setup-time errors for the crossover core.
//!
//! Errors are only produced while deriving coefficients or constructing an
//! engine. The per-sample and per-buffer paths have no failure modes.

/// Errors that can occur while configuring a crossover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrossoverError {
    /// The crossover frequency is not strictly within `(0, sample_rate / 2)`,
    /// or it produced non-finite coefficients.
    InvalidFrequency {
        /// Requested crossover frequency in Hz.
        frequency: f32,
        /// Sample rate in Hz the frequency was checked against.
        sample_rate: f32,
    },
    /// The sample rate is not a finite, positive number.
    InvalidSampleRate(f32),
}

impl core::fmt::Display for CrossoverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidFrequency {
                frequency,
                sample_rate,
            } => write!(
                f,
                "crossover frequency {frequency} Hz must lie strictly between 0 and {} Hz (Nyquist at {sample_rate} Hz)",
                sample_rate / 2.0
            ),
            Self::InvalidSampleRate(rate) => {
                write!(f, "sample rate must be finite and positive, got {rate}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CrossoverError {}

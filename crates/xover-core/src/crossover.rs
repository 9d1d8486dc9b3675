//! Two-band crossover engine.
//!
//! Mixes a stereo input to mono and splits it with a matched lowpass/highpass
//! pair derived from one crossover frequency. The low band goes to output
//! channel 0 and the high band to output channel 1.
//!
//! # Lifecycle
//!
//! ```text
//! new(config) ──► Ready ──process──► Running ──stop──► Stopped
//!                   ▲                   │                 │
//!                   └──────── reset(config) ◄─────────────┘
//! ```
//!
//! There is no uninitialized state: [`CrossoverEngine::new`] either returns a
//! ready engine or a [`CrossoverError`]. Filter state persists across buffer
//! calls and is only cleared by [`CrossoverEngine::reset`].
//!
//! # Real-time safety
//!
//! All state is sized at construction. The frame and buffer paths do
//! arithmetic and accessor calls only.

use crate::context::{AudioContext, HIGH_BAND_CHANNEL, LOW_BAND_CHANNEL};
use crate::{Biquad, CrossoverError, FilterCoefficients, FilterKind, mixdown};

/// Lowest crossover frequency accepted from an operator, in Hz.
pub const MIN_CROSSOVER_HZ: f32 = 20.0;

/// Highest crossover frequency accepted from an operator, in Hz.
pub const MAX_CROSSOVER_HZ: f32 = 5000.0;

/// Crossover frequency used when none is given, in Hz.
pub const DEFAULT_CROSSOVER_HZ: f32 = 1000.0;

/// Crossover frequency and the sample rate it applies to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossoverConfig {
    /// Split point between the bands, in Hz.
    pub crossover_hz: f32,
    /// Stream sample rate, in Hz.
    pub sample_rate: f32,
}

impl CrossoverConfig {
    /// Creates a config, checking that `crossover_hz` is below Nyquist.
    ///
    /// Operator input should go through [`CrossoverConfig::clamp_frequency`]
    /// first; this only rejects values that cannot produce finite filters.
    pub fn new(crossover_hz: f32, sample_rate: f32) -> Result<Self, CrossoverError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(CrossoverError::InvalidSampleRate(sample_rate));
        }
        if !crossover_hz.is_finite() || crossover_hz <= 0.0 || crossover_hz >= sample_rate / 2.0 {
            return Err(CrossoverError::InvalidFrequency {
                frequency: crossover_hz,
                sample_rate,
            });
        }
        Ok(Self {
            crossover_hz,
            sample_rate,
        })
    }

    /// Clamps a requested frequency to
    /// [`MIN_CROSSOVER_HZ`]..=[`MAX_CROSSOVER_HZ`].
    ///
    /// NaN maps to the lower bound, the same result an unparseable number
    /// reading as zero would give.
    pub fn clamp_frequency(requested: f32) -> f32 {
        if requested.is_nan() {
            return MIN_CROSSOVER_HZ;
        }
        requested.clamp(MIN_CROSSOVER_HZ, MAX_CROSSOVER_HZ)
    }

    /// Nyquist frequency for this sample rate.
    pub fn nyquist(&self) -> f32 {
        self.sample_rate / 2.0
    }
}

/// Where an engine is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Coefficients computed, no audio processed yet.
    Ready,
    /// At least one frame has been processed.
    Running,
    /// Stopped; state is kept but processing calls do nothing.
    Stopped,
}

/// Stereo-in, two-band-out crossover.
///
/// Owns one [`Biquad`] per band. Frames must be fed in arrival order;
/// reordering corrupts the recursive state with no way to detect it.
///
/// # Example
///
/// ```rust
/// use xover_core::{CrossoverConfig, CrossoverEngine};
///
/// let config = CrossoverConfig::new(1000.0, 44100.0).unwrap();
/// let mut engine = CrossoverEngine::new(config).unwrap();
///
/// let (low, high) = engine.process_frame(1.0, 1.0);
/// assert!(low > 0.0 && high > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct CrossoverEngine {
    config: CrossoverConfig,
    low: Biquad,
    high: Biquad,
    state: EngineState,
}

impl CrossoverEngine {
    /// Computes both coefficient sets and returns a [`EngineState::Ready`] engine.
    pub fn new(config: CrossoverConfig) -> Result<Self, CrossoverError> {
        let (low, high) = derive_pair(config)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            crossover_hz = config.crossover_hz,
            sample_rate = config.sample_rate,
            low_a0 = low.a0,
            high_a0 = high.a0,
            "crossover engine ready"
        );

        Ok(Self {
            config,
            low: Biquad::new(low),
            high: Biquad::new(high),
            state: EngineState::Ready,
        })
    }

    /// Processes one stereo frame, returning `(low, high)`.
    ///
    /// Advances both filters by exactly one sample. A stopped engine returns
    /// silence and leaves its state unchanged.
    #[inline]
    pub fn process_frame(&mut self, left: f32, right: f32) -> (f32, f32) {
        match self.state {
            EngineState::Stopped => return (0.0, 0.0),
            EngineState::Ready => self.state = EngineState::Running,
            EngineState::Running => {}
        }

        let mono = mixdown::mix(left, right);
        let low = self.low.process(mono);
        let high = self.high.process(mono);
        (low, high)
    }

    /// Processes frames `0..frame_count` through caller-supplied accessors.
    ///
    /// `read(frame, channel)` is called for channels 0 and 1 of each frame;
    /// `write(frame, channel, value)` receives the low band on channel 0 and
    /// the high band on channel 1. Returns the number of frames processed,
    /// which is 0 once the engine is stopped.
    pub fn process_buffer<R, W>(&mut self, frame_count: usize, mut read: R, mut write: W) -> usize
    where
        R: FnMut(usize, usize) -> f32,
        W: FnMut(usize, usize, f32),
    {
        if self.state == EngineState::Stopped {
            return 0;
        }

        for frame in 0..frame_count {
            let left = read(frame, 0);
            let right = read(frame, 1);
            let (low, high) = self.process_frame(left, right);
            write(frame, LOW_BAND_CHANNEL, low);
            write(frame, HIGH_BAND_CHANNEL, high);
        }
        frame_count
    }

    /// Processes one platform buffer.
    ///
    /// Mono input feeds channel 0 to both sides of the mix; an input with no
    /// channels is treated as silence. Band channels are only written when
    /// the output has them.
    pub fn process_context<C: AudioContext + ?Sized>(&mut self, context: &mut C) -> usize {
        if self.state == EngineState::Stopped {
            return 0;
        }

        let frames = context.frame_count();
        let inputs = context.input_channels();
        let outputs = context.output_channels();

        for frame in 0..frames {
            let (left, right) = match inputs {
                0 => (0.0, 0.0),
                1 => {
                    let s = context.read_sample(frame, 0);
                    (s, s)
                }
                _ => (context.read_sample(frame, 0), context.read_sample(frame, 1)),
            };

            let (low, high) = self.process_frame(left, right);

            if outputs > LOW_BAND_CHANNEL {
                context.write_sample(frame, LOW_BAND_CHANNEL, low);
            }
            if outputs > HIGH_BAND_CHANNEL {
                context.write_sample(frame, HIGH_BAND_CHANNEL, high);
            }
        }
        frames
    }

    /// Moves to [`EngineState::Stopped`]. Filter state is retained.
    pub fn stop(&mut self) {
        self.state = EngineState::Stopped;
    }

    /// Recomputes coefficients for `config`, zeroes both filters and returns
    /// to [`EngineState::Ready`].
    ///
    /// On error the engine is left exactly as it was.
    pub fn reset(&mut self, config: CrossoverConfig) -> Result<(), CrossoverError> {
        let (low, high) = derive_pair(config)?;

        self.low.set_coefficients(low);
        self.low.reset();
        self.high.set_coefficients(high);
        self.high.reset();
        self.config = config;
        self.state = EngineState::Ready;

        #[cfg(feature = "tracing")]
        tracing::debug!(crossover_hz = config.crossover_hz, "crossover engine reset");

        Ok(())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Configuration the coefficients were derived from.
    pub fn config(&self) -> CrossoverConfig {
        self.config
    }

    /// The low band filter.
    pub fn low(&self) -> &Biquad {
        &self.low
    }

    /// The high band filter.
    pub fn high(&self) -> &Biquad {
        &self.high
    }

    /// The filter for `kind`.
    pub fn band(&self, kind: FilterKind) -> &Biquad {
        match kind {
            FilterKind::Lowpass => &self.low,
            FilterKind::Highpass => &self.high,
        }
    }
}

fn derive_pair(
    config: CrossoverConfig,
) -> Result<(FilterCoefficients, FilterCoefficients), CrossoverError> {
    let low = FilterCoefficients::lowpass(config.crossover_hz, config.sample_rate)?;
    let high = FilterCoefficients::highpass(config.crossover_hz, config.sample_rate)?;
    Ok((low, high))
}

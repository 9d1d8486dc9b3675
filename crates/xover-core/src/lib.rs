//! xover Core - DSP for a real-time two-band audio crossover
//!
//! Takes a stereo stream, mixes it to mono, and splits the mono signal into a
//! low band and a high band with a matched pair of second-order Butterworth
//! filters derived from one crossover frequency.
//!
//! # Building Blocks
//!
//! - [`FilterCoefficients`] - Bilinear-transform lowpass/highpass coefficient derivation
//! - [`Biquad`] / [`FilterState`] - Direct Form I second-order section
//! - [`mix`] - Stereo to mono mixdown
//! - [`CrossoverEngine`] - Mixdown, both filters, and channel routing per frame
//! - [`AudioContext`] - The per-buffer seam a platform implements
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! xover-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use xover_core::{CrossoverConfig, CrossoverEngine};
//!
//! let config = CrossoverConfig::new(1000.0, 48000.0)?;
//! let mut engine = CrossoverEngine::new(config)?;
//!
//! let left = [1.0, 0.0, 0.0, 0.0];
//! let right = [1.0, 0.0, 0.0, 0.0];
//! let mut woofer = [0.0; 4];
//! let mut tweeter = [0.0; 4];
//!
//! engine.process_buffer(
//!     4,
//!     |frame, channel| if channel == 0 { left[frame] } else { right[frame] },
//!     |frame, channel, value| match channel {
//!         0 => woofer[frame] = value,
//!         _ => tweeter[frame] = value,
//!     },
//! );
//! # Ok::<(), xover_core::CrossoverError>(())
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations, locks, or system calls in audio processing paths
//! - **Owned state**: Every filter's delay line belongs to exactly one engine instance
//! - **Setup-time errors only**: Invalid frequencies are rejected before streaming starts

#![cfg_attr(not(feature = "std"), no_std)]

pub mod biquad;
pub mod coefficients;
pub mod context;
pub mod crossover;
pub mod error;
pub mod mixdown;

// Re-export main types at crate root
pub use biquad::{Biquad, FilterState};
pub use coefficients::{FilterCoefficients, FilterKind};
pub use context::{AudioContext, HIGH_BAND_CHANNEL, LOW_BAND_CHANNEL};
pub use crossover::{
    CrossoverConfig, CrossoverEngine, DEFAULT_CROSSOVER_HZ, EngineState, MAX_CROSSOVER_HZ,
    MIN_CROSSOVER_HZ,
};
pub use error::CrossoverError;
pub use mixdown::mix;

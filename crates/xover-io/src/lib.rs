//! Audio I/O layer for the xover crossover.
//!
//! This crate is the platform half of the crossover. It provides:
//!
//! - **Device discovery**: [`list_devices`], [`default_device`], and [`find_device`], which
//!   resolves an index or name the same way [`AudioStream`] does
//! - **Duplex streaming**: [`AudioStream`] opens capture and playback, negotiates the
//!   sample rate before streaming starts, and drives a callback once per buffer
//! - **Sample accessors**: [`InterleavedContext`] exposes interleaved cpal buffers
//!   through [`xover_core::AudioContext`]
//! - **Crossover binding**: [`CrossoverProcessor`] runs a
//!   [`CrossoverEngine`](xover_core::CrossoverEngine) on those buffers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xover_core::{CrossoverConfig, CrossoverEngine};
//! use xover_io::{AudioStream, CrossoverProcessor, StreamConfig};
//!
//! let mut stream = AudioStream::new(StreamConfig::default())?;
//!
//! let config = CrossoverConfig::new(1000.0, stream.sample_rate() as f32)?;
//! let mut processor = CrossoverProcessor::new(CrossoverEngine::new(config)?);
//!
//! // Blocks until the stop handle is triggered.
//! stream.run(move |ctx| {
//!     processor.process(ctx);
//! })?;
//! # Ok::<(), xover_io::Error>(())
//! ```

mod context;
mod processor;
mod stream;

pub use context::InterleavedContext;
pub use processor::CrossoverProcessor;
pub use stream::{
    AudioDevice, AudioStream, DeviceList, StopHandle, StreamConfig, StreamStats, default_device,
    find_device, list_devices,
};

use xover_core::CrossoverError;

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// The crossover could not be configured for the negotiated stream.
    #[error("Crossover setup error: {0}")]
    Crossover(#[from] CrossoverError),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

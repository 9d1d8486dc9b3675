//! Settings file for the `run` command.
//!
//! Settings are stored as TOML. Every key is optional:
//!
//! ```toml
//! frequency = 800.0
//! sample_rate = 48000
//! buffer_size = 256
//! input_device = "USB"
//! output_device = "0"
//! ```
//!
//! Command-line flags override file values, file values override defaults.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use xover_core::{CrossoverConfig, DEFAULT_CROSSOVER_HZ};
use xover_io::StreamConfig;

/// Partial settings from one source (file or command line).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Requested crossover frequency in Hz.
    pub frequency: Option<f32>,
    /// Requested sample rate in Hz.
    pub sample_rate: Option<u32>,
    /// Requested buffer size in frames.
    pub buffer_size: Option<u32>,
    /// Input device name or index.
    pub input_device: Option<String>,
    /// Output device name or index.
    pub output_device: Option<String>,
}

impl Settings {
    /// Reads a settings file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?settings, "loaded config file");
        Ok(settings)
    }

    /// Layers `overrides` on top of `self`; set fields in `overrides` win.
    pub fn merge(self, overrides: Settings) -> Settings {
        Settings {
            frequency: overrides.frequency.or(self.frequency),
            sample_rate: overrides.sample_rate.or(self.sample_rate),
            buffer_size: overrides.buffer_size.or(self.buffer_size),
            input_device: overrides.input_device.or(self.input_device),
            output_device: overrides.output_device.or(self.output_device),
        }
    }

    /// Crossover frequency to use, clamped to the supported range.
    ///
    /// An out-of-range request is not an error: it is clamped and logged.
    pub fn crossover_frequency(&self) -> f32 {
        let requested = self.frequency.unwrap_or(DEFAULT_CROSSOVER_HZ);
        let accepted = CrossoverConfig::clamp_frequency(requested);
        if accepted != requested {
            tracing::warn!(requested, accepted, "crossover frequency out of range, clamped");
        }
        accepted
    }

    /// Stream settings; unset fields fall back to device defaults.
    pub fn stream_config(&self) -> StreamConfig {
        StreamConfig {
            sample_rate: self.sample_rate,
            buffer_size: self.buffer_size,
            input_device: self.input_device.clone(),
            output_device: self.output_device.clone(),
        }
    }
}

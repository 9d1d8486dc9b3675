//! Real-time crossover command.

use crate::config::Settings;
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use xover_core::{CrossoverConfig, CrossoverEngine};
use xover_io::{AudioStream, CrossoverProcessor};

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Crossover frequency in Hz (clamped to 20-5000)
    #[arg(short, long)]
    frequency: Option<f32>,

    /// Input device name or index
    #[arg(long)]
    input_device: Option<String>,

    /// Output device name or index
    #[arg(long)]
    output_device: Option<String>,

    /// Sample rate (defaults to the output device's rate)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Buffer size in frames
    #[arg(long)]
    buffer_size: Option<u32>,

    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RunArgs {
    /// Resolves file and command-line settings.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let file = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let cli = Settings {
            frequency: self.frequency,
            sample_rate: self.sample_rate,
            buffer_size: self.buffer_size,
            input_device: self.input_device.clone(),
            output_device: self.output_device.clone(),
        };
        Ok(file.merge(cli))
    }
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let settings = args.settings()?;
    let frequency = settings.crossover_frequency();

    let mut stream =
        AudioStream::new(settings.stream_config()).context("failed to open audio devices")?;
    let sample_rate = stream.sample_rate();

    let config = CrossoverConfig::new(frequency, sample_rate as f32)
        .with_context(|| format!("cannot run a {frequency} Hz crossover at {sample_rate} Hz"))?;
    let mut processor = CrossoverProcessor::new(CrossoverEngine::new(config)?);

    println!("Two-way crossover at {frequency} Hz");
    println!(
        "  Input:  {} ({} ch)",
        stream.input_device_name(),
        stream.input_channels()
    );
    println!(
        "  Output: {} ({} ch, low -> 1, high -> 2)",
        stream.output_device_name(),
        stream.output_channels()
    );
    println!("  Sample rate: {sample_rate} Hz");
    if let Some(buffer_size) = settings.buffer_size {
        println!("  Buffer size: {buffer_size} frames");
    }
    if stream.output_channels() < 2 {
        tracing::warn!(
            channels = stream.output_channels(),
            "output has fewer than 2 channels, high band will not be heard"
        );
    }
    println!("\nPress Ctrl+C to stop...\n");

    let stop = stream.stop_handle();
    ctrlc::set_handler(move || {
        println!("\nStopping...");
        stop.stop();
    })?;

    stream.run(move |ctx| {
        processor.process(ctx);
    })?;

    println!("Done!");
    Ok(())
}

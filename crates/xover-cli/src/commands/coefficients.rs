//! Coefficient inspection command.

use clap::Args;
use xover_core::{CrossoverConfig, FilterCoefficients, FilterKind};

#[derive(Args, Debug)]
pub struct CoefficientsArgs {
    /// Crossover frequency in Hz (clamped to 20-5000)
    #[arg(short, long, default_value = "1000")]
    frequency: f32,

    /// Sample rate in Hz
    #[arg(short, long, default_value = "44100")]
    sample_rate: f32,
}

pub fn run(args: CoefficientsArgs) -> anyhow::Result<()> {
    let frequency = CrossoverConfig::clamp_frequency(args.frequency);
    if frequency != args.frequency {
        tracing::warn!(
            requested = args.frequency,
            accepted = frequency,
            "crossover frequency out of range, clamped"
        );
    }

    print!("{}", render(frequency, args.sample_rate)?);
    Ok(())
}

/// Formats both coefficient sets as a table.
fn render(frequency: f32, sample_rate: f32) -> anyhow::Result<String> {
    let config = CrossoverConfig::new(frequency, sample_rate)?;

    let mut out = format!(
        "Crossover {} Hz @ {} Hz\n\n{:<6} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
        config.crossover_hz, config.sample_rate, "band", "a0", "a1", "a2", "b1", "b2"
    );
    for kind in [FilterKind::Lowpass, FilterKind::Highpass] {
        let c = FilterCoefficients::compute(kind, config.crossover_hz, config.sample_rate)?;
        out.push_str(&format!(
            "{:<6} {:>12.8} {:>12.8} {:>12.8} {:>12.8} {:>12.8}\n",
            kind.label(),
            c.a0,
            c.a1,
            c.a2,
            c.b1,
            c.b2
        ));
    }
    Ok(out)
}

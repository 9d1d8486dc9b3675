//! Property-based tests for xover-core.
//!
//! Determinism, silence, continuity across buffer boundaries, and stability
//! over the whole operator range, using proptest for randomized input.

use proptest::prelude::*;
use xover_core::{
    Biquad, CrossoverConfig, CrossoverEngine, FilterCoefficients, FilterKind, MAX_CROSSOVER_HZ,
    MIN_CROSSOVER_HZ,
};

const SAMPLE_RATES: [f32; 4] = [22050.0, 44100.0, 48000.0, 96000.0];

fn engine(fc: f32, fs: f32) -> CrossoverEngine {
    CrossoverEngine::new(CrossoverConfig::new(fc, fs).unwrap()).unwrap()
}

/// Runs `frames` through `engine` in one buffer call, returning `(low, high)` per frame.
fn run(engine: &mut CrossoverEngine, frames: &[(f32, f32)]) -> Vec<(f32, f32)> {
    let mut out = vec![(0.0, 0.0); frames.len()];
    engine.process_buffer(
        frames.len(),
        |frame, channel| {
            if channel == 0 {
                frames[frame].0
            } else {
                frames[frame].1
            }
        },
        |frame, channel, value| {
            if channel == 0 {
                out[frame].0 = value;
            } else {
                out[frame].1 = value;
            }
        },
    );
    out
}

fn stereo_frames() -> impl Strategy<Value = Vec<(f32, f32)>> {
    prop::collection::vec((-1.0f32..=1.0f32, -1.0f32..=1.0f32), 1..=512)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Same coefficients, same zero state, same input: bit-identical output.
    #[test]
    fn determinism(
        fc in MIN_CROSSOVER_HZ..=MAX_CROSSOVER_HZ,
        rate_idx in 0usize..4,
        frames in stereo_frames(),
    ) {
        let fs = SAMPLE_RATES[rate_idx];
        let first = run(&mut engine(fc, fs), &frames);
        let second = run(&mut engine(fc, fs), &frames);
        for (a, b) in first.iter().zip(second.iter()) {
            prop_assert_eq!(a.0.to_bits(), b.0.to_bits());
            prop_assert_eq!(a.1.to_bits(), b.1.to_bits());
        }
    }

    /// Zero state plus all-zero input yields exact zeros for both bands.
    #[test]
    fn silence_preservation(
        fc in MIN_CROSSOVER_HZ..=MAX_CROSSOVER_HZ,
        rate_idx in 0usize..4,
        len in 1usize..2048,
    ) {
        let fs = SAMPLE_RATES[rate_idx];
        let out = run(&mut engine(fc, fs), &vec![(0.0, 0.0); len]);
        prop_assert!(out.iter().all(|&(l, h)| l == 0.0 && h == 0.0));
    }

    /// Splitting a stream across two buffer calls matches one call.
    #[test]
    fn continuity_across_calls(
        fc in MIN_CROSSOVER_HZ..=MAX_CROSSOVER_HZ,
        frames in stereo_frames(),
        split_frac in 0.0f64..=1.0,
    ) {
        let split = ((frames.len() as f64) * split_frac) as usize;

        let whole = run(&mut engine(fc, 48000.0), &frames);

        let mut chunked_engine = engine(fc, 48000.0);
        let mut chunked = run(&mut chunked_engine, &frames[..split]);
        chunked.extend(run(&mut chunked_engine, &frames[split..]));

        prop_assert_eq!(whole.len(), chunked.len());
        for (a, b) in whole.iter().zip(chunked.iter()) {
            prop_assert_eq!(a.0.to_bits(), b.0.to_bits());
            prop_assert_eq!(a.1.to_bits(), b.1.to_bits());
        }
    }

    /// Bounded input stays bounded for every clamped frequency and common rate.
    #[test]
    fn stability(
        fc in MIN_CROSSOVER_HZ..=MAX_CROSSOVER_HZ,
        rate_idx in 0usize..4,
        frames in stereo_frames(),
    ) {
        let fs = SAMPLE_RATES[rate_idx];
        let out = run(&mut engine(fc, fs), &frames);
        for &(low, high) in &out {
            prop_assert!(low.is_finite() && high.is_finite());
            prop_assert!(low.abs() < 4.0 && high.abs() < 4.0, "low={} high={}", low, high);
        }
    }

    /// Feeding `x` then `x'` matches the recurrence evaluated on the state
    /// captured before each call.
    #[test]
    fn state_ordering(
        fc in MIN_CROSSOVER_HZ..=MAX_CROSSOVER_HZ,
        kind_idx in 0usize..2,
        warmup in prop::collection::vec(-1.0f32..=1.0f32, 0..16),
        x in -1.0f32..=1.0f32,
        x_next in -1.0f32..=1.0f32,
    ) {
        let kind = if kind_idx == 0 { FilterKind::Lowpass } else { FilterKind::Highpass };
        let c = FilterCoefficients::compute(kind, fc, 48000.0).unwrap();
        let mut biquad = Biquad::new(c);
        for &w in &warmup {
            biquad.process(w);
        }

        let s = biquad.state();
        let y = c.a0 * x + c.a1 * s.x1() + c.a2 * s.x2() - c.b1 * s.y1() - c.b2 * s.y2();
        // After the first call: x1 = x, x2 = old x1, y1 = y, y2 = old y1
        let y_next = c.a0 * x_next + c.a1 * x + c.a2 * s.x1() - c.b1 * y - c.b2 * s.y1();

        prop_assert_eq!(biquad.process(x).to_bits(), y.to_bits());
        prop_assert_eq!(biquad.process(x_next).to_bits(), y_next.to_bits());
    }
}

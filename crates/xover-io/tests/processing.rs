//! Integration tests for xover-io that need no audio hardware.
//!
//! Drives the crossover through the same interleaved buffers a duplex
//! stream delivers, and checks error conversion at the setup boundary.

use xover_core::{AudioContext, CrossoverConfig, CrossoverEngine, CrossoverError};
use xover_io::{CrossoverProcessor, Error, InterleavedContext, StreamConfig};

const SAMPLE_RATE: f32 = 48000.0;

fn processor(fc: f32) -> CrossoverProcessor {
    let config = CrossoverConfig::new(fc, SAMPLE_RATE).unwrap();
    CrossoverProcessor::new(CrossoverEngine::new(config).unwrap())
}

/// Interleaved stereo sine.
fn stereo_sine(freq_hz: f32, frames: usize) -> Vec<f32> {
    (0..frames)
        .flat_map(|n| {
            let s = libm::sinf(core::f32::consts::TAU * freq_hz * n as f32 / SAMPLE_RATE);
            [s, s]
        })
        .collect()
}

fn channel_rms(buffer: &[f32], channels: usize, channel: usize, skip_frames: usize) -> f32 {
    let samples: Vec<f32> = buffer
        .chunks(channels)
        .skip(skip_frames)
        .map(|frame| frame[channel])
        .collect();
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    libm::sqrtf(sum_sq / samples.len() as f32)
}

#[test]
fn bass_goes_to_channel_one_treble_to_channel_two() {
    let frames = 9600;
    let mut xo = processor(1000.0);

    let bass = stereo_sine(80.0, frames);
    let mut out = vec![0.0; frames * 2];
    for (input, output) in bass.chunks(512).zip(out.chunks_mut(512)) {
        xo.process_interleaved(input, 2, output, 2);
    }
    assert!(channel_rms(&out, 2, 0, 4800) > 0.6);
    assert!(channel_rms(&out, 2, 1, 4800) < 0.02);

    let mut xo = processor(1000.0);
    let treble = stereo_sine(12000.0, frames);
    for (input, output) in treble.chunks(512).zip(out.chunks_mut(512)) {
        xo.process_interleaved(input, 2, output, 2);
    }
    assert!(channel_rms(&out, 2, 0, 4800) < 0.02);
    assert!(channel_rms(&out, 2, 1, 4800) > 0.6);
}

#[test]
fn buffer_size_does_not_change_output() {
    let input = stereo_sine(1500.0, 2048);

    let mut whole = vec![0.0; input.len()];
    processor(1000.0).process_interleaved(&input, 2, &mut whole, 2);

    let mut chunked = vec![0.0; input.len()];
    let mut xo = processor(1000.0);
    for (i, o) in input.chunks(2 * 37).zip(chunked.chunks_mut(2 * 37)) {
        xo.process_interleaved(i, 2, o, 2);
    }

    assert_eq!(whole, chunked);
    assert_eq!(xo.frames_processed(), 2048);
}

#[test]
fn surround_output_leaves_extra_channels_silent() {
    let stereo = stereo_sine(440.0, 256);
    let mut out = vec![1.0; 256 * 6];

    let mut ctx = InterleavedContext::new(&stereo, 2, &mut out, 6);
    assert_eq!(ctx.output_channels(), 6);
    assert_eq!(processor(1000.0).process(&mut ctx), 256);

    for frame in out.chunks(6) {
        assert!(frame[2..].iter().all(|&s| s == 0.0));
    }
}

#[test]
fn crossover_error_converts_into_io_error() {
    let err: Error = CrossoverConfig::new(30000.0, SAMPLE_RATE).unwrap_err().into();
    assert!(matches!(
        err,
        Error::Crossover(CrossoverError::InvalidFrequency { .. })
    ));
    assert!(err.to_string().starts_with("Crossover setup error"));
}

#[test]
fn default_stream_config_requests_nothing() {
    let config = StreamConfig::default();
    assert_eq!(config.sample_rate, None);
    assert_eq!(config.buffer_size, None);
}

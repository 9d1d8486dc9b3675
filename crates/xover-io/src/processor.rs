//! Crossover processing bound to platform buffers.

use crate::InterleavedContext;
use xover_core::{AudioContext, CrossoverEngine, EngineState};

/// Runs a [`CrossoverEngine`] on the buffers an audio stream delivers.
///
/// The processor is `Send` so it can be moved into the output callback; after
/// that it is only touched from the audio thread, one buffer at a time.
#[derive(Debug)]
pub struct CrossoverProcessor {
    engine: CrossoverEngine,
    frames_processed: u64,
}

impl CrossoverProcessor {
    /// Wraps a ready engine.
    pub fn new(engine: CrossoverEngine) -> Self {
        Self {
            engine,
            frames_processed: 0,
        }
    }

    /// Processes one buffer, returning the frames handled.
    pub fn process<C: AudioContext + ?Sized>(&mut self, context: &mut C) -> usize {
        let frames = self.engine.process_context(context);
        self.frames_processed += frames as u64;
        frames
    }

    /// Processes one interleaved buffer pair.
    ///
    /// `output` is silenced first; the low band goes to channel 0, the high
    /// band to channel 1, any further channels stay silent.
    pub fn process_interleaved(
        &mut self,
        input: &[f32],
        input_channels: usize,
        output: &mut [f32],
        output_channels: usize,
    ) -> usize {
        let mut ctx = InterleavedContext::new(input, input_channels, output, output_channels);
        self.process(&mut ctx)
    }

    /// Total frames processed since construction.
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &CrossoverEngine {
        &self.engine
    }

    /// Stops the engine; later buffers come out silent.
    pub fn stop(&mut self) {
        self.engine.stop();
    }

    /// True once the engine has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.engine.state() == EngineState::Stopped
    }

    /// Unwraps the engine.
    pub fn into_engine(self) -> CrossoverEngine {
        self.engine
    }
}

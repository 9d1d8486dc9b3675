//! Real-time duplex audio streaming via cpal.
//!
//! Capture and playback are separate cpal streams. Captured samples cross to
//! the playback callback through a lock-free SPSC ring buffer sized at setup;
//! the playback callback pulls one buffer's worth of input, hands both sides
//! to the processing callback through an [`InterleavedContext`], and writes
//! the result. Nothing on either callback allocates.

use crate::{Error, InterleavedContext, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Host, SampleFormat};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Frames processed per pass of the playback callback. Larger device
/// buffers are handled in several passes.
const MAX_CHUNK_FRAMES: usize = 4096;

/// Ring buffer capacity as a multiple of the chunk size, to absorb jitter
/// between the capture and playback clocks.
const RING_CHUNKS: usize = 4;

/// Poll interval of the blocking run loop.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Extract device name via `description()` (cpal 0.17+).
pub(crate) fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Audio device information.
#[derive(Debug, Clone)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Whether the device supports audio input.
    pub is_input: bool,
    /// Whether the device supports audio output.
    pub is_output: bool,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
}

/// Stream configuration.
///
/// `None` fields fall back to the output device's defaults.
#[derive(Debug, Clone, Default)]
pub struct StreamConfig {
    /// Sample rate in Hz.
    pub sample_rate: Option<u32>,
    /// Buffer size in frames.
    pub buffer_size: Option<u32>,
    /// Input device name or index (uses default if `None`).
    pub input_device: Option<String>,
    /// Output device name or index (uses default if `None`).
    pub output_device: Option<String>,
}

/// Stops a running [`AudioStream`] from another thread or a signal handler.
#[derive(Debug, Clone)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    /// Requests the stream to stop. [`AudioStream::run`] returns within one
    /// poll interval.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// True once a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        !self.running.load(Ordering::SeqCst)
    }
}

/// Counters updated by the audio callbacks.
#[derive(Debug, Default)]
pub struct StreamStats {
    /// Playback buffers that had to be filled with silence because not
    /// enough input had arrived.
    pub underruns: AtomicU64,
    /// Captured samples dropped because the ring buffer was full.
    pub overruns: AtomicU64,
    /// Frames handed to the processing callback.
    pub frames: AtomicU64,
}

/// Label shown for devices whose name cannot be read.
const UNNAMED_DEVICE: &str = "(unnamed device)";

/// Input and output devices in the order the host reports them.
///
/// A device's position in its list is the index `--input-device` and
/// `--output-device` accept. A device that supports both directions appears
/// in both lists, possibly at different positions.
#[derive(Debug, Clone, Default)]
pub struct DeviceList {
    /// Devices that can capture.
    pub inputs: Vec<AudioDevice>,
    /// Devices that can play back.
    pub outputs: Vec<AudioDevice>,
}

/// List all available audio devices.
pub fn list_devices() -> Result<DeviceList> {
    let host = cpal::default_host();
    let list = DeviceList {
        inputs: direction_devices(&host, true)?
            .iter()
            .map(|d| describe_device(d, true))
            .collect(),
        outputs: direction_devices(&host, false)?
            .iter()
            .map(|d| describe_device(d, false))
            .collect(),
    };

    tracing::debug!(
        inputs = list.inputs.len(),
        outputs = list.outputs.len(),
        "enumerated audio devices"
    );
    Ok(list)
}

/// Resolves a device by index, exact name, or partial name, exactly as
/// [`AudioStream::new`] does. Returns its index in the direction's list.
pub fn find_device(name_or_index: &str, is_input: bool) -> Result<(usize, AudioDevice)> {
    let host = cpal::default_host();
    let devices = direction_devices(&host, is_input)?;
    let index = resolve_device(&devices, name_or_index, is_input)?;
    Ok((index, describe_device(&devices[index], is_input)))
}

fn describe_device(device: &Device, listed_as_input: bool) -> AudioDevice {
    let input_config = device.default_input_config();
    let output_config = device.default_output_config();
    let listed_config = if listed_as_input {
        &input_config
    } else {
        &output_config
    };

    AudioDevice {
        name: device_name(device).unwrap_or_else(|_| UNNAMED_DEVICE.to_string()),
        is_input: listed_as_input || input_config.is_ok(),
        is_output: !listed_as_input || output_config.is_ok(),
        default_sample_rate: listed_config
            .as_ref()
            .map(|c| c.sample_rate())
            .unwrap_or(48000),
    }
}

/// Get the default audio device info.
pub fn default_device() -> Result<(Option<AudioDevice>, Option<AudioDevice>)> {
    let host = cpal::default_host();

    let input = host.default_input_device().and_then(|d| {
        device_name(&d).ok().map(|name| AudioDevice {
            name,
            is_input: true,
            is_output: false,
            default_sample_rate: d
                .default_input_config()
                .map(|c| c.sample_rate())
                .unwrap_or(48000),
        })
    });

    let output = host.default_output_device().and_then(|d| {
        device_name(&d).ok().map(|name| AudioDevice {
            name,
            is_input: false,
            is_output: true,
            default_sample_rate: d
                .default_output_config()
                .map(|c| c.sample_rate())
                .unwrap_or(48000),
        })
    });

    Ok((input, output))
}

/// Duplex audio stream: one capture device, one playback device.
///
/// Construction resolves both devices and negotiates the sample rate and
/// channel counts, so the crossover can be built with the real sample rate
/// before [`AudioStream::run`] starts the callbacks.
pub struct AudioStream {
    #[allow(dead_code)]
    host: Host,
    input_device: Device,
    output_device: Device,
    input_config: cpal::StreamConfig,
    output_config: cpal::StreamConfig,
    running: Arc<AtomicBool>,
    stats: Arc<StreamStats>,
}

impl AudioStream {
    /// Opens the configured devices without starting them.
    pub fn new(config: StreamConfig) -> Result<Self> {
        let host = cpal::default_host();
        tracing::info!(host = host.id().name(), "audio host selected");

        let input_device = match &config.input_device {
            Some(name) => open_device(&host, name, true)?,
            None => host.default_input_device().ok_or(Error::NoDevice)?,
        };

        let output_device = match &config.output_device {
            Some(name) => open_device(&host, name, false)?,
            None => host.default_output_device().ok_or(Error::NoDevice)?,
        };

        let input_default = input_device
            .default_input_config()
            .map_err(|e| Error::Stream(e.to_string()))?;
        let output_default = output_device
            .default_output_config()
            .map_err(|e| Error::Stream(e.to_string()))?;

        for (kind, format) in [
            ("input", input_default.sample_format()),
            ("output", output_default.sample_format()),
        ] {
            if format != SampleFormat::F32 {
                tracing::warn!(kind, ?format, "device default format is not f32; requesting f32");
            }
        }

        let sample_rate = config
            .sample_rate
            .unwrap_or_else(|| output_default.sample_rate());
        let buffer_size = match config.buffer_size {
            Some(frames) => cpal::BufferSize::Fixed(frames),
            None => cpal::BufferSize::Default,
        };

        let input_config = cpal::StreamConfig {
            channels: input_default.channels(),
            sample_rate,
            buffer_size,
        };
        let output_config = cpal::StreamConfig {
            channels: output_default.channels(),
            sample_rate,
            buffer_size,
        };

        tracing::info!(
            input = %device_name(&input_device).unwrap_or_default(),
            output = %device_name(&output_device).unwrap_or_default(),
            sample_rate,
            input_channels = input_config.channels,
            output_channels = output_config.channels,
            "audio devices opened"
        );

        Ok(Self {
            host,
            input_device,
            output_device,
            input_config,
            output_config,
            running: Arc::new(AtomicBool::new(true)),
            stats: Arc::new(StreamStats::default()),
        })
    }

    /// Negotiated sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.output_config.sample_rate
    }

    /// Capture channel count.
    pub fn input_channels(&self) -> u16 {
        self.input_config.channels
    }

    /// Playback channel count.
    pub fn output_channels(&self) -> u16 {
        self.output_config.channels
    }

    /// Name of the capture device.
    pub fn input_device_name(&self) -> String {
        device_name(&self.input_device).unwrap_or_else(|_| "unknown".to_string())
    }

    /// Name of the playback device.
    pub fn output_device_name(&self) -> String {
        device_name(&self.output_device).unwrap_or_else(|_| "unknown".to_string())
    }

    /// Handle that makes [`AudioStream::run`] return.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Callback counters, shared with the running streams.
    pub fn stats(&self) -> Arc<StreamStats> {
        Arc::clone(&self.stats)
    }

    /// Starts capture and playback and blocks until stopped.
    ///
    /// `process` runs on the playback thread once per chunk of at most
    /// 4096 frames. When it returns, both streams have been
    /// paused and dropped.
    pub fn run<F>(&mut self, process: F) -> Result<()>
    where
        F: FnMut(&mut InterleavedContext<'_>) + Send + 'static,
    {
        let input_channels = usize::from(self.input_config.channels);
        let output_channels = usize::from(self.output_config.channels);

        let capacity = MAX_CHUNK_FRAMES * input_channels.max(1) * RING_CHUNKS;
        let (producer, consumer) = rtrb::RingBuffer::<f32>::new(capacity);
        tracing::debug!(capacity, "input ring buffer created");

        let mut capture = CapturePump::new(producer, Arc::clone(&self.stats));
        let mut playback = PlaybackPump::new(
            consumer,
            input_channels,
            output_channels,
            Arc::clone(&self.stats),
            process,
        );

        let input_running = Arc::clone(&self.running);
        let input_stream = self
            .input_device
            .build_input_stream(
                &self.input_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if input_running.load(Ordering::Relaxed) {
                        capture.push(data);
                    }
                },
                |err| tracing::error!(error = %err, "input stream error"),
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        let output_running = Arc::clone(&self.running);
        let output_stream = self
            .output_device
            .build_output_stream(
                &self.output_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if output_running.load(Ordering::Relaxed) {
                        playback.fill(data);
                    } else {
                        data.fill(0.0);
                    }
                },
                |err| tracing::error!(error = %err, "output stream error"),
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        input_stream
            .play()
            .map_err(|e| Error::Stream(e.to_string()))?;
        output_stream
            .play()
            .map_err(|e| Error::Stream(e.to_string()))?;
        tracing::info!("audio streams started");

        let mut reported_underruns = 0;
        let mut reported_overruns = 0;
        while self.running.load(Ordering::SeqCst) {
            std::thread::sleep(POLL_INTERVAL);

            let underruns = self.stats.underruns.load(Ordering::Relaxed);
            if underruns > reported_underruns {
                tracing::warn!(
                    new = underruns - reported_underruns,
                    total = underruns,
                    "playback underrun, output silenced"
                );
                reported_underruns = underruns;
            }
            let overruns = self.stats.overruns.load(Ordering::Relaxed);
            if overruns > reported_overruns {
                tracing::warn!(
                    dropped = overruns - reported_overruns,
                    total = overruns,
                    "capture overrun, input samples dropped"
                );
                reported_overruns = overruns;
            }
        }

        if let Err(e) = output_stream.pause() {
            tracing::warn!(error = %e, "failed to pause output stream");
        }
        if let Err(e) = input_stream.pause() {
            tracing::warn!(error = %e, "failed to pause input stream");
        }
        drop(output_stream);
        drop(input_stream);

        tracing::info!(
            frames = self.stats.frames.load(Ordering::Relaxed),
            underruns = self.stats.underruns.load(Ordering::Relaxed),
            "audio streams stopped"
        );
        Ok(())
    }
}

/// Capture side: copies captured samples into the ring buffer.
pub(crate) struct CapturePump {
    producer: rtrb::Producer<f32>,
    stats: Arc<StreamStats>,
}

impl CapturePump {
    pub(crate) fn new(producer: rtrb::Producer<f32>, stats: Arc<StreamStats>) -> Self {
        Self { producer, stats }
    }

    /// Pushes as much of `data` as fits; the rest is counted as overrun.
    pub(crate) fn push(&mut self, data: &[f32]) {
        for (i, &sample) in data.iter().enumerate() {
            if self.producer.push(sample).is_err() {
                let dropped = (data.len() - i) as u64;
                self.stats.overruns.fetch_add(dropped, Ordering::Relaxed);
                break;
            }
        }
    }
}

/// Playback side: pulls input, runs the processing callback, fills output.
pub(crate) struct PlaybackPump<F> {
    consumer: rtrb::Consumer<f32>,
    scratch: Vec<f32>,
    input_channels: usize,
    output_channels: usize,
    stats: Arc<StreamStats>,
    process: F,
}

impl<F> PlaybackPump<F>
where
    F: FnMut(&mut InterleavedContext<'_>),
{
    pub(crate) fn new(
        consumer: rtrb::Consumer<f32>,
        input_channels: usize,
        output_channels: usize,
        stats: Arc<StreamStats>,
        process: F,
    ) -> Self {
        Self {
            consumer,
            scratch: vec![0.0; MAX_CHUNK_FRAMES * input_channels.max(1)],
            input_channels,
            output_channels,
            stats,
            process,
        }
    }

    /// Fills one playback buffer.
    ///
    /// If the ring does not hold input for the whole buffer, the whole buffer
    /// is silenced and counted as one underrun; the input already queued is
    /// left for the next callback.
    pub(crate) fn fill(&mut self, data: &mut [f32]) {
        if self.output_channels == 0 {
            return;
        }

        let total_frames = data.len() / self.output_channels;
        if self.consumer.slots() < total_frames * self.input_channels {
            data.fill(0.0);
            self.stats.underruns.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let chunk_len = MAX_CHUNK_FRAMES * self.output_channels;
        for out in data.chunks_mut(chunk_len) {
            let frames = out.len() / self.output_channels;
            let needed = frames * self.input_channels;

            let input = &mut self.scratch[..needed];
            for slot in input.iter_mut() {
                *slot = self.consumer.pop().unwrap_or(0.0);
            }

            let mut ctx =
                InterleavedContext::new(input, self.input_channels, out, self.output_channels);
            (self.process)(&mut ctx);
            self.stats.frames.fetch_add(frames as u64, Ordering::Relaxed);
        }
    }
}

/// Capture or playback devices in host order.
fn direction_devices(host: &Host, is_input: bool) -> Result<Vec<Device>> {
    let devices: std::result::Result<Vec<Device>, _> = if is_input {
        host.input_devices().map(|d| d.collect())
    } else {
        host.output_devices().map(|d| d.collect())
    };
    devices.map_err(|e| Error::Stream(e.to_string()))
}

/// Opens a device by index, exact name, or partial name.
///
/// The `name_or_index` can be:
/// - A numeric index (e.g., "0", "1") into [`DeviceList`] for that direction
/// - An exact device name
/// - A partial device name (case-insensitive fuzzy match)
fn open_device(host: &Host, name_or_index: &str, is_input: bool) -> Result<Device> {
    let devices = direction_devices(host, is_input)?;
    let index = resolve_device(&devices, name_or_index, is_input)?;
    Ok(devices[index].clone())
}

fn resolve_device(devices: &[Device], name_or_index: &str, is_input: bool) -> Result<usize> {
    let names: Vec<Option<String>> = devices.iter().map(|d| device_name(d).ok()).collect();
    let kind = if is_input { "input" } else { "output" };
    match_device_name(&names, name_or_index, kind)
}

/// Resolves `name_or_index` against a list of device names.
///
/// Index first, then exact name, then case-insensitive substring. Several
/// substring hits pick the first and log a warning.
fn match_device_name(names: &[Option<String>], name_or_index: &str, kind: &str) -> Result<usize> {
    if let Ok(index) = name_or_index.parse::<usize>() {
        return if index < names.len() {
            Ok(index)
        } else {
            Err(Error::DeviceNotFound(format!(
                "{} device index {} (only {} devices available)",
                kind,
                index,
                names.len()
            )))
        };
    }

    if let Some(index) = names
        .iter()
        .position(|n| n.as_deref() == Some(name_or_index))
    {
        return Ok(index);
    }

    let search_lower = name_or_index.to_lowercase();
    let matches: Vec<(usize, &str)> = names
        .iter()
        .enumerate()
        .filter_map(|(i, n)| {
            n.as_deref()
                .filter(|name| name.to_lowercase().contains(&search_lower))
                .map(|name| (i, name))
        })
        .collect();

    match matches.as_slice() {
        [] => Err(Error::DeviceNotFound(format!(
            "no {} device matching '{}'",
            kind, name_or_index
        ))),
        [(index, _)] => Ok(*index),
        [(index, first), ..] => {
            let all: Vec<_> = matches.iter().map(|(_, n)| *n).collect();
            tracing::warn!(
                search = name_or_index,
                kind,
                matches = ?all,
                using = first,
                "device name matches multiple devices"
            );
            Ok(*index)
        }
    }
}

//! Audio Stream Module
//!
//! This module handles CPAL audio stream management including:
//! - Stream initialization and configuration
//! - The real-time callback that drains control messages and renders the graph
//! - An offline variant of the same wiring for rendering without a device

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Stream, StreamConfig};
use env_logger::{Builder, Env};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::audio_engine::constants::{
    EQ_BAND_FREQUENCIES_HZ, OUTPUT_BUFFER_FRAMES, RING_CAPACITY,
};
use crate::audio_engine::errors::SessionError;
use crate::audio_engine::graph::RtGraph;
use crate::messages::{AudioMessage, ControlMessage};

/// Handle to the audio output with associated message channels.
///
/// Without a device stream (see [`offline_stream`]) the handle still accepts
/// messages; whoever owns the matching [`AudioCallback`] renders them.
pub struct AudioStreamHandle {
    stream: Option<Stream>,
    pub producer: Producer<ControlMessage>,
    pub consumer: Consumer<AudioMessage>,
    pub output_channels: usize,
    pub output_sample_rate: u32,
}

impl AudioStreamHandle {
    pub fn has_device_stream(&self) -> bool {
        self.stream.is_some()
    }
}

/// Audio-thread half: owns the graph and both ring buffer ends it needs.
pub struct AudioCallback {
    consumer: Consumer<ControlMessage>,
    producer: Producer<AudioMessage>,
    graph: RtGraph,
}

impl AudioCallback {
    /// Apply pending control messages, then render one block.
    pub fn process(&mut self, data: &mut [f32]) {
        while let Ok(message) = self.consumer.pop() {
            match message {
                ControlMessage::Ping() => {
                    let _ = self.producer.push(AudioMessage::Pong());
                }
                ControlMessage::LoadSample(sample) => {
                    self.graph.load_sample(sample);
                }
                ControlMessage::Play() => {
                    if self.graph.play() {
                        let _ = self.producer.push(AudioMessage::Started());
                    }
                }
                ControlMessage::Stop() => {
                    if self.graph.stop() {
                        let _ = self.producer.push(AudioMessage::Stopped());
                    }
                }
                ControlMessage::SetVolume(volume) => {
                    self.graph.set_volume(volume);
                }
                ControlMessage::SetEqGain { band, gain_db } => {
                    self.graph.set_eq_gain(band, gain_db);
                }
            }
        }

        self.graph.render(data);
    }

    pub fn graph(&self) -> &RtGraph {
        &self.graph
    }
}

/// Setup and configure the logger for audio operations
pub fn setup_logger() {
    // Users can override via `RUST_LOG`, e.g. `RUST_LOG=debug` when troubleshooting.
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init()
        .unwrap_or(()); // Ignore initialization errors
}

fn wire(channels: usize, sample_rate: u32) -> (AudioStreamHandle, AudioCallback) {
    // Control thread -> audio thread
    let (producer_in, consumer_in) = RingBuffer::new(RING_CAPACITY);

    // Audio thread -> control thread
    let (producer_out, consumer_out) = RingBuffer::new(RING_CAPACITY);

    let handle = AudioStreamHandle {
        stream: None,
        producer: producer_in,
        consumer: consumer_out,
        output_channels: channels,
        output_sample_rate: sample_rate,
    };
    let callback = AudioCallback {
        consumer: consumer_in,
        producer: producer_out,
        graph: RtGraph::new(channels, sample_rate, &EQ_BAND_FREQUENCIES_HZ),
    };
    (handle, callback)
}

/// Build the control/render pair without opening a device.
pub fn offline_stream(channels: usize, sample_rate: u32) -> (AudioStreamHandle, AudioCallback) {
    wire(channels, sample_rate)
}

/// Create, configure and start the device output stream.
///
/// This function:
/// 1. Opens the default output device
/// 2. Creates ring buffers for message passing
/// 3. Builds the render graph and moves it into the device callback
/// 4. Starts the stream
pub fn create_audio_stream() -> Result<AudioStreamHandle, SessionError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(SessionError::NoOutputDevice)?;

    let config = device.default_output_config()?;
    let sample_rate = config.sample_rate();
    let channels = config.channels();

    log::info!(
        "Starting audio output... ({} ch@{} Hz)",
        channels,
        sample_rate
    );

    let (mut handle, mut callback) = wire(channels as usize, sample_rate);

    let stream_config = StreamConfig {
        channels,
        sample_rate,
        buffer_size: BufferSize::Fixed(OUTPUT_BUFFER_FRAMES),
    };

    let stream = device.build_output_stream(
        &stream_config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            callback.process(data);
        },
        |err| {
            log::error!("Audio stream error: {}", err);
        },
        None,
    )?;

    stream.play()?;
    handle.stream = Some(stream);
    Ok(handle)
}

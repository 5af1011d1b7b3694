//! Message definitions for communication between the control and audio threads.
//!
//! This module defines the enums that serve as the wire format for messages passed through the
//! ring buffers between the control thread and the real-time audio thread.

use std::sync::Arc;

/// Decoded, immutable audio shared with the audio thread.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    pub channels: usize,
    pub samples: Arc<[f32]>,
}

impl SampleBuffer {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }
}

/// Message that is emitted from the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioMessage {
    /// Response to a Ping message.
    Pong(),

    /// The player node started rendering.
    Started(),

    /// The player node stopped and rewound to the start of its buffer.
    Stopped(),
}

/// Message that is emitted from the control thread.
#[derive(Debug, Clone)]
pub enum ControlMessage {
    /// Used for testing message passing functionality.
    Ping(),

    /// Replace the looping buffer; playback position restarts at frame 0.
    LoadSample(SampleBuffer),

    /// Start looping the loaded buffer. No-op when already playing.
    Play(),

    /// Stop playback and rewind to frame 0.
    Stop(),

    /// Set the linear output gain.
    ///
    /// # Parameters
    /// * `volume` - Gain (0.0 to 1.0)
    SetVolume(f32),

    /// Set one equalizer band's gain in dB.
    SetEqGain { band: usize, gain_db: f32 },
}

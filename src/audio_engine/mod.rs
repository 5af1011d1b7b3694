//! Audio Engine Module
//!
//! This module provides looping playback of one sound through a parametric
//! equalizer. It is organized into sub-modules, each with a specific responsibility:
//!
//! - [`audio_stream`]: CPAL audio stream management and real-time callback
//! - [`constants`]: Configuration constants and limits
//! - [`errors`]: Audio-specific error types
//! - [`equalizer`]: Control-side gain curve and render-side filter bank
//! - [`graph`]: Real-time signal chain (player node → equalizer → output gain)
//! - [`player_node`]: Looping source node
//! - [`sample_loader`]: Asset lookup, decoding, resampling
//! - [`volume`]: Perceptual volume curve
//!
//! The main [`AmbientPlayer`] struct is the control-thread face of the engine.

use crate::audio_engine::audio_stream::AudioStreamHandle;
use crate::audio_engine::constants::{EQ_BAND_FREQUENCIES_HZ, VOLUME_MAX, VOLUME_MIN};
use crate::audio_engine::equalizer::{EqBand, EqCurve};
use crate::audio_engine::sample_loader::AssetLibrary;
use crate::messages::{AudioMessage, ControlMessage};
use crate::now_playing::{NowPlayingBridge, RemoteCommand, RemoteCommandTarget};

pub mod audio_stream;
pub mod channels;
pub mod constants;
pub mod equalizer;
pub mod errors;
pub mod graph;
pub mod player_node;
pub mod resample;
pub mod sample_loader;
pub mod volume;

/// Whether the player node is rendering.
///
/// There is no paused state: stopping always rewinds to the start of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    Playing,
    #[default]
    Stopped,
}

/// Start/stop capability driven by interruptions and the application controller.
pub trait PlaybackControl {
    fn play(&mut self);
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
}

/// Control-thread owner of the playback source and equalizer graph.
pub struct AmbientPlayer {
    stream_handle: AudioStreamHandle,
    library: AssetLibrary,
    now_playing: NowPlayingBridge,
    eq: EqCurve,
    state: PlaybackState,
    current_file: Option<String>,
    volume: f32,
}

impl AmbientPlayer {
    pub fn new(
        stream_handle: AudioStreamHandle,
        library: AssetLibrary,
        now_playing: NowPlayingBridge,
    ) -> Self {
        Self {
            stream_handle,
            library,
            now_playing,
            eq: EqCurve::new(&EQ_BAND_FREQUENCIES_HZ),
            state: PlaybackState::Stopped,
            current_file: None,
            volume: VOLUME_MAX,
        }
    }

    fn send(&mut self, message: ControlMessage) {
        if self.stream_handle.producer.push(message).is_err() {
            log::warn!("Control queue full, dropping message");
        }
    }

    /// Decode the named asset and make it the looping buffer.
    ///
    /// Failures are logged; the previous buffer (if any) keeps playing.
    /// The current file and now-playing title only change on success.
    pub fn set_audio_file(&mut self, name: &str) {
        let sample = match self.library.load(
            name,
            self.stream_handle.output_channels,
            self.stream_handle.output_sample_rate,
        ) {
            Ok(sample) => sample,
            Err(err) => {
                log::error!("Error loading the audio file {name}: {err}");
                return;
            }
        };

        log::info!("Loaded {name} ({} frames)", sample.frames());
        self.send(ControlMessage::LoadSample(sample));
        self.current_file = Some(name.to_string());
        self.publish_now_playing();
    }

    pub fn play(&mut self) {
        self.send(ControlMessage::Play());
        self.state = PlaybackState::Playing;
        self.publish_now_playing();
    }

    pub fn stop(&mut self) {
        self.send(ControlMessage::Stop());
        self.state = PlaybackState::Stopped;
    }

    /// Set the linear output gain.
    ///
    /// Callers apply [`volume::perceptual_gain`] themselves when driving this
    /// from a slider. Non-finite values are ignored, others clamped to `[0, 1]`.
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            return;
        }

        let volume = volume.clamp(VOLUME_MIN, VOLUME_MAX);
        self.volume = volume;
        self.send(ControlMessage::SetVolume(volume));
    }

    /// Set one band's gain in dB. Unknown bands are ignored.
    pub fn set_gain(&mut self, band: usize, gain_db: f32) {
        if let Some(gain_db) = self.eq.set_gain(band, gain_db) {
            self.send(ControlMessage::SetEqGain { band, gain_db });
        }
    }

    /// Set every band at once; a sequence of the wrong length is ignored.
    pub fn init_eq_curve(&mut self, gains: &[f32]) {
        if !self.eq.init_curve(gains) {
            log::debug!(
                "Ignoring EQ curve of length {} (expected {})",
                gains.len(),
                self.eq.len()
            );
            return;
        }

        for band in 0..self.eq.len() {
            if let Some(gain_db) = self.eq.gain(band) {
                self.send(ControlMessage::SetEqGain { band, gain_db });
            }
        }
    }

    pub fn eq_gain(&self, band: usize) -> Option<f32> {
        self.eq.gain(band)
    }

    pub fn eq_gains(&self) -> Vec<f32> {
        self.eq.gains()
    }

    pub fn eq_bands(&self) -> &[EqBand] {
        self.eq.bands()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn current_file(&self) -> Option<&str> {
        self.current_file.as_deref()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn output_channels(&self) -> usize {
        self.stream_handle.output_channels
    }

    pub fn output_sample_rate(&self) -> u32 {
        self.stream_handle.output_sample_rate
    }

    /// Push the current title to the now-playing surface.
    pub fn publish_now_playing(&mut self) {
        let title = self.current_file.as_deref().unwrap_or_default();
        self.now_playing.publish_now_playing(title);
    }

    pub fn now_playing(&self) -> &NowPlayingBridge {
        &self.now_playing
    }

    /// Apply remote play/pause commands queued since the last call.
    ///
    /// Returns the number of commands handled.
    pub fn process_remote_commands(&mut self) -> usize {
        let mut handled = 0;
        while let Some(command) = self.now_playing.next_command() {
            match command {
                RemoteCommand::Play => self.on_remote_play(),
                RemoteCommand::Pause => self.on_remote_pause(),
            }
            handled += 1;
        }
        handled
    }

    /// Send a ping message to the audio thread.
    pub fn ping(&mut self) {
        self.send(ControlMessage::Ping());
    }

    /// Receive a message from the audio thread.
    pub fn receive_msg(&mut self) -> Option<AudioMessage> {
        self.stream_handle.consumer.pop().ok()
    }
}

impl PlaybackControl for AmbientPlayer {
    fn play(&mut self) {
        AmbientPlayer::play(self);
    }

    fn stop(&mut self) {
        AmbientPlayer::stop(self);
    }

    fn is_playing(&self) -> bool {
        AmbientPlayer::is_playing(self)
    }
}

impl RemoteCommandTarget for AmbientPlayer {
    fn on_remote_play(&mut self) {
        log::debug!("Remote play");
        self.play();
    }

    fn on_remote_pause(&mut self) {
        log::debug!("Remote pause");
        self.stop();
    }
}

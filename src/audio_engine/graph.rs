//! Real-time signal chain: player node → parametric equalizer → output gain.
//!
//! [`RtGraph`] lives on the audio thread. It is mutated only through
//! [`ControlMessage`](crate::messages::ControlMessage)s drained at the start of
//! every callback, so parameter changes land on block boundaries.

use cpal::Sample;

use crate::audio_engine::constants::{VOLUME_MAX, VOLUME_MIN};
use crate::audio_engine::equalizer::ParametricEq;
use crate::audio_engine::player_node::PlayerNode;
use crate::messages::SampleBuffer;

pub struct RtGraph {
    /// Number of output channels (1 for mono, 2 for stereo).
    channels: usize,

    /// Linear output gain applied after the equalizer.
    volume: f32,

    player: PlayerNode,

    eq: ParametricEq,

    /// Scratch frame reused by `render`.
    frame: Vec<f32>,
}

impl RtGraph {
    /// Creates a stopped, empty graph with a flat equalizer.
    pub fn new(channels: usize, sample_rate_hz: u32, eq_frequencies_hz: &[f32]) -> Self {
        Self {
            channels,
            volume: VOLUME_MAX,
            player: PlayerNode::new(),
            eq: ParametricEq::new(sample_rate_hz, channels, eq_frequencies_hz),
            frame: vec![0.0; channels],
        }
    }

    /// Replaces the looping buffer.
    ///
    /// Buffers whose channel count does not match the graph are ignored.
    pub fn load_sample(&mut self, sample: SampleBuffer) {
        if sample.channels != self.channels {
            return;
        }

        self.player.load(sample);
        self.eq.reset();
    }

    /// Returns `true` if playback actually started.
    pub fn play(&mut self) -> bool {
        self.player.play()
    }

    /// Returns `true` if playback actually stopped.
    pub fn stop(&mut self) -> bool {
        let stopped = self.player.stop();
        self.eq.reset();
        stopped
    }

    /// Invalid values (NaN, infinite, or out of range) are silently ignored.
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() || !(VOLUME_MIN..=VOLUME_MAX).contains(&volume) {
            return;
        }

        self.volume = volume;
    }

    pub fn set_eq_gain(&mut self, band: usize, gain_db: f32) {
        self.eq.set_gain(band, gain_db);
    }

    /// Renders interleaved frames into `output`.
    ///
    /// Produces silence while stopped or when no buffer is loaded.
    pub fn render(&mut self, output: &mut [f32]) {
        output.fill(Sample::EQUILIBRIUM);

        if self.channels == 0 || !self.player.is_playing() {
            return;
        }

        for out_frame in output.chunks_exact_mut(self.channels) {
            if !self.player.next_frame(&mut self.frame) {
                return;
            }

            for (channel, (out, &x)) in out_frame.iter_mut().zip(&self.frame).enumerate() {
                *out = self.eq.process(channel, x) * self.volume;
            }
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    pub fn frame_pos(&self) -> usize {
        self.player.frame_pos()
    }
}

//! Looping source node owned by the audio thread.

use crate::messages::SampleBuffer;

/// Plays one buffer in an endless loop starting at frame 0.
#[derive(Debug, Default)]
pub struct PlayerNode {
    sample: Option<SampleBuffer>,
    frame_pos: usize,
    playing: bool,
}

impl PlayerNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a new buffer and rewinds. The play flag is left as is.
    ///
    /// Returns the previous buffer so the caller decides where it is dropped.
    pub fn load(&mut self, sample: SampleBuffer) -> Option<SampleBuffer> {
        self.frame_pos = 0;
        self.sample.replace(sample)
    }

    /// Returns `true` if the node transitioned from stopped to playing.
    pub fn play(&mut self) -> bool {
        let started = !self.playing;
        self.playing = true;
        started
    }

    /// Returns `true` if the node transitioned from playing to stopped.
    pub fn stop(&mut self) -> bool {
        let stopped = self.playing;
        self.playing = false;
        self.frame_pos = 0;
        stopped
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn frame_pos(&self) -> usize {
        self.frame_pos
    }

    pub fn sample(&self) -> Option<&SampleBuffer> {
        self.sample.as_ref()
    }

    /// Reads the next frame into `frame` and advances, wrapping at the end.
    ///
    /// Returns `false` (leaving `frame` untouched) when stopped or empty.
    pub fn next_frame(&mut self, frame: &mut [f32]) -> bool {
        if !self.playing {
            return false;
        }
        let Some(sample) = self.sample.as_ref() else {
            return false;
        };

        let frames = sample.frames();
        if frames == 0 || sample.channels != frame.len() {
            return false;
        }

        let base = self.frame_pos * sample.channels;
        frame.copy_from_slice(&sample.samples[base..base + sample.channels]);
        self.frame_pos = (self.frame_pos + 1) % frames;
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn ramp(channels: usize, frames: usize) -> SampleBuffer {
        let samples: Vec<f32> = (0..channels * frames).map(|i| i as f32).collect();
        SampleBuffer {
            channels,
            samples: Arc::from(samples.into_boxed_slice()),
        }
    }

    #[test]
    fn test_node_starts_stopped_and_empty() {
        let mut node = PlayerNode::new();
        let mut frame = [0.0; 2];

        assert!(!node.is_playing());
        assert!(node.sample().is_none());
        node.play();
        assert!(!node.next_frame(&mut frame));
    }

    #[test]
    fn test_play_is_idempotent() {
        let mut node = PlayerNode::new();
        node.load(ramp(1, 8));

        assert!(node.play());
        let mut frame = [0.0];
        node.next_frame(&mut frame);
        node.next_frame(&mut frame);

        assert!(!node.play());
        assert_eq!(node.frame_pos(), 2);
    }

    #[test]
    fn test_stop_rewinds() {
        let mut node = PlayerNode::new();
        node.load(ramp(1, 8));
        node.play();

        let mut frame = [0.0];
        for _ in 0..5 {
            node.next_frame(&mut frame);
        }

        assert!(node.stop());
        assert_eq!(node.frame_pos(), 0);
        assert!(!node.stop());
    }

    #[test]
    fn test_loops_back_to_start() {
        let mut node = PlayerNode::new();
        node.load(ramp(2, 3));
        node.play();

        let mut frame = [0.0; 2];
        let mut seen = Vec::new();
        for _ in 0..4 {
            assert!(node.next_frame(&mut frame));
            seen.push(frame);
        }

        assert_eq!(seen, vec![[0.0, 1.0], [2.0, 3.0], [4.0, 5.0], [0.0, 1.0]]);
    }

    #[test]
    fn test_load_replaces_buffer_and_keeps_play_flag() {
        let mut node = PlayerNode::new();
        node.load(ramp(1, 4));
        node.play();
        let mut frame = [0.0];
        node.next_frame(&mut frame);

        let previous = node.load(ramp(1, 6));

        assert_eq!(previous.map(|s| s.frames()), Some(4));
        assert!(node.is_playing());
        assert_eq!(node.frame_pos(), 0);
        assert_eq!(node.sample().map(SampleBuffer::frames), Some(6));
    }

    #[test]
    fn test_channel_mismatch_renders_nothing() {
        let mut node = PlayerNode::new();
        node.load(ramp(2, 4));
        node.play();

        let mut frame = [9.0];
        assert!(!node.next_frame(&mut frame));
        assert_eq!(frame, [9.0]);
    }
}

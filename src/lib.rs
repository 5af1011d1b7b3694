//! Ambient noise playback: one looping sound, a 10-band equalizer, and the
//! session, remote-control and preference plumbing around them.

pub mod app;
pub mod audio_engine;
pub mod messages;
pub mod now_playing;
pub mod preferences;
pub mod session;

pub use app::NoiseApp;
pub use audio_engine::{AmbientPlayer, PlaybackControl, PlaybackState};
pub use messages::AudioMessage;

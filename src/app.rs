//! Application controller.
//!
//! [`NoiseApp`] is what a UI layer talks to: every user gesture maps to one
//! method that updates the player and persists the change.

use crate::audio_engine::audio_stream::setup_logger;
use crate::audio_engine::errors::SessionError;
use crate::audio_engine::sample_loader::AssetLibrary;
use crate::audio_engine::volume::perceptual_gain;
use crate::audio_engine::{AmbientPlayer, PlaybackState};
use crate::now_playing::{LogSurface, NowPlayingBridge};
use crate::preferences::{PreferenceStore, Preferences};
use crate::session::{AudioSession, SessionCategory, SessionMonitor};

pub struct NoiseApp {
    session: AudioSession,
    monitor: SessionMonitor,
    player: AmbientPlayer,
    store: PreferenceStore,
    prefs: Preferences,
}

impl NoiseApp {
    /// Wire up a player and restore persisted state.
    ///
    /// EQ gains and volume are applied before the sound is loaded, so nothing
    /// is ever heard with a stale curve.
    pub fn new(session: AudioSession, mut player: AmbientPlayer, store: PreferenceStore) -> Self {
        let prefs = store.load();
        let monitor = SessionMonitor::new(&session);

        player.init_eq_curve(&prefs.eq_gains);
        player.set_volume(perceptual_gain(prefs.volume));
        player.set_audio_file(&prefs.selected_sound);

        Self {
            session,
            monitor,
            player,
            store,
            prefs,
        }
    }

    /// Full startup against the default output device.
    pub fn launch() -> Result<Self, SessionError> {
        setup_logger();

        let mut session = AudioSession::new();
        if let Err(err) = session.set_category(SessionCategory::Playback) {
            log::error!("Failed to set audio session category: {err}");
        }

        let stream = session.open_output()?;
        let player = AmbientPlayer::new(
            stream,
            AssetLibrary::from_env(),
            NowPlayingBridge::new(Box::new(LogSurface)),
        );

        let mut app = Self::new(session, player, PreferenceStore::default_location());
        app.start();
        Ok(app)
    }

    /// Begin playing the selected sound from the top.
    ///
    /// The asset is only decoded again if a different one is loaded.
    pub fn start(&mut self) {
        if self.player.current_file() != Some(self.prefs.selected_sound.as_str()) {
            self.player.set_audio_file(&self.prefs.selected_sound);
        }
        self.player.stop();
        self.player.play();
    }

    pub fn select_sound(&mut self, name: &str) {
        self.prefs.selected_sound = name.to_string();
        self.persist();

        self.player.set_audio_file(name);
        if self.player.is_playing() {
            self.player.stop();
            self.player.play();
        }
    }

    pub fn toggle_playback(&mut self) -> PlaybackState {
        if self.player.is_playing() {
            self.player.stop();
        } else {
            self.player.play();
        }
        self.player.state()
    }

    /// Set the volume from a linear slider position in `[0, 1]`.
    pub fn set_volume(&mut self, slider: f32) {
        if !slider.is_finite() {
            return;
        }

        self.prefs.volume = slider.clamp(0.0, 1.0);
        self.persist();
        self.player.set_volume(perceptual_gain(self.prefs.volume));
    }

    pub fn set_eq_gain(&mut self, band: usize, gain_db: f32) {
        self.player.set_gain(band, gain_db);
        self.sync_eq();
    }

    /// Return a band to 0 dB.
    pub fn reset_eq_band(&mut self, band: usize) {
        self.set_eq_gain(band, 0.0);
    }

    /// Apply pending interruptions, then pending remote commands.
    pub fn pump_events(&mut self) {
        self.monitor.dispatch(&mut self.player);
        self.player.process_remote_commands();
    }

    pub fn player(&self) -> &AmbientPlayer {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut AmbientPlayer {
        &mut self.player
    }

    pub fn session(&self) -> &AudioSession {
        &self.session
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    fn sync_eq(&mut self) {
        let gains = self.player.eq_gains();
        if gains != self.prefs.eq_gains {
            self.prefs.eq_gains = gains;
            self.persist();
        }
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.prefs) {
            log::error!("Failed to save preferences to {:?}: {err}", self.store.path());
        }
    }
}

//! Persisted user preferences.
//!
//! Stored as JSON in the user's config directory.
//! Default location: ~/.config/ambient-noise/preferences.json

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::audio_engine::constants::{DEFAULT_VOLUME, NUM_EQ_BANDS, SOUND_NAMES};

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to access preferences file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize preferences: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything the app remembers between launches.
///
/// Missing keys fall back to their defaults individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub selected_sound: String,
    /// Slider position in `[0, 1]`, before the perceptual curve.
    pub volume: f32,
    pub eq_gains: Vec<f32>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            selected_sound: SOUND_NAMES[0].to_string(),
            volume: DEFAULT_VOLUME,
            eq_gains: vec![0.0; NUM_EQ_BANDS],
        }
    }
}

/// JSON file holding one [`Preferences`] record.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns: ~/.config/ambient-noise/preferences.json
    pub fn default_location() -> Self {
        let path = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("ambient-noise")
            .join("preferences.json");
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read preferences, falling back to defaults.
    ///
    /// A missing file is normal on first launch; an unreadable or invalid one is
    /// logged and replaced by defaults.
    pub fn load(&self) -> Preferences {
        if !self.path.exists() {
            log::info!("No preferences at {:?}, using defaults", self.path);
            return Preferences::default();
        }

        match std::fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str::<Preferences>(&contents) {
                Ok(prefs) => {
                    log::debug!(
                        "Loaded preferences - sound: {}, volume: {:.2}, eq: {:?}",
                        prefs.selected_sound,
                        prefs.volume,
                        prefs.eq_gains
                    );
                    prefs
                }
                Err(e) => {
                    log::warn!("Failed to parse preferences: {}, using defaults", e);
                    Preferences::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read preferences: {}, using defaults", e);
                Preferences::default()
            }
        }
    }

    /// Write preferences, creating parent directories if needed.
    pub fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(prefs)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

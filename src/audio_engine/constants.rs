//! Audio engine configuration constants and limits.

/// Names of the bundled looping sounds, in picker order.
///
/// The first entry is the default selection.
pub const SOUND_NAMES: [&str; 2] = ["WhiteNoise1", "Falls1"];

/// File extension of bundled sound assets.
pub const ASSET_EXTENSION: &str = "wav";

/// Environment variable overriding the bundled asset directory.
pub const ASSET_DIR_ENV: &str = "AMBIENT_NOISE_ASSETS";

/// Asset directory used when [`ASSET_DIR_ENV`] is unset.
pub const DEFAULT_ASSET_DIR: &str = "assets";

/// Number of equalizer bands.
pub const NUM_EQ_BANDS: usize = 10;

/// Center frequencies of the equalizer bands in Hz.
pub const EQ_BAND_FREQUENCIES_HZ: [f32; NUM_EQ_BANDS] = [
    60.0, 170.0, 310.0, 600.0, 1_000.0, 3_000.0, 6_000.0, 12_000.0, 14_000.0, 16_000.0,
];

/// Bandwidth of every equalizer band in octaves.
pub const EQ_BANDWIDTH_OCTAVES: f32 = 1.0;

/// Minimum per-band EQ gain in dB.
pub const EQ_GAIN_DB_MIN: f32 = -24.0;

/// Maximum per-band EQ gain in dB.
pub const EQ_GAIN_DB_MAX: f32 = 24.0;

/// Minimum volume level (silence).
pub const VOLUME_MIN: f32 = 0.0;

/// Maximum volume level (100%).
pub const VOLUME_MAX: f32 = 1.0;

/// Volume slider position used when no preference is stored.
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Capacity of the control and status ring buffers.
pub const RING_CAPACITY: usize = 1024;

/// Fixed output buffer size requested from the device, in frames.
pub const OUTPUT_BUFFER_FRAMES: u32 = 512;

//! Sound asset lookup and decoding.
//!
//! Assets are looked up by name in an [`AssetLibrary`] and decoded in full into a
//! [`SampleBuffer`] matching the output device's channel count and sample rate.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use symphonia::core::{
    audio::SampleBuffer as SymphoniaSampleBuffer, codecs::DecoderOptions,
    errors::Error as SymphoniaError, formats::FormatOptions, io::MediaSourceStream,
    meta::MetadataOptions, probe::Hint,
};
use symphonia::default::{get_codecs, get_probe};

use crate::audio_engine::channels::map_channels;
use crate::audio_engine::constants::{ASSET_DIR_ENV, ASSET_EXTENSION, DEFAULT_ASSET_DIR};
use crate::audio_engine::errors::SampleLoadError;
use crate::audio_engine::resample::resample_interleaved;
use crate::messages::SampleBuffer;

/// Directory of bundled sound assets, addressed by name.
#[derive(Debug, Clone)]
pub struct AssetLibrary {
    root: PathBuf,
}

impl AssetLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Uses `AMBIENT_NOISE_ASSETS` if set, `./assets` otherwise.
    pub fn from_env() -> Self {
        let root = std::env::var_os(ASSET_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSET_DIR));
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path the named asset would have; does not check existence.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{ASSET_EXTENSION}"))
    }

    /// Resolves `name` to an existing file.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, SampleLoadError> {
        let path = self.path_for(name);
        if name.is_empty() || !path.is_file() {
            return Err(SampleLoadError::AssetNotFound(name.to_string()));
        }
        Ok(path)
    }

    /// Resolves and decodes `name` for the given output format.
    pub fn load(
        &self,
        name: &str,
        output_channels: usize,
        output_rate_hz: u32,
    ) -> Result<SampleBuffer, SampleLoadError> {
        let path = self.resolve(name)?;
        decode_audio_file_to_sample_buffer(&path, output_channels, output_rate_hz)
    }
}

/// Decodes an audio file into a sample buffer with the specified output configuration.
///
/// The file is decoded with Symphonia, resampled to `output_rate_hz` when the rates
/// differ and mapped to `output_channels`.
///
/// # Errors
///
/// - File not found or cannot be opened
/// - Audio format not recognized or corrupted
/// - Unsupported channel count
/// - File decodes to zero frames
pub fn decode_audio_file_to_sample_buffer(
    path: &Path,
    output_channels: usize,
    output_rate_hz: u32,
) -> Result<SampleBuffer, SampleLoadError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or(SampleLoadError::NoDefaultTrack)?;
    let track_id = track.id;
    let file_rate_hz = track
        .codec_params
        .sample_rate
        .ok_or(SampleLoadError::MissingSampleRate)?;
    let file_channels = track
        .codec_params
        .channels
        .ok_or(SampleLoadError::MissingChannels)?
        .count();

    let mut decoder = get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut decoded: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(err) => return Err(SampleLoadError::Decode(err)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let audio_buf = decoder.decode(&packet)?;
        let spec = *audio_buf.spec();
        let duration = audio_buf.capacity() as u64;

        let mut sample_buf = SymphoniaSampleBuffer::<f32>::new(duration, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        decoded.extend_from_slice(sample_buf.samples());
    }

    if decoded.len() < file_channels.max(1) {
        return Err(SampleLoadError::EmptyAsset);
    }

    log::debug!(
        "Decoded {} ({} ch@{} Hz, {} frames)",
        path.display(),
        file_channels,
        file_rate_hz,
        decoded.len() / file_channels.max(1)
    );

    let resampled = resample_interleaved(&decoded, file_channels, file_rate_hz, output_rate_hz)?;
    let mapped = map_channels(resampled, file_channels, output_channels)?;

    Ok(SampleBuffer {
        channels: output_channels,
        samples: Arc::from(mapped.into_boxed_slice()),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use super::*;

    /// Writes a PCM16 WAV file for testing.
    pub(crate) fn write_pcm16_wav(
        path: &Path,
        channels: u16,
        sample_rate_hz: u32,
        samples: &[i16],
    ) -> std::io::Result<()> {
        let bits_per_sample = 16u16;
        let block_align = channels * (bits_per_sample / 8);
        let byte_rate = sample_rate_hz * u32::from(block_align);
        let data_len_bytes = u32::try_from(samples.len() * 2).expect("sample data too large");
        let chunk_size = 36 + data_len_bytes;

        let mut file = File::create(path)?;
        file.write_all(b"RIFF")?;
        file.write_all(&chunk_size.to_le_bytes())?;
        file.write_all(b"WAVE")?;

        file.write_all(b"fmt ")?;
        file.write_all(&16u32.to_le_bytes())?;
        file.write_all(&1u16.to_le_bytes())?; // PCM
        file.write_all(&channels.to_le_bytes())?;
        file.write_all(&sample_rate_hz.to_le_bytes())?;
        file.write_all(&byte_rate.to_le_bytes())?;
        file.write_all(&block_align.to_le_bytes())?;
        file.write_all(&bits_per_sample.to_le_bytes())?;

        file.write_all(b"data")?;
        file.write_all(&data_len_bytes.to_le_bytes())?;
        for sample in samples {
            file.write_all(&sample.to_le_bytes())?;
        }

        Ok(())
    }

    #[test]
    fn test_decode_wav_to_f32_buffer() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("test.wav");

        let samples = [0i16, 16_384i16, -16_384i16, 32_767i16];
        write_pcm16_wav(&path, 1, 44_100, &samples).unwrap();

        let decoded = decode_audio_file_to_sample_buffer(&path, 1, 44_100).unwrap();
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.samples.len(), samples.len());
        assert!((decoded.samples[1] - 0.5).abs() < 1e-3);
        assert!(decoded.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn test_decode_channel_mapping_mono_to_stereo() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("test.wav");

        let samples = [0i16, 16_384i16, -16_384i16];
        write_pcm16_wav(&path, 1, 44_100, &samples).unwrap();

        let decoded = decode_audio_file_to_sample_buffer(&path, 2, 44_100).unwrap();
        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.frames(), samples.len());

        for frame in decoded.samples.chunks_exact(2) {
            assert!((frame[0] - frame[1]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_decode_resamples_to_output_rate() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("test.wav");

        let samples = vec![8_192i16; 22_050];
        write_pcm16_wav(&path, 1, 22_050, &samples).unwrap();

        let decoded = decode_audio_file_to_sample_buffer(&path, 1, 44_100).unwrap();
        assert_eq!(decoded.frames(), 44_100);
    }

    #[test]
    fn test_decode_invalid_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nonexistent.wav");

        let result = decode_audio_file_to_sample_buffer(&path, 1, 44_100);
        assert!(matches!(result, Err(SampleLoadError::Io(_))));
    }

    #[test]
    fn test_decode_corrupt_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("corrupt.wav");
        std::fs::write(&path, b"definitely not a wav file").unwrap();

        let result = decode_audio_file_to_sample_buffer(&path, 1, 44_100);
        assert!(result.is_err());
    }

    #[test]
    fn test_library_resolves_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        write_pcm16_wav(&tmp.path().join("Falls1.wav"), 2, 48_000, &[0, 0, 100, 100]).unwrap();

        let library = AssetLibrary::new(tmp.path());
        assert_eq!(library.resolve("Falls1").unwrap(), tmp.path().join("Falls1.wav"));

        let sample = library.load("Falls1", 2, 48_000).unwrap();
        assert_eq!(sample.frames(), 2);
    }

    #[test]
    fn test_library_missing_asset() {
        let tmp = tempfile::tempdir().unwrap();
        let library = AssetLibrary::new(tmp.path());

        assert!(matches!(
            library.resolve("WhiteNoise1"),
            Err(SampleLoadError::AssetNotFound(name)) if name == "WhiteNoise1"
        ));
        assert!(matches!(
            library.resolve(""),
            Err(SampleLoadError::AssetNotFound(_))
        ));
    }
}

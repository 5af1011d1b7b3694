//! Whole-buffer sample-rate conversion for decoded assets.
//!
//! Assets are short loops decoded fully into memory, so the resampler runs
//! once over the complete buffer on the control thread rather than as a
//! streaming stage.

use audioadapter_buffers::direct::InterleavedSlice;
use rubato::{
    Async, FixedAsync, Indexing, Resampler, SincInterpolationParameters, SincInterpolationType,
    WindowFunction, calculate_cutoff,
};

use crate::audio_engine::errors::SampleLoadError;

/// Input chunk size in frames fed to the resampler per call.
const CHUNK_FRAMES: usize = 1024;

/// Frames of wrap-around context added on each side of the loop.
const LOOP_PAD_FRAMES: usize = 128;

/// Resamples the interleaved loop `samples` from `src_rate_hz` to `dst_rate_hz`.
///
/// The buffer is treated as periodic: the filter sees the loop's tail before
/// frame 0 and its head after the last frame, so the seam stays continuous.
/// The output is trimmed to `round(frames * dst / src)` frames with the
/// resampler's group delay removed.
pub fn resample_interleaved(
    samples: &[f32],
    channels: usize,
    src_rate_hz: u32,
    dst_rate_hz: u32,
) -> Result<Vec<f32>, SampleLoadError> {
    if src_rate_hz == dst_rate_hz || channels == 0 || samples.len() < channels {
        return Ok(samples.to_vec());
    }

    let f_ratio = dst_rate_hz as f64 / src_rate_hz as f64;
    let input_frames = samples.len() / channels;
    let expected_frames = (input_frames as f64 * f_ratio).round() as usize;

    let padded = wrap_pad(samples, channels, LOOP_PAD_FRAMES);
    let lead_frames = (LOOP_PAD_FRAMES as f64 * f_ratio).round() as usize;

    let sinc_len = LOOP_PAD_FRAMES;
    let window = WindowFunction::BlackmanHarris2;
    let params = SincInterpolationParameters {
        sinc_len,
        f_cutoff: calculate_cutoff(sinc_len, window),
        interpolation: SincInterpolationType::Cubic,
        oversampling_factor: 256,
        window,
    };

    let mut resampler = Async::<f32>::new_sinc(
        f_ratio,
        1.1,
        &params,
        CHUNK_FRAMES,
        channels,
        FixedAsync::Input,
    )?;

    let delay_frames = resampler.output_delay();
    let skip_frames = delay_frames + lead_frames;
    let wanted_frames = skip_frames + expected_frames;

    let out_capacity_frames = (CHUNK_FRAMES as f64 * f_ratio * 1.2).ceil() as usize + 64;
    let mut out_interleaved = vec![0.0f32; out_capacity_frames * channels];
    let mut resampled: Vec<f32> = Vec::with_capacity((wanted_frames + out_capacity_frames) * channels);

    let mut indexing = Indexing {
        input_offset: 0,
        output_offset: 0,
        active_channels_mask: None,
        partial_len: None,
    };

    let silence = vec![0.0f32; CHUNK_FRAMES * channels];
    let mut chunks = padded.chunks(CHUNK_FRAMES * channels);

    while resampled.len() < wanted_frames * channels {
        // Once the input runs out, keep feeding silence to flush the filter tail.
        let (chunk, partial_len) = match chunks.next() {
            Some(chunk) if chunk.len() == CHUNK_FRAMES * channels => (chunk, None),
            Some(chunk) => (chunk, Some(chunk.len() / channels)),
            None => (silence.as_slice(), None),
        };
        let chunk_frames = chunk.len() / channels;

        let input_adapter = InterleavedSlice::new(chunk, channels, chunk_frames)
            .map_err(|e| SampleLoadError::ResampleBuffer(e.to_string()))?;
        let mut output_adapter =
            InterleavedSlice::new_mut(&mut out_interleaved, channels, out_capacity_frames)
                .map_err(|e| SampleLoadError::ResampleBuffer(e.to_string()))?;

        indexing.partial_len = partial_len;

        let (_nbr_in, nbr_out) =
            resampler.process_into_buffer(&input_adapter, &mut output_adapter, Some(&indexing))?;

        resampled.extend_from_slice(&out_interleaved[..nbr_out * channels]);
    }

    let start = skip_frames * channels;
    let end = wanted_frames * channels;
    Ok(resampled[start..end].to_vec())
}

/// `pad` frames of the loop's end, the loop, then `pad` frames of its start.
///
/// Loops shorter than `pad` are repeated as often as needed.
fn wrap_pad(samples: &[f32], channels: usize, pad: usize) -> Vec<f32> {
    let frames = samples.len() / channels;
    let total = frames + 2 * pad;
    let mut padded = Vec::with_capacity(total * channels);

    for i in 0..total {
        let frame = (i + frames * pad - pad) % frames;
        let offset = frame * channels;
        padded.extend_from_slice(&samples[offset..offset + channels]);
    }
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_rate_is_passthrough() {
        let input = vec![0.1, 0.2, 0.3, 0.4];
        let output = resample_interleaved(&input, 2, 48_000, 48_000).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_upsample_length() {
        let input = vec![0.25f32; 2 * 22_050];
        let output = resample_interleaved(&input, 2, 22_050, 44_100).unwrap();
        assert_eq!(output.len(), 2 * 44_100);
    }

    #[test]
    fn test_downsample_length_and_level() {
        let input = vec![0.5f32; 48_000];
        let output = resample_interleaved(&input, 1, 48_000, 44_100).unwrap();

        assert_eq!(output.len(), 44_100);
        assert!(output.iter().all(|s| (s - 0.5).abs() < 0.01));
    }

    #[test]
    fn test_loop_seam_matches_body_level() {
        let input = vec![0.5f32; 44_100];
        let output = resample_interleaved(&input, 1, 44_100, 48_000).unwrap();
        assert_eq!(output.len(), 48_000);

        let mid = output[24_000];
        let head = &output[..8];
        let tail = &output[output.len() - 8..];
        for &s in head.iter().chain(tail) {
            assert!((s - mid).abs() < 0.01, "seam sample {s} vs body {mid}");
        }
    }

    #[test]
    fn test_loop_shorter_than_padding() {
        let input = vec![0.25f32; 2 * 100];
        let output = resample_interleaved(&input, 2, 22_050, 44_100).unwrap();

        assert_eq!(output.len(), 2 * 200);
        assert!(output.iter().all(|s| (s - 0.25).abs() < 0.01));
    }

    #[test]
    fn test_wrap_pad_is_cyclic() {
        let input = [1.0, 10.0, 2.0, 20.0, 3.0, 30.0];
        let padded = wrap_pad(&input, 2, 4);

        let firsts: Vec<f32> = padded.chunks(2).map(|f| f[0]).collect();
        assert_eq!(firsts, vec![3.0, 1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0]);
        assert_eq!(&padded[8..10], &[1.0, 10.0]);
    }
}

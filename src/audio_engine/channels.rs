use crate::audio_engine::errors::SampleLoadError;

/// Maps interleaved audio from the asset's channel layout to the device's.
///
/// Supported conversions:
/// - Same channel count: passthrough
/// - Mono → N channels: the mono signal is copied to every output channel
/// - N channels → mono: all channels are averaged
/// - Stereo → N > 2 channels: left/right go to the first two outputs, the
///   remaining outputs stay silent
///
/// Anything else is rejected with [`SampleLoadError::UnsupportedChannels`].
pub fn map_channels(
    samples: Vec<f32>,
    file_channels: usize,
    output_channels: usize,
) -> Result<Vec<f32>, SampleLoadError> {
    if file_channels == output_channels {
        return Ok(samples);
    }

    let unsupported = SampleLoadError::UnsupportedChannels {
        file_channels,
        output_channels,
    };
    if file_channels == 0 || output_channels == 0 {
        return Err(unsupported);
    }

    let frames = samples.len() / file_channels;
    match (file_channels, output_channels) {
        (1, out) => {
            let mut mapped = Vec::with_capacity(frames * out);
            for s in samples {
                mapped.extend(std::iter::repeat_n(s, out));
            }
            Ok(mapped)
        }
        (file, 1) => {
            let scale = 1.0 / file as f32;
            Ok(samples
                .chunks_exact(file)
                .map(|frame| frame.iter().sum::<f32>() * scale)
                .collect())
        }
        (2, out) if out > 2 => {
            let mut mapped = vec![0.0; frames * out];
            for (src, dst) in samples.chunks_exact(2).zip(mapped.chunks_exact_mut(out)) {
                dst[..2].copy_from_slice(src);
            }
            Ok(mapped)
        }
        _ => Err(unsupported),
    }
}

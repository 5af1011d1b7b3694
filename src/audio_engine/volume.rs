use crate::audio_engine::constants::{VOLUME_MAX, VOLUME_MIN};

/// Maps a linear slider position to output gain: `(100^v - 1) / 99`.
///
/// Compensates for loudness being perceived logarithmically. Non-finite input
/// maps to silence; anything else is clamped to `[0, 1]` first.
pub fn perceptual_gain(slider: f32) -> f32 {
    if !slider.is_finite() {
        return VOLUME_MIN;
    }

    let v = slider.clamp(VOLUME_MIN, VOLUME_MAX);
    ((100.0_f32.powf(v) - 1.0) / 99.0).clamp(VOLUME_MIN, VOLUME_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(perceptual_gain(0.0), 0.0);
        assert!((perceptual_gain(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_midpoint() {
        // (10 - 1) / 99
        assert!((perceptual_gain(0.5) - 9.0 / 99.0).abs() < 1e-6);
    }

    #[test]
    fn test_monotonic() {
        let mut previous = perceptual_gain(0.0);
        for step in 1..=100 {
            let gain = perceptual_gain(step as f32 / 100.0);
            assert!(gain >= previous, "not monotonic at step {step}");
            previous = gain;
        }
    }

    #[test]
    fn test_out_of_range_input() {
        assert_eq!(perceptual_gain(-0.5), 0.0);
        assert!((perceptual_gain(3.0) - 1.0).abs() < 1e-6);
        assert_eq!(perceptual_gain(f32::NAN), 0.0);
    }
}

//! Multi-band parametric equalizer.
//!
//! The equalizer exists twice: [`EqCurve`] is the control-thread view that
//! callers read back, [`ParametricEq`] is the render-side filter bank that the
//! audio thread runs. Both are built from the same frequency list and updated
//! in lockstep by [`AmbientPlayer`](crate::audio_engine::AmbientPlayer).

use std::f32::consts::{LN_2, PI};

use crate::audio_engine::constants::{EQ_BANDWIDTH_OCTAVES, EQ_GAIN_DB_MAX, EQ_GAIN_DB_MIN};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl BiquadCoeffs {
    pub fn identity() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }
}

#[derive(Clone, Copy, Default)]
struct BiquadState {
    z1: f32,
    z2: f32,
}

fn biquad_process(coeffs: BiquadCoeffs, state: &mut BiquadState, x: f32) -> f32 {
    let y = coeffs.b0 * x + state.z1;
    state.z1 = coeffs.b1 * x - coeffs.a1 * y + state.z2;
    state.z2 = coeffs.b2 * x - coeffs.a2 * y;
    y
}

fn clamp_freq_hz(fs_hz: f32, freq_hz: f32) -> f32 {
    let nyquist = fs_hz * 0.5;
    let max_hz = (nyquist * 0.9).max(1.0);
    freq_hz.clamp(1.0, max_hz)
}

fn normalize_biquad(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> BiquadCoeffs {
    if !a0.is_finite() || a0.abs() < 1e-12 {
        return BiquadCoeffs::identity();
    }

    let inv_a0 = 1.0 / a0;
    let coeffs = BiquadCoeffs {
        b0: b0 * inv_a0,
        b1: b1 * inv_a0,
        b2: b2 * inv_a0,
        a1: a1 * inv_a0,
        a2: a2 * inv_a0,
    };

    if [coeffs.b0, coeffs.b1, coeffs.b2, coeffs.a1, coeffs.a2]
        .iter()
        .all(|v| v.is_finite())
    {
        coeffs
    } else {
        BiquadCoeffs::identity()
    }
}

/// Peaking filter coefficients (RBJ cookbook, bandwidth in octaves).
///
/// A flat band returns exact identity coefficients so an all-zero curve is
/// bit-transparent.
pub fn biquad_peaking(fs_hz: f32, freq_hz: f32, gain_db: f32) -> BiquadCoeffs {
    if !fs_hz.is_finite() || fs_hz <= 0.0 || !gain_db.is_finite() || gain_db == 0.0 {
        return BiquadCoeffs::identity();
    }

    let freq_hz = clamp_freq_hz(fs_hz, freq_hz);
    let a = 10.0_f32.powf(gain_db / 40.0);
    let w0 = 2.0 * PI * freq_hz / fs_hz;
    let cos_w0 = w0.cos();
    let sin_w0 = w0.sin();
    let alpha = sin_w0 * (LN_2 / 2.0 * EQ_BANDWIDTH_OCTAVES * w0 / sin_w0).sinh();

    let b0 = 1.0 + alpha * a;
    let b1 = -2.0 * cos_w0;
    let b2 = 1.0 - alpha * a;
    let a0 = 1.0 + alpha / a;
    let a1 = -2.0 * cos_w0;
    let a2 = 1.0 - alpha / a;

    normalize_biquad(b0, b1, b2, a0, a1, a2)
}

/// Clamp a requested band gain into the supported range.
///
/// Returns `None` for non-finite input.
pub fn clamp_gain_db(gain_db: f32) -> Option<f32> {
    gain_db
        .is_finite()
        .then(|| gain_db.clamp(EQ_GAIN_DB_MIN, EQ_GAIN_DB_MAX))
}

/// One equalizer band as seen from the control side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqBand {
    pub index: usize,
    pub frequency_hz: f32,
    pub gain_db: f32,
}

/// Control-side gain curve with a fixed number of bands.
#[derive(Debug, Clone)]
pub struct EqCurve {
    bands: Vec<EqBand>,
}

impl EqCurve {
    /// Creates a flat curve with one band per center frequency.
    pub fn new(frequencies_hz: &[f32]) -> Self {
        let bands = frequencies_hz
            .iter()
            .enumerate()
            .map(|(index, &frequency_hz)| EqBand {
                index,
                frequency_hz,
                gain_db: 0.0,
            })
            .collect();
        Self { bands }
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn bands(&self) -> &[EqBand] {
        &self.bands
    }

    pub fn gain(&self, band: usize) -> Option<f32> {
        self.bands.get(band).map(|b| b.gain_db)
    }

    pub fn gains(&self) -> Vec<f32> {
        self.bands.iter().map(|b| b.gain_db).collect()
    }

    /// Overwrites one band's gain.
    ///
    /// Returns the gain actually stored, or `None` when the request was
    /// ignored (band out of range or non-finite gain).
    pub fn set_gain(&mut self, band: usize, gain_db: f32) -> Option<f32> {
        let gain_db = clamp_gain_db(gain_db)?;
        let slot = self.bands.get_mut(band)?;
        slot.gain_db = gain_db;
        Some(gain_db)
    }

    /// Replaces every band gain.
    ///
    /// The whole call is a no-op unless `gains` has exactly one entry per band
    /// and every entry is finite.
    pub fn init_curve(&mut self, gains: &[f32]) -> bool {
        if gains.len() != self.bands.len() || !gains.iter().all(|g| g.is_finite()) {
            return false;
        }

        for (band, &gain_db) in self.bands.iter_mut().zip(gains) {
            band.gain_db = gain_db.clamp(EQ_GAIN_DB_MIN, EQ_GAIN_DB_MAX);
        }
        true
    }
}

/// Render-side filter bank: one peaking biquad per band, with per-channel state.
pub struct ParametricEq {
    sample_rate_hz: f32,
    frequencies_hz: Vec<f32>,
    coeffs: Vec<BiquadCoeffs>,
    /// Indexed `[channel][band]`.
    state: Vec<Vec<BiquadState>>,
}

impl ParametricEq {
    pub fn new(sample_rate_hz: u32, channels: usize, frequencies_hz: &[f32]) -> Self {
        let bands = frequencies_hz.len();
        Self {
            sample_rate_hz: sample_rate_hz as f32,
            frequencies_hz: frequencies_hz.to_vec(),
            coeffs: vec![BiquadCoeffs::identity(); bands],
            state: vec![vec![BiquadState::default(); bands]; channels],
        }
    }

    pub fn num_bands(&self) -> usize {
        self.coeffs.len()
    }

    /// Recomputes one band's coefficients; out-of-range bands are ignored.
    pub fn set_gain(&mut self, band: usize, gain_db: f32) {
        let Some(gain_db) = clamp_gain_db(gain_db) else {
            return;
        };
        let Some(&freq_hz) = self.frequencies_hz.get(band) else {
            return;
        };

        self.coeffs[band] = biquad_peaking(self.sample_rate_hz, freq_hz, gain_db);
    }

    pub fn coeffs(&self, band: usize) -> Option<BiquadCoeffs> {
        self.coeffs.get(band).copied()
    }

    /// Runs one sample of `channel` through every band in series.
    pub fn process(&mut self, channel: usize, x: f32) -> f32 {
        let Some(stages) = self.state.get_mut(channel) else {
            return x;
        };

        let mut y = x;
        for (coeffs, stage) in self.coeffs.iter().zip(stages.iter_mut()) {
            y = biquad_process(*coeffs, stage, y);
        }
        y
    }

    pub fn reset(&mut self) {
        for channel in &mut self.state {
            channel.fill(BiquadState::default());
        }
    }
}

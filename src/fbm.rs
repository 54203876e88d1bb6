//! Fractal Brownian Motion over [`value_noise`](crate::noise::value_noise).
//!
//! Each octave samples the noise at a rotated, scaled and shifted copy of
//! the previous octave's coordinate, so octaves decorrelate instead of
//! stacking on the same lattice. An optional drift moves the sampling
//! position over time, with the sign flipping on every octave so the
//! layers slide against each other.

use glam::{Mat2, Vec2};
use serde::{Deserialize, Serialize};

use crate::config::{check_finite, check_range};
use crate::error::ConfigError;
use crate::noise::value_noise;

/// Largest octave count accepted by [`FbmConfig::validate`].
pub const MAX_OCTAVES: u32 = 12;

/// Knobs of the octave accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FbmConfig {
    /// Number of noise layers. More octaves add finer detail.
    pub octaves: u32,
    /// Rotation applied between octaves, in radians.
    pub rotation_angle: f32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f32,
    /// Translation added between octaves.
    pub shift: Vec2,
    /// Weight of the first octave.
    pub initial_amplitude: f32,
    /// Amplitude multiplier between octaves.
    pub gain: f32,
    /// Per-second drift of the sampling position. Zero keeps the fractal static.
    pub drift: Vec2,
}

impl Default for FbmConfig {
    fn default() -> Self {
        Self {
            octaves: 5,
            rotation_angle: 0.5,
            lacunarity: 2.0,
            shift: Vec2::splat(100.0),
            initial_amplitude: 0.5,
            gain: 0.5,
            drift: Vec2::new(0.05, 0.03),
        }
    }
}

impl FbmConfig {
    /// Check every knob is finite and in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.octaves == 0 || self.octaves > MAX_OCTAVES {
            return Err(ConfigError::Octaves(self.octaves));
        }
        check_finite("fbm.rotation_angle", self.rotation_angle)?;
        check_range("fbm.lacunarity", self.lacunarity, 1.0, 8.0)?;
        check_finite("fbm.shift.x", self.shift.x)?;
        check_finite("fbm.shift.y", self.shift.y)?;
        check_range("fbm.initial_amplitude", self.initial_amplitude, 0.0, 1.0)?;
        check_range("fbm.gain", self.gain, 0.0, 1.0)?;
        check_finite("fbm.drift.x", self.drift.x)?;
        check_finite("fbm.drift.y", self.drift.y)?;
        Ok(())
    }
}

/// Parameters of a single octave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OctaveParams {
    /// Weight of this octave's noise.
    pub amplitude: f32,
    /// Rotation applied to the coordinate after this octave.
    pub rotation: Mat2,
    /// Scale applied to the coordinate after this octave.
    pub scale: f32,
    /// Translation applied to the coordinate after this octave.
    pub offset: Vec2,
    /// +1 or -1: direction of the time drift for this octave.
    pub drift_sign: f32,
}

/// A configured fBM accumulator.
///
/// Cheap to copy. The rotation matrix is built once from the angle.
#[derive(Debug, Clone, Copy)]
pub struct Fbm {
    octaves: u32,
    rotation: Mat2,
    lacunarity: f32,
    shift: Vec2,
    initial_amplitude: f32,
    gain: f32,
    drift: Vec2,
}

impl Fbm {
    /// Build an accumulator from an already validated config.
    pub fn new(config: &FbmConfig) -> Self {
        Self {
            octaves: config.octaves,
            rotation: Mat2::from_angle(config.rotation_angle),
            lacunarity: config.lacunarity,
            shift: config.shift,
            initial_amplitude: config.initial_amplitude,
            gain: config.gain,
            drift: config.drift,
        }
    }

    /// Number of octaves accumulated.
    #[inline]
    pub fn octaves(&self) -> u32 {
        self.octaves
    }

    /// Sample the fractal at `p` and time `t` (seconds).
    pub fn sample(&self, p: Vec2, t: f32) -> f32 {
        let mut p = p;
        let mut value = 0.0;
        let mut amplitude = self.initial_amplitude;
        let drift = self.drift * t;

        for i in 0..self.octaves {
            let sign = drift_sign(i);
            value += amplitude * value_noise(p + drift * sign);
            p = self.rotation * p * self.lacunarity + self.shift;
            amplitude *= self.gain;
        }
        value
    }

    /// The per-octave tuples, in accumulation order.
    pub fn octave_params(&self) -> Vec<OctaveParams> {
        let mut amplitude = self.initial_amplitude;
        (0..self.octaves)
            .map(|i| {
                let params = OctaveParams {
                    amplitude,
                    rotation: self.rotation,
                    scale: self.lacunarity,
                    offset: self.shift,
                    drift_sign: drift_sign(i),
                };
                amplitude *= self.gain;
                params
            })
            .collect()
    }

    /// Upper bound of [`Fbm::sample`]: the sum of all octave amplitudes.
    pub fn max_value(&self) -> f32 {
        self.octave_params().iter().map(|o| o.amplitude).sum()
    }
}

impl Default for Fbm {
    fn default() -> Self {
        Self::new(&FbmConfig::default())
    }
}

#[inline]
fn drift_sign(octave: u32) -> f32 {
    if octave % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_octave_is_weighted_base_noise() {
        let fbm = Fbm::new(&FbmConfig {
            octaves: 1,
            ..Default::default()
        });
        for i in 0..50 {
            let p = Vec2::new(i as f32 * 0.31, i as f32 * -0.17);
            assert_eq!(fbm.sample(p, 0.0), 0.5 * value_noise(p));
        }
    }

    #[test]
    fn test_single_octave_unit_amplitude_is_base_noise() {
        let fbm = Fbm::new(&FbmConfig {
            octaves: 1,
            initial_amplitude: 1.0,
            drift: Vec2::ZERO,
            ..Default::default()
        });
        let p = Vec2::new(4.2, 1.7);
        assert_eq!(fbm.sample(p, 12.0), value_noise(p));
    }

    #[test]
    fn test_amplitudes_halve() {
        let fbm = Fbm::default();
        let params = fbm.octave_params();
        assert_eq!(params.len(), 5);
        assert_eq!(params[0].amplitude, 0.5);
        for pair in params.windows(2) {
            assert!((pair[1].amplitude - pair[0].amplitude * 0.5).abs() < 1e-7);
        }
    }

    #[test]
    fn test_drift_sign_alternates() {
        let signs: Vec<f32> = Fbm::default()
            .octave_params()
            .iter()
            .map(|o| o.drift_sign)
            .collect();
        assert_eq!(signs, vec![1.0, -1.0, 1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_sample_bounded_by_amplitude_sum() {
        let fbm = Fbm::new(&FbmConfig {
            octaves: 6,
            ..Default::default()
        });
        let max = fbm.max_value();
        assert!((max - (1.0 - 0.5f32.powi(6))).abs() < 1e-6);
        for i in 0..500 {
            let v = fbm.sample(Vec2::new(i as f32 * 0.13, i as f32 * 0.07), i as f32 * 0.1);
            assert!(v >= 0.0 && v <= max + 1e-6);
        }
    }

    #[test]
    fn test_zero_drift_is_static() {
        let fbm = Fbm::new(&FbmConfig {
            drift: Vec2::ZERO,
            ..Default::default()
        });
        let p = Vec2::new(0.3, 0.9);
        assert_eq!(fbm.sample(p, 0.0), fbm.sample(p, 50.0));
    }

    #[test]
    fn test_drift_animates() {
        let fbm = Fbm::default();
        let p = Vec2::new(0.3, 0.9);
        assert_ne!(fbm.sample(p, 0.0), fbm.sample(p, 7.5));
    }

    #[test]
    fn test_validate_rejects_bad_octaves() {
        let zero = FbmConfig {
            octaves: 0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(ConfigError::Octaves(0))));

        let many = FbmConfig {
            octaves: MAX_OCTAVES + 1,
            ..Default::default()
        };
        assert!(many.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let config = FbmConfig {
            rotation_angle: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NotFinite { .. })));
    }
}

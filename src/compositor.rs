//! Domain-warped compositor.
//!
//! Two layers of fBM displace the coordinate fed to a third:
//!
//! ```text
//! q = (fbm(st + q_time·t),                 fbm(st + q_offset))
//! r = (fbm(st + q + r_offset_x + r_time.x·t), fbm(st + q + r_offset_y + r_time.y·t))
//! f = fbm(st + r)
//! ```
//!
//! The resulting [`WarpSample`] is colorized by a [`Palette`] and shaped by
//! a [`ToneConfig`]. Sampling and colorization are separate steps so a
//! palette swap never touches the scalar computation.

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::config::{check_finite, check_range};
use crate::error::ConfigError;
use crate::fbm::Fbm;
use crate::palette::Palette;

/// Offsets and time scales of the two warp layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpConfig {
    /// Time scale of `q.x`.
    pub q_time: f32,
    /// Fixed offset of `q.y`.
    pub q_offset: Vec2,
    /// Fixed offset of `r.x`.
    pub r_offset_x: Vec2,
    /// Fixed offset of `r.y`.
    pub r_offset_y: Vec2,
    /// Time scales of `r.x` and `r.y`.
    pub r_time: Vec2,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            q_time: 0.1,
            q_offset: Vec2::ONE,
            r_offset_x: Vec2::new(1.7, 9.2),
            r_offset_y: Vec2::new(8.3, 2.8),
            r_time: Vec2::new(0.15, 0.126),
        }
    }
}

impl WarpConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("warp.q_time", self.q_time, -10.0, 10.0)?;
        check_finite("warp.q_offset.x", self.q_offset.x)?;
        check_finite("warp.q_offset.y", self.q_offset.y)?;
        check_finite("warp.r_offset_x.x", self.r_offset_x.x)?;
        check_finite("warp.r_offset_x.y", self.r_offset_x.y)?;
        check_finite("warp.r_offset_y.x", self.r_offset_y.x)?;
        check_finite("warp.r_offset_y.y", self.r_offset_y.y)?;
        check_range("warp.r_time.x", self.r_time.x, -10.0, 10.0)?;
        check_range("warp.r_time.y", self.r_time.y, -10.0, 10.0)?;
        Ok(())
    }
}

/// Contrast curve applied after colorization.
///
/// `color · (cubic·f³ + quadratic·f² + linear·f)`, then raised to
/// `exponent`, then saturated. The default curve is odd (`quadratic` is
/// 0), so it keeps the sign of `f`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    pub cubic: f32,
    pub quadratic: f32,
    pub linear: f32,
    pub exponent: f32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            cubic: 1.0,
            quadratic: 0.0,
            linear: 0.5,
            exponent: 1.0,
        }
    }
}

impl ToneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_finite("tone.cubic", self.cubic)?;
        check_finite("tone.quadratic", self.quadratic)?;
        check_finite("tone.linear", self.linear)?;
        check_range("tone.exponent", self.exponent, 0.05, 8.0)?;
        Ok(())
    }

    /// Contrast multiplier for a given `f`.
    #[inline]
    pub fn intensity(&self, f: f32) -> f32 {
        ((self.cubic * f + self.quadratic) * f + self.linear) * f
    }

    /// Apply the curve to `color` and saturate into [0, 1].
    pub fn apply(&self, color: Vec3, f: f32) -> Vec3 {
        let toned = (color * self.intensity(f)).max(Vec3::ZERO);
        let curved = if self.exponent == 1.0 {
            toned
        } else {
            toned.powf(self.exponent)
        };
        saturate(curved)
    }
}

/// Clamp each channel into [0, 1], mapping NaN to 0.
#[inline]
pub fn saturate(color: Vec3) -> Vec3 {
    Vec3::from_array(color.to_array().map(|c| if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) }))
}

/// Intermediate values of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpSample {
    /// First warp layer.
    pub q: Vec2,
    /// Second warp layer.
    pub r: Vec2,
    /// Final scalar field value.
    pub f: f32,
}

/// The warp stack: an fBM, the warp layout and the tone curve.
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    fbm: Fbm,
    warp: WarpConfig,
    tone: ToneConfig,
}

impl Compositor {
    pub fn new(fbm: Fbm, warp: WarpConfig, tone: ToneConfig) -> Self {
        Self { fbm, warp, tone }
    }

    #[inline]
    pub fn fbm(&self) -> &Fbm {
        &self.fbm
    }

    #[inline]
    pub fn tone(&self) -> &ToneConfig {
        &self.tone
    }

    /// Evaluate the scalar field at field-space coordinate `st`, time `t`.
    pub fn sample(&self, st: Vec2, t: f32) -> WarpSample {
        let w = &self.warp;
        let fbm = &self.fbm;

        let q = Vec2::new(
            fbm.sample(st + Vec2::splat(w.q_time * t), t),
            fbm.sample(st + w.q_offset, t),
        );

        let base = st + q;
        let r = Vec2::new(
            fbm.sample(base + w.r_offset_x + Vec2::splat(w.r_time.x * t), t),
            fbm.sample(base + w.r_offset_y + Vec2::splat(w.r_time.y * t), t),
        );

        let f = fbm.sample(st + r, t);
        WarpSample { q, r, f }
    }

    /// Colorize and tone a sample. Alpha is always 1.
    pub fn shade(&self, sample: &WarpSample, palette: &Palette) -> Vec4 {
        let color = palette.colorize(sample);
        self.tone.apply(color, sample.f).extend(1.0)
    }
}

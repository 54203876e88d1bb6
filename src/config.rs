//! Field configuration.
//!
//! Everything that shapes the field is fixed here before the first frame:
//! octave layout, warp offsets and time scales, palette, tone curve and
//! framing. A [`FieldConfig`] is built with the `with_*` methods or loaded
//! from JSON, then validated once by [`Field::new`](crate::Field::new).
//!
//! ```ignore
//! let config = FieldConfig::default()
//!     .with_octaves(6)
//!     .with_palette(PalettePreset::Glacier.palette())
//!     .with_speed(0.5);
//! ```
//!
//! Missing keys in a JSON file fall back to their defaults, so a file only
//! needs to name what it changes:
//!
//! ```json
//! { "fbm": { "octaves": 6 }, "palette": { "base_gain": 3.0 }, "speed": 0.25 }
//! ```

use std::path::Path;

use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::compositor::{ToneConfig, WarpConfig};
use crate::error::ConfigError;
use crate::fbm::FbmConfig;
use crate::frame::Framing;
use crate::palette::{Palette, PalettePreset};

/// Complete description of a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub fbm: FbmConfig,
    pub warp: WarpConfig,
    pub palette: Palette,
    pub tone: ToneConfig,
    pub framing: Framing,
    /// Global multiplier on elapsed time. `0.0` freezes the field.
    pub speed: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            fbm: FbmConfig::default(),
            warp: WarpConfig::default(),
            palette: Palette::default(),
            tone: ToneConfig::default(),
            framing: Framing::default(),
            speed: 1.0,
        }
    }
}

impl FieldConfig {
    /// Check every knob.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fbm.validate()?;
        self.warp.validate()?;
        self.palette.validate()?;
        self.tone.validate()?;
        self.framing.validate()?;
        check_range("speed", self.speed, 0.0, 100.0)?;
        Ok(())
    }

    /// Parse a config from JSON text and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file and validate it.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("loading field config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the octave count.
    pub fn with_octaves(mut self, octaves: u32) -> Self {
        self.fbm.octaves = octaves;
        self
    }

    /// Set the rotation applied between octaves, in radians.
    pub fn with_rotation_angle(mut self, radians: f32) -> Self {
        self.fbm.rotation_angle = radians;
        self
    }

    /// Set the per-octave time drift.
    pub fn with_drift(mut self, drift: Vec2) -> Self {
        self.fbm.drift = drift;
        self
    }

    /// Replace the warp layout.
    pub fn with_warp(mut self, warp: WarpConfig) -> Self {
        self.warp = warp;
        self
    }

    /// Replace the palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Replace the palette with a preset.
    pub fn with_preset(self, preset: PalettePreset) -> Self {
        self.with_palette(preset.palette())
    }

    /// Replace the tone curve.
    pub fn with_tone(mut self, tone: ToneConfig) -> Self {
        self.tone = tone;
        self
    }

    /// Set the zoom and offset from normalized screen space to field space.
    pub fn with_framing(mut self, zoom: f32, offset: Vec2) -> Self {
        self.framing = Framing { zoom, offset };
        self
    }

    /// Set the global time multiplier.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Remove every source of animation: speed, drift and warp time scales.
    pub fn frozen(mut self) -> Self {
        self.speed = 0.0;
        self.fbm.drift = Vec2::ZERO;
        self.warp.q_time = 0.0;
        self.warp.r_time = Vec2::ZERO;
        self
    }
}

pub(crate) fn check_finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { name, value })
    }
}

pub(crate) fn check_range(
    name: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), ConfigError> {
    check_finite(name, value)?;
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::WeightClamp;

    #[test]
    fn test_default_validates() {
        FieldConfig::default().validate().unwrap();
    }

    #[test]
    fn test_builder() {
        let config = FieldConfig::default()
            .with_octaves(6)
            .with_rotation_angle(0.4)
            .with_preset(PalettePreset::Abyss)
            .with_framing(2.0, Vec2::new(0.5, -0.5))
            .with_speed(0.25);

        assert_eq!(config.fbm.octaves, 6);
        assert_eq!(config.fbm.rotation_angle, 0.4);
        assert_eq!(config.palette, PalettePreset::Abyss.palette());
        assert_eq!(config.framing.zoom, 2.0);
        assert_eq!(config.speed, 0.25);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            FieldConfig::from_json_str(r#"{ "fbm": { "octaves": 6 }, "speed": 0.5 }"#).unwrap();
        assert_eq!(config.fbm.octaves, 6);
        assert_eq!(config.fbm.rotation_angle, FbmConfig::default().rotation_angle);
        assert_eq!(config.speed, 0.5);
        assert_eq!(config.palette, Palette::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = FieldConfig::default().with_preset(PalettePreset::Dune);
        let json = config.to_json().unwrap();
        assert_eq!(FieldConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_json_rejects_bad_clamp() {
        let err = FieldConfig::from_json_str(
            r#"{ "palette": { "neon_clamp": { "min": 2.0, "max": 2.0 } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::WeightClamp { name: "palette.neon_clamp", .. }));
    }

    #[test]
    fn test_json_syntax_error() {
        assert!(matches!(
            FieldConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            FieldConfig::from_json_file("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_negative_speed_rejected() {
        assert!(FieldConfig::default().with_speed(-1.0).validate().is_err());
    }

    #[test]
    fn test_frozen_validates() {
        let config = FieldConfig::default().frozen();
        config.validate().unwrap();
        assert_eq!(config.speed, 0.0);
        assert_eq!(config.palette.base_clamp, WeightClamp::UNIT);
    }
}

//! The assembled field: a validated config ready to evaluate.

use glam::{Vec2, Vec4};

use crate::compositor::{Compositor, WarpSample};
use crate::config::FieldConfig;
use crate::error::ConfigError;
use crate::fbm::Fbm;
use crate::frame::{normalize, FrameContext, Resolution};
use crate::palette::Palette;

/// A validated, immutable field.
///
/// `Field` is `Copy` and holds no interior state, so it can be shared
/// freely across threads. Every evaluation is a pure function of its
/// inputs.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    config: FieldConfig,
    compositor: Compositor,
}

impl Field {
    /// Validate `config` and build the field.
    pub fn new(config: FieldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let compositor = Compositor::new(Fbm::new(&config.fbm), config.warp, config.tone);
        Ok(Self { config, compositor })
    }

    #[inline]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.config.palette
    }

    #[inline]
    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// The same field with a different palette. The scalar field is untouched.
    pub fn with_palette(&self, palette: Palette) -> Result<Self, ConfigError> {
        palette.validate()?;
        let mut field = *self;
        field.config.palette = palette;
        Ok(field)
    }

    /// Map a pixel coordinate into field space.
    #[inline]
    pub fn field_coordinate(&self, pixel: Vec2, resolution: Resolution) -> Vec2 {
        self.config.framing.apply(normalize(pixel, resolution))
    }

    /// Scalar sample at a pixel, before colorization.
    pub fn sample(&self, pixel: Vec2, elapsed: f32, resolution: Resolution) -> WarpSample {
        let st = self.field_coordinate(pixel, resolution);
        self.compositor.sample(st, self.scaled_time(elapsed))
    }

    /// Color at a pixel coordinate. Opaque RGBA, each channel in [0, 1].
    pub fn evaluate(&self, pixel: Vec2, elapsed: f32, resolution: Resolution) -> Vec4 {
        let sample = self.sample(pixel, elapsed, resolution);
        self.compositor.shade(&sample, &self.config.palette)
    }

    /// Color at a pixel for a frame context.
    #[inline]
    pub fn evaluate_in(&self, pixel: Vec2, frame: &FrameContext) -> Vec4 {
        self.evaluate(pixel, frame.elapsed, frame.resolution)
    }

    /// Elapsed seconds scaled by `speed`. Non-finite input counts as 0.
    #[inline]
    fn scaled_time(&self, elapsed: f32) -> f32 {
        if elapsed.is_finite() {
            elapsed * self.config.speed
        } else {
            0.0
        }
    }
}

impl Default for Field {
    fn default() -> Self {
        let config = FieldConfig::default();
        let compositor = Compositor::new(Fbm::new(&config.fbm), config.warp, config.tone);
        Self { config, compositor }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{PalettePreset, WeightClamp};

    #[test]
    fn test_new_rejects_invalid() {
        let mut config = FieldConfig::default();
        config.palette.base_clamp = WeightClamp::new(2.0, 2.0);
        assert!(Field::new(config).is_err());
    }

    #[test]
    fn test_with_palette_keeps_sample() {
        let field = Field::default();
        let ember = field.with_palette(PalettePreset::Ember.palette()).unwrap();
        let res = Resolution::new(64, 48);
        let pixel = Vec2::new(10.0, 20.0);
        assert_eq!(field.sample(pixel, 2.0, res), ember.sample(pixel, 2.0, res));
    }

    #[test]
    fn test_non_finite_time_is_finite_output() {
        let field = Field::default();
        let color = field.evaluate(Vec2::new(1.0, 1.0), f32::INFINITY, Resolution::new(8, 8));
        assert!(color.is_finite());
    }

    #[test]
    fn test_default_matches_validated_default() {
        let a = Field::default();
        let b = Field::new(FieldConfig::default()).unwrap();
        let res = Resolution::new(32, 32);
        let p = Vec2::new(7.0, 9.0);
        assert_eq!(a.evaluate(p, 1.5, res), b.evaluate(p, 1.5, res));
    }
}

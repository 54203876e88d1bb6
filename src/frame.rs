//! Frame context and screen-space mapping.
//!
//! A frame driver hands the field two things per frame: elapsed seconds and
//! the viewport size. Pixel coordinates use a top-left origin, the same as
//! WGSL's `@builtin(position)`, so CPU and GPU output line up.

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::config::{check_finite, check_range};
use crate::error::ConfigError;
use crate::field::Field;

/// Viewport size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size as floats.
    #[inline]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// The normalization divisor: the shorter side, never below 1.
    #[inline]
    pub fn min_side(&self) -> f32 {
        (self.width.min(self.height) as f32).max(1.0)
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Per-frame inputs. Produced by the driver and dropped after the frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameContext {
    /// Seconds since the first frame.
    pub elapsed: f32,
    pub resolution: Resolution,
}

impl FrameContext {
    pub fn new(elapsed: f32, resolution: Resolution) -> Self {
        Self {
            elapsed,
            resolution,
        }
    }
}

/// Zoom and offset from normalized screen space into field space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Framing {
    pub zoom: f32,
    pub offset: Vec2,
}

impl Default for Framing {
    fn default() -> Self {
        Self {
            zoom: 3.0,
            offset: Vec2::new(1.5, 1.0),
        }
    }
}

impl Framing {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("framing.zoom", self.zoom, 1e-3, 1e3)?;
        check_finite("framing.offset.x", self.offset.x)?;
        check_finite("framing.offset.y", self.offset.y)?;
        Ok(())
    }

    /// Map a normalized coordinate into field space.
    #[inline]
    pub fn apply(&self, uv: Vec2) -> Vec2 {
        uv * self.zoom + self.offset
    }
}

/// Normalize a pixel coordinate so the shorter viewport axis spans [-1, 1].
///
/// The divisor is clamped to at least 1, so a zero-sized viewport still
/// yields finite coordinates.
#[inline]
pub fn normalize(pixel: Vec2, resolution: Resolution) -> Vec2 {
    (pixel * 2.0 - resolution.as_vec2()) / resolution.min_side()
}

/// Evaluate `field` at a pixel coordinate. Returns opaque RGBA in [0, 1].
///
/// Shorthand for [`Field::evaluate`].
#[inline]
pub fn evaluate(field: &Field, coordinate: Vec2, elapsed: f32, resolution: Resolution) -> Vec4 {
    field.evaluate(coordinate, elapsed, resolution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_center_is_origin() {
        let res = Resolution::new(800, 600);
        assert_eq!(normalize(Vec2::new(400.0, 300.0), res), Vec2::ZERO);
    }

    #[test]
    fn test_normalize_short_axis_spans_unit() {
        let res = Resolution::new(800, 600);
        assert_eq!(normalize(Vec2::new(400.0, 0.0), res).y, -1.0);
        assert_eq!(normalize(Vec2::new(400.0, 600.0), res).y, 1.0);
        // Long axis extends past 1 by the aspect ratio
        let right = normalize(Vec2::new(800.0, 300.0), res).x;
        assert!((right - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_dimension_is_finite() {
        let uv = normalize(Vec2::ZERO, Resolution::new(0, 600));
        assert!(uv.is_finite());
        assert_eq!(uv, Vec2::new(0.0, -600.0));

        let uv = normalize(Vec2::new(3.0, 4.0), Resolution::new(0, 0));
        assert!(uv.is_finite());
    }

    #[test]
    fn test_normalize_scales_with_resolution() {
        let small = normalize(Vec2::new(100.0, 50.0), Resolution::new(320, 200));
        let large = normalize(Vec2::new(200.0, 100.0), Resolution::new(640, 400));
        assert_eq!(small, large);
    }

    #[test]
    fn test_framing() {
        let framing = Framing {
            zoom: 2.0,
            offset: Vec2::new(1.0, -1.0),
        };
        assert_eq!(framing.apply(Vec2::new(0.5, 0.5)), Vec2::new(2.0, 0.0));
        assert!(Framing {
            zoom: 0.0,
            ..Default::default()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_pixel_count() {
        assert_eq!(Resolution::new(4, 3).pixel_count(), 12);
        assert_eq!(Resolution::default().pixel_count(), 0);
    }
}

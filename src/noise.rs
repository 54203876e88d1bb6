//! Hash-based scalar field and smooth value noise.
//!
//! These are the leaves of the field: a deterministic pseudo-random
//! value per 2D coordinate, and a bilinear lattice interpolation of it.
//! The WGSL emitted by [`crate::wgsl`] computes the same functions.

use glam::Vec2;

/// Fixed direction the coordinate is projected onto before hashing.
pub const HASH_DIRECTION: Vec2 = Vec2::new(12.9898, 78.233);

/// Scale applied to the sine before taking the fractional part.
pub const HASH_SCALE: f32 = 43758.5453;

/// Fractional part with GLSL semantics: `x - floor(x)`, always in [0, 1].
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Pseudo-random value in [0, 1] for a 2D coordinate.
///
/// `fract(sin(dot(p, HASH_DIRECTION)) * HASH_SCALE)`. Rounding can land
/// exactly on 1.0 for tiny negative products, so the result is clamped.
#[inline]
pub fn hash21(p: Vec2) -> f32 {
    fract(p.dot(HASH_DIRECTION).sin() * HASH_SCALE).clamp(0.0, 1.0)
}

/// Smoothstep blending polynomial: 3t² - 2t³.
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// 2D value noise with smoothstep interpolation. Returns a value in [0, 1].
pub fn value_noise(p: Vec2) -> f32 {
    let cell = p.floor();
    let offset = p - cell;

    // Sample the 4 lattice corners
    let a = hash21(cell);
    let b = hash21(cell + Vec2::X);
    let c = hash21(cell + Vec2::Y);
    let d = hash21(cell + Vec2::ONE);

    let u = smoothstep(offset.x);
    let v = smoothstep(offset.y);

    let bottom = a + (b - a) * u;
    let top = c + (d - c) * u;
    bottom + (top - bottom) * v
}

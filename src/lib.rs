//! # Warpfield
//!
//! Animated, domain-warped fractal noise for procedural backgrounds.
//!
//! The core is a pure function: a pixel coordinate, an elapsed time and a
//! resolution go in, an opaque RGBA color comes out. The same field runs on
//! the CPU (PNG stills and sequences, rendered in parallel) or on the GPU
//! (a generated WGSL fragment shader drawn into a window).
//!
//! ## Quick Start
//!
//! ```ignore
//! use warpfield::prelude::*;
//!
//! let field = Field::new(
//!     FieldConfig::default()
//!         .with_preset(PalettePreset::Ember)
//!         .with_octaves(6),
//! )?;
//!
//! let image = render_frame(&field, &FrameContext::new(2.5, Resolution::new(1280, 720)))?;
//! image.save("ember.png")?;
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module |
//! |-------|--------|
//! | Hash and value noise | [`noise`] |
//! | Octave accumulation | [`fbm`] |
//! | Warp stack, palette, tone | [`compositor`], [`palette`] |
//! | Pixel normalization and framing | [`frame`] |
//! | Full evaluation | [`field`] |
//! | CPU images | [`render`] |
//! | GPU shader and window | [`wgsl`], [`gpu`], [`window`] |
//!
//! ## Looks
//!
//! Palettes come from [`PalettePreset`] or can be built by hand. A
//! [`Biome`] bundles a preset with a light level; a parcel's biome is
//! resolved once from its mesh names with [`ModelLook::derive`].

pub mod biome;
pub mod compositor;
pub mod config;
pub mod error;
pub mod fbm;
pub mod field;
pub mod frame;
pub mod gpu;
pub mod noise;
pub mod palette;
pub mod render;
pub mod service;
pub mod time;
pub mod wgsl;
pub mod window;

pub use biome::{Biome, BiomeProfile, ModelLook};
pub use compositor::{ToneConfig, WarpConfig, WarpSample};
pub use config::FieldConfig;
pub use error::{ConfigError, GpuError, RenderError, WindowError};
pub use fbm::FbmConfig;
pub use field::Field;
pub use frame::{evaluate, FrameContext, Framing, Resolution};
pub use glam::{Vec2, Vec3, Vec4};
pub use palette::{Palette, PalettePreset, WeightClamp};
pub use render::{render_frame, render_sequence, SequenceConfig};
pub use time::FrameClock;
pub use wgsl::fragment_shader;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use warpfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::biome::{Biome, ModelLook};
    pub use crate::config::FieldConfig;
    pub use crate::field::Field;
    pub use crate::frame::{FrameContext, Resolution};
    pub use crate::palette::{Palette, PalettePreset};
    pub use crate::render::{render_frame, save_frame};
    pub use crate::time::FrameClock;
    pub use crate::{Vec2, Vec3, Vec4};
}

//! Color stops and the nested mix that turns a warp sample into a color.
//!
//! A palette is four named stops plus the clamp range of each mix weight.
//! Palettes are swapped wholesale; nothing in here feeds back into the
//! scalar field.
//!
//! ```ignore
//! let field = Field::new(
//!     FieldConfig::default().with_palette(PalettePreset::Ember.palette()),
//! )?;
//! ```

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::compositor::WarpSample;
use crate::config::check_finite;
use crate::error::ConfigError;

/// Inclusive clamp range for a mix weight.
///
/// Both bounds must lie inside [0, 1]. A degenerate range such as
/// `[0.4, 0.4]` pins the weight to a constant; that is allowed, but it is
/// an explicit choice here rather than an accident of the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightClamp {
    pub min: f32,
    pub max: f32,
}

impl WeightClamp {
    /// The full [0, 1] range.
    pub const UNIT: WeightClamp = WeightClamp { min: 0.0, max: 1.0 };

    /// Create a clamp range. Call [`WeightClamp::validate`] before use.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp `w` into the range. NaN maps to `min`.
    #[inline]
    pub fn apply(&self, w: f32) -> f32 {
        // max/min instead of clamp: never panics on unvalidated bounds
        w.max(self.min).min(self.max)
    }

    /// Check `0 <= min <= max <= 1`.
    pub fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        let ok = self.min.is_finite()
            && self.max.is_finite()
            && 0.0 <= self.min
            && self.min <= self.max
            && self.max <= 1.0;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::WeightClamp {
                name,
                min: self.min,
                max: self.max,
            })
        }
    }
}

impl Default for WeightClamp {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Four color stops and the weights that blend them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Starting color, shown where the field is faint.
    pub void: Vec3,
    /// Mixed in by `f² · base_gain`.
    pub base: Vec3,
    /// Mixed in by the length of the first warp layer.
    pub neon: Vec3,
    /// Mixed in by the magnitude of the second warp layer's x component.
    pub highlight: Vec3,
    /// Multiplier on `f²` before clamping the base weight.
    pub base_gain: f32,
    pub base_clamp: WeightClamp,
    pub neon_clamp: WeightClamp,
    pub highlight_clamp: WeightClamp,
}

impl Default for Palette {
    fn default() -> Self {
        PalettePreset::default().palette()
    }
}

impl Palette {
    fn from_stops(void: Vec3, base: Vec3, neon: Vec3, highlight: Vec3) -> Self {
        Self {
            void,
            base,
            neon,
            highlight,
            base_gain: 4.0,
            base_clamp: WeightClamp::UNIT,
            neon_clamp: WeightClamp::UNIT,
            highlight_clamp: WeightClamp::UNIT,
        }
    }

    /// The stops in mix order.
    pub fn stops(&self) -> [Vec3; 4] {
        [self.void, self.base, self.neon, self.highlight]
    }

    /// Validate stops and weight clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, stop) in [
            ("palette.void", self.void),
            ("palette.base", self.base),
            ("palette.neon", self.neon),
            ("palette.highlight", self.highlight),
        ] {
            for channel in stop.to_array() {
                if !channel.is_finite() || !(0.0..=1.0).contains(&channel) {
                    return Err(ConfigError::OutOfRange {
                        name,
                        value: channel,
                        min: 0.0,
                        max: 1.0,
                    });
                }
            }
        }
        check_finite("palette.base_gain", self.base_gain)?;
        self.base_clamp.validate("palette.base_clamp")?;
        self.neon_clamp.validate("palette.neon_clamp")?;
        self.highlight_clamp.validate("palette.highlight_clamp")?;
        Ok(())
    }

    /// Blend weights for a sample, each already clamped.
    ///
    /// Returns `(base, neon, highlight)`.
    pub fn weights(&self, sample: &WarpSample) -> (f32, f32, f32) {
        let f = sample.f;
        (
            self.base_clamp.apply(f * f * self.base_gain),
            self.neon_clamp.apply(sample.q.length()),
            self.highlight_clamp.apply(sample.r.x.abs()),
        )
    }

    /// Map a warp sample to an untoned color.
    pub fn colorize(&self, sample: &WarpSample) -> Vec3 {
        let (base_w, neon_w, highlight_w) = self.weights(sample);
        let color = self.void.lerp(self.base, base_w);
        let color = color.lerp(self.neon, neon_w);
        color.lerp(self.highlight, highlight_w)
    }
}

/// Shipped palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PalettePreset {
    /// Teal and cream over navy, the original look.
    #[default]
    Nebula,
    /// Deep violet void with magenta and cyan.
    Neon,
    /// Black through red, orange and gold.
    Ember,
    /// Ice blues and white.
    Glacier,
    /// Mossy greens with a sunlit highlight.
    Verdant,
    /// Sand, ochre and dusk.
    Dune,
    /// Ocean blues and teals.
    Abyss,
    /// Pale lilac and prism pink.
    Crystal,
}

impl PalettePreset {
    /// All presets, in declaration order.
    pub const ALL: [PalettePreset; 8] = [
        PalettePreset::Nebula,
        PalettePreset::Neon,
        PalettePreset::Ember,
        PalettePreset::Glacier,
        PalettePreset::Verdant,
        PalettePreset::Dune,
        PalettePreset::Abyss,
        PalettePreset::Crystal,
    ];

    /// Lowercase name used by the CLI and config files.
    pub fn name(&self) -> &'static str {
        match self {
            PalettePreset::Nebula => "nebula",
            PalettePreset::Neon => "neon",
            PalettePreset::Ember => "ember",
            PalettePreset::Glacier => "glacier",
            PalettePreset::Verdant => "verdant",
            PalettePreset::Dune => "dune",
            PalettePreset::Abyss => "abyss",
            PalettePreset::Crystal => "crystal",
        }
    }

    /// Build the palette for this preset.
    pub fn palette(&self) -> Palette {
        match self {
            PalettePreset::Nebula => Palette::from_stops(
                Vec3::new(0.102, 0.620, 0.667), // Teal
                Vec3::new(0.667, 0.667, 0.498), // Cream
                Vec3::new(0.0, 0.0, 0.165),     // Navy
                Vec3::new(0.667, 1.0, 1.0),     // Pale cyan
            ),
            PalettePreset::Neon => Palette::from_stops(
                Vec3::new(0.02, 0.0, 0.08),  // Near black violet
                Vec3::new(0.45, 0.05, 0.65), // Purple
                Vec3::new(1.0, 0.1, 0.6),    // Magenta
                Vec3::new(0.1, 0.95, 1.0),   // Cyan
            ),
            PalettePreset::Ember => Palette::from_stops(
                Vec3::new(0.05, 0.0, 0.0), // Charcoal
                Vec3::new(0.6, 0.05, 0.0), // Red
                Vec3::new(1.0, 0.45, 0.0), // Orange
                Vec3::new(1.0, 0.85, 0.4), // Gold
            ),
            PalettePreset::Glacier => Palette::from_stops(
                Vec3::new(0.0, 0.08, 0.2),  // Deep blue
                Vec3::new(0.3, 0.6, 0.85),  // Blue
                Vec3::new(0.75, 0.9, 1.0),  // Ice
                Vec3::new(1.0, 1.0, 1.0),   // White
            ),
            PalettePreset::Verdant => Palette::from_stops(
                Vec3::new(0.02, 0.06, 0.02), // Forest floor
                Vec3::new(0.15, 0.4, 0.1),   // Moss
                Vec3::new(0.35, 0.75, 0.25), // Leaf
                Vec3::new(0.9, 0.95, 0.5),   // Sunlight
            ),
            PalettePreset::Dune => Palette::from_stops(
                Vec3::new(0.12, 0.06, 0.1), // Dusk
                Vec3::new(0.75, 0.5, 0.25), // Ochre
                Vec3::new(0.95, 0.8, 0.55), // Sand
                Vec3::new(1.0, 0.55, 0.35), // Sunset
            ),
            PalettePreset::Abyss => Palette::from_stops(
                Vec3::new(0.0, 0.02, 0.08), // Trench
                Vec3::new(0.0, 0.2, 0.4),   // Dark blue
                Vec3::new(0.0, 0.55, 0.6),  // Teal
                Vec3::new(0.5, 0.95, 0.9),  // Foam
            ),
            PalettePreset::Crystal => Palette::from_stops(
                Vec3::new(0.08, 0.05, 0.15), // Shadow
                Vec3::new(0.55, 0.45, 0.8),  // Lilac
                Vec3::new(0.95, 0.5, 0.85),  // Prism pink
                Vec3::new(0.9, 0.95, 1.0),   // Facet white
            ),
        }
    }
}

impl fmt::Display for PalettePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PalettePreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        PalettePreset::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .ok_or_else(|| ConfigError::UnknownPalette(s.to_string()))
    }
}

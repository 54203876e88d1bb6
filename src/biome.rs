//! Land biomes and the look each one selects.
//!
//! A parcel's biome is resolved once, when its model loads, from the names
//! of the model's meshes. From then on the typed [`Biome`] travels with the
//! mesh and its [`BiomeProfile`] is a table lookup; nothing re-parses
//! names per frame.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::FieldConfig;
use crate::error::ConfigError;
use crate::palette::PalettePreset;

/// Category of a land parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    Volcanic,
    Arctic,
    Desert,
    Forest,
    Ocean,
    Crystal,
    Neon,
}

impl Biome {
    pub const ALL: [Biome; 7] = [
        Biome::Volcanic,
        Biome::Arctic,
        Biome::Desert,
        Biome::Forest,
        Biome::Ocean,
        Biome::Crystal,
        Biome::Neon,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Biome::Volcanic => "volcanic",
            Biome::Arctic => "arctic",
            Biome::Desert => "desert",
            Biome::Forest => "forest",
            Biome::Ocean => "ocean",
            Biome::Crystal => "crystal",
            Biome::Neon => "neon",
        }
    }

    /// Words that identify this biome inside a mesh name. A plural `s`
    /// is also accepted.
    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Biome::Volcanic => &["volcano", "volcanic", "lava", "magma", "ember"],
            Biome::Arctic => &["arctic", "snow", "ice", "tundra", "glacier"],
            Biome::Desert => &["desert", "sand", "dune"],
            Biome::Forest => &["forest", "jungle", "grass", "tree"],
            Biome::Ocean => &["ocean", "water", "sea", "reef"],
            Biome::Crystal => &["crystal", "gem", "quartz"],
            Biome::Neon => &["neon", "cyber", "synth"],
        }
    }

    fn matches(&self, word: &str) -> bool {
        self.keywords()
            .iter()
            .any(|k| word == *k || word.strip_suffix('s') == Some(*k))
    }

    /// Resolve a biome from a mesh's display name, case-insensitively.
    ///
    /// The name is split into words (see [`name_words`]) and a keyword
    /// must match a whole word, so `Service_Pipe` is not arctic.
    /// Call this once at model load and keep the result.
    pub fn resolve(mesh_name: &str) -> Option<Biome> {
        let words = name_words(mesh_name);
        Biome::ALL
            .into_iter()
            .find(|b| words.iter().any(|w| b.matches(w)))
    }

    /// Look parameters for this biome.
    pub fn profile(&self) -> BiomeProfile {
        let (preset, emissive_intensity, light_intensity) = match self {
            Biome::Volcanic => (PalettePreset::Ember, 2.2, 1.2),
            Biome::Arctic => (PalettePreset::Glacier, 1.0, 1.1),
            Biome::Desert => (PalettePreset::Dune, 1.0, 1.3),
            Biome::Forest => (PalettePreset::Verdant, 1.0, 0.9),
            Biome::Ocean => (PalettePreset::Abyss, 1.5, 0.9),
            Biome::Crystal => (PalettePreset::Crystal, 1.5, 1.0),
            Biome::Neon => (PalettePreset::Neon, 2.2, 1.0),
        };
        BiomeProfile {
            preset,
            emissive_intensity,
            light_intensity,
        }
    }
}

/// Split a mesh name into lowercase words.
///
/// Words break on any non-alphanumeric character, on a lowercase to
/// uppercase step (`SnowCap`) and between letters and digits (`Lava02`).
pub fn name_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in name.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        if let Some(p) = prev {
            let case_step = p.is_lowercase() && c.is_uppercase();
            let digit_step = p.is_ascii_digit() != c.is_ascii_digit();
            if (case_step || digit_step) && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
        prev = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Biome {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Biome::ALL
            .into_iter()
            .find(|b| b.name() == lower)
            .ok_or_else(|| ConfigError::UnknownBiome(s.to_string()))
    }
}

/// Palette and light levels for a biome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomeProfile {
    pub preset: PalettePreset,
    /// Emissive strength of the parcel's glowing materials; scales the
    /// palette's base gain.
    pub emissive_intensity: f32,
    /// Scene light level; also scales the field's tone curve.
    pub light_intensity: f32,
}

impl Default for BiomeProfile {
    fn default() -> Self {
        Self {
            preset: PalettePreset::default(),
            emissive_intensity: 1.0,
            light_intensity: 1.0,
        }
    }
}

impl BiomeProfile {
    /// Apply this profile's palette, glow and light level to a field config.
    ///
    /// Emissive intensity scales the base stop's gain, so glowing biomes
    /// reach full base color at lower field values.
    pub fn apply(&self, config: FieldConfig) -> FieldConfig {
        let mut config = config.with_preset(self.preset);
        config.palette.base_gain *= self.emissive_intensity;
        config.tone.cubic *= self.light_intensity;
        config.tone.quadratic *= self.light_intensity;
        config.tone.linear *= self.light_intensity;
        config
    }
}

/// A mesh with its resolved biome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshLook {
    pub name: String,
    pub biome: Option<Biome>,
}

/// Immutable look of a loaded parcel model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelLook {
    pub meshes: Vec<MeshLook>,
    /// Most common biome across meshes; ties go to the first seen.
    pub dominant: Option<Biome>,
}

impl ModelLook {
    /// Resolve every mesh once and pick the dominant biome.
    pub fn derive<'a, I>(mesh_names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let meshes: Vec<MeshLook> = mesh_names
            .into_iter()
            .map(|name| MeshLook {
                name: name.to_string(),
                biome: Biome::resolve(name),
            })
            .collect();

        let mut counts: HashMap<Biome, (usize, usize)> = HashMap::new();
        for (order, biome) in meshes.iter().filter_map(|m| m.biome).enumerate() {
            counts.entry(biome).or_insert((0, order)).0 += 1;
        }
        let dominant = counts
            .into_iter()
            .max_by(|(_, (ca, oa)), (_, (cb, ob))| ca.cmp(cb).then(ob.cmp(oa)))
            .map(|(biome, _)| biome);

        Self { meshes, dominant }
    }

    /// Profile of the dominant biome, or the default look.
    pub fn profile(&self) -> BiomeProfile {
        self.dominant.map(|b| b.profile()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keywords() {
        assert_eq!(Biome::resolve("Plot_Lava_Rocks_02"), Some(Biome::Volcanic));
        assert_eq!(Biome::resolve("SnowCap"), Some(Biome::Arctic));
        assert_eq!(Biome::resolve("reef-coral"), Some(Biome::Ocean));
        assert_eq!(Biome::resolve("Base_Mesh"), None);
    }

    #[test]
    fn test_from_str() {
        for biome in Biome::ALL {
            assert_eq!(biome.name().parse::<Biome>().unwrap(), biome);
        }
        assert!(matches!("swamp".parse::<Biome>(), Err(ConfigError::UnknownBiome(_))));
    }

    #[test]
    fn test_every_profile_validates() {
        for biome in Biome::ALL {
            let config = biome.profile().apply(FieldConfig::default());
            config.validate().unwrap();
            assert_eq!(config.palette.stops(), biome.profile().preset.palette().stops());
        }
    }

    #[test]
    fn test_apply_scales_tone() {
        let profile = BiomeProfile {
            preset: PalettePreset::Dune,
            emissive_intensity: 1.0,
            light_intensity: 2.0,
        };
        let config = profile.apply(FieldConfig::default());
        assert_eq!(config.tone.linear, 1.0);
        assert_eq!(config.tone.cubic, 2.0);
        assert_eq!(config.palette.base_gain, PalettePreset::Dune.palette().base_gain);
    }

    #[test]
    fn test_emissive_scales_base_gain() {
        let profile = BiomeProfile {
            preset: PalettePreset::Ember,
            emissive_intensity: 2.5,
            light_intensity: 1.0,
        };
        let config = profile.apply(FieldConfig::default());
        let base = PalettePreset::Ember.palette().base_gain;
        assert_eq!(config.palette.base_gain, base * 2.5);
        assert_eq!(config.tone, FieldConfig::default().tone);

        let glowing = Biome::Volcanic.profile().apply(FieldConfig::default());
        let plain = Biome::Desert.profile().apply(FieldConfig::default());
        assert!(glowing.palette.base_gain > plain.palette.base_gain);
    }

    #[test]
    fn test_name_words() {
        assert_eq!(name_words("SnowCap"), ["snow", "cap"]);
        assert_eq!(name_words("Plot_Lava_Rocks_02"), ["plot", "lava", "rocks", "02"]);
        assert_eq!(name_words("reef-coral Lava02"), ["reef", "coral", "lava", "02"]);
        assert_eq!(name_words("__"), Vec::<String>::new());
    }

    #[test]
    fn test_resolve_needs_whole_words() {
        for name in ["Service_Pipe", "Price_Tag", "Street_Lamp", "Member_Badge", "Seat_Row"] {
            assert_eq!(Biome::resolve(name), None, "{} should not resolve", name);
        }
        assert_eq!(Biome::resolve("Pine_Trees"), Some(Biome::Forest));
        assert_eq!(Biome::resolve("Ice_Shelf"), Some(Biome::Arctic));
        assert_eq!(Biome::resolve("VolcanoRim"), Some(Biome::Volcanic));
        assert_eq!(Biome::resolve("GLACIER"), Some(Biome::Arctic));
    }

    #[test]
    fn test_model_look_dominant() {
        let look = ModelLook::derive(["Sand_A", "Lava_Core", "Dune_Ridge", "Base"]);
        assert_eq!(look.meshes.len(), 4);
        assert_eq!(look.meshes[3].biome, None);
        assert_eq!(look.dominant, Some(Biome::Desert));
        assert_eq!(look.profile().preset, PalettePreset::Dune);
    }

    #[test]
    fn test_model_look_tie_prefers_first() {
        let look = ModelLook::derive(["Ice_Shelf", "Lava_Pool"]);
        assert_eq!(look.dominant, Some(Biome::Arctic));
    }

    #[test]
    fn test_model_look_empty() {
        let look = ModelLook::derive(std::iter::empty::<&str>());
        assert_eq!(look.dominant, None);
        assert_eq!(look.profile(), BiomeProfile::default());
    }
}

//! Property tests for the evaluated field.
//!
//! These exercise the public API end to end: a pixel, a time and a
//! resolution go in, a color comes out. Random points come from a seeded
//! `StdRng` so failures reproduce.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use warpfield::biome::{Biome, ModelLook};
use warpfield::fbm::{Fbm, FbmConfig};
use warpfield::noise::value_noise;
use warpfield::palette::WeightClamp;
use warpfield::prelude::*;
use warpfield::ConfigError;

const SEED: u64 = 0x5eed_f1e1d;

fn rng() -> StdRng {
    StdRng::seed_from_u64(SEED)
}

fn random_pixel(rng: &mut StdRng, res: Resolution) -> Vec2 {
    Vec2::new(
        rng.gen_range(0.0..res.width as f32),
        rng.gen_range(0.0..res.height as f32),
    )
}

fn assert_opaque_unit(color: Vec4) {
    assert!(color.is_finite(), "non-finite color {:?}", color);
    for c in color.truncate().to_array() {
        assert!((0.0..=1.0).contains(&c), "channel {} out of range in {:?}", c, color);
    }
    assert_eq!(color.w, 1.0);
}

// ============================================================================
// Determinism and range
// ============================================================================

#[test]
fn test_deterministic() {
    let field = Field::default();
    let res = Resolution::new(800, 600);
    let mut rng = rng();
    for _ in 0..200 {
        let p = random_pixel(&mut rng, res);
        let t = rng.gen_range(0.0..100.0);
        assert_eq!(field.evaluate(p, t, res), field.evaluate(p, t, res));
    }

    // A rebuilt field gives the same answer
    let again = Field::new(FieldConfig::default()).unwrap();
    let p = Vec2::new(123.5, 45.5);
    assert_eq!(field.evaluate(p, 3.0, res), again.evaluate(p, 3.0, res));
}

#[test]
fn test_output_in_range() {
    let mut rng = rng();
    for preset in PalettePreset::ALL {
        let field = Field::new(FieldConfig::default().with_preset(preset)).unwrap();
        for _ in 0..100 {
            let res = Resolution::new(rng.gen_range(1..4096), rng.gen_range(1..4096));
            let p = random_pixel(&mut rng, res);
            let t = rng.gen_range(0.0..1000.0);
            assert_opaque_unit(field.evaluate(p, t, res));
        }
    }
}

#[test]
fn test_out_of_frame_pixels_stay_in_range() {
    let field = Field::default();
    let res = Resolution::new(64, 64);
    for p in [
        Vec2::new(-500.0, 20.0),
        Vec2::new(1e5, -1e5),
        Vec2::new(64.0, 64.0),
    ] {
        assert_opaque_unit(field.evaluate(p, 1.0, res));
    }
}

// ============================================================================
// Continuity
// ============================================================================

#[test]
fn test_continuous_in_space() {
    let field = Field::default();
    let res = Resolution::new(512, 512);
    let step = Vec2::new(0.001, 0.0);
    let mut rng = rng();

    let mut worst: f32 = 0.0;
    for _ in 0..500 {
        let p = random_pixel(&mut rng, res);
        let a = field.evaluate(p, 2.0, res);
        let b = field.evaluate(p + step, 2.0, res);
        worst = worst.max((a - b).abs().max_element());
    }
    assert!(worst < 0.02, "largest neighbor difference {}", worst);
}

#[test]
fn test_dense_grid_differences_are_small() {
    let field = Field::default();
    let res = Resolution::new(256, 256);
    let origin = Vec2::new(100.0, 80.0);
    let spacing = 0.0005;

    let mut previous: Option<Vec4> = None;
    for i in 0..200 {
        let p = origin + Vec2::new(i as f32 * spacing, 0.0);
        let color = field.evaluate(p, 0.5, res);
        if let Some(prev) = previous {
            let diff = (color - prev).abs().max_element();
            assert!(diff < 0.02, "jump of {} at step {}", diff, i);
        }
        previous = Some(color);
    }
}

#[test]
fn test_fbm_lipschitz_on_grid() {
    // Each octave adds amplitude * frequency * |grad value_noise| at most,
    // and |grad value_noise| <= 1.5 * sqrt(2) under any rotation
    let config = FbmConfig::default();
    let fbm = Fbm::new(&config);
    let k: f32 = fbm
        .octave_params()
        .iter()
        .enumerate()
        .map(|(i, o)| o.amplitude * config.lacunarity.powi(i as i32) * 1.5 * 2f32.sqrt())
        .sum();

    let eps = 1e-3;
    let mut worst: f32 = 0.0;
    for line in 0..24 {
        let offset = line as f32 * 0.26 - 3.0;
        for (start, step) in [
            (Vec2::new(-3.0, offset), Vec2::new(eps, 0.0)),
            (Vec2::new(offset, -3.0), Vec2::new(0.0, eps)),
        ] {
            let mut prev = fbm.sample(start, 0.0);
            for i in 1..=6000 {
                let next = fbm.sample(start + step * i as f32, 0.0);
                worst = worst.max((next - prev).abs());
                prev = next;
            }
        }
    }
    assert!(worst <= k * eps + 1e-4, "largest step {} exceeds {}", worst, k * eps);
}

// ============================================================================
// Time
// ============================================================================

#[test]
fn test_animates_over_time() {
    let field = Field::default();
    let res = Resolution::new(320, 240);
    let moved = (0..8)
        .flat_map(|y| (0..8).map(move |x| Vec2::new(x as f32 * 40.0 + 0.5, y as f32 * 30.0 + 0.5)))
        .filter(|&p| field.evaluate(p, 0.0, res) != field.evaluate(p, 10.0, res))
        .count();
    assert!(moved > 0, "no pixel changed between t=0 and t=10");
}

#[test]
fn test_frozen_field_is_static() {
    let field = Field::new(FieldConfig::default().frozen()).unwrap();
    let res = Resolution::new(320, 240);
    let mut rng = rng();
    for _ in 0..100 {
        let p = random_pixel(&mut rng, res);
        assert_eq!(field.evaluate(p, 0.0, res), field.evaluate(p, 250.0, res));
    }
}

#[test]
fn test_zero_time_scale_freezes_frames() {
    let field = Field::default();
    let res = Resolution::new(16, 16);
    let mut clock = FrameClock::fixed(1.0 / 30.0);
    clock.set_time_scale(0.0);

    let first = render_frame(&field, &clock.context(res)).unwrap();
    for _ in 0..5 {
        clock.update();
    }
    let later = render_frame(&field, &clock.context(res)).unwrap();
    assert_eq!(first, later);
}

#[test]
fn test_speed_scales_time() {
    let slow = Field::new(FieldConfig::default().with_speed(0.5)).unwrap();
    let normal = Field::default();
    let res = Resolution::new(100, 100);
    let p = Vec2::new(31.5, 62.5);
    assert_eq!(slow.evaluate(p, 8.0, res), normal.evaluate(p, 4.0, res));
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_resolution_independent() {
    let field = Field::default();
    let mut rng = rng();
    for _ in 0..100 {
        let small = Resolution::new(rng.gen_range(1..800), rng.gen_range(1..800));
        let large = Resolution::new(small.width * 2, small.height * 2);
        let p = random_pixel(&mut rng, small);
        assert_eq!(
            field.evaluate(p, 1.5, small),
            field.evaluate(p * 2.0, 1.5, large),
        );
    }
}

#[test]
fn test_center_is_shared_across_aspect_ratios() {
    let field = Field::default();
    let wide = Resolution::new(1920, 1080);
    let tall = Resolution::new(600, 900);
    assert_eq!(
        field.evaluate(Vec2::new(960.0, 540.0), 2.0, wide),
        field.evaluate(Vec2::new(300.0, 450.0), 2.0, tall),
    );
}

#[test]
fn test_zero_inputs() {
    let field = Field::default();
    assert_opaque_unit(field.evaluate(Vec2::ZERO, 0.0, Resolution::new(800, 600)));
}

#[test]
fn test_degenerate_resolution() {
    let field = Field::default();
    for res in [
        Resolution::new(0, 0),
        Resolution::new(0, 600),
        Resolution::new(1, 1),
    ] {
        assert_opaque_unit(field.evaluate(Vec2::ZERO, 1.0, res));
        assert_opaque_unit(field.evaluate(Vec2::new(0.5, 0.5), 1.0, res));
    }
}

// ============================================================================
// Octaves and palettes
// ============================================================================

#[test]
fn test_single_octave_is_value_noise() {
    let fbm = Fbm::new(&FbmConfig {
        octaves: 1,
        initial_amplitude: 1.0,
        ..FbmConfig::default()
    });
    let mut rng = rng();
    for _ in 0..100 {
        let p = Vec2::new(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0));
        assert_eq!(fbm.sample(p, 0.0), value_noise(p));
    }
}

#[test]
fn test_palette_swap_keeps_scalar_field() {
    let base = Field::default();
    let res = Resolution::new(400, 300);
    let mut rng = rng();
    for preset in PalettePreset::ALL {
        let swapped = base.with_palette(preset.palette()).unwrap();
        for _ in 0..20 {
            let p = random_pixel(&mut rng, res);
            let t = rng.gen_range(0.0..20.0);
            assert_eq!(base.sample(p, t, res), swapped.sample(p, t, res));
        }
    }
}

#[test]
fn test_weight_clamp_outside_unit_rejected() {
    for clamp in [
        WeightClamp::new(-0.1, 0.5),
        WeightClamp::new(0.2, 1.5),
        WeightClamp::new(0.8, 0.2),
    ] {
        let mut config = FieldConfig::default();
        config.palette.neon_clamp = clamp;
        assert!(matches!(
            Field::new(config),
            Err(ConfigError::WeightClamp { .. })
        ));
    }
}

// ============================================================================
// Drivers
// ============================================================================

#[test]
fn test_render_frame_is_opaque_and_sized() {
    let field = Field::new(FieldConfig::default().with_preset(PalettePreset::Glacier)).unwrap();
    let image = render_frame(&field, &FrameContext::new(4.0, Resolution::new(33, 17))).unwrap();
    assert_eq!(image.dimensions(), (33, 17));
    assert!(image.pixels().all(|p| p.0[3] == 255));
}

#[test]
fn test_shader_generates_for_every_biome() {
    for biome in Biome::ALL {
        let config = biome.profile().apply(FieldConfig::default());
        let code = warpfield::fragment_shader(&config);
        assert!(code.contains("fn fs_main"));
    }
}

#[test]
fn test_biome_resolution_is_stable() {
    let names = ["Terrain_Lava_01", "Rock_Magma", "SnowPatch", "Prop_Fence"];
    let first = ModelLook::derive(names);
    let second = ModelLook::derive(names);
    assert_eq!(first, second);
    assert_eq!(first.dominant, Some(Biome::Volcanic));
    assert_eq!(first.meshes[2].biome, Some(Biome::Arctic));
    assert_eq!(first.meshes[3].biome, None);
}

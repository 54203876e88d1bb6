//! WGSL rendition of the field for the GPU driver.
//!
//! The noise leaves are fixed text. Everything configurable is baked into
//! `const` declarations generated from a [`FieldConfig`], so the shader
//! evaluates exactly the field the CPU path does.
//!
//! # Generated module layout
//!
//! - `Uniforms { resolution: vec2<f32>, time: f32, _pad: f32 }` at group 0, binding 0
//! - configuration constants (`FBM_*`, `WARP_*`, `PALETTE_*`, `TONE_*`, `FRAMING_*`, `SPEED`)
//! - `hash21`, `value_noise`, `fbm`, `warp_sample`, `shade`
//! - `vs_main`: fullscreen triangle, no vertex buffers
//! - `fs_main`: normalizes `@builtin(position)` and shades the pixel

use glam::{Vec2, Vec3};

use crate::config::FieldConfig;
use crate::noise::{HASH_DIRECTION, HASH_SCALE};

/// Uniform block and vertex output shared by both entry points.
pub const UNIFORMS_WGSL: &str = r#"
struct Uniforms {
    resolution: vec2<f32>,
    time: f32,
    _pad: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;
"#;

/// WGSL code for the scalar field and value noise.
pub const NOISE_WGSL: &str = r#"
// Pseudo-random value in [0, 1] per coordinate
fn hash21(p: vec2<f32>) -> f32 {
    return clamp(fract(sin(dot(p, HASH_DIRECTION)) * HASH_SCALE), 0.0, 1.0);
}

// Bilinear lattice noise with smoothstep blending
fn value_noise(p: vec2<f32>) -> f32 {
    let cell = floor(p);
    let offset = p - cell;

    let a = hash21(cell);
    let b = hash21(cell + vec2<f32>(1.0, 0.0));
    let c = hash21(cell + vec2<f32>(0.0, 1.0));
    let d = hash21(cell + vec2<f32>(1.0, 1.0));

    let u = offset * offset * (3.0 - 2.0 * offset);
    return mix(mix(a, b, u.x), mix(c, d, u.x), u.y);
}
"#;

/// WGSL code for the octave accumulator.
pub const FBM_WGSL: &str = r#"
// Fractal Brownian Motion with per-octave rotation, shift and drift
fn fbm(p_in: vec2<f32>, t: f32) -> f32 {
    let rotation = mat2x2<f32>(FBM_COS, FBM_SIN, -FBM_SIN, FBM_COS);
    let drift = FBM_DRIFT * t;
    var p = p_in;
    var value = 0.0;
    var amplitude = FBM_AMPLITUDE;
    for (var i = 0u; i < FBM_OCTAVES; i++) {
        var direction = 1.0;
        if (i % 2u) == 1u {
            direction = -1.0;
        }
        value += amplitude * value_noise(p + drift * direction);
        p = rotation * p * FBM_LACUNARITY + FBM_SHIFT;
        amplitude *= FBM_GAIN;
    }
    return value;
}
"#;

/// WGSL code for the warp stack, colorization and tone curve.
pub const WARP_WGSL: &str = r#"
struct WarpSample {
    q: vec2<f32>,
    r: vec2<f32>,
    f: f32,
};

fn warp_sample(st: vec2<f32>, t: f32) -> WarpSample {
    var s: WarpSample;
    s.q = vec2<f32>(
        fbm(st + vec2<f32>(WARP_Q_TIME * t), t),
        fbm(st + WARP_Q_OFFSET, t),
    );
    let base = st + s.q;
    s.r = vec2<f32>(
        fbm(base + WARP_R_OFFSET_X + vec2<f32>(WARP_R_TIME.x * t), t),
        fbm(base + WARP_R_OFFSET_Y + vec2<f32>(WARP_R_TIME.y * t), t),
    );
    s.f = fbm(st + s.r, t);
    return s;
}

fn weight(w: f32, lo: f32, hi: f32) -> f32 {
    return min(max(w, lo), hi);
}

fn shade(s: WarpSample) -> vec4<f32> {
    var color = mix(PALETTE_VOID, PALETTE_BASE, weight(s.f * s.f * PALETTE_BASE_GAIN, BASE_CLAMP.x, BASE_CLAMP.y));
    color = mix(color, PALETTE_NEON, weight(length(s.q), NEON_CLAMP.x, NEON_CLAMP.y));
    color = mix(color, PALETTE_HIGHLIGHT, weight(abs(s.r.x), HIGHLIGHT_CLAMP.x, HIGHLIGHT_CLAMP.y));

    let f = s.f;
    let intensity = ((TONE_CUBIC * f + TONE_QUADRATIC) * f + TONE_LINEAR) * f;
    let toned = pow(max(color * intensity, vec3<f32>(0.0)), vec3<f32>(TONE_EXPONENT));
    return vec4<f32>(clamp(toned, vec3<f32>(0.0), vec3<f32>(1.0)), 1.0);
}
"#;

/// Fullscreen triangle vertex stage and the fragment entry point.
pub const ENTRY_WGSL: &str = r#"
@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(positions[vertex_index], 0.0, 1.0);
    return out;
}

@fragment
fn fs_main(frag: VertexOutput) -> @location(0) vec4<f32> {
    let res = uniforms.resolution;
    let uv = (frag.clip_position.xy * 2.0 - res) / max(min(res.x, res.y), 1.0);
    let st = uv * FRAMING_ZOOM + FRAMING_OFFSET;
    return shade(warp_sample(st, uniforms.time * SPEED));
}
"#;

/// Format an `f32` as a WGSL float literal.
///
/// `Debug` always keeps a decimal point or exponent, so integral values
/// stay floats (`100.0`, `1e20`).
pub fn f32_literal(v: f32) -> String {
    format!("{:?}", v)
}

fn vec2_literal(v: Vec2) -> String {
    format!("vec2<f32>({}, {})", f32_literal(v.x), f32_literal(v.y))
}

fn vec3_literal(v: Vec3) -> String {
    format!(
        "vec3<f32>({}, {}, {})",
        f32_literal(v.x),
        f32_literal(v.y),
        f32_literal(v.z)
    )
}

/// `const` declarations for every configurable value.
pub fn constants_wgsl(config: &FieldConfig) -> String {
    let fbm = &config.fbm;
    let warp = &config.warp;
    let palette = &config.palette;
    let tone = &config.tone;
    let framing = &config.framing;

    let f32_consts = [
        ("HASH_SCALE", HASH_SCALE),
        ("FBM_COS", fbm.rotation_angle.cos()),
        ("FBM_SIN", fbm.rotation_angle.sin()),
        ("FBM_LACUNARITY", fbm.lacunarity),
        ("FBM_AMPLITUDE", fbm.initial_amplitude),
        ("FBM_GAIN", fbm.gain),
        ("WARP_Q_TIME", warp.q_time),
        ("PALETTE_BASE_GAIN", palette.base_gain),
        ("TONE_CUBIC", tone.cubic),
        ("TONE_QUADRATIC", tone.quadratic),
        ("TONE_LINEAR", tone.linear),
        ("TONE_EXPONENT", tone.exponent),
        ("FRAMING_ZOOM", framing.zoom),
        ("SPEED", config.speed),
    ];
    let vec2_consts = [
        ("HASH_DIRECTION", HASH_DIRECTION),
        ("FBM_SHIFT", fbm.shift),
        ("FBM_DRIFT", fbm.drift),
        ("WARP_Q_OFFSET", warp.q_offset),
        ("WARP_R_OFFSET_X", warp.r_offset_x),
        ("WARP_R_OFFSET_Y", warp.r_offset_y),
        ("WARP_R_TIME", warp.r_time),
        ("BASE_CLAMP", Vec2::new(palette.base_clamp.min, palette.base_clamp.max)),
        ("NEON_CLAMP", Vec2::new(palette.neon_clamp.min, palette.neon_clamp.max)),
        (
            "HIGHLIGHT_CLAMP",
            Vec2::new(palette.highlight_clamp.min, palette.highlight_clamp.max),
        ),
        ("FRAMING_OFFSET", framing.offset),
    ];
    let vec3_consts = [
        ("PALETTE_VOID", palette.void),
        ("PALETTE_BASE", palette.base),
        ("PALETTE_NEON", palette.neon),
        ("PALETTE_HIGHLIGHT", palette.highlight),
    ];

    let mut code = String::from("\n// Field configuration\n");
    code.push_str(&format!("const FBM_OCTAVES: u32 = {}u;\n", fbm.octaves));
    for (name, value) in f32_consts {
        code.push_str(&format!("const {name}: f32 = {};\n", f32_literal(value)));
    }
    for (name, value) in vec2_consts {
        code.push_str(&format!("const {name}: vec2<f32> = {};\n", vec2_literal(value)));
    }
    for (name, value) in vec3_consts {
        code.push_str(&format!("const {name}: vec3<f32> = {};\n", vec3_literal(value)));
    }
    code
}

/// Complete shader module (vertex + fragment) for `config`.
pub fn fragment_shader(config: &FieldConfig) -> String {
    format!(
        "// Generated by warpfield\n{}{}{}{}{}{}",
        UNIFORMS_WGSL,
        constants_wgsl(config),
        NOISE_WGSL,
        FBM_WGSL,
        WARP_WGSL,
        ENTRY_WGSL
    )
}

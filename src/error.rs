//! Error types for Warpfield.
//!
//! The field itself is total and never fails. These errors cover the
//! surfaces around it: configuration loading, GPU initialization, image
//! output and the window driver.

use thiserror::Error;

/// Errors raised while building or loading a [`FieldConfig`](crate::FieldConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric knob is NaN or infinite.
    #[error("`{name}` must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },
    /// A numeric knob is outside its accepted range.
    #[error("`{name}` = {value} is outside {min}..={max}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    /// Octave count outside the supported range.
    #[error("octave count {0} is outside 1..={max}", max = crate::fbm::MAX_OCTAVES)]
    Octaves(u32),
    /// A mix weight clamp whose bounds are inverted or leave [0, 1].
    #[error("weight clamp `{name}` [{min}, {max}] must satisfy 0 <= min <= max <= 1")]
    WeightClamp {
        name: &'static str,
        min: f32,
        max: f32,
    },
    /// Unknown palette preset name.
    #[error("unknown palette preset `{0}`")]
    UnknownPalette(String),
    /// Unknown biome name.
    #[error("unknown biome `{0}`")]
    UnknownBiome(String),
    /// Failed to read a configuration file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to parse a configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found ({0}). Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support.")]
    NoAdapter(#[from] wgpu::RequestAdapterError),
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reports no usable texture format.
    #[error("surface has no supported texture formats")]
    NoSurfaceFormat,
}

/// Errors from the CPU frame driver.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Zero-sized output image.
    #[error("image size {width}x{height} must be non-zero")]
    EmptyImage { width: u32, height: u32 },
    /// Frame sequence parameters that cannot produce frames.
    #[error("invalid frame sequence: {0}")]
    Sequence(String),
    /// Failed to encode or write an image.
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
    /// Failed to create an output directory.
    #[error("failed to prepare output: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid field configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors that can occur when running the live window.
#[derive(Debug, Error)]
pub enum WindowError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// The OS refused to open a window.
    #[error("failed to create window: {0}")]
    Creation(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// Invalid field configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

//! CPU frame driver.
//!
//! Evaluates the field for every pixel of a frame and writes the result
//! into an RGBA8 image. Rows are independent, so they are rendered in
//! parallel with rayon; no state is shared between pixels.

use std::path::{Path, PathBuf};

use glam::{Vec2, Vec4};
use image::RgbaImage;
use log::{debug, info};
use rayon::prelude::*;

use crate::error::RenderError;
use crate::field::Field;
use crate::frame::{FrameContext, Resolution};

/// Convert a [0, 1] color to RGBA8.
#[inline]
pub fn to_rgba8(color: Vec4) -> [u8; 4] {
    color.to_array().map(|c| {
        let c = if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) };
        (c * 255.0 + 0.5) as u8
    })
}

/// Render one frame into a new image.
///
/// Pixels are sampled at their centers, matching a fragment shader's
/// `@builtin(position)`.
pub fn render_frame(field: &Field, frame: &FrameContext) -> Result<RgbaImage, RenderError> {
    let Resolution { width, height } = frame.resolution;
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyImage { width, height });
    }

    let mut image = RgbaImage::new(width, height);
    let row_bytes = width as usize * 4;
    let pixels: &mut [u8] = &mut image;

    pixels
        .par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let coord = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                px.copy_from_slice(&to_rgba8(field.evaluate_in(coord, frame)));
            }
        });

    Ok(image)
}

/// Render one frame and save it. The format follows the file extension.
pub fn save_frame<P: AsRef<Path>>(
    field: &Field,
    frame: &FrameContext,
    path: P,
) -> Result<(), RenderError> {
    let path = path.as_ref();
    let image = render_frame(field, frame)?;
    image.save(path)?;
    info!(
        "wrote {}x{} frame at t={:.3}s to {}",
        frame.resolution.width,
        frame.resolution.height,
        frame.elapsed,
        path.display()
    );
    Ok(())
}

/// Parameters for a numbered frame sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceConfig {
    pub resolution: Resolution,
    /// Number of frames to write.
    pub count: u32,
    /// Frames per second.
    pub fps: f32,
    /// Elapsed time of the first frame.
    pub start: f32,
    pub out_dir: PathBuf,
}

impl SequenceConfig {
    fn validate(&self) -> Result<(), RenderError> {
        if self.count == 0 {
            return Err(RenderError::Sequence("frame count must be at least 1".into()));
        }
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(RenderError::Sequence(format!(
                "fps must be positive, got {}",
                self.fps
            )));
        }
        if !self.start.is_finite() || self.start < 0.0 {
            return Err(RenderError::Sequence(format!(
                "start time must be non-negative, got {}",
                self.start
            )));
        }
        Ok(())
    }

    /// Elapsed time of frame `index`.
    ///
    /// Computed from the index rather than accumulated, so frame 10 000 is
    /// as exact as frame 1.
    pub fn frame_time(&self, index: u32) -> f32 {
        (self.start as f64 + index as f64 / self.fps as f64) as f32
    }

    /// File name of frame `index`.
    pub fn frame_path(&self, index: u32) -> PathBuf {
        self.out_dir.join(format!("frame_{:05}.png", index))
    }
}

/// Render `count` frames at a fixed timestep into `out_dir`.
///
/// Returns the written paths in order.
pub fn render_sequence(field: &Field, sequence: &SequenceConfig) -> Result<Vec<PathBuf>, RenderError> {
    sequence.validate()?;
    std::fs::create_dir_all(&sequence.out_dir)?;

    info!(
        "rendering {} frames at {} fps into {}",
        sequence.count,
        sequence.fps,
        sequence.out_dir.display()
    );

    let mut written = Vec::with_capacity(sequence.count as usize);

    for index in 0..sequence.count {
        let ctx = FrameContext::new(sequence.frame_time(index), sequence.resolution);
        let path = sequence.frame_path(index);
        render_frame(field, &ctx)?.save(&path)?;
        debug!("frame {} t={:.3}s -> {}", index, ctx.elapsed, path.display());
        written.push(path);
    }

    Ok(written)
}

//! GPU frame driver.
//!
//! Compiles the field into a fullscreen fragment shader (see
//! [`crate::wgsl`]) and draws it into a window surface every frame. The
//! only per-frame input is the uniform block: resolution and elapsed time.

mod pipeline;

pub use pipeline::{FieldPipeline, Uniforms};

use std::sync::Arc;

use log::{debug, info};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::error::GpuError;
use crate::field::Field;

/// Pick a surface format, preferring a linear one so the presented
/// colors match the CPU renderer's PNGs byte for byte.
fn choose_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first())
        .copied()
}

fn surface_config(
    caps: &wgpu::SurfaceCapabilities,
    size: PhysicalSize<u32>,
) -> Result<wgpu::SurfaceConfiguration, GpuError> {
    let format = choose_format(&caps.formats).ok_or(GpuError::NoSurfaceFormat)?;
    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode: caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto),
        view_formats: Vec::new(),
        desired_maximum_frame_latency: 2,
    })
}

/// Window surface plus the field pipeline drawing into it.
pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    field: FieldPipeline,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, field: &Field) -> Result<Self, GpuError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("warpfield device"),
                ..Default::default()
            })
            .await?;

        let config = surface_config(&surface.get_capabilities(&adapter), size)?;
        debug!("surface {:?} at {}x{}", config.format, config.width, config.height);
        surface.configure(&device, &config);

        let field = FieldPipeline::new(&device, config.format, field);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            field,
        })
    }

    /// Follow a window resize. Zero-sized windows (minimized) are ignored.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.reconfigure();
    }

    /// Reconfigure the surface at its current size, after it was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Draw one frame at `elapsed` seconds.
    pub fn render(&mut self, elapsed: f32) -> Result<(), wgpu::SurfaceError> {
        self.field.write(
            &self.queue,
            &Uniforms::new(self.config.width, self.config.height, elapsed),
        );

        let frame = self.surface.get_current_texture()?;
        let target = frame.texture.create_view(&Default::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("warpfield frame"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("warpfield pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });
            self.field.draw(&mut pass);
        }

        self.queue.submit([encoder.finish()]);
        frame.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_format_prefers_linear() {
        use wgpu::TextureFormat::*;
        assert_eq!(choose_format(&[Bgra8UnormSrgb, Bgra8Unorm]), Some(Bgra8Unorm));
        assert_eq!(choose_format(&[Rgba8UnormSrgb]), Some(Rgba8UnormSrgb));
        assert_eq!(choose_format(&[]), None);
    }
}

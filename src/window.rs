//! Live window driver.
//!
//! Opens a window, builds the GPU pipeline once the event loop resumes and
//! redraws continuously. Elapsed time comes from a [`FrameClock`], so the
//! view can be paused and sped up without touching the field.
//!
//! | Key     | Action                 |
//! |---------|------------------------|
//! | `Space` | pause / resume         |
//! | `[`     | halve playback speed   |
//! | `]`     | double playback speed  |
//! | `Esc`   | quit                   |

use std::sync::Arc;

use log::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::error::{GpuError, WindowError};
use crate::field::Field;
use crate::gpu::GpuState;
use crate::service::{ServiceHandle, ServiceStatus};
use crate::time::FrameClock;

const TITLE: &str = "warpfield";
const MIN_TIME_SCALE: f32 = 1.0 / 16.0;
const MAX_TIME_SCALE: f32 = 16.0;
/// Redraws between title refreshes.
const TITLE_INTERVAL: u64 = 30;

/// Window size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Playback change requested by a key press.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Control {
    TogglePause,
    Slower,
    Faster,
    Quit,
}

impl Control {
    fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Space => Some(Control::TogglePause),
            KeyCode::BracketLeft => Some(Control::Slower),
            KeyCode::BracketRight => Some(Control::Faster),
            KeyCode::Escape => Some(Control::Quit),
            _ => None,
        }
    }
}

/// Apply a speed change, keeping the scale in a usable range.
fn scaled(current: f32, control: Control) -> f32 {
    let next = match control {
        Control::Slower => current * 0.5,
        Control::Faster => current * 2.0,
        _ => current,
    };
    next.clamp(MIN_TIME_SCALE, MAX_TIME_SCALE)
}

struct App {
    field: Field,
    options: WindowOptions,
    clock: FrameClock,
    window: Option<Arc<Window>>,
    renderer: ServiceHandle<GpuState, GpuError>,
    failure: Option<WindowError>,
    redraws: u64,
}

impl App {
    fn new(field: Field, options: WindowOptions) -> Self {
        Self {
            field,
            options,
            clock: FrameClock::new(),
            window: None,
            renderer: ServiceHandle::new(),
            failure: None,
            redraws: 0,
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let Some(control) = Control::from_key(code) else {
            return;
        };

        match control {
            Control::Quit => event_loop.exit(),
            Control::TogglePause => {
                self.clock.toggle_pause();
                info!("{}", if self.clock.is_paused() { "paused" } else { "resumed" });
            }
            Control::Slower | Control::Faster => {
                let scale = scaled(self.clock.time_scale(), control);
                self.clock.set_time_scale(scale);
                info!("playback speed {}x", scale);
            }
        }
    }

    fn update_title(&self) {
        if let Some(window) = &self.window {
            let state = if self.clock.is_paused() { " (paused)" } else { "" };
            window.set_title(&format!(
                "{} - {:.0} fps - t={:.1}s x{}{}",
                TITLE,
                self.clock.fps(),
                self.clock.elapsed(),
                self.clock.time_scale(),
                state
            ));
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.options.width,
                self.options.height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("{}", e);
                self.failure = Some(e.into());
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let field = self.field;
        let status = self
            .renderer
            .initialize(|| pollster::block_on(GpuState::new(window, &field)));
        if status == ServiceStatus::Failed {
            if let Some(e) = self.renderer.error() {
                error!("{}", e);
            }
            event_loop.exit();
            return;
        }

        self.clock.reset();
        info!("renderer {}", status);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = self.renderer.get_mut() {
                    debug!("resized to {}x{}", physical_size.width, physical_size.height);
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(event_loop, &event);
            }
            WindowEvent::RedrawRequested => {
                self.clock.update();
                if let Some(gpu_state) = self.renderer.get_mut() {
                    match gpu_state.render(self.clock.elapsed()) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            gpu_state.reconfigure()
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            error!("GPU out of memory");
                            event_loop.exit();
                        }
                        Err(e) => warn!("render error: {:?}", e),
                    }
                }
                self.redraws += 1;
                if self.redraws % TITLE_INTERVAL == 0 {
                    self.update_title();
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Open a window showing `field` and block until it is closed.
pub fn run(field: Field, options: WindowOptions) -> Result<(), WindowError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(field, options);
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.failure.take() {
        return Err(e);
    }
    match app.renderer.into_error() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

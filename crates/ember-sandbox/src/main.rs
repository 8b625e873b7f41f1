use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use ember_graphics::logging::{init_logging, LoggingConfig};
use ember_graphics::{
    ColorRgba, CullMode, Graphics, GraphicsSettings, PrimitiveTopology, Resolution, WgpuBackend,
};

/// Sandbox window configuration.
#[derive(Debug, Clone)]
struct SandboxConfig {
    title: String,
    clear_color: ColorRgba,
    graphics: GraphicsSettings,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            title: "ember sandbox".to_string(),
            clear_color: ColorRgba::new(0.1, 0.1, 0.12, 1.0),
            graphics: GraphicsSettings::default(),
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut sandbox = Sandbox::new(SandboxConfig::default());

    event_loop
        .run_app(&mut sandbox)
        .context("winit event loop terminated with error")?;

    Ok(())
}

struct Sandbox {
    config: SandboxConfig,

    // Dropped before the window it presents into.
    graphics: Option<Graphics<WgpuBackend>>,
    window: Option<Arc<Window>>,

    exit_requested: bool,
}

impl Sandbox {
    fn new(config: SandboxConfig) -> Self {
        Self {
            config,
            graphics: None,
            window: None,
            exit_requested: false,
        }
    }

    fn create_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let Resolution { width, height } = self.config.graphics.resolution;
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(width, height));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        // The platform may not honour the requested size.
        let size = window.inner_size();
        let mut settings = self.config.graphics.clone();
        settings.resolution = Resolution::new(size.width, size.height);

        let graphics = Graphics::<WgpuBackend>::initialize(&window, settings)
            .context("graphics initialization failed")?;

        self.graphics = Some(graphics);
        self.window = Some(window);
        Ok(())
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };

        if code == KeyCode::Escape {
            self.request_exit(event_loop);
            return;
        }

        let Some(graphics) = self.graphics.as_mut() else {
            return;
        };

        match code {
            KeyCode::F1 => {
                let mode = match graphics.cull_mode() {
                    CullMode::Back => CullMode::Front,
                    CullMode::Front => CullMode::None,
                    CullMode::None => CullMode::Back,
                };
                graphics.set_cull_mode(mode);
                log::info!("cull mode: {mode:?}");
            }
            KeyCode::F2 => {
                let enable = !graphics.alpha_blending_enabled();
                graphics.enable_alpha_blending(enable);
                log::info!("alpha blending: {enable}");
            }
            KeyCode::F3 => {
                let enable = !graphics.z_buffer_enabled();
                graphics.enable_z_buffer(enable);
                log::info!("z-buffer: {enable}");
            }
            KeyCode::F4 => {
                let topology = match graphics.primitive_topology() {
                    PrimitiveTopology::TriangleList => PrimitiveTopology::LineList,
                    PrimitiveTopology::LineList => PrimitiveTopology::TriangleList,
                };
                graphics.set_primitive_topology(topology);
                log::info!("topology: {topology:?}");
            }
            KeyCode::F11 => {
                let fullscreen = !graphics.settings().fullscreen;
                if let Err(e) = graphics.set_fullscreen(fullscreen) {
                    log::error!("failed to switch fullscreen: {e}");
                }
            }
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let clear_color = self.config.clear_color;
        let Some(graphics) = self.graphics.as_mut() else {
            return;
        };

        let frame = graphics.clear(clear_color).and_then(|()| graphics.present());
        if let Err(e) = frame {
            log::error!("frame failed: {e}");
            self.request_exit(event_loop);
        }
    }
}

impl ApplicationHandler for Sandbox {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }

        if let Err(e) = self.create_graphics(event_loop) {
            log::error!("failed to start sandbox: {e:#}");
            self.request_exit(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.request_exit(event_loop),

            WindowEvent::Resized(size) => {
                if let Some(graphics) = self.graphics.as_mut() {
                    if let Err(e) = graphics.set_resolution(size.width, size.height) {
                        log::error!("resize to {}x{} failed: {e}", size.width, size.height);
                        self.request_exit(event_loop);
                        return;
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use sweetcart_assets::{ShaderSource, TextureImage};
use sweetcart_render_wgpu::{FlyCamera, MoveDirection, SceneRenderer};
use sweetcart_scene::{Projection, TextureId, WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "sweetcart-desktop", about = "Sweet cart scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Root directory holding the images/ and shaders/ trees
    #[arg(long, default_value = ".")]
    assets_dir: PathBuf,
}

/// Held movement keys and their camera directions.
const MOVE_BINDINGS: [(KeyCode, MoveDirection); 6] = [
    (KeyCode::KeyW, MoveDirection::Forward),
    (KeyCode::KeyS, MoveDirection::Backward),
    (KeyCode::KeyA, MoveDirection::Left),
    (KeyCode::KeyD, MoveDirection::Right),
    (KeyCode::KeyQ, MoveDirection::Up),
    (KeyCode::KeyE, MoveDirection::Down),
];

/// Application state outside the GPU stack.
struct AppState {
    camera: FlyCamera,
    projection: Projection,
    keys_held: HashSet<KeyCode>,
    last_frame: Instant,
}

impl AppState {
    fn new() -> Self {
        Self {
            camera: FlyCamera::default(),
            projection: Projection::default(),
            keys_held: HashSet::new(),
            last_frame: Instant::now(),
        }
    }

    fn update(&mut self, dt: f32) {
        for (key, direction) in MOVE_BINDINGS {
            if self.keys_held.contains(&key) {
                self.camera.process_keyboard(direction, dt);
            }
        }
    }
}

struct GpuApp {
    state: AppState,
    scene_shader: ShaderSource,
    lamp_shader: ShaderSource,
    textures: Vec<TextureImage>,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<SceneRenderer>,
    init_error: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(scene_shader: ShaderSource, lamp_shader: ShaderSource, textures: Vec<TextureImage>) -> Self {
        Self {
            state: AppState::new(),
            scene_shader,
            lamp_shader,
            textures,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            init_error: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("create window")?,
        );

        // Captured, hidden cursor; mouse deltas drive the camera.
        if let Err(e) = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
        {
            tracing::warn!("cursor grab unavailable: {e}");
        }
        window.set_cursor_visible(false);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("sweetcart_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // The renderer consumes the decoded images; CPU pixel memory is
        // gone once the GPU copies exist.
        let renderer = SceneRenderer::new(
            &device,
            &queue,
            surface_format,
            size.width,
            size.height,
            &self.scene_shader,
            &self.lamp_shader,
            std::mem::take(&mut self.textures),
        )?;

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            "GPU initialized"
        );

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        Ok(())
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(error) = self.init_gpu(event_loop) {
            tracing::error!("startup failed: {error:#}");
            self.init_error = Some(error);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => {
                let pressed = key_state == ElementState::Pressed;
                if pressed {
                    self.state.keys_held.insert(key);
                } else {
                    self.state.keys_held.remove(&key);
                }

                // One toggle per press; auto-repeat must not flip the
                // projection back and forth.
                if pressed && !repeat {
                    match key {
                        KeyCode::Escape => event_loop.exit(),
                        KeyCode::KeyP => {
                            self.state.projection.toggle();
                            tracing::debug!(projection = ?self.state.projection, "projection toggled");
                        }
                        _ => {}
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
                };
                self.state.camera.process_scroll(dy);
            }
            // Mouse buttons are accepted but intentionally unbound.
            WindowEvent::MouseInput { .. } => {}
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - self.state.last_frame).as_secs_f32().min(0.1);
                self.state.last_frame = now;
                self.state.update(dt);

                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
                        return;
                    }
                    Err(e) => {
                        tracing::error!("surface error: {e}");
                        return;
                    }
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                if let (Some(renderer), Some(config)) = (&self.renderer, &self.config) {
                    let aspect = config.width as f32 / config.height.max(1) as f32;
                    renderer.render(
                        device,
                        queue,
                        &view,
                        &self.state.camera,
                        self.state.projection,
                        aspect,
                    );
                }

                output.present();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.state
                .camera
                .process_mouse(delta.0 as f32, delta.1 as f32);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("sweetcart-desktop starting");

    // Everything file-backed loads before a window exists; the first missing
    // or invalid file aborts startup.
    let scene_shader = sweetcart_assets::load_shader(cli.assets_dir.join("shaders/scene.wgsl"))?;
    let lamp_shader = sweetcart_assets::load_shader(cli.assets_dir.join("shaders/lamp.wgsl"))?;
    let textures = sweetcart_assets::load_textures(
        &cli.assets_dir,
        TextureId::ALL.iter().map(|t| t.file_path()),
    )?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(scene_shader, lamp_shader, textures);
    event_loop.run_app(&mut app)?;

    if let Some(error) = app.init_error {
        return Err(error);
    }

    tracing::info!("sweetcart-desktop exiting");
    Ok(())
}

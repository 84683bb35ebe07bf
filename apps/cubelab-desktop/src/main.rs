use anyhow::{Context as _, Result, anyhow};
use clap::Parser;
use cubelab_input::{Action, PointerState};
use cubelab_render_wgpu::MeshRenderer;
use cubelab_session::{Effect, Session, SessionConfig};
use egui::Context as EguiContext;
use glam::Vec2;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Fullscreen, Window, WindowId};

/// Pixels of trackpad scroll that count as one wheel line.
const PIXELS_PER_LINE: f32 = 50.0;

#[derive(Parser)]
#[command(name = "cubelab-desktop", about = "Rotating cube with a live debug panel")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial window width in logical pixels
    #[arg(long)]
    width: Option<f32>,

    /// Initial window height in logical pixels
    #[arg(long)]
    height: Option<f32>,

    /// Start with the debug panel hidden
    #[arg(long)]
    hide_panel: bool,
}

impl Cli {
    fn session_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::load(path)?,
            None => SessionConfig::default(),
        };
        if let Some(w) = self.width {
            config.window.width = w;
        }
        if let Some(h) = self.height {
            config.window.height = h;
        }
        if self.hide_panel {
            config.panel.hidden = true;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Window, device and GUI state, created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: MeshRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(
        event_loop: &ActiveEventLoop,
        egui_ctx: &EguiContext,
        title: &str,
        size: LogicalSize<f32>,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(title)
            .with_inner_size(size);
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

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
        .ok_or_else(|| anyhow!("no compatible GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("cubelab_device"),
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
            .or(surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = MeshRenderer::new(&device, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn reconfigure(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }
}

struct App {
    session: Session,
    title: String,
    initial_size: LogicalSize<f32>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    pointer: PointerState,
    last_frame: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: SessionConfig) -> Result<Self> {
        let title = config.window.title.clone();
        let initial_size = LogicalSize::new(config.window.width, config.window.height);
        Ok(Self {
            session: Session::new(config)?,
            title,
            initial_size,
            gpu: None,
            egui_ctx: EguiContext::default(),
            pointer: PointerState::new(),
            last_frame: Instant::now(),
            error: None,
        })
    }

    /// Push the window's current size into the session and the surface.
    fn sync_size(&mut self, physical: PhysicalSize<u32>) {
        let Some(gpu) = &mut self.gpu else { return };
        let scale = gpu.window.scale_factor();
        let logical: LogicalSize<f32> = physical.to_logical(scale);
        self.session
            .resize(logical.width, logical.height, scale as f32);
        let viewport = &mut self.session.scene_mut().viewport;
        viewport.set_fullscreen(gpu.window.fullscreen().is_some());
        let (w, h) = viewport.drawing_buffer_size();
        gpu.reconfigure(w, h);
    }

    fn apply(&mut self, action: Action) {
        if action.is_noop() {
            return;
        }
        if let (Effect::Fullscreen(on), Some(gpu)) = (self.session.handle(action), &self.gpu) {
            gpu.window
                .set_fullscreen(on.then_some(Fullscreen::Borderless(None)));
        }
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;
        self.session.tick(dt);

        let Some(gpu) = &mut self.gpu else { return };
        let scene = self.session.scene();
        gpu.renderer
            .sync(&gpu.device, &mut scene.geometries.borrow_mut());

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
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

        gpu.renderer.render(
            &gpu.device,
            &gpu.queue,
            &view,
            &scene.camera,
            &scene.mesh.borrow(),
        );

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let session = &mut self.session;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            cubelab_panel::view::show(ctx, session.panel_mut());
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx, &self.title, self.initial_size) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.gpu = Some(gpu);
                self.sync_size(size);
                self.last_frame = Instant::now();
            }
            Err(e) => {
                tracing::error!("startup failed: {e:#}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                match event {
                    WindowEvent::MouseInput { .. } | WindowEvent::CursorLeft { .. } => {
                        self.pointer.cancel();
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        self.pointer
                            .captured_move(Vec2::new(position.x as f32, position.y as f32));
                    }
                    _ => {}
                }
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.sync_size(new_size);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.gpu.as_ref().map(|g| g.window.inner_size()) {
                    self.sync_size(size);
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
                let action =
                    self.session
                        .keys()
                        .map(key, key_state == ElementState::Pressed, repeat);
                self.apply(action);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                let action = self
                    .pointer
                    .primary(btn_state == ElementState::Pressed, Instant::now());
                self.apply(action);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let action = self
                    .pointer
                    .moved(Vec2::new(position.x as f32, position.y as f32));
                self.apply(action);
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer.cancel();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                let action = self.pointer.wheel(lines);
                self.apply(action);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("cubelab-desktop starting");

    let config = cli.session_config()?;
    let mut app = App::new(config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.error.take() {
        return Err(e);
    }
    // Release GPU resources before tearing down the scene.
    drop(app.gpu.take());
    let report = app.session.shutdown();
    tracing::info!(
        frames = report.frames,
        elapsed = report.elapsed,
        released = report.geometries_released,
        "cubelab-desktop exiting"
    );
    Ok(())
}

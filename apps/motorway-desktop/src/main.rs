use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use motorway_audio::{AudioSink, TracingAudioSink, engine_tone};
use motorway_common::DriveConfig;
use motorway_input::{Action, Control, InputState};
use motorway_kernel::World;
use motorway_render::{ChaseCamera, build_frame};
use motorway_render_wgpu::{Viewport, WgpuRenderer};
use motorway_stream::TickTimer;
use motorway_tools::{WorldInspector, hud_speed};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Simulation steps run at a fixed 60 Hz regardless of display rate.
const TICK: Duration = Duration::from_micros(16_667);
/// Upper bound on catch-up steps after a long frame.
const MAX_STEPS_PER_FRAME: u32 = 5;

#[derive(Parser)]
#[command(name = "motorway-desktop", about = "Endless motorway drive")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed; overrides the config file
    #[arg(short, long)]
    seed: Option<u64>,
}

/// Application state.
struct AppState {
    world: World,
    input: InputState,
    camera: ChaseCamera,
    audio: TracingAudioSink,
    timer: TickTimer,
    show_debug: bool,
    last_frame: Instant,
    tick_accumulator: Duration,
}

impl AppState {
    fn new(config: DriveConfig) -> Result<Self> {
        Ok(Self {
            world: World::new(config)?,
            input: InputState::default(),
            camera: ChaseCamera::default(),
            audio: TracingAudioSink::default(),
            timer: TickTimer::new(240),
            show_debug: false,
            last_frame: Instant::now(),
            tick_accumulator: Duration::ZERO,
        })
    }

    fn update(&mut self, dt: Duration) {
        self.tick_accumulator += dt;
        let mut steps = 0;
        while self.tick_accumulator >= TICK && steps < MAX_STEPS_PER_FRAME {
            self.tick_accumulator -= TICK;
            steps += 1;

            let input = self.input.snapshot();
            let started = Instant::now();
            let report = self.world.step(&input, TICK);
            self.timer.record(started.elapsed());

            if report.started {
                self.tick_accumulator = Duration::ZERO;
            }
            for c in &report.collisions {
                tracing::debug!(agent = c.agent.0, speed = c.speed_after, "bump");
            }

            let config = self.world.config();
            self.audio.apply(engine_tone(
                self.world.player().speed,
                self.world.is_running(),
                &config.player,
                &config.audio,
            ));
            self.world.drain_events();
        }
        if steps == MAX_STEPS_PER_FRAME {
            self.tick_accumulator = Duration::ZERO;
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed && key == KeyCode::F1 {
            self.show_debug = !self.show_debug;
            return;
        }
        self.input.key(&format!("{key:?}"), pressed);
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.world.is_running() {
            egui::Window::new("Motorway")
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label("Arrow keys or WASD to drive");
                        ui.add_space(8.0);
                        if ui.button("Start").clicked() {
                            self.input.apply(Action::Press(Control::Start));
                        }
                        ui.small("or press Enter");
                    });
                });
            return;
        }

        egui::Area::new(egui::Id::new("speed_hud"))
            .anchor(egui::Align2::RIGHT_TOP, [-16.0, 16.0])
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(hud_speed(&self.world))
                        .size(28.0)
                        .strong()
                        .color(egui::Color32::WHITE),
                );
            });

        if !self.show_debug {
            return;
        }
        let summary = WorldInspector::summary(&self.world);
        egui::SidePanel::left("debug")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Drive");
                ui.separator();
                ui.label(format!("Tick: {}  Clock: {:.1}s", summary.tick, summary.clock_secs));
                ui.label(format!(
                    "Position: ({:.1}, {:.1}, {:.1})",
                    summary.position[0], summary.position[1], summary.position[2]
                ));
                ui.label(format!("Heading: {:.3} rad", summary.heading));
                ui.label(format!("Segments: {}  Frontier: {:?}", summary.segments, summary.frontier));
                ui.label(format!("Props: {}  Traffic: {}", summary.props, summary.traffic));
                ui.label(format!("Collisions: {}", summary.collisions));
                let lane = self.world.config().road.road_width / 8.0;
                match WorldInspector::next_in_lane(&self.world, lane) {
                    Some(next) => ui.label(format!("Next: {next}")),
                    None => ui.label("Next: lane clear"),
                };
                if summary.in_cooldown {
                    ui.colored_label(egui::Color32::YELLOW, "Cooldown");
                }
                ui.separator();
                ui.label(format!(
                    "Tick time: avg {}us  p99 {}us",
                    self.timer.average().as_micros(),
                    self.timer.percentile(99.0).as_micros()
                ));
                ui.small("F1: Toggle Debug");
            });
    }
}

/// Everything that only exists once a window is up.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Motorway")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("creating window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("creating surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("motorway_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("creating device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let viewport = Viewport::new(size.width, size.height);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: viewport.width,
            height: viewport.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, viewport);
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

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let viewport = Viewport::new(size.width, size.height);
        self.config.width = viewport.width;
        self.config.height = viewport.height;
        self.surface.configure(&self.device, &self.config);
        self.renderer.resize(&self.device, viewport);
    }

    fn draw_egui(
        &mut self,
        view: &wgpu::TextureView,
        egui_ctx: &EguiContext,
        full_output: egui::FullOutput,
    ) {
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
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
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt = (now - self.state.last_frame).min(Duration::from_millis(100));
        self.state.last_frame = now;
        self.state.update(dt);

        let Some(gpu) = &mut self.gpu else {
            return;
        };

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

        let frame = build_frame(&self.state.world, &self.state.camera);
        gpu.renderer.render(&gpu.device, &gpu.queue, &view, &frame);

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.draw_ui(ctx);
        });
        gpu.draw_egui(&view, &self.egui_ctx, full_output);

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
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
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size);
                }
            }
            WindowEvent::Focused(false) => {
                self.state.input.clear();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
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

    let mut config = match &cli.config {
        Some(path) => DriveConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DriveConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    tracing::info!(seed = config.seed_or_default(), "motorway-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AppState::new(config)?);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(DriveConfig::default()).unwrap()
    }

    #[test]
    fn enter_starts_the_drive() {
        let mut app = state();
        app.handle_key(KeyCode::Enter, true);
        app.handle_key(KeyCode::Enter, false);
        app.update(TICK);
        assert!(app.world.is_running());
        assert_eq!(app.world.tick(), 0);
    }

    #[test]
    fn held_arrow_accelerates_at_fixed_rate() {
        let mut app = state();
        app.handle_key(KeyCode::Enter, true);
        app.update(TICK);
        app.handle_key(KeyCode::ArrowUp, true);
        app.update(TICK * 3);
        assert_eq!(app.world.tick(), 3);
        assert!(app.world.player().speed > 0.0);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut app = state();
        app.handle_key(KeyCode::Enter, true);
        app.update(TICK);
        app.update(Duration::from_secs(2));
        assert_eq!(app.world.tick(), u64::from(MAX_STEPS_PER_FRAME));
        assert_eq!(app.tick_accumulator, Duration::ZERO);
    }

    #[test]
    fn f1_toggles_debug_panel() {
        let mut app = state();
        app.handle_key(KeyCode::F1, true);
        assert!(app.show_debug);
        app.handle_key(KeyCode::F1, false);
        assert!(app.show_debug);
    }
}

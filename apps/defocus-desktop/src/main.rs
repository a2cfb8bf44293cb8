use anyhow::Result;
use clap::Parser;
use defocus_assets::{ShaderCatalog, ShaderKind};
use defocus_common::BoundingSphere;
use defocus_optics::{DebugMode, DofParams, F_STOPS};
use defocus_render::FrameState;
use defocus_render_wgpu::{DofRenderer, OrbitCamera};
use defocus_scene::{InstanceField, SimulationClock};
use egui::Context as EguiContext;
use glam::Vec2;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowId};

#[derive(Parser)]
#[command(name = "defocus", about = "Interactive depth-of-field demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory containing the WGSL shader assets
    #[arg(long, default_value = "./assets/shaders")]
    assets_dir: String,

    /// Parameter preset file (loaded at startup, F5/F9 to save/load)
    #[arg(long, default_value = "./defocus_preset.json")]
    preset: PathBuf,
}

/// Application state independent of the GPU objects.
struct AppState {
    field: InstanceField,
    clock: SimulationClock,
    params: DofParams,
    camera: OrbitCamera,
    show_bounds: bool,
    preset_path: PathBuf,
    // Input state
    keys_held: std::collections::HashSet<KeyCode>,
    orbiting: bool,
    mouse_pos: Vec2,
    last_frame: Instant,
}

impl AppState {
    fn new(preset_path: PathBuf) -> Self {
        let params = if preset_path.exists() {
            match DofParams::load(&preset_path) {
                Ok(params) => params,
                Err(e) => {
                    tracing::warn!("failed to load preset: {e}");
                    DofParams::default()
                }
            }
        } else {
            DofParams::default()
        };

        Self {
            field: InstanceField::default(),
            clock: SimulationClock::new(),
            params,
            camera: OrbitCamera::default(),
            show_bounds: false,
            preset_path,
            keys_held: std::collections::HashSet::new(),
            orbiting: false,
            mouse_pos: Vec2::ZERO,
            last_frame: Instant::now(),
        }
    }

    fn shift_down(&self) -> bool {
        self.keys_held.contains(&KeyCode::ShiftLeft)
            || self.keys_held.contains(&KeyCode::ShiftRight)
    }

    /// One fixed simulation step: settle the camera, refresh derived
    /// optics, and auto-focus on the instance under the cursor while
    /// Shift is held.
    fn tick(&mut self, bounds: Option<BoundingSphere>, viewport: Vec2) {
        self.camera.clamp_distance();
        self.camera.fov_deg = self.params.fov_deg;
        self.params.update();

        if self.shift_down() {
            if let Some(bounds) = bounds {
                let ray = self.camera.screen_ray(self.mouse_pos, viewport);
                if let Some(dist) = self.field.pick(&ray, &bounds, self.clock.time()) {
                    self.params.focal_plane = dist;
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_held.insert(key);
        } else {
            self.keys_held.remove(&key);
        }

        if !pressed {
            return;
        }

        match key {
            KeyCode::Space => {
                self.clock.toggle_paused();
                tracing::info!(paused = self.clock.is_paused(), "pause toggled");
            }
            KeyCode::F5 => {
                if let Err(e) = self.params.save(&self.preset_path) {
                    tracing::error!("failed to save preset: {e}");
                }
            }
            KeyCode::F9 => match DofParams::load(&self.preset_path) {
                Ok(params) => self.params = params,
                Err(e) => tracing::error!("failed to load preset: {e}"),
            },
            _ => {}
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        egui::SidePanel::left("parameters")
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.heading("Depth of Field");
                ui.separator();
                ui.label(format!(
                    "t = {:.1} s{}",
                    self.clock.time(),
                    if self.clock.is_paused() { " (paused)" } else { "" }
                ));
                ui.separator();

                ui.add(
                    egui::Slider::new(&mut self.params.focal_plane, 0.1..=100.0)
                        .text("Focal distance"),
                );
                egui::ComboBox::from_label("F-stop")
                    .selected_text(format!("f/{:.1}", self.params.f_stop()))
                    .show_ui(ui, |ui| {
                        for (i, stop) in F_STOPS.iter().enumerate() {
                            ui.selectable_value(
                                &mut self.params.f_stop_index,
                                i,
                                format!("f/{stop:.1}"),
                            );
                        }
                    });
                ui.add(
                    egui::Slider::new(&mut self.params.fov_deg, 5.0..=90.0)
                        .text("Field of view"),
                );
                ui.separator();

                ui.label(format!("Aperture: {:.4}", self.params.aperture));
                ui.label(format!("Focal length: {:.4}", self.params.focal_length));
                ui.separator();

                ui.add(
                    egui::Slider::new(&mut self.params.max_coc_radius_px, 1..=20)
                        .text("Max CoC radius (px)"),
                );
                ui.add(
                    egui::Slider::new(&mut self.params.far_radius_rescale, 0.1..=20.0)
                        .text("Far radius rescale"),
                );
                egui::ComboBox::from_label("Debug view")
                    .selected_text(self.params.debug_mode.label())
                    .show_ui(ui, |ui| {
                        for mode in DebugMode::ALL {
                            ui.selectable_value(
                                &mut self.params.debug_mode,
                                mode,
                                mode.label(),
                            );
                        }
                    });
                ui.separator();

                if ui
                    .button(if self.clock.is_paused() { "Resume" } else { "Pause" })
                    .clicked()
                {
                    self.clock.toggle_paused();
                }
                ui.checkbox(&mut self.show_bounds, "Show bounds");

                ui.separator();
                ui.small("Hold SHIFT to auto-focus.");
                ui.small("Space: pause | F: fullscreen | R: reload shaders");
                ui.small("F5/F9: save/load preset | Esc: quit");
            });
    }
}

struct GpuApp {
    state: AppState,
    catalog: ShaderCatalog,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<DofRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(assets_dir: String, preset: PathBuf) -> Self {
        let mut catalog = ShaderCatalog::new(assets_dir);
        for (kind, outcome) in catalog.load_all() {
            if let Err(e) = outcome {
                tracing::error!(?kind, "failed to load shader: {e}");
            }
        }

        Self {
            state: AppState::new(preset),
            catalog,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    /// Reload every shader asset whose file changed and rebuild the
    /// affected pipelines. A broken program keeps its previous pipeline.
    fn reload_shaders(&mut self) {
        let mut updated: Vec<ShaderKind> = Vec::new();
        for (kind, outcome) in self.catalog.load_all() {
            match outcome {
                Ok(defocus_assets::LoadOutcome::Updated) => updated.push(kind),
                Ok(defocus_assets::LoadOutcome::Unchanged) => {}
                Err(e) => tracing::error!(?kind, "failed to reload shader: {e}"),
            }
        }
        if updated.is_empty() {
            tracing::info!("shader reload: no files changed");
            return;
        }
        if let (Some(device), Some(renderer)) = (&self.device, &mut self.renderer) {
            renderer.reload(device, &self.catalog, &updated);
        }
    }

    fn viewport(&self) -> Vec2 {
        match &self.config {
            Some(config) => Vec2::new(config.width as f32, config.height as f32),
            None => Vec2::new(960.0, 540.0),
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Defocus")
            .with_inner_size(PhysicalSize::new(960u32, 540));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("defocus_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

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

        self.state.camera.aspect = size.width as f32 / size.height.max(1) as f32;

        let renderer = DofRenderer::new(
            &device,
            &queue,
            surface_format,
            size.width,
            size.height,
            &self.catalog,
        );

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(egui_winit) = &mut self.egui_winit {
            let response = egui_winit.on_window_event(self.window.as_ref().unwrap(), &event);
            if response.consumed {
                return;
            }
        }

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
                    self.state.camera.aspect =
                        config.width as f32 / config.height.max(1) as f32;
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
                        ..
                    },
                ..
            } => {
                let pressed = key_state == ElementState::Pressed;
                match key {
                    KeyCode::Escape if pressed => {
                        let window = self.window.as_ref().unwrap();
                        if window.fullscreen().is_some() {
                            window.set_fullscreen(None);
                        } else {
                            event_loop.exit();
                        }
                    }
                    KeyCode::KeyF if pressed => {
                        let window = self.window.as_ref().unwrap();
                        if window.fullscreen().is_some() {
                            window.set_fullscreen(None);
                        } else {
                            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
                        }
                    }
                    KeyCode::KeyR if pressed => {
                        self.reload_shaders();
                    }
                    _ => self.state.handle_key(key, pressed),
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.mouse_pos = Vec2::new(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                self.state.orbiting = btn_state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                };
                self.state.camera.dolly(scroll);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - self.state.last_frame).as_secs_f64();
                self.state.last_frame = now;

                let bounds = self.renderer.as_ref().map(|r| r.bounding_sphere());
                let viewport = self.viewport();
                let steps = self.state.clock.advance(dt);
                for _ in 0..steps {
                    self.state.tick(bounds, viewport);
                }

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

                if let Some(renderer) = &mut self.renderer {
                    renderer.render(
                        device,
                        queue,
                        &view,
                        &self.state.camera,
                        &FrameState {
                            field: &self.state.field,
                            params: &self.state.params,
                            time: self.state.clock.time(),
                            show_bounds: self.state.show_bounds,
                        },
                    );
                }

                let raw_input = self
                    .egui_winit
                    .as_mut()
                    .unwrap()
                    .take_egui_input(self.window.as_ref().unwrap());
                let full_output = self.egui_ctx.run(raw_input, |ctx| {
                    self.state.draw_ui(ctx);
                });

                self.egui_winit.as_mut().unwrap().handle_platform_output(
                    self.window.as_ref().unwrap(),
                    full_output.platform_output,
                );

                let paint_jobs = self
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [
                        self.config.as_ref().unwrap().width,
                        self.config.as_ref().unwrap().height,
                    ],
                    pixels_per_point: full_output.pixels_per_point,
                };

                {
                    let egui_renderer = self.egui_renderer.as_mut().unwrap();
                    for (id, image_delta) in &full_output.textures_delta.set {
                        egui_renderer.update_texture(device, queue, *id, image_delta);
                    }
                    let mut encoder =
                        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("egui_encoder"),
                        });
                    egui_renderer.update_buffers(
                        device,
                        queue,
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
                        egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
                    }
                    queue.submit(std::iter::once(encoder.finish()));
                    for id in &full_output.textures_delta.free {
                        egui_renderer.free_texture(id);
                    }
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
            if self.state.orbiting {
                self.state.camera.orbit(delta.0 as f32, delta.1 as f32);
            }
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

    tracing::info!("defocus starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(cli.assets_dir, cli.preset);
    event_loop.run_app(&mut app)?;

    Ok(())
}

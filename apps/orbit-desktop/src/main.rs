use anyhow::{Context, Result};
use clap::Parser;
use orbit_render::FlyCamera;
use orbit_render_wgpu::{RenderError, WgpuRenderer};
use orbit_scene::DemoScene;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "orbit-desktop", about = "Animated orbit demo scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Initial window width in pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value_t = 720)]
    height: u32,
}

/// Scene, camera and input state. Knows nothing about the GPU.
struct AppState {
    demo: DemoScene,
    camera: FlyCamera,
    keys_held: HashSet<KeyCode>,
    dragging: bool,
    start: Instant,
    last_frame: Instant,
}

impl AppState {
    fn new(demo: DemoScene) -> Self {
        let now = Instant::now();
        Self {
            demo,
            camera: FlyCamera::default(),
            keys_held: HashSet::new(),
            dragging: false,
            start: now,
            last_frame: now,
        }
    }

    fn update(&mut self) -> Result<()> {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;

        let movement: [(KeyCode, fn(&mut FlyCamera, f32)); 6] = [
            (KeyCode::KeyW, FlyCamera::move_forward),
            (KeyCode::KeyS, FlyCamera::move_backward),
            (KeyCode::KeyA, FlyCamera::move_left),
            (KeyCode::KeyD, FlyCamera::move_right),
            (KeyCode::Space, FlyCamera::move_up),
            (KeyCode::ControlLeft, FlyCamera::move_down),
        ];
        for (key, step) in movement {
            if self.keys_held.contains(&key) {
                step(&mut self.camera, dt);
            }
        }

        let total = (now - self.start).as_secs_f32();
        self.demo.animate(total)?;
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_held.insert(key);
        } else {
            self.keys_held.remove(&key);
        }
    }
}

/// Everything that exists only once a window has been created.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
}

impl Gpu {
    fn new(window: Arc<Window>, state: &mut AppState) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(RenderError::from)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("orbit_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(RenderError::from)?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no texture formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        state.camera.set_aspect(config.width, config.height);

        let mut renderer =
            WgpuRenderer::new(&device, &queue, surface_format, config.width, config.height);
        renderer.sync_assets(&device, &queue, state.demo.scene())?;

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            format = ?surface_format,
            "GPU initialized"
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>, camera: &mut FlyCamera) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
        camera.set_aspect(self.config.width, self.config.height);
    }

    fn draw(&mut self, state: &AppState) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("surface error: {e}");
                return Ok(());
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.render(
            &self.device,
            &self.queue,
            &view,
            &state.camera,
            state.demo.scene(),
        )?;
        output.present();
        Ok(())
    }
}

struct App {
    size: PhysicalSize<u32>,
    state: AppState,
    gpu: Option<Gpu>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.gpu = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("orbit")
            .with_inner_size(self.size);
        let gpu = event_loop
            .create_window(attrs)
            .context("failed to create window")
            .and_then(|window| Gpu::new(Arc::new(window), &mut self.state));
        match gpu {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => self.fail(event_loop, e),
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
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size, &mut self.state.camera);
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
                if key == KeyCode::Escape {
                    event_loop.exit();
                    return;
                }
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                self.state.dragging = btn_state == ElementState::Pressed;
            }
            WindowEvent::RedrawRequested => {
                let frame = self.state.update().and_then(|()| match &mut self.gpu {
                    Some(gpu) => gpu.draw(&self.state),
                    None => Ok(()),
                });
                if let Err(e) = frame {
                    self.fail(event_loop, e);
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
            if self.state.dragging {
                self.state.camera.rotate(delta.0 as f32, delta.1 as f32);
            }
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

    tracing::info!("orbit-desktop starting");

    let demo = DemoScene::build()?;
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        size: PhysicalSize::new(cli.width.max(1), cli.height.max(1)),
        state: AppState::new(demo),
        gpu: None,
    };
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["orbit-desktop"]);
        assert!(!cli.verbose);
        assert_eq!((cli.width, cli.height), (1280, 720));
    }

    #[test]
    fn held_keys_move_camera() {
        let mut state = AppState::new(DemoScene::build().unwrap());
        let start = state.camera.position;
        state.handle_key(KeyCode::Space, true);
        std::thread::sleep(std::time::Duration::from_millis(5));
        state.update().unwrap();
        assert!(state.camera.position.y > start.y);

        state.handle_key(KeyCode::Space, false);
        assert!(state.keys_held.is_empty());
    }
}

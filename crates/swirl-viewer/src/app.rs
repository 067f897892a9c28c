//! Viewer application implementing winit ApplicationHandler
//!
//! Runs the frame loop: advance the simulation once per redraw, push the
//! buffer mirrors to the GPU, and draw the billboarded particles.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use swirl_render::{Camera, ParticleRenderer, RenderContext};
use swirl_sim::{load_settings, ParticleSystem, SimulationSettings};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const ZOOM_STEP: f32 = 0.5;
const ORBIT_STEP: f32 = 0.05;

/// State shared with the settings-file watcher thread
pub struct SharedState {
    pub needs_refresh: bool,
}

pub struct ViewerApp {
    settings: SimulationSettings,
    settings_path: String,
    shared: Arc<Mutex<SharedState>>,
    fullscreen: bool,

    system: ParticleSystem,
    camera: Camera,
    start: Instant,

    window: Option<Arc<Window>>,
    render_context: Option<RenderContext>,
    renderer: Option<ParticleRenderer>,
}

impl ViewerApp {
    pub fn new(
        settings: SimulationSettings,
        settings_path: String,
        shared: Arc<Mutex<SharedState>>,
        fullscreen: bool,
    ) -> Self {
        Self {
            settings,
            settings_path,
            shared,
            fullscreen,
            system: ParticleSystem::new(),
            camera: Camera::new(),
            start: Instant::now(),
            window: None,
            render_context: None,
            renderer: None,
        }
    }

    /// Elapsed wall-clock time in milliseconds
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) {
        let window_attrs = Window::default_attributes()
            .with_title("Swirl")
            .with_inner_size(PhysicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs).unwrap());

        if self.fullscreen {
            window.set_fullscreen(Some(winit::window::Fullscreen::Borderless(None)));
        }

        self.window = Some(window.clone());

        let render_context = pollster::block_on(RenderContext::new(window)).unwrap();
        self.camera.aspect = render_context.aspect_ratio();

        let mut renderer = ParticleRenderer::new(
            &render_context.device,
            &render_context.queue,
            render_context.config.format,
        );

        let now = self.now_ms();
        if let Err(e) = self.system.refresh(now, &self.settings, &mut renderer) {
            eprintln!("Settings error: {}", e);
        }

        self.render_context = Some(render_context);
        self.renderer = Some(renderer);
    }

    /// Re-read the settings file and rebuild the pool. A bad edit keeps
    /// the previous generation running instead of taking the loop down.
    fn reload_settings(&mut self) {
        if !Path::new(&self.settings_path).exists() {
            eprintln!("Settings file missing: {}", self.settings_path);
            return;
        }

        let now = self.now_ms();
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        match load_settings(&self.settings_path) {
            Ok(loaded) => match self.system.refresh(now, &loaded, renderer) {
                Ok(()) => {
                    println!("Reloaded {}", self.settings_path);
                    self.settings = loaded;
                }
                Err(e) => eprintln!("Settings error (keeping previous): {}", e),
            },
            Err(e) => eprintln!("Settings parse error (keeping previous): {}", e),
        }
    }

    fn tick(&mut self) {
        let needs_refresh = {
            let Ok(mut shared) = self.shared.lock() else {
                return;
            };
            std::mem::take(&mut shared.needs_refresh)
        };
        if needs_refresh {
            self.reload_settings();
        }

        let now = self.now_ms();
        if let Some(renderer) = self.renderer.as_mut() {
            self.system.update(now, renderer);
        }
    }

    fn render(&mut self) {
        let Some(context) = &self.render_context else {
            return;
        };
        let Some(renderer) = &self.renderer else {
            return;
        };

        let output = match context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                return;
            }
            Err(e) => {
                eprintln!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        renderer.update_camera(&self.camera);

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Viewer Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Particle Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.01,
                            g: 0.01,
                            b: 0.02,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &context.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            renderer.draw(&mut pass, self.system.spawn_bound() as u32);
        }

        context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            self.initialize(event_loop);
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
                if let Some(context) = &mut self.render_context {
                    context.resize(new_size);
                    self.camera.aspect = context.aspect_ratio();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if event.state == ElementState::Pressed {
                        match key_code {
                            KeyCode::Escape => event_loop.exit(),
                            KeyCode::KeyW => self.camera.zoom(ZOOM_STEP),
                            KeyCode::KeyS => self.camera.zoom(-ZOOM_STEP),
                            KeyCode::KeyA => self.camera.orbit_horizontal(-ORBIT_STEP),
                            KeyCode::KeyD => self.camera.orbit_horizontal(ORBIT_STEP),
                            KeyCode::F11 => {
                                if let Some(window) = &self.window {
                                    if window.fullscreen().is_some() {
                                        window.set_fullscreen(None);
                                    } else {
                                        window.set_fullscreen(Some(
                                            winit::window::Fullscreen::Borderless(None),
                                        ));
                                    }
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                self.tick();
                self.render();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

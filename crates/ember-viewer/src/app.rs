//! Window and offscreen drivers for the cube demo

use crate::scene::Scene;
use crate::Args;
use anyhow::{Context, Result};
use ember_render::{HeadlessContext, RenderContext, RenderError};
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Open a window and run the interactive demo until closed
pub fn run_windowed(args: &Args) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp {
        size: PhysicalSize::new(args.width, args.height),
        window: None,
        ctx: None,
        scene: None,
        last_frame: Instant::now(),
        error: None,
    };
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct ViewerApp {
    size: PhysicalSize<u32>,
    window: Option<Arc<Window>>,
    ctx: Option<RenderContext>,
    scene: Option<Scene>,
    last_frame: Instant,
    error: Option<anyhow::Error>,
}

impl ViewerApp {
    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title("Ember Viewer")
            .with_inner_size(self.size);
        let window = Arc::new(event_loop.create_window(attributes)?);

        let ctx = pollster::block_on(RenderContext::new(window.clone()))
            .context("Failed to create render context")?;
        let scene = Scene::new(&ctx.device, ctx.config.format, ctx.aspect_ratio())?;

        self.window = Some(window);
        self.ctx = Some(ctx);
        self.scene = Some(scene);
        self.last_frame = Instant::now();
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        let (Some(ctx), Some(scene)) = (self.ctx.as_mut(), self.scene.as_mut()) else {
            return Ok(());
        };

        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        scene.advance(dt);

        let frame = match ctx.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = ctx.size;
                ctx.resize(size);
                return Ok(());
            }
            Err(e) => return Err(RenderError::SurfaceError(e.to_string()).into()),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        scene.render(&ctx.queue, &mut encoder, &view, &ctx.depth_view)?;
        ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        if code == KeyCode::Escape {
            event_loop.exit();
            return;
        }
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        match code {
            KeyCode::ArrowLeft => scene.camera.orbit_horizontal(-0.1),
            KeyCode::ArrowRight => scene.camera.orbit_horizontal(0.1),
            KeyCode::ArrowUp => scene.camera.orbit_vertical(0.1),
            KeyCode::ArrowDown => scene.camera.orbit_vertical(-0.1),
            KeyCode::Equal => scene.camera.zoom(0.5),
            KeyCode::Minus => scene.camera.zoom(-0.5),
            _ => {}
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.initialize(event_loop) {
            self.error = Some(err);
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
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(new_size) => {
                if let Some(ctx) = self.ctx.as_mut() {
                    ctx.resize(new_size);
                    if let Some(scene) = self.scene.as_mut() {
                        scene.camera.aspect = ctx.aspect_ratio();
                    }
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        self.handle_key(event_loop, code);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.error = Some(err);
                    event_loop.exit();
                }
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

/// Render offscreen and save the final frame as a PNG
pub fn run_headless(args: &Args, output: &str) -> Result<()> {
    let ctx = pollster::block_on(HeadlessContext::new(args.width, args.height))
        .context("Failed to create headless context")?;
    let mut scene = Scene::new(&ctx.device, ctx.format, ctx.aspect_ratio())?;

    for _ in 0..args.frames.max(1) {
        scene.advance(1.0 / 60.0);
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Headless Frame Encoder"),
            });
        scene.render(&ctx.queue, &mut encoder, &ctx.color_view, &ctx.depth_view)?;
        ctx.queue.submit(std::iter::once(encoder.finish()));
    }

    let pixels =
        pollster::block_on(ctx.read_pixels()).context("Failed to read rendered pixels")?;
    let img = image::RgbaImage::from_raw(args.width, args.height, pixels)
        .context("Failed to create image from pixel data")?;
    img.save(output)
        .context(format!("Failed to save image to {}", output))?;

    println!(
        "Rendered {}x{} image to {}",
        args.width, args.height, output
    );
    Ok(())
}

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowId},
};

use drift_house::{
    config::Settings,
    controller::{input::native::special_key, FrameLoop},
    logging,
    view::{RenderBackend, Renderer},
};

struct Running {
    window: Arc<Window>,
    renderer: Renderer,
}

struct App {
    settings: Settings,
    frame_loop: FrameLoop,
    running: Option<Running>,
    last_idle: Instant,
    last_frame: Instant,
}

impl App {
    fn new(settings: Settings) -> Self {
        let now = Instant::now();
        Self {
            frame_loop: FrameLoop::new(&settings),
            settings,
            running: None,
            last_idle: now,
            last_frame: now,
        }
    }

    fn open(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<Running> {
        let mut attributes = Window::default_attributes().with_title(self.settings.title.as_str());
        if self.settings.fullscreen {
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        } else {
            let (width, height) = self.settings.window_size;
            attributes = attributes.with_inner_size(LogicalSize::new(width, height));
        }

        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("failed to create window")?,
        );
        let renderer = pollster::block_on(Renderer::new(window.clone(), self.settings.show_hud))?;

        Ok(Running { window, renderer })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(running) = self.running.as_mut() else {
            return;
        };

        let now = Instant::now();
        self.frame_loop
            .record_frame((now - self.last_frame).as_secs_f32());
        self.last_frame = now;
        running.renderer.set_hud_stats(self.frame_loop.hud_stats());

        match self.frame_loop.display(&mut running.renderer) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost, reconfiguring");
                running.renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("out of GPU memory");
                event_loop.exit();
            }
            Err(e) => error!(error = ?e, "frame skipped"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.open(event_loop) {
            Ok(running) => {
                let (width, height) = running.renderer.viewport();
                info!(width, height, "window ready");
                running.window.request_redraw();
                self.running = Some(running);
                self.last_idle = Instant::now();
            }
            Err(e) => {
                error!(error = ?e, "failed to start");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        if running.renderer.hud_event(&event) {
            running.window.request_redraw();
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                info!(width = size.width, height = size.height, "window resized");
                running.renderer.resize(size.width, size.height);
                running.window.request_redraw();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(key) = special_key(&event) {
                    if self.frame_loop.handle_key(key) {
                        running.window.request_redraw();
                    }
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(running) = self.running.as_ref() else {
            return;
        };

        let now = Instant::now();
        if self.frame_loop.idle(now - self.last_idle) {
            running.window.request_redraw();
        }
        self.last_idle = now;

        event_loop.set_control_flow(ControlFlow::WaitUntil(
            now + self.frame_loop.until_next_tick(),
        ));
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let settings = Settings::from_env();
    info!(?settings, "starting");

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut app = App::new(settings);
    event_loop.run_app(&mut app).context("event loop failed")?;

    Ok(())
}

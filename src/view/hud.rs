use std::sync::Arc;

use winit::event::WindowEvent;
use winit::window::Window;

/// Numbers shown in the overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HudStats {
    pub fps: f32,
    pub ticks: u64,
    pub camera_angle: f32,
    pub camera_distance: f32,
    pub car_angle: f32,
}

/// egui overlay drawn on top of the scene
pub struct Hud {
    window: Arc<Window>,
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    stats: HudStats,
}

impl Hud {
    pub fn new(window: Arc<Window>, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            None,
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());

        Self {
            window,
            ctx,
            state,
            renderer,
            stats: HudStats::default(),
        }
    }

    pub fn set_stats(&mut self, stats: HudStats) {
        self.stats = stats;
    }

    /// Returns true when egui consumed the event.
    pub fn on_window_event(&mut self, event: &WindowEvent) -> bool {
        self.state.on_window_event(self.window.as_ref(), event).consumed
    }

    /// Record the overlay pass into `encoder`. The returned command buffers
    /// must be submitted before the encoder.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
    ) -> Vec<wgpu::CommandBuffer> {
        let raw_input = self.state.take_egui_input(&self.window);
        let stats = self.stats;
        let output = self.ctx.run(raw_input, |ctx| {
            egui::Window::new("Stats")
                .default_pos([8.0, 8.0])
                .default_size([160.0, 100.0])
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new(format!("FPS: {:.0}", stats.fps)).small());
                    ui.label(egui::RichText::new(format!("Ticks: {}", stats.ticks)).small());
                    ui.label(
                        egui::RichText::new(format!(
                            "Camera: {:.2} rad, {:.1} away",
                            stats.camera_angle, stats.camera_distance
                        ))
                        .small(),
                    );
                    ui.label(egui::RichText::new(format!("Car: {:.1} deg", stats.car_angle)).small());
                });
        });
        self.state
            .handle_platform_output(&self.window, output.platform_output);

        let pixels_per_point = self.window.scale_factor() as f32;
        let primitives = self.ctx.tessellate(output.shapes, pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point,
        };

        for (id, image_delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }
        let command_buffers =
            self.renderer
                .update_buffers(device, queue, encoder, &primitives, &screen_descriptor);

        {
            let egui_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("hud_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.renderer
                .render(&mut egui_pass.forget_lifetime(), &primitives, &screen_descriptor);
        }

        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }

        command_buffers
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use bytemuck::Zeroable;
use glam::{Mat3, Mat4, Vec4};
use tracing::{debug, info};
use winit::window::Window;

use crate::model::LightParams;
use crate::view::backend::{DepthFunc, LightSlot, RenderBackend, MAX_LIGHT_SLOTS};
use crate::view::gpu_init::GpuContext;
use crate::view::hud::{Hud, HudStats};
use crate::view::primitives::{Mesh, MeshBuffer, Vertex};
use crate::view::shapes::{DrawCommand, PrimitiveKey};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct LightRaw {
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
    position: [f32; 4],
    enabled: [u32; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniform {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    global_ambient: [f32; 4],
    flags: [u32; 4],
    lights: [LightRaw; MAX_LIGHT_SLOTS],
}

/// Per-draw data, fed to the shader as instance attributes
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
    shininess: f32,
}

impl InstanceRaw {
    fn from_command(command: &DrawCommand) -> Self {
        let m = &command.material;
        Self {
            model: command.transform.to_cols_array_2d(),
            normal: normal_matrix(command.transform).to_cols_array_2d(),
            ambient: m.ambient.to_array(),
            diffuse: m.diffuse.to_array(),
            specular: m.specular.to_array(),
            shininess: m.shininess,
        }
    }

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 11] = wgpu::vertex_attr_array![
            2 => Float32x4, 3 => Float32x4, 4 => Float32x4, 5 => Float32x4,
            6 => Float32x3, 7 => Float32x3, 8 => Float32x3,
            9 => Float32x4, 10 => Float32x4, 11 => Float32x4,
            12 => Float32,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Inverse transpose of the upper 3x3, identity for degenerate transforms.
fn normal_matrix(model: Mat4) -> Mat3 {
    let m = Mat3::from_mat4(model);
    if m.determinant().abs() <= f32::EPSILON {
        Mat3::IDENTITY
    } else {
        m.inverse().transpose()
    }
}

/// Fixed-function style state collected between `clear` and `swap_buffers`.
#[derive(Debug, Clone)]
struct FrameState {
    clear_color: Vec4,
    projection: Mat4,
    view: Mat4,
    global_ambient: Vec4,
    lighting: bool,
    lights: [Option<LightParams>; MAX_LIGHT_SLOTS],
    enabled: [bool; MAX_LIGHT_SLOTS],
    depth: Option<DepthFunc>,
    draws: Vec<DrawCommand>,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            clear_color: Vec4::ZERO,
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            global_ambient: Vec4::new(0.2, 0.2, 0.2, 1.0),
            lighting: false,
            lights: [None; MAX_LIGHT_SLOTS],
            enabled: [false; MAX_LIGHT_SLOTS],
            depth: None,
            draws: Vec::new(),
        }
    }
}

impl FrameState {
    fn uniform(&self) -> SceneUniform {
        let eye = self.view.inverse().w_axis;
        let mut lights = [LightRaw::zeroed(); MAX_LIGHT_SLOTS];
        for (slot, raw) in lights.iter_mut().enumerate() {
            let (Some(params), true) = (self.lights[slot], self.enabled[slot]) else {
                continue;
            };
            *raw = LightRaw {
                ambient: params.ambient.to_array(),
                diffuse: params.diffuse.to_array(),
                specular: params.specular.to_array(),
                position: params.position.to_array(),
                enabled: [1, 0, 0, 0],
            };
        }

        SceneUniform {
            view_proj: (self.projection * self.view).to_cols_array_2d(),
            eye: eye.to_array(),
            global_ambient: self.global_ambient.to_array(),
            flags: [self.lighting as u32, 0, 0, 0],
            lights,
        }
    }
}

/// The view keeps the texture alive.
fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    depth_texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn compare_function(depth: Option<DepthFunc>) -> wgpu::CompareFunction {
    match depth {
        Some(DepthFunc::Less) => wgpu::CompareFunction::Less,
        None => wgpu::CompareFunction::Always,
    }
}

fn create_scene_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    depth: Option<DepthFunc>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("scene_pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc(), InstanceRaw::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // meshes are viewed from inside too (roof, torus holes)
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: depth.is_some(),
            depth_compare: compare_function(depth),
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

/// wgpu implementation of [`RenderBackend`] for one window.
pub struct Renderer {
    gpu: GpuContext,
    depth_view: wgpu::TextureView,
    shader: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: HashMap<Option<DepthFunc>, wgpu::RenderPipeline>,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    meshes: HashMap<PrimitiveKey, MeshBuffer>,
    frame: FrameState,
    hud: Option<Hud>,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, show_hud: bool) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create window surface")?;
        let gpu = GpuContext::new(&instance, surface, size.width, size.height).await?;
        let device = gpu.device.clone();

        let depth_view = create_depth_view(&device, gpu.config.width, gpu.config.height);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniform_buffer"),
            size: std::mem::size_of::<SceneUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let instance_capacity = 64;
        let instance_buffer = create_instance_buffer(&device, instance_capacity);

        let hud = show_hud.then(|| Hud::new(window.clone(), &device, gpu.format));
        info!(hud = show_hud, "renderer ready");

        Ok(Self {
            gpu,
            depth_view,
            shader,
            pipeline_layout,
            pipelines: HashMap::new(),
            uniform_buffer,
            bind_group,
            instance_buffer,
            instance_capacity,
            meshes: HashMap::new(),
            frame: FrameState::default(),
            hud,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        debug!(width, height, "resizing surface");
        self.gpu.resize(width, height);
        self.depth_view = create_depth_view(&self.gpu.device, width, height);
    }

    /// Reconfigure the surface at its current size, after it was lost.
    pub fn reconfigure(&mut self) {
        self.gpu.reconfigure();
    }

    pub fn set_hud_stats(&mut self, stats: HudStats) {
        if let Some(hud) = self.hud.as_mut() {
            hud.set_stats(stats);
        }
    }

    /// Offer a window event to the HUD; true when it was consumed.
    pub fn hud_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        self.hud
            .as_mut()
            .is_some_and(|hud| hud.on_window_event(event))
    }

    fn ensure_resources(&mut self, draws: &[DrawCommand]) {
        for draw in draws {
            let device = &self.gpu.device;
            self.meshes
                .entry(draw.primitive.key())
                .or_insert_with(|| Mesh::for_primitive(&draw.primitive).upload(device));
        }

        if draws.len() > self.instance_capacity {
            self.instance_capacity = draws.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(&self.gpu.device, self.instance_capacity);
        }

        let depth = self.frame.depth;
        if !self.pipelines.contains_key(&depth) {
            let pipeline = create_scene_pipeline(
                &self.gpu.device,
                &self.pipeline_layout,
                &self.shader,
                self.gpu.format,
                depth,
            );
            self.pipelines.insert(depth, pipeline);
        }
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("instance_buffer"),
        size: (capacity.max(1) * std::mem::size_of::<InstanceRaw>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl RenderBackend for Renderer {
    type Error = wgpu::SurfaceError;

    fn viewport(&self) -> (u32, u32) {
        (self.gpu.config.width, self.gpu.config.height)
    }

    fn clear(&mut self, color: Vec4) {
        self.frame = FrameState {
            clear_color: color,
            ..FrameState::default()
        };
    }

    fn set_projection(&mut self, projection: Mat4) {
        self.frame.projection = projection;
    }

    fn set_view(&mut self, view: Mat4) {
        self.frame.view = view;
    }

    fn set_light_model_ambient(&mut self, ambient: Vec4) {
        self.frame.global_ambient = ambient;
    }

    fn enable_lighting(&mut self) {
        self.frame.lighting = true;
    }

    fn set_light(&mut self, slot: LightSlot, params: LightParams) {
        self.frame.lights[slot.index()] = Some(params);
    }

    fn enable_light(&mut self, slot: LightSlot) {
        self.frame.enabled[slot.index()] = true;
    }

    fn enable_depth_test(&mut self, func: DepthFunc) {
        self.frame.depth = Some(func);
    }

    fn draw(&mut self, command: DrawCommand) {
        self.frame.draws.push(command);
    }

    fn swap_buffers(&mut self) -> Result<(), Self::Error> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let draws = std::mem::take(&mut self.frame.draws);
        self.ensure_resources(&draws);

        let instances: Vec<InstanceRaw> = draws.iter().map(InstanceRaw::from_command).collect();
        if !instances.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }
        self.gpu
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.frame.uniform()));

        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let c = self.frame.clear_color;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: c.x as f64,
                            g: c.y as f64,
                            b: c.z as f64,
                            a: c.w as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(pipeline) = self.pipelines.get(&self.frame.depth) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &self.bind_group, &[]);
                render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

                for (i, draw) in draws.iter().enumerate() {
                    let Some(mesh) = self.meshes.get(&draw.primitive.key()) else {
                        continue;
                    };
                    let instance = i as u32;
                    render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..mesh.index_count, 0, instance..instance + 1);
                }
            }
        }

        let size = [self.gpu.config.width, self.gpu.config.height];
        let mut command_buffers = match self.hud.as_mut() {
            Some(hud) => hud.render(&self.gpu.device, &self.gpu.queue, &mut encoder, &view, size),
            None => Vec::new(),
        };
        command_buffers.push(encoder.finish());

        self.gpu.queue.submit(command_buffers);
        output.present();

        Ok(())
    }
}

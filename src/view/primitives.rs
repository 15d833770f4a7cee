//! Procedural meshes for the solid primitives.
//!
//! Layouts follow the GLUT solids so that the drawing code can place them
//! with the same transforms: spheres and cones are built around the Z axis,
//! the torus lies in the XY plane.

use std::f32::consts::{PI, TAU};

use bytemuck::NoUninit;
use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::view::shapes::Primitive;

#[repr(C)]
#[derive(Debug, Clone, Copy, NoUninit)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    fn new(pos: Vec3, normal: Vec3) -> Self {
        Self {
            pos: pos.to_array(),
            normal: normal.to_array(),
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

/// Triangle list with per-vertex normals.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn for_primitive(primitive: &Primitive) -> Self {
        match *primitive {
            Primitive::Cube { size } => cube(size),
            Primitive::Sphere {
                radius,
                slices,
                stacks,
            } => sphere(radius, slices, stacks),
            Primitive::Cone {
                base,
                height,
                slices,
                stacks,
            } => cone(base, height, slices, stacks),
            Primitive::Torus {
                inner,
                outer,
                sides,
                rings,
            } => torus(inner, outer, sides, rings),
        }
    }

    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffer {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }

    /// Index a (rows + 1) x (cols + 1) vertex grid starting at `base` as quads.
    fn push_grid_indices(&mut self, base: u32, rows: u32, cols: u32) {
        let stride = cols + 1;
        for i in 0..rows {
            for j in 0..cols {
                let a = base + i * stride + j;
                let b = a + stride;
                self.indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }
    }
}

/// Cube centered on the origin with flat-shaded faces.
pub fn cube(size: f32) -> Mesh {
    let h = size / 2.0;
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut mesh = Mesh::empty();
    for (normal, u, v) in faces {
        let base = mesh.vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            mesh.vertices
                .push(Vertex::new((normal + u * su + v * sv) * h, normal));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

pub fn sphere(radius: f32, slices: u32, stacks: u32) -> Mesh {
    let slices = slices.max(3);
    let stacks = stacks.max(2);

    let mut mesh = Mesh::empty();
    for i in 0..=stacks {
        let phi = PI * i as f32 / stacks as f32;
        for j in 0..=slices {
            let theta = TAU * j as f32 / slices as f32;
            let normal = Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());
            mesh.vertices.push(Vertex::new(normal * radius, normal));
        }
    }
    mesh.push_grid_indices(0, stacks, slices);
    mesh
}

/// Cone with a closed base.
pub fn cone(base: f32, height: f32, slices: u32, stacks: u32) -> Mesh {
    let slices = slices.max(3);
    let stacks = stacks.max(1);

    let mut mesh = Mesh::empty();
    for i in 0..=stacks {
        let t = i as f32 / stacks as f32;
        let ring = base * (1.0 - t);
        for j in 0..=slices {
            let theta = TAU * j as f32 / slices as f32;
            let (sin, cos) = theta.sin_cos();
            let normal = Vec3::new(cos * height, sin * height, base).normalize_or_zero();
            mesh.vertices
                .push(Vertex::new(Vec3::new(cos * ring, sin * ring, height * t), normal));
        }
    }
    mesh.push_grid_indices(0, stacks, slices);

    // base disk
    let center = mesh.vertices.len() as u32;
    mesh.vertices.push(Vertex::new(Vec3::ZERO, Vec3::NEG_Z));
    for j in 0..=slices {
        let theta = TAU * j as f32 / slices as f32;
        let (sin, cos) = theta.sin_cos();
        mesh.vertices
            .push(Vertex::new(Vec3::new(cos * base, sin * base, 0.0), Vec3::NEG_Z));
    }
    for j in 0..slices {
        let rim = center + 1 + j;
        mesh.indices.extend_from_slice(&[center, rim + 1, rim]);
    }
    mesh
}

pub fn torus(inner: f32, outer: f32, sides: u32, rings: u32) -> Mesh {
    let sides = sides.max(3);
    let rings = rings.max(3);

    let mut mesh = Mesh::empty();
    for i in 0..=rings {
        let (sin_phi, cos_phi) = (TAU * i as f32 / rings as f32).sin_cos();
        for j in 0..=sides {
            let (sin_theta, cos_theta) = (TAU * j as f32 / sides as f32).sin_cos();
            let ring = outer + inner * cos_theta;
            let pos = Vec3::new(ring * cos_phi, ring * sin_phi, inner * sin_theta);
            let normal = Vec3::new(cos_theta * cos_phi, cos_theta * sin_phi, sin_theta);
            mesh.vertices.push(Vertex::new(pos, normal));
        }
    }
    mesh.push_grid_indices(0, rings, sides);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_mesh(mesh: &Mesh) {
        assert!(!mesh.vertices.is_empty() && !mesh.indices.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n), "index out of range");
        for v in &mesh.vertices {
            let len = Vec3::from(v.normal).length();
            assert!((len - 1.0).abs() < 1e-4, "normal not unit: {len}");
        }
    }

    fn extent(mesh: &Mesh) -> (Vec3, Vec3) {
        mesh.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), v| (lo.min(v.pos.into()), hi.max(v.pos.into())),
        )
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_cube() {
        let mesh = cube(2.0);
        check_mesh(&mesh);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        let (lo, hi) = extent(&mesh);
        assert!(close(lo, Vec3::splat(-1.0)) && close(hi, Vec3::splat(1.0)));
    }

    #[test]
    fn test_sphere() {
        let mesh = sphere(1.5, 16, 16);
        check_mesh(&mesh);
        for v in &mesh.vertices {
            assert!((Vec3::from(v.pos).length() - 1.5).abs() < 1e-4);
        }
        let (lo, hi) = extent(&mesh);
        assert!((hi.z - 1.5).abs() < 1e-4 && (lo.z + 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_cone() {
        let mesh = cone(1.5, 1.25, 16, 8);
        check_mesh(&mesh);
        let (lo, hi) = extent(&mesh);
        assert!(lo.z.abs() < 1e-5);
        assert!((hi.z - 1.25).abs() < 1e-5);
        assert!((hi.x - 1.5).abs() < 1e-4);
        // side normals lean towards +Z
        assert!(mesh.vertices[0].normal[2] > 0.0);
    }

    #[test]
    fn test_torus() {
        let mesh = torus(0.05, 0.1, 8, 8);
        check_mesh(&mesh);
        let (lo, hi) = extent(&mesh);
        assert!((hi.x - 0.15).abs() < 1e-4);
        assert!((lo.x + 0.15).abs() < 1e-4);
        assert!((hi.z - 0.05).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_counts_are_raised() {
        check_mesh(&sphere(1.0, 0, 0));
        check_mesh(&cone(1.0, 1.0, 1, 0));
        check_mesh(&torus(0.1, 0.5, 0, 0));
    }

    #[test]
    fn test_mesh_for_primitive() {
        let mesh = Mesh::for_primitive(&Primitive::cube(1.0));
        assert_eq!(mesh.vertices.len(), 24);
        let mesh = Mesh::for_primitive(&Primitive::Torus {
            inner: 0.05,
            outer: 0.1,
            sides: 8,
            rings: 8,
        });
        assert_eq!(mesh.vertices.len(), 9 * 9);
    }
}

//! Drawing procedures for everything in the scene.
//!
//! Nothing here touches the GPU. Each procedure takes a parent [`Scope`]
//! and appends [`DrawCommand`]s to a [`DrawList`]; nested transforms are
//! derived scopes, so siblings never see each other's transforms.

use glam::{Mat4, Vec3};

use crate::model::material::{self, Material};
use crate::model::{Car, Cloud};

/// Solid primitives, parameterized the way GLUT parameterizes them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Axis aligned, centered on the origin
    Cube { size: f32 },
    /// Poles on the Z axis
    Sphere { radius: f32, slices: u32, stacks: u32 },
    /// Base on the XY plane, apex at `+height` on Z
    Cone { base: f32, height: f32, slices: u32, stacks: u32 },
    /// Ring of radius `outer` around Z, tube of radius `inner`
    Torus { inner: f32, outer: f32, sides: u32, rings: u32 },
}

/// Hashable identity of a primitive's mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimitiveKey(u8, [u32; 4]);

impl Primitive {
    pub fn cube(size: f32) -> Self {
        Primitive::Cube { size }
    }

    pub fn key(&self) -> PrimitiveKey {
        match *self {
            Primitive::Cube { size } => PrimitiveKey(0, [size.to_bits(), 0, 0, 0]),
            Primitive::Sphere {
                radius,
                slices,
                stacks,
            } => PrimitiveKey(1, [radius.to_bits(), slices, stacks, 0]),
            Primitive::Cone {
                base,
                height,
                slices,
                stacks,
            } => PrimitiveKey(2, [base.to_bits(), height.to_bits(), slices, stacks]),
            Primitive::Torus {
                inner,
                outer,
                sides,
                rings,
            } => PrimitiveKey(3, [inner.to_bits(), outer.to_bits(), sides, rings]),
        }
    }
}

/// A model transform. Deriving a child never changes the parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scope(Mat4);

impl Default for Scope {
    fn default() -> Self {
        Self::root()
    }
}

impl Scope {
    pub fn root() -> Self {
        Scope(Mat4::IDENTITY)
    }

    pub fn translate(self, x: f32, y: f32, z: f32) -> Self {
        Scope(self.0 * Mat4::from_translation(Vec3::new(x, y, z)))
    }

    pub fn scale(self, x: f32, y: f32, z: f32) -> Self {
        Scope(self.0 * Mat4::from_scale(Vec3::new(x, y, z)))
    }

    /// Rotate by `degrees` around `axis`.
    pub fn rotate(self, degrees: f32, axis: Vec3) -> Self {
        Scope(self.0 * Mat4::from_axis_angle(axis.normalize(), degrees.to_radians()))
    }

    pub fn matrix(&self) -> Mat4 {
        self.0
    }
}

/// One primitive, placed and shaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub primitive: Primitive,
    pub transform: Mat4,
    pub material: Material,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, scope: Scope, primitive: Primitive, material: Material) {
        self.commands.push(DrawCommand {
            primitive,
            transform: scope.matrix(),
            material,
        });
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }
}

impl IntoIterator for DrawList {
    type Item = DrawCommand;
    type IntoIter = std::vec::IntoIter<DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

impl Car {
    /// Body, three windows and four wheels around the car's position.
    pub fn draw(&self, parent: Scope, list: &mut DrawList) {
        let p = self.position();
        let root = parent.translate(p.x, p.y, p.z);

        list.push(root.scale(2.0, 1.0, 1.0), Primitive::cube(1.0), material::CAR);

        // front window
        list.push(
            root.translate(0.0, 0.4, 0.5).scale(0.8, 0.6, 0.1),
            Primitive::cube(1.0),
            material::GLASS,
        );
        // side windows
        for x_mul in [-1.0, 1.0] {
            list.push(
                root.translate(0.5 * x_mul, 0.4, 0.0).scale(0.8, 0.6, 0.1),
                Primitive::cube(1.0),
                material::GLASS,
            );
        }

        for z_mul in [-1.0, 1.0] {
            let axle = root.translate(0.0, -0.3, 0.15 * z_mul);
            for x_mul in [-1.0, 1.0] {
                list.push(
                    axle.translate(0.4 * x_mul, -0.25, 0.4 * z_mul),
                    Primitive::Torus {
                        inner: 0.05,
                        outer: 0.1,
                        sides: 8,
                        rings: 8,
                    },
                    material::TIRE,
                );
            }
        }
    }
}

pub fn draw_house(parent: Scope, list: &mut DrawList) {
    let house = parent.translate(0.0, 1.0, -0.5);
    list.push(house, Primitive::cube(2.0), material::HOME);

    // front and side windows
    list.push(
        house.translate(0.0, 0.5, 1.01).scale(0.8, 0.8, 0.1),
        Primitive::cube(1.0),
        material::GLASS,
    );
    for x in [1.01, -1.01] {
        list.push(
            house.translate(x, 0.5, 0.0).scale(0.1, 0.8, 0.8),
            Primitive::cube(1.0),
            material::GLASS,
        );
    }

    draw_roof(house, 1.5, 1.25, 16, 8, list);
    draw_chimney(house, 0.25, list);

    // door
    list.push(
        house.translate(0.8, -0.5, 1.01).scale(0.4, 1.0, 0.05),
        Primitive::cube(1.0),
        material::HOME,
    );
    // shutter
    list.push(
        house.translate(-0.8, 0.0, 1.01).scale(0.4, 0.4, 0.05),
        Primitive::cube(1.0),
        material::HOME,
    );
    // arch over the entrance
    list.push(
        house.translate(0.0, 1.2, 2.0).rotate(45.0, Vec3::Y),
        Primitive::Torus {
            inner: 0.1,
            outer: 0.2,
            sides: 8,
            rings: 8,
        },
        material::HOME,
    );
}

/// Cone standing on top of the house body, apex up.
pub fn draw_roof(parent: Scope, radius: f32, height: f32, slices: u32, stacks: u32, list: &mut DrawList) {
    list.push(
        parent.translate(0.0, 1.0, 0.0).rotate(-90.0, Vec3::X),
        Primitive::Cone {
            base: radius,
            height,
            slices,
            stacks,
        },
        material::HOME,
    );
}

pub fn draw_chimney(parent: Scope, size: f32, list: &mut DrawList) {
    list.push(
        parent.translate(0.5, 1.5, -0.5).scale(1.0, 4.0, 1.0),
        Primitive::cube(size),
        material::HOME,
    );
}

pub fn draw_cloud(parent: Scope, cloud: &Cloud, list: &mut DrawList) {
    let c = cloud.center;
    list.push(
        parent.translate(c.x, c.y, c.z),
        Primitive::Sphere {
            radius: cloud.radius,
            slices: 16,
            stacks: 16,
        },
        material::CLOUD,
    );
}

pub fn draw_clouds(parent: Scope, clouds: &[Cloud], list: &mut DrawList) {
    for cloud in clouds {
        draw_cloud(parent, cloud, list);
    }
}

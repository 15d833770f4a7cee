use glam::Vec4;

/// Surface reflectance, in the classic ambient/diffuse/specular split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub shininess: f32,
}

impl Material {
    pub const fn new(ambient: Vec4, diffuse: Vec4, specular: Vec4, shininess: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
        }
    }
}

impl Default for Material {
    /// Plain grey, no highlight.
    fn default() -> Self {
        GLASS
    }
}

pub const HOME: Material = Material::new(
    Vec4::new(0.65, 0.35, 0.25, 0.0),
    Vec4::new(0.75, 0.45, 0.35, 1.0),
    Vec4::new(0.8, 0.8, 0.8, 1.0),
    10.0,
);

pub const CAR: Material = Material::new(
    Vec4::new(0.1, 0.1, 0.1, 0.0),
    Vec4::new(0.8, 0.2, 0.2, 1.0),
    Vec4::new(0.9, 0.9, 0.9, 0.0),
    25.0,
);

/// Windows on the house and the cars.
pub const GLASS: Material = Material::new(
    Vec4::new(0.2, 0.2, 0.2, 1.0),
    Vec4::new(0.8, 0.8, 0.8, 1.0),
    Vec4::new(0.0, 0.0, 0.0, 1.0),
    0.0,
);

pub const TIRE: Material = Material::new(
    Vec4::new(0.05, 0.05, 0.05, 1.0),
    Vec4::new(0.2, 0.2, 0.2, 1.0),
    Vec4::new(0.1, 0.1, 0.1, 1.0),
    5.0,
);

pub const CLOUD: Material = Material::new(
    Vec4::new(0.6, 0.6, 0.6, 1.0),
    Vec4::new(1.0, 1.0, 1.0, 1.0),
    Vec4::new(0.0, 0.0, 0.0, 1.0),
    0.0,
);

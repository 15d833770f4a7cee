use glam::{Mat4, Vec3};

/// Camera circling a center point at a clamped distance.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub center: Vec3,
    pub up: Vec3,
    /// Azimuth in radians, never wrapped
    angle: f32,
    distance: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitCamera {
    /// Starts halfway between the distance bounds.
    pub fn new(center: Vec3, up: Vec3, min_distance: f32, max_distance: f32, angle: f32) -> Self {
        Self::with_distance(
            center,
            up,
            min_distance,
            max_distance,
            (min_distance + max_distance) / 2.0,
            angle,
        )
    }

    pub fn with_distance(
        center: Vec3,
        up: Vec3,
        min_distance: f32,
        max_distance: f32,
        distance: f32,
        angle: f32,
    ) -> Self {
        Self {
            center,
            up,
            angle,
            distance,
            min_distance,
            max_distance,
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn distance_bounds(&self) -> (f32, f32) {
        (self.min_distance, self.max_distance)
    }

    pub fn eye(&self) -> Vec3 {
        self.center + self.distance * Vec3::new(self.angle.sin(), 0.0, self.angle.cos())
    }

    /// View matrix looking from the eye at `target`.
    pub fn view(&self, target: Vec3) -> Mat4 {
        Mat4::look_at_rh(self.eye(), target, self.up)
    }

    pub fn rotate(&mut self, delta: f32) {
        self.angle += delta;
    }

    pub fn move_by(&mut self, delta: f32) {
        let candidate = self.distance + delta;
        self.distance = candidate.min(self.max_distance).max(self.min_distance);
    }
}

/// Perspective projection parameters; the aspect ratio comes from the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Perspective {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 4.0,
            far: 40.0,
        }
    }
}

impl Perspective {
    pub fn aspect(width: u32, height: u32) -> f32 {
        if width == 0 || height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        }
    }

    pub fn matrix(&self, width: u32, height: u32) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            Self::aspect(width, height),
            self.near,
            self.far,
        )
    }
}

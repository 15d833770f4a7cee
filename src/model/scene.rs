use glam::{Vec3, Vec4};
use std::f32::consts::FRAC_PI_4;

use crate::model::{Car, Light, OrbitCamera};

/// Car body height is 0.5, wheels add 0.1
const CAR_HEIGHT: f32 = (0.5 + 0.1) / 2.0;

/// Radians the secondary light turns every tick
pub const LIGHT_STEP: f64 = 0.05;

pub const BACKGROUND: Vec4 = Vec4::new(0.1, 0.1, 0.1, 0.0);
pub const GLOBAL_AMBIENT: Vec4 = Vec4::new(0.2, 0.2, 0.2, 1.0);

/// A static cloud: center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub center: Vec3,
    pub radius: f32,
}

pub const CLOUDS: [Cloud; 3] = [
    Cloud { center: Vec3::new(5.0, 8.0, 0.0), radius: 1.0 },
    Cloud { center: Vec3::new(-8.0, 10.0, 3.0), radius: 1.5 },
    Cloud { center: Vec3::new(-3.0, 6.0, -5.0), radius: 1.2 },
];

/// All mutable state of the scene. The house and clouds are constants and
/// live with the drawing code.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub car: Car,
    pub parked_car: Car,
    pub camera: OrbitCamera,
    pub main_light: Light,
    pub secondary_light: Light,
    ticks: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            car: Car::new(Vec3::new(0.0, CAR_HEIGHT, 2.5), 2.4, 4.0),
            parked_car: Car::stationary(Vec3::new(-8.0, CAR_HEIGHT, 2.5), 4.0),
            camera: OrbitCamera::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y, 3.0, 15.0, FRAC_PI_4),
            main_light: Light::positioned(
                Vec4::new(0.2, 0.2, 0.2, 0.0),
                Vec4::new(0.8, 0.8, 0.8, 0.0),
                Vec4::new(1.0, 1.0, 1.0, 1.0),
                Vec4::new(0.0, 6.0, 3.0, 0.0),
            ),
            secondary_light: Light::rotating(
                Vec4::new(0.0, 0.0, 0.0, 1.0),
                Vec4::new(0.4, 0.4, 0.0, 0.5),
                Vec4::new(0.0, 0.0, 0.0, 1.0),
                Vec4::new(0.0, 2.0, 0.0, 1.0),
                6.0,
                0.0,
            ),
            ticks: 0,
        }
    }

    /// One animation step: drive the cars and turn the secondary light.
    pub fn tick(&mut self) {
        self.car.advance();
        self.parked_car.advance();
        self.secondary_light.rotate(LIGHT_STEP);
        self.ticks += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

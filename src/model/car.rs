use glam::Vec3;

/// How a car moves when the frame loop ticks it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Circles the origin, gaining `speed` degrees of angle per tick
    Orbiting { speed: f64 },
    /// Parked; ticks leave it where it was built
    Stationary,
}

/// A car driving on a horizontal circle around the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    position: Vec3,
    /// Degrees travelled along the orbit. Unbounded; f64 so a step is
    /// never rounded away.
    angle: f64,
    radius: f32,
    motion: Motion,
}

impl Car {
    pub fn new(position: Vec3, speed: f64, radius: f32) -> Self {
        Self {
            position,
            angle: 0.0,
            radius,
            motion: Motion::Orbiting { speed },
        }
    }

    pub fn stationary(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            angle: 0.0,
            radius,
            motion: Motion::Stationary,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Advance one tick along the orbit. Height is never touched.
    pub fn advance(&mut self) {
        let Motion::Orbiting { speed } = self.motion else {
            return;
        };
        self.angle += speed;
        let theta = self.angle.to_radians();
        self.position.x = self.radius * theta.cos() as f32;
        self.position.z = self.radius * theta.sin() as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn moving_car() -> Car {
        Car::new(Vec3::new(0.0, 0.3, 2.5), 2.4, 4.0)
    }

    fn check_orbit(speed: f64, ticks: u32) {
        let mut car = Car::new(Vec3::new(0.0, 0.3, 2.5), speed, 4.0);
        for n in 1..=ticks {
            car.advance();
            let theta = (n as f64 * speed).to_radians();
            let p = car.position();
            assert!((p.x - 4.0 * theta.cos() as f32).abs() < EPS, "x after {n} ticks at {speed}");
            assert!((p.z - 4.0 * theta.sin() as f32).abs() < EPS, "z after {n} ticks at {speed}");
            assert_eq!(p.y, 0.3);
        }
    }

    #[test]
    fn test_position_follows_angle() {
        check_orbit(2.4, 40);
    }

    #[test]
    fn test_position_follows_angle_other_speeds() {
        check_orbit(7.0, 200);
        check_orbit(-3.3, 200);
        check_orbit(0.0, 10);
    }

    #[test]
    fn test_step_survives_days_of_ticking() {
        let mut car = moving_car();
        // about five days of 60 ticks per second
        for start in [2.4 * 7e6, 67_108_864.0, 2.4 * 3e7] {
            car.angle = start;
            car.advance();
            assert!((car.angle() - start - 2.4).abs() < 1e-6, "step lost at {start}");
            let theta = car.angle().to_radians();
            assert!((car.position().x - 4.0 * theta.cos() as f32).abs() < EPS);
        }
    }

    #[test]
    fn test_full_orbit_after_150_ticks() {
        let mut car = moving_car();
        for _ in 0..150 {
            car.advance();
        }
        assert!((car.angle() - 360.0).abs() < 1e-2);
        let p = car.position();
        assert!((p.x - 4.0).abs() < EPS);
        assert!(p.z.abs() < EPS);
        assert_eq!(p.y, 0.3);
    }

    #[test]
    fn test_initial_position_is_kept_until_first_tick() {
        let car = moving_car();
        assert_eq!(car.position(), Vec3::new(0.0, 0.3, 2.5));
        assert_eq!(car.angle(), 0.0);
    }

    #[test]
    fn test_stationary_car_never_moves() {
        let start = Vec3::new(-8.0, 0.3, 2.5);
        let mut car = Car::stationary(start, 4.0);
        for _ in 0..1000 {
            car.advance();
        }
        assert_eq!(car.position(), start);
        assert_eq!(car.angle(), 0.0);
        assert_eq!(car.motion, Motion::Stationary);
    }
}

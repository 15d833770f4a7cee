use glam::Vec4;

/// Where a light sits. The fourth position component follows the
/// homogeneous convention: `0.0` is a direction, `1.0` a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Positioned(Vec4),
    /// Orbits `center` in the horizontal plane; `angle` is in radians and
    /// unbounded, hence f64.
    Rotating { center: Vec4, distance: f32, angle: f64 },
}

/// Everything a backend needs to bind one light to a slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightParams {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub position: Vec4,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    placement: Placement,
}

impl Light {
    pub fn positioned(ambient: Vec4, diffuse: Vec4, specular: Vec4, position: Vec4) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            placement: Placement::Positioned(position),
        }
    }

    pub fn rotating(
        ambient: Vec4,
        diffuse: Vec4,
        specular: Vec4,
        center: Vec4,
        distance: f32,
        angle: f64,
    ) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            placement: Placement::Rotating {
                center,
                distance,
                angle,
            },
        }
    }

    /// Current angle of a rotating light, `None` for a fixed one.
    pub fn angle(&self) -> Option<f64> {
        match self.placement {
            Placement::Positioned(_) => None,
            Placement::Rotating { angle, .. } => Some(angle),
        }
    }

    pub fn position(&self) -> Vec4 {
        match self.placement {
            Placement::Positioned(position) => position,
            Placement::Rotating {
                center,
                distance,
                angle,
            } => Vec4::new(
                center.x + distance * angle.sin() as f32,
                center.y,
                center.z + distance * angle.cos() as f32,
                center.w,
            ),
        }
    }

    /// Spin a rotating light by `delta` radians. Fixed lights ignore it.
    pub fn rotate(&mut self, delta: f64) {
        if let Placement::Rotating { angle, .. } = &mut self.placement {
            *angle += delta;
        }
    }

    pub fn params(&self) -> LightParams {
        LightParams {
            ambient: self.ambient,
            diffuse: self.diffuse,
            specular: self.specular,
            position: self.position(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secondary() -> Light {
        Light::rotating(
            Vec4::new(0.0, 0.0, 0.0, 1.0),
            Vec4::new(0.4, 0.4, 0.0, 0.5),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
            Vec4::new(0.0, 2.0, 0.0, 1.0),
            6.0,
            0.0,
        )
    }

    #[test]
    fn test_rotating_light_two_steps() {
        let mut light = secondary();
        light.rotate(0.05);
        light.rotate(0.05);
        let angle = light.angle().unwrap_or_default();
        assert!((angle - 0.10).abs() < 1e-6);

        let p = light.params().position;
        assert!((p.x - 6.0 * 0.10f32.sin()).abs() < 1e-5);
        assert!((p.z - 6.0 * 0.10f32.cos()).abs() < 1e-5);
        assert_eq!(p.y, 2.0);
        assert_eq!(p.w, 1.0);
    }

    #[test]
    fn test_rotating_light_after_k_steps() {
        let mut light = secondary();
        let delta = 0.05;
        for k in 1..=100 {
            light.rotate(delta);
            let theta = k as f64 * delta;
            let p = light.position();
            assert!((p.x - 6.0 * theta.sin() as f32).abs() < 1e-4, "x after {k} steps");
            assert!((p.z - 6.0 * theta.cos() as f32).abs() < 1e-4, "z after {k} steps");
            assert_eq!((p.y, p.w), (2.0, 1.0));
        }
    }

    #[test]
    fn test_rotation_step_survives_large_angles() {
        for start in [1_048_576.0, 2.6e7] {
            let mut light = secondary();
            light.rotate(start);
            light.rotate(0.05);
            let angle = light.angle().unwrap_or_default();
            assert!((angle - start - 0.05).abs() < 1e-6, "step lost at {start}");
            let p = light.position();
            assert!((p.x - 6.0 * angle.sin() as f32).abs() < 1e-4);
        }
    }

    #[test]
    fn test_positioned_light_ignores_rotation() {
        let position = Vec4::new(0.0, 6.0, 3.0, 0.0);
        let mut light = Light::positioned(Vec4::splat(0.2), Vec4::splat(0.8), Vec4::ONE, position);
        light.rotate(1.0);
        assert_eq!(light.position(), position);
        assert_eq!(light.angle(), None);
    }
}

/// Directional input handling for the orbit camera
use crate::model::OrbitCamera;

/// Radians per key press
pub const ROTATE_STEP: f32 = 0.1;
/// Distance units per key press
pub const ZOOM_STEP: f32 = 0.1;

/// The keys the scene reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKey {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraAction {
    Rotate(f32),
    Zoom(f32),
}

impl SpecialKey {
    pub fn action(self) -> CameraAction {
        match self {
            SpecialKey::Right => CameraAction::Rotate(ROTATE_STEP),
            SpecialKey::Left => CameraAction::Rotate(-ROTATE_STEP),
            SpecialKey::Up => CameraAction::Zoom(-ZOOM_STEP),
            SpecialKey::Down => CameraAction::Zoom(ZOOM_STEP),
        }
    }
}

impl CameraAction {
    pub fn apply(self, camera: &mut OrbitCamera) {
        match self {
            CameraAction::Rotate(delta) => camera.rotate(delta),
            CameraAction::Zoom(delta) => camera.move_by(delta),
        }
    }
}

/// Apply a key press to the camera. Returns true when a redraw is needed.
pub fn handle_special_key(camera: &mut OrbitCamera, key: Option<SpecialKey>) -> bool {
    match key {
        Some(key) => {
            key.action().apply(camera);
            true
        }
        None => false,
    }
}

pub mod native {
    use super::SpecialKey;
    use winit::event::{ElementState, KeyEvent};
    use winit::keyboard::{KeyCode, PhysicalKey};

    impl SpecialKey {
        pub fn from_key_code(code: KeyCode) -> Option<Self> {
            match code {
                KeyCode::ArrowLeft => Some(SpecialKey::Left),
                KeyCode::ArrowRight => Some(SpecialKey::Right),
                KeyCode::ArrowUp => Some(SpecialKey::Up),
                KeyCode::ArrowDown => Some(SpecialKey::Down),
                _ => None,
            }
        }
    }

    /// Presses (including auto-repeat) of arrow keys; releases are ignored.
    pub fn special_key(event: &KeyEvent) -> Option<SpecialKey> {
        if event.state != ElementState::Pressed {
            return None;
        }
        match event.physical_key {
            PhysicalKey::Code(code) => SpecialKey::from_key_code(code),
            PhysicalKey::Unidentified(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use winit::keyboard::KeyCode;

    fn camera() -> OrbitCamera {
        OrbitCamera::with_distance(Vec3::new(0.0, 5.0, 0.0), Vec3::Y, 3.0, 15.0, 9.0, 0.0)
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(SpecialKey::Right.action(), CameraAction::Rotate(0.1));
        assert_eq!(SpecialKey::Left.action(), CameraAction::Rotate(-0.1));
        assert_eq!(SpecialKey::Up.action(), CameraAction::Zoom(-0.1));
        assert_eq!(SpecialKey::Down.action(), CameraAction::Zoom(0.1));
    }

    #[test]
    fn test_keys_drive_camera() {
        let mut cam = camera();
        assert!(handle_special_key(&mut cam, Some(SpecialKey::Right)));
        assert!((cam.angle() - 0.1).abs() < 1e-6);
        assert!(handle_special_key(&mut cam, Some(SpecialKey::Up)));
        assert!((cam.distance() - 8.9).abs() < 1e-5);
        assert!(handle_special_key(&mut cam, Some(SpecialKey::Down)));
        assert!((cam.distance() - 9.0).abs() < 1e-5);
        assert!(handle_special_key(&mut cam, Some(SpecialKey::Left)));
        assert!(cam.angle().abs() < 1e-6);
    }

    #[test]
    fn test_zoom_respects_bounds() {
        let mut cam = camera();
        for _ in 0..500 {
            handle_special_key(&mut cam, Some(SpecialKey::Up));
        }
        assert_eq!(cam.distance(), 3.0);
        for _ in 0..500 {
            handle_special_key(&mut cam, Some(SpecialKey::Down));
        }
        assert_eq!(cam.distance(), 15.0);
    }

    #[test]
    fn test_unhandled_keys_are_ignored() {
        let mut cam = camera();
        let before = cam.clone();
        assert!(!handle_special_key(&mut cam, SpecialKey::from_key_code(KeyCode::KeyW)));
        assert!(!handle_special_key(&mut cam, SpecialKey::from_key_code(KeyCode::Escape)));
        assert_eq!(cam, before);
        assert_eq!(SpecialKey::from_key_code(KeyCode::ArrowUp), Some(SpecialKey::Up));
    }
}

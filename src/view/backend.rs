//! The contract between the frame loop and whatever puts pixels on screen.
//!
//! Calls arrive in display order for every frame. A backend is free to
//! buffer them and do the real work in [`RenderBackend::swap_buffers`].

use glam::{Mat4, Vec4};

use crate::model::{Light, LightParams};
use crate::view::shapes::DrawCommand;

/// Number of light slots a backend exposes.
pub const MAX_LIGHT_SLOTS: usize = 8;

/// Index of a backend light slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightSlot(u8);

impl LightSlot {
    pub const LIGHT0: LightSlot = LightSlot(0);
    pub const LIGHT1: LightSlot = LightSlot(1);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Depth comparison used when depth testing is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthFunc {
    Less,
}

pub trait RenderBackend {
    type Error;

    /// Current drawable size in pixels.
    fn viewport(&self) -> (u32, u32);

    /// Clear color and depth, starting a new frame.
    fn clear(&mut self, color: Vec4);

    fn set_projection(&mut self, projection: Mat4);

    fn set_view(&mut self, view: Mat4);

    /// Ambient term applied to every surface regardless of lights.
    fn set_light_model_ambient(&mut self, ambient: Vec4);

    fn enable_lighting(&mut self);

    fn set_light(&mut self, slot: LightSlot, params: LightParams);

    fn enable_light(&mut self, slot: LightSlot);

    /// Bind `light` to `slot` and switch the slot on.
    fn setup_light(&mut self, slot: LightSlot, light: &Light) {
        self.set_light(slot, light.params());
        self.enable_light(slot);
    }

    fn enable_depth_test(&mut self, func: DepthFunc);

    fn draw(&mut self, command: DrawCommand);

    /// Present the frame.
    fn swap_buffers(&mut self) -> Result<(), Self::Error>;
}

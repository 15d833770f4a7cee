// CONTROLLER: input and the frame loop
pub mod frame_loop;
pub mod input;

pub use frame_loop::{FrameLoop, FrameStats, TickClock};
pub use input::{CameraAction, SpecialKey};

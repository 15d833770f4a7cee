// VIEW: drawing procedures and the wgpu backend
pub mod backend;
pub mod gpu_init;
pub mod hud;
pub mod primitives;
pub mod render;
pub mod shapes;

pub use backend::{DepthFunc, LightSlot, RenderBackend};
pub use gpu_init::GpuContext;
pub use render::Renderer;
pub use shapes::{DrawCommand, DrawList, Primitive, Scope};

// MODEL: scene state, no rendering types
pub mod camera;
pub mod car;
pub mod light;
pub mod material;
pub mod scene;

pub use camera::{OrbitCamera, Perspective};
pub use car::{Car, Motion};
pub use light::{Light, LightParams, Placement};
pub use material::Material;
pub use scene::{Cloud, Scene, CLOUDS};

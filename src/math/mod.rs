pub mod vec3;
pub mod quat;
pub mod matrix;
pub mod transform;

pub use vec3::Vec3;
pub use quat::Quat;
pub use matrix::Mat4;
pub use transform::Transform;

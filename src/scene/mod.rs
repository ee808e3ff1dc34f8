//! Rendering surface abstraction and the surfaces shipped with the crate

pub mod surface;
pub mod recorder;

pub use surface::{Color, Cone, EntityId, MeshKind, NullSurface, RenderSurface};
pub use recorder::{EntityRecord, Primitive, SceneRecorder, INSTANCE_STRIDE};

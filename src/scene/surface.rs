//! The rendering surface the growth simulation draws through.
//!
//! The simulation never talks to a GPU. It creates opaque entities, gives
//! them a primitive, a diffuse colour and a transform, and destroys them
//! when branches are pruned or leaves reach the ground.

use serde::{Deserialize, Serialize};
use crate::math::Transform;

/// Opaque handle to a visual entity owned by a [`RenderSurface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Linear RGB colour, components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const DARK_GRAY: Color = Color::new(0.5, 0.5, 0.5);
    pub const DARK_GREEN: Color = Color::new(0.0, 0.5, 0.0);
    pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn lerp(&self, other: &Color, t: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }
}

/// Truncated cone centred on the origin, axis along local +Y
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cone {
    pub bottom_radius: f32,
    pub top_radius: f32,
    pub length: f32,
    pub rings: u32,
    pub slices: u32,
}

/// Meshes loaded by the host rather than generated from parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeshKind {
    Leaf,
}

/// Host scene graph the simulation attaches geometry, materials and transforms to
pub trait RenderSurface {
    /// Create an entity under `parent`, or under the scene root when `None`
    fn create_entity(&mut self, parent: Option<EntityId>) -> EntityId;

    /// Destroy an entity. Unknown ids are ignored.
    fn destroy_entity(&mut self, entity: EntityId);

    /// Attach or resize the cone primitive of an entity
    fn set_cone(&mut self, entity: EntityId, cone: Cone);

    fn set_mesh(&mut self, entity: EntityId, mesh: MeshKind);

    fn set_diffuse(&mut self, entity: EntityId, color: Color);

    fn set_transform(&mut self, entity: EntityId, transform: &Transform);
}

/// Surface that only hands out ids
#[derive(Debug, Default)]
pub struct NullSurface {
    next_id: u64,
}

impl NullSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderSurface for NullSurface {
    fn create_entity(&mut self, _parent: Option<EntityId>) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }

    fn destroy_entity(&mut self, _entity: EntityId) {}

    fn set_cone(&mut self, _entity: EntityId, _cone: Cone) {}

    fn set_mesh(&mut self, _entity: EntityId, _mesh: MeshKind) {}

    fn set_diffuse(&mut self, _entity: EntityId, _color: Color) {}

    fn set_transform(&mut self, _entity: EntityId, _transform: &Transform) {}
}

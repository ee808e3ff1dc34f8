use std::collections::BTreeMap;
use crate::math::Transform;
use super::surface::{Color, Cone, EntityId, MeshKind, RenderSurface};

/// Floats per entity in [`SceneRecorder::instance_data`]
pub const INSTANCE_STRIDE: usize = 23;

/// What an entity draws
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    None,
    Cone(Cone),
    Mesh(MeshKind),
}

impl Primitive {
    fn kind_code(&self) -> f32 {
        match self {
            Primitive::None => 0.0,
            Primitive::Cone(_) => 1.0,
            Primitive::Mesh(MeshKind::Leaf) => 2.0,
        }
    }
}

/// Latest recorded state of one entity
#[derive(Debug, Clone, Copy)]
pub struct EntityRecord {
    pub parent: Option<EntityId>,
    pub primitive: Primitive,
    pub color: Color,
    pub transform: Transform,
}

/// Surface that remembers the latest state of every live entity.
///
/// Used by the wasm facade to hand instance data to the JS renderer, and
/// by tests to inspect what the simulation drew.
#[derive(Debug, Default)]
pub struct SceneRecorder {
    entities: BTreeMap<EntityId, EntityRecord>,
    next_id: u64,
    destroyed: u64,
}

impl SceneRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, entity: EntityId) -> Option<&EntityRecord> {
        self.entities.get(&entity)
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains_key(&entity)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of entities destroyed since creation
    pub fn destroyed(&self) -> u64 {
        self.destroyed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &EntityRecord)> {
        self.entities.iter()
    }

    /// Flatten drawable entities for GPU upload.
    /// Format: kind(1) + rgb(3) + cone bottom/top/length(3) + model matrix(16)
    pub fn instance_data(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.entities.len() * INSTANCE_STRIDE);

        for record in self.entities.values() {
            let (bottom, top, length) = match record.primitive {
                Primitive::None => continue,
                Primitive::Cone(c) => (c.bottom_radius, c.top_radius, c.length),
                Primitive::Mesh(_) => (0.0, 0.0, 0.0),
            };
            data.push(record.primitive.kind_code());
            data.extend_from_slice(&[record.color.r, record.color.g, record.color.b]);
            data.extend_from_slice(&[bottom, top, length]);
            data.extend_from_slice(record.transform.to_matrix().as_slice());
        }

        data
    }

    fn record_mut(&mut self, entity: EntityId) -> Option<&mut EntityRecord> {
        self.entities.get_mut(&entity)
    }
}

impl RenderSurface for SceneRecorder {
    fn create_entity(&mut self, parent: Option<EntityId>) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        self.entities.insert(
            id,
            EntityRecord {
                parent,
                primitive: Primitive::None,
                color: Color::default(),
                transform: Transform::default(),
            },
        );
        id
    }

    fn destroy_entity(&mut self, entity: EntityId) {
        if self.entities.remove(&entity).is_some() {
            self.destroyed += 1;
        }
    }

    fn set_cone(&mut self, entity: EntityId, cone: Cone) {
        if let Some(record) = self.record_mut(entity) {
            record.primitive = Primitive::Cone(cone);
        }
    }

    fn set_mesh(&mut self, entity: EntityId, mesh: MeshKind) {
        if let Some(record) = self.record_mut(entity) {
            record.primitive = Primitive::Mesh(mesh);
        }
    }

    fn set_diffuse(&mut self, entity: EntityId, color: Color) {
        if let Some(record) = self.record_mut(entity) {
            record.color = color;
        }
    }

    fn set_transform(&mut self, entity: EntityId, transform: &Transform) {
        if let Some(record) = self.record_mut(entity) {
            record.transform = *transform;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    fn cone() -> Cone {
        Cone {
            bottom_radius: 0.03,
            top_radius: 0.02,
            length: 0.4,
            rings: 20,
            slices: 10,
        }
    }

    #[test]
    fn test_records_latest_state() {
        let mut scene = SceneRecorder::new();
        let id = scene.create_entity(None);
        scene.set_cone(id, cone());
        scene.set_diffuse(id, Color::DARK_GRAY);
        scene.set_transform(id, &Transform::from_translation(Vec3::UP));

        let record = scene.get(id).unwrap();
        assert_eq!(record.primitive, Primitive::Cone(cone()));
        assert_eq!(record.color, Color::DARK_GRAY);
        assert_eq!(record.transform.translation, Vec3::UP);
    }

    #[test]
    fn test_destroy_removes_entity() {
        let mut scene = SceneRecorder::new();
        let id = scene.create_entity(None);
        scene.destroy_entity(id);
        scene.destroy_entity(id);

        assert!(!scene.contains(id));
        assert_eq!(scene.destroyed(), 1);
        // Writes to a destroyed entity are ignored
        scene.set_diffuse(id, Color::RED);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_instance_data_layout() {
        let mut scene = SceneRecorder::new();
        let branch = scene.create_entity(None);
        scene.set_cone(branch, cone());
        let leaf = scene.create_entity(Some(branch));
        scene.set_mesh(leaf, MeshKind::Leaf);
        scene.set_transform(leaf, &Transform::from_translation(Vec3::new(1.0, 2.0, 3.0)));
        // No primitive yet: skipped
        scene.create_entity(None);

        let data = scene.instance_data();
        assert_eq!(data.len(), 2 * INSTANCE_STRIDE);
        assert_eq!(data[0], 1.0);
        assert_eq!(data[6], 0.4);
        let leaf_row = &data[INSTANCE_STRIDE..];
        assert_eq!(leaf_row[0], 2.0);
        // Translation column of the model matrix
        assert_eq!(&leaf_row[19..22], &[1.0, 2.0, 3.0]);
    }
}

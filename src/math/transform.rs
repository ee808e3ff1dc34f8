use serde::{Deserialize, Serialize};
use super::{Mat4, Quat, Vec3};

/// Translation, rotation and uniform scale of a scene entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Map a point from local space into the parent space
    pub fn map(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation.rotate(point.scale(self.scale))
    }

    /// Column-major model matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::translation(self.translation.x, self.translation.y, self.translation.z)
            .mul(&Mat4::rotation(self.rotation))
            .mul(&Mat4::scale(self.scale, self.scale, self.scale))
    }
}

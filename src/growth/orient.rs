//! Placement of branches and leaves relative to the axis they grow from

use crate::math::{Quat, Vec3};

/// Point something attaches to, and the axis it grows from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub point: Vec3,
    pub direction: Vec3,
}

impl Anchor {
    /// Anchor at the end of a segment. A zero-length segment points up.
    pub fn from_segment(start: Vec3, end: Vec3) -> Self {
        Self {
            point: end,
            direction: (end - start).normalize_or(Vec3::UP),
        }
    }
}

/// Axis to lean around when tipping local +Y towards `direction`.
/// A vertical direction has no such axis; X is used instead.
pub fn lean_axis(direction: Vec3) -> Vec3 {
    let axis = Vec3::UP.cross(&direction);
    if axis.is_null() {
        Vec3::RIGHT
    } else {
        axis.normalize()
    }
}

/// Tip local +Y by `lean` degrees around [`lean_axis`], then spin it by
/// `azimuth` degrees around `direction`.
///
/// A lean equal to the angle between +Y and `direction` lands exactly on
/// `direction`; anything past that opens the result away from it.
pub fn lean_and_spin(direction: Vec3, lean: f32, azimuth: f32) -> Quat {
    let direction = direction.normalize_or(Vec3::UP);
    Quat::from_axes_and_angles(
        lean_axis(direction),
        lean.to_radians(),
        direction,
        azimuth.to_radians(),
    )
}

/// Degrees between +Y and `direction`
pub fn tilt_from_vertical(direction: Vec3) -> f32 {
    Vec3::UP.angle_between(&direction.normalize_or(Vec3::UP)).to_degrees()
}

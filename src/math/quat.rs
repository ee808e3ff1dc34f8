use std::ops::Mul;
use serde::{Deserialize, Serialize};
use super::Vec3;

/// Unit quaternion for orientations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Quat = Quat { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Rotation of `angle` radians around `axis`. A null axis yields the identity.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        if axis.is_null() {
            return Self::IDENTITY;
        }
        let axis = axis.normalize();
        let (s, c) = (angle * 0.5).sin_cos();
        Self {
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
            w: c,
        }
    }

    /// Rotation around `axis1` followed by rotation around `axis2`
    pub fn from_axes_and_angles(axis1: Vec3, angle1: f32, axis2: Vec3, angle2: f32) -> Self {
        let q1 = Self::from_axis_angle(axis1, angle1);
        let q2 = Self::from_axis_angle(axis2, angle2);
        (q2 * q1).normalize()
    }

    /// Shortest rotation taking direction `from` onto direction `to`
    pub fn from_rotation_arc(from: Vec3, to: Vec3) -> Self {
        let from = from.normalize_or(Vec3::UP);
        let to = to.normalize_or(Vec3::UP);
        let axis = from.cross(&to);
        if axis.is_null() {
            if from.dot(&to) > 0.0 {
                return Self::IDENTITY;
            }
            // Antiparallel: any perpendicular axis will do
            let helper = if from.x.abs() < 0.9 { Vec3::RIGHT } else { Vec3::FORWARD };
            return Self::from_axis_angle(from.cross(&helper), std::f32::consts::PI);
        }
        Self::from_axis_angle(axis, from.angle_between(&to))
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
                w: self.w / len,
            }
        } else {
            Self::IDENTITY
        }
    }

    pub fn conjugate(&self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    /// Rotate a vector by this quaternion
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        // v' = v + 2w(q x v) + 2(q x (q x v))
        let q = Vec3::new(self.x, self.y, self.z);
        let t = q.cross(&v).scale(2.0);
        v + t.scale(self.w) + q.cross(&t)
    }
}

impl Mul for Quat {
    type Output = Self;
    fn mul(self, o: Self) -> Self {
        Self {
            w: self.w * o.w - self.x * o.x - self.y * o.y - self.z * o.z,
            x: self.w * o.x + self.x * o.w + self.y * o.z - self.z * o.y,
            y: self.w * o.y - self.x * o.z + self.y * o.w + self.z * o.x,
            z: self.w * o.z + self.x * o.y - self.y * o.x + self.z * o.w,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn close(a: Vec3, b: Vec3) -> bool {
        a.distance(&b) < 1e-4
    }

    #[test]
    fn test_axis_angle_rotation() {
        let q = Quat::from_axis_angle(Vec3::FORWARD, FRAC_PI_2);
        assert!(close(q.rotate(Vec3::RIGHT), Vec3::UP));
    }

    #[test]
    fn test_null_axis_is_identity() {
        let q = Quat::from_axis_angle(Vec3::ZERO, 1.0);
        assert_eq!(q, Quat::IDENTITY);
        assert!(close(q.rotate(Vec3::UP), Vec3::UP));
    }

    #[test]
    fn test_axes_and_angles_order() {
        // Tip up onto +Z, then spin around Y: +Z ends up on +X
        let q = Quat::from_axes_and_angles(Vec3::RIGHT, FRAC_PI_2, Vec3::UP, FRAC_PI_2);
        assert!(close(q.rotate(Vec3::UP), Vec3::RIGHT));
    }

    #[test]
    fn test_rotation_arc() {
        let to = Vec3::new(1.0, 1.0, 0.0).normalize();
        let q = Quat::from_rotation_arc(Vec3::UP, to);
        assert!(close(q.rotate(Vec3::UP), to));

        assert_eq!(Quat::from_rotation_arc(Vec3::UP, Vec3::UP), Quat::IDENTITY);

        let flipped = Quat::from_rotation_arc(Vec3::UP, -Vec3::UP);
        assert!(close(flipped.rotate(Vec3::UP), -Vec3::UP));
    }

    #[test]
    fn test_rotation_preserves_length() {
        let q = Quat::from_axis_angle(Vec3::new(0.3, 0.2, 0.9), PI / 3.0);
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert!((q.rotate(v).length() - v.length()).abs() < 1e-4);
        assert!(close(q.conjugate().rotate(q.rotate(v)), v));
    }
}

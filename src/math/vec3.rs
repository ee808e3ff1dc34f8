use std::ops::{Add, Neg, Sub};
use serde::{Deserialize, Serialize};

/// Below this squared length a vector has no usable direction
const NULL_EPSILON: f32 = 1e-12;

/// Point or direction in tree space, y up
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const RIGHT: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const FORWARD: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.x), f(self.y), f(self.z))
    }

    fn zip(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self::new(f(self.x, other.x), f(self.y, other.y), f(self.z, other.z))
    }

    pub fn length_squared(&self) -> f32 {
        self.dot(self)
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn is_null(&self) -> bool {
        self.length_squared() <= NULL_EPSILON
    }

    /// A zero vector comes back unchanged
    pub fn normalize(&self) -> Self {
        match self.length() {
            len if len > 0.0 => self.map(|c| c / len),
            _ => *self,
        }
    }

    /// Unit vector, or `fallback` when this one has no direction
    pub fn normalize_or(&self, fallback: Vec3) -> Self {
        if self.is_null() {
            fallback
        } else {
            self.normalize()
        }
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Radians, in `[0, PI]`
    pub fn angle_between(&self, other: &Self) -> f32 {
        self.normalize().dot(&other.normalize()).clamp(-1.0, 1.0).acos()
    }

    pub fn scale(&self, s: f32) -> Self {
        self.map(|c| c * s)
    }

    pub fn distance(&self, other: &Self) -> f32 {
        (*self - *other).length()
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        self.zip(other, |a, b| a + b)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        self.zip(other, |a, b| a - b)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        self.map(|c| -c)
    }
}

use std::ops::Mul;

use nalgebra::{Matrix3, Rotation3, Unit, Vector3};
use serde::{Deserialize, Serialize};

/// A vector (or point) in 3D Euclidean space.
pub type Vec3 = Vector3<f64>;

/// A 3x3 matrix, used for orientations and linear parts of transforms.
pub type Mat3 = Matrix3<f64>;

/// An affine transform `x' = linear * x + translation`.
///
/// Rigid motions are the common case. Several consumers (half-space
/// transformation, support mapping) assume the linear part is a pure
/// rotation; that assumption is documented where it matters and is not
/// checked at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3 {
    pub linear: Mat3,
    pub translation: Vec3,
}

impl Transform3 {
    pub fn identity() -> Self {
        Self {
            linear: Mat3::identity(),
            translation: Vec3::zeros(),
        }
    }

    pub fn from_parts(linear: Mat3, translation: Vec3) -> Self {
        Self {
            linear,
            translation,
        }
    }

    pub fn from_translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            linear: Mat3::identity(),
            translation: Vec3::new(dx, dy, dz),
        }
    }

    /// Rotation around the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        Self::rotation_axis_angle(Vec3::x(), angle)
    }

    /// Rotation around the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        Self::rotation_axis_angle(Vec3::y(), angle)
    }

    /// Rotation around the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        Self::rotation_axis_angle(Vec3::z(), angle)
    }

    /// Rotation around an arbitrary axis by `angle` radians.
    ///
    /// A zero-length axis yields the identity.
    pub fn rotation_axis_angle(axis: Vec3, angle: f64) -> Self {
        let linear = match Unit::try_new(axis, 1e-15) {
            Some(axis) => *Rotation3::from_axis_angle(&axis, angle).matrix(),
            None => Mat3::identity(),
        };
        Self {
            linear,
            translation: Vec3::zeros(),
        }
    }

    /// Same transform with its translation replaced.
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn linear(&self) -> &Mat3 {
        &self.linear
    }

    pub fn translation(&self) -> &Vec3 {
        &self.translation
    }

    /// True when the linear part is exactly the identity matrix.
    pub fn is_translation_only(&self) -> bool {
        self.linear == Mat3::identity()
    }

    /// Transform a point (applies translation).
    pub fn transform_point(&self, p: &Vec3) -> Vec3 {
        self.linear * p + self.translation
    }

    /// Transform a vector (no translation).
    pub fn transform_vector(&self, v: &Vec3) -> Vec3 {
        self.linear * v
    }

    /// Compose two transforms: `self * other`, i.e. `other` is applied first.
    pub fn compose(&self, other: &Transform3) -> Transform3 {
        Transform3 {
            linear: self.linear * other.linear,
            translation: self.linear * other.translation + self.translation,
        }
    }

    /// Compute the inverse transform. Returns None if the linear part is singular.
    pub fn inverse(&self) -> Option<Self> {
        let linear = self.linear.try_inverse()?;
        Some(Transform3 {
            linear,
            translation: -(linear * self.translation),
        })
    }
}

impl Default for Transform3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Transform3 {
    type Output = Transform3;
    fn mul(self, rhs: Transform3) -> Self::Output {
        self.compose(&rhs)
    }
}

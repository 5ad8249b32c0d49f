use serde::{Deserialize, Serialize};

use crate::math::{Transform3, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// The inverted box that every `expand_to_include` call shrinks onto.
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f64::INFINITY),
            max: Vec3::repeat(f64::NEG_INFINITY),
        }
    }

    /// The largest finite box, used as the "unbounded" answer.
    pub fn maximal() -> Self {
        Self {
            min: Vec3::repeat(-f64::MAX),
            max: Vec3::repeat(f64::MAX),
        }
    }

    pub fn from_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    pub fn from_points(points: &[Vec3]) -> Self {
        let mut bb = Self::empty();
        for p in points {
            bb.expand_to_include(p);
        }
        bb
    }

    pub fn expand_to_include(&mut self, p: &Vec3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        (0..3).all(|i| self.min[i] <= other.max[i] && self.max[i] >= other.min[i])
    }

    pub fn contains_point(&self, p: &Vec3) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }

    /// Midpoint of the box. Halves before adding so `[-MAX, MAX]` does not overflow.
    pub fn center(&self) -> Vec3 {
        self.min * 0.5 + self.max * 0.5
    }

    /// Half-size along each axis.
    pub fn half_extents(&self) -> Vec3 {
        self.max * 0.5 - self.min * 0.5
    }

    pub fn is_valid(&self) -> bool {
        (0..3).all(|i| self.min[i] <= self.max[i])
    }

    /// Separation between two boxes; zero when they overlap.
    pub fn distance(&self, other: &Self) -> f64 {
        let mut gap = Vec3::zeros();
        for i in 0..3 {
            if self.min[i] > other.max[i] {
                gap[i] = self.min[i] - other.max[i];
            } else if other.min[i] > self.max[i] {
                gap[i] = other.min[i] - self.max[i];
            }
        }
        gap.norm()
    }

    /// Box enclosing this box after `tf` is applied.
    ///
    /// Works in center/extent form so maximal boxes saturate to infinity
    /// instead of producing NaN corners.
    pub fn transformed(&self, tf: &Transform3) -> Self {
        let center = tf.transform_point(&self.center());
        let half = tf.linear().abs() * self.half_extents();
        Self {
            min: center - half,
            max: center + half,
        }
    }
}

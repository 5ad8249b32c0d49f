use serde::{Deserialize, Serialize};

use crate::math::{Mat3, Vec3};

/// Oriented bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obb {
    /// Box axes, one per column.
    pub axis: Mat3,
    /// Box center.
    pub to: Vec3,
    /// Half-length along each axis.
    pub extent: Vec3,
}

impl Obb {
    pub fn new(axis: Mat3, to: Vec3, extent: Vec3) -> Self {
        Self { axis, to, extent }
    }

    /// Identity-oriented box with every extent at `f64::MAX`.
    pub fn maximal() -> Self {
        Self {
            axis: Mat3::identity(),
            to: Vec3::zeros(),
            extent: Vec3::repeat(f64::MAX),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.to
    }

    pub fn contains_point(&self, p: &Vec3) -> bool {
        let local = self.axis.transpose() * (p - self.to);
        (0..3).all(|i| local[i].abs() <= self.extent[i])
    }
}

impl Default for Obb {
    fn default() -> Self {
        Self::new(Mat3::identity(), Vec3::zeros(), Vec3::zeros())
    }
}

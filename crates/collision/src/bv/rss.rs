use serde::{Deserialize, Serialize};

use crate::math::{Mat3, Vec3};

/// Rectangle swept sphere: the Minkowski sum of a rectangle and a sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rss {
    /// Rectangle frame; columns 0 and 1 span the rectangle, column 2 is its normal.
    pub axis: Mat3,
    /// Rectangle origin (one corner).
    pub to: Vec3,
    /// Side lengths along the first two axes.
    pub l: [f64; 2],
    /// Sweep radius.
    pub r: f64,
}

impl Rss {
    pub fn new(axis: Mat3, to: Vec3, l: [f64; 2], r: f64) -> Self {
        Self { axis, to, l, r }
    }

    /// Identity frame at the origin with side lengths and radius at `f64::MAX`.
    pub fn maximal() -> Self {
        Self {
            axis: Mat3::identity(),
            to: Vec3::zeros(),
            l: [f64::MAX, f64::MAX],
            r: f64::MAX,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.to
            + self.axis.column(0) * (self.l[0] * 0.5)
            + self.axis.column(1) * (self.l[1] * 0.5)
    }

    pub fn contains_point(&self, p: &Vec3) -> bool {
        let local = self.axis.transpose() * (p - self.to);
        let dx = if local.x < 0.0 {
            -local.x
        } else {
            (local.x - self.l[0]).max(0.0)
        };
        let dy = if local.y < 0.0 {
            -local.y
        } else {
            (local.y - self.l[1]).max(0.0)
        };
        (dx * dx + dy * dy + local.z * local.z).sqrt() <= self.r
    }
}

impl Default for Rss {
    fn default() -> Self {
        Self::new(Mat3::identity(), Vec3::zeros(), [0.0, 0.0], 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_center() {
        let rss = Rss::new(Mat3::identity(), Vec3::zeros(), [2.0, 4.0], 0.5);
        assert_relative_eq!(rss.center(), Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_contains_point() {
        let rss = Rss::new(Mat3::identity(), Vec3::zeros(), [2.0, 2.0], 0.5);
        assert!(rss.contains_point(&Vec3::new(1.0, 1.0, 0.4)));
        assert!(rss.contains_point(&Vec3::new(2.3, 1.0, 0.0)));
        assert!(!rss.contains_point(&Vec3::new(2.6, 1.0, 0.0)));
        assert!(!rss.contains_point(&Vec3::new(1.0, 1.0, 0.6)));
    }
}

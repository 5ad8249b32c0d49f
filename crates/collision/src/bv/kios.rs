use serde::{Deserialize, Serialize};

use super::obb::Obb;
use crate::math::Vec3;

/// A sphere of a [`Kios`] swarm.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KiosSphere {
    pub o: Vec3,
    pub r: f64,
}

/// Intersection of up to five spheres, paired with an OBB.
///
/// A point is enclosed when it lies inside the OBB and inside every active sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kios {
    pub spheres: [KiosSphere; Kios::MAX_SPHERES],
    pub num_spheres: usize,
    pub obb: Obb,
}

impl Kios {
    pub const MAX_SPHERES: usize = 5;

    pub fn active_spheres(&self) -> &[KiosSphere] {
        &self.spheres[..self.num_spheres.min(Self::MAX_SPHERES)]
    }

    pub fn center(&self) -> Vec3 {
        self.active_spheres()
            .first()
            .map_or_else(|| self.obb.center(), |s| s.o)
    }

    pub fn contains_point(&self, p: &Vec3) -> bool {
        self.obb.contains_point(p) && self.active_spheres().iter().all(|s| (p - s.o).norm() <= s.r)
    }
}

impl Default for Kios {
    fn default() -> Self {
        Self {
            spheres: [KiosSphere::default(); Self::MAX_SPHERES],
            num_spheres: 0,
            obb: Obb::default(),
        }
    }
}

use std::any::Any;

use serde::{Deserialize, Serialize};

use super::{CollisionGeometry, LocalBound, NodeType, SupportMap};
use crate::bv::aabb::Aabb;
use crate::bv::fit::compute_bv;
use crate::math::{Transform3, Vec3};

/// Box centered at the local origin, aligned with the local axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "CuboidRepr", into = "CuboidRepr")]
pub struct Cuboid {
    pub half_extents: Vec3,
    bound: LocalBound,
}

#[derive(Clone, Serialize, Deserialize)]
struct CuboidRepr {
    half_extents: Vec3,
}

impl From<CuboidRepr> for Cuboid {
    fn from(repr: CuboidRepr) -> Self {
        Self::new(repr.half_extents)
    }
}

impl From<Cuboid> for CuboidRepr {
    fn from(cuboid: Cuboid) -> Self {
        Self {
            half_extents: cuboid.half_extents,
        }
    }
}

impl Cuboid {
    pub fn new(half_extents: Vec3) -> Self {
        let mut cuboid = Self {
            half_extents,
            bound: LocalBound::default(),
        };
        cuboid.compute_local_aabb();
        cuboid
    }

    /// Box with full side lengths `x`, `y`, `z`.
    pub fn from_sides(x: f64, y: f64, z: f64) -> Self {
        Self::new(Vec3::new(x, y, z) * 0.5)
    }
}

impl SupportMap for Cuboid {
    fn local_support_point(&self, dir: &Vec3) -> Vec3 {
        Vec3::from_fn(|i, _| {
            if dir[i] < 0.0 {
                -self.half_extents[i]
            } else {
                self.half_extents[i]
            }
        })
    }
}

impl CollisionGeometry for Cuboid {
    fn node_type(&self) -> NodeType {
        NodeType::Box
    }

    fn local_bound(&self) -> &LocalBound {
        &self.bound
    }

    fn compute_local_aabb(&mut self) {
        let mut aabb = Aabb::empty();
        compute_bv(self, &Transform3::identity(), &mut aabb);
        self.bound = LocalBound::from_aabb(aabb);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_support_map(&self) -> Option<&dyn SupportMap> {
        Some(self)
    }
}

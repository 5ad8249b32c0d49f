use std::any::Any;

use serde::{Deserialize, Serialize};

use super::{CollisionGeometry, LocalBound, NodeType, SupportMap};
use crate::bv::aabb::Aabb;
use crate::bv::fit::compute_bv;
use crate::math::{Transform3, Vec3};

/// Sphere centered at the local origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "SphereRepr", into = "SphereRepr")]
pub struct Sphere {
    pub radius: f64,
    bound: LocalBound,
}

#[derive(Clone, Serialize, Deserialize)]
struct SphereRepr {
    radius: f64,
}

impl From<SphereRepr> for Sphere {
    fn from(repr: SphereRepr) -> Self {
        Self::new(repr.radius)
    }
}

impl From<Sphere> for SphereRepr {
    fn from(sphere: Sphere) -> Self {
        Self { radius: sphere.radius }
    }
}

impl Sphere {
    pub fn new(radius: f64) -> Self {
        let mut sphere = Self {
            radius,
            bound: LocalBound::default(),
        };
        sphere.compute_local_aabb();
        sphere
    }
}

impl SupportMap for Sphere {
    fn local_support_point(&self, dir: &Vec3) -> Vec3 {
        match dir.try_normalize(0.0) {
            Some(unit) => unit * self.radius,
            None => Vec3::x() * self.radius,
        }
    }
}

impl CollisionGeometry for Sphere {
    fn node_type(&self) -> NodeType {
        NodeType::Sphere
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

use std::any::Any;

use super::{CollisionGeometry, LocalBound, NodeType, SupportMap};
use crate::bv::aabb::Aabb;
use crate::bv::fit::compute_bv;
use crate::error::GeometryError;
use crate::math::{Transform3, Vec3};

/// Convex hull of a point set, represented only by its vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Convex {
    vertices: Vec<Vec3>,
    bound: LocalBound,
}

impl Convex {
    pub fn new(vertices: Vec<Vec3>) -> Result<Self, GeometryError> {
        if vertices.is_empty() {
            return Err(GeometryError::EmptyConvex);
        }
        let mut convex = Self {
            vertices,
            bound: LocalBound::default(),
        };
        convex.compute_local_aabb();
        Ok(convex)
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }
}

impl SupportMap for Convex {
    fn local_support_point(&self, dir: &Vec3) -> Vec3 {
        let mut best = self.vertices[0];
        let mut best_dot = best.dot(dir);
        for v in &self.vertices[1..] {
            let dot = v.dot(dir);
            if dot > best_dot {
                best = *v;
                best_dot = dot;
            }
        }
        best
    }
}

impl CollisionGeometry for Convex {
    fn node_type(&self) -> NodeType {
        NodeType::Convex
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

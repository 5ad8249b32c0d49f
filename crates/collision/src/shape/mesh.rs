use std::any::Any;

use tracing::{debug, instrument};

use super::{CollisionGeometry, LocalBound, NodeType, ObjectType, Triangle};
use crate::bv::aabb::Aabb;
use crate::error::GeometryError;
use crate::math::Vec3;

/// Triangle soup bounded by per-triangle AABBs.
///
/// This is the aggregate geometry of the crate: it reports
/// [`ObjectType::Bvh`] and node type [`NodeType::BvAabb`], so the dispatcher
/// always queries it as the first argument of a pair.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    vertices: Vec<Vec3>,
    triangles: Vec<[usize; 3]>,
    triangle_aabbs: Vec<Aabb>,
    bound: LocalBound,
}

impl TriangleMesh {
    #[instrument(skip_all, fields(vertices = vertices.len(), triangles = triangles.len()))]
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<[usize; 3]>) -> Result<Self, GeometryError> {
        for (triangle, indices) in triangles.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i >= vertices.len()) {
                return Err(GeometryError::TriangleIndexOutOfRange {
                    triangle,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }

        let triangle_aabbs = triangles
            .iter()
            .map(|t| Aabb::from_points(&[vertices[t[0]], vertices[t[1]], vertices[t[2]]]))
            .collect();
        let mut mesh = Self {
            vertices,
            triangles,
            triangle_aabbs,
            bound: LocalBound::default(),
        };
        mesh.compute_local_aabb();
        debug!(radius = mesh.bound.radius, "built triangle mesh");
        Ok(mesh)
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Triangle `index` in the mesh frame.
    pub fn triangle(&self, index: usize) -> Triangle {
        let [a, b, c] = self.triangles[index];
        Triangle::new(self.vertices[a], self.vertices[b], self.vertices[c])
    }

    /// Local-frame AABB of triangle `index`.
    pub fn triangle_aabb(&self, index: usize) -> &Aabb {
        &self.triangle_aabbs[index]
    }
}

impl CollisionGeometry for TriangleMesh {
    fn node_type(&self) -> NodeType {
        NodeType::BvAabb
    }

    fn object_type(&self) -> ObjectType {
        ObjectType::Bvh
    }

    fn local_bound(&self) -> &LocalBound {
        &self.bound
    }

    fn compute_local_aabb(&mut self) {
        let aabb = self.triangle_aabbs.iter().fold(Aabb::empty(), |acc, bb| acc.merge(bb));
        self.bound = LocalBound::from_aabb(aabb);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

//! Collision geometries and the tags the distance dispatcher keys on.
//!
//! Every concrete geometry reports a fine-grained [`NodeType`] and a coarse
//! [`ObjectType`]. Convex primitives additionally expose a [`SupportMap`],
//! which is all the iterative solver needs from them.

pub mod cuboid;
pub mod convex;
pub mod halfspace;
pub mod mesh;
pub mod sphere;
pub mod triangle;

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bv::aabb::Aabb;
use crate::math::{Transform3, Vec3};

pub use cuboid::Cuboid;
pub use convex::Convex;
pub use halfspace::Halfspace;
pub use mesh::TriangleMesh;
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Concrete representation of a geometry; the key of the dispatch tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeType {
    Unknown,
    BvAabb,
    BvObb,
    BvRss,
    BvKios,
    BvObbRss,
    BvKdop16,
    BvKdop18,
    BvKdop24,
    Box,
    Sphere,
    Convex,
    Halfspace,
    Triangle,
}

impl NodeType {
    /// Number of node types; the side length of a dispatch matrix.
    pub const COUNT: usize = 14;

    pub const ALL: [NodeType; Self::COUNT] = [
        NodeType::Unknown,
        NodeType::BvAabb,
        NodeType::BvObb,
        NodeType::BvRss,
        NodeType::BvKios,
        NodeType::BvObbRss,
        NodeType::BvKdop16,
        NodeType::BvKdop18,
        NodeType::BvKdop24,
        NodeType::Box,
        NodeType::Sphere,
        NodeType::Convex,
        NodeType::Halfspace,
        NodeType::Triangle,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// True for node types that tag bounding-volume hierarchies.
    pub fn is_bvh(self) -> bool {
        matches!(
            self,
            NodeType::BvAabb
                | NodeType::BvObb
                | NodeType::BvRss
                | NodeType::BvKios
                | NodeType::BvObbRss
                | NodeType::BvKdop16
                | NodeType::BvKdop18
                | NodeType::BvKdop24
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Coarse category, used only to normalize argument order before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    Unknown,
    /// Aggregate geometry backed by a bounding-volume hierarchy.
    Bvh,
    /// Simple geometric primitive.
    Geom,
}

/// Cached local-frame bound of a geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalBound {
    pub aabb: Aabb,
    pub center: Vec3,
    pub radius: f64,
}

impl LocalBound {
    /// Center is the box midpoint; radius reaches from there to the min corner.
    pub fn from_aabb(aabb: Aabb) -> Self {
        let center = aabb.center();
        Self {
            aabb,
            center,
            radius: (aabb.min - center).norm(),
        }
    }
}

impl Default for LocalBound {
    fn default() -> Self {
        Self::from_aabb(Aabb::from_point(Vec3::zeros()))
    }
}

/// A geometry that can take part in distance queries.
pub trait CollisionGeometry: Any + Send + Sync + fmt::Debug {
    fn node_type(&self) -> NodeType;

    fn object_type(&self) -> ObjectType {
        ObjectType::Geom
    }

    /// The cached local bound, as of the last `compute_local_aabb`.
    fn local_bound(&self) -> &LocalBound;

    /// Recompute the cached local bound.
    fn compute_local_aabb(&mut self);

    fn as_any(&self) -> &dyn Any;

    /// The support mapping of convex geometries; `None` for everything else.
    fn as_support_map(&self) -> Option<&dyn SupportMap> {
        None
    }
}

/// Convex shapes described by their support function.
pub trait SupportMap {
    /// The point of the shape, in its local frame, furthest along `dir`.
    fn local_support_point(&self, dir: &Vec3) -> Vec3;

    /// Support point of the shape placed by `tf`.
    ///
    /// For `x' = L x + t` the support along `d` is `L s(Lᵀ d) + t`.
    fn support_point(&self, tf: &Transform3, dir: &Vec3) -> Vec3 {
        let local_dir = tf.linear().transpose() * dir;
        tf.transform_point(&self.local_support_point(&local_dir))
    }
}

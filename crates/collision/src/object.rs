use std::sync::Arc;

use crate::bv::aabb::Aabb;
use crate::math::{Transform3, Vec3};
use crate::shape::{CollisionGeometry, NodeType, ObjectType};

/// A geometry placed in the world.
///
/// The geometry is shared, so many objects can reuse one mesh. The world AABB
/// is cached and refreshed whenever the transform changes.
#[derive(Debug, Clone)]
pub struct CollisionObject {
    geometry: Arc<dyn CollisionGeometry>,
    transform: Transform3,
    aabb: Aabb,
}

impl CollisionObject {
    pub fn new(geometry: Arc<dyn CollisionGeometry>, transform: Transform3) -> Self {
        let mut object = Self {
            geometry,
            transform,
            aabb: Aabb::empty(),
        };
        object.compute_aabb();
        object
    }

    pub fn from_geometry<G: CollisionGeometry>(geometry: G, transform: Transform3) -> Self {
        Self::new(Arc::new(geometry), transform)
    }

    pub fn geometry(&self) -> &dyn CollisionGeometry {
        self.geometry.as_ref()
    }

    pub fn shared_geometry(&self) -> Arc<dyn CollisionGeometry> {
        Arc::clone(&self.geometry)
    }

    pub fn transform(&self) -> &Transform3 {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Transform3) {
        self.transform = transform;
        self.compute_aabb();
    }

    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    pub fn node_type(&self) -> NodeType {
        self.geometry.node_type()
    }

    pub fn object_type(&self) -> ObjectType {
        self.geometry.object_type()
    }

    /// Refresh the world AABB from the geometry's local bound.
    ///
    /// Pure translations move the local box; anything else falls back to the
    /// box around the local bounding sphere.
    pub fn compute_aabb(&mut self) {
        let bound = self.geometry.local_bound();
        self.aabb = if self.transform.is_translation_only() {
            let t = self.transform.translation();
            Aabb::new(bound.aabb.min + t, bound.aabb.max + t)
        } else {
            let center = self.transform.transform_point(&bound.center);
            let delta = Vec3::repeat(bound.radius);
            Aabb::new(center - delta, center + delta)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Cuboid, Halfspace, TriangleMesh};

    #[test]
    fn test_translation_keeps_local_box() {
        let object = CollisionObject::from_geometry(
            Cuboid::new(Vec3::new(1.0, 2.0, 3.0)),
            Transform3::from_translation(10.0, 0.0, 0.0),
        );
        assert_eq!(object.aabb().min, Vec3::new(9.0, -2.0, -3.0));
        assert_eq!(object.aabb().max, Vec3::new(11.0, 2.0, 3.0));
        assert_eq!(object.node_type(), NodeType::Box);
        assert_eq!(object.object_type(), ObjectType::Geom);
    }

    #[test]
    fn test_rotation_uses_bounding_sphere() {
        let mut object = CollisionObject::from_geometry(Cuboid::new(Vec3::repeat(1.0)), Transform3::identity());
        object.set_transform(Transform3::rotation_z(0.3));
        let r = 3.0_f64.sqrt();
        assert!((object.aabb().max - Vec3::repeat(r)).norm() < 1e-12);
        assert!((object.aabb().min + Vec3::repeat(r)).norm() < 1e-12);
    }

    #[test]
    fn test_shared_mesh() {
        let mesh = TriangleMesh::new(vec![Vec3::zeros(), Vec3::x(), Vec3::y()], vec![[0, 1, 2]]).unwrap();
        let a = CollisionObject::from_geometry(mesh, Transform3::identity());
        let b = CollisionObject::new(a.shared_geometry(), Transform3::from_translation(0.0, 0.0, 5.0));
        assert_eq!(b.object_type(), ObjectType::Bvh);
        assert_eq!(b.aabb().min.z, 5.0);
    }

    #[test]
    fn test_halfspace_world_box_stays_finite_where_bounded() {
        let object = CollisionObject::from_geometry(
            Halfspace::new(Vec3::z(), 1.0),
            Transform3::from_translation(0.0, 0.0, 2.0),
        );
        assert_eq!(object.aabb().max.z, 3.0);
        assert_eq!(object.aabb().max.x, f64::MAX);
    }
}

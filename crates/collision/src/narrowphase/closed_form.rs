//! Closed-form distances between primitive pairs, evaluated in world space.
//!
//! Witness points are ordered like the arguments. Overlapping pairs report a
//! negative distance equal to the penetration depth along the separating
//! direction used.

use super::ShapeDistance;
use crate::math::{Transform3, Vec3};
use crate::shape::halfspace::{self, Halfspace};
use crate::shape::{Cuboid, Sphere, SupportMap, Triangle};

pub(crate) fn sphere_sphere(s1: &Sphere, tf1: &Transform3, s2: &Sphere, tf2: &Transform3) -> ShapeDistance {
    let c1 = *tf1.translation();
    let c2 = *tf2.translation();
    let delta = c2 - c1;
    let len = delta.norm();
    let dir = if len > 0.0 { delta / len } else { Vec3::x() };
    ShapeDistance::new(len - s1.radius - s2.radius, c1 + dir * s1.radius, c2 - dir * s2.radius)
}

/// `None` when the box transform is singular.
pub(crate) fn sphere_cuboid(
    sphere: &Sphere,
    tf_sphere: &Transform3,
    cuboid: &Cuboid,
    tf_cuboid: &Transform3,
) -> Option<ShapeDistance> {
    let to_box = tf_cuboid.inverse()?;
    let c = to_box.transform_point(tf_sphere.translation());
    let h = cuboid.half_extents;
    let r = sphere.radius;
    let q = c.zip_map(&h, |ci, hi| ci.clamp(-hi, hi));
    let gap = c - q;
    let len = gap.norm();

    if len > 0.0 {
        let on_sphere = c - gap * (r / len);
        return Some(ShapeDistance::new(
            len - r,
            tf_cuboid.transform_point(&on_sphere),
            tf_cuboid.transform_point(&q),
        ));
    }

    // Center inside the box: push out through the nearest face.
    let (axis, depth) = (1..3).fold((0, h.x - c.x.abs()), |best, i| {
        let depth = h[i] - c[i].abs();
        if depth < best.1 { (i, depth) } else { best }
    });
    let sign = if c[axis] < 0.0 { -1.0 } else { 1.0 };
    let mut face = c;
    face[axis] = sign * h[axis];
    let mut on_sphere = c;
    on_sphere[axis] -= sign * r;
    Some(ShapeDistance::new(
        -(depth + r),
        tf_cuboid.transform_point(&on_sphere),
        tf_cuboid.transform_point(&face),
    ))
}

pub(crate) fn triangle_sphere(
    triangle: &Triangle,
    tf_triangle: &Transform3,
    sphere: &Sphere,
    tf_sphere: &Transform3,
) -> ShapeDistance {
    let [a, b, c] = triangle.vertices().map(|v| tf_triangle.transform_point(&v));
    let world = Triangle::new(a, b, c);
    let center = *tf_sphere.translation();
    let r = sphere.radius;
    let q = world.closest_point(&center);
    let gap = center - q;
    let len = gap.norm();
    let dir = if len > 0.0 {
        gap / len
    } else {
        (b - a).cross(&(c - a)).try_normalize(0.0).unwrap_or_else(Vec3::x)
    };
    ShapeDistance::new(len - r, q, center - dir * r)
}

/// Half-space against any support-mapped shape.
///
/// The deepest point of the shape along `-n` decides the answer, which makes
/// this exact for every convex shape.
pub(crate) fn halfspace_support(
    h: &Halfspace,
    tf_h: &Transform3,
    shape: &dyn SupportMap,
    tf_shape: &Transform3,
) -> ShapeDistance {
    let plane = halfspace::transform(h, tf_h);
    let deepest = shape.support_point(tf_shape, &-plane.n);
    let signed = plane.signed_distance(&deepest);
    ShapeDistance::new(signed, deepest - plane.n * signed, deepest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_sphere_separated() {
        let sd = sphere_sphere(
            &Sphere::new(1.0),
            &Transform3::identity(),
            &Sphere::new(0.5),
            &Transform3::from_translation(4.0, 0.0, 0.0),
        );
        assert_relative_eq!(sd.distance, 2.5, epsilon = 1e-12);
        assert_relative_eq!(sd.points[0], Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(sd.points[1], Vec3::new(3.5, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_sphere_sphere_concentric() {
        let sd = sphere_sphere(&Sphere::new(1.0), &Transform3::identity(), &Sphere::new(2.0), &Transform3::identity());
        assert_relative_eq!(sd.distance, -3.0);
    }

    #[test]
    fn test_sphere_cuboid_face_edge_and_inside() {
        let cuboid = Cuboid::new(Vec3::new(1.0, 1.0, 1.0));
        let sphere = Sphere::new(0.5);

        let sd = sphere_cuboid(&sphere, &Transform3::from_translation(3.0, 0.0, 0.0), &cuboid, &Transform3::identity())
            .unwrap();
        assert_relative_eq!(sd.distance, 1.5, epsilon = 1e-12);
        assert_relative_eq!(sd.points[1], Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-12);

        let sd = sphere_cuboid(&sphere, &Transform3::from_translation(2.0, 2.0, 0.0), &cuboid, &Transform3::identity())
            .unwrap();
        assert_relative_eq!(sd.distance, 2.0_f64.sqrt() - 0.5, epsilon = 1e-12);

        let sd = sphere_cuboid(&sphere, &Transform3::from_translation(0.0, 0.75, 0.0), &cuboid, &Transform3::identity())
            .unwrap();
        assert_relative_eq!(sd.distance, -0.75, epsilon = 1e-12);
        assert_relative_eq!(sd.points[1], Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_sphere_cuboid_rotated_box() {
        let cuboid = Cuboid::new(Vec3::new(1.0, 1.0, 1.0));
        let tf_box = Transform3::rotation_z(std::f64::consts::FRAC_PI_4);
        let sd = sphere_cuboid(&Sphere::new(0.5), &Transform3::from_translation(4.0, 0.0, 0.0), &cuboid, &tf_box)
            .unwrap();
        assert_relative_eq!(sd.distance, 4.0 - 2.0_f64.sqrt() - 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_triangle_sphere() {
        let triangle = Triangle::new(Vec3::zeros(), Vec3::x(), Vec3::y());
        let sd = triangle_sphere(
            &triangle,
            &Transform3::identity(),
            &Sphere::new(0.25),
            &Transform3::from_translation(0.2, 0.2, 1.0),
        );
        assert_relative_eq!(sd.distance, 0.75, epsilon = 1e-12);
        assert_relative_eq!(sd.points[0], Vec3::new(0.2, 0.2, 0.0), epsilon = 1e-12);
        assert_relative_eq!(sd.points[1], Vec3::new(0.2, 0.2, 0.75), epsilon = 1e-12);
    }

    #[test]
    fn test_halfspace_support_sign() {
        let h = Halfspace::new(Vec3::z(), 0.0);
        let cuboid = Cuboid::new(Vec3::new(1.0, 1.0, 1.0));

        let above = halfspace_support(&h, &Transform3::identity(), &cuboid, &Transform3::from_translation(0.0, 0.0, 3.0));
        assert_relative_eq!(above.distance, 2.0, epsilon = 1e-12);
        assert_relative_eq!(above.points[0].z, 0.0, epsilon = 1e-12);

        let sunk = halfspace_support(&h, &Transform3::identity(), &cuboid, &Transform3::from_translation(0.0, 0.0, 0.5));
        assert_relative_eq!(sunk.distance, -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_halfspace_support_moved_plane() {
        let h = Halfspace::new(Vec3::x(), 1.0);
        let sd = halfspace_support(
            &h,
            &Transform3::from_translation(2.0, 0.0, 0.0),
            &Sphere::new(1.0),
            &Transform3::from_translation(10.0, 0.0, 0.0),
        );
        assert_relative_eq!(sd.distance, 6.0, epsilon = 1e-12);
        assert_relative_eq!(sd.points[0], Vec3::new(3.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(sd.points[1], Vec3::new(9.0, 0.0, 0.0), epsilon = 1e-12);
    }
}

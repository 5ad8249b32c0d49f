//! Fitting bounding volumes around geometries.
//!
//! A half-space is unbounded along every direction tangent to its plane, so
//! the only tight support any representation can carry is along a canonical
//! direction that the normal matches exactly. Matching uses exact float
//! comparisons: a normal that is merely close to a canonical direction gets
//! the maximal bound.

use super::aabb::Aabb;
use super::kdop::{KDop, KDOP_DIRECTIONS};
use super::kios::{Kios, KiosSphere};
use super::obb::Obb;
use super::obbrss::ObbRss;
use super::rss::Rss;
use crate::math::{Transform3, Vec3};
use crate::shape::halfspace::{self, Halfspace};
use crate::shape::{Convex, Cuboid, Sphere, SupportMap, Triangle};

/// Bounding volumes that can be fit around a geometry of type `G`.
pub trait FitBv<G: ?Sized> {
    /// Overwrite `bv` with a bound of `shape` placed by `tf`.
    fn fit(shape: &G, tf: &Transform3, bv: &mut Self);
}

/// Fit `bv` around `shape` placed by `tf`.
pub fn compute_bv<BV, G>(shape: &G, tf: &Transform3, bv: &mut BV)
where
    BV: FitBv<G>,
    G: ?Sized,
{
    BV::fit(shape, tf, bv);
}

/// AABB of the half-space `n · x <= d`, already expressed in the box frame.
pub(crate) fn aabb_from_plane(n: &Vec3, d: f64) -> Aabb {
    let mut bv = Aabb::maximal();
    if n.y == 0.0 && n.z == 0.0 {
        if n.x < 0.0 {
            bv.min.x = -d;
        } else if n.x > 0.0 {
            bv.max.x = d;
        }
    } else if n.x == 0.0 && n.z == 0.0 {
        if n.y < 0.0 {
            bv.min.y = -d;
        } else if n.y > 0.0 {
            bv.max.y = d;
        }
    } else if n.x == 0.0 && n.y == 0.0 {
        if n.z < 0.0 {
            bv.min.z = -d;
        } else if n.z > 0.0 {
            bv.max.z = d;
        }
    }
    bv
}

/// Signed component of `n` along a canonical direction, or `None` when `n`
/// is not exactly parallel to it.
///
/// Components where the direction is zero must be exactly zero; the
/// remaining components must agree exactly once the direction's signs are
/// applied.
fn match_direction(n: &Vec3, dir: &[i8; 3]) -> Option<f64> {
    let mut along = None;
    for axis in 0..3 {
        match dir[axis] {
            0 => {
                if n[axis] != 0.0 {
                    return None;
                }
            }
            sign => {
                let component = n[axis] * f64::from(sign);
                match along {
                    None => along = Some(component),
                    Some(first) if first != component => return None,
                    Some(_) => {}
                }
            }
        }
    }
    along
}

impl FitBv<Halfspace> for Aabb {
    fn fit(shape: &Halfspace, tf: &Transform3, bv: &mut Self) {
        let moved = halfspace::transform(shape, tf);
        *bv = aabb_from_plane(&moved.n, moved.d);
    }
}

impl FitBv<Halfspace> for Obb {
    fn fit(_shape: &Halfspace, _tf: &Transform3, bv: &mut Self) {
        *bv = Obb::maximal();
    }
}

impl FitBv<Halfspace> for Rss {
    fn fit(_shape: &Halfspace, _tf: &Transform3, bv: &mut Self) {
        *bv = Rss::maximal();
    }
}

impl FitBv<Halfspace> for ObbRss {
    fn fit(shape: &Halfspace, tf: &Transform3, bv: &mut Self) {
        compute_bv(shape, tf, &mut bv.obb);
        compute_bv(shape, tf, &mut bv.rss);
    }
}

impl FitBv<Halfspace> for Kios {
    fn fit(shape: &Halfspace, tf: &Transform3, bv: &mut Self) {
        bv.num_spheres = 1;
        compute_bv(shape, tf, &mut bv.obb);
        bv.spheres[0] = KiosSphere {
            o: Vec3::zeros(),
            r: f64::MAX,
        };
    }
}

impl<const N: usize> FitBv<Halfspace> for KDop<N> {
    fn fit(shape: &Halfspace, tf: &Transform3, bv: &mut Self) {
        let moved = halfspace::transform(shape, tf);
        *bv = KDop::maximal();

        let d = KDop::<N>::D;
        for (i, dir) in KDOP_DIRECTIONS.iter().take(d).enumerate() {
            let Some(along) = match_direction(&moved.n, dir) else {
                continue;
            };
            // Supports are measured against the unnormalized direction, whose
            // length is sqrt(m) for m non-zero components.
            let m = dir.iter().filter(|&&c| c != 0).count() as f64;
            let support = along * moved.d * m;
            if along > 0.0 {
                bv.dist[i + d] = support;
            } else {
                bv.dist[i] = support;
            }
            break;
        }
    }
}

impl FitBv<Sphere> for Aabb {
    fn fit(shape: &Sphere, tf: &Transform3, bv: &mut Self) {
        let center = tf.translation();
        *bv = Aabb::new(center.add_scalar(-shape.radius), center.add_scalar(shape.radius));
    }
}

impl FitBv<Cuboid> for Aabb {
    fn fit(shape: &Cuboid, tf: &Transform3, bv: &mut Self) {
        let half = tf.linear().abs() * shape.half_extents;
        let center = tf.translation();
        *bv = Aabb::new(center - half, center + half);
    }
}

impl FitBv<Convex> for Aabb {
    fn fit(shape: &Convex, tf: &Transform3, bv: &mut Self) {
        let points: Vec<Vec3> = shape.vertices().iter().map(|v| tf.transform_point(v)).collect();
        *bv = Aabb::from_points(&points);
    }
}

impl FitBv<Triangle> for Aabb {
    fn fit(shape: &Triangle, tf: &Transform3, bv: &mut Self) {
        let points = shape.vertices().map(|v| tf.transform_point(&v));
        *bv = Aabb::from_points(&points);
    }
}

/// AABB of any support-mapped shape, probing the six axis directions.
pub fn support_aabb(shape: &dyn SupportMap, tf: &Transform3) -> Aabb {
    let mut bv = Aabb::empty();
    for axis in [Vec3::x(), Vec3::y(), Vec3::z()] {
        bv.expand_to_include(&shape.support_point(tf, &axis));
        bv.expand_to_include(&shape.support_point(tf, &-axis));
    }
    bv
}

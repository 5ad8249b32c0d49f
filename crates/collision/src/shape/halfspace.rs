use std::any::Any;

use serde::{Deserialize, Serialize};

use super::{CollisionGeometry, LocalBound, NodeType};
use crate::bv::aabb::Aabb;
use crate::bv::fit::{aabb_from_plane, compute_bv};
use crate::math::{Transform3, Vec3};

/// Half-space bounded by the plane `n · x = d`.
///
/// Points with `n · x < d` are inside, points with `n · x > d` are outside.
/// The normal is unit length after every constructor; a zero normal falls
/// back to `n = (1, 0, 0)`, `d = 0`.
///
/// Only `n` and `d` are serialized; deserializing goes through [`Halfspace::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "HalfspaceRepr", into = "HalfspaceRepr")]
pub struct Halfspace {
    pub n: Vec3,
    pub d: f64,
    bound: LocalBound,
}

#[derive(Clone, Serialize, Deserialize)]
struct HalfspaceRepr {
    n: Vec3,
    d: f64,
}

impl From<HalfspaceRepr> for Halfspace {
    fn from(repr: HalfspaceRepr) -> Self {
        Self::new(repr.n, repr.d)
    }
}

impl From<Halfspace> for HalfspaceRepr {
    fn from(h: Halfspace) -> Self {
        Self { n: h.n, d: h.d }
    }
}

impl Halfspace {
    pub fn new(n: Vec3, d: f64) -> Self {
        let mut halfspace = Self {
            n,
            d,
            bound: LocalBound::default(),
        };
        halfspace.unit_normal_test();
        halfspace.compute_local_aabb();
        halfspace
    }

    /// Plane `a x + b y + c z = d`.
    pub fn from_coefficients(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self::new(Vec3::new(a, b, c), d)
    }

    pub fn signed_distance(&self, p: &Vec3) -> f64 {
        self.n.dot(p) - self.d
    }

    pub fn distance(&self, p: &Vec3) -> f64 {
        self.signed_distance(p).abs()
    }

    pub fn contains_point(&self, p: &Vec3) -> bool {
        self.signed_distance(p) <= 0.0
    }

    fn unit_normal_test(&mut self) {
        let l = self.n.norm();
        if l > 0.0 {
            let inv_l = 1.0 / l;
            self.n *= inv_l;
            self.d *= inv_l;
        } else {
            self.n = Vec3::x();
            self.d = 0.0;
        }
    }
}

impl Default for Halfspace {
    fn default() -> Self {
        Self::new(Vec3::x(), 0.0)
    }
}

impl CollisionGeometry for Halfspace {
    fn node_type(&self) -> NodeType {
        NodeType::Halfspace
    }

    fn local_bound(&self) -> &LocalBound {
        &self.bound
    }

    fn compute_local_aabb(&mut self) {
        let mut aabb = Aabb::maximal();
        compute_bv(self, &Transform3::identity(), &mut aabb);
        self.bound = LocalBound::from_aabb(aabb);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Express `halfspace` in the frame reached by `tf`.
///
/// A point `x` maps to `x' = R x + T`; substituting into `n · x <= d` gives
/// `n' · x' <= d'` with `n' = R n` and `d' = d + n' · T`. The result is not
/// renormalized, so `R` must be a pure rotation for `n'` to stay unit length.
pub fn transform(halfspace: &Halfspace, tf: &Transform3) -> Halfspace {
    let n = tf.linear() * halfspace.n;
    let d = halfspace.d + n.dot(tf.translation());
    Halfspace {
        n,
        d,
        bound: LocalBound::from_aabb(aabb_from_plane(&n, d)),
    }
}

use std::any::Any;

use serde::{Deserialize, Serialize};

use super::{CollisionGeometry, LocalBound, NodeType, SupportMap};
use crate::bv::aabb::Aabb;
use crate::bv::fit::compute_bv;
use crate::math::{Transform3, Vec3};

/// A single triangle, used standalone or as a mesh primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "TriangleRepr", into = "TriangleRepr")]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    bound: LocalBound,
}

#[derive(Clone, Serialize, Deserialize)]
struct TriangleRepr {
    a: Vec3,
    b: Vec3,
    c: Vec3,
}

impl From<TriangleRepr> for Triangle {
    fn from(repr: TriangleRepr) -> Self {
        Self::new(repr.a, repr.b, repr.c)
    }
}

impl From<Triangle> for TriangleRepr {
    fn from(t: Triangle) -> Self {
        Self { a: t.a, b: t.b, c: t.c }
    }
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let mut triangle = Self {
            a,
            b,
            c,
            bound: LocalBound::default(),
        };
        triangle.compute_local_aabb();
        triangle
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }

    /// Closest point of the triangle to `p`, by Voronoi region of `p`.
    pub fn closest_point(&self, p: &Vec3) -> Vec3 {
        let (a, b, c) = (self.a, self.b, self.c);
        let ab = b - a;
        let ac = c - a;
        let ap = p - a;
        let d1 = ab.dot(&ap);
        let d2 = ac.dot(&ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return a;
        }

        let bp = p - b;
        let d3 = ab.dot(&bp);
        let d4 = ac.dot(&bp);
        if d3 >= 0.0 && d4 <= d3 {
            return b;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 && d1 - d3 > 0.0 {
            return a + ab * (d1 / (d1 - d3));
        }

        let cp = p - c;
        let d5 = ab.dot(&cp);
        let d6 = ac.dot(&cp);
        if d6 >= 0.0 && d5 <= d6 {
            return c;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 && d2 - d6 > 0.0 {
            return a + ac * (d2 / (d2 - d6));
        }

        let va = d3 * d6 - d5 * d4;
        let (e1, e2) = (d4 - d3, d5 - d6);
        if va <= 0.0 && e1 >= 0.0 && e2 >= 0.0 && e1 + e2 > 0.0 {
            return b + (c - b) * (e1 / (e1 + e2));
        }

        let sum = va + vb + vc;
        if sum <= 0.0 {
            // Zero area: the nearest of the three edges.
            return [(a, b), (a, c), (b, c)]
                .into_iter()
                .map(|(s, e)| closest_on_segment(p, s, e))
                .min_by(|x, y| (x - p).norm_squared().total_cmp(&(y - p).norm_squared()))
                .unwrap_or(a);
        }
        a + ab * (vb / sum) + ac * (vc / sum)
    }
}

fn closest_on_segment(p: &Vec3, s: Vec3, e: Vec3) -> Vec3 {
    let se = e - s;
    let len2 = se.norm_squared();
    if len2 <= 0.0 {
        return s;
    }
    s + se * ((p - s).dot(&se) / len2).clamp(0.0, 1.0)
}

impl SupportMap for Triangle {
    fn local_support_point(&self, dir: &Vec3) -> Vec3 {
        let (da, db, dc) = (self.a.dot(dir), self.b.dot(dir), self.c.dot(dir));
        if da >= db && da >= dc {
            self.a
        } else if db >= dc {
            self.b
        } else {
            self.c
        }
    }
}

impl CollisionGeometry for Triangle {
    fn node_type(&self) -> NodeType {
        NodeType::Triangle
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

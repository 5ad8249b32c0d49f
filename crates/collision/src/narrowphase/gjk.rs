//! Iterative support-function strategy.
//!
//! Distances between convex shapes come from GJK on the Minkowski difference
//! `A - B`: the simplex is pulled towards the origin until the support point
//! along `-v` no longer improves `v` by more than the relative tolerance.

use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

use super::closed_form;
use super::{NarrowPhaseSolver, ShapeDistance};
use crate::distance::functions::{mesh_shape_distance, shape_shape_distance};
use crate::distance::{DistanceMatrix, DistanceTable};
use crate::math::{Transform3, Vec3};
use crate::shape::{CollisionGeometry, Halfspace, NodeType, SupportMap};

const SUPPORT_MAPPED: [NodeType; 4] = [NodeType::Box, NodeType::Sphere, NodeType::Convex, NodeType::Triangle];

/// GJK settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GjkSolver {
    /// Upper bound on simplex refinements per query.
    pub max_iterations: usize,
    /// Relative tolerance of the termination test.
    pub tolerance: f64,
}

impl Default for GjkSolver {
    fn default() -> Self {
        Self {
            max_iterations: 128,
            tolerance: 1e-10,
        }
    }
}

static GJK_TABLE: DistanceTable<GjkSolver> = DistanceTable::new();

/// A vertex of the difference simplex with the two support points it came from.
#[derive(Debug, Clone, Copy)]
struct SupportVertex {
    w: Vec3,
    a: Vec3,
    b: Vec3,
}

/// Barycentric weights of the closest point, keyed by simplex index.
type Weights = Vec<(usize, f64)>;

impl GjkSolver {
    pub fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
        }
    }

    /// Distance between two convex shapes; `0` when they overlap.
    pub fn gjk_distance(
        &self,
        s1: &dyn SupportMap,
        tf1: &Transform3,
        s2: &dyn SupportMap,
        tf2: &Transform3,
    ) -> ShapeDistance {
        let support = |dir: &Vec3| {
            let a = s1.support_point(tf1, dir);
            let b = s2.support_point(tf2, &-dir);
            SupportVertex { w: a - b, a, b }
        };

        let start = tf2.translation() - tf1.translation();
        let mut simplex = vec![support(&start)];
        let mut lambdas = vec![1.0];
        let mut v = simplex[0].w;

        for iteration in 0..self.max_iterations {
            let vv = v.norm_squared();
            if vv <= self.tolerance * self.tolerance {
                trace!(iteration, "origin reached");
                return overlap(&simplex, &lambdas);
            }

            let w = support(&-v);
            if vv - v.dot(&w.w) <= self.tolerance * vv || simplex.iter().any(|s| s.w == w.w) {
                trace!(iteration, "converged");
                break;
            }
            simplex.push(w);

            let weights = match closest_weights(&simplex) {
                Some(weights) => weights,
                None => {
                    trace!(iteration, "origin enclosed");
                    simplex.pop();
                    return overlap(&simplex, &lambdas);
                }
            };
            simplex = weights.iter().map(|&(i, _)| simplex[i]).collect();
            lambdas = weights.iter().map(|&(_, l)| l).collect();
            v = combine(&simplex, &lambdas, |s| s.w);
        }

        let pa = combine(&simplex, &lambdas, |s| s.a);
        let pb = combine(&simplex, &lambdas, |s| s.b);
        ShapeDistance::new(v.norm(), pa, pb)
    }
}

fn combine(simplex: &[SupportVertex], lambdas: &[f64], f: impl Fn(&SupportVertex) -> Vec3) -> Vec3 {
    simplex
        .iter()
        .zip(lambdas)
        .fold(Vec3::zeros(), |acc, (s, l)| acc + f(s) * *l)
}

fn overlap(simplex: &[SupportVertex], lambdas: &[f64]) -> ShapeDistance {
    let p = combine(simplex, lambdas, |s| s.a);
    ShapeDistance::new(0.0, p, p)
}

/// Closest point of the simplex to the origin, as weights over the vertices
/// that support it. `None` when a tetrahedron encloses the origin.
fn closest_weights(simplex: &[SupportVertex]) -> Option<Weights> {
    match simplex {
        [_] => Some(vec![(0, 1.0)]),
        [a, b] => Some(closest_on_segment(a.w, b.w)),
        [a, b, c] => Some(closest_on_triangle(a.w, b.w, c.w)),
        [a, b, c, d] => closest_on_tetrahedron([a.w, b.w, c.w, d.w]),
        _ => None,
    }
}

fn closest_on_segment(a: Vec3, b: Vec3) -> Weights {
    let ab = b - a;
    let denom = ab.norm_squared();
    if denom <= 0.0 {
        return vec![(0, 1.0)];
    }
    let t = -a.dot(&ab) / denom;
    if t <= 0.0 {
        vec![(0, 1.0)]
    } else if t >= 1.0 {
        vec![(1, 1.0)]
    } else {
        vec![(0, 1.0 - t), (1, t)]
    }
}

fn closest_on_triangle(a: Vec3, b: Vec3, c: Vec3) -> Weights {
    let ab = b - a;
    let ac = c - a;
    let d1 = -ab.dot(&a);
    let d2 = -ac.dot(&a);
    if d1 <= 0.0 && d2 <= 0.0 {
        return vec![(0, 1.0)];
    }

    let d3 = -ab.dot(&b);
    let d4 = -ac.dot(&b);
    if d3 >= 0.0 && d4 <= d3 {
        return vec![(1, 1.0)];
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 && d1 - d3 > 0.0 {
        let t = d1 / (d1 - d3);
        return vec![(0, 1.0 - t), (1, t)];
    }

    let d5 = -ab.dot(&c);
    let d6 = -ac.dot(&c);
    if d6 >= 0.0 && d5 <= d6 {
        return vec![(2, 1.0)];
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 && d2 - d6 > 0.0 {
        let t = d2 / (d2 - d6);
        return vec![(0, 1.0 - t), (2, t)];
    }

    let va = d3 * d6 - d5 * d4;
    let (e1, e2) = (d4 - d3, d5 - d6);
    if va <= 0.0 && e1 >= 0.0 && e2 >= 0.0 && e1 + e2 > 0.0 {
        let t = e1 / (e1 + e2);
        return vec![(1, 1.0 - t), (2, t)];
    }

    let sum = va + vb + vc;
    if sum <= 0.0 {
        // Collinear vertices: the best edge is the answer.
        return [(0, 1), (0, 2), (1, 2)]
            .into_iter()
            .map(|(i, j)| {
                let p = [a, b, c];
                let weights: Weights = closest_on_segment(p[i], p[j])
                    .into_iter()
                    .map(|(k, l)| (if k == 0 { i } else { j }, l))
                    .collect();
                let point = weights.iter().fold(Vec3::zeros(), |acc, &(k, l)| acc + p[k] * l);
                (point.norm_squared(), weights)
            })
            .min_by(|x, y| x.0.total_cmp(&y.0))
            .map_or_else(|| vec![(0, 1.0)], |(_, w)| w);
    }
    let v = vb / sum;
    let w = vc / sum;
    vec![(0, 1.0 - v - w), (1, v), (2, w)]
}

fn closest_on_tetrahedron(p: [Vec3; 4]) -> Option<Weights> {
    const FACES: [[usize; 4]; 4] = [[0, 1, 2, 3], [0, 2, 3, 1], [0, 3, 1, 2], [1, 3, 2, 0]];

    let mut best: Option<(f64, Weights)> = None;
    for [i, j, k, opposite] in FACES {
        let n = (p[j] - p[i]).cross(&(p[k] - p[i]));
        let side_origin = -p[i].dot(&n);
        let side_opposite = (p[opposite] - p[i]).dot(&n);
        if side_origin * side_opposite > 0.0 {
            continue;
        }
        let face = [i, j, k];
        let weights: Weights = closest_on_triangle(p[i], p[j], p[k])
            .into_iter()
            .map(|(local, l)| (face[local], l))
            .collect();
        let point = weights.iter().fold(Vec3::zeros(), |acc, &(idx, l)| acc + p[idx] * l);
        let dist = point.norm_squared();
        if best.as_ref().is_none_or(|(d, _)| dist < *d) {
            best = Some((dist, weights));
        }
    }
    best.map(|(_, weights)| weights)
}

fn downcast_halfspace(g: &dyn CollisionGeometry) -> Option<&Halfspace> {
    g.as_any().downcast_ref::<Halfspace>()
}

impl NarrowPhaseSolver for GjkSolver {
    fn distance_table() -> &'static DistanceTable<Self> {
        &GJK_TABLE
    }

    #[instrument(skip_all)]
    fn register_distance_functions(matrix: &mut DistanceMatrix<Self>) {
        for (i, &a) in SUPPORT_MAPPED.iter().enumerate() {
            matrix.register(a, a, shape_shape_distance::<Self>);
            for &b in &SUPPORT_MAPPED[i + 1..] {
                matrix.register_symmetric(a, b, shape_shape_distance::<Self>);
            }
            matrix.register_symmetric(NodeType::Halfspace, a, shape_shape_distance::<Self>);
            matrix.register(NodeType::BvAabb, a, mesh_shape_distance::<Self>);
        }
        matrix.register(NodeType::BvAabb, NodeType::Halfspace, mesh_shape_distance::<Self>);
    }

    fn shape_distance(
        &self,
        g1: &dyn CollisionGeometry,
        tf1: &Transform3,
        g2: &dyn CollisionGeometry,
        tf2: &Transform3,
    ) -> Option<ShapeDistance> {
        match (g1.node_type(), g2.node_type()) {
            (NodeType::Halfspace, NodeType::Halfspace) => None,
            (NodeType::Halfspace, _) => Some(closed_form::halfspace_support(
                downcast_halfspace(g1)?,
                tf1,
                g2.as_support_map()?,
                tf2,
            )),
            (_, NodeType::Halfspace) => self.shape_distance(g2, tf2, g1, tf1).map(ShapeDistance::swapped),
            _ => Some(self.gjk_distance(g1.as_support_map()?, tf1, g2.as_support_map()?, tf2)),
        }
    }
}

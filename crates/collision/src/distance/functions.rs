//! Distance functions registered into the dispatch matrices.

use tracing::debug;

use super::request::{DistanceRequest, DistanceResult};
use crate::math::Transform3;
use crate::narrowphase::NarrowPhaseSolver;
use crate::shape::{CollisionGeometry, TriangleMesh};

/// Distance as reported to the caller: penetration is clamped to zero unless
/// the request asks for signed distances.
fn reported(distance: f64, request: &DistanceRequest) -> f64 {
    if request.enable_signed_distance {
        distance
    } else {
        distance.max(0.0)
    }
}

/// Primitive against primitive, answered directly by the solver.
pub fn shape_shape_distance<S: NarrowPhaseSolver>(
    g1: &dyn CollisionGeometry,
    tf1: &Transform3,
    g2: &dyn CollisionGeometry,
    tf2: &Transform3,
    solver: &S,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> f64 {
    if request.is_satisfied(result) {
        return result.min_distance;
    }

    let Some(sd) = solver.shape_distance(g1, tf1, g2, tf2) else {
        debug!(first = %g1.node_type(), second = %g2.node_type(), "solver declined registered pair");
        return f64::MAX;
    };
    if !sd.distance.is_finite() {
        debug!(first = %g1.node_type(), second = %g2.node_type(), distance = sd.distance, "solver returned a non-finite distance");
        return f64::MAX;
    }
    let distance = reported(sd.distance, request);
    if request.enable_nearest_points {
        result.update_with_points(distance, g1.node_type(), g2.node_type(), None, None, sd.points);
    } else {
        result.update(distance, g1.node_type(), g2.node_type(), None, None);
    }
    distance
}

/// Triangle mesh against a primitive.
///
/// Triangles are visited nearest-bound first; once a triangle's world AABB is
/// no closer than the best distance so far (within the request's error
/// slack), the rest are skipped. The mesh must be the first argument.
pub fn mesh_shape_distance<S: NarrowPhaseSolver>(
    g1: &dyn CollisionGeometry,
    tf1: &Transform3,
    g2: &dyn CollisionGeometry,
    tf2: &Transform3,
    solver: &S,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> f64 {
    if request.is_satisfied(result) {
        return result.min_distance;
    }
    let Some(mesh) = g1.as_any().downcast_ref::<TriangleMesh>() else {
        debug!(first = %g1.node_type(), "mesh distance called without a triangle mesh");
        return f64::MAX;
    };

    let other_bound = g2.local_bound().aabb.transformed(tf2);
    let mut candidates: Vec<(f64, usize)> = (0..mesh.num_triangles())
        .map(|i| (mesh.triangle_aabb(i).transformed(tf1).distance(&other_bound), i))
        .collect();
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut visited = 0usize;
    for (bound, index) in candidates {
        if request.can_stop(bound, result.min_distance) {
            break;
        }
        visited += 1;
        let triangle = mesh.triangle(index);
        let Some(sd) = solver.shape_distance(&triangle, tf1, g2, tf2) else {
            continue;
        };
        if !sd.distance.is_finite() {
            debug!(index, distance = sd.distance, "skipping triangle with non-finite distance");
            continue;
        }
        let distance = reported(sd.distance, request);
        if request.enable_nearest_points {
            result.update_with_points(distance, g1.node_type(), g2.node_type(), Some(index), None, sd.points);
        } else {
            result.update(distance, g1.node_type(), g2.node_type(), Some(index), None);
        }
        if request.is_satisfied(result) {
            break;
        }
    }
    debug!(visited, triangles = mesh.num_triangles(), "mesh distance");
    result.min_distance
}

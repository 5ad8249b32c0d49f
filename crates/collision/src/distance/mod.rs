//! Distance queries.
//!
//! A query picks a solver strategy from the request, looks the pair of node
//! types up in that strategy's dispatch matrix, and calls whatever function is
//! registered there. Matrices are keyed aggregate-first: when a primitive is
//! queried against a mesh the engine swaps the arguments before the lookup and
//! swaps the result back afterwards, so callers never see the reordering.
//!
//! The plain entry points report failures as sentinels:
//!
//! - an unsupported pair returns `f64::MAX` and leaves the result untouched;
//! - an unknown solver selector returns `-1.0`.
//!
//! The `try_*` variants return the underlying [`DistanceError`] instead.

pub mod functions;
pub mod matrix;
pub mod request;

use std::ops::Deref;

use tracing::{instrument, warn};

use crate::error::DistanceError;
use crate::math::Transform3;
use crate::narrowphase::{AnalyticSolver, GjkSolver, NarrowPhaseSolver, SolverType};
use crate::object::CollisionObject;
use crate::shape::{CollisionGeometry, ObjectType};

pub use functions::{mesh_shape_distance, shape_shape_distance};
pub use matrix::{DistanceFn, DistanceMatrix, DistanceTable, distance_function_table, reset_distance_function_table};
pub use request::{DistanceRequest, DistanceResult};

/// A solver for the duration of one query: the caller's, or a fresh default one.
#[derive(Debug)]
pub enum SolverHandle<'a, S> {
    Borrowed(&'a S),
    Owned(S),
}

impl<'a, S: Default> SolverHandle<'a, S> {
    pub fn acquire(solver: Option<&'a S>) -> Self {
        match solver {
            Some(solver) => SolverHandle::Borrowed(solver),
            None => SolverHandle::Owned(S::default()),
        }
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, SolverHandle::Owned(_))
    }
}

impl<S> Deref for SolverHandle<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        match self {
            SolverHandle::Borrowed(solver) => solver,
            SolverHandle::Owned(solver) => solver,
        }
    }
}

/// Distance between two placed geometries using strategy `S`.
///
/// `solver` is borrowed when given; otherwise a default instance lives for
/// this call only.
#[instrument(level = "trace", skip_all, fields(first = %g1.node_type(), second = %g2.node_type()))]
pub fn try_distance_geometries_with_solver<S: NarrowPhaseSolver>(
    g1: &dyn CollisionGeometry,
    tf1: &Transform3,
    g2: &dyn CollisionGeometry,
    tf2: &Transform3,
    solver: Option<&S>,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> Result<f64, DistanceError> {
    let solver = SolverHandle::acquire(solver);
    let matrix = distance_function_table::<S>();

    let swap = g1.object_type() == ObjectType::Geom && g2.object_type() == ObjectType::Bvh;
    let (first, second) = if swap {
        (g2.node_type(), g1.node_type())
    } else {
        (g1.node_type(), g2.node_type())
    };

    let Some(f) = matrix.get(first, second) else {
        warn!(%first, %second, "distance function between node types is not supported");
        return Err(DistanceError::UnsupportedPair { first, second });
    };

    if swap {
        result.swap_sides();
        let distance = f(g2, tf2, g1, tf1, &*solver, request, result);
        result.swap_sides();
        Ok(distance)
    } else {
        Ok(f(g1, tf1, g2, tf2, &*solver, request, result))
    }
}

/// Distance between two placed geometries with the strategy the request names.
pub fn try_distance_geometries(
    g1: &dyn CollisionGeometry,
    tf1: &Transform3,
    g2: &dyn CollisionGeometry,
    tf2: &Transform3,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> Result<f64, DistanceError> {
    match request.solver_type {
        SolverType::Iterative => {
            try_distance_geometries_with_solver::<GjkSolver>(g1, tf1, g2, tf2, None, request, result)
        }
        SolverType::Analytic => {
            try_distance_geometries_with_solver::<AnalyticSolver>(g1, tf1, g2, tf2, None, request, result)
        }
        SolverType::Unknown(code) => Err(DistanceError::UnknownSolver(code)),
    }
}

pub fn distance_geometries(
    g1: &dyn CollisionGeometry,
    tf1: &Transform3,
    g2: &dyn CollisionGeometry,
    tf2: &Transform3,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> f64 {
    try_distance_geometries(g1, tf1, g2, tf2, request, result).unwrap_or_else(|err| err.sentinel())
}

/// Like [`distance_geometries`], with an explicit strategy and optional instance.
///
/// The request's `solver_type` is not consulted.
pub fn distance_geometries_with_solver<S: NarrowPhaseSolver>(
    g1: &dyn CollisionGeometry,
    tf1: &Transform3,
    g2: &dyn CollisionGeometry,
    tf2: &Transform3,
    solver: Option<&S>,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> f64 {
    try_distance_geometries_with_solver(g1, tf1, g2, tf2, solver, request, result)
        .unwrap_or_else(|err| err.sentinel())
}

pub fn try_distance(
    o1: &CollisionObject,
    o2: &CollisionObject,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> Result<f64, DistanceError> {
    try_distance_geometries(o1.geometry(), o1.transform(), o2.geometry(), o2.transform(), request, result)
}

/// Distance between two collision objects.
pub fn distance(
    o1: &CollisionObject,
    o2: &CollisionObject,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> f64 {
    distance_geometries(o1.geometry(), o1.transform(), o2.geometry(), o2.transform(), request, result)
}

pub fn distance_with_solver<S: NarrowPhaseSolver>(
    o1: &CollisionObject,
    o2: &CollisionObject,
    solver: Option<&S>,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> f64 {
    distance_geometries_with_solver(
        o1.geometry(),
        o1.transform(),
        o2.geometry(),
        o2.transform(),
        solver,
        request,
        result,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::shape::{Cuboid, Halfspace, NodeType, Sphere, TriangleMesh};

    fn floor() -> TriangleMesh {
        TriangleMesh::new(
            vec![
                Vec3::new(-5.0, -5.0, 0.0),
                Vec3::new(5.0, -5.0, 0.0),
                Vec3::new(5.0, 5.0, 0.0),
                Vec3::new(-5.0, 5.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn test_solver_handle() {
        let solver = GjkSolver::new(4, 1e-6);
        let borrowed = SolverHandle::acquire(Some(&solver));
        assert!(!borrowed.is_owned());
        assert_eq!(borrowed.max_iterations, 4);
        let owned = SolverHandle::<GjkSolver>::acquire(None);
        assert!(owned.is_owned());
        assert_eq!(*owned, GjkSolver::default());
    }

    #[test]
    fn test_primitive_mesh_order_is_normalized() {
        let mesh = floor();
        let sphere = Sphere::new(1.0);
        let tf_sphere = Transform3::from_translation(1.0, 1.0, 3.0);
        let id = Transform3::identity();
        let request = DistanceRequest::new(true);

        let mut forward = DistanceResult::new();
        let d_forward = distance_geometries(&mesh, &id, &sphere, &tf_sphere, &request, &mut forward);
        let mut backward = DistanceResult::new();
        let d_backward = distance_geometries(&sphere, &tf_sphere, &mesh, &id, &request, &mut backward);

        assert!((d_forward - 2.0).abs() < 1e-6);
        assert_eq!(d_forward, d_backward);
        assert_eq!(forward.o1, Some(NodeType::BvAabb));
        assert_eq!(backward.o1, Some(NodeType::Sphere));
        assert_eq!(backward.b2, forward.b1);
        assert_eq!(backward.nearest_points, [forward.nearest_points[1], forward.nearest_points[0]]);
    }

    #[test]
    fn test_unsupported_pair_leaves_result() {
        let h = Halfspace::default();
        let id = Transform3::identity();
        let mut result = DistanceResult::new();
        result.update(7.0, NodeType::Box, NodeType::Sphere, None, None);
        let before = result;

        let d = distance_geometries(&h, &id, &h, &id, &DistanceRequest::default(), &mut result);
        assert_eq!(d, f64::MAX);
        assert_eq!(result, before);

        let err = try_distance_geometries(&h, &id, &h, &id, &DistanceRequest::default(), &mut result).unwrap_err();
        assert!(matches!(
            err,
            DistanceError::UnsupportedPair {
                first: NodeType::Halfspace,
                second: NodeType::Halfspace
            }
        ));
    }

    #[test]
    fn test_unknown_solver_is_negative() {
        let cuboid = Cuboid::new(Vec3::repeat(1.0));
        let id = Transform3::identity();
        let request = DistanceRequest::default().with_solver(SolverType::Unknown(5));
        let mut result = DistanceResult::new();
        let d = distance_geometries(&cuboid, &id, &cuboid, &id, &request, &mut result);
        assert_eq!(d, -1.0);
        assert_eq!(result, DistanceResult::default());
    }

    #[test]
    fn test_strategy_selection() {
        let cuboid = Cuboid::new(Vec3::repeat(1.0));
        let id = Transform3::identity();
        let far = Transform3::from_translation(4.0, 0.0, 0.0);

        let mut result = DistanceResult::new();
        let iterative = DistanceRequest::default().with_solver(SolverType::Iterative);
        assert!((distance_geometries(&cuboid, &id, &cuboid, &far, &iterative, &mut result) - 2.0).abs() < 1e-9);

        // The analytic strategy has no box-box closed form.
        let mut result = DistanceResult::new();
        let analytic = DistanceRequest::default().with_solver(SolverType::Analytic);
        assert_eq!(distance_geometries(&cuboid, &id, &cuboid, &far, &analytic, &mut result), f64::MAX);
    }

    #[test]
    fn test_explicit_solver_instance() {
        let sphere = Sphere::new(1.0);
        let id = Transform3::identity();
        let far = Transform3::from_translation(0.0, 6.0, 0.0);
        let solver = GjkSolver::new(64, 1e-12);
        let mut result = DistanceResult::new();
        let request = DistanceRequest::default();
        let d = distance_geometries_with_solver(&sphere, &id, &sphere, &far, Some(&solver), &request, &mut result);
        assert!((d - 4.0).abs() < 1e-9);
    }
}

//! Dispatch engine behaviour with hand-built strategies.
//!
//! Each strategy here owns its own process-wide table, so tests touching
//! different strategies do not observe each other's builds.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use cad_collision::distance::{
    DistanceMatrix, DistanceRequest, DistanceResult, DistanceTable, distance_function_table,
    distance_geometries, distance_geometries_with_solver, reset_distance_function_table,
    try_distance_geometries_with_solver,
};
use cad_collision::error::DistanceError;
use cad_collision::math::{Transform3, Vec3};
use cad_collision::narrowphase::{NarrowPhaseSolver, ShapeDistance};
use cad_collision::shape::{CollisionGeometry, Cuboid, Halfspace, NodeType, Sphere, TriangleMesh};

/// Distance between the two frame origins; records the origins as witnesses.
fn origin_distance<S>(
    g1: &dyn CollisionGeometry,
    tf1: &Transform3,
    g2: &dyn CollisionGeometry,
    tf2: &Transform3,
    _solver: &S,
    _request: &DistanceRequest,
    result: &mut DistanceResult,
) -> f64 {
    let d = (tf2.translation() - tf1.translation()).norm();
    result.update_with_points(
        d,
        g1.node_type(),
        g2.node_type(),
        None,
        None,
        [*tf1.translation(), *tf2.translation()],
    );
    d
}

// ---------------------------------------------------------------------------
// Origin strategy: mesh-first and symmetric box/sphere entries
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct OriginSolver;

static ORIGIN_TABLE: DistanceTable<OriginSolver> = DistanceTable::new();

impl NarrowPhaseSolver for OriginSolver {
    fn distance_table() -> &'static DistanceTable<Self> {
        &ORIGIN_TABLE
    }

    fn register_distance_functions(matrix: &mut DistanceMatrix<Self>) {
        matrix.register(NodeType::BvAabb, NodeType::Sphere, origin_distance::<Self>);
        matrix.register_symmetric(NodeType::Box, NodeType::Sphere, origin_distance::<Self>);
    }

    fn shape_distance(
        &self,
        _g1: &dyn CollisionGeometry,
        _tf1: &Transform3,
        _g2: &dyn CollisionGeometry,
        _tf2: &Transform3,
    ) -> Option<ShapeDistance> {
        None
    }
}

// ---------------------------------------------------------------------------
// Slow strategy: widens the window for racing first uses
// ---------------------------------------------------------------------------

static SLOW_BUILDS: AtomicUsize = AtomicUsize::new(0);
static SLOW_TABLE: DistanceTable<SlowSolver> = DistanceTable::new();

#[derive(Debug, Default)]
struct SlowSolver;

impl NarrowPhaseSolver for SlowSolver {
    fn distance_table() -> &'static DistanceTable<Self> {
        &SLOW_TABLE
    }

    fn register_distance_functions(matrix: &mut DistanceMatrix<Self>) {
        SLOW_BUILDS.fetch_add(1, Ordering::SeqCst);
        for &other in &NodeType::ALL {
            matrix.register(NodeType::BvAabb, other, origin_distance::<Self>);
            thread::sleep(Duration::from_millis(2));
        }
    }

    fn shape_distance(
        &self,
        _g1: &dyn CollisionGeometry,
        _tf1: &Transform3,
        _g2: &dyn CollisionGeometry,
        _tf2: &Transform3,
    ) -> Option<ShapeDistance> {
        None
    }
}

fn triangle_mesh() -> TriangleMesh {
    TriangleMesh::new(vec![Vec3::zeros(), Vec3::x(), Vec3::y()], vec![[0, 1, 2]]).unwrap()
}

#[test]
fn aggregate_first_swap_gives_same_distance() {
    let mesh = triangle_mesh();
    let sphere = Sphere::new(1.0);
    let tf_mesh = Transform3::from_translation(1.0, 0.0, 0.0);
    let tf_sphere = Transform3::from_translation(4.0, 4.0, 0.0);
    let request = DistanceRequest::new(true);

    let mut in_order = DistanceResult::new();
    let d1 = distance_geometries_with_solver::<OriginSolver>(
        &mesh, &tf_mesh, &sphere, &tf_sphere, None, &request, &mut in_order,
    );
    let mut reversed = DistanceResult::new();
    let d2 = distance_geometries_with_solver::<OriginSolver>(
        &sphere, &tf_sphere, &mesh, &tf_mesh, None, &request, &mut reversed,
    );

    assert_eq!(d1, 5.0);
    assert_eq!(d1, d2);
    // Witnesses come back in the caller's argument order.
    assert_eq!(in_order.o1, Some(NodeType::BvAabb));
    assert_eq!(reversed.o1, Some(NodeType::Sphere));
    assert_eq!(reversed.nearest_points, [Vec3::new(4.0, 4.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]);
}

#[test]
fn reversed_primitive_pair_without_entry_is_not_swapped() {
    // Only [BvAabb][Sphere] is registered for the mesh; primitives are never
    // reordered among themselves, and Sphere-Box resolves through its own
    // symmetric entry.
    let sphere = Sphere::new(1.0);
    let cuboid = Cuboid::new(Vec3::repeat(1.0));
    let id = Transform3::identity();
    let far = Transform3::from_translation(0.0, 3.0, 0.0);
    let request = DistanceRequest::new(true);

    let mut result = DistanceResult::new();
    let d = distance_geometries_with_solver::<OriginSolver>(&sphere, &id, &cuboid, &far, None, &request, &mut result);
    assert_eq!(d, 3.0);
    assert_eq!(result.o1, Some(NodeType::Sphere));
    assert_eq!(result.o2, Some(NodeType::Box));
    assert_eq!(result.nearest_points, [Vec3::zeros(), Vec3::new(0.0, 3.0, 0.0)]);
}

#[test]
fn missing_pair_returns_max_and_keeps_result() {
    let cuboid = Cuboid::new(Vec3::repeat(1.0));
    let id = Transform3::identity();
    let request = DistanceRequest::new(true);

    let mut result = DistanceResult::new();
    result.update_with_points(9.0, NodeType::Convex, NodeType::Convex, Some(1), Some(2), [Vec3::x(), Vec3::y()]);
    let before = result;

    let d = distance_geometries_with_solver::<OriginSolver>(&cuboid, &id, &cuboid, &id, None, &request, &mut result);
    assert_eq!(d, f64::MAX);
    assert_eq!(result, before);

    let err = try_distance_geometries_with_solver::<OriginSolver>(&cuboid, &id, &cuboid, &id, None, &request, &mut result)
        .unwrap_err();
    assert!(matches!(err, DistanceError::UnsupportedPair { first: NodeType::Box, second: NodeType::Box }));
    assert_eq!(err.sentinel(), f64::MAX);
}

#[test]
fn sentinels_stay_distinct() {
    let h = Halfspace::new(Vec3::z(), 0.0);
    let id = Transform3::identity();
    let mut result = DistanceResult::new();

    let unknown = DistanceRequest::from_json(r#"{"solver_type": 3, "enable_nearest_points": true}"#).unwrap();
    let unsupported = DistanceRequest::default();
    let d_unknown = distance_geometries(&h, &id, &h, &id, &unknown, &mut result);
    let d_unsupported = distance_geometries(&h, &id, &h, &id, &unsupported, &mut result);

    assert_eq!(d_unknown, -1.0);
    assert_eq!(d_unsupported, f64::MAX);
    assert_eq!(result, DistanceResult::default());
}

#[test]
fn concurrent_first_use_builds_once() {
    const THREADS: usize = 8;
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                distance_function_table::<SlowSolver>()
            })
        })
        .collect();
    let tables: Vec<Arc<DistanceMatrix<SlowSolver>>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(SLOW_BUILDS.load(Ordering::SeqCst), 1);
    for table in &tables {
        assert!(Arc::ptr_eq(table, &tables[0]));
        assert_eq!(table.len(), NodeType::COUNT);
    }

    // The reset hook forces exactly one rebuild with the same content.
    reset_distance_function_table::<SlowSolver>();
    assert!(!SlowSolver::distance_table().is_initialized());
    let rebuilt = distance_function_table::<SlowSolver>();
    assert_eq!(SLOW_BUILDS.load(Ordering::SeqCst), 2);
    assert!(!Arc::ptr_eq(&rebuilt, &tables[0]));
    assert_eq!(rebuilt.supported_pairs(), tables[0].supported_pairs());
}

#[test]
fn shipped_strategies_answer_mesh_queries_both_ways() {
    let mesh = triangle_mesh();
    let plane = Halfspace::new(Vec3::z(), -2.0);
    let id = Transform3::identity();

    for request in [
        DistanceRequest::from_json(r#"{"solver_type": 0}"#).unwrap(),
        DistanceRequest::from_json(r#"{"solver_type": 1}"#).unwrap(),
    ] {
        let mut a = DistanceResult::new();
        let mut b = DistanceResult::new();
        let d1 = distance_geometries(&mesh, &id, &plane, &id, &request, &mut a);
        let d2 = distance_geometries(&plane, &id, &mesh, &id, &request, &mut b);
        assert!((d1 - 2.0).abs() < 1e-12, "{:?}: {}", request.solver_type, d1);
        assert_eq!(d1, d2);
        assert_eq!(a.b1, Some(0));
        assert_eq!(b.b2, Some(0));
    }
}

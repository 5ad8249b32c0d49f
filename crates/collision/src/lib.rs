//! Narrow-phase distance queries between placed geometries.
//!
//! The crate is organised bottom-up:
//!
//! - [`math`]: vectors and rigid transforms;
//! - [`bv`]: bounding volumes and fitting them around geometries;
//! - [`shape`]: the geometry kinds, including the half-space primitive;
//! - [`narrowphase`]: solver strategies and their pairwise algorithms;
//! - [`distance`]: per-strategy dispatch tables and the query entry points.

pub mod bv;
pub mod distance;
pub mod error;
pub mod math;
pub mod narrowphase;
pub mod object;
pub mod shape;

pub use bv::{Aabb, FitBv, KDop, Kdop16, Kdop18, Kdop24, Kios, Obb, ObbRss, Rss, compute_bv};
pub use distance::{
    DistanceMatrix, DistanceRequest, DistanceResult, DistanceTable, SolverHandle, distance, distance_function_table,
    distance_geometries, distance_geometries_with_solver, distance_with_solver, reset_distance_function_table,
    try_distance, try_distance_geometries, try_distance_geometries_with_solver,
};
pub use error::{DistanceError, GeometryError};
pub use math::{Mat3, Transform3, Vec3};
pub use narrowphase::{AnalyticSolver, GjkSolver, NarrowPhaseSolver, ShapeDistance, SolverType};
pub use object::CollisionObject;
pub use shape::{
    CollisionGeometry, Convex, Cuboid, Halfspace, LocalBound, NodeType, ObjectType, Sphere, SupportMap, Triangle,
    TriangleMesh,
};

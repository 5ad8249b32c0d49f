use thiserror::Error;

use crate::shape::NodeType;

/// Failures of a distance query.
///
/// The sentinel-returning entry points in [`crate::distance`] fold these into
/// their scalar result; the `try_*` variants hand them back as-is.
#[derive(Debug, Error)]
pub enum DistanceError {
    #[error("distance function between node type {first} and node type {second} is not supported")]
    UnsupportedPair { first: NodeType, second: NodeType },

    #[error("unrecognized narrow-phase solver selector {0}")]
    UnknownSolver(u32),

    #[error("invalid distance request: {0}")]
    InvalidRequest(#[from] serde_json::Error),
}

impl DistanceError {
    /// Scalar reported in place of a distance when this error occurs.
    ///
    /// An unsupported pair reads as "infinitely far"; a bad solver selector
    /// reads as a negative distance.
    pub fn sentinel(&self) -> f64 {
        match self {
            DistanceError::UnsupportedPair { .. } => f64::MAX,
            DistanceError::UnknownSolver(_) | DistanceError::InvalidRequest(_) => -1.0,
        }
    }
}

/// Malformed geometry rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    TriangleIndexOutOfRange {
        triangle: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("convex shape needs at least one vertex")]
    EmptyConvex,
}

use serde::{Deserialize, Serialize};

use crate::error::DistanceError;
use crate::math::Vec3;
use crate::narrowphase::SolverType;
use crate::shape::NodeType;

/// Settings for one distance query.
///
/// Every field has a default, so a partial JSON document is a valid request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceRequest {
    /// Which solver strategy answers the query.
    pub solver_type: SolverType,
    /// Record witness points in the result.
    pub enable_nearest_points: bool,
    /// Report penetration as a negative distance instead of clamping to zero.
    pub enable_signed_distance: bool,
    /// Relative slack allowed when pruning mesh triangles.
    pub rel_err: f64,
    /// Absolute slack allowed when pruning mesh triangles.
    pub abs_err: f64,
}

impl Default for DistanceRequest {
    fn default() -> Self {
        Self {
            solver_type: SolverType::default(),
            enable_nearest_points: false,
            enable_signed_distance: false,
            rel_err: 0.0,
            abs_err: 0.0,
        }
    }
}

impl DistanceRequest {
    pub fn new(enable_nearest_points: bool) -> Self {
        Self {
            enable_nearest_points,
            ..Self::default()
        }
    }

    pub fn with_solver(mut self, solver_type: SolverType) -> Self {
        self.solver_type = solver_type;
        self
    }

    pub fn with_signed_distance(mut self, enable: bool) -> Self {
        self.enable_signed_distance = enable;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, DistanceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Nothing left to find once the shapes are known to touch.
    pub fn is_satisfied(&self, result: &DistanceResult) -> bool {
        result.min_distance <= 0.0
    }

    /// Whether a candidate whose distance is at least `bound` can be skipped
    /// given the best distance found so far.
    pub fn can_stop(&self, bound: f64, best: f64) -> bool {
        bound >= best - self.abs_err && bound * (1.0 + self.rel_err) >= best
    }
}

/// Output of a distance query, accumulated across calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceResult {
    /// Smallest distance seen; `f64::MAX` until something is recorded.
    pub min_distance: f64,
    /// Witness points, filled in only when the request asks for them.
    pub nearest_points: [Vec3; 2],
    pub o1: Option<NodeType>,
    pub o2: Option<NodeType>,
    /// Primitive index inside the first geometry, for aggregates.
    pub b1: Option<usize>,
    /// Primitive index inside the second geometry, for aggregates.
    pub b2: Option<usize>,
}

impl Default for DistanceResult {
    fn default() -> Self {
        Self {
            min_distance: f64::MAX,
            nearest_points: [Vec3::zeros(); 2],
            o1: None,
            o2: None,
            b1: None,
            b2: None,
        }
    }
}

impl DistanceResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `distance` if it beats the current minimum. Returns whether it did.
    pub fn update(
        &mut self,
        distance: f64,
        o1: NodeType,
        o2: NodeType,
        b1: Option<usize>,
        b2: Option<usize>,
    ) -> bool {
        if distance >= self.min_distance {
            return false;
        }
        self.min_distance = distance;
        self.o1 = Some(o1);
        self.o2 = Some(o2);
        self.b1 = b1;
        self.b2 = b2;
        true
    }

    /// [`update`](Self::update), also keeping the witness points on success.
    pub fn update_with_points(
        &mut self,
        distance: f64,
        o1: NodeType,
        o2: NodeType,
        b1: Option<usize>,
        b2: Option<usize>,
        points: [Vec3; 2],
    ) -> bool {
        let improved = self.update(distance, o1, o2, b1, b2);
        if improved {
            self.nearest_points = points;
        }
        improved
    }

    /// Exchange everything recorded about the first and second geometry.
    pub fn swap_sides(&mut self) {
        std::mem::swap(&mut self.o1, &mut self.o2);
        std::mem::swap(&mut self.b1, &mut self.b2);
        self.nearest_points.swap(0, 1);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

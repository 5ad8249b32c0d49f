//! Narrow-phase solver strategies.
//!
//! A strategy answers "how far apart are these two primitives" and decides
//! which geometry pairs it can answer for by registering distance functions
//! into its own [`DistanceMatrix`]. Two strategies ship with the crate:
//! [`AnalyticSolver`] (closed forms only) and [`GjkSolver`] (support-function
//! iteration).

pub mod analytic;
pub(crate) mod closed_form;
pub mod gjk;

use serde::{Deserialize, Serialize};

use crate::distance::{DistanceMatrix, DistanceTable};
use crate::math::{Transform3, Vec3};
use crate::shape::CollisionGeometry;

pub use analytic::AnalyticSolver;
pub use gjk::GjkSolver;

/// Selector for the solver strategy used by a query.
///
/// Travels as its raw numeric code so that configuration can carry any value;
/// codes other than `0` and `1` decode to [`SolverType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum SolverType {
    /// Iterative support-function strategy, [`GjkSolver`].
    #[default]
    Iterative,
    /// Exact primitive strategy, [`AnalyticSolver`].
    Analytic,
    Unknown(u32),
}

impl SolverType {
    pub const ITERATIVE_CODE: u32 = 0;
    pub const ANALYTIC_CODE: u32 = 1;

    pub fn code(self) -> u32 {
        match self {
            SolverType::Iterative => Self::ITERATIVE_CODE,
            SolverType::Analytic => Self::ANALYTIC_CODE,
            SolverType::Unknown(code) => code,
        }
    }
}

impl From<u32> for SolverType {
    fn from(code: u32) -> Self {
        match code {
            Self::ITERATIVE_CODE => SolverType::Iterative,
            Self::ANALYTIC_CODE => SolverType::Analytic,
            other => SolverType::Unknown(other),
        }
    }
}

impl From<SolverType> for u32 {
    fn from(solver: SolverType) -> Self {
        solver.code()
    }
}

/// Distance between two placed primitives with one witness point on each.
///
/// `distance` is negative when the shapes overlap and the solver can measure
/// penetration; `points[0]` lies on the first shape, `points[1]` on the second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDistance {
    pub distance: f64,
    pub points: [Vec3; 2],
}

impl ShapeDistance {
    pub fn new(distance: f64, p1: Vec3, p2: Vec3) -> Self {
        Self {
            distance,
            points: [p1, p2],
        }
    }

    /// The same measurement with the roles of the two shapes exchanged.
    pub fn swapped(self) -> Self {
        Self {
            distance: self.distance,
            points: [self.points[1], self.points[0]],
        }
    }
}

/// A solver strategy.
///
/// Implementors own a process-wide [`DistanceTable`], built from
/// [`register_distance_functions`](Self::register_distance_functions) the first
/// time any query uses the strategy.
pub trait NarrowPhaseSolver: Default + Send + Sync + 'static {
    /// The dispatch table of this strategy.
    fn distance_table() -> &'static DistanceTable<Self>;

    /// Install every pairwise distance function this strategy supports.
    fn register_distance_functions(matrix: &mut DistanceMatrix<Self>);

    /// Distance between two placed primitives, or `None` when this strategy has
    /// no algorithm for the pair.
    fn shape_distance(
        &self,
        g1: &dyn CollisionGeometry,
        tf1: &Transform3,
        g2: &dyn CollisionGeometry,
        tf2: &Transform3,
    ) -> Option<ShapeDistance>;
}

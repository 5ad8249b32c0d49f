//! Pairwise dispatch tables.
//!
//! Every solver strategy owns one [`DistanceMatrix`], a dense
//! `NodeType::COUNT x NodeType::COUNT` grid of optional distance functions.
//! The matrix is built on first use through the strategy's [`DistanceTable`]
//! and never changes afterwards; readers share it through an `Arc`.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, const_rwlock};
use tracing::{debug, instrument};

use super::request::{DistanceRequest, DistanceResult};
use crate::math::Transform3;
use crate::narrowphase::NarrowPhaseSolver;
use crate::shape::{CollisionGeometry, NodeType};

/// A registered pairwise distance function.
///
/// Receives both geometries with their transforms, the solver instance, the
/// request and the result to update, and returns the distance it found.
pub type DistanceFn<S> = Arc<
    dyn Fn(
            &dyn CollisionGeometry,
            &Transform3,
            &dyn CollisionGeometry,
            &Transform3,
            &S,
            &DistanceRequest,
            &mut DistanceResult,
        ) -> f64
        + Send
        + Sync,
>;

pub struct DistanceMatrix<S: NarrowPhaseSolver> {
    cells: Vec<Option<DistanceFn<S>>>,
}

impl<S: NarrowPhaseSolver> DistanceMatrix<S> {
    /// A matrix populated by the strategy's own registrations.
    pub fn new() -> Self {
        let mut matrix = Self::empty();
        S::register_distance_functions(&mut matrix);
        matrix
    }

    /// A matrix with no registered pairs.
    pub fn empty() -> Self {
        Self {
            cells: vec![None; NodeType::COUNT * NodeType::COUNT],
        }
    }

    fn slot(first: NodeType, second: NodeType) -> usize {
        first.index() * NodeType::COUNT + second.index()
    }

    /// Install `f` for `(first, second)`, replacing any earlier entry.
    pub fn register<F>(&mut self, first: NodeType, second: NodeType, f: F)
    where
        F: Fn(
                &dyn CollisionGeometry,
                &Transform3,
                &dyn CollisionGeometry,
                &Transform3,
                &S,
                &DistanceRequest,
                &mut DistanceResult,
            ) -> f64
            + Send
            + Sync
            + 'static,
    {
        self.cells[Self::slot(first, second)] = Some(Arc::new(f));
    }

    /// Install `f` for `(first, second)` and an argument-swapping adapter for
    /// `(second, first)`.
    ///
    /// The adapter swaps the result's sides around the call, so whatever `f`
    /// records for its first geometry ends up on the caller's second one.
    pub fn register_symmetric<F>(&mut self, first: NodeType, second: NodeType, f: F)
    where
        F: Fn(
                &dyn CollisionGeometry,
                &Transform3,
                &dyn CollisionGeometry,
                &Transform3,
                &S,
                &DistanceRequest,
                &mut DistanceResult,
            ) -> f64
            + Send
            + Sync
            + 'static,
    {
        let forward: DistanceFn<S> = Arc::new(f);
        self.cells[Self::slot(first, second)] = Some(Arc::clone(&forward));
        if first == second {
            return;
        }
        self.register(
            second,
            first,
            move |g1: &dyn CollisionGeometry,
                  tf1: &Transform3,
                  g2: &dyn CollisionGeometry,
                  tf2: &Transform3,
                  solver: &S,
                  request: &DistanceRequest,
                  result: &mut DistanceResult|
                  -> f64 {
                result.swap_sides();
                let distance = forward(g2, tf2, g1, tf1, solver, request, result);
                result.swap_sides();
                distance
            },
        );
    }

    pub fn get(&self, first: NodeType, second: NodeType) -> Option<&DistanceFn<S>> {
        self.cells[Self::slot(first, second)].as_ref()
    }

    pub fn is_supported(&self, first: NodeType, second: NodeType) -> bool {
        self.get(first, second).is_some()
    }

    /// Number of registered pairs.
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered `(first, second)` pairs in row-major order.
    pub fn supported_pairs(&self) -> Vec<(NodeType, NodeType)> {
        NodeType::ALL
            .iter()
            .flat_map(|&a| NodeType::ALL.iter().map(move |&b| (a, b)))
            .filter(|&(a, b)| self.is_supported(a, b))
            .collect()
    }
}

impl<S: NarrowPhaseSolver> Default for DistanceMatrix<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: NarrowPhaseSolver> fmt::Debug for DistanceMatrix<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistanceMatrix").field("registered", &self.len()).finish()
    }
}

/// Process-wide, lazily built [`DistanceMatrix`] of one strategy.
///
/// The first [`get`](Self::get) builds the matrix under the write lock; racing
/// callers wait for it and then all share the same `Arc`. Lookups only take the
/// read lock long enough to clone that `Arc`.
pub struct DistanceTable<S: NarrowPhaseSolver> {
    slot: RwLock<Option<Arc<DistanceMatrix<S>>>>,
}

impl<S: NarrowPhaseSolver> DistanceTable<S> {
    pub const fn new() -> Self {
        Self {
            slot: const_rwlock(None),
        }
    }

    pub fn get(&self) -> Arc<DistanceMatrix<S>> {
        if let Some(matrix) = self.slot.read().as_ref() {
            return Arc::clone(matrix);
        }

        let mut slot = self.slot.write();
        if let Some(matrix) = slot.as_ref() {
            return Arc::clone(matrix);
        }
        let matrix = Arc::new(build_matrix::<S>());
        *slot = Some(Arc::clone(&matrix));
        matrix
    }

    pub fn is_initialized(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Drop the built matrix so the next `get` rebuilds it.
    ///
    /// Matrices already handed out stay valid for their holders.
    pub fn reset(&self) {
        *self.slot.write() = None;
    }
}

impl<S: NarrowPhaseSolver> Default for DistanceTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[instrument(skip_all, fields(solver = std::any::type_name::<S>()))]
fn build_matrix<S: NarrowPhaseSolver>() -> DistanceMatrix<S> {
    let matrix = DistanceMatrix::new();
    debug!(registered = matrix.len(), "built distance table");
    matrix
}

/// The shared dispatch matrix of strategy `S`, building it if needed.
pub fn distance_function_table<S: NarrowPhaseSolver>() -> Arc<DistanceMatrix<S>> {
    S::distance_table().get()
}

/// Forget the shared matrix of strategy `S`.
pub fn reset_distance_function_table<S: NarrowPhaseSolver>() {
    S::distance_table().reset();
}

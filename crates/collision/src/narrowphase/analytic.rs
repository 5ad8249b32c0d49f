use tracing::instrument;

use super::closed_form;
use super::{NarrowPhaseSolver, ShapeDistance};
use crate::distance::functions::{mesh_shape_distance, shape_shape_distance};
use crate::distance::{DistanceMatrix, DistanceTable};
use crate::math::Transform3;
use crate::shape::{CollisionGeometry, Cuboid, Halfspace, NodeType, Sphere, Triangle};

/// Exact primitive strategy.
///
/// Answers only the pairs that have a closed form; everything else stays
/// unregistered and reports as unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticSolver;

static ANALYTIC_TABLE: DistanceTable<AnalyticSolver> = DistanceTable::new();

fn downcast<T: 'static>(g: &dyn CollisionGeometry) -> Option<&T> {
    g.as_any().downcast_ref::<T>()
}

impl NarrowPhaseSolver for AnalyticSolver {
    fn distance_table() -> &'static DistanceTable<Self> {
        &ANALYTIC_TABLE
    }

    #[instrument(skip_all)]
    fn register_distance_functions(matrix: &mut DistanceMatrix<Self>) {
        matrix.register(NodeType::Sphere, NodeType::Sphere, shape_shape_distance::<Self>);
        matrix.register_symmetric(NodeType::Sphere, NodeType::Box, shape_shape_distance::<Self>);
        matrix.register_symmetric(NodeType::Triangle, NodeType::Sphere, shape_shape_distance::<Self>);
        for other in [NodeType::Sphere, NodeType::Box, NodeType::Convex, NodeType::Triangle] {
            matrix.register_symmetric(NodeType::Halfspace, other, shape_shape_distance::<Self>);
        }

        // Mesh triangles only have closed forms against these.
        matrix.register(NodeType::BvAabb, NodeType::Sphere, mesh_shape_distance::<Self>);
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
            (NodeType::Sphere, NodeType::Sphere) => Some(closed_form::sphere_sphere(
                downcast::<Sphere>(g1)?,
                tf1,
                downcast::<Sphere>(g2)?,
                tf2,
            )),
            (NodeType::Sphere, NodeType::Box) => {
                closed_form::sphere_cuboid(downcast::<Sphere>(g1)?, tf1, downcast::<Cuboid>(g2)?, tf2)
            }
            (NodeType::Box, NodeType::Sphere) => self.shape_distance(g2, tf2, g1, tf1).map(ShapeDistance::swapped),
            (NodeType::Triangle, NodeType::Sphere) => Some(closed_form::triangle_sphere(
                downcast::<Triangle>(g1)?,
                tf1,
                downcast::<Sphere>(g2)?,
                tf2,
            )),
            (NodeType::Sphere, NodeType::Triangle) => {
                self.shape_distance(g2, tf2, g1, tf1).map(ShapeDistance::swapped)
            }
            (NodeType::Halfspace, NodeType::Halfspace) => None,
            (NodeType::Halfspace, _) => Some(closed_form::halfspace_support(
                downcast::<Halfspace>(g1)?,
                tf1,
                g2.as_support_map()?,
                tf2,
            )),
            (_, NodeType::Halfspace) => self.shape_distance(g2, tf2, g1, tf1).map(ShapeDistance::swapped),
            _ => None,
        }
    }
}

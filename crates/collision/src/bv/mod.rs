//! Bounding-volume representations used by the acceleration structures,
//! and the fitting procedures that enclose geometries in them.

pub mod aabb;
pub mod fit;
pub mod kdop;
pub mod kios;
pub mod obb;
pub mod obbrss;
pub mod rss;

pub use aabb::Aabb;
pub use fit::{compute_bv, support_aabb, FitBv};
pub use kdop::{KDop, Kdop16, Kdop18, Kdop24};
pub use kios::{Kios, KiosSphere};
pub use obb::Obb;
pub use obbrss::ObbRss;
pub use rss::Rss;

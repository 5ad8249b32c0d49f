use serde::{Deserialize, Serialize};

use super::obb::Obb;
use super::rss::Rss;
use crate::math::Vec3;

/// An OBB and an RSS fit around the same geometry.
///
/// Overlap tests use the OBB, distance bounds use the RSS.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ObbRss {
    pub obb: Obb,
    pub rss: Rss,
}

impl ObbRss {
    pub fn center(&self) -> Vec3 {
        self.obb.center()
    }

    /// Enclosed only when both parts agree.
    pub fn contains_point(&self, p: &Vec3) -> bool {
        self.obb.contains_point(p) && self.rss.contains_point(p)
    }
}

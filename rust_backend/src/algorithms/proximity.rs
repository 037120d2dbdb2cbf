use serde::{Deserialize, Serialize};

use crate::config::KnoxConfig;
use crate::core::domain::Point;

/// Spatial and temporal closeness tests for a pair of points.
///
/// Both thresholds are inclusive. Distances are planar; coordinates must
/// already be in a projected system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityEvaluator {
    pub d_max: f64,
    pub t_max: i64,
}

impl ProximityEvaluator {
    pub fn new(d_max: f64, t_max: i64) -> Self {
        Self { d_max, t_max }
    }

    pub fn from_config(config: &KnoxConfig) -> Self {
        Self::new(config.d_max, config.t_max)
    }

    /// `true` iff the Euclidean distance between the two locations is `<= d_max`.
    #[inline]
    pub fn spatial_match(&self, p: &Point, q: &Point) -> bool {
        p.location.distance_to(&q.location) <= self.d_max
    }

    /// `true` iff the two dates are at most `t_max` days apart.
    #[inline]
    pub fn temporal_match(&self, p: &Point, q: &Point) -> bool {
        p.days_between(q) <= self.t_max
    }
}

impl Default for ProximityEvaluator {
    fn default() -> Self {
        Self::from_config(&KnoxConfig::default())
    }
}

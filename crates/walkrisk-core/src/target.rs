//! Distance-weighted local risk, the supervisory signal for training.
//!
//! For obstacle `i` the target is the sum of neighbor severities within
//! `radius_m`, each weighted by `exp(-distance_m / decay_m)`. Obstacle `i`
//! itself never contributes; co-located duplicates do.

use crate::index::SpatialIndex;
use crate::spatial::{haversine_angle, meters_to_radians, radians_to_meters};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalRiskTarget {
    decay_m: f64,
    radius_m: f64,
}

impl LocalRiskTarget {
    pub fn new(decay_m: f64, radius_m: f64) -> Self {
        Self { decay_m, radius_m }
    }

    /// Local risk around indexed point `idx`.
    pub fn risk_at(&self, index: &SpatialIndex, severity_norm: &[f64], idx: usize) -> f64 {
        let center = index.position(idx);
        index
            .query_radius(center, meters_to_radians(self.radius_m))
            .into_iter()
            .filter(|&other| other != idx)
            .map(|other| {
                let distance_m = radians_to_meters(haversine_angle(center, index.position(other)));
                severity_norm[other] * (-distance_m / self.decay_m).exp()
            })
            .fold(0.0, |acc, weighted| acc + weighted)
    }

    /// Local risk for every indexed point, in index order.
    pub fn compute_all(&self, index: &SpatialIndex, severity_norm: &[f64]) -> Vec<f64> {
        (0..index.len())
            .map(|idx| self.risk_at(index, severity_norm, idx))
            .collect()
    }
}

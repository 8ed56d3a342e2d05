//! Great-circle radius queries over obstacle positions.
//!
//! Points are embedded on the unit sphere and bulk-loaded into an R-tree.
//! A radius query first collects candidates inside the equivalent chord
//! distance, then keeps those whose haversine angle is within the radius.

use crate::models::LatLonRad;
use crate::spatial::{chord_length, haversine_angle, to_unit_vector};
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use std::fmt;

// Widens the chord search so boundary points are decided by the haversine check.
const CHORD_SLACK: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
struct IndexedPoint {
    idx: usize,
    xyz: [f64; 3],
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.xyz)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.xyz[0] - point[0];
        let dy = self.xyz[1] - point[1];
        let dz = self.xyz[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// Immutable spatial index over a fixed set of positions.
pub struct SpatialIndex {
    positions: Vec<LatLonRad>,
    tree: RTree<IndexedPoint>,
}

impl SpatialIndex {
    /// Build the index. Point `i` of the input is reported as index `i`.
    pub fn build(positions: &[LatLonRad]) -> Self {
        let indexed: Vec<IndexedPoint> = positions
            .iter()
            .enumerate()
            .map(|(idx, p)| IndexedPoint {
                idx,
                xyz: to_unit_vector(*p),
            })
            .collect();

        Self {
            positions: positions.to_vec(),
            tree: RTree::bulk_load(indexed),
        }
    }

    /// All indices within `radius_rad` (central angle, inclusive) of `point`,
    /// in ascending order.
    pub fn query_radius(&self, point: LatLonRad, radius_rad: f64) -> Vec<usize> {
        if !(radius_rad >= 0.0) || self.positions.is_empty() {
            return Vec::new();
        }

        let chord = chord_length(radius_rad) * (1.0 + CHORD_SLACK) + CHORD_SLACK;
        let mut hits: Vec<usize> = self
            .tree
            .locate_within_distance(to_unit_vector(point), chord * chord)
            .map(|candidate| candidate.idx)
            .filter(|&idx| haversine_angle(point, self.positions[idx]) <= radius_rad)
            .collect();
        hits.sort_unstable();
        hits
    }

    pub fn position(&self, idx: usize) -> LatLonRad {
        self.positions[idx]
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("points", &self.positions.len())
            .finish()
    }
}

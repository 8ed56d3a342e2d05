//! Local obstacle context around a point, summarized per radius.

use crate::index::SpatialIndex;
use crate::models::LatLonRad;
use crate::spatial::meters_to_radians;
use serde::Serialize;

/// Values emitted per radius: count, mean severity, max severity.
pub const VALUES_PER_RADIUS: usize = 3;

/// Obstacle statistics inside one radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadiusStats {
    pub radius_m: f64,
    pub count: usize,
    pub mean_severity: f64,
    pub max_severity: f64,
}

impl RadiusStats {
    fn empty(radius_m: f64) -> Self {
        Self {
            radius_m,
            count: 0,
            mean_severity: 0.0,
            max_severity: 0.0,
        }
    }
}

/// Per-radius stats in ascending radius order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    stats: Vec<RadiusStats>,
}

impl FeatureVector {
    pub fn stats(&self) -> &[RadiusStats] {
        &self.stats
    }

    /// Number of model inputs this vector flattens to.
    pub fn len(&self) -> usize {
        self.stats.len() * VALUES_PER_RADIUS
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Flattened `[count, mean, max]` triples, smallest radius first.
    pub fn values(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.len());
        self.write_into(&mut out);
        out
    }

    pub(crate) fn write_into(&self, out: &mut Vec<f64>) {
        for s in &self.stats {
            out.push(s.count as f64);
            out.push(s.mean_severity);
            out.push(s.max_severity);
        }
    }

    /// True when no obstacle was found within any radius.
    pub fn is_zero(&self) -> bool {
        self.stats.iter().all(|s| s.count == 0)
    }
}

/// Turns a point into a [`FeatureVector`] using a fixed, ascending list of radii.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    radii_m: Vec<f64>,
}

impl FeatureExtractor {
    /// Radii are sorted ascending and de-duplicated so the output layout is
    /// the same no matter how they were listed.
    pub fn new(radii_m: &[f64]) -> Self {
        let mut radii_m = radii_m.to_vec();
        radii_m.sort_by(f64::total_cmp);
        radii_m.dedup();
        Self { radii_m }
    }

    pub fn radii_m(&self) -> &[f64] {
        &self.radii_m
    }

    /// Length of every vector this extractor produces.
    pub fn feature_len(&self) -> usize {
        self.radii_m.len() * VALUES_PER_RADIUS
    }

    /// `severity_norm[i]` must be the normalized severity of index point `i`.
    pub fn extract(
        &self,
        index: &SpatialIndex,
        severity_norm: &[f64],
        point: LatLonRad,
    ) -> FeatureVector {
        let stats = self
            .radii_m
            .iter()
            .map(|&radius_m| {
                let neighbors = index.query_radius(point, meters_to_radians(radius_m));
                summarize(radius_m, &neighbors, severity_norm)
            })
            .collect();
        FeatureVector { stats }
    }
}

fn summarize(radius_m: f64, neighbors: &[usize], severity_norm: &[f64]) -> RadiusStats {
    if neighbors.is_empty() {
        return RadiusStats::empty(radius_m);
    }

    let mut sum = 0.0;
    let mut max = f64::NEG_INFINITY;
    for &idx in neighbors {
        let severity = severity_norm[idx];
        sum += severity;
        max = max.max(severity);
    }

    RadiusStats {
        radius_m,
        count: neighbors.len(),
        mean_severity: sum / neighbors.len() as f64,
        max_severity: max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LatLon;
    use crate::spatial::destination;

    fn point_at(origin: LatLon, distance_m: f64) -> LatLonRad {
        destination(origin.to_radians(), distance_m, 0.0)
    }

    #[test]
    fn radii_are_sorted_and_deduplicated() {
        let extractor = FeatureExtractor::new(&[50.0, 10.0, 25.0, 10.0]);
        assert_eq!(extractor.radii_m(), &[10.0, 25.0, 50.0]);
        assert_eq!(extractor.feature_len(), 9);
    }

    #[test]
    fn summarizes_each_radius() {
        let origin = LatLon::new(40.0, -73.0);
        let positions = vec![
            origin.to_radians(),
            point_at(origin, 15.0),
            point_at(origin, 40.0),
        ];
        let severity = vec![0.2, 0.6, 1.0];
        let index = SpatialIndex::build(&positions);
        let extractor = FeatureExtractor::new(&[10.0, 25.0, 50.0]);

        let features = extractor.extract(&index, &severity, origin.to_radians());
        let stats = features.stats();

        assert_eq!(stats[0].count, 1);
        assert_eq!(stats[0].mean_severity, 0.2);
        assert_eq!(stats[1].count, 2);
        assert!((stats[1].mean_severity - 0.4).abs() < 1e-12);
        assert_eq!(stats[1].max_severity, 0.6);
        assert_eq!(stats[2].count, 3);
        assert_eq!(stats[2].max_severity, 1.0);

        let values = features.values();
        assert_eq!(values.len(), 9);
        assert_eq!(values[0], 1.0);
        assert_eq!(values[3], 2.0);
        assert_eq!(values[6], 3.0);
    }

    #[test]
    fn isolated_point_yields_all_zeros() {
        let origin = LatLon::new(40.0, -73.0);
        let index = SpatialIndex::build(&[origin.to_radians()]);
        let extractor = FeatureExtractor::new(&[10.0, 25.0, 50.0]);

        let features = extractor.extract(&index, &[1.0], point_at(origin, 1_000.0));
        assert!(features.is_zero());
        assert!(features.values().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn repeated_extraction_is_bit_identical() {
        let origin = LatLon::new(47.6, -122.3);
        let positions: Vec<LatLonRad> = (0..30)
            .map(|i| point_at(origin, i as f64 * 2.5))
            .collect();
        let severity: Vec<f64> = (0..30).map(|i| (i % 5 + 1) as f64 / 5.0).collect();
        let index = SpatialIndex::build(&positions);
        let extractor = FeatureExtractor::new(&[10.0, 25.0, 50.0]);

        let query = point_at(origin, 12.0);
        let first: Vec<u64> = extractor
            .extract(&index, &severity, query)
            .values()
            .iter()
            .map(|v| v.to_bits())
            .collect();
        let second: Vec<u64> = extractor
            .extract(&index, &severity, query)
            .values()
            .iter()
            .map(|v| v.to_bits())
            .collect();
        assert_eq!(first, second);
    }
}

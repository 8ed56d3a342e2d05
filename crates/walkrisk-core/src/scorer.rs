//! Route scoring: per-point risk predictions averaged along the route.

use crate::context::RiskContext;
use crate::error::ScoreError;
use crate::models::LatLon;

/// Scores routes against a built [`RiskContext`]. Holds no state of its own,
/// so any number of scorers may share one context.
#[derive(Debug, Clone, Copy)]
pub struct RouteScorer<'a> {
    context: &'a RiskContext,
}

impl<'a> RouteScorer<'a> {
    pub fn new(context: &'a RiskContext) -> Self {
        Self { context }
    }

    /// Predicted local risk at a single point.
    pub fn score_point(&self, point: LatLon) -> Result<f64, ScoreError> {
        let features = self.context.extract(point.to_radians());
        Ok(self.context.model().predict_one(&features)?)
    }

    /// Mean point risk over the route. An empty route scores 0.0.
    pub fn score(&self, route: &[LatLon]) -> Result<f64, ScoreError> {
        if route.is_empty() {
            return Ok(0.0);
        }
        let mut total = 0.0;
        for point in route {
            total += self.score_point(*point)?;
        }
        Ok(total / route.len() as f64)
    }

    /// Score raw `[latitude, longitude]` pairs as received from a client.
    /// Any malformed pair rejects the whole route.
    pub fn predict_route_severity_risk(&self, route_points: &[Vec<f64>]) -> Result<f64, ScoreError> {
        let route = route_points
            .iter()
            .enumerate()
            .map(|(index, pair)| LatLon::from_pair(index, pair))
            .collect::<Result<Vec<_>, _>>()?;
        self.score(&route)
    }
}

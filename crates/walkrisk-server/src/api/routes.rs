//! REST API routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use walkrisk_core::{ContextSummary, ScoreError};

use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/predict-route-severity", post(predict_route_severity))
        .route("/v1/model", get(model_summary))
}

// === Request/Response types ===

/// A route as `[latitude, longitude]` pairs in degrees.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub points: Vec<Vec<f64>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteSeverityResponse {
    pub severity: f64,
}

const POINT_HINT: &str = "Each point must be a [latitude, longitude] pair of finite numbers";

// === Handlers ===

async fn predict_route_severity(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> Result<Json<RouteSeverityResponse>, (StatusCode, Json<Value>)> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::warn!("Rejected route body: {}", rejection.body_text());
        (
            rejection.status(),
            Json(json!({
                "error": rejection.body_text(),
                "hint": POINT_HINT,
            })),
        )
    })?;

    let limit = state.config().max_route_points;
    if limit > 0 && req.points.len() > limit {
        return Err((
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(json!({
                "error": "Route has too many points",
                "hint": "Split the route or raise WALKRISK_MAX_ROUTE_POINTS",
                "limit": limit,
                "points": req.points.len(),
            })),
        ));
    }

    match state.scorer().predict_route_severity_risk(&req.points) {
        Ok(severity) => {
            tracing::debug!("Scored route of {} points: {:.6}", req.points.len(), severity);
            Ok(Json(RouteSeverityResponse { severity }))
        }
        Err(ScoreError::Shape(err)) => {
            tracing::warn!("Rejected route: {}", err);
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "error": err.to_string(),
                    "hint": POINT_HINT,
                })),
            ))
        }
        Err(ScoreError::Model(err)) => {
            tracing::error!("Scoring failed: {}", err);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Scoring failed" })),
            ))
        }
    }
}

async fn model_summary(State(state): State<Arc<AppState>>) -> Json<ContextSummary> {
    Json(state.context().summary())
}

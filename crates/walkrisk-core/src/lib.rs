//! Walk-risk core: accessibility-obstacle risk scoring for walking routes.
//!
//! Obstacles are loaded from CSV, indexed for great-circle radius queries,
//! summarized into per-radius features and fed to a gradient-boosted
//! regressor trained on a distance-weighted local-risk target.

pub mod config;
pub mod context;
pub mod dataset;
pub mod error;
pub mod features;
pub mod index;
pub mod model;
pub mod models;
pub mod scorer;
pub mod spatial;
pub mod target;

pub use config::{BoostingParams, RiskConfig, SeverityScale};
pub use context::{ContextSummary, RiskContext};
pub use dataset::ObstacleDataset;
pub use error::{
    ConfigError, DataLoadError, InputShapeError, ModelError, PipelineError, ScoreError,
};
pub use features::{FeatureExtractor, FeatureVector, RadiusStats};
pub use index::SpatialIndex;
pub use model::{ModelEvaluation, RiskModel};
pub use models::{LatLon, LatLonRad, Obstacle, ObstacleRecord};
pub use scorer::RouteScorer;
pub use spatial::{haversine_distance, EARTH_RADIUS_M};
pub use target::LocalRiskTarget;

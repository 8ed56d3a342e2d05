//! The immutable, process-lifetime pipeline state.
//!
//! Everything expensive happens once in [`RiskContext::build`]: spatial
//! indexing, feature extraction over every obstacle, target computation and
//! model fitting. The result is read-only and safe to share across threads.

use crate::config::RiskConfig;
use crate::dataset::ObstacleDataset;
use crate::error::PipelineError;
use crate::features::{FeatureExtractor, FeatureVector};
use crate::index::SpatialIndex;
use crate::model::{feature_matrix, train_test_split, ModelEvaluation, RiskModel};
use crate::models::LatLonRad;
use crate::target::LocalRiskTarget;
use linfa::Dataset;
use ndarray::Array1;
use serde::Serialize;
use std::path::Path;

#[derive(Debug)]
pub struct RiskContext {
    config: RiskConfig,
    dataset: ObstacleDataset,
    severity_norm: Vec<f64>,
    index: SpatialIndex,
    extractor: FeatureExtractor,
    model: RiskModel,
    evaluation: Option<ModelEvaluation>,
}

/// Snapshot of the context for logs and status endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ContextSummary {
    pub obstacles: usize,
    pub dropped_without_severity: usize,
    pub feature_radii_m: Vec<f64>,
    pub feature_len: usize,
    pub decay_m: f64,
    pub target_radius_m: f64,
    pub n_trees: usize,
    /// Prediction for a point with no nearby obstacles
    pub baseline_risk: f64,
    pub evaluation: Option<ModelEvaluation>,
}

impl RiskContext {
    /// Load the CSV at `path` and build the full pipeline.
    pub fn from_csv_path(config: RiskConfig, path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        config.validate()?;
        let dataset = ObstacleDataset::load(path, config.severity_scale)?;
        Self::build(config, dataset)
    }

    pub fn build(config: RiskConfig, dataset: ObstacleDataset) -> Result<Self, PipelineError> {
        config.validate()?;
        if dataset.is_empty() {
            return Err(PipelineError::EmptyDataset);
        }

        let positions = dataset.positions();
        let severity_norm: Vec<f64> = dataset.obstacles().iter().map(|o| o.severity_norm).collect();
        let index = SpatialIndex::build(&positions);
        tracing::debug!("Built spatial index over {} obstacles", index.len());

        let extractor = FeatureExtractor::new(&config.feature_radii_m);
        let features: Vec<FeatureVector> = positions
            .iter()
            .map(|p| extractor.extract(&index, &severity_norm, *p))
            .collect();
        let x = feature_matrix(&features)?;

        let target = LocalRiskTarget::new(config.decay_m, config.target_radius_m);
        let y = target.compute_all(&index, &severity_norm);
        tracing::debug!(
            "Computed {} feature rows ({} columns) and local-risk targets",
            x.nrows(),
            x.ncols()
        );

        let samples = Dataset::new(x, Array1::from(y));
        let (train, test) =
            train_test_split(samples, config.test_fraction, config.split_seed);
        // Scaling statistics are fitted after the split, on training rows
        // only, rather than on every row before splitting.
        let model = RiskModel::fit(&train, &config.boosting)?;
        let train_rows = train.records().nrows();

        let evaluation = if test.records().nrows() == 0 {
            None
        } else {
            let predicted = model.predict_matrix(test.records())?;
            ModelEvaluation::from_predictions(train_rows, test.targets(), &predicted)
        };

        match &evaluation {
            Some(eval) => tracing::info!(
                "Trained {} trees on {} rows; held-out {} rows: MSE {:.6}, MAE {:.6}, R2 {:.4}",
                model.n_trees(),
                eval.train_rows,
                eval.test_rows,
                eval.mse,
                eval.mae,
                eval.r2
            ),
            None => tracing::info!(
                "Trained {} trees on {} rows; dataset too small for a held-out split",
                model.n_trees(),
                train_rows
            ),
        }

        Ok(Self {
            config,
            dataset,
            severity_norm,
            index,
            extractor,
            model,
            evaluation,
        })
    }

    /// Features for an arbitrary point, laid out exactly as in training.
    pub fn extract(&self, point: LatLonRad) -> FeatureVector {
        self.extractor.extract(&self.index, &self.severity_norm, point)
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    pub fn dataset(&self) -> &ObstacleDataset {
        &self.dataset
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn model(&self) -> &RiskModel {
        &self.model
    }

    pub fn evaluation(&self) -> Option<&ModelEvaluation> {
        self.evaluation.as_ref()
    }

    /// Local-risk target for dataset obstacle `idx` under this context's config.
    pub fn local_risk(&self, idx: usize) -> f64 {
        LocalRiskTarget::new(self.config.decay_m, self.config.target_radius_m).risk_at(
            &self.index,
            &self.severity_norm,
            idx,
        )
    }

    pub fn summary(&self) -> ContextSummary {
        ContextSummary {
            obstacles: self.dataset.len(),
            dropped_without_severity: self.dataset.dropped_without_severity(),
            feature_radii_m: self.extractor.radii_m().to_vec(),
            feature_len: self.extractor.feature_len(),
            decay_m: self.config.decay_m,
            target_radius_m: self.config.target_radius_m,
            n_trees: self.model.n_trees(),
            baseline_risk: self.model.baseline(),
            evaluation: self.evaluation,
        }
    }
}

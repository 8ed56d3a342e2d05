//! Pipeline configuration: feature radii, target shape and boosting parameters.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How raw 1–5 severities are mapped into [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "divisor")]
pub enum SeverityScale {
    /// Divide by a fixed constant (5.0 for the 1–5 rating scale).
    Fixed(f64),
    /// Divide by the largest severity present in the dataset.
    DatasetMax,
}

impl Default for SeverityScale {
    fn default() -> Self {
        SeverityScale::Fixed(5.0)
    }
}

/// Gradient boosting hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    /// Fraction of training rows drawn (without replacement) for each tree
    pub subsample: f64,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 400,
            learning_rate: 0.05,
            max_depth: 4,
            subsample: 0.8,
            min_samples_split: 2,
            min_samples_leaf: 1,
            seed: 42,
        }
    }
}

/// Configuration for the whole risk pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Neighborhood radii for feature extraction, in meters
    pub feature_radii_m: Vec<f64>,
    /// Distance scale of the exponential weight in the local-risk target
    pub decay_m: f64,
    /// Neighbors beyond this distance do not contribute to local risk
    pub target_radius_m: f64,
    pub severity_scale: SeverityScale,
    /// Share of rows held out for evaluation
    pub test_fraction: f64,
    pub split_seed: u64,
    pub boosting: BoostingParams,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            feature_radii_m: vec![10.0, 25.0, 50.0],
            decay_m: 20.0,
            target_radius_m: 50.0,
            severity_scale: SeverityScale::default(),
            test_fraction: 0.2,
            split_seed: 42,
            boosting: BoostingParams::default(),
        }
    }
}

impl RiskConfig {
    /// Read a JSON config file. Missing fields fall back to defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: RiskConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feature_radii_m.is_empty() {
            return Err(invalid("feature_radii_m must not be empty"));
        }
        if self
            .feature_radii_m
            .iter()
            .any(|r| !r.is_finite() || *r <= 0.0)
        {
            return Err(invalid("feature radii must be positive and finite"));
        }
        if !is_positive(self.decay_m) {
            return Err(invalid("decay_m must be positive and finite"));
        }
        if !is_positive(self.target_radius_m) {
            return Err(invalid("target_radius_m must be positive and finite"));
        }
        if let SeverityScale::Fixed(divisor) = self.severity_scale {
            if !is_positive(divisor) {
                return Err(invalid("fixed severity divisor must be positive"));
            }
        }
        if !(0.0..1.0).contains(&self.test_fraction) {
            return Err(invalid("test_fraction must be in [0, 1)"));
        }

        let boosting = &self.boosting;
        if boosting.n_estimators == 0 {
            return Err(invalid("n_estimators must be at least 1"));
        }
        if boosting.max_depth == 0 {
            return Err(invalid("max_depth must be at least 1"));
        }
        if !is_positive(boosting.learning_rate) {
            return Err(invalid("learning_rate must be positive"));
        }
        if !(boosting.subsample > 0.0 && boosting.subsample <= 1.0) {
            return Err(invalid("subsample must be in (0, 1]"));
        }
        if boosting.min_samples_split < 2 || boosting.min_samples_leaf == 0 {
            return Err(invalid(
                "min_samples_split must be >= 2 and min_samples_leaf >= 1",
            ));
        }
        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::Invalid(msg.to_string())
}

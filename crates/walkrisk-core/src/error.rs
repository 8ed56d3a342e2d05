//! Error types for loading, training and scoring.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures while reading the obstacle dataset.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to open dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("required column `{0}` is missing from the dataset header")]
    MissingColumn(&'static str),
    #[error("malformed dataset row: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {column} is not a finite number")]
    NonFinite { row: usize, column: &'static str },
}

/// A caller-supplied route coordinate that is not a finite `[lat, lon]` pair.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputShapeError {
    #[error("route point {index} has {len} values, expected [latitude, longitude]")]
    WrongArity { index: usize, len: usize },
    #[error("route point {index} contains a non-finite coordinate")]
    NonFinite { index: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("feature vector has {got} values, model expects {expected}")]
    FeatureLength { expected: usize, got: usize },
    #[error("{features} feature rows but {targets} targets")]
    SampleCount { features: usize, targets: usize },
    #[error("cannot fit a model without training rows")]
    EmptyTrainingSet,
    #[error("feature scaling failed: {0}")]
    Scaling(String),
    #[error("learning failed: {0}")]
    Learning(String),
}

impl From<linfa::error::Error> for ModelError {
    fn from(err: linfa::error::Error) -> Self {
        ModelError::Learning(err.to_string())
    }
}

/// Failure to score a route: bad input, or a model that cannot take it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error(transparent)]
    Shape(#[from] InputShapeError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid pipeline config: {0}")]
    Invalid(String),
    #[error("failed to read pipeline config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse pipeline config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Anything that can abort construction of a [`crate::RiskContext`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] DataLoadError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("dataset has no obstacles with a severity rating")]
    EmptyDataset,
}

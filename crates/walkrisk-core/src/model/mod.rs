//! Risk regressor: a fitted linfa standard scaler in front of a boosted tree
//! ensemble.

mod boosting;
mod metrics;
mod split;
mod tree;

pub use boosting::GradientBoostedRegressor;
pub use metrics::ModelEvaluation;
pub use split::train_test_split;
pub use tree::{RegressionTree, TreeParams};

use crate::config::BoostingParams;
use crate::error::ModelError;
use crate::features::FeatureVector;
use linfa::traits::{Fit, Predict, Transformer};
use linfa::Dataset;
use linfa_preprocessing::linear_scaling::LinearScaler;
use ndarray::{Array1, Array2, Axis, Ix1};

/// Stack feature vectors into a row-per-point matrix. Every vector must have
/// the same length.
pub fn feature_matrix(features: &[FeatureVector]) -> Result<Array2<f64>, ModelError> {
    let width = features.first().map(FeatureVector::len).unwrap_or(0);
    let mut values = Vec::with_capacity(features.len() * width);
    for fv in features {
        if fv.len() != width {
            return Err(ModelError::FeatureLength {
                expected: width,
                got: fv.len(),
            });
        }
        fv.write_into(&mut values);
    }
    Array2::from_shape_vec((features.len(), width), values).map_err(|_| {
        ModelError::FeatureLength {
            expected: width,
            got: 0,
        }
    })
}

/// The fitted model. Scaling statistics are learned during `fit` and applied
/// unchanged to every prediction.
#[derive(Debug)]
pub struct RiskModel {
    scaler: LinearScaler<f64>,
    regressor: GradientBoostedRegressor,
}

impl RiskModel {
    /// Fit the scaler and the ensemble on `train`. The scaler only ever sees
    /// these rows.
    pub fn fit(train: &Dataset<f64, f64, Ix1>, params: &BoostingParams) -> Result<Self, ModelError> {
        let rows = train.records().nrows();
        if rows != train.targets().len() {
            return Err(ModelError::SampleCount {
                features: rows,
                targets: train.targets().len(),
            });
        }
        if rows == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }

        let scaler = LinearScaler::standard()
            .fit(train)
            .map_err(|err| ModelError::Scaling(err.to_string()))?;
        let scaled = Dataset::new(
            scaler.transform(train.records().clone()),
            train.targets().clone(),
        );
        let regressor = params.fit(&scaled)?;
        Ok(Self { scaler, regressor })
    }

    pub fn n_features(&self) -> usize {
        self.regressor.n_features()
    }

    pub fn n_trees(&self) -> usize {
        self.regressor.n_trees()
    }

    pub fn scaler(&self) -> &LinearScaler<f64> {
        &self.scaler
    }

    /// Predict from raw (unscaled) feature values.
    pub fn predict_values(&self, values: &[f64]) -> Result<f64, ModelError> {
        if values.len() != self.n_features() {
            return Err(ModelError::FeatureLength {
                expected: self.n_features(),
                got: values.len(),
            });
        }
        let row = Array1::from(values.to_vec()).insert_axis(Axis(0));
        Ok(self.predict_checked_row(row))
    }

    pub fn predict_one(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        self.predict_values(&features.values())
    }

    pub fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>, ModelError> {
        features.iter().map(|fv| self.predict_one(fv)).collect()
    }

    /// Predict every row of a raw feature matrix.
    pub fn predict_matrix(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        if x.ncols() != self.n_features() {
            return Err(ModelError::FeatureLength {
                expected: self.n_features(),
                got: x.ncols(),
            });
        }
        Ok(self.regressor.predict(&self.scaler.transform(x.clone())))
    }

    /// Risk predicted for a point with no obstacles in any radius.
    pub fn baseline(&self) -> f64 {
        self.predict_checked_row(Array2::zeros((1, self.n_features())))
    }

    // `row` is a single raw row already known to be `n_features` wide.
    fn predict_checked_row(&self, row: Array2<f64>) -> f64 {
        let scaled = self.scaler.transform(row);
        self.regressor.predict_row(scaled.row(0))
    }
}

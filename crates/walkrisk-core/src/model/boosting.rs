//! Stochastic gradient boosting with squared-error loss.
//!
//! Hyperparameters fit through linfa's [`Fit`] trait and the fitted ensemble
//! predicts through [`PredictInplace`], so it is used like any linfa model:
//! `params.fit(&dataset)?.predict(&records)`.

use crate::config::BoostingParams;
use crate::error::ModelError;
use crate::model::tree::{RegressionTree, SortedColumns, TreeParams};
use linfa::traits::{Fit, PredictInplace};
use linfa::DatasetBase;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Data, Ix2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// An additive ensemble: `init + learning_rate * sum(tree(x))`.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientBoostedRegressor {
    init: f64,
    learning_rate: f64,
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl Fit<Array2<f64>, Array1<f64>, ModelError> for BoostingParams {
    type Object = GradientBoostedRegressor;

    /// Fit `n_estimators` trees, each on a fresh seeded subsample of rows,
    /// to the residuals of the ensemble so far.
    fn fit(
        &self,
        dataset: &DatasetBase<Array2<f64>, Array1<f64>>,
    ) -> Result<GradientBoostedRegressor, ModelError> {
        let x = dataset.records();
        let y = dataset.targets();
        let n = x.nrows();
        if y.len() != n {
            return Err(ModelError::SampleCount {
                features: n,
                targets: y.len(),
            });
        }
        if n == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }

        let init = y.sum() / n as f64;
        let tree_params = TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        };
        let sorted = SortedColumns::new(x);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let n_inbag = ((self.subsample * n as f64) as usize).clamp(1, n);

        let mut predictions = vec![init; n];
        let mut residuals = vec![0.0; n];
        let mut in_sample = vec![true; n];
        let mut order: Vec<usize> = (0..n).collect();
        let mut trees = Vec::with_capacity(self.n_estimators);

        for _ in 0..self.n_estimators {
            for i in 0..n {
                residuals[i] = y[i] - predictions[i];
            }

            if n_inbag < n {
                order.shuffle(&mut rng);
                in_sample.fill(false);
                for &row in &order[..n_inbag] {
                    in_sample[row] = true;
                }
            }

            let tree = RegressionTree::fit(x, &residuals, &sorted, &in_sample, tree_params);
            for (i, prediction) in predictions.iter_mut().enumerate() {
                *prediction += self.learning_rate * tree.predict(x.row(i));
            }
            trees.push(tree);
        }

        let train_mse = y
            .iter()
            .zip(&predictions)
            .map(|(t, p)| (t - p).powi(2))
            .sum::<f64>()
            / n as f64;
        tracing::debug!(
            "Boosted {} trees on {} rows (in-bag {}), training MSE {:.6}",
            trees.len(),
            n,
            n_inbag,
            train_mse
        );

        Ok(GradientBoostedRegressor {
            init,
            learning_rate: self.learning_rate,
            n_features: x.ncols(),
            trees,
        })
    }
}

impl<D: Data<Elem = f64>> PredictInplace<ArrayBase<D, Ix2>, Array1<f64>> for GradientBoostedRegressor {
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<f64>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "one target slot is needed per record"
        );
        for (target, row) in y.iter_mut().zip(x.rows()) {
            *target = self.predict_row(row);
        }
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<f64> {
        Array1::zeros(x.nrows())
    }
}

impl GradientBoostedRegressor {
    /// Predict one already-scaled row. Stages accumulate in the same order
    /// as during fitting.
    pub fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        self.trees.iter().fold(self.init, |acc, tree| {
            acc + self.learning_rate * tree.predict(row)
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Prediction before any tree contributes: the training-target mean.
    pub fn init(&self) -> f64 {
        self.init
    }
}

//! Regression metrics on the held-out split.

use linfa::prelude::SingleTargetRegression;
use ndarray::Array1;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelEvaluation {
    pub train_rows: usize,
    pub test_rows: usize,
    pub mse: f64,
    pub mae: f64,
    pub r2: f64,
}

impl ModelEvaluation {
    /// Score predictions against held-out targets. Returns `None` when there
    /// is nothing to score.
    pub fn from_predictions(
        train_rows: usize,
        actual: &Array1<f64>,
        predicted: &Array1<f64>,
    ) -> Option<Self> {
        if actual.is_empty() || actual.len() != predicted.len() {
            return None;
        }

        let mse = predicted.mean_squared_error(actual).ok()?;
        let mae = predicted.mean_absolute_error(actual).ok()?;
        // R2 is undefined for constant targets; call it perfect or nothing.
        let constant = actual.iter().all(|a| *a == actual[0]);
        let r2 = match (constant, mse == 0.0) {
            (true, true) => 1.0,
            (true, false) => 0.0,
            (false, _) => predicted.r2(actual).ok()?,
        };

        Some(Self {
            train_rows,
            test_rows: actual.len(),
            mse,
            mae,
            r2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn computes_standard_metrics() {
        let eval =
            ModelEvaluation::from_predictions(10, &array![1.0, 2.0, 3.0], &array![1.0, 2.0, 5.0])
                .unwrap();
        assert_eq!(eval.train_rows, 10);
        assert_eq!(eval.test_rows, 3);
        assert!((eval.mse - 4.0 / 3.0).abs() < 1e-12);
        assert!((eval.mae - 2.0 / 3.0).abs() < 1e-12);
        assert!((eval.r2 - (1.0 - 4.0 / 2.0)).abs() < 1e-6);
    }

    #[test]
    fn constant_targets_are_defined() {
        let perfect =
            ModelEvaluation::from_predictions(1, &array![0.5, 0.5], &array![0.5, 0.5]).unwrap();
        assert_eq!(perfect.r2, 1.0);
        let off =
            ModelEvaluation::from_predictions(1, &array![0.5, 0.5], &array![0.4, 0.6]).unwrap();
        assert_eq!(off.r2, 0.0);
    }

    #[test]
    fn empty_split_has_no_evaluation() {
        let none = Array1::<f64>::zeros(0);
        assert!(ModelEvaluation::from_predictions(5, &none, &none).is_none());
    }
}

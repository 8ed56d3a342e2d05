//! Seeded train/test partitioning of a linfa dataset.

use linfa::Dataset;
use ndarray::{Array1, Array2, Axis, Ix1};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle rows with `seed`, then let linfa cut the shuffled dataset into
/// `(train, test)` with `test_fraction` of the rows held out.
///
/// Datasets with fewer than two rows, or a zero fraction, train on every row
/// and leave the test side empty.
pub fn train_test_split(
    dataset: Dataset<f64, f64, Ix1>,
    test_fraction: f64,
    seed: u64,
) -> (Dataset<f64, f64, Ix1>, Dataset<f64, f64, Ix1>) {
    let n = dataset.records().nrows();
    let ncols = dataset.records().ncols();
    if n < 2 || test_fraction <= 0.0 {
        let empty = Dataset::new(Array2::zeros((0, ncols)), Array1::zeros(0));
        return (dataset, empty);
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));
    let shuffled = Dataset::new(
        dataset.records().select(Axis(0), &order),
        dataset.targets().select(Axis(0), &order),
    );
    shuffled.split_with_ratio((1.0 - test_fraction.min(1.0)) as f32)
}

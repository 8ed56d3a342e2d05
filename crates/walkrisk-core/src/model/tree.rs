//! Least-squares regression trees used as boosting stages.
//!
//! Columns are argsorted once per fit. Each node carries its rows in sorted
//! order for every feature and hands stable partitions of those lists to its
//! children, so split search never re-sorts.

use ndarray::{Array2, ArrayView1};

// Splits must reduce squared error by more than this to be kept.
const MIN_GAIN: f64 = 1e-12;

#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Row indices of a feature matrix sorted by each column.
#[derive(Debug, Clone)]
pub struct SortedColumns {
    order: Vec<Vec<usize>>,
}

impl SortedColumns {
    pub fn new(x: &Array2<f64>) -> Self {
        let order = (0..x.ncols())
            .map(|feature| {
                let mut rows: Vec<usize> = (0..x.nrows()).collect();
                rows.sort_by(|&a, &b| {
                    x[[a, feature]]
                        .total_cmp(&x[[b, feature]])
                        .then(a.cmp(&b))
                });
                rows
            })
            .collect();
        Self { order }
    }
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Fit on the rows flagged in `in_sample`, regressing `targets`.
    pub fn fit(
        x: &Array2<f64>,
        targets: &[f64],
        sorted: &SortedColumns,
        in_sample: &[bool],
        params: TreeParams,
    ) -> Self {
        let columns: Vec<Vec<usize>> = sorted
            .order
            .iter()
            .map(|col| col.iter().copied().filter(|&r| in_sample[r]).collect())
            .collect();

        let mut builder = TreeBuilder {
            x,
            targets,
            params,
            nodes: Vec::new(),
            goes_left: vec![false; x.nrows()],
        };
        builder.grow(columns, 0);
        Self {
            nodes: builder.nodes,
        }
    }

    pub fn predict(&self, row: ArrayView1<f64>) -> f64 {
        let mut node = 0;
        loop {
            match self.nodes[node] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], node: usize) -> usize {
            match nodes[node] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        walk(&self.nodes, 0)
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }
}

struct TreeBuilder<'a> {
    x: &'a Array2<f64>,
    targets: &'a [f64],
    params: TreeParams,
    nodes: Vec<Node>,
    goes_left: Vec<bool>,
}

impl TreeBuilder<'_> {
    /// Grow the subtree over `columns` (per-feature sorted row lists that all
    /// hold the same rows) and return its node index.
    fn grow(&mut self, columns: Vec<Vec<usize>>, depth: usize) -> usize {
        let rows = columns.first().map(Vec::as_slice).unwrap_or(&[]);
        let n = rows.len();
        let sum: f64 = rows.iter().map(|&r| self.targets[r]).sum();
        let value = if n > 0 { sum / n as f64 } else { 0.0 };

        let splittable = depth < self.params.max_depth
            && n >= self.params.min_samples_split
            && n >= 2 * self.params.min_samples_leaf;
        let split = if splittable {
            self.best_split(&columns, sum)
        } else {
            None
        };

        let Some(split) = split else {
            self.nodes.push(Node::Leaf { value });
            return self.nodes.len() - 1;
        };

        let node = self.nodes.len();
        self.nodes.push(Node::Leaf { value });

        for &r in rows {
            self.goes_left[r] = self.x[[r, split.feature]] <= split.threshold;
        }
        let (left_cols, right_cols): (Vec<Vec<usize>>, Vec<Vec<usize>>) = columns
            .into_iter()
            .map(|col| -> (Vec<usize>, Vec<usize>) {
                col.into_iter().partition(|&r| self.goes_left[r])
            })
            .unzip();

        let left = self.grow(left_cols, depth + 1);
        let right = self.grow(right_cols, depth + 1);
        self.nodes[node] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node
    }

    /// Maximize `sum_l^2 / n_l + sum_r^2 / n_r`, which is the same as
    /// minimizing the children's summed squared error.
    fn best_split(&self, columns: &[Vec<usize>], total: f64) -> Option<SplitCandidate> {
        let n = columns.first()?.len();
        if n < 2 {
            return None;
        }
        let min_leaf = self.params.min_samples_leaf;
        let parent_score = total * total / n as f64;
        let mut best: Option<SplitCandidate> = None;

        for (feature, col) in columns.iter().enumerate() {
            let mut left_sum = 0.0;
            for i in 0..n - 1 {
                let row = col[i];
                left_sum += self.targets[row];
                let n_left = i + 1;
                let n_right = n - n_left;
                if n_left < min_leaf {
                    continue;
                }
                if n_right < min_leaf {
                    break;
                }

                let value = self.x[[row, feature]];
                let next = self.x[[col[i + 1], feature]];
                if next <= value {
                    continue;
                }

                let right_sum = total - left_sum;
                let score =
                    left_sum * left_sum / n_left as f64 + right_sum * right_sum / n_right as f64;
                if best.map_or(true, |b| score > b.score) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: midpoint(value, next),
                        score,
                    });
                }
            }
        }

        best.filter(|b| b.score - parent_score > MIN_GAIN)
    }
}

fn midpoint(low: f64, high: f64) -> f64 {
    let mid = low / 2.0 + high / 2.0;
    if mid >= high || !mid.is_finite() {
        low
    } else {
        mid
    }
}

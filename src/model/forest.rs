//! Random Forest Regressor
//!
//! Bagged ensemble of regression trees; predictions are averaged.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::tree::RegressionTree;

/// Hyper-parameters of the forest
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of trees
    pub n_trees: usize,
    /// Minimum number of samples in a leaf
    pub min_samples_leaf: usize,
    /// Random seed for bootstrap sampling
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 300,
            min_samples_leaf: 2,
            seed: 42,
        }
    }
}

/// Random forest ensemble
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    params: ForestParams,
    /// Width of the rows seen during fit
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl RandomForestRegressor {
    pub fn new(params: ForestParams) -> Self {
        Self {
            params,
            n_features: 0,
            trees: Vec::new(),
        }
    }

    /// Fit the forest. Each tree sees a bootstrap sample of the same size
    /// as the training set.
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) {
        self.trees.clear();
        self.n_features = 0;
        if x.is_empty() || x.len() != y.len() {
            return;
        }

        self.n_features = x[0].len();
        let mut rng = ChaCha8Rng::seed_from_u64(self.params.seed);
        let n = x.len();

        for _ in 0..self.params.n_trees {
            let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();

            let mut tree = RegressionTree::new(self.params.min_samples_leaf);
            tree.fit(x, y, &bootstrap);
            self.trees.push(tree);
        }

        tracing::debug!(
            trees = self.trees.len(),
            nodes = self.trees.iter().map(RegressionTree::node_count).sum::<usize>(),
            "forest fitted"
        );
    }

    /// Predict by averaging the trees
    pub fn predict(&self, row: &[f64]) -> Option<f64> {
        if self.trees.is_empty() {
            return None;
        }

        let predictions: Vec<f64> = self.trees.iter().filter_map(|t| t.predict(row)).collect();
        if predictions.is_empty() {
            return None;
        }

        Some(predictions.iter().sum::<f64>() / predictions.len() as f64)
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

//! CART regression tree.
//!
//! Splits minimize the squared error of the children. Nodes live in a flat
//! arena; node 0 is the root.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
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

/// Regression tree grown until leaves are pure or too small to split
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
    min_samples_leaf: usize,
    min_samples_split: usize,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    score: f64,
}

impl RegressionTree {
    pub fn new(min_samples_leaf: usize) -> Self {
        Self {
            nodes: Vec::new(),
            min_samples_leaf: min_samples_leaf.max(1),
            min_samples_split: 2,
        }
    }

    /// Fit on the rows of `x` selected by `indices` (duplicates allowed).
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64], indices: &[usize]) {
        self.nodes.clear();
        if indices.is_empty() {
            return;
        }

        self.nodes.push(TreeNode::Leaf { value: 0.0 });
        let mut pending = vec![(0usize, indices.to_vec())];

        while let Some((node, mut samples)) = pending.pop() {
            let split = self.best_split(x, y, &mut samples);
            let Some(split) = split else {
                self.nodes[node] = TreeNode::Leaf {
                    value: mean(samples.iter().map(|&i| y[i])),
                };
                continue;
            };

            let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
                .into_iter()
                .partition(|&i| x[i][split.feature] <= split.threshold);

            let left = self.nodes.len();
            let right = left + 1;
            self.nodes.push(TreeNode::Leaf { value: 0.0 });
            self.nodes.push(TreeNode::Leaf { value: 0.0 });
            self.nodes[node] = TreeNode::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            };

            pending.push((right, right_samples));
            pending.push((left, left_samples));
        }
    }

    fn best_split(&self, x: &[Vec<f64>], y: &[f64], samples: &mut [usize]) -> Option<BestSplit> {
        let n = samples.len();
        if n < self.min_samples_split || n < 2 * self.min_samples_leaf {
            return None;
        }

        let total: f64 = samples.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = samples.iter().map(|&i| y[i] * y[i]).sum();
        // Sum of squared errors is total_sq - sum^2/n, so maximizing the
        // sum of sum^2/n over both children minimizes the children's error.
        let parent_score = total * total / n as f64;
        if total_sq - parent_score <= f64::EPSILON * total_sq.abs().max(1.0) {
            return None;
        }

        let n_features = x[samples[0]].len();
        let mut best: Option<BestSplit> = None;

        for feature in 0..n_features {
            samples.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

            let mut left_sum = 0.0;
            for k in 1..n {
                left_sum += y[samples[k - 1]];

                let lo = x[samples[k - 1]][feature];
                let hi = x[samples[k]][feature];
                if lo >= hi || k < self.min_samples_leaf || n - k < self.min_samples_leaf {
                    continue;
                }

                let right_sum = total - left_sum;
                let score = left_sum * left_sum / k as f64
                    + right_sum * right_sum / (n - k) as f64;

                if best.as_ref().is_none_or(|b| score > b.score) {
                    let mut threshold = lo + (hi - lo) / 2.0;
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        score,
                    });
                }
            }
        }

        best.filter(|b| b.score > parent_score)
    }

    pub fn predict(&self, row: &[f64]) -> Option<f64> {
        let mut node = self.nodes.first()?;
        loop {
            match node {
                TreeNode::Leaf { value } => return Some(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let next = if *row.get(*feature)? <= *threshold {
                        *left
                    } else {
                        *right
                    };
                    node = self.nodes.get(next)?;
                }
            }
        }
    }

    pub fn is_fitted(&self) -> bool {
        !self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, TreeNode::Leaf { .. }))
            .count()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        let x: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64, 1.0]).collect();
        let y: Vec<f64> = (0..20).map(|i| if i < 10 { 5.0 } else { 15.0 }).collect();
        (x, y)
    }

    #[test]
    fn test_learns_step_function() {
        let (x, y) = step_data();
        let indices: Vec<usize> = (0..x.len()).collect();
        let mut tree = RegressionTree::new(1);
        tree.fit(&x, &y, &indices);

        assert_eq!(tree.predict(&[3.0, 1.0]), Some(5.0));
        assert_eq!(tree.predict(&[12.0, 1.0]), Some(15.0));
        // one split is enough for a pure step
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn test_min_samples_leaf_is_respected() {
        let x: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64]).collect();
        let y = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let indices: Vec<usize> = (0..6).collect();
        let mut tree = RegressionTree::new(3);
        tree.fit(&x, &y, &indices);

        // only the middle split keeps three samples on each side
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.predict(&[0.0]), Some(2.0));
        assert_eq!(tree.predict(&[5.0]), Some(5.0));
    }

    #[test]
    fn test_constant_target_is_single_leaf() {
        let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let y = vec![7.5; 10];
        let indices: Vec<usize> = (0..10).collect();
        let mut tree = RegressionTree::new(2);
        tree.fit(&x, &y, &indices);

        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict(&[100.0]), Some(7.5));
    }

    #[test]
    fn test_unfitted_tree_predicts_nothing() {
        let tree = RegressionTree::new(2);
        assert!(!tree.is_fitted());
        assert_eq!(tree.predict(&[1.0]), None);
    }
}

use std::collections::HashMap;
use std::hash::Hash;

use crate::learner::BaseLearner;

/// A per-feature-bucket counting classifier (`SPEC_FULL.md` §6.1). Feature
/// values are pre-discretized into small integer buckets by the caller — this
/// learner never sees a raw continuous feature, only `&[u32]`.
///
/// Not a claim of being a competitive online learner; it exists to drive
/// deterministic tests and the smoke-test binary without pulling in a real
/// machine-learning crate.
pub struct NaiveBayesLearner<L> {
    label_universe: Vec<L>,
    n_features: usize,
    label_counts: Vec<u64>,
    feature_counts: HashMap<(usize, usize, u32), u64>,
    total: u64,
}

impl<L: Eq + Hash + Clone> NaiveBayesLearner<L> {
    /// `label_universe` is the full declared class set, in the order used to
    /// break probability ties; `n_features` is the fixed length of every `x`.
    pub fn new(label_universe: Vec<L>, n_features: usize) -> Self {
        let n_labels = label_universe.len();
        Self {
            label_universe,
            n_features,
            label_counts: vec![0; n_labels],
            feature_counts: HashMap::new(),
            total: 0,
        }
    }

    fn label_index(&self, y: &L) -> usize {
        self.label_universe
            .iter()
            .position(|label| label == y)
            .expect("label outside the learner's configured universe")
    }

    /// Unnormalized joint-likelihood score per label index, Laplace-smoothed.
    fn scores(&self, x: &[u32]) -> Vec<f64> {
        let n_labels = self.label_universe.len();
        (0..n_labels)
            .map(|label_idx| {
                let label_count = self.label_counts[label_idx];
                let mut score = (label_count as f64 + 1.0) / (self.total as f64 + n_labels as f64);
                for (feature_idx, &bucket) in x.iter().enumerate() {
                    let count = self
                        .feature_counts
                        .get(&(label_idx, feature_idx, bucket))
                        .copied()
                        .unwrap_or(0);
                    // Laplace smoothing over an unknown bucket cardinality:
                    // treat every feature as binary-ish and smooth by 2.
                    score *= (count as f64 + 1.0) / (label_count as f64 + 2.0);
                }
                score
            })
            .collect()
    }
}

impl<X, L> BaseLearner<X, L> for NaiveBayesLearner<L>
where
    X: AsRef<[u32]>,
    L: Eq + Hash + Clone + 'static,
{
    fn learn_one(&mut self, x: &X, y: &L) {
        let label_idx = self.label_index(y);
        self.label_counts[label_idx] += 1;
        self.total += 1;
        for (feature_idx, &bucket) in x.as_ref().iter().enumerate().take(self.n_features) {
            *self.feature_counts.entry((label_idx, feature_idx, bucket)).or_insert(0) += 1;
        }
    }

    fn predict_one(&self, x: &X) -> L {
        let scores = self.scores(x.as_ref());
        let mut best_idx = 0;
        let mut best_score = scores[0];
        for (idx, &score) in scores.iter().enumerate().skip(1) {
            if score > best_score {
                best_idx = idx;
                best_score = score;
            }
        }
        self.label_universe[best_idx].clone()
    }

    fn predict_proba_one(&self, x: &X) -> HashMap<L, f64> {
        let scores = self.scores(x.as_ref());
        self.label_universe.iter().cloned().zip(scores).collect()
    }

    fn clone_pristine(&self) -> Box<dyn BaseLearner<X, L>> {
        Box::new(NaiveBayesLearner::new(self.label_universe.clone(), self.n_features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learns_the_majority_class_per_bucket() {
        let mut learner: NaiveBayesLearner<u8> = NaiveBayesLearner::new(vec![0, 1], 1);
        for _ in 0..10 {
            learner.learn_one(&vec![0u32], &0u8);
        }
        for _ in 0..10 {
            learner.learn_one(&vec![1u32], &1u8);
        }
        assert_eq!(learner.predict_one(&vec![0u32]), 0u8);
        assert_eq!(learner.predict_one(&vec![1u32]), 1u8);
    }

    #[test]
    fn proba_covers_the_whole_label_universe() {
        let mut learner: NaiveBayesLearner<u8> = NaiveBayesLearner::new(vec![0, 1, 2], 1);
        learner.learn_one(&vec![5u32], &1u8);
        let proba = learner.predict_proba_one(&vec![5u32]);
        assert_eq!(proba.len(), 3);
        assert!(proba.values().all(|&p| p > 0.0));
    }

    #[test]
    fn clone_pristine_forgets_everything_learned() {
        let mut learner: NaiveBayesLearner<u8> = NaiveBayesLearner::new(vec![0, 1], 1);
        for _ in 0..5 {
            learner.learn_one(&vec![0u32], &0u8);
        }
        let fresh: Box<dyn BaseLearner<Vec<u32>, u8>> = learner.clone_pristine();
        let proba = fresh.predict_proba_one(&vec![0u32]);
        assert!((proba[&0u8] - proba[&1u8]).abs() < 1e-12);
    }
}

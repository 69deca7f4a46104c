use log::trace;
use std::hash::Hash;

use crate::drift::DriftDetector;
use crate::learner::BaseLearner;
use crate::rng::CalmidRng;

/// Weighted online bagging (`SPEC_FULL.md` §4.7): trains every base learner
/// `Poisson(w)` times, then feeds its drift detector the 0/1 correctness
/// signal.
pub struct EnsembleTrainer;

impl EnsembleTrainer {
    /// Returns `true` if any learner's detector both fired and its
    /// post-update estimate rose relative to its pre-update value — the
    /// `change_detected` condition of §4.8.
    pub fn train_step<X, L: Eq + Hash + Clone>(
        learners: &mut [Box<dyn BaseLearner<X, L>>],
        detectors: &mut [Box<dyn DriftDetector>],
        x: &X,
        y: &L,
        weight: f64,
        rng: &mut CalmidRng,
    ) -> bool {
        let mut change_detected = false;
        for k in 0..learners.len() {
            let r = rng.poisson(weight);
            trace!("ensemble: learner {k} trains {r} times (poisson({weight}))");
            for _ in 0..r {
                learners[k].learn_one(x, y);
            }

            let prediction = learners[k].predict_one(x);
            let e_before = detectors[k].estimation();
            let correct = prediction == *y;
            detectors[k].update(correct);

            if detectors[k].drift_detected() && detectors[k].estimation() > e_before {
                change_detected = true;
            }
        }
        change_detected
    }
}

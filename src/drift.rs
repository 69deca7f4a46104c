use log::warn;

use crate::learner::BaseLearner;
use crate::replay_buffer::ReplayBuffer;
use crate::rng::CalmidRng;
use std::hash::Hash;

/// The drift-detector capability set (`SPEC_FULL.md` §6): a stateful change
/// detector fed a stream of correctness bits.
pub trait DriftDetector {
    fn update(&mut self, correct: bool);
    fn drift_detected(&self) -> bool;
    fn estimation(&self) -> f64;
    /// A fresh instance, independent of `self`'s accumulated state.
    fn fresh(&self) -> Box<dyn DriftDetector>;
}

/// Selects the worst learner once a drift has been confirmed and re-seeds
/// it from the replay buffer (`SPEC_FULL.md` §4.8).
pub struct DriftGovernor;

impl DriftGovernor {
    /// Index of the detector with the maximum current estimate, ties broken
    /// by lowest index.
    pub fn worst_learner(detectors: &[Box<dyn DriftDetector>]) -> usize {
        let mut best = 0;
        let mut best_estimation = detectors[0].estimation();
        for (k, d) in detectors.iter().enumerate().skip(1) {
            if d.estimation() > best_estimation {
                best = k;
                best_estimation = d.estimation();
            }
        }
        best
    }

    /// Replaces slot `k` with a learner re-seeded from every replay buffer,
    /// sorted ascending by timestamp, with exponential time decay and the
    /// double-Poisson draw reproduced from the source (or a single draw if
    /// `single_poisson_reseed` is set — see `DESIGN.md`).
    #[allow(clippy::too_many_arguments)]
    pub fn reset<X: Clone, L: Eq + Hash + Clone>(
        k: usize,
        learners: &mut [Box<dyn BaseLearner<X, L>>],
        detectors: &mut [Box<dyn DriftDetector>],
        model_template: &dyn BaseLearner<X, L>,
        replay_buffer: &ReplayBuffer<X, L>,
        now: u64,
        sizelab: usize,
        single_poisson_reseed: bool,
        rng: &mut CalmidRng,
    ) {
        let mut fresh = model_template.clone_pristine();
        let samples = replay_buffer.drain_sorted();
        if samples.is_empty() {
            warn!("drift reset of slot {k}: replay buffer is empty, re-seeding from zero samples");
        }
        for sample in &samples {
            let decay = (-((now - sample.t) as f64) / (sizelab as f64)).exp();
            let decayed_weight = decay * sample.w;
            let r = if single_poisson_reseed {
                rng.poisson(decayed_weight)
            } else {
                let w_prime_prime = rng.poisson(decayed_weight) as f64;
                rng.poisson(w_prime_prime)
            };
            for _ in 0..r {
                fresh.learn_one(&sample.x, &sample.y);
            }
        }
        learners[k] = fresh;
        detectors[k] = detectors[k].fresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubDetector {
        estimation: f64,
        drift: bool,
    }

    impl DriftDetector for StubDetector {
        fn update(&mut self, _correct: bool) {}
        fn drift_detected(&self) -> bool {
            self.drift
        }
        fn estimation(&self) -> f64 {
            self.estimation
        }
        fn fresh(&self) -> Box<dyn DriftDetector> {
            Box::new(StubDetector {
                estimation: 0.0,
                drift: false,
            })
        }
    }

    #[test]
    fn worst_learner_picks_max_estimation_ties_to_lowest_index() {
        let detectors: Vec<Box<dyn DriftDetector>> = vec![
            Box::new(StubDetector { estimation: 0.1, drift: false }),
            Box::new(StubDetector { estimation: 0.4, drift: true }),
            Box::new(StubDetector { estimation: 0.25, drift: false }),
        ];
        assert_eq!(DriftGovernor::worst_learner(&detectors), 1);
    }

    #[test]
    fn worst_learner_ties_go_to_lowest_index() {
        let detectors: Vec<Box<dyn DriftDetector>> = vec![
            Box::new(StubDetector { estimation: 0.5, drift: false }),
            Box::new(StubDetector { estimation: 0.5, drift: false }),
        ];
        assert_eq!(DriftGovernor::worst_learner(&detectors), 0);
    }
}

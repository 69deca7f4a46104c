use log::debug;
use std::collections::HashMap;
use std::hash::Hash;

use crate::difficulty::{sample_difficulty, sample_weight, top_two_margin};
use crate::drift::{DriftDetector, DriftGovernor};
use crate::ensemble::EnsembleTrainer;
use crate::error::CalmidError;
use crate::imbalance::imbalance;
use crate::label_window::{Entry, LabelWindow};
use crate::learner::BaseLearner;
use crate::margin_matrix::MarginMatrix;
use crate::query_controller::QueryController;
use crate::replay_buffer::ReplayBuffer;
use crate::rng::CalmidRng;

/// Construction parameters for [`Calmid`] (`SPEC_FULL.md` §6, §7.2).
///
/// There is no sensible crate-wide `Default` (there is no meaningful default
/// class count), so unlike the teacher's `*Settings` structs this one is
/// built with a plain struct literal or [`CalmidSettings::new`].
pub struct CalmidSettings {
    pub n_classes: usize,
    pub n_models: usize,
    pub theta: f64,
    pub step_size: f64,
    pub epsilon: f64,
    pub budget: f64,
    pub sizelab: usize,
    pub seed: u64,
    /// §9 open question: the source draws `Poisson(Poisson(w'))` when
    /// re-seeding a reset learner. Default `false` reproduces that verbatim;
    /// `true` switches to a single `Poisson(w')` draw for comparison.
    pub single_poisson_reseed: bool,
}

impl CalmidSettings {
    pub fn new(
        n_classes: usize,
        n_models: usize,
        theta: f64,
        step_size: f64,
        epsilon: f64,
        budget: f64,
        sizelab: usize,
        seed: u64,
    ) -> Self {
        CalmidSettings {
            n_classes,
            n_models,
            theta,
            step_size,
            epsilon,
            budget,
            sizelab,
            seed,
            single_poisson_reseed: false,
        }
    }

    pub fn with_single_poisson_reseed(mut self, single_poisson_reseed: bool) -> Self {
        self.single_poisson_reseed = single_poisson_reseed;
        self
    }
}

/// The CALMID façade (`SPEC_FULL.md` §4.9): owns every component exclusively
/// and drives one `learn_one` step end to end.
pub struct Calmid<X, L: Eq + Hash + Clone> {
    n_classes: usize,
    budget: f64,
    epsilon: f64,
    sizelab: usize,
    single_poisson_reseed: bool,

    time_step: u64,
    learning_step: u64,
    learnt_classes: usize,
    label_to_index: HashMap<L, usize>,

    label_window: LabelWindow<L>,
    replay_buffer: ReplayBuffer<X, L>,
    margin_matrix: MarginMatrix,

    learners: Vec<Box<dyn BaseLearner<X, L>>>,
    detectors: Vec<Box<dyn DriftDetector>>,
    model_template: Box<dyn BaseLearner<X, L>>,

    rng: CalmidRng,
}

impl<X: Clone + 'static, L: Eq + Hash + Clone + 'static> Calmid<X, L> {
    pub fn new(
        settings: CalmidSettings,
        model_template: Box<dyn BaseLearner<X, L>>,
        drift_template: Box<dyn DriftDetector>,
    ) -> Result<Self, CalmidError> {
        if settings.budget <= settings.epsilon {
            return Err(CalmidError::InvalidConfiguration("budget must be greater than epsilon"));
        }
        if !(0.0..=1.0).contains(&settings.epsilon) {
            return Err(CalmidError::InvalidConfiguration("epsilon must be within [0, 1]"));
        }
        if settings.n_classes == 0 {
            return Err(CalmidError::InvalidConfiguration("n_classes must be positive"));
        }
        if settings.n_models == 0 {
            return Err(CalmidError::InvalidConfiguration("n_models must be positive"));
        }
        if settings.sizelab == 0 {
            return Err(CalmidError::InvalidConfiguration("sizelab must be positive"));
        }

        let sizesam = (settings.sizelab as f64 * settings.epsilon / settings.n_classes as f64).ceil() as usize;

        let learners = (0..settings.n_models).map(|_| model_template.clone_pristine()).collect();
        let detectors = (0..settings.n_models).map(|_| drift_template.fresh()).collect();

        Ok(Calmid {
            n_classes: settings.n_classes,
            budget: settings.budget,
            epsilon: settings.epsilon,
            sizelab: settings.sizelab,
            single_poisson_reseed: settings.single_poisson_reseed,
            time_step: 0,
            learning_step: 0,
            learnt_classes: 0,
            label_to_index: HashMap::new(),
            label_window: LabelWindow::new(settings.sizelab),
            replay_buffer: ReplayBuffer::new(settings.n_classes, sizesam),
            margin_matrix: MarginMatrix::new(settings.n_classes, settings.theta, settings.step_size),
            learners,
            detectors,
            model_template,
            rng: CalmidRng::new(settings.seed),
        })
    }

    /// One step of the data flow in `SPEC_FULL.md` §2: decide whether to
    /// query, train if queried, then check for drift.
    pub fn learn_one(&mut self, x: &X, y: &L) -> Result<(), CalmidError> {
        self.time_step += 1;
        let mut labeling = false;

        let zeta = self.rng.uniform();
        if (self.time_step as usize) < self.sizelab || zeta < self.epsilon {
            self.label_window.add(Entry::Label(y.clone()));
            labeling = true;
            debug!("calmid: step {} queries (warmup/epsilon exploration)", self.time_step);
        } else {
            let queried = if self.learnt_classes >= 2 {
                self.uncertainty_selective_strategy(x, y)?
            } else {
                false
            };
            if queried && (self.learning_step as f64 / self.time_step as f64) < self.budget {
                // Reproduced verbatim from the source (SPEC_FULL.md §9): the
                // sentinel is recorded here even though USS just queried.
                self.label_window.add(Entry::Sentinel);
                labeling = true;
                debug!("calmid: step {} queries (USS)", self.time_step);
            } else {
                self.label_window.add(Entry::Sentinel);
            }
        }

        if labeling {
            let class_index = self.register_label(y)?;
            self.learning_step += 1;
            let weight = self.compute_weight(x, y)?;
            self.replay_buffer.add(class_index, x.clone(), y.clone(), weight, self.time_step);

            let change_detected =
                EnsembleTrainer::train_step(&mut self.learners, &mut self.detectors, x, y, weight, &mut self.rng);

            if change_detected {
                let worst = DriftGovernor::worst_learner(&self.detectors);
                DriftGovernor::reset(
                    worst,
                    &mut self.learners,
                    &mut self.detectors,
                    self.model_template.as_ref(),
                    &self.replay_buffer,
                    self.time_step,
                    self.sizelab,
                    self.single_poisson_reseed,
                    &mut self.rng,
                );
                debug!("calmid: step {} drift governor replaced learner slot {}", self.time_step, worst);
            }
        }

        Ok(())
    }

    /// Averages `predict_proba_one` across every base learner, dividing by
    /// the total probability mass rather than `n_models` (learners may
    /// return partial distributions). Empty if the total mass is zero.
    pub fn predict_proba_one(&self, x: &X) -> HashMap<L, f64> {
        let mut summed: HashMap<L, f64> = HashMap::new();
        for learner in &self.learners {
            for (label, p) in learner.predict_proba_one(x) {
                *summed.entry(label).or_insert(0.0) += p;
            }
        }
        let total: f64 = summed.values().sum();
        if total <= 0.0 {
            return HashMap::new();
        }
        for p in summed.values_mut() {
            *p /= total;
        }
        summed
    }

    fn uncertainty_selective_strategy(&mut self, x: &X, y: &L) -> Result<bool, CalmidError> {
        let (margin, yc1, yc2) = self.compute_margin(x);
        let (yc1, yc2) = match (yc1, yc2) {
            (Some(a), Some(b)) => (a, b),
            _ => return Ok(false),
        };

        // `compute_margin` only ever ranks registered labels, so these are
        // guaranteed present; kept as `Result` rather than `.expect()` per
        // the error-handling policy in SPEC_FULL.md §7.
        let i = *self.label_to_index.get(&yc1).ok_or(CalmidError::UnknownClass)?;
        let j = *self.label_to_index.get(&yc2).ok_or(CalmidError::UnknownClass)?;
        let y_is_yc1 = *y == yc1;
        let y_is_yc2 = *y == yc2;

        let label_window = &self.label_window;
        let n_classes = self.n_classes;
        let imbalance_of_y = || imbalance(label_window, y, n_classes);

        QueryController::decide(
            margin,
            i,
            j,
            y_is_yc1,
            y_is_yc2,
            imbalance_of_y,
            &mut self.margin_matrix,
            self.budget,
            self.learning_step,
            self.time_step,
            &mut self.rng,
        )
    }

    /// `SPEC_FULL.md` §4.6 bootstrap: before two classes have been
    /// registered, the margin function returns `(0, None, None)`.
    ///
    /// Restricted to registered labels before ranking: river's base learners
    /// omit classes they have never been `learn_one`'d from
    /// `predict_proba_one`, which is why the source never looks up an
    /// unregistered label in `label_to_index`. A learner here is free to
    /// score the whole declared label universe (e.g. a Laplace-smoothed
    /// `NaiveBayesLearner`), so the façade itself drops anything
    /// `label_to_index` doesn't know about before computing the top-two
    /// margin, restoring that invariant regardless of which learner is
    /// plugged in.
    fn compute_margin(&self, x: &X) -> (f64, Option<L>, Option<L>) {
        if self.learnt_classes < 2 {
            return (0.0, None, None);
        }
        let probs = self.predict_proba_one(x);
        let registered: HashMap<L, f64> = probs
            .into_iter()
            .filter(|(label, _)| self.label_to_index.contains_key(label))
            .collect();
        top_two_margin(&registered, &self.label_to_index)
    }

    fn compute_weight(&self, x: &X, y: &L) -> Result<f64, CalmidError> {
        let (margin, yc1, yc2) = self.compute_margin(x);
        let difficulty = sample_difficulty(margin, yc1.as_ref(), yc2.as_ref(), y);
        let imb = imbalance(&self.label_window, y, self.n_classes)?;
        Ok(sample_weight(difficulty, imb))
    }

    fn register_label(&mut self, y: &L) -> Result<usize, CalmidError> {
        if let Some(&index) = self.label_to_index.get(y) {
            return Ok(index);
        }
        let next_index = self.label_to_index.len();
        if next_index >= self.n_classes {
            return Err(CalmidError::TooManyClasses {
                n_classes: self.n_classes,
                attempted: next_index + 1,
            });
        }
        self.label_to_index.insert(y.clone(), next_index);
        self.learnt_classes = self.label_to_index.len();
        Ok(next_index)
    }

    pub fn time_step(&self) -> u64 {
        self.time_step
    }

    pub fn learning_step(&self) -> u64 {
        self.learning_step
    }

    pub fn learnt_classes(&self) -> usize {
        self.learnt_classes
    }

    pub fn label_window_length(&self) -> usize {
        self.label_window.length()
    }

    pub fn label_window_sentinels(&self) -> usize {
        self.label_window.count_sentinel()
    }

    pub fn margin_threshold(&self, i: usize, j: usize) -> f64 {
        self.margin_matrix.get(i, j)
    }

    pub fn replay_buffer_len(&self, class_index: usize) -> usize {
        self.replay_buffer.len(class_index)
    }

    pub fn label_index(&self, y: &L) -> Option<usize> {
        self.label_to_index.get(y).copied()
    }

    pub fn n_models(&self) -> usize {
        self.learners.len()
    }
}

use std::collections::HashMap;
use std::hash::Hash;

/// The base-learner capability set CALMID trains and queries
/// (`SPEC_FULL.md` §6, §9 "Polymorphism over BaseLearner"). The core never
/// inspects `X`; it only ever passes it through.
pub trait BaseLearner<X, L: Eq + Hash + Clone> {
    fn learn_one(&mut self, x: &X, y: &L);

    /// The learner's single best guess for `x`.
    fn predict_one(&self, x: &X) -> L;

    /// Per-label probabilities for `x`. Need not be normalized and may omit
    /// labels the learner has never seen.
    fn predict_proba_one(&self, x: &X) -> HashMap<L, f64>;

    /// A pristine, untrained copy configured identically to `self`.
    fn clone_pristine(&self) -> Box<dyn BaseLearner<X, L>>;
}

//! Optional, minimal implementations of [`crate::BaseLearner`] and
//! [`crate::DriftDetector`] (`SPEC_FULL.md` §6.1), gated behind the
//! `reference-impls` feature (on by default). Useful for tests, the smoke
//! demo, and as a starting point — not a claim of being production-grade
//! machine learning.

mod adwin;
mod naive_bayes;

pub use adwin::AdwinDriftDetector;
pub use naive_bayes::NaiveBayesLearner;

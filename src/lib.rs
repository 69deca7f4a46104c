//! CALMID: an online ensemble classifier for evolving data streams under a
//! label-budget constraint and with class imbalance.
//!
//! The crate is the decision core only (`SPEC_FULL.md` §1): an
//! active-learning query controller with a per-class-pair asymmetric margin
//! threshold matrix, a weighted online bagging trainer, a class-stratified
//! replay buffer, and a drift-triggered selective reset of base learners.
//! Base learners and drift detectors are external collaborators, consumed
//! through the [`learner::BaseLearner`] and [`drift::DriftDetector`] traits.
//!
//! ```
//! use calmid::{Calmid, CalmidSettings};
//! use calmid::reference_impls::{NaiveBayesLearner, AdwinDriftDetector};
//!
//! let settings = CalmidSettings::new(2, 5, 0.1, 0.1, 0.1, 0.5, 50, 7);
//! let model = Box::new(NaiveBayesLearner::new(vec![0u8, 1u8], 2));
//! let detector = Box::new(AdwinDriftDetector::new(0.002));
//! let mut calmid = Calmid::new(settings, model, detector).unwrap();
//! calmid.learn_one(&vec![3u32, 1], &0u8).unwrap();
//! let _ = calmid.predict_proba_one(&vec![3u32, 1]);
//! ```

mod calmid;
mod difficulty;
mod drift;
mod ensemble;
mod error;
mod imbalance;
mod label_window;
mod learner;
mod margin_matrix;
mod query_controller;
mod replay_buffer;
mod rng;

#[cfg(feature = "reference-impls")]
pub mod reference_impls;

pub use crate::calmid::{Calmid, CalmidSettings};
pub use crate::drift::DriftDetector;
pub use crate::error::CalmidError;
pub use crate::learner::BaseLearner;

//! Drives `Calmid` over a small synthetic, drifting stream with the bundled
//! reference collaborators and prints a running summary. Run with:
//!
//! ```text
//! cargo run --example smoke
//! ```

use calmid::reference_impls::{AdwinDriftDetector, NaiveBayesLearner};
use calmid::{Calmid, CalmidSettings};

fn bucketize(step: u32, regime: u8) -> Vec<u32> {
    // Two noisy, regime-dependent feature buckets.
    vec![(step + regime as u32 * 7) % 5, (step * 3 + regime as u32) % 4]
}

fn true_label(step: u32) -> u8 {
    // A slow drift at step 500: the decision boundary flips.
    let regime = if step < 500 { 0 } else { 1 };
    if (step + regime as u32) % 3 == 0 {
        1
    } else {
        0
    }
}

fn main() {
    env_logger::init();

    let settings = CalmidSettings::new(2, 6, 0.2, 0.1, 0.05, 0.3, 100, 20260727);
    let model = Box::new(NaiveBayesLearner::new(vec![0u8, 1u8], 2));
    let detector = Box::new(AdwinDriftDetector::new(0.01));
    let mut calmid: Calmid<Vec<u32>, u8> = Calmid::new(settings, model, detector).expect("valid configuration");

    let mut correct = 0u32;
    let mut total = 0u32;

    for step in 0..1000u32 {
        let regime = if step < 500 { 0 } else { 1 };
        let x = bucketize(step, regime);
        let y = true_label(step);

        let probs = calmid.predict_proba_one(&x);
        if let Some((&prediction, _)) = probs.iter().max_by(|a, b| a.1.partial_cmp(b.1).unwrap()) {
            total += 1;
            if prediction == y {
                correct += 1;
            }
        }

        calmid.learn_one(&x, &y).expect("bucketized features stay within the declared class count");

        if step % 200 == 0 {
            println!(
                "step {step}: queried {}/{} ({:.1}%), accuracy so far {:.1}%",
                calmid.learning_step(),
                calmid.time_step(),
                100.0 * calmid.learning_step() as f64 / calmid.time_step() as f64,
                if total > 0 { 100.0 * correct as f64 / total as f64 } else { 0.0 }
            );
        }
    }

    println!(
        "final: queried {}/{} instances, accuracy {:.1}%",
        calmid.learning_step(),
        calmid.time_step(),
        100.0 * correct as f64 / total as f64
    );
}

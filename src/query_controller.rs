use log::trace;

use crate::error::CalmidError;
use crate::margin_matrix::MarginMatrix;
use crate::rng::CalmidRng;

/// The uncertainty selective strategy (USS, `SPEC_FULL.md` §4.6): decides
/// whether to query a label for the current instance, mutating the margin
/// matrix along the way.
pub struct QueryController;

impl QueryController {
    /// `i`/`j` are the dense indices of `yc1`/`yc2`; `y_is_yc1`/`y_is_yc2`
    /// tell the controller which (if either) the true label matches.
    /// `imbalance` is computed lazily (only in the `margin <= threshold`
    /// branch, matching the source) via the supplied closure.
    #[allow(clippy::too_many_arguments)]
    pub fn decide(
        margin: f64,
        i: usize,
        j: usize,
        y_is_yc1: bool,
        y_is_yc2: bool,
        imbalance: impl FnOnce() -> Result<f64, CalmidError>,
        matrix: &mut MarginMatrix,
        budget: f64,
        learning_step: u64,
        time_step: u64,
        rng: &mut CalmidRng,
    ) -> Result<bool, CalmidError> {
        let threshold = matrix.get(i, j);

        if margin <= threshold {
            let imb = imbalance()?;
            if y_is_yc1 {
                matrix.decrease(i, j);
                if imb > 0.5 {
                    matrix.decrease(i, j);
                }
            } else if y_is_yc2 && imb > 0.5 {
                matrix.decrease(i, j);
            }
            trace!("USS case A: margin={margin} <= T={threshold}, imbalance={imb}");
            Ok(true)
        } else {
            let remaining = budget - (learning_step as f64 / time_step as f64);
            let q = margin - threshold;
            let p = remaining / (remaining + q);
            let zeta = rng.uniform();
            let labeling = zeta < p;
            if labeling && y_is_yc2 {
                matrix.increase(i, j);
            }
            trace!("USS case B: margin={margin} > T={threshold}, p={p}, zeta={zeta}, labeling={labeling}");
            Ok(labeling)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_a_easy_majority_double_decreases() {
        let mut matrix = MarginMatrix::new(2, 0.1, 0.1);
        let mut rng = CalmidRng::new(1);
        let labeling = QueryController::decide(
            0.05, 0, 1, true, false, || Ok(0.9), &mut matrix, 0.5, 10, 20, &mut rng,
        )
        .unwrap();
        assert!(labeling);
        let expected = 0.1 * 0.9 * 0.9;
        assert!((matrix.get(0, 1) - expected).abs() < 1e-12);
    }

    #[test]
    fn case_a_minority_correct_single_decreases() {
        let mut matrix = MarginMatrix::new(2, 0.1, 0.1);
        let mut rng = CalmidRng::new(1);
        QueryController::decide(0.05, 0, 1, true, false, || Ok(0.2), &mut matrix, 0.5, 10, 20, &mut rng).unwrap();
        let expected = 0.1 * 0.9;
        assert!((matrix.get(0, 1) - expected).abs() < 1e-12);
    }

    #[test]
    fn case_a_true_label_is_neither_top_two_no_update() {
        let mut matrix = MarginMatrix::new(2, 0.1, 0.1);
        let mut rng = CalmidRng::new(1);
        let labeling =
            QueryController::decide(0.05, 0, 1, false, false, || Ok(0.9), &mut matrix, 0.5, 10, 20, &mut rng)
                .unwrap();
        assert!(labeling);
        assert_eq!(matrix.get(0, 1), 0.1);
    }

    #[test]
    fn case_b_increase_only_accompanies_a_labeling_decision() {
        let mut matrix = MarginMatrix::new(2, 0.1, 0.1);
        let mut rng = CalmidRng::new(1);
        let labeling =
            QueryController::decide(0.5, 0, 1, false, true, || Ok(0.0), &mut matrix, 1.0, 0, 1, &mut rng).unwrap();
        if labeling {
            assert!(matrix.get(0, 1) > 0.1);
        } else {
            assert_eq!(matrix.get(0, 1), 0.1);
        }
    }

    #[test]
    fn case_b_never_updates_matrix_when_true_label_is_top_pick() {
        let mut matrix = MarginMatrix::new(2, 0.1, 0.1);
        let mut rng = CalmidRng::new(1);
        QueryController::decide(0.5, 0, 1, true, false, || Ok(0.0), &mut matrix, 1.0, 0, 1, &mut rng).unwrap();
        assert_eq!(matrix.get(0, 1), 0.1);
    }

    #[test]
    fn case_b_never_updates_matrix_when_true_label_is_neither_top_two() {
        let mut matrix = MarginMatrix::new(2, 0.1, 0.1);
        let mut rng = CalmidRng::new(1);
        QueryController::decide(0.5, 0, 1, false, false, || Ok(0.0), &mut matrix, 1.0, 0, 1, &mut rng).unwrap();
        assert_eq!(matrix.get(0, 1), 0.1);
    }
}

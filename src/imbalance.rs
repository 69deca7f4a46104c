use crate::error::CalmidError;
use crate::label_window::LabelWindow;

/// `imbalance(y)` from `SPEC_FULL.md` §4.4: `y`'s share of queried labels in
/// the window, normalized to the share a perfectly balanced alphabet would
/// give it. Fails with [`CalmidError::EmptyLabelWindow`] if nothing in the
/// window has been queried yet; unreachable from `Calmid::learn_one` because
/// the warmup phase queries every one of the first `sizelab` steps.
pub fn imbalance<L: PartialEq>(
    window: &LabelWindow<L>,
    label: &L,
    n_classes: usize,
) -> Result<f64, CalmidError> {
    let queried = window.length() - window.count_sentinel();
    if queried == 0 {
        return Err(CalmidError::EmptyLabelWindow);
    }
    let expected_share = queried as f64 / n_classes as f64;
    Ok(window.count_label(label) as f64 / expected_share)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label_window::Entry;

    #[test]
    fn empty_window_is_an_error() {
        let w: LabelWindow<u8> = LabelWindow::new(10);
        assert_eq!(imbalance(&w, &0, 2), Err(CalmidError::EmptyLabelWindow));
    }

    #[test]
    fn majority_label_has_imbalance_above_one() {
        let mut w = LabelWindow::new(10);
        for _ in 0..8 {
            w.add(Entry::Label(0u8));
        }
        for _ in 0..2 {
            w.add(Entry::Label(1u8));
        }
        let imb = imbalance(&w, &0, 2).unwrap();
        assert!(imb > 1.0);
    }

    #[test]
    fn sentinels_are_excluded_from_the_denominator() {
        let mut w = LabelWindow::new(10);
        w.add(Entry::Label(0u8));
        w.add(Entry::Sentinel);
        w.add(Entry::Sentinel);
        // 1 queried entry total, label 0 holds all of it: expected_share = 1/2 = 0.5
        let imb = imbalance(&w, &0, 2).unwrap();
        assert!((imb - 2.0).abs() < 1e-12);
    }
}

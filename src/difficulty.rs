use std::collections::HashMap;
use std::hash::Hash;

/// Top-two margin over an averaged probability distribution
/// (`SPEC_FULL.md` §4.6 / GLOSSARY "Margin"). Ties in probability are broken
/// deterministically by `label_to_index` order (the order labels were first
/// registered in) — the spec requires *some* deterministic tie-break and
/// forbids assuming ties are rare (§4.6), so an arbitrary-but-stable key is
/// exactly what's called for. A label absent from `label_to_index` (the
/// caller is expected to have already filtered `probs` down to registered
/// labels, see `Calmid::compute_margin`) sorts last rather than panicking —
/// this function stays panic-free on its own terms, not just by caller
/// discipline.
pub fn top_two_margin<L: Eq + Hash + Clone>(
    probs: &HashMap<L, f64>,
    label_to_index: &HashMap<L, usize>,
) -> (f64, Option<L>, Option<L>) {
    let rank_of = |l: &L| label_to_index.get(l).copied().unwrap_or(usize::MAX);
    let mut ranked: Vec<(&L, f64)> = probs.iter().map(|(l, p)| (l, *p)).collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap()
            .then_with(|| rank_of(a.0).cmp(&rank_of(b.0)))
    });

    match (ranked.first(), ranked.get(1)) {
        (Some((yc1, p1)), Some((yc2, p2))) => (p1 - p2, Some((*yc1).clone()), Some((*yc2).clone())),
        _ => (0.0, ranked.first().map(|(l, _)| (*l).clone()), None),
    }
}

/// Sample difficulty `d(x, y)` (`SPEC_FULL.md` §4.5).
pub fn sample_difficulty<L: PartialEq>(margin: f64, yc1: Option<&L>, yc2: Option<&L>, y: &L) -> f64 {
    let (tf, s) = if yc1 == Some(y) {
        (1.0, 0.0)
    } else if yc2 == Some(y) {
        (-1.0, 1.0)
    } else {
        (-1.0, 0.0)
    };
    (1.0 - tf * margin) * (1.0 - tf - s).exp()
}

/// Training weight `w(x, y)` (`SPEC_FULL.md` §4.5). `imbalance` is clamped
/// to at least 1 before inverting, so the reciprocal term never exceeds 1
/// for majority classes.
pub fn sample_weight(difficulty: f64, imbalance: f64) -> f64 {
    (1.0 + difficulty + 1.0 / imbalance.max(1.0)).ln()
}

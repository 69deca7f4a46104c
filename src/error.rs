use thiserror::Error;

/// Failure modes of the CALMID core.
///
/// Only [`CalmidError::InvalidConfiguration`] and [`CalmidError::TooManyClasses`]
/// are reachable through the public façade (construction, and `learn_one` when
/// fed a label outside the declared class alphabet). The remaining variants
/// exist because the individual components (`MarginMatrix`, the imbalance
/// estimator) are usable on their own and need to report misuse to direct
/// callers; the façade's call order structurally prevents triggering them
/// (see `SPEC_FULL.md` §7).
#[derive(Debug, Error, PartialEq)]
pub enum CalmidError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    #[error("label has not been registered in label_to_index yet")]
    UnknownClass,

    #[error("imbalance requested on a label window with no queried entries")]
    EmptyLabelWindow,

    #[error("declared n_classes={n_classes} exceeded: label #{attempted} would be the {attempted}th distinct class")]
    TooManyClasses { n_classes: usize, attempted: usize },
}

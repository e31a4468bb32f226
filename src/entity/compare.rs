use super::Span;
use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Relationship between a true span and a predicted span, following the MUC terminology.
#[derive(
    Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord, Sequence, Serialize, Deserialize,
)]
pub enum Outcome {
    /// Both spans have the same boundaries and the same type.
    Correct,
    /// The spans overlap (or share their boundaries) but their types differ.
    Incorrect,
    /// The spans have the same type and overlap without sharing their boundaries.
    Partial,
    /// The true span is located entirely before the predicted span.
    Missing,
    /// The predicted span is located entirely before the true span.
    Spurious,
}

impl Outcome {
    /// Short MUC code of the outcome, such as `cor` or `spu`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Correct => "cor",
            Self::Incorrect => "inc",
            Self::Partial => "par",
            Self::Missing => "mis",
            Self::Spurious => "spu",
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Compares a true span with a predicted span. Exact boundaries are checked before the overlap.
/// When the spans are disjoint, the outcome tells which one comes first: `Missing` when the true
/// span is first and `Spurious` when the predicted span is first.
///
/// * `truth`: Span of the ground truth.
/// * `pred`: Predicted span.
pub fn compare(truth: &Span, pred: &Span) -> Outcome {
    let same_type = truth.entity_type() == pred.entity_type();
    let same_boundaries = truth.start() == pred.start() && truth.end() == pred.end();
    match (same_boundaries || truth.overlaps(pred), same_type) {
        (true, true) if same_boundaries => Outcome::Correct,
        (true, true) => Outcome::Partial,
        (true, false) => Outcome::Incorrect,
        (false, _) if truth.end() < pred.start() => Outcome::Missing,
        (false, _) => Outcome::Spurious,
    }
}

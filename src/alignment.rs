/**
This module aligns the true spans of a sample with its predicted spans and tallies the outcome of
each pair.
*/
use crate::entity::{compare, Outcome, Span};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// MUC counts of a sample or of a whole corpus.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Counts {
    /// Number of true spans
    pub support: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub partial: usize,
    pub missing: usize,
    pub spurious: usize,
}

impl Counts {
    /// Increments the counter associated with the `outcome`.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Correct => self.correct += 1,
            Outcome::Incorrect => self.incorrect += 1,
            Outcome::Partial => self.partial += 1,
            Outcome::Missing => self.missing += 1,
            Outcome::Spurious => self.spurious += 1,
        }
    }

    /// Returns the counter associated with the `outcome`.
    pub fn get(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::Correct => self.correct,
            Outcome::Incorrect => self.incorrect,
            Outcome::Partial => self.partial,
            Outcome::Missing => self.missing,
            Outcome::Spurious => self.spurious,
        }
    }

    /// Number of predicted spans that were consumed by the alignment.
    pub fn retrieved(&self) -> usize {
        self.correct + self.incorrect + self.partial + self.spurious
    }

    /// Number of true spans that were consumed by the alignment.
    pub fn relevant(&self) -> usize {
        self.correct + self.incorrect + self.partial + self.missing
    }
}

impl AddAssign for Counts {
    fn add_assign(&mut self, rhs: Self) {
        self.support += rhs.support;
        self.correct += rhs.correct;
        self.incorrect += rhs.incorrect;
        self.partial += rhs.partial;
        self.missing += rhs.missing;
        self.spurious += rhs.spurious;
    }
}

impl Add for Counts {
    type Output = Counts;
    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl Sum for Counts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Counts::default(), Add::add)
    }
}

/// Result of the alignment of a single sample: the counts and the spans in error. The pairs
/// classified as `Partial` are only counted.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleMetrics<'a> {
    pub counts: Counts,
    /// Pairs of (true, predicted) spans whose types differ
    pub incorrect: Vec<(Span<'a>, Span<'a>)>,
    /// True spans without a predicted counterpart
    pub missing: Vec<Span<'a>>,
    /// Predicted spans without a true counterpart
    pub spurious: Vec<Span<'a>>,
}

impl<'a> SampleMetrics<'a> {
    pub fn with_support(support: usize) -> Self {
        Self {
            counts: Counts {
                support,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn record_incorrect(&mut self, truth: &Span<'a>, pred: &Span<'a>) {
        self.counts.record(Outcome::Incorrect);
        self.incorrect.push((truth.clone(), pred.clone()));
    }

    fn record_missing(&mut self, truth: &Span<'a>) {
        self.counts.record(Outcome::Missing);
        self.missing.push(truth.clone());
    }

    fn record_spurious(&mut self, pred: &Span<'a>) {
        self.counts.record(Outcome::Spurious);
        self.spurious.push(pred.clone());
    }

    pub fn into_owned(self) -> SampleMetrics<'static> {
        SampleMetrics {
            counts: self.counts,
            incorrect: self
                .incorrect
                .into_iter()
                .map(|(t, p)| (t.into_owned(), p.into_owned()))
                .collect(),
            missing: self.missing.into_iter().map(Span::into_owned).collect(),
            spurious: self.spurious.into_iter().map(Span::into_owned).collect(),
        }
    }
}

/// An alignment strategy pairs the true spans of a sample with its predicted spans. Both slices
/// are sorted by their start. Implementors must not keep any state between two calls.
pub trait AlignmentStrategy {
    fn align<'a>(&self, truth: &[Span<'a>], pred: &[Span<'a>]) -> SampleMetrics<'a>;
}

/// Greedy two-pointers alignment. Only the heads of the two lists are ever compared: a pair
/// classified as `Correct`, `Incorrect` or `Partial` consumes both heads, `Missing` consumes the
/// true head and `Spurious` consumes the predicted head. Once a list is exhausted, the remaining
/// spans of the other list are all missing (or all spurious).
///
/// It never looks ahead: a predicted span overlapping two true spans is paired with the first
/// one only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GreedyAlignment;

impl AlignmentStrategy for GreedyAlignment {
    fn align<'a>(&self, truth: &[Span<'a>], pred: &[Span<'a>]) -> SampleMetrics<'a> {
        let mut metrics = SampleMetrics::with_support(truth.len());
        let mut truth_cursor = 0;
        let mut pred_cursor = 0;
        loop {
            match (truth.get(truth_cursor), pred.get(pred_cursor)) {
                (None, None) => break,
                (None, Some(p)) => {
                    metrics.record_spurious(p);
                    pred_cursor += 1;
                }
                (Some(t), None) => {
                    metrics.record_missing(t);
                    truth_cursor += 1;
                }
                (Some(t), Some(p)) => {
                    match compare(t, p) {
                        outcome @ (Outcome::Correct | Outcome::Partial) => {
                            metrics.counts.record(outcome);
                            truth_cursor += 1;
                            pred_cursor += 1;
                        }
                        Outcome::Incorrect => {
                            metrics.record_incorrect(t, p);
                            truth_cursor += 1;
                            pred_cursor += 1;
                        }
                        Outcome::Missing => {
                            metrics.record_missing(t);
                            truth_cursor += 1;
                        }
                        Outcome::Spurious => {
                            metrics.record_spurious(p);
                            pred_cursor += 1;
                        }
                    };
                }
            }
        }
        metrics
    }
}

/**
This module evaluates a corpus: it checks the inputs, aligns every sample and sums the MUC counts
into corpus-level metrics (precision, recall, f1).
*/
use crate::alignment::{AlignmentStrategy, Counts, GreedyAlignment, SampleMetrics};
use crate::analysis::{EntityTypeReport, IncorrectConfusion};
use crate::entity::{get_spans, MalformedTagError, Span};
use core::fmt;
use num::{Float, NumCast};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Debug, Display};
use tracing::{debug, warn};

/// Smoothing constant added to the numerator and the denominator of the precision and recall.
pub const DEFAULT_EPSILON: f64 = 1e-5;

/// Internal extension trait for Num's Float trait
pub trait FloatExt: Float + Send + Sync + Debug {}

impl<T: Float + Send + Sync + Debug> FloatExt for T {}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Error type to represent when the true and predicted inputs are not of the same length (when
/// they should be).
pub enum LengthMismatchError {
    /// The two corpus do not contain the same number of samples.
    SampleCount { true_len: usize, pred_len: usize },
    /// A true sample and its predicted sample do not contain the same number of tags.
    TokenCount {
        sample: usize,
        true_len: usize,
        pred_len: usize,
    },
}

impl Display for LengthMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SampleCount { true_len, pred_len } => write!(
                f,
                "Inconsistent number of samples. `y_true` has {} samples, `y_pred` has {} samples",
                true_len, pred_len
            ),
            Self::TokenCount {
                sample,
                true_len,
                pred_len,
            } => write!(
                f,
                "Inconsistent number of tags in sample {}. `y_true` has {} tags, `y_pred` has {} tags",
                sample, true_len, pred_len
            ),
        }
    }
}
impl Error for LengthMismatchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enum error encompassing the failures that could happen when evaluating a corpus. Any error
/// aborts the evaluation of the whole corpus.
pub enum EvaluationError {
    MalformedTag(MalformedTagError),
    LengthMismatch(LengthMismatchError),
}

impl Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedTag(tag_err) => std::fmt::Display::fmt(tag_err, f),
            Self::LengthMismatch(length_err) => std::fmt::Display::fmt(length_err, f),
        }
    }
}
impl Error for EvaluationError {}

impl From<MalformedTagError> for EvaluationError {
    fn from(value: MalformedTagError) -> Self {
        Self::MalformedTag(value)
    }
}
impl From<LengthMismatchError> for EvaluationError {
    fn from(value: LengthMismatchError) -> Self {
        Self::LengthMismatch(value)
    }
}

/// Checks that both corpus have the same number of samples and that every pair of samples has
/// the same number of tags.
pub(crate) fn check_consistent_length<T>(
    y_true: &[Vec<T>],
    y_pred: &[Vec<T>],
) -> Result<(), LengthMismatchError> {
    if y_true.len() != y_pred.len() {
        return Err(LengthMismatchError::SampleCount {
            true_len: y_true.len(),
            pred_len: y_pred.len(),
        });
    }
    for (sample, (t, p)) in y_true.iter().zip(y_pred).enumerate() {
        if t.len() != p.len() {
            return Err(LengthMismatchError::TokenCount {
                sample,
                true_len: t.len(),
                pred_len: p.len(),
            });
        }
    }
    Ok(())
}

fn evaluate_sample_at<'a, T, A>(
    sample: usize,
    truth: &'a [T],
    pred: &'a [T],
    strategy: &A,
) -> Result<SampleMetrics<'a>, EvaluationError>
where
    T: AsRef<str>,
    A: AlignmentStrategy + ?Sized,
{
    if truth.len() != pred.len() {
        return Err(LengthMismatchError::TokenCount {
            sample,
            true_len: truth.len(),
            pred_len: pred.len(),
        }
        .into());
    }
    let truth_spans = get_spans(truth).map_err(|e| e.in_sample(sample))?;
    let pred_spans = get_spans(pred).map_err(|e| e.in_sample(sample))?;
    Ok(strategy.align(&truth_spans, &pred_spans))
}

/// Evaluates a single sample. Errors are reported as if the sample was the sample `0` of a
/// corpus.
///
/// * `truth`: True tags
/// * `pred`: Predicted tags
/// * `strategy`: How to align the true spans with the predicted spans.
pub fn evaluate_sample<'a, T, A>(
    truth: &'a [T],
    pred: &'a [T],
    strategy: &A,
) -> Result<SampleMetrics<'a>, EvaluationError>
where
    T: AsRef<str>,
    A: AlignmentStrategy + ?Sized,
{
    evaluate_sample_at(0, truth, pred, strategy)
}

/// Evaluates a corpus with a given alignment strategy. The samples are evaluated independently
/// from one another, on multiple cores if `parallel` is `true`. The per-sample lists of the
/// result are in the same order as the samples in both cases.
///
/// * `y_true`: True tags, one vector per sample
/// * `y_pred`: Predicted tags, one vector per sample
/// * `strategy`: How to align the true spans with the predicted spans.
/// * `parallel`: Can we use multiple cores to evaluate the samples?
pub fn evaluate_with<'a, T, A>(
    y_true: &'a [Vec<T>],
    y_pred: &'a [Vec<T>],
    strategy: &A,
    parallel: bool,
) -> Result<CorpusMetrics<'a>, EvaluationError>
where
    T: AsRef<str> + Sync,
    A: AlignmentStrategy + Sync + ?Sized,
{
    check_consistent_length(y_true, y_pred)?;
    if y_true.is_empty() {
        warn!("Evaluating an empty corpus. Precision, recall and f1 will be equal to 1");
    }
    let samples: Vec<SampleMetrics<'a>> = if parallel {
        y_true
            .par_iter()
            .zip(y_pred.par_iter())
            .enumerate()
            .map(|(i, (t, p))| evaluate_sample_at(i, t, p, strategy))
            .collect::<Result<_, _>>()?
    } else {
        y_true
            .iter()
            .zip(y_pred)
            .enumerate()
            .map(|(i, (t, p))| evaluate_sample_at(i, t, p, strategy))
            .collect::<Result<_, _>>()?
    };
    let metrics = CorpusMetrics::from_samples(samples);
    debug!(
        samples = metrics.n_samples(),
        support = metrics.counts.support,
        correct = metrics.counts.correct,
        incorrect = metrics.counts.incorrect,
        partial = metrics.counts.partial,
        missing = metrics.counts.missing,
        spurious = metrics.counts.spurious,
        parallel,
        "evaluated corpus"
    );
    Ok(metrics)
}

/// Evaluates a corpus with the greedy alignment, on a single core.
pub(crate) fn evaluate_greedy<'a, T: AsRef<str> + Sync>(
    y_true: &'a [Vec<T>],
    y_pred: &'a [Vec<T>],
) -> Result<CorpusMetrics<'a>, EvaluationError> {
    evaluate_with(y_true, y_pred, &GreedyAlignment, false)
}

fn as_float<F: FloatExt>(count: usize) -> F {
    // Every primitive float can represent an usize, at worst with some rounding
    <F as NumCast>::from(count).unwrap_or_else(F::max_value)
}

/// Precision, recall and f1 derived from MUC counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores<F> {
    pub precision: F,
    pub recall: F,
    pub f1: F,
}

impl<F: FloatExt> Scores<F> {
    /// Computes the scores. The `epsilon` is added to the numerator and the denominator of the
    /// precision and the recall, so an empty corpus has a precision and a recall of 1. The f1 is
    /// 0 when both the precision and the recall are 0, which can only happen with an `epsilon`
    /// of 0.
    ///
    /// * `counts`: MUC counts of the corpus.
    /// * `epsilon`: Smoothing constant, usually `DEFAULT_EPSILON`.
    pub fn from_counts(counts: &Counts, epsilon: F) -> Self {
        let correct = as_float::<F>(counts.correct) + epsilon;
        let precision = correct / (as_float::<F>(counts.retrieved()) + epsilon);
        let recall = correct / (as_float::<F>(counts.relevant()) + epsilon);
        let denominator = precision + recall;
        let f1 = if denominator.is_zero() {
            F::zero()
        } else {
            (F::one() + F::one()) * precision * recall / denominator
        };
        Scores {
            precision,
            recall,
            f1,
        }
    }
}

/// Metrics of a whole corpus: the sum of the counts of every sample and the spans in error,
/// grouped by sample.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusMetrics<'a> {
    pub counts: Counts,
    /// Pairs of (true, predicted) spans whose types differ, one vector per sample
    pub incorrect: Vec<Vec<(Span<'a>, Span<'a>)>>,
    /// True spans without a predicted counterpart, one vector per sample
    pub missing: Vec<Vec<Span<'a>>>,
    /// Predicted spans without a true counterpart, one vector per sample
    pub spurious: Vec<Vec<Span<'a>>>,
}

impl<'a> FromIterator<SampleMetrics<'a>> for CorpusMetrics<'a> {
    fn from_iter<I: IntoIterator<Item = SampleMetrics<'a>>>(iter: I) -> Self {
        let mut res = CorpusMetrics::default();
        for sample in iter {
            res.counts += sample.counts;
            res.incorrect.push(sample.incorrect);
            res.missing.push(sample.missing);
            res.spurious.push(sample.spurious);
        }
        res
    }
}

impl<'a> CorpusMetrics<'a> {
    /// Sums the metrics of the samples. The order of the samples does not change the counts.
    pub fn from_samples<I: IntoIterator<Item = SampleMetrics<'a>>>(samples: I) -> Self {
        samples.into_iter().collect()
    }

    pub fn n_samples(&self) -> usize {
        self.incorrect.len()
    }

    pub fn scores<F: FloatExt>(&self, epsilon: F) -> Scores<F> {
        Scores::from_counts(&self.counts, epsilon)
    }

    pub fn precision<F: FloatExt>(&self, epsilon: F) -> F {
        self.scores(epsilon).precision
    }

    pub fn recall<F: FloatExt>(&self, epsilon: F) -> F {
        self.scores(epsilon).recall
    }

    pub fn f1<F: FloatExt>(&self, epsilon: F) -> F {
        self.scores(epsilon).f1
    }

    /// Iterates over the incorrect pairs of every sample.
    pub fn incorrect_pairs(&self) -> impl Iterator<Item = &(Span<'a>, Span<'a>)> {
        self.incorrect.iter().flatten()
    }

    /// Iterates over the missing spans of every sample.
    pub fn missing_spans(&self) -> impl Iterator<Item = &Span<'a>> {
        self.missing.iter().flatten()
    }

    /// Iterates over the spurious spans of every sample.
    pub fn spurious_spans(&self) -> impl Iterator<Item = &Span<'a>> {
        self.spurious.iter().flatten()
    }

    pub fn entity_type_report(&self) -> EntityTypeReport {
        EntityTypeReport::from_metrics(self)
    }

    pub fn incorrect_confusion(&self, threshold: usize) -> IncorrectConfusion {
        IncorrectConfusion::from_metrics(self, threshold)
    }
}

/// Computes the precision of the predicted tags.
///
/// * `y_true`: True tags, one vector per sample
/// * `y_pred`: Predicted tags, one vector per sample
/// * `epsilon`: Smoothing constant, usually `DEFAULT_EPSILON`.
pub fn precision_score<T: AsRef<str> + Sync>(
    y_true: &[Vec<T>],
    y_pred: &[Vec<T>],
    epsilon: f64,
) -> Result<f64, EvaluationError> {
    Ok(evaluate_greedy(y_true, y_pred)?.precision(epsilon))
}

/// Computes the recall of the predicted tags.
///
/// * `y_true`: True tags, one vector per sample
/// * `y_pred`: Predicted tags, one vector per sample
/// * `epsilon`: Smoothing constant, usually `DEFAULT_EPSILON`.
pub fn recall_score<T: AsRef<str> + Sync>(
    y_true: &[Vec<T>],
    y_pred: &[Vec<T>],
    epsilon: f64,
) -> Result<f64, EvaluationError> {
    Ok(evaluate_greedy(y_true, y_pred)?.recall(epsilon))
}

/// Computes the f1 of the predicted tags.
///
/// * `y_true`: True tags, one vector per sample
/// * `y_pred`: Predicted tags, one vector per sample
/// * `epsilon`: Smoothing constant, usually `DEFAULT_EPSILON`.
pub fn f1_score<T: AsRef<str> + Sync>(
    y_true: &[Vec<T>],
    y_pred: &[Vec<T>],
    epsilon: f64,
) -> Result<f64, EvaluationError> {
    Ok(evaluate_greedy(y_true, y_pred)?.f1(epsilon))
}

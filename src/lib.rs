/*!
This library scores the output of a named entity recognition (NER) model against the ground
truth, span by span, following the MUC evaluation scheme. Every true span is paired with at most
one predicted span and the pair is classified with one of five outcomes.

# Outcomes
* Correct (`cor`): both spans have the same boundaries and the same type.
* Incorrect (`inc`): the spans overlap but their types differ.
* Partial (`par`): the spans overlap and have the same type, but their boundaries differ.
* Missing (`mis`): a true span has no predicted counterpart.
* Spurious (`spu`): a predicted span has no true counterpart.

The precision is `cor / (cor + inc + par + spu)` and the recall is `cor / (cor + inc + par +
mis)`. A small epsilon is added to both numerators and denominators, so an empty corpus scores 1.

# Terminology
* A tag is a string made of a prefix (`B`, `I` or `O`), a delimiter and an entity type, such as
    `B-PER` or `I-LOC`. The outside tag is a bare `O`.
* A span is a run of tags opened by a `B` and extended by the following `I`, such as `["B-PER",
    "I-PER"]`. Its start and end indices are both inclusive.
* A sample is the list of tags of a single sentence, and a corpus is a list of samples.

# Alignment
The true and predicted spans of a sample are aligned greedily: the two leftmost spans are
compared and the one (or both) that got classified is consumed. Other strategies can be plugged
in through the `AlignmentStrategy` trait and `evaluate_with`.
*/

mod alignment;
mod analysis;
mod config;
mod entity;
mod metrics;
mod reporter;

// The public api starts here
pub use entity::{
    compare, get_spans, get_spans_from_str, get_spans_opt, split_tags, MalformedTagError,
    Outcome, Prefix, Span, SpanIter,
};

pub use alignment::{AlignmentStrategy, Counts, GreedyAlignment, SampleMetrics};

pub use metrics::{
    evaluate_sample, evaluate_with, f1_score, precision_score, recall_score, CorpusMetrics,
    EvaluationError, FloatExt, LengthMismatchError, Scores, DEFAULT_EPSILON,
};

pub use analysis::{
    EntityTypeErrors, EntityTypeReport, ErrorCounts, IncorrectConfusion,
    DEFAULT_CONFUSION_THRESHOLD,
};

pub use reporter::{ReportConfig, ReportError, Reporter, DEFAULT_REPORT_FILE};

pub use config::{MucConfig, MucConfigBuilder};

/// Evaluates a corpus with the greedy alignment, on a single core. The returned metrics borrow
/// the entity types of the true and predicted tags.
///
/// * `y_true`: True tags, one vector per sample
/// * `y_pred`: Predicted tags, one vector per sample
///
/// #Example
/// ```rust
/// use rumuc::{evaluate, DEFAULT_EPSILON};
///
/// let y_true = vec![vec!["O", "B-PER", "I-PER", "O"], vec!["B-LOC", "O"]];
/// let y_pred = vec![vec!["O", "B-PER", "I-PER", "O"], vec!["O", "O"]];
///
/// let metrics = evaluate(&y_true, &y_pred).unwrap();
/// assert_eq!(metrics.counts.correct, 1);
/// assert_eq!(metrics.counts.missing, 1);
/// assert!((metrics.precision(DEFAULT_EPSILON) - 1.0).abs() < 1e-9);
/// assert!((metrics.recall(DEFAULT_EPSILON) - 0.5).abs() < 1e-5);
/// ```
pub fn evaluate<'a, T: AsRef<str> + Sync>(
    y_true: &'a [Vec<T>],
    y_pred: &'a [Vec<T>],
) -> Result<CorpusMetrics<'a>, EvaluationError> {
    metrics::evaluate_greedy(y_true, y_pred)
}

/// Main entrypoint of the library. This function evaluates the corpus and gathers the counts,
/// the scores, the errors of each entity type and the confusion matrix of the incorrect types
/// into a `Reporter`, which can be displayed as a Markdown document or written to disk. Instead
/// of taking in the raw parameters, this function takes a `MucConfig` struct.
///
/// * `y_true`: True tags, one vector per sample
/// * `y_pred`: Predicted tags, one vector per sample
/// * `config`: Parameters of the evaluation.
///
/// #Example
/// ```rust
/// use rumuc::{evaluate_conf, MucConfigBuilder};
///
/// let y_true = vec![vec!["B-PER", "I-PER", "O"], vec!["B-LOC", "O", "B-ORG"]];
/// let y_pred = vec![vec!["B-PER", "O", "O"], vec!["B-LOC", "O", "B-PER"]];
/// let config = MucConfigBuilder::default().epsilon(0.0).parallel(true).build();
///
/// let reporter = evaluate_conf(&y_true, &y_pred, config).unwrap();
/// assert_eq!(reporter.counts().partial, 1);
/// assert_eq!(reporter.counts().incorrect, 1);
/// assert_eq!(reporter.scores().precision, 1.0 / 3.0);
/// ```
pub fn evaluate_conf<T: AsRef<str> + Sync>(
    y_true: &[Vec<T>],
    y_pred: &[Vec<T>],
    config: MucConfig,
) -> Result<Reporter, EvaluationError> {
    let metrics = evaluate_with(y_true, y_pred, &GreedyAlignment, config.parallel)?;
    Ok(Reporter::new(&metrics, &config))
}

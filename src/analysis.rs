/**
This module breaks down the errors of a corpus by entity type: how many incorrect, missing and
spurious spans each type has, and which types are confused with one another.
*/
use crate::metrics::CorpusMetrics;
use ahash::AHashMap;
use itertools::Itertools;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Incorrect types are only kept in the confusion matrix when they appear at least this many
/// times.
pub const DEFAULT_CONFUSION_THRESHOLD: usize = 3;

/// Number of errors of a single entity type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCounts {
    pub incorrect: usize,
    pub missing: usize,
    pub spurious: usize,
}

/// Line of the `EntityTypeReport`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityTypeErrors {
    pub entity_type: String,
    pub errors: ErrorCounts,
}

/// Errors of every entity type found in the incorrect, missing or spurious spans of a corpus.
/// Incorrect and missing spans are counted with their true type, spurious spans with their
/// predicted type. The lines are sorted by descending number of incorrect spans, then by
/// ascending type.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypeReport {
    rows: Vec<EntityTypeErrors>,
}

impl EntityTypeReport {
    pub fn from_metrics(metrics: &CorpusMetrics) -> Self {
        let mut per_type: AHashMap<&str, ErrorCounts> = AHashMap::new();
        for (truth, _) in metrics.incorrect_pairs() {
            per_type.entry(truth.entity_type()).or_default().incorrect += 1;
        }
        for truth in metrics.missing_spans() {
            per_type.entry(truth.entity_type()).or_default().missing += 1;
        }
        for pred in metrics.spurious_spans() {
            per_type.entry(pred.entity_type()).or_default().spurious += 1;
        }
        let rows = per_type
            .into_iter()
            .sorted_by(|(left_type, left), (right_type, right)| {
                right
                    .incorrect
                    .cmp(&left.incorrect)
                    .then_with(|| left_type.cmp(right_type))
            })
            .map(|(entity_type, errors)| EntityTypeErrors {
                entity_type: String::from(entity_type),
                errors,
            })
            .collect();
        EntityTypeReport { rows }
    }

    pub fn rows(&self) -> &[EntityTypeErrors] {
        &self.rows
    }

    pub fn get(&self, entity_type: &str) -> Option<&ErrorCounts> {
        self.rows
            .iter()
            .find(|r| r.entity_type == entity_type)
            .map(|r| &r.errors)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Confusion matrix of the incorrect pairs. `matrix[[i, j]]` is the number of incorrect pairs
/// whose true type is `labels[i]` and whose predicted type is `labels[j]`. Only the true types
/// with at least `threshold` incorrect pairs are labels, sorted in ascending order. The pairs
/// whose predicted type is not a label are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncorrectConfusion {
    labels: Vec<String>,
    matrix: Array2<usize>,
}

impl Default for IncorrectConfusion {
    fn default() -> Self {
        IncorrectConfusion {
            labels: vec![],
            matrix: Array2::zeros((0, 0)),
        }
    }
}

impl IncorrectConfusion {
    pub fn from_metrics(metrics: &CorpusMetrics, threshold: usize) -> Self {
        let true_type_counts = metrics
            .incorrect_pairs()
            .map(|(truth, _)| truth.entity_type())
            .counts();
        let labels: Vec<&str> = true_type_counts
            .into_iter()
            .filter(|(_, count)| *count >= threshold)
            .map(|(entity_type, _)| entity_type)
            .sorted()
            .collect();
        let positions: AHashMap<&str, usize> =
            labels.iter().enumerate().map(|(i, l)| (*l, i)).collect();
        let mut matrix: Array2<usize> = Array2::zeros((labels.len(), labels.len()));
        for (truth, pred) in metrics.incorrect_pairs() {
            let row = positions.get(truth.entity_type());
            let column = positions.get(pred.entity_type());
            if let (Some(&i), Some(&j)) = (row, column) {
                matrix[[i, j]] += 1;
            }
        }
        IncorrectConfusion {
            labels: labels.into_iter().map(String::from).collect(),
            matrix,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn matrix(&self) -> &Array2<usize> {
        &self.matrix
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::{Counts, SampleMetrics};
    use crate::entity::Span;
    use ndarray::array;

    fn incorrect(truth: &'static str, pred: &'static str) -> (Span<'static>, Span<'static>) {
        (Span::new(truth, 0, 0), Span::new(pred, 0, 0))
    }

    fn build_metrics() -> CorpusMetrics<'static> {
        let first = SampleMetrics {
            counts: Counts::default(),
            incorrect: vec![
                incorrect("PER", "LOC"),
                incorrect("PER", "ORG"),
                incorrect("PER", "LOC"),
                incorrect("LOC", "PER"),
            ],
            missing: vec![Span::new("MISC", 1, 1), Span::new("LOC", 2, 2)],
            spurious: vec![Span::new("ORG", 3, 3)],
        };
        let second = SampleMetrics {
            counts: Counts::default(),
            incorrect: vec![
                incorrect("LOC", "PER"),
                incorrect("LOC", "MISC"),
                incorrect("ORG", "PER"),
            ],
            missing: vec![],
            spurious: vec![Span::new("DATE", 0, 1)],
        };
        CorpusMetrics::from_samples(vec![first, second])
    }

    #[test]
    fn test_entity_type_report() {
        let report = build_metrics().entity_type_report();
        let actual: Vec<(&str, usize, usize, usize)> = report
            .rows()
            .iter()
            .map(|r| {
                (
                    r.entity_type.as_str(),
                    r.errors.incorrect,
                    r.errors.missing,
                    r.errors.spurious,
                )
            })
            .collect();
        let expected = vec![
            ("LOC", 3, 1, 0),
            ("PER", 3, 0, 0),
            ("ORG", 1, 0, 1),
            ("DATE", 0, 0, 1),
            ("MISC", 0, 1, 0),
        ];
        assert_eq!(actual, expected);
        assert_eq!(report.get("ORG").map(|e| e.spurious), Some(1));
        assert_eq!(report.get("GEO"), None);
        assert_eq!(report.len(), 5);
    }

    #[test]
    fn test_incorrect_confusion() {
        let confusion = build_metrics().incorrect_confusion(DEFAULT_CONFUSION_THRESHOLD);
        assert_eq!(confusion.labels(), &["LOC", "PER"]);
        // (PER, ORG) and (LOC, MISC) are left out: ORG and MISC are not labels.
        assert_eq!(confusion.matrix(), &array![[0, 2], [2, 0]]);
    }

    #[test]
    fn test_incorrect_confusion_threshold() {
        let confusion = build_metrics().incorrect_confusion(1);
        assert_eq!(confusion.labels(), &["LOC", "ORG", "PER"]);
        assert_eq!(
            confusion.matrix(),
            &array![[0, 0, 2], [0, 0, 1], [2, 1, 0]]
        );
        let confusion = build_metrics().incorrect_confusion(4);
        assert!(confusion.is_empty());
        assert_eq!(confusion.matrix().dim(), (0, 0));
    }

    #[test]
    fn test_empty_metrics() {
        let metrics = CorpusMetrics::default();
        assert!(metrics.entity_type_report().is_empty());
        assert_eq!(
            metrics.incorrect_confusion(DEFAULT_CONFUSION_THRESHOLD),
            IncorrectConfusion::default()
        );
    }
}

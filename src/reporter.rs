/**
This modules renders the results of an evaluation as a Markdown report and writes it to disk.
*/
use crate::alignment::Counts;
use crate::analysis::{EntityTypeReport, IncorrectConfusion};
use crate::config::MucConfig;
use crate::metrics::{CorpusMetrics, Scores};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{self, Display};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default name of the written report.
pub const DEFAULT_REPORT_FILE: &str = "report_all.md";

/// The reporter holds everything needed to describe the result of an evaluation: the MUC
/// counts, the scores, the errors of every entity type and the confusion matrix of the incorrect
/// types. It is displayed as a Markdown document and can be written to disk with `write`. The
/// reporter can be built with the `evaluate_conf` function.
///
/// # Example
///
/// ```rust
/// use rumuc::{evaluate_conf, MucConfig};
///
/// let y_true = vec![vec!["B-PER", "I-PER", "O", "B-LOC"], vec!["B-ORG", "O"]];
/// let y_pred = vec![vec!["B-PER", "I-PER", "O", "B-PER"], vec!["O", "O"]];
///
/// let reporter = evaluate_conf(&y_true, &y_pred, MucConfig::default()).unwrap();
///
/// let expected_report = "### Precision-Recall-F1 Score
/// | precision | recall | f1_score |
/// | --- | --- | --- |
/// | 0.5000 | 0.3333 | 0.4000 |
///
/// #### MUC Counts
/// | support | cor | inc | par | mis | spu |
/// | --- | --- | --- | --- | --- | --- |
/// | 3 | 1 | 1 | 0 | 1 | 0 |
///
/// #### MUC Score
/// | entity | inc | mis | spu |
/// | --- | --- | --- | --- |
/// | LOC | 1 | 0 | 0 |
/// | ORG | 0 | 1 | 0 |
///
/// #### Incorrect Entity Confusion
/// No entity type has at least 3 incorrect spans.
/// ";
///
/// assert_eq!(expected_report, reporter.to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reporter {
    counts: Counts,
    scores: Scores<f64>,
    entity_types: EntityTypeReport,
    confusion: IncorrectConfusion,
    confusion_threshold: usize,
}

impl Reporter {
    pub fn new(metrics: &CorpusMetrics, config: &MucConfig) -> Self {
        Reporter {
            counts: metrics.counts,
            scores: metrics.scores(config.epsilon),
            entity_types: metrics.entity_type_report(),
            confusion: metrics.incorrect_confusion(config.confusion_threshold),
            confusion_threshold: config.confusion_threshold,
        }
    }

    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    pub fn scores(&self) -> &Scores<f64> {
        &self.scores
    }

    pub fn entity_types(&self) -> &EntityTypeReport {
        &self.entity_types
    }

    pub fn confusion(&self) -> &IncorrectConfusion {
        &self.confusion
    }

    /// Writes the Markdown report in `config.output_dir`, which is created if needed. Returns the
    /// path of the written file.
    pub fn write(&self, config: &ReportConfig) -> Result<PathBuf, ReportError> {
        fs::create_dir_all(&config.output_dir)?;
        let path = config.report_path();
        fs::write(&path, self.to_string())?;
        info!(path = %path.display(), "wrote report");
        Ok(path)
    }

    fn fmt_confusion(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.confusion.is_empty() {
            return writeln!(
                f,
                "No entity type has at least {} incorrect spans.",
                self.confusion_threshold
            );
        }
        let labels = self.confusion.labels();
        writeln!(f, "| true \\ pred | {} |", labels.join(" | "))?;
        writeln!(f, "|{}", " --- |".repeat(labels.len() + 1))?;
        for (label, row) in labels.iter().zip(self.confusion.matrix().rows()) {
            let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            writeln!(f, "| {} | {} |", label, cells.join(" | "))?;
        }
        Ok(())
    }
}

impl Display for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### Precision-Recall-F1 Score")?;
        writeln!(f, "| precision | recall | f1_score |")?;
        writeln!(f, "| --- | --- | --- |")?;
        writeln!(
            f,
            "| {:.4} | {:.4} | {:.4} |",
            self.scores.precision, self.scores.recall, self.scores.f1
        )?;
        writeln!(f)?;

        let c = &self.counts;
        writeln!(f, "### MUC Counts")?;
        writeln!(f, "| support | cor | inc | par | mis | spu |")?;
        writeln!(f, "| --- | --- | --- | --- | --- | --- |")?;
        writeln!(
            f,
            "| {} | {} | {} | {} | {} | {} |",
            c.support, c.correct, c.incorrect, c.partial, c.missing, c.spurious
        )?;
        writeln!(f)?;

        writeln!(f, "### MUC Score")?;
        writeln!(f, "| entity | inc | mis | spu |")?;
        writeln!(f, "| --- | --- | --- | --- |")?;
        for row in self.entity_types.rows() {
            writeln!(
                f,
                "| {} | {} | {} | {} |",
                row.entity_type, row.errors.incorrect, row.errors.missing, row.errors.spurious
            )?;
        }
        writeln!(f)?;

        writeln!(f, "### Incorrect Entity Confusion")?;
        self.fmt_confusion(f)
    }
}

/// Where the report is written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    pub file_name: String,
}

impl ReportConfig {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        ReportConfig {
            output_dir: output_dir.as_ref().to_path_buf(),
            file_name: String::from(DEFAULT_REPORT_FILE),
        }
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::new("report")
    }
}

/// The report could not be written.
#[derive(Debug)]
pub struct ReportError(io::Error);

impl ReportError {
    pub fn kind(&self) -> io::ErrorKind {
        self.0.kind()
    }
}

impl Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not write the report: {}", self.0)
    }
}

impl Error for ReportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl From<io::Error> for ReportError {
    fn from(value: io::Error) -> Self {
        ReportError(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::evaluate_with;
    use crate::GreedyAlignment;

    fn build_reporter(threshold: usize) -> Reporter {
        let y_true = vec![
            vec!["B-PER", "I-PER", "O", "B-LOC"],
            vec!["B-LOC", "O", "B-LOC"],
            vec!["B-ORG", "O"],
        ];
        let y_pred = vec![
            vec!["B-PER", "I-PER", "O", "B-PER"],
            vec!["B-PER", "O", "B-MISC"],
            vec!["O", "O"],
        ];
        let metrics = evaluate_with(&y_true, &y_pred, &GreedyAlignment, false).unwrap();
        let config = MucConfig::from((1e-5, false, threshold));
        Reporter::new(&metrics, &config)
    }

    #[test]
    fn test_reporter_section_headings() {
        let report = build_reporter(3).to_string();
        let headings: Vec<&str> = report.lines().filter(|l| l.starts_with('#')).collect();
        assert_eq!(
            headings,
            vec![
                "### Precision-Recall-F1 Score",
                "### MUC Counts",
                "### MUC Score",
                "### Incorrect Entity Confusion",
            ]
        );
    }

    #[test]
    fn test_reporter_content() {
        let reporter = build_reporter(2);
        assert_eq!(reporter.counts().incorrect, 3);
        assert_eq!(reporter.counts().missing, 1);
        assert_eq!(reporter.entity_types().get("LOC").unwrap().incorrect, 3);
        assert_eq!(reporter.confusion().labels(), &["LOC"]);
    }

    #[test]
    fn test_reporter_display() {
        let reporter = build_reporter(2);
        let expected = "### Precision-Recall-F1 Score
| precision | recall | f1_score |
| --- | --- | --- |
| 0.2500 | 0.2000 | 0.2222 |

### MUC Counts
| support | cor | inc | par | mis | spu |
| --- | --- | --- | --- | --- | --- |
| 5 | 1 | 3 | 0 | 1 | 0 |

### MUC Score
| entity | inc | mis | spu |
| --- | --- | --- | --- |
| LOC | 3 | 0 | 0 |
| ORG | 0 | 1 | 0 |

### Incorrect Entity Confusion
| true \\ pred | LOC |
| --- | --- |
| LOC | 0 |
";
        assert_eq!(reporter.to_string(), expected);
    }

    #[test]
    fn test_reporter_write() {
        let dir = std::env::temp_dir()
            .join(format!("rumuc-reporter-{}", std::process::id()))
            .join("nested");
        let config = ReportConfig::new(&dir);
        let reporter = build_reporter(3);
        let path = reporter.write(&config).unwrap();
        assert_eq!(path, dir.join("report_all.md"));
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, reporter.to_string());
        fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_reporter_write_error() {
        // A regular file can't be used as the output directory
        let file = std::env::temp_dir().join(format!("rumuc-not-a-dir-{}", std::process::id()));
        fs::write(&file, "").unwrap();
        let err = build_reporter(3).write(&ReportConfig::new(&file)).unwrap_err();
        assert!(err.to_string().starts_with("Could not write the report"));
        fs::remove_file(&file).unwrap();
    }

    #[test]
    fn test_report_config_default() {
        let config = ReportConfig::default();
        assert_eq!(config.report_path(), PathBuf::from("report/report_all.md"));
    }
}

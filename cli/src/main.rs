//! Evaluates the predictions of a NER model stored as JSON lines. Each line holds one sample, with
//! the true tags in `tag` and the predicted tags in `tag_pred`, both separated by spaces:
//!
//! ```text
//! {"tag": "O B-PER I-PER O", "tag_pred": "O B-PER O O"}
//! ```
//!
//! The Markdown report is written to `<output-dir>/report_all.md`.

use anyhow::Context;
use clap::Parser;
use rumuc::{evaluate_conf, split_tags, MucConfigBuilder, ReportConfig};
use serde::Deserialize;
use serde_jsonlines::json_lines;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Deserialize)]
struct Record {
    tag: String,
    tag_pred: String,
}

impl Record {
    fn into_tags(self) -> (Vec<String>, Vec<String>) {
        let split = |s: &str| -> Vec<String> {
            split_tags(s).into_iter().map(String::from).collect()
        };
        (split(&self.tag), split(&self.tag_pred))
    }
}

fn load_corpus<P: AsRef<Path>>(path: P) -> anyhow::Result<(Vec<Vec<String>>, Vec<Vec<String>>)> {
    let path = path.as_ref();
    let records = json_lines::<Record, _>(path)
        .with_context(|| format!("could not open {}", path.display()))?;
    let mut y_true = vec![];
    let mut y_pred = vec![];
    for (line, record) in records.enumerate() {
        let record = record
            .with_context(|| format!("invalid record at line {} of {}", line + 1, path.display()))?;
        let (truth, pred) = record.into_tags();
        y_true.push(truth);
        y_pred.push(pred);
    }
    debug!(samples = y_true.len(), path = %path.display(), "loaded corpus");
    Ok((y_true, y_pred))
}

/// MUC evaluation of NER predictions
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON lines file with the `tag` and `tag_pred` fields
    input: PathBuf,
    /// Directory where the report is written
    #[arg(short, long, default_value = "report")]
    output_dir: PathBuf,
    /// Smoothing term of the precision and the recall
    #[arg(short, long, default_value_t = rumuc::DEFAULT_EPSILON)]
    epsilon: f64,
    /// Align the samples on multiple cores
    #[arg(short, long)]
    parallel: bool,
    /// Minimal number of incorrect spans of a type to show it in the confusion matrix
    #[arg(short, long, default_value_t = rumuc::DEFAULT_CONFUSION_THRESHOLD)]
    confusion_threshold: usize,
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let (y_true, y_pred) = load_corpus(&args.input)?;
    let config = MucConfigBuilder::default()
        .epsilon(args.epsilon)
        .parallel(args.parallel)
        .confusion_threshold(args.confusion_threshold)
        .build();
    info!(%config, "evaluating {}", args.input.display());

    let reporter = evaluate_conf(&y_true, &y_pred, config)
        .with_context(|| format!("could not evaluate {}", args.input.display()))?;
    let path = reporter.write(&ReportConfig::new(&args.output_dir))?;

    let scores = reporter.scores();
    println!(
        "precision: {:.4}    recall: {:.4}    f1_score: {:.4}",
        scores.precision, scores.recall, scores.f1
    );
    println!("Report written to {}", path.display());
    Ok(())
}

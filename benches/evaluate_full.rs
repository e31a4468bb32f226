use criterion::{criterion_group, criterion_main, Criterion};
use pprof::criterion::{Output, PProfProfiler};
use rumuc::{evaluate_conf, evaluate_with, GreedyAlignment, MucConfigBuilder};

const TYPES: [&str; 4] = ["PER", "LOC", "ORG", "MISC"];

/// Builds a deterministic corpus where most predictions are correct and the rest are shifted,
/// mistyped, dropped or invented.
fn build_corpus(n_samples: usize, n_tokens: usize) -> (Vec<Vec<String>>, Vec<Vec<String>>) {
    let mut y_true = Vec::with_capacity(n_samples);
    let mut y_pred = Vec::with_capacity(n_samples);
    for sample in 0..n_samples {
        let mut truth = Vec::with_capacity(n_tokens);
        let mut pred = Vec::with_capacity(n_tokens);
        for token in 0..n_tokens {
            let seed = sample * 31 + token * 7;
            let entity_type = TYPES[seed % TYPES.len()];
            let true_tag = match seed % 5 {
                0 => format!("B-{entity_type}"),
                1 => format!("I-{entity_type}"),
                _ => String::from("O"),
            };
            let pred_tag = match seed % 13 {
                0 => String::from("O"),
                1 => format!("B-{}", TYPES[(seed + 1) % TYPES.len()]),
                2 => format!("B-{entity_type}"),
                _ => true_tag.clone(),
            };
            truth.push(true_tag);
            pred.push(pred_tag);
        }
        y_true.push(truth);
        y_pred.push(pred);
    }
    (y_true, y_pred)
}

fn benchmark_small_corpus(c: &mut Criterion) {
    let (y_true, y_pred) = build_corpus(1_000, 30);
    c.bench_function("small_corpus_evaluate", |b| {
        b.iter(|| evaluate_with(&y_true, &y_pred, &GreedyAlignment, false).unwrap())
    });
}

fn benchmark_big_corpus(c: &mut Criterion) {
    let (y_true, y_pred) = build_corpus(50_000, 40);
    c.bench_function("big_corpus_evaluate", |b| {
        b.iter(|| evaluate_with(&y_true, &y_pred, &GreedyAlignment, false).unwrap())
    });
    c.bench_function("big_corpus_evaluate_parallel", |b| {
        b.iter(|| evaluate_with(&y_true, &y_pred, &GreedyAlignment, true).unwrap())
    });
}

fn benchmark_big_corpus_report(c: &mut Criterion) {
    let (y_true, y_pred) = build_corpus(50_000, 40);
    let config = MucConfigBuilder::default().confusion_threshold(1).build();
    c.bench_function("big_corpus_report", |b| {
        b.iter(|| evaluate_conf(&y_true, &y_pred, config).unwrap())
    });
}

criterion_group!(
    name=evaluate_benches;
    config = Criterion::default().sample_size(100).with_profiler(PProfProfiler::new(3000, Output::Flamegraph(None)));
    targets = benchmark_small_corpus,
    benchmark_big_corpus,
    benchmark_big_corpus_report
);
criterion_main!(evaluate_benches);

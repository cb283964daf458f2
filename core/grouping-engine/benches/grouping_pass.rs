//! FILENAME: core/grouping-engine/benches/grouping_pass.rs
//! Benchmarks for the grouping pass over a synthetic run set.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::HashMap;

use grouping_engine::{
    grouped_row_render_metadata, AggregateFunction, GroupByConfig, GroupByMode,
};
use runs_model::{DatasetIdentity, Run, RunMetric};

fn synthetic_runs(count: usize) -> Vec<Run> {
    (0..count)
        .map(|i| {
            Run::new(format!("run-{}", i))
                .with_tag("team", format!("team-{}", i % 8))
                .with_param("lr", format!("{}", 0.001 * (i % 5 + 1) as f64))
                .with_metric(RunMetric::new("loss", 1.0 / (i + 1) as f64, 1, i as i64))
                .with_metric(RunMetric::new("acc", (i % 100) as f64 / 100.0, 1, i as i64))
                .with_dataset(DatasetIdentity::new(
                    format!("dataset-{}", i % 4),
                    "abc123",
                ))
        })
        .collect()
}

fn bench_grouping_pass(c: &mut Criterion) {
    let runs = synthetic_runs(1000);
    let expanded = HashMap::new();

    let by_tag = GroupByConfig::new(GroupByMode::Tag, AggregateFunction::Average, "team");
    c.bench_function("group 1k runs by tag", |b| {
        b.iter(|| {
            grouped_row_render_metadata(black_box(&runs), Some(&by_tag), &expanded)
        })
    });

    let by_dataset = GroupByConfig::new(GroupByMode::Dataset, AggregateFunction::Max, "");
    c.bench_function("group 1k runs by dataset", |b| {
        b.iter(|| {
            grouped_row_render_metadata(black_box(&runs), Some(&by_dataset), &expanded)
        })
    });
}

criterion_group!(benches, bench_grouping_pass);
criterion_main!(benches);

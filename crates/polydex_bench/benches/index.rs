//! Index build and maintenance benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use polydex_bench::utils::{built_index, generate_changes, generate_records, FIELDS};
use polydex_core::{IndexConfig, SearchIndex};

/// Benchmark full index builds.
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for count in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let records = generate_records(count);
            b.iter(|| {
                let mut index = SearchIndex::new();
                index.build_index(black_box(records.clone()), FIELDS);
                index
            });
        });
    }
    group.finish();
}

/// Benchmark incremental batches that stay below the rebuild threshold.
fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");

    for (name, config) in [
        ("mark_for_rebuild", IndexConfig::new().rebuild_threshold(u64::MAX)),
        ("precise", IndexConfig::new().rebuild_threshold(u64::MAX).precise()),
    ] {
        group.throughput(Throughput::Elements(50));
        group.bench_function(name, |b| {
            let records = generate_records(1_000);
            let changes = generate_changes(50, 1_000);
            b.iter_batched(
                || {
                    let mut index = SearchIndex::with_config(config.clone()).unwrap();
                    index.build_index(records.clone(), FIELDS);
                    index
                },
                |mut index| {
                    index.update_index(black_box(changes.clone())).unwrap();
                    index
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

/// Benchmark a batch heavy enough to trigger a rebuild.
fn bench_threshold_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("threshold_rebuild");
    let changes = generate_changes(100, 1_000);

    group.bench_function("1000_records", |b| {
        b.iter_batched(
            || built_index(1_000),
            |mut index| {
                let report = index.update_index(black_box(changes.clone())).unwrap();
                black_box(report.rebuilt);
                index
            },
            criterion::BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_update, bench_threshold_rebuild);
criterion_main!(benches);

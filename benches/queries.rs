//! Query latency on a prebuilt forest.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hyperforest::operations::insert_batch;
use hyperforest::query::{
    count_by_weight_threshold, find_all_supersets, find_k_most_similar, find_top_k,
    find_top_k_exact,
};
use hyperforest::{Doctrine, Forest, SubsetPriority, WeightPriority};

mod workload;

fn build<D: Doctrine>(doctrine: D) -> Forest<D> {
    let mut forest = Forest::new(doctrine);
    insert_batch(&mut forest, workload::hyperedges(10_000, 500, true));
    forest
}

fn bench_top_k(c: &mut Criterion) {
    let forest = build(WeightPriority);
    c.bench_function("top_k/level_order/100", |b| {
        b.iter(|| find_top_k(black_box(&forest), 100).len())
    });
    c.bench_function("top_k/exact/100", |b| {
        b.iter(|| find_top_k_exact(black_box(&forest), 100).len())
    });
}

fn bench_threshold(c: &mut Criterion) {
    let forest = build(WeightPriority);
    c.bench_function("count_by_weight_threshold/5.0", |b| {
        b.iter(|| count_by_weight_threshold(black_box(&forest), black_box(5.0)))
    });
}

/// Superset search: pruned under subset priority, full scan otherwise.
fn bench_supersets(c: &mut Criterion) {
    let queries = workload::queries(64, 500);
    let subset = build(SubsetPriority);
    let weighted = build(WeightPriority);
    c.bench_function("find_all_supersets/subset_priority", |b| {
        b.iter(|| {
            queries
                .iter()
                .map(|q| find_all_supersets(black_box(&subset), q).len())
                .sum::<usize>()
        })
    });
    c.bench_function("find_all_supersets/weight_priority", |b| {
        b.iter(|| {
            queries
                .iter()
                .map(|q| find_all_supersets(black_box(&weighted), q).len())
                .sum::<usize>()
        })
    });
    c.bench_function("find_k_most_similar/10", |b| {
        b.iter(|| find_k_most_similar(black_box(&weighted), &queries[0], 10).len())
    });
}

criterion_group!(benches, bench_top_k, bench_threshold, bench_supersets);
criterion_main!(benches);

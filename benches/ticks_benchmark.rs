#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for nice-number tick generation and label formatting.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use trueno_chart::prelude::*;

fn ticks_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("ticks");

    for target in [5usize, 10, 50] {
        group.bench_with_input(BenchmarkId::new("nice_ticks", target), &target, |b, &target| {
            b.iter(|| nice_ticks(black_box(-13.7), black_box(9_871.25), target));
        });
    }

    let ticks = nice_ticks(-13.7, 9_871.25, 10);
    group.bench_function("format_value", |b| {
        b.iter(|| ticks.iter().map(|&t| format_value(black_box(t))).collect::<Vec<_>>());
    });

    group.finish();
}

criterion_group!(benches, ticks_benchmark);
criterion_main!(benches);

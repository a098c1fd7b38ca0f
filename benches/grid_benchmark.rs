#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for subplot grid layout and a full SVG render pass.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use trueno_chart::prelude::*;

fn populated_grid(rows: usize, cols: usize) -> SubplotGrid {
    let mut grid = SubplotGrid::new(rows, cols, 1920, 1080, 0.03).unwrap();
    grid.set_title("Benchmark grid");
    for row in 0..rows {
        for col in 0..cols {
            let points: Vec<Point> = (0..200)
                .map(|i| {
                    let t = f64::from(i) * 0.05;
                    Point::new(t, (t + (row * cols + col) as f64).sin())
                })
                .collect();
            grid.chart_mut(row, col, ChartKind::Scatter)
                .unwrap()
                .add_points(&points)
                .unwrap();
        }
    }
    grid
}

fn grid_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid");

    for (rows, cols) in [(1, 1), (2, 2), (4, 4)] {
        let grid = populated_grid(rows, cols);
        let label = format!("{rows}x{cols}");

        group.bench_with_input(BenchmarkId::new("layout", &label), &grid, |b, grid| {
            b.iter(|| black_box(grid.layout(&ApproxTextMetrics)));
        });

        group.bench_with_input(BenchmarkId::new("render_svg", &label), &grid, |b, grid| {
            b.iter(|| {
                let mut svg = SvgSurface::new(1920, 1080);
                grid.render(&mut svg);
                svg.element_count()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, grid_benchmark);
criterion_main!(benches);

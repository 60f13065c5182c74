//! Strategy benchmarks.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use parallels::prelude::*;

fn bench_winograd_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("winograd");
    group.sample_size(20);

    for n in [64_usize, 128, 256] {
        let mut rng = SimRng::new(42);
        let a = Matrix::random(n, n, -1.0, 1.0, &mut rng);
        let b = Matrix::random(n, n, -1.0, 1.0, &mut rng);

        for strategy in WinogradStrategy::all(4) {
            let engine = WinogradEngine::new(strategy);
            group.bench_with_input(BenchmarkId::new(strategy.name(), n), &n, |bench, _| {
                bench.iter(|| black_box(engine.product(&a, &b)));
            });
        }
        group.bench_with_input(BenchmarkId::new("naive", n), &n, |bench, _| {
            bench.iter(|| black_box(a.multiply(&b)));
        });
    }

    group.finish();
}

fn bench_ant_colony(c: &mut Criterion) {
    let mut group = c.benchmark_group("ant_colony");
    group.sample_size(10);

    for n in [10_usize, 25] {
        let mut rng = SimRng::new(7);
        let mut graph = Matrix::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    graph.set(i, j, rng.gen_range_f64(1.0, 100.0));
                }
            }
        }

        for strategy in [
            ColonyStrategy::Sequential,
            ColonyStrategy::Parallel { workers: 4 },
        ] {
            let mut engine = AntColonyEngine::new(ColonyParams::default().with_ants(600));
            if engine.configure(graph.clone(), 3).is_err() {
                continue;
            }
            group.bench_with_input(BenchmarkId::new(strategy.name(), n), &n, |bench, _| {
                bench.iter(|| black_box(engine.solve(strategy)));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_winograd_strategies, bench_ant_colony);
criterion_main!(benches);

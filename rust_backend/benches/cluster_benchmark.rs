use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use knox_rust::algorithms::{compute_statistics, ClusterCounter};
use knox_rust::core::domain::{Point, PointStore};

/// Deterministic pseudo-random points spread over a 20 km square and one year.
fn synthetic_store(n: usize) -> PointStore {
    let origin = NaiveDate::from_ymd_opt(2014, 1, 1).unwrap();
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    let points = (0..n)
        .map(|i| {
            let x = 500_000.0 + (next() % 20_000) as f64;
            let y = 6_500_000.0 + (next() % 20_000) as f64;
            let date = origin + chrono::Days::new(next() % 365);
            Point::new(i as i64, date, x, y)
        })
        .collect();

    PointStore::new(points).unwrap()
}

fn bench_cluster_counting(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster_counting");
    group.sample_size(10);

    let counter = ClusterCounter::default();
    for n in [100usize, 250, 500] {
        let store = synthetic_store(n);
        group.bench_with_input(BenchmarkId::new("sequential", n), &store, |b, store| {
            b.iter(|| counter.count(black_box(store)));
        });

        #[cfg(feature = "parallel")]
        group.bench_with_input(BenchmarkId::new("parallel", n), &store, |b, store| {
            b.iter(|| counter.count_parallel(black_box(store)));
        });
    }

    group.finish();
}

fn bench_moments(c: &mut Criterion) {
    let mut group = c.benchmark_group("moments");

    let store = synthetic_store(250);
    let counts = ClusterCounter::default().count(&store).normalized();
    group.bench_function("compute_statistics", |b| {
        b.iter(|| compute_statistics(black_box(&counts), black_box(store.len())));
    });

    group.finish();
}

criterion_group!(benches, bench_cluster_counting, bench_moments);
criterion_main!(benches);

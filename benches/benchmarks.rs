//! Benchmarks for runstats
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use runstats::statistics::{
    combine_means, combine_variances, mean, summarize, variance, RollingAccumulator,
};

// ============================================================================
// Batch Estimator Benchmarks
// ============================================================================

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");

    for size in [1_000usize, 100_000] {
        let data: Vec<f64> = (0..size).map(|i| (i % 97) as f64 + 1e9).collect();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("mean", size), &data, |b, data| {
            b.iter(|| black_box(mean(data).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("variance", size), &data, |b, data| {
            b.iter(|| black_box(variance(data).unwrap()));
        });
    }

    group.finish();
}

// ============================================================================
// Partition Combiner Benchmarks
// ============================================================================

fn bench_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine");
    group.throughput(Throughput::Elements(1));

    group.bench_function("means", |b| {
        b.iter(|| combine_means(black_box(1.8), 5, black_box(3.5), 6).unwrap());
    });

    group.bench_function("variances", |b| {
        b.iter(|| {
            combine_variances(black_box(1.8), 0.56, 5, black_box(3.5), 2.9, 6).unwrap()
        });
    });

    group.bench_function("summaries", |b| {
        let left = summarize(&[1.0, 2.0, 3.0, 2.0, 1.0]).unwrap();
        let right = summarize(&[3.0, 1.0, 2.0, 5.0, 4.0, 6.0]).unwrap();
        b.iter(|| black_box(&left).combine(black_box(&right)).unwrap());
    });

    group.finish();
}

// ============================================================================
// Rolling Accumulator Benchmarks
// ============================================================================

fn bench_rolling(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling");
    group.throughput(Throughput::Elements(1));

    group.bench_function("ingest", |b| {
        let mut acc = RollingAccumulator::new();
        let mut i = 0u64;
        b.iter(|| {
            acc.ingest(i as f64);
            i = i.wrapping_add(1);
        });
    });

    group.bench_function("query_all", |b| {
        let acc: RollingAccumulator = (0..100_000u64).map(|i| i as f64).collect();
        b.iter(|| {
            black_box(acc.current_mean().unwrap());
            black_box(acc.current_variance().unwrap());
            black_box(acc.current_stddev().unwrap());
        });
    });

    group.bench_function("merge", |b| {
        let s1: RollingAccumulator = (0..10_000u64).map(|i| i as f64).collect();
        let s2: RollingAccumulator = (10_000..20_000u64).map(|i| i as f64).collect();
        b.iter(|| {
            let mut s = s1.clone();
            s.merge(black_box(&s2)).unwrap();
            s
        });
    });

    group.finish();
}

// ============================================================================
// Main
// ============================================================================

criterion_group!(benches, bench_batch, bench_combine, bench_rolling);

criterion_main!(benches);

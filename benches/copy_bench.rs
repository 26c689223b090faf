//! Parallel copy benchmarks
//!
//! Compares sequential, flat-partition and recursive-halving dispatch, the
//! bulk and vectorized leaf kernels, and `copy_to_new` against `to_vec`.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use memband::algorithms::ParallelCopy;
use memband::config::{CopyConfig, ParallelConfig, SplitDiscipline};

//==============================================================================
// TEST DATA GENERATION
//==============================================================================

fn generate_test_data(len: usize) -> Vec<u64> {
    (0..len as u64).map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15)).collect()
}

const SIZES: [usize; 5] = [1 << 10, 1 << 14, 1 << 17, 1 << 20, 1 << 23];

fn copiers() -> Vec<(&'static str, ParallelCopy)> {
    vec![
        ("sequential", ParallelCopy::new(CopyConfig::flat(ParallelConfig::sequential()))),
        ("flat", ParallelCopy::new(CopyConfig::default())),
        (
            "halving",
            ParallelCopy::new(CopyConfig::new(
                ParallelConfig::default(),
                SplitDiscipline::RecursiveHalving,
            )),
        ),
    ]
}

//==============================================================================
// COPY BENCHMARKS
//==============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("copy/dispatch");
    for &len in &SIZES {
        let src = generate_test_data(len);
        let mut dst = vec![0u64; len];
        group.throughput(Throughput::Bytes((len * 8) as u64));

        group.bench_with_input(BenchmarkId::new("std", len), &len, |b, _| {
            b.iter(|| dst.copy_from_slice(black_box(&src)))
        });
        for (name, copier) in copiers() {
            group.bench_with_input(BenchmarkId::new(name, len), &len, |b, &len| {
                b.iter(|| copier.copy(black_box(&src), 0, &mut dst, 0, len).unwrap())
            });
        }
    }
    group.finish();
}

fn bench_leaf_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("copy/leaf");
    let copier = ParallelCopy::default();
    for &len in &SIZES {
        let src = generate_test_data(len);
        let mut dst = vec![0u64; len];
        group.throughput(Throughput::Bytes((len * 8) as u64));

        group.bench_with_input(BenchmarkId::new("bulk", len), &len, |b, &len| {
            b.iter(|| copier.copy(black_box(&src), 0, &mut dst, 0, len).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("vectorized", len), &len, |b, &len| {
            b.iter(|| copier.copy_simd(black_box(&src), 0, &mut dst, 0, len).unwrap())
        });
    }
    group.finish();
}

fn bench_copy_to_new(c: &mut Criterion) {
    let mut group = c.benchmark_group("copy/to_new");
    for &len in &SIZES {
        let src = generate_test_data(len);
        group.throughput(Throughput::Bytes((len * 8) as u64));

        group.bench_with_input(BenchmarkId::new("to_vec", len), &len, |b, _| {
            b.iter(|| black_box(&src).to_vec())
        });
        for (name, copier) in copiers() {
            group.bench_with_input(BenchmarkId::new(name, len), &len, |b, &len| {
                b.iter(|| copier.copy_to_new(black_box(&src), 0, len).unwrap())
            });
        }
    }
    group.finish();
}

fn bench_work_quantum(c: &mut Criterion) {
    let mut group = c.benchmark_group("copy/quantum");
    let len = 1 << 20;
    let src = generate_test_data(len);
    let mut dst = vec![0u64; len];
    group.throughput(Throughput::Bytes((len * 8) as u64));
    for quantum in [1 << 10, 1 << 12, 1 << 14, 1 << 16, 1 << 18] {
        let copier = ParallelCopy::new(CopyConfig::halving(ParallelConfig::new(quantum, 0)));
        group.bench_with_input(BenchmarkId::from_parameter(quantum), &quantum, |b, _| {
            b.iter(|| copier.copy(black_box(&src), 0, &mut dst, 0, len).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    copy_ops,
    bench_dispatch,
    bench_leaf_kernels,
    bench_copy_to_new,
    bench_work_quantum,
);

criterion_main!(copy_ops);

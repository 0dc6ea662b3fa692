//! Benchmarks for board construction and batch search.

use aperture_pack_core::{Board, Sampler, SearchConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn board_benchmark(c: &mut Criterion) {
    c.bench_function("board_dense_small_apertures", |b| {
        b.iter(|| Board::new(black_box(0.001), black_box(0.0231)))
    });

    c.bench_function("board_sparse_large_apertures", |b| {
        b.iter(|| Board::new(black_box(0.1), black_box(0.2)))
    });
}

fn search_benchmark(c: &mut Criterion) {
    let sequential = Sampler::new(
        SearchConfig::new()
            .with_trials(1_000)
            .with_seed(42)
            .with_parallel(false),
    );
    let parallel = Sampler::new(SearchConfig::new().with_trials(1_000).with_seed(42));

    c.bench_function("search_1000_sequential", |b| {
        b.iter(|| black_box(sequential.run()))
    });
    c.bench_function("search_1000_parallel", |b| b.iter(|| black_box(parallel.run())));
}

criterion_group!(benches, board_benchmark, search_benchmark);
criterion_main!(benches);

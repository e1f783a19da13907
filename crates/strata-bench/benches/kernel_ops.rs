//! Criterion micro-benchmarks for the stencil kernel and block exchange.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use strata_bench::{profile_grid, reference_profile, stress_profile};
use strata_core::{Grid, RowRange};
use strata_partition::{extract, merge, PartitionPlan};
use strata_stencil::DiffusionStencil;

/// Benchmark: one kernel step over the 100x100 reference grid.
fn bench_step_10k(c: &mut Criterion) {
    let config = reference_profile();
    let prev = profile_grid(&config);
    let mut next = prev.clone();
    let stencil = DiffusionStencil::new(config.coefficients);

    c.bench_function("kernel_step_10k", |b| {
        b.iter(|| {
            stencil.apply(black_box(&prev), &mut next).unwrap();
            black_box(&next);
        });
    });
}

/// Benchmark: one kernel step over a 1000x1000 grid.
fn bench_step_1m(c: &mut Criterion) {
    let config = stress_profile(1);
    let prev = profile_grid(&config);
    let mut next = prev.clone();
    let stencil = DiffusionStencil::new(config.coefficients);

    c.bench_function("kernel_step_1m", |b| {
        b.iter(|| {
            stencil.apply(black_box(&prev), &mut next).unwrap();
            black_box(&next);
        });
    });
}

/// Benchmark: extract, step and merge every block of the reference plan,
/// i.e. one round without the transport.
fn bench_round_blocks_10k(c: &mut Criterion) {
    let config = reference_profile();
    let prev = profile_grid(&config);
    let mut next = prev.clone();
    let stencil = DiffusionStencil::new(config.coefficients);
    let plan = PartitionPlan::new(config.rows, 11).unwrap();
    let ranges: Vec<RowRange> = plan.iter().filter_map(|(_, range)| range).collect();

    c.bench_function("round_blocks_10k", |b| {
        b.iter(|| {
            for &range in &ranges {
                let block: Grid = extract(&prev, range).unwrap();
                let stepped = stencil.step(&block);
                merge(&stepped, &mut next, range).unwrap();
            }
            black_box(&next);
        });
    });
}

criterion_group!(benches, bench_step_10k, bench_step_1m, bench_round_blocks_10k);
criterion_main!(benches);

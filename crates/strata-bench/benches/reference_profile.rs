//! End-to-end benchmarks of the reference run.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use strata_bench::{profile_grid, reference_profile, REFERENCE_PROCESSES};
use strata_engine::{run_local, CoordinatorOptions, NullSink, SnapshotPolicy};
use strata_stencil::solve_serial;

/// Benchmark: the 100-step reference run on the serial solver.
fn bench_serial_reference(c: &mut Criterion) {
    let config = reference_profile();
    let initial = profile_grid(&config);

    c.bench_function("serial_100_steps_10k", |b| {
        b.iter(|| {
            let grid = solve_serial(&config, &initial).unwrap();
            black_box(&grid);
        });
    });
}

/// Benchmark: the same run distributed over 11 worker threads.
fn bench_local_reference(c: &mut Criterion) {
    let config = reference_profile();
    let options = CoordinatorOptions {
        snapshot: SnapshotPolicy::disabled(),
        ..CoordinatorOptions::default()
    };

    let mut group = c.benchmark_group("local");
    group.sample_size(20);
    group.bench_function("local_100_steps_10k_12p", |b| {
        b.iter(|| {
            let outcome =
                run_local(config, REFERENCE_PROCESSES, options.clone(), NullSink).unwrap();
            black_box(&outcome.grid);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_serial_reference, bench_local_reference);
criterion_main!(benches);

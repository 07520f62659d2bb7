//! Performance benchmarks for the advection solvers
//!
//! # What We're Measuring
//!
//! 1. **Upwind step**: one stencil application, `O(Nx)`, one allocation
//! 2. **Upwind solver**: seeding plus `n - 1` steps and the finiteness check
//! 3. **Analytical solver**: one profile evaluation per grid point and time
//!    point; with `--features parallel` the time points are spread over rayon
//!    once the work exceeds the parallel threshold
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench --bench stepper_performance
//!
//! # Only the stencil
//! cargo bench --bench stepper_performance "Upwind Step"
//!
//! # Analytical path with rayon
//! cargo bench --bench stepper_performance --features parallel "Analytical"
//! ```
//!
//! # Expected Results
//!
//! Every group should scale linearly with `Nx × time points`. The analytical
//! solver is slower per value than the upwind step (an `exp` per value), which
//! is what the `parallel` feature is for.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use advect_rs::models::{InitialProfile, ProfileParameters};
use advect_rs::solver::{upwind_step, AnalyticalSolver, Scenario, Solver, UpwindSolver};

// =================================================================================================
// Scenarios
// =================================================================================================

/// Gaussian pulse with the reference spacing, velocity and Courant number 0.8
fn scenario(points: usize, time_points: usize) -> Scenario {
    let params = ProfileParameters::new(10.0, 500.0, points).unwrap();
    let profile = InitialProfile::gaussian(10.0).unwrap();
    Scenario::new(params, profile, 40.0, time_points).unwrap()
}

// =================================================================================================
// Benchmark Functions
// =================================================================================================

/// One stencil application for growing grids
fn benchmark_upwind_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("Upwind Step");

    for points in [101, 1_001, 10_001, 100_001] {
        let seed = scenario(points, 1).initial_snapshot().unwrap();
        group.throughput(Throughput::Elements(points as u64));

        group.bench_with_input(BenchmarkId::from_parameter(points), &points, |b, &points| {
            b.iter(|| upwind_step(black_box(&seed), 10.0, 40.0, 500.0, points).unwrap());
        });
    }

    group.finish();
}

/// Full runs of both solvers on identical scenarios
fn benchmark_solver_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("Solver Comparison");

    // (grid points, time points)
    let configurations = [(101, 10), (101, 1_000), (1_001, 1_000), (10_001, 100)];

    for (points, time_points) in configurations {
        let scenario = scenario(points, time_points);
        group.throughput(Throughput::Elements((points * time_points) as u64));

        group.bench_function(
            format!("Upwind {} points & {} time points", points, time_points),
            |b| {
                let solver = UpwindSolver::new();
                b.iter(|| solver.solve(black_box(&scenario)).unwrap());
            },
        );

        group.bench_function(
            format!("Analytical {} points & {} time points", points, time_points),
            |b| {
                let solver = AnalyticalSolver::new();
                b.iter(|| solver.solve(black_box(&scenario)).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_upwind_step, benchmark_solver_comparison);
criterion_main!(benches);

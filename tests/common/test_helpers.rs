//! Helper functions for integration tests

#![allow(dead_code)]

use advect_rs::models::{InitialProfile, ProfileParameters};
use advect_rs::solver::{AnalyticalSolver, Scenario, SimulationResult, Solver, UpwindSolver};

/// Gaussian scenario on a grid of 500 m cells with u = 10 m/s
pub fn gaussian_scenario(nx: usize, width: f64, dt: f64, time_points: usize) -> Scenario {
    let params = ProfileParameters::new(10.0, 500.0, nx).unwrap();
    let profile = InitialProfile::gaussian(width).unwrap();
    Scenario::new(params, profile, dt, time_points).unwrap()
}

/// Rectangular scenario on a grid of 500 m cells with u = 10 m/s
pub fn rectangular_scenario(nx: usize, dt: f64, time_points: usize) -> Scenario {
    let params = ProfileParameters::new(10.0, 500.0, nx).unwrap();
    Scenario::new(params, InitialProfile::Rectangular, dt, time_points).unwrap()
}

/// `Nx = 101, dx = 500, u = 10, dt = 60, nr = 10`: Courant number 1.2
pub fn reference_scenario(time_points: usize) -> Scenario {
    gaussian_scenario(101, 10.0, 60.0, time_points)
}

/// Numerical and analytical results of the same scenario
pub fn solve_both(scenario: &Scenario) -> (SimulationResult, SimulationResult) {
    let numerical = UpwindSolver::new().solve(scenario).unwrap();
    let analytical = AnalyticalSolver::new().solve(scenario).unwrap();
    (numerical, analytical)
}

/// `|a - b| / |b|`, or `|a - b|` when `b` is zero
pub fn relative_error(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        (a - b).abs()
    } else {
        ((a - b) / b).abs()
    }
}

//! Exact periodic solution evaluated on the grid
//!
//! Linear advection only translates the initial field, so the snapshot at any
//! time `t` is the initial profile evaluated at `x - u·t` (folded into the
//! periodic domain). Each time point is independent of the others: with the
//! `parallel` feature and enough grid values to fill
//! ([`parallel_threshold()`](crate::solver::parallel_threshold)), time points
//! are evaluated concurrently with rayon.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::Result;
use crate::physics::FieldSnapshot;
use crate::solver::{ResultKind, Scenario, SimulationResult, Solver};

/// Evaluates the exact solution at every time point of a scenario
///
/// The result carries the label "Euler Backward" by default so that it pairs
/// with the numerical run it is compared to. Use [`AnalyticalSolver::labelled`]
/// to tag it otherwise.
///
/// # Example
///
/// ```rust
/// use advect_rs::models::{InitialProfile, ProfileParameters};
/// use advect_rs::solver::{AnalyticalSolver, ResultKind, Scenario, Solver};
///
/// let params = ProfileParameters::new(10.0, 500.0, 101).unwrap();
/// let scenario = Scenario::new(params, InitialProfile::Rectangular, 50.0, 3).unwrap();
///
/// let result = AnalyticalSolver::new().solve(&scenario).unwrap();
/// assert_eq!(result.kind, ResultKind::Analytical);
/// // u·dt = dx: the band moved one cell per time point
/// assert_eq!(result.snapshots[2][54], 10.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AnalyticalSolver {
    label: &'static str,
}

impl AnalyticalSolver {
    /// Analytical solver paired with the upwind scheme
    pub fn new() -> Self {
        Self {
            label: super::upwind::UPWIND_LABEL,
        }
    }

    /// Analytical solver paired with another method label
    pub fn labelled(label: &'static str) -> Self {
        Self { label }
    }
}

impl Default for AnalyticalSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver for AnalyticalSolver {
    fn solve(&self, scenario: &Scenario) -> Result<SimulationResult> {
        let times = scenario.times().points();
        log::info!("Analytical solution: {}", scenario);

        let snapshots = evaluate_all(scenario, &times)?;

        let mut result = SimulationResult::new(scenario, self.label, self.kind(), snapshots)?;
        result.add_metadata("solver", "Analytical");
        Ok(result)
    }

    fn name(&self) -> &'static str {
        self.label
    }

    fn kind(&self) -> ResultKind {
        ResultKind::Analytical
    }
}

fn evaluate_all(scenario: &Scenario, times: &[f64]) -> Result<Vec<FieldSnapshot>> {
    let work = times.len() * scenario.grid().points();

    if work > crate::solver::parallel_threshold() {
        #[cfg(feature = "parallel")]
        return times
            .par_iter()
            .map(|&t| scenario.exact_snapshot(t))
            .collect();
    }

    times.iter().map(|&t| scenario.exact_snapshot(t)).collect()
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InitialProfile, ProfileParameters};
    use crate::solver::ThresholdGuard;
    use approx::assert_relative_eq;

    fn gaussian_scenario(time_points: usize) -> Scenario {
        let params = ProfileParameters::new(10.0, 500.0, 101).unwrap();
        Scenario::new(params, InitialProfile::gaussian(10.0).unwrap(), 60.0, time_points).unwrap()
    }

    #[test]
    fn test_initial_snapshot_matches_profile() {
        let scenario = gaussian_scenario(5);
        let result = AnalyticalSolver::new().solve(&scenario).unwrap();
        assert_eq!(result.snapshots[0], scenario.initial_snapshot().unwrap());
    }

    #[test]
    fn test_mass_is_invariant_over_time() {
        let scenario = gaussian_scenario(20);
        let result = AnalyticalSolver::new().solve(&scenario).unwrap();
        let initial = result.snapshots[0].total();
        for snapshot in &result.snapshots {
            assert_relative_eq!(snapshot.total(), initial, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_full_period_returns_to_start() {
        // period 50 000 m at 10 m/s is 5000 s = 100 steps of 50 s
        let params = ProfileParameters::new(10.0, 500.0, 101).unwrap();
        let scenario =
            Scenario::new(params, InitialProfile::gaussian(4.0).unwrap(), 50.0, 101).unwrap();
        let result = AnalyticalSolver::new().solve(&scenario).unwrap();

        let error = result.snapshots[0]
            .max_abs_difference(&result.snapshots[100])
            .unwrap();
        assert!(error < 1e-9);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let scenario = gaussian_scenario(30);
        let sequential = {
            let _guard = ThresholdGuard::save(usize::MAX);
            AnalyticalSolver::new().solve(&scenario).unwrap()
        };
        let parallel = {
            let _guard = ThresholdGuard::save(1);
            AnalyticalSolver::new().solve(&scenario).unwrap()
        };
        assert_eq!(sequential.snapshots, parallel.snapshots);
    }

    #[test]
    fn test_labels() {
        assert_eq!(AnalyticalSolver::new().name(), "Euler Backward");
        assert_eq!(AnalyticalSolver::labelled("Lax").name(), "Lax");
        assert_eq!(AnalyticalSolver::default().kind(), ResultKind::Analytical);
    }
}

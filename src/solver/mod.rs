//! Simulation drivers
//!
//! This module turns a scenario into a sequence of snapshots, either by
//! integrating the upwind scheme or by evaluating the exact solution.
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! 1. **Scenario** (`Scenario`) - WHAT to solve
//!    - Profile and its parameters
//!    - Grid and time sequence
//!    - Courant number, derived once
//!
//! 2. **Solver** (`Solver` trait) - HOW to solve
//!    - `UpwindSolver`: explicit stencil, sequential in time
//!    - `AnalyticalSolver`: exact translation, independent time points
//!
//! 3. **Result** (`SimulationResult`) - the solution
//!    - One snapshot per time point, tagged with parameters and method
//!
//! Both solvers accept the same scenario, so a numerical run and its
//! analytical reference always share the same grid and time points.
//!
//! # Module Organization
//!
//! - **`traits`**: `Solver`, `SimulationResult`, `ResultKind`
//! - **`scenario`**: `Scenario`, validated at construction
//! - **`methods`**: `UpwindSolver`, `AnalyticalSolver`, `upwind_step`
//!
//! # Workflow Diagram
//!
//! ```text
//! ┌────────────────────┐   ┌─────────────────┐
//! │ Profile Parameters │   │ Initial Profile │
//! └─────────┬──────────┘   └────────┬────────┘
//!           └───────────┬───────────┘
//!                ┌──────▼──────┐
//!                │  Scenario   │ ← WHAT to solve (+ dt, time points)
//!                └──────┬──────┘
//!           ┌───────────┴───────────┐
//!  ┌────────▼────────┐     ┌────────▼─────────┐
//!  │  UpwindSolver   │     │ AnalyticalSolver │ ← HOW
//!  └────────┬────────┘     └────────┬─────────┘
//!           └───────────┬───────────┘
//!                ┌──────▼──────┐
//!                │   compare   │ ← RMS per time point
//!                └─────────────┘
//! ```
//!
//! # Error Handling
//!
//! Every driver returns `Result<SimulationResult, AdvectionError>`. Common errors:
//! - Invalid parameter (non-positive width, spacing or time step)
//! - Numerical instability (NaN or infinity after a step)

// =================================================================================================
// Module Declarations
// =================================================================================================
mod methods;
mod scenario;
mod traits;

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================
//
// Stored in an AtomicUsize so benchmarks and tests can change it at runtime.
// Relaxed ordering is enough: the value is a performance hint, not a
// synchronisation point.
// =================================================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of elements above which work is handed to rayon
const DEFAULT_PARALLEL_THRESHOLD: usize = 999;

/// Runtime-configurable parallel-execution threshold.
static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Return the current parallel-execution threshold.
///
/// The analytical solver stays sequential below this number of values
/// (grid points times time points). Above it the time points are spread over
/// rayon, but only when the crate is compiled with the `parallel` feature.
///
/// # Example
///
/// ```rust
/// use advect_rs::solver::parallel_threshold;
///
/// assert!(parallel_threshold() > 0);
/// ```
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Set the parallel-execution threshold to a new value.
///
/// # Panics
///
/// Panics when `threshold == 0`.
///
/// # Example
///
/// ```rust
/// use advect_rs::solver::{parallel_threshold, set_parallel_threshold};
///
/// let previous = parallel_threshold();
/// set_parallel_threshold(2048);
/// assert_eq!(parallel_threshold(), 2048);
///
/// set_parallel_threshold(previous);
/// ```
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

/// Saves the current threshold on construction and restores it on drop.
///
/// Only compiled in test builds.
#[cfg(test)]
pub(crate) struct ThresholdGuard {
    previous: usize,
}

#[cfg(test)]
impl ThresholdGuard {
    pub(crate) fn save(new_value: usize) -> Self {
        let previous = parallel_threshold();
        set_parallel_threshold(new_value);
        Self { previous }
    }
}

#[cfg(test)]
impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        PARALLEL_THRESHOLD.store(self.previous, Ordering::Relaxed);
    }
}

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use methods::{courant_number, upwind_step, AnalyticalSolver, UpwindSolver, UPWIND_LABEL};
pub use scenario::Scenario;
pub use traits::{ResultKind, SimulationResult, Solver};

// =================================================================================================
// Helper Functions
// =================================================================================================

use crate::error::{AdvectionError, Result};
use crate::physics::FieldSnapshot;

/// Fail with `NumericalInstability` when `snapshot` holds NaN or infinity
///
/// ```rust,ignore
/// validate_snapshot(&next, 42)?;
/// ```
pub(crate) fn validate_snapshot(snapshot: &FieldSnapshot, step: usize) -> Result<()> {
    if snapshot.is_finite() {
        Ok(())
    } else {
        log::error!("Non-finite concentration after step {step}");
        Err(AdvectionError::NumericalInstability { step })
    }
}

/// Root-mean-square difference between two results, one value per time point
///
/// # Errors
///
/// `ShapeMismatch` when the results do not have the same number of time
/// points or the same grid size.
///
/// # Example
///
/// ```rust
/// use advect_rs::models::{InitialProfile, ProfileParameters};
/// use advect_rs::solver::{compare, AnalyticalSolver, Scenario, Solver};
///
/// let params = ProfileParameters::new(10.0, 500.0, 101).unwrap();
/// let scenario = Scenario::new(params, InitialProfile::Rectangular, 40.0, 3).unwrap();
/// let exact = AnalyticalSolver::new().solve(&scenario).unwrap();
///
/// assert_eq!(compare(&exact, &exact).unwrap(), vec![0.0, 0.0, 0.0]);
/// ```
pub fn compare(numerical: &SimulationResult, analytical: &SimulationResult) -> Result<Vec<f64>> {
    if numerical.len() != analytical.len() {
        return Err(AdvectionError::ShapeMismatch {
            expected: numerical.len(),
            found: analytical.len(),
        });
    }

    numerical
        .snapshots
        .iter()
        .zip(&analytical.snapshots)
        .map(|(a, b)| a.rms_difference(b))
        .collect()
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InitialProfile, ProfileParameters};

    #[test]
    fn test_default_threshold_value() {
        assert_eq!(DEFAULT_PARALLEL_THRESHOLD, 999);
    }

    #[test]
    fn test_get_and_set_threshold() {
        let _guard = ThresholdGuard::save(500);
        assert_eq!(parallel_threshold(), 500);
    }

    #[test]
    #[should_panic(expected = "parallel threshold must be at least 1")]
    fn test_zero_threshold_panics() {
        set_parallel_threshold(0);
    }

    #[test]
    fn test_threshold_guard_restores_previous_value() {
        let before = parallel_threshold();
        {
            let _guard = ThresholdGuard::save(42);
            assert_eq!(parallel_threshold(), 42);
        }
        assert_eq!(parallel_threshold(), before);
    }

    #[test]
    fn test_validate_snapshot() {
        assert!(validate_snapshot(&FieldSnapshot::zeros(3), 1).is_ok());
        assert_eq!(
            validate_snapshot(&FieldSnapshot::from_vec(vec![0.0, f64::NAN]), 7),
            Err(AdvectionError::NumericalInstability { step: 7 })
        );
    }

    #[test]
    fn test_compare_misaligned_results() {
        let params = ProfileParameters::new(10.0, 500.0, 101).unwrap();
        let short = Scenario::new(params, InitialProfile::Rectangular, 40.0, 3).unwrap();
        let long = Scenario::new(params, InitialProfile::Rectangular, 40.0, 4).unwrap();

        let a = AnalyticalSolver::new().solve(&short).unwrap();
        let b = AnalyticalSolver::new().solve(&long).unwrap();
        assert_eq!(
            compare(&a, &b),
            Err(AdvectionError::ShapeMismatch { expected: 3, found: 4 })
        );
    }

    #[test]
    fn test_compare_numerical_error_grows() {
        let params = ProfileParameters::new(10.0, 500.0, 101).unwrap();
        let profile = InitialProfile::gaussian(10.0).unwrap();
        let scenario = Scenario::new(params, profile, 60.0, 11).unwrap();

        let numerical = UpwindSolver::new().solve(&scenario).unwrap();
        let analytical = AnalyticalSolver::new().solve(&scenario).unwrap();
        let rms = compare(&numerical, &analytical).unwrap();

        assert_eq!(rms.len(), 11);
        assert_eq!(rms[0], 0.0);
        for (k, value) in rms.iter().enumerate().skip(1) {
            assert!(*value < 0.01 * k as f64, "step {k}: rms {value}");
        }
        assert!(rms[5] > rms[1]);
    }
}

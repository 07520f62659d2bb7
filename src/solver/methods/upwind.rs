//! First-order upwind ("Euler backward") advection scheme
//!
//! # Mathematical Background
//!
//! Linear advection at constant velocity `u`:
//!
//! ```text
//! ∂C/∂t + u ∂C/∂x = 0
//! ```
//!
//! Forward in time, backward (upstream) in space:
//!
//! ```text
//! C[j]ⁿ⁺¹ = C[j]ⁿ - C · (C[j]ⁿ - C[j-1]ⁿ),    C = u·dt/dx
//! ```
//!
//! with the periodic wrap `C[-1] = C[Nx-1]`.
//!
//! # Characteristics
//!
//! - **Order**: first order in time and space
//! - **Stability**: conditionally stable for `0 <= C <= 1`
//! - **Conservation**: the sum over the grid is preserved exactly under
//!   periodic boundaries, whatever the Courant number
//! - **Numerical diffusion**: the pulse spreads and its peak decays
//!
//! # Example
//!
//! ```rust
//! use advect_rs::models::{InitialProfile, ProfileParameters};
//! use advect_rs::solver::{Scenario, Solver, UpwindSolver};
//!
//! let params = ProfileParameters::new(10.0, 500.0, 101).unwrap();
//! let profile = InitialProfile::gaussian(10.0).unwrap();
//! let scenario = Scenario::new(params, profile, 40.0, 10).unwrap();
//!
//! let result = UpwindSolver::new().solve(&scenario).unwrap();
//! let initial = result.snapshot(0).unwrap().total();
//! let last = result.final_snapshot().unwrap().total();
//! assert!((initial - last).abs() < 1e-9 * initial);
//! ```

use crate::error::{AdvectionError, Result};
use crate::physics::{CourantNumber, FieldSnapshot};
use crate::solver;
use crate::solver::{ResultKind, Scenario, SimulationResult, Solver};

/// Method label of the upwind scheme
pub const UPWIND_LABEL: &str = "Euler Backward";

// =================================================================================================
// Stepper
// =================================================================================================

/// Advance `current` by one time step
///
/// Every output value is computed from the read-only input; the result is a
/// freshly allocated snapshot.
///
/// # Errors
///
/// `ShapeMismatch` when `current` does not hold `nx` values.
///
/// # Example
///
/// ```rust
/// use advect_rs::physics::FieldSnapshot;
/// use advect_rs::solver::upwind_step;
///
/// // C = 1: every value moves one cell to the right
/// let current = FieldSnapshot::from_vec(vec![0.0, 1.0, 0.0, 0.0]);
/// let next = upwind_step(&current, 10.0, 50.0, 500.0, 4).unwrap();
/// assert_eq!(next.to_vec(), vec![0.0, 0.0, 1.0, 0.0]);
/// ```
pub fn upwind_step(
    current: &FieldSnapshot,
    velocity: f64,
    dt: f64,
    dx: f64,
    nx: usize,
) -> Result<FieldSnapshot> {
    if !dx.is_finite() || dx <= 0.0 {
        return Err(AdvectionError::invalid(
            "dx",
            dx,
            "grid spacing must be positive and finite",
        ));
    }
    current.ensure_len(nx)?;
    Ok(advance(current, courant_number(velocity, dt, dx)))
}

/// Courant number [`upwind_step`] applies for the same inputs
///
/// ```rust
/// use advect_rs::solver::courant_number;
///
/// let courant = courant_number(10.0, 60.0, 500.0);
/// assert!(!courant.is_stable());
/// ```
pub fn courant_number(velocity: f64, dt: f64, dx: f64) -> CourantNumber {
    CourantNumber::new(velocity, dt, dx)
}

/// Stencil core, the length is already checked
fn advance(current: &FieldSnapshot, courant: CourantNumber) -> FieldSnapshot {
    let c = courant.value();
    let values = current.as_slice();
    let nx = values.len();

    let next = (0..nx)
        .map(|j| {
            let upstream = values[(j + nx - 1) % nx];
            values[j] - c * (values[j] - upstream)
        })
        .collect();

    FieldSnapshot::from_vec(next)
}

// =================================================================================================
// Upwind Solver
// =================================================================================================

/// Time-stepping driver of the upwind scheme
///
/// # Algorithm
///
/// 1. Seed snapshot 0 with the initial profile at `t = 0` (copied as is)
/// 2. For each following time point, apply [`upwind_step`] to the previous snapshot
/// 3. Check every new snapshot for NaN or infinity
///
/// A Courant number above 1 is logged as a warning and the run proceeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpwindSolver;

impl UpwindSolver {
    /// Create a new upwind solver
    ///
    /// # Example
    ///
    /// ```rust
    /// use advect_rs::solver::{Solver, UpwindSolver};
    ///
    /// let solver = UpwindSolver::new();
    /// assert_eq!(solver.name(), "Euler Backward");
    /// ```
    pub fn new() -> Self {
        Self
    }
}

impl Solver for UpwindSolver {
    fn solve(&self, scenario: &Scenario) -> Result<SimulationResult> {
        // ====== Setup ======

        let courant = scenario.courant();
        if !courant.is_stable() {
            log::warn!(
                "Courant number {} is outside [0, 1]: the upwind scheme is not stable",
                courant
            );
        }

        let time_points = scenario.times().len();
        log::info!("{}: {} ({} steps)", self.name(), scenario, time_points - 1);

        let mut snapshots = Vec::with_capacity(time_points);
        snapshots.push(scenario.initial_snapshot()?);

        // ====== Time Integration ======

        for step in 1..time_points {
            let next = advance(&snapshots[step - 1], courant);
            solver::validate_snapshot(&next, step)?;
            log::debug!("step {step}/{}: {next}", time_points - 1);
            snapshots.push(next);
        }

        // ====== Build Result ======

        let mut result = SimulationResult::new(scenario, self.name(), self.kind(), snapshots)?;
        result.add_metadata("solver", self.name());
        result.add_metadata("time steps", &(time_points - 1).to_string());
        result.add_metadata("stable", &courant.is_stable().to_string());

        log::info!(
            "{}: done, final {}",
            self.name(),
            result
                .final_snapshot()
                .map(ToString::to_string)
                .unwrap_or_default()
        );
        Ok(result)
    }

    fn name(&self) -> &'static str {
        UPWIND_LABEL
    }

    fn kind(&self) -> ResultKind {
        ResultKind::Numerical
    }
}

// =================================================================================================
// Tests
// =================================================================================================

//! Simulation scenario definition
//!
//! A scenario combines the profile, its parameters and the time sequence.
use std::fmt;

use crate::error::Result;
use crate::models::{InitialProfile, ProfileParameters};
use crate::physics::{CourantNumber, FieldSnapshot, Grid, TimeSequence};

/// Simulation scenario
///
/// Defines a specific case to simulate:
/// - Profile parameters (velocity, grid)
/// - Initial profile
/// - Time sequence
///
/// # Design
///
/// The same scenario can be solved numerically and analytically.
/// This is the "WHAT to solve" (not "HOW to solve").
///
/// Everything is validated in [`Scenario::new`]: a bad parameter aborts before
/// any snapshot is produced. The Courant number is derived there once.
///
/// # Examples
///
/// ```rust
/// use advect_rs::models::{InitialProfile, ProfileParameters};
/// use advect_rs::solver::Scenario;
///
/// let params = ProfileParameters::new(10.0, 500.0, 101).unwrap();
/// let profile = InitialProfile::gaussian(10.0).unwrap();
/// let scenario = Scenario::new(params, profile, 60.0, 10).unwrap();
///
/// assert!((scenario.courant().value() - 1.2).abs() < 1e-12);
/// assert_eq!(scenario.times().len(), 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    grid: Grid,
    times: TimeSequence,
    parameters: ProfileParameters,
    profile: InitialProfile,
    courant: CourantNumber,
}

impl Scenario {
    /// Create a scenario with `time_points` snapshots spaced by `dt`
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for any invalid parameter, width, time step or
    /// an empty time sequence.
    pub fn new(
        parameters: ProfileParameters,
        profile: InitialProfile,
        dt: f64,
        time_points: usize,
    ) -> Result<Self> {
        parameters.validate()?;
        profile.validate()?;
        let grid = parameters.grid()?;
        let times = TimeSequence::new(dt, time_points)?;
        let courant = CourantNumber::new(parameters.velocity(), dt, parameters.dx());

        Ok(Self {
            grid,
            times,
            parameters,
            profile,
            courant,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn times(&self) -> &TimeSequence {
        &self.times
    }

    pub fn parameters(&self) -> &ProfileParameters {
        &self.parameters
    }

    pub fn profile(&self) -> &InitialProfile {
        &self.profile
    }

    /// `u * dt / dx`
    pub fn courant(&self) -> CourantNumber {
        self.courant
    }

    /// Exact field at time `t`
    pub fn exact_snapshot(&self, t: f64) -> Result<FieldSnapshot> {
        self.profile.evaluate_grid(&self.grid, t, &self.parameters)
    }

    /// Field at `t = 0`
    pub fn initial_snapshot(&self) -> Result<FieldSnapshot> {
        self.exact_snapshot(0.0)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} profile, Nx={}, dx={}, u={}, dt={}, {} time points, CFL={}",
            self.profile,
            self.grid.points(),
            self.grid.spacing(),
            self.parameters.velocity(),
            self.times.dt(),
            self.times.len(),
            self.courant
        )
    }
}

// ================================================================================================
// Tests
// ================================================================================================

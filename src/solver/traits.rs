//! Solver trait and simulation result
//!
//! # Stability Guarantee
//!
//! - `Solver` trait: every driver (numerical or analytical) goes through it
//! - `SimulationResult`: the unit handed to export and visualization; fields
//!   are only ever added

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AdvectionError, Result};
use crate::models::{InitialProfile, ProfileParameters};
use crate::physics::{CourantNumber, FieldSnapshot, Grid};
use crate::solver::Scenario;

// =================================================================================================
// Solver trait
// =================================================================================================

/// A way of producing the snapshots of a scenario
///
/// # Example
///
/// ```rust
/// use advect_rs::models::{InitialProfile, ProfileParameters};
/// use advect_rs::solver::{AnalyticalSolver, Scenario, Solver, UpwindSolver};
///
/// let params = ProfileParameters::new(10.0, 500.0, 101).unwrap();
/// let profile = InitialProfile::gaussian(10.0).unwrap();
/// let scenario = Scenario::new(params, profile, 40.0, 10).unwrap();
///
/// let solvers: Vec<Box<dyn Solver>> = vec![
///     Box::new(UpwindSolver::new()),
///     Box::new(AnalyticalSolver::new()),
/// ];
/// for solver in &solvers {
///     let result = solver.solve(&scenario).unwrap();
///     assert_eq!(result.len(), 10);
/// }
/// ```
pub trait Solver {
    /// Produce one snapshot per time point of the scenario
    ///
    /// # Errors
    ///
    /// Any [`AdvectionError`] raised while seeding or advancing the field.
    fn solve(&self, scenario: &Scenario) -> Result<SimulationResult>;

    /// Method label, used in metadata and file names
    fn name(&self) -> &'static str;

    /// Whether the solver integrates numerically or evaluates the exact solution
    fn kind(&self) -> ResultKind;
}

// =================================================================================================
// Result kind
// =================================================================================================

/// Origin of the snapshots in a [`SimulationResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    /// Produced by a time-stepping scheme
    Numerical,
    /// Exact solution evaluated at every time point
    Analytical,
}

impl ResultKind {
    /// Lowercase tag used in file names and attributes
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Numerical => "numerical",
            Self::Analytical => "analytical",
        }
    }

    /// Parse the tag written by [`ResultKind::tag`]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "numerical" => Some(Self::Numerical),
            "analytical" => Some(Self::Analytical),
            _ => None,
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// =================================================================================================
// Simulation result
// =================================================================================================

/// Ordered snapshots of one run, tagged with everything needed to reproduce it
///
/// Built through [`SimulationResult::new`], which checks that there is one
/// snapshot per time point and that every snapshot covers the whole grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Time of each snapshot
    pub time_points: Vec<f64>,
    /// Concentration field at each time point
    pub snapshots: Vec<FieldSnapshot>,
    /// Spatial grid
    pub grid: Grid,
    /// Time step
    pub dt: f64,
    /// Parameters the profile was evaluated with
    pub parameters: ProfileParameters,
    /// Initial profile
    pub profile: InitialProfile,
    /// `u * dt / dx` of the run
    pub courant: CourantNumber,
    /// Method label (e.g. "Euler Backward")
    pub method: String,
    /// Numerical or analytical
    pub kind: ResultKind,
    /// Free-form diagnostics
    pub metadata: BTreeMap<String, String>,
}

impl SimulationResult {
    /// Bundle the snapshots of `scenario` produced by `method`
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` when the number of snapshots differs from the number of
    /// time points, or when a snapshot does not cover the grid.
    pub fn new(
        scenario: &Scenario,
        method: impl Into<String>,
        kind: ResultKind,
        snapshots: Vec<FieldSnapshot>,
    ) -> Result<Self> {
        let times = scenario.times();
        if snapshots.len() != times.len() {
            return Err(AdvectionError::ShapeMismatch {
                expected: times.len(),
                found: snapshots.len(),
            });
        }
        for snapshot in &snapshots {
            snapshot.ensure_len(scenario.grid().points())?;
        }

        Ok(Self {
            time_points: times.points(),
            snapshots,
            grid: *scenario.grid(),
            dt: times.dt(),
            parameters: *scenario.parameters(),
            profile: *scenario.profile(),
            courant: scenario.courant(),
            method: method.into(),
            kind,
            metadata: BTreeMap::new(),
        })
    }

    /// Number of time points
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshot at time index `k`
    pub fn snapshot(&self, k: usize) -> Option<&FieldSnapshot> {
        self.snapshots.get(k)
    }

    /// Last snapshot
    pub fn final_snapshot(&self) -> Option<&FieldSnapshot> {
        self.snapshots.last()
    }

    /// Attach a diagnostic entry
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// One-line description of the run, stored with exported datasets
    pub fn summary(&self) -> String {
        let width = match self.profile.width() {
            Some(width) => format!(", nr={width}"),
            None => String::new(),
        };
        format!(
            "{} ({}): u={}, dx={}, dt={}, Nx={}, profile={}{}, CFL={}",
            self.method,
            self.kind,
            self.parameters.velocity(),
            self.grid.spacing(),
            self.dt,
            self.grid.points(),
            self.profile.kind(),
            width,
            self.courant
        )
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Scenario {
        let params = ProfileParameters::new(10.0, 500.0, 11).unwrap();
        Scenario::new(params, InitialProfile::Rectangular, 40.0, 3).unwrap()
    }

    #[test]
    fn test_result_requires_one_snapshot_per_time_point() {
        let error = SimulationResult::new(
            &scenario(),
            "Euler Backward",
            ResultKind::Numerical,
            vec![FieldSnapshot::zeros(11); 2],
        )
        .unwrap_err();
        assert_eq!(error, AdvectionError::ShapeMismatch { expected: 3, found: 2 });
    }

    #[test]
    fn test_result_requires_full_grid_snapshots() {
        let error = SimulationResult::new(
            &scenario(),
            "Euler Backward",
            ResultKind::Numerical,
            vec![FieldSnapshot::zeros(10); 3],
        )
        .unwrap_err();
        assert_eq!(error, AdvectionError::ShapeMismatch { expected: 11, found: 10 });
    }

    #[test]
    fn test_result_metadata_and_summary() {
        let mut result = SimulationResult::new(
            &scenario(),
            "Euler Backward",
            ResultKind::Analytical,
            vec![FieldSnapshot::zeros(11); 3],
        )
        .unwrap();
        result.add_metadata("note", "smoke");

        assert_eq!(result.get_metadata("note"), Some("smoke"));
        assert_eq!(result.time_points, vec![0.0, 40.0, 80.0]);
        assert_eq!(
            result.summary(),
            "Euler Backward (analytical): u=10, dx=500, dt=40, Nx=11, profile=rectg, CFL=0.80"
        );
    }

    #[test]
    fn test_result_kind_tags() {
        assert_eq!(ResultKind::from_tag("numerical"), Some(ResultKind::Numerical));
        let analytical = ResultKind::Analytical;
        assert_eq!(ResultKind::from_tag(analytical.tag()), Some(analytical));
        assert_eq!(ResultKind::from_tag("other"), None);
    }
}

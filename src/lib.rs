//! advect-rs: 1D Periodic Linear Advection
//!
//! Solves `∂C/∂t + u ∂C/∂x = 0` on a periodic grid with a first-order upwind
//! scheme and compares it against the exact solution, which is the initial
//! profile shifted by `u·t`.
//!
//! # Architecture
//!
//! advect-rs is built on two core principles:
//!
//! 1. **Separation of Physics and Numerics**
//!    - Models define the initial profile and its exact translation (what to solve)
//!    - Solvers produce snapshot sequences from a scenario (how to solve)
//!
//! 2. **A pure core with narrow collaborators**
//!    - The core returns values and errors, never writes files
//!    - Export, plotting, animation and naming live in [`output`]
//!
//! # Quick Start
//!
//! ```rust
//! use advect_rs::prelude::*;
//!
//! # fn main() -> Result<(), AdvectionError> {
//! // 1. Grid of 101 cells of 500 m, velocity 10 m/s
//! let params = ProfileParameters::new(10.0, 500.0, 101)?;
//! let profile = InitialProfile::gaussian(10.0)?;
//!
//! // 2. 10 time points, dt = 60 s (Courant number 1.2)
//! let scenario = Scenario::new(params, profile, 60.0, 10)?;
//!
//! // 3. Run both solvers
//! let numerical = UpwindSolver::new().solve(&scenario)?;
//! let analytical = AnalyticalSolver::new().solve(&scenario)?;
//!
//! // 4. Compare
//! let rms = compare(&numerical, &analytical)?;
//! assert_eq!(rms[0], 0.0);
//! assert!(rms[9] > rms[1]);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`physics`]: Grid, time sequence, snapshots and Courant number
//! - [`models`]: Initial profiles and their exact translation
//! - [`solver`]: Upwind and analytical solvers, scenario and result
//! - [`output`]: Dataset/CSV export, plots, GIF animation, file naming
//! - [`config`]: Run configuration loaded from JSON
//!
//! # Features
//!
//! - `parallel`: evaluates the analytical solution with rayon on large runs
//! - `netcdf`: NetCDF dataset export and reload (needs the system netCDF library)

// Core modules
pub mod error;
pub mod physics;

pub mod models;
pub mod solver;

// Collaborators
pub mod config;
pub mod output;

pub use error::{AdvectionError, Result};

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use advect_rs::prelude::*;
    //! ```
    pub use crate::error::AdvectionError;
    pub use crate::models::{InitialProfile, ProfileKind, ProfileParameters};
    pub use crate::physics::{CourantNumber, FieldSnapshot, Grid, TimeSequence};
    pub use crate::solver::{
        compare, AnalyticalSolver, ResultKind, Scenario, SimulationResult, Solver, UpwindSolver,
    };
}

//! Concrete drivers implementing the [`Solver`](crate::solver::Solver) trait
//!
//! # Available Methods
//!
//! - **[`UpwindSolver`]**: first-order upwind ("Euler Backward") explicit scheme
//!   - Order: first order in time and space
//!   - Cost: one stencil sweep per step, `O(Nx)`
//!   - Sequential in time: step `n + 1` needs step `n`
//!
//! - **[`AnalyticalSolver`]**: exact periodic translation of the initial profile
//!   - No accumulated state: every time point is evaluated on its own
//!   - Parallel across time points with the `parallel` feature
//!
//! # Example
//!
//! ```rust
//! use advect_rs::models::{InitialProfile, ProfileParameters};
//! use advect_rs::solver::{compare, AnalyticalSolver, Scenario, Solver, UpwindSolver};
//!
//! let params = ProfileParameters::new(10.0, 500.0, 101).unwrap();
//! let profile = InitialProfile::gaussian(10.0).unwrap();
//! let scenario = Scenario::new(params, profile, 60.0, 6).unwrap();
//!
//! let numerical = UpwindSolver::new().solve(&scenario).unwrap();
//! let analytical = AnalyticalSolver::new().solve(&scenario).unwrap();
//!
//! let rms = compare(&numerical, &analytical).unwrap();
//! assert_eq!(rms[0], 0.0);
//! assert!(rms[5] > rms[1]);
//! ```

pub mod analytical;
pub mod upwind;

// Re-exports for convenience
pub use analytical::AnalyticalSolver;
pub use upwind::{courant_number, upwind_step, UpwindSolver, UPWIND_LABEL};

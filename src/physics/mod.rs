//! Physical setting of the problem
//!
//! This module holds the discrete space-time frame and the field carried on it:
//!
//! - **Grid**: `Nx` evenly spaced positions on a periodic domain
//! - **Time Sequence**: evenly spaced output times, index 0 being the initial condition
//! - **Field Snapshot**: the concentration over the grid at one time point
//! - **Courant Number**: `u * dt / dx`, the stability indicator of the explicit scheme
//!
//! # Architecture
//!
//! The physics layer only describes **where** and **when** values live. What the
//! initial field looks like is a model concern (`models`), how it evolves is a
//! solver concern (`solver`).
//!
//! # Example
//!
//! ```rust
//! use advect_rs::physics::{CourantNumber, FieldSnapshot, Grid, TimeSequence};
//!
//! let grid = Grid::new(101, 500.0).unwrap();
//! let times = TimeSequence::new(40.0, 10).unwrap();
//! let courant = CourantNumber::new(10.0, times.dt(), grid.spacing());
//!
//! assert!(courant.is_stable());
//!
//! let snapshot = FieldSnapshot::zeros(grid.points());
//! assert!(snapshot.ensure_len(grid.points()).is_ok());
//! ```

// module declaration
pub mod courant;
pub mod data;
pub mod grid;

// re-export commonly used types for convenience
pub use courant::{CourantNumber, STABILITY_LIMIT};
pub use data::FieldSnapshot;
pub use grid::{Grid, TimeSequence};

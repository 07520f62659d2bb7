//! Common utilities for integration tests

pub mod test_helpers;

// Re-export commonly used items
pub use test_helpers::{
    gaussian_scenario, rectangular_scenario, reference_scenario, relative_error, solve_both,
};

//! Courant number of the explicit upwind scheme
//!
//! `C = u * dt / dx` governs the stability of the stencil. The scheme is
//! stable for `0 <= C <= 1`; the number is reported, never enforced.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stability limit of the first-order upwind scheme
pub const STABILITY_LIMIT: f64 = 1.0;

/// Dimensionless ratio `u * dt / dx`
///
/// Derived once from its three inputs. Changing any input means building a
/// new value.
///
/// # Example
///
/// ```rust
/// use advect_rs::physics::CourantNumber;
///
/// let courant = CourantNumber::new(10.0, 60.0, 500.0);
/// assert!((courant.value() - 1.2).abs() < 1e-12);
/// assert!(!courant.is_stable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourantNumber(f64);

impl CourantNumber {
    /// Compute `C = u * dt / dx`
    pub fn new(velocity: f64, dt: f64, dx: f64) -> Self {
        Self(velocity * dt / dx)
    }

    /// Raw value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// True when `0 <= C <= 1`
    pub fn is_stable(&self) -> bool {
        (0.0..=STABILITY_LIMIT).contains(&self.0)
    }
}

impl fmt::Display for CourantNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_run_value() {
        let courant = CourantNumber::new(10.0, 40.0, 500.0);
        assert!((courant.value() - 0.8).abs() < 1e-12);
        assert!(courant.is_stable());
        assert_eq!(courant.to_string(), "0.80");
    }

    #[test]
    fn test_limit_is_inclusive() {
        assert!(CourantNumber::new(10.0, 50.0, 500.0).is_stable());
        assert!(!CourantNumber::new(-10.0, 50.0, 500.0).is_stable());
    }
}

//! Spatial grid and time sequence
//!
//! Both are immutable once constructed and validated at construction, so a
//! bad spacing or size is rejected before any snapshot exists.

use serde::{Deserialize, Serialize};

use crate::error::{AdvectionError, Result};

// =================================================================================================
// Spatial grid
// =================================================================================================

/// Evenly spaced 1D grid `x_j = j * dx`, `j = 0..Nx`
///
/// The domain is periodic with period `(Nx - 1) * dx`: the last grid position
/// is the periodic image of the first one.
///
/// # Example
///
/// ```rust
/// use advect_rs::physics::Grid;
///
/// let grid = Grid::new(101, 500.0).unwrap();
/// assert_eq!(grid.points(), 101);
/// assert_eq!(grid.period(), 50_000.0);
/// assert_eq!(grid.position(51), 25_500.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// Number of grid positions Nx
    points: usize,
    /// Cell width dx
    spacing: f64,
}

impl Grid {
    /// Create a grid of `points` positions spaced by `spacing`
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when `points < 2` or `spacing` is not a positive
    /// finite number.
    pub fn new(points: usize, spacing: f64) -> Result<Self> {
        if points < 2 {
            return Err(AdvectionError::invalid(
                "Nx",
                points as f64,
                "a periodic grid needs at least 2 points",
            ));
        }
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(AdvectionError::invalid(
                "dx",
                spacing,
                "grid spacing must be positive and finite",
            ));
        }

        Ok(Self { points, spacing })
    }

    /// Number of grid positions Nx
    pub fn points(&self) -> usize {
        self.points
    }

    /// Cell width dx
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Length of the periodic domain `(Nx - 1) * dx`
    pub fn period(&self) -> f64 {
        (self.points - 1) as f64 * self.spacing
    }

    /// Position of grid index `j`
    pub fn position(&self, index: usize) -> f64 {
        index as f64 * self.spacing
    }

    /// All grid positions in index order
    pub fn positions(&self) -> Vec<f64> {
        (0..self.points).map(|j| self.position(j)).collect()
    }

    /// Grid index nearest to `x` once `x` is folded into `[0, period)`
    pub fn nearest_index(&self, x: f64) -> usize {
        let folded = x.rem_euclid(self.period());
        let index = (folded / self.spacing).round() as usize;
        index.min(self.points - 1)
    }
}

// =================================================================================================
// Time sequence
// =================================================================================================

/// Evenly spaced time points `t_k = k * dt`, `k = 0..n`
///
/// Index 0 is the initial condition. Times are computed from the index rather
/// than accumulated, so `time(k)` carries no rounding drift.
///
/// # Example
///
/// ```rust
/// use advect_rs::physics::TimeSequence;
///
/// let times = TimeSequence::new(60.0, 10).unwrap();
/// assert_eq!(times.len(), 10);
/// assert_eq!(times.time(0), 0.0);
/// assert_eq!(times.final_time(), 540.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSequence {
    /// Time step dt
    step: f64,
    /// Number of time points (initial condition included)
    len: usize,
}

impl TimeSequence {
    /// Create a sequence of `len` time points spaced by `dt`
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when `len == 0` or `dt` is not a positive finite number.
    pub fn new(dt: f64, len: usize) -> Result<Self> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(AdvectionError::invalid(
                "dt",
                dt,
                "time step must be positive and finite",
            ));
        }
        if len == 0 {
            return Err(AdvectionError::invalid(
                "time_points",
                0.0,
                "the time sequence must hold at least the initial condition",
            ));
        }

        Ok(Self { step: dt, len })
    }

    /// Time step dt
    pub fn dt(&self) -> f64 {
        self.step
    }

    /// Number of time points
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false for a validated sequence
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Time of point `k`
    pub fn time(&self, k: usize) -> f64 {
        k as f64 * self.step
    }

    /// Last time point
    pub fn final_time(&self) -> f64 {
        self.time(self.len - 1)
    }

    /// All time points in order
    pub fn points(&self) -> Vec<f64> {
        (0..self.len).map(|k| self.time(k)).collect()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_positions() {
        let grid = Grid::new(5, 2.0).unwrap();
        assert_eq!(grid.positions(), vec![0.0, 2.0, 4.0, 6.0, 8.0]);
        assert_eq!(grid.period(), 8.0);
    }

    #[test]
    fn test_grid_rejects_single_point() {
        let error = Grid::new(1, 500.0).unwrap_err();
        assert!(matches!(error, AdvectionError::InvalidParameter { name: "Nx", .. }));
    }

    #[test]
    fn test_grid_rejects_non_positive_spacing() {
        assert!(Grid::new(10, 0.0).is_err());
        assert!(Grid::new(10, -5.0).is_err());
        assert!(Grid::new(10, f64::NAN).is_err());
    }

    #[test]
    fn test_grid_nearest_index_is_periodic() {
        let grid = Grid::new(101, 500.0).unwrap();
        assert_eq!(grid.nearest_index(25_500.0), 51);
        assert_eq!(grid.nearest_index(25_500.0 + 3.0 * grid.period()), 51);
        assert_eq!(grid.nearest_index(25_500.0 - grid.period()), 51);
        assert_eq!(grid.nearest_index(25_700.0), 51);
    }

    #[test]
    fn test_time_sequence_points() {
        let times = TimeSequence::new(40.0, 4).unwrap();
        assert_eq!(times.points(), vec![0.0, 40.0, 80.0, 120.0]);
        assert_eq!(times.dt(), 40.0);
        assert!(!times.is_empty());
    }

    #[test]
    fn test_time_sequence_rejects_bad_input() {
        assert!(TimeSequence::new(0.0, 10).is_err());
        assert!(TimeSequence::new(-1.0, 10).is_err());
        assert!(TimeSequence::new(60.0, 0).is_err());
    }

    #[test]
    fn test_time_is_computed_from_index() {
        let times = TimeSequence::new(0.1, 1001);
        let times = times.unwrap();
        assert_eq!(times.final_time(), 1000.0 * 0.1);
    }
}

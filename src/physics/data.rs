//! Concentration field data
//!
//! A [`FieldSnapshot`] is the concentration over the whole grid at one time
//! point. Every snapshot is produced fresh: the stepper reads one snapshot and
//! allocates the next, it never writes into its input.

use nalgebra::DVector;
use ndarray::Array2;
use std::fmt;
use std::ops::Index;

use crate::error::{AdvectionError, Result};

/// Concentration values over the grid at one time point
///
/// Backed by a dense `DVector<f64>` of length `Nx`.
///
/// # Example
///
/// ```rust
/// use advect_rs::physics::FieldSnapshot;
///
/// let snapshot = FieldSnapshot::from_vec(vec![0.0, 4.0, 10.0, 4.0]);
/// assert_eq!(snapshot.len(), 4);
/// assert_eq!(snapshot.peak(), Some((2, 10.0)));
/// assert_eq!(snapshot.total(), 18.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSnapshot(DVector<f64>);

impl FieldSnapshot {
    // ======================================= constructors =======================================

    /// Create from a plain vector
    pub fn from_vec(values: Vec<f64>) -> Self {
        Self(DVector::from_vec(values))
    }

    /// Create from a DVector
    pub fn from_vector(values: DVector<f64>) -> Self {
        Self(values)
    }

    /// Snapshot of `size` zeros
    pub fn zeros(size: usize) -> Self {
        Self(DVector::zeros(size))
    }

    /// Uniform snapshot
    pub fn uniform(size: usize, value: f64) -> Self {
        Self(DVector::from_element(size, value))
    }

    // ========================================== Queries ==========================================

    /// Number of grid values
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying vector
    pub fn values(&self) -> &DVector<f64> {
        &self.0
    }

    pub fn as_slice(&self) -> &[f64] {
        self.0.as_slice()
    }

    pub fn into_vector(self) -> DVector<f64> {
        self.0
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.iter().copied().collect()
    }

    /// Sum of all values
    ///
    /// On a periodic grid the upwind stencil conserves this quantity exactly
    /// (up to rounding).
    pub fn total(&self) -> f64 {
        self.0.sum()
    }

    /// Index and value of the maximum, first occurrence on ties
    ///
    /// `None` for an empty snapshot.
    pub fn peak(&self) -> Option<(usize, f64)> {
        self.0
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (index, value)| match best {
                Some((_, best_value)) if best_value >= value => best,
                _ => Some((index, value)),
            })
    }

    /// True when no value is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|x| x.is_finite())
    }

    /// Fail with `ShapeMismatch` unless the snapshot holds `expected` values
    pub fn ensure_len(&self, expected: usize) -> Result<()> {
        if self.len() == expected {
            Ok(())
        } else {
            Err(AdvectionError::ShapeMismatch {
                expected,
                found: self.len(),
            })
        }
    }

    /// Root-mean-square difference with another snapshot of the same length
    pub fn rms_difference(&self, other: &FieldSnapshot) -> Result<f64> {
        other.ensure_len(self.len())?;
        if self.is_empty() {
            return Ok(0.0);
        }
        let squared: f64 = (&self.0 - &other.0).iter().map(|d| d * d).sum();
        Ok((squared / self.len() as f64).sqrt())
    }

    /// Largest absolute difference with another snapshot of the same length
    pub fn max_abs_difference(&self, other: &FieldSnapshot) -> Result<f64> {
        other.ensure_len(self.len())?;
        Ok((&self.0 - &other.0).amax())
    }

    /// Duplicate the field along a synthetic second axis of width 2
    ///
    /// Row 0 and row 1 are both the snapshot. This is the layout used by the
    /// surface plots and by the on-disk dataset.
    pub fn mirrored(&self) -> Array2<f64> {
        Array2::from_shape_fn((2, self.len()), |(_, j)| self.0[j])
    }
}

impl Index<usize> for FieldSnapshot {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<Vec<f64>> for FieldSnapshot {
    fn from(values: Vec<f64>) -> Self {
        Self::from_vec(values)
    }
}

impl From<DVector<f64>> for FieldSnapshot {
    fn from(values: DVector<f64>) -> Self {
        Self(values)
    }
}

impl fmt::Display for FieldSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peak() {
            Some((index, value)) => write!(
                f,
                "Snapshot [{}] (peak {:.4} at {})",
                self.len(),
                value,
                index
            ),
            None => write!(f, "Snapshot [0]"),
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform() {
        let snapshot = FieldSnapshot::uniform(100, 1.0);
        assert_eq!(snapshot.len(), 100);
        assert_eq!(snapshot.total(), 100.0);
        assert!(snapshot.is_finite());
    }

    #[test]
    fn test_peak_takes_first_maximum() {
        let snapshot = FieldSnapshot::from_vec(vec![1.0, 3.0, 3.0, 2.0]);
        assert_eq!(snapshot.peak(), Some((1, 3.0)));
        assert_eq!(FieldSnapshot::zeros(0).peak(), None);
    }

    #[test]
    fn test_is_finite_detects_nan_and_inf() {
        assert!(!FieldSnapshot::from_vec(vec![1.0, f64::NAN]).is_finite());
        assert!(!FieldSnapshot::from_vec(vec![f64::INFINITY, 0.0]).is_finite());
    }

    #[test]
    fn test_ensure_len() {
        let snapshot = FieldSnapshot::zeros(5);
        assert!(snapshot.ensure_len(5).is_ok());
        assert_eq!(
            snapshot.ensure_len(6),
            Err(AdvectionError::ShapeMismatch { expected: 6, found: 5 })
        );
    }

    #[test]
    fn test_rms_difference() {
        let a = FieldSnapshot::from_vec(vec![1.0, 1.0, 1.0, 1.0]);
        let b = FieldSnapshot::from_vec(vec![3.0, 3.0, 3.0, 3.0]);
        assert_eq!(a.rms_difference(&b).unwrap(), 2.0);
        assert_eq!(a.max_abs_difference(&b).unwrap(), 2.0);
        assert!(a.rms_difference(&FieldSnapshot::zeros(3)).is_err());
    }

    #[test]
    fn test_mirrored_rows_are_identical() {
        let snapshot = FieldSnapshot::from_vec(vec![0.0, 5.0, 10.0]);
        let surface = snapshot.mirrored();
        assert_eq!(surface.shape(), &[2, 3]);
        assert_eq!(surface.row(0), surface.row(1));
        assert_eq!(surface[[1, 2]], 10.0);
    }

    #[test]
    fn test_display() {
        let snapshot = FieldSnapshot::from_vec(vec![0.0, 10.0]);
        assert_eq!(snapshot.to_string(), "Snapshot [2] (peak 10.0000 at 1)");
    }
}

//! Error types for the numerical core
//!
//! The core never prints and never substitutes defaults for invalid input:
//! every failure is returned to the immediate caller as an [`AdvectionError`].
//!
//! Output collaborators (export, animation, configuration) carry their own
//! error enums and wrap this one when a core call fails underneath them.

use thiserror::Error;

/// Failure kinds of the advection core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdvectionError {
    /// A parameter is outside of its valid domain
    ///
    /// Examples: non-positive Gaussian width, non-positive grid spacing,
    /// fewer than two grid points, non-finite velocity.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A snapshot length disagrees with the declared grid size
    #[error("shape mismatch: expected {expected} grid values, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    /// An unrecognized profile tag was requested
    #[error("unknown profile kind `{0}` (expected `gauss` or `rectg`)")]
    ProfileKind(String),

    /// NaN or infinity appeared in a snapshot during integration
    #[error("non-finite concentration at step {step}; the Courant number is likely too large")]
    NumericalInstability { step: usize },
}

impl AdvectionError {
    /// Shorthand used by parameter validation
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter { name, value, reason }
    }
}

/// Convenience alias for core results
pub type Result<T> = std::result::Result<T, AdvectionError>;

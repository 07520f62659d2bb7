//! Initial concentration profiles and the exact periodic solution
//!
//! Defines the concentration field at `t = 0` and, because linear advection
//! only translates the field, the exact solution at every later time:
//!
//! ```text
//! C(x, t) = C0(x0),   x0 = (x - u·t) mod ((Nx - 1)·dx)
//! ```
//!
//! # Profiles
//!
//! - **Gaussian**: `A · exp(-(x0 - xc)² / (nr·dx)²)` with `xc = 51·dx`
//! - **Rectangular**: `A` on `[50·dx, 52·dx]`, `0` elsewhere
//!
//! with `A = 10` unless overridden in [`ProfileParameters`].
//!
//! # Example
//!
//! ```rust
//! use advect_rs::models::{InitialProfile, ProfileParameters};
//!
//! let params = ProfileParameters::new(10.0, 500.0, 101).unwrap();
//! let profile = InitialProfile::gaussian(10.0).unwrap();
//!
//! // Peak at the centre
//! assert!((profile.evaluate(51.0 * 500.0, 0.0, &params) - 10.0).abs() < 1e-12);
//!
//! // One period later the field is back where it started
//! let period = params.period() / params.velocity();
//! let x = 20.0 * 500.0;
//! let drift = profile.evaluate(x, period, &params) - profile.evaluate(x, 0.0, &params);
//! assert!(drift.abs() < 1e-9);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AdvectionError, Result};
use crate::physics::{FieldSnapshot, Grid};

/// Default pulse amplitude
pub const DEFAULT_AMPLITUDE: f64 = 10.0;

/// Default pulse centre, in cells
pub const DEFAULT_CENTER_CELLS: f64 = 51.0;

/// Default half width of the rectangular band, in cells
pub const DEFAULT_HALF_BAND_CELLS: f64 = 1.0;

// =================================================================================================
// Profile parameters
// =================================================================================================

/// Physical and geometric parameters shared by every profile
///
/// # Example
///
/// ```rust
/// use advect_rs::models::ProfileParameters;
///
/// let params = ProfileParameters::new(10.0, 500.0, 101)
///     .and_then(|params| params.with_amplitude(2.0))
///     .unwrap();
/// assert_eq!(params.center(), 25_500.0);
/// assert_eq!(params.amplitude(), 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileParameters {
    /// Advection velocity u
    velocity: f64,
    /// Cell width dx
    dx: f64,
    /// Number of grid positions Nx
    nx: usize,
    /// Pulse height
    amplitude: f64,
    /// Pulse centre, in cells
    center_cells: f64,
    /// Half width of the rectangular band, in cells
    half_band_cells: f64,
}

impl ProfileParameters {
    /// Create parameters with default amplitude, centre and band
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for a non-finite velocity, a non-positive spacing or
    /// fewer than two grid points.
    pub fn new(velocity: f64, dx: f64, nx: usize) -> Result<Self> {
        let params = Self {
            velocity,
            dx,
            nx,
            amplitude: DEFAULT_AMPLITUDE,
            center_cells: DEFAULT_CENTER_CELLS,
            half_band_cells: DEFAULT_HALF_BAND_CELLS,
        };
        params.validate()?;
        Ok(params)
    }

    /// Override the pulse amplitude
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for a non-finite amplitude.
    pub fn with_amplitude(mut self, amplitude: f64) -> Result<Self> {
        self.amplitude = amplitude;
        self.validate()?;
        Ok(self)
    }

    /// Override the pulse centre, in cells
    pub fn with_center_cells(mut self, center_cells: f64) -> Result<Self> {
        self.center_cells = center_cells;
        self.validate()?;
        Ok(self)
    }

    /// Override the rectangular half band, in cells
    pub fn with_half_band_cells(mut self, half_band_cells: f64) -> Result<Self> {
        self.half_band_cells = half_band_cells;
        self.validate()?;
        Ok(self)
    }

    /// Check every field
    ///
    /// Called by [`ProfileParameters::new`] and the `with_*` builders; call it
    /// again after deserialization.
    pub fn validate(&self) -> Result<()> {
        if !self.velocity.is_finite() {
            return Err(AdvectionError::invalid(
                "u",
                self.velocity,
                "velocity must be finite",
            ));
        }
        if !self.dx.is_finite() || self.dx <= 0.0 {
            return Err(AdvectionError::invalid(
                "dx",
                self.dx,
                "grid spacing must be positive and finite",
            ));
        }
        if self.nx < 2 {
            return Err(AdvectionError::invalid(
                "Nx",
                self.nx as f64,
                "a periodic grid needs at least 2 points",
            ));
        }
        if !self.amplitude.is_finite() {
            return Err(AdvectionError::invalid(
                "amplitude",
                self.amplitude,
                "amplitude must be finite",
            ));
        }
        if !self.center_cells.is_finite() {
            return Err(AdvectionError::invalid(
                "center_cells",
                self.center_cells,
                "pulse centre must be finite",
            ));
        }
        if !self.half_band_cells.is_finite() || self.half_band_cells < 0.0 {
            return Err(AdvectionError::invalid(
                "half_band_cells",
                self.half_band_cells,
                "band half width must be non-negative and finite",
            ));
        }
        Ok(())
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn center_cells(&self) -> f64 {
        self.center_cells
    }

    pub fn half_band_cells(&self) -> f64 {
        self.half_band_cells
    }

    /// Pulse centre position `center_cells * dx`
    pub fn center(&self) -> f64 {
        self.center_cells * self.dx
    }

    /// Length of the periodic domain `(Nx - 1) * dx`
    pub fn period(&self) -> f64 {
        (self.nx - 1) as f64 * self.dx
    }

    /// Grid matching these parameters
    pub fn grid(&self) -> Result<Grid> {
        Grid::new(self.nx, self.dx)
    }
}

/// Fold `x - u·t` back into `[0, (Nx - 1)·dx)`
///
/// The single place where the periodic wrap of the exact solution is computed.
pub fn periodic_shift(x: f64, t: f64, params: &ProfileParameters) -> f64 {
    (x - params.velocity * t).rem_euclid(params.period())
}

// =================================================================================================
// Profile kind
// =================================================================================================

/// Profile tag as chosen on the command line or in a configuration file
///
/// Parses `gauss`/`gaussian` and `rectg`/`rect`/`rectangular`, case-insensitive.
///
/// ```rust
/// use advect_rs::models::ProfileKind;
///
/// assert_eq!("gauss".parse::<ProfileKind>().unwrap(), ProfileKind::Gaussian);
/// assert_eq!("RECTG".parse::<ProfileKind>().unwrap(), ProfileKind::Rectangular);
/// assert!("triangle".parse::<ProfileKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileKind {
    #[serde(rename = "gauss", alias = "gaussian")]
    Gaussian,
    #[serde(rename = "rectg", alias = "rect", alias = "rectangular")]
    Rectangular,
}

impl ProfileKind {
    /// Short tag used in file names
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Gaussian => "gauss",
            Self::Rectangular => "rectg",
        }
    }
}

impl FromStr for ProfileKind {
    type Err = AdvectionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gauss" | "gaussian" => Ok(Self::Gaussian),
            "rectg" | "rect" | "rectangular" => Ok(Self::Rectangular),
            _ => Err(AdvectionError::ProfileKind(s.to_string())),
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// =================================================================================================
// Initial profile
// =================================================================================================

/// Shape of the concentration pulse
///
/// The Gaussian variant carries its width `nr`, in cells. The rectangular
/// variant has a fixed band given by [`ProfileParameters`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InitialProfile {
    /// Bell-shaped pulse of width `nr * dx`
    Gaussian { width: f64 },

    /// Flat-top pulse
    Rectangular,
}

impl InitialProfile {
    /// Gaussian pulse with width `nr`, in cells
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when `width` is not a positive finite number.
    pub fn gaussian(width: f64) -> Result<Self> {
        if !width.is_finite() || width <= 0.0 {
            return Err(AdvectionError::invalid(
                "nr",
                width,
                "Gaussian width must be positive and finite",
            ));
        }
        Ok(Self::Gaussian { width })
    }

    /// Rectangular pulse
    pub fn rectangular() -> Self {
        Self::Rectangular
    }

    /// Build a profile from its tag and an optional width
    ///
    /// The Gaussian profile requires a width. A width given for the
    /// rectangular profile is ignored with a warning.
    pub fn from_kind(kind: ProfileKind, width: Option<f64>) -> Result<Self> {
        match (kind, width) {
            (ProfileKind::Gaussian, Some(width)) => Self::gaussian(width),
            (ProfileKind::Gaussian, None) => Err(AdvectionError::invalid(
                "nr",
                f64::NAN,
                "the Gaussian profile requires a width",
            )),
            (ProfileKind::Rectangular, Some(width)) => {
                log::warn!("Width nr = {width} is ignored for the rectangular profile");
                Ok(Self::Rectangular)
            }
            (ProfileKind::Rectangular, None) => Ok(Self::Rectangular),
        }
    }

    /// Re-check the width after deserialization
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Gaussian { width } => Self::gaussian(*width).map(|_| ()),
            Self::Rectangular => Ok(()),
        }
    }

    pub fn kind(&self) -> ProfileKind {
        match self {
            Self::Gaussian { .. } => ProfileKind::Gaussian,
            Self::Rectangular => ProfileKind::Rectangular,
        }
    }

    /// Gaussian width in cells, `None` for the rectangular profile
    pub fn width(&self) -> Option<f64> {
        match self {
            Self::Gaussian { width } => Some(*width),
            Self::Rectangular => None,
        }
    }

    /// Concentration at position `x` and time `t`
    ///
    /// Trusts `params`: constructed parameters are always valid, deserialized
    /// ones must go through [`ProfileParameters::validate`] first.
    pub fn evaluate(&self, x: f64, t: f64, params: &ProfileParameters) -> f64 {
        let x0 = periodic_shift(x, t, params);

        match self {
            Self::Gaussian { width } => {
                let spread = width * params.dx;
                let offset = x0 - params.center();
                params.amplitude * (-(offset * offset) / (spread * spread)).exp()
            }
            Self::Rectangular => {
                let lower = (params.center_cells - params.half_band_cells) * params.dx;
                let upper = (params.center_cells + params.half_band_cells) * params.dx;
                if (lower..=upper).contains(&x0) {
                    params.amplitude
                } else {
                    0.0
                }
            }
        }
    }

    /// Concentration over every grid position at time `t`
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` when the grid size differs from `params.nx()`,
    /// `InvalidParameter` when `params` is invalid or the grid spacing differs
    /// from `params.dx()`.
    pub fn evaluate_grid(
        &self,
        grid: &Grid,
        t: f64,
        params: &ProfileParameters,
    ) -> Result<FieldSnapshot> {
        params.validate()?;
        if grid.points() != params.nx {
            return Err(AdvectionError::ShapeMismatch {
                expected: params.nx,
                found: grid.points(),
            });
        }
        if grid.spacing() != params.dx {
            return Err(AdvectionError::invalid(
                "dx",
                grid.spacing(),
                "grid spacing differs from the profile parameters",
            ));
        }

        let values = (0..grid.points())
            .map(|j| self.evaluate(grid.position(j), t, params))
            .collect();
        Ok(FieldSnapshot::from_vec(values))
    }
}

impl fmt::Display for InitialProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gaussian { width } => write!(f, "Gaussian (nr = {width})"),
            Self::Rectangular => write!(f, "Rectangular"),
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================

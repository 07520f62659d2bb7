//! Concentration profiles for the advection problem
//!
//! A profile gives the concentration field at `t = 0`. Since the velocity is
//! constant and the domain periodic, the same profile evaluated at the shifted
//! position `x - u·t` is the exact solution at any time: the analytical solver
//! relies on nothing else.
//!
//! # Available Profiles
//!
//! ## [`InitialProfile::Gaussian`]
//!
//! Smooth bell of width `nr` cells centred at cell 51. Used to measure the
//! numerical diffusion of the upwind scheme.
//!
//! ## [`InitialProfile::Rectangular`]
//!
//! Flat-top band covering cells 50 to 52. Its discontinuities expose the
//! smearing of sharp fronts.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod profile;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use profile::{
    periodic_shift, InitialProfile, ProfileKind, ProfileParameters, DEFAULT_AMPLITUDE,
    DEFAULT_CENTER_CELLS, DEFAULT_HALF_BAND_CELLS,
};

//! Visualization of advection results using the `plotters` library
//!
//! # Organization
//!
//! - **config**: Shared plot configuration (`PlotConfig`)
//! - **surface**: 3D surface frame of one snapshot (`SurfaceFrame`, `plot_surface`)
//! - **profile**: Numerical vs analytical line plot (`plot_profile_comparison`)
//!
//! # When to Use Which Module
//!
//! | Use Case | Module | Function |
//! |----------|--------|----------|
//! | Animation frames | `surface` | `plot_surface` |
//! | Accuracy check at one time point | `profile` | `plot_profile_comparison` |

pub mod config;
pub mod profile;
pub mod surface;

pub use config::{IntoOptionalTitle, PlotConfig, NO_TITLE};
pub use profile::plot_profile_comparison;
pub use surface::{plot_surface, SurfaceFrame, DEFAULT_CLIP};

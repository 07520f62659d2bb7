//! Output module for simulation results
//!
//! Everything that leaves the process goes through here:
//! - **Export**: labeled dataset (JSON, reloadable) and wide CSV tables
//! - **Visualization**: 3D surface frames and profile comparisons (PNG/SVG)
//! - **Animation**: cropped, looping GIF of the surface frames
//! - **Naming**: file names and directory layout shared by all of the above
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs              ← This file
//! ├── naming.rs           ← Run names and output directories
//! ├── animation.rs        ← GIF assembly
//! ├── visualization/      ← Plots
//! │   ├── config.rs
//! │   ├── surface.rs
//! │   └── profile.rs
//! └── export/             ← Data export
//!     ├── dataset.rs
//!     └── csv.rs
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use advect_rs::output::{DatasetExporter, Exporter, OutputLayout, RunName};
//!
//! let layout = OutputLayout::default();
//! let name = RunName::from_result(&result);
//! DatasetExporter::new().export(&result, &layout.dataset_path(&name, result.courant, "json"))?;
//! ```
//!
//! The core never writes files: only these collaborators do.

pub mod animation;
pub mod export;
pub mod naming;
pub mod visualization;

// Re-export commonly used items for convenience
pub use animation::{assemble_gif, crop_central_band, AnimationConfig, AnimationError};

pub use export::{
    load_dataset, CsvConfig, CsvExporter, CsvMetadata, DatasetExporter, ExportError, Exporter,
};
#[cfg(feature = "netcdf")]
pub use export::{load_netcdf, NetCdfExporter};

pub use naming::{OutputLayout, RunName};

pub use visualization::{plot_profile_comparison, plot_surface, PlotConfig, SurfaceFrame};

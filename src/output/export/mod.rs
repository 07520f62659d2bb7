//! Export module for simulation results.
//!
//! # Architecture
//!
//! This module defines the [`Exporter`] trait that abstracts the export format.
//! Each format is an independent implementation in its own sub-module, so
//! adding a format means adding a file.
//!
//! # Available formats
//!
//! | Format          | Module        | Reloadable |
//! |-----------------|---------------|------------|
//! | Labeled dataset | [`dataset`]   | yes, with [`load_dataset`] |
//! | CSV (wide)      | [`csv`]       | no         |
//! | NetCDF          | `netcdf`      | yes, with `load_netcdf` (`netcdf` feature) |
//!
//! # Usage example
//!
//! ```rust,ignore
//! use advect_rs::output::export::{DatasetExporter, Exporter, load_dataset};
//!
//! DatasetExporter::new().export(&result, Path::new("outputs/data/run.json"))?;
//! let reloaded = load_dataset("outputs/data/run.json")?;
//! ```

pub mod csv;
pub mod dataset;
#[cfg(feature = "netcdf")]
pub mod netcdf;

pub use csv::{CsvConfig, CsvExporter, CsvMetadata};
pub use dataset::{load_dataset, Dataset, DatasetExporter, TIME_UNITS, VARIABLE_NAME};
#[cfg(feature = "netcdf")]
pub use self::netcdf::{load_netcdf, NetCdfExporter};

use std::path::Path;

use thiserror::Error;

use crate::error::AdvectionError;
use crate::solver::SimulationResult;

/// Failure while writing or reading an exported result
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] ::netcdf::Error),

    /// The result or the file content cannot be represented
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The reloaded content violates a core invariant
    #[error(transparent)]
    Core(#[from] AdvectionError),
}

/// Abstraction trait for all export formats.
///
/// # Associated type `Error`
///
/// Each format manages its own errors via the associated type, so the caller
/// can react to the precise failure without downcasting.
pub trait Exporter {
    /// Error type specific to this export format.
    type Error: std::error::Error;

    /// Write `result` to `path`, creating parent directories as needed
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the file cannot be created
    /// - `result` contains no data or non-finite values
    fn export(&self, result: &SimulationResult, path: &Path) -> Result<(), Self::Error>;

    /// File extension written by this format, without the dot
    fn extension(&self) -> &'static str;
}

/// Shared checks before anything is written
pub(crate) fn validate_result(result: &SimulationResult) -> Result<(), ExportError> {
    if result.is_empty() {
        return Err(ExportError::InvalidData(
            "the result holds no snapshot".to_string(),
        ));
    }
    if let Some(k) = result.snapshots.iter().position(|s| !s.is_finite()) {
        return Err(ExportError::InvalidData(format!(
            "NaN or Inf detected in snapshot {k}"
        )));
    }
    Ok(())
}

/// Create the parent directory of `path` if it is missing
pub(crate) fn ensure_parent(path: &Path) -> Result<(), std::io::Error> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

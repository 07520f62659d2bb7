//! Labeled 3D dataset export
//!
//! A result is stored as one variable `conc_unids` with dimensions
//! `(time, Y, X)`:
//!
//! - `time`: seconds, with units `"seconds since 2020-01-01 00:00:00"`
//! - `Y`: synthetic axis of width 2, coordinates `[-dx/2, dx/2]`; both rows
//!   hold the same field so the array can be drawn as a surface
//! - `X`: grid index `0..Nx`
//!
//! plus attributes describing the run (velocity, spacing, time step, profile,
//! Courant number, method, creation time). The file is JSON:
//!
//! ```text
//! {
//!   "dims": ["time", "Y", "X"],
//!   "coords": { "time": { "values": [...], "units": "...", "dates": [...] },
//!               "Y": [-250.0, 250.0], "X": [0, 1, ...] },
//!   "conc_unids": { "v": 1, "dim": [10, 2, 101], "data": [...] },
//!   "attrs": { "velocity": 10.0, "dx": 500.0, ... }
//! }
//! ```
//!
//! Floats are written with round-trip precision: [`load_dataset`] gives back
//! snapshots identical to the exported ones.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use ndarray::{s, Array3};
use serde::{Deserialize, Serialize};

use super::{ensure_parent, validate_result, ExportError, Exporter};
use crate::models::{InitialProfile, ProfileKind, ProfileParameters};
use crate::physics::FieldSnapshot;
use crate::solver::{ResultKind, Scenario, SimulationResult};

/// Name of the concentration variable
pub const VARIABLE_NAME: &str = "conc_unids";

/// Units attribute of the time coordinate
pub const TIME_UNITS: &str = "seconds since 2020-01-01 00:00:00";

// =================================================================================================
// On-disk layout
// =================================================================================================

/// In-memory image of a dataset file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Dimension names of `conc_unids`, in order
    pub dims: Vec<String>,
    pub coords: Coordinates,
    /// Concentration, shape `(time, 2, Nx)`
    pub conc_unids: Array3<f64>,
    pub attrs: Attributes,
}

/// Coordinate values along each dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub time: TimeCoordinate,
    #[serde(rename = "Y")]
    pub y: Vec<f64>,
    #[serde(rename = "X")]
    pub x: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeCoordinate {
    /// Seconds since the epoch in `units`
    pub values: Vec<f64>,
    pub units: String,
    /// Same instants as calendar dates, informative only
    #[serde(default)]
    pub dates: Vec<String>,
}

/// Scalar description of the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub velocity: f64,
    pub dx: f64,
    pub dt: f64,
    pub nx: usize,
    pub amplitude: f64,
    pub center_cells: f64,
    pub half_band_cells: f64,
    pub profile: ProfileKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nr: Option<f64>,
    #[serde(rename = "CFL_number")]
    pub courant_number: f64,
    pub method: String,
    pub result_kind: ResultKind,
    pub created: String,
    pub simulation_parameters: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

fn epoch() -> Result<NaiveDateTime, ExportError> {
    NaiveDate::from_ymd_opt(2020, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ExportError::InvalidData("invalid time epoch".to_string()))
}

fn calendar_dates(times: &[f64]) -> Result<Vec<String>, ExportError> {
    let epoch = epoch()?;
    times
        .iter()
        .map(|&t| {
            TimeDelta::try_milliseconds((t * 1000.0).round() as i64)
                .and_then(|offset| epoch.checked_add_signed(offset))
                .map(|date| date.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())
                .ok_or_else(|| ExportError::InvalidData(format!("time {t} s is out of range")))
        })
        .collect()
}

impl Dataset {
    /// Lay out `result` as a labeled dataset
    pub fn from_result(result: &SimulationResult) -> Result<Self, ExportError> {
        validate_result(result)?;

        let nx = result.grid.points();
        let dx = result.grid.spacing();
        let conc_unids =
            Array3::from_shape_fn((result.len(), 2, nx), |(k, _, j)| result.snapshots[k][j]);

        Ok(Self {
            dims: vec!["time".to_string(), "Y".to_string(), "X".to_string()],
            coords: Coordinates {
                time: TimeCoordinate {
                    values: result.time_points.clone(),
                    units: TIME_UNITS.to_string(),
                    dates: calendar_dates(&result.time_points)?,
                },
                y: vec![-dx / 2.0, dx / 2.0],
                x: (0..nx).collect(),
            },
            conc_unids,
            attrs: Attributes {
                velocity: result.parameters.velocity(),
                dx,
                dt: result.dt,
                nx,
                amplitude: result.parameters.amplitude(),
                center_cells: result.parameters.center_cells(),
                half_band_cells: result.parameters.half_band_cells(),
                profile: result.profile.kind(),
                nr: result.profile.width(),
                courant_number: result.courant.value(),
                method: result.method.clone(),
                result_kind: result.kind,
                created: chrono::Utc::now().to_rfc3339(),
                simulation_parameters: result.summary(),
                metadata: result.metadata.clone(),
            },
        })
    }

    /// Rebuild the simulation result, taking each snapshot from the first `Y` row
    ///
    /// # Errors
    ///
    /// `InvalidData` when the array shape disagrees with the coordinates or
    /// attributes, `Core` when the attributes describe an invalid run.
    pub fn into_result(self) -> Result<SimulationResult, ExportError> {
        let attrs = &self.attrs;
        let (time_points, rows, nx) = self.conc_unids.dim();

        if rows != 2 || nx != attrs.nx || self.coords.x.len() != nx {
            return Err(ExportError::InvalidData(format!(
                "{VARIABLE_NAME} has shape ({time_points}, {rows}, {nx}), expected (time, 2, {})",
                attrs.nx
            )));
        }
        if self.coords.time.values.len() != time_points {
            return Err(ExportError::InvalidData(format!(
                "{} time coordinates for {} snapshots",
                self.coords.time.values.len(),
                time_points
            )));
        }

        let parameters = ProfileParameters::new(attrs.velocity, attrs.dx, attrs.nx)?
            .with_amplitude(attrs.amplitude)?
            .with_center_cells(attrs.center_cells)?
            .with_half_band_cells(attrs.half_band_cells)?;
        let profile = InitialProfile::from_kind(attrs.profile, attrs.nr)?;
        let scenario = Scenario::new(parameters, profile, attrs.dt, time_points)?;

        let expected = scenario.times().points();
        let tolerance = 1e-9 * attrs.dt;
        if let Some(k) = expected
            .iter()
            .zip(&self.coords.time.values)
            .position(|(a, b)| (a - b).abs() > tolerance)
        {
            return Err(ExportError::InvalidData(format!(
                "time coordinate {k} is not {k} * dt"
            )));
        }

        let snapshots = (0..time_points)
            .map(|k| FieldSnapshot::from_vec(self.conc_unids.slice(s![k, 0, ..]).to_vec()))
            .collect();

        let mut result =
            SimulationResult::new(&scenario, attrs.method.clone(), attrs.result_kind, snapshots)?;
        result.metadata = self.attrs.metadata;
        Ok(result)
    }

    /// Read a dataset file
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Reconstruct a simulation result from a dataset file
///
/// ```rust,ignore
/// let result = load_dataset(
///     "outputs/data/EulerBackward_dt40_CFL0.80_dx500_profilegauss_nr10_numerical.json",
/// )?;
/// ```
pub fn load_dataset(path: impl AsRef<Path>) -> Result<SimulationResult, ExportError> {
    let path = path.as_ref();
    let result = Dataset::read(path)?.into_result()?;
    log::debug!("Loaded {} snapshots from {}", result.len(), path.display());
    Ok(result)
}

// =================================================================================================
// Exporter
// =================================================================================================

/// Writes results as labeled JSON datasets
#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetExporter {
    pretty: bool,
}

impl DatasetExporter {
    /// Compact output
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Builder pattern: indent the JSON output
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Exporter for DatasetExporter {
    type Error = ExportError;

    fn export(&self, result: &SimulationResult, path: &Path) -> Result<(), ExportError> {
        let dataset = Dataset::from_result(result)?;

        ensure_parent(path)?;
        let writer = BufWriter::new(File::create(path)?);
        if self.pretty {
            serde_json::to_writer_pretty(writer, &dataset)?;
        } else {
            serde_json::to_writer(writer, &dataset)?;
        }

        log::debug!("Dataset written to {}", path.display());
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{Solver, UpwindSolver};
    use tempfile::NamedTempFile;

    fn small_result() -> SimulationResult {
        let params = ProfileParameters::new(10.0, 500.0, 21)
            .unwrap()
            .with_center_cells(10.0)
            .unwrap();
        let profile = InitialProfile::gaussian(2.0).unwrap();
        let scenario = Scenario::new(params, profile, 40.0, 4).unwrap();
        UpwindSolver::new().solve(&scenario).unwrap()
    }

    #[test]
    fn test_layout() {
        let dataset = Dataset::from_result(&small_result()).unwrap();

        assert_eq!(dataset.dims, vec!["time", "Y", "X"]);
        assert_eq!(dataset.conc_unids.dim(), (4, 2, 21));
        assert_eq!(dataset.coords.y, vec![-250.0, 250.0]);
        assert_eq!(dataset.coords.x.len(), 21);
        assert_eq!(dataset.coords.time.units, TIME_UNITS);
        assert_eq!(dataset.coords.time.dates[1], "2020-01-01T00:00:40.000");
        assert_eq!(
            dataset.conc_unids.slice(s![2, 0, ..]),
            dataset.conc_unids.slice(s![2, 1, ..])
        );
    }

    #[test]
    fn test_attributes() {
        let dataset = Dataset::from_result(&small_result()).unwrap();
        let attrs = &dataset.attrs;

        assert_eq!(attrs.profile, ProfileKind::Gaussian);
        assert_eq!(attrs.nr, Some(2.0));
        assert!((attrs.courant_number - 0.8).abs() < 1e-12);
        assert_eq!(attrs.method, "Euler Backward");
        assert_eq!(attrs.result_kind, ResultKind::Numerical);
        assert!(attrs.simulation_parameters.contains("nr=2"));
        assert!(chrono::DateTime::parse_from_rfc3339(&attrs.created).is_ok());
    }

    #[test]
    fn test_roundtrip_through_file() {
        let result = small_result();
        let file = NamedTempFile::new().unwrap();

        DatasetExporter::new().export(&result, file.path()).unwrap();
        let reloaded = load_dataset(file.path()).unwrap();

        assert_eq!(reloaded, result);
    }

    #[test]
    fn test_rectangular_attributes_have_no_width() {
        let params = ProfileParameters::new(10.0, 500.0, 101).unwrap();
        let scenario = Scenario::new(params, InitialProfile::Rectangular, 40.0, 2).unwrap();
        let result = UpwindSolver::new().solve(&scenario).unwrap();

        let json = serde_json::to_string(&Dataset::from_result(&result).unwrap()).unwrap();
        assert!(!json.contains("\"nr\""));
        assert!(json.contains("\"profile\":\"rectg\""));
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let mut dataset = Dataset::from_result(&small_result()).unwrap();
        dataset.conc_unids = Array3::zeros((4, 3, 21));
        assert!(matches!(dataset.into_result(), Err(ExportError::InvalidData(_))));
    }

    #[test]
    fn test_rejects_inconsistent_time_coordinate() {
        let mut dataset = Dataset::from_result(&small_result()).unwrap();
        dataset.coords.time.values[2] = 1000.0;
        assert!(matches!(dataset.into_result(), Err(ExportError::InvalidData(_))));
    }

    #[test]
    fn test_rejects_invalid_attributes() {
        let mut dataset = Dataset::from_result(&small_result()).unwrap();
        dataset.attrs.dx = -1.0;
        assert!(matches!(dataset.into_result(), Err(ExportError::Core(_))));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_dataset("/nonexistent/run.json"),
            Err(ExportError::Io(_))
        ));
    }
}

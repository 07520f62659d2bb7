//! NetCDF export of the labeled dataset (requires the `netcdf` feature)
//!
//! Same layout as the JSON [`Dataset`]: one variable `conc_unids(time, Y, X)`
//! compressed with deflate level 4, coordinate variables `time`, `Y` and `X`,
//! and the run description as global attributes. The metadata map is kept
//! as a JSON string attribute.
//!
//! ```rust,ignore
//! use advect_rs::output::export::{load_netcdf, Exporter, NetCdfExporter};
//!
//! NetCdfExporter::new().export(&result, Path::new("outputs/data/run.nc"))?;
//! let reloaded = load_netcdf("outputs/data/run.nc")?;
//! ```

use std::path::Path;
use std::str::FromStr;

use ndarray::Array3;

use super::dataset::{Attributes, Coordinates, Dataset, TimeCoordinate};
use super::{ensure_parent, ExportError, Exporter, TIME_UNITS, VARIABLE_NAME};
use crate::models::ProfileKind;
use crate::solver::{ResultKind, SimulationResult};

/// Deflate level of `conc_unids`
pub const DEFAULT_COMPRESSION_LEVEL: u8 = 4;

// =================================================================================================
// Writer
// =================================================================================================

/// Writes results as NetCDF datasets
#[derive(Debug, Clone, Copy)]
pub struct NetCdfExporter {
    compression_level: u8,
}

impl Default for NetCdfExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl NetCdfExporter {
    /// Deflate level 4
    pub fn new() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    /// Builder pattern: deflate level, 0 (none) to 9
    pub fn with_compression(mut self, level: u8) -> Self {
        self.compression_level = level.min(9);
        self
    }

    pub fn compression_level(&self) -> u8 {
        self.compression_level
    }
}

impl Exporter for NetCdfExporter {
    type Error = ExportError;

    fn export(&self, result: &SimulationResult, path: &Path) -> Result<(), ExportError> {
        let dataset = Dataset::from_result(result)?;
        ensure_parent(path)?;
        dataset.write_netcdf(path, self.compression_level)?;

        log::debug!("NetCDF dataset written to {}", path.display());
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "nc"
    }
}

impl Dataset {
    /// Write the dataset to a NetCDF file
    pub fn write_netcdf(&self, path: &Path, compression_level: u8) -> Result<(), ExportError> {
        let (time_points, rows, nx) = self.conc_unids.dim();
        let mut file = netcdf::create(path)?;

        file.add_dimension("time", time_points)?;
        file.add_dimension("Y", rows)?;
        file.add_dimension("X", nx)?;

        // ====== Coordinates ======

        {
            let mut time_var = file.add_variable::<f64>("time", &["time"])?;
            time_var.put_attribute("standard_name", "time")?;
            time_var.put_attribute("units", self.coords.time.units.as_str())?;
            time_var.put_attribute("calendar", "standard")?;
            time_var.put_values(&self.coords.time.values, ..)?;
        }

        {
            let mut y_var = file.add_variable::<f64>("Y", &["Y"])?;
            y_var.put_attribute("long_name", "mirrored cross-stream axis")?;
            y_var.put_attribute("units", "m")?;
            y_var.put_values(&self.coords.y, ..)?;
        }

        {
            let x: Vec<i64> = self.coords.x.iter().map(|&j| j as i64).collect();
            let mut x_var = file.add_variable::<i64>("X", &["X"])?;
            x_var.put_attribute("long_name", "grid index")?;
            x_var.put_values(&x, ..)?;
        }

        // ====== Concentration ======

        {
            let data: Vec<f64> = self.conc_unids.iter().copied().collect();
            let mut conc_var = file.add_variable::<f64>(VARIABLE_NAME, &["time", "Y", "X"])?;
            if compression_level > 0 {
                conc_var.set_compression(i32::from(compression_level), false)?;
            }
            conc_var.put_attribute("long_name", "concentration")?;
            conc_var.put_values(&data, ..)?;
        }

        // ====== Global attributes ======

        let attrs = &self.attrs;
        file.add_attribute("velocity", attrs.velocity)?;
        file.add_attribute("dx", attrs.dx)?;
        file.add_attribute("dt", attrs.dt)?;
        file.add_attribute("nx", attrs.nx as i64)?;
        file.add_attribute("amplitude", attrs.amplitude)?;
        file.add_attribute("center_cells", attrs.center_cells)?;
        file.add_attribute("half_band_cells", attrs.half_band_cells)?;
        file.add_attribute("profile", attrs.profile.tag())?;
        if let Some(nr) = attrs.nr {
            file.add_attribute("nr", nr)?;
        }
        file.add_attribute("CFL_number", attrs.courant_number)?;
        file.add_attribute("method", attrs.method.as_str())?;
        file.add_attribute("result_kind", attrs.result_kind.tag())?;
        file.add_attribute("created", attrs.created.as_str())?;
        file.add_attribute("simulation_parameters", attrs.simulation_parameters.as_str())?;
        file.add_attribute("metadata", serde_json::to_string(&attrs.metadata)?.as_str())?;

        Ok(())
    }

    /// Read a dataset written by [`Dataset::write_netcdf`]
    pub fn read_netcdf(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let file = netcdf::open(path.as_ref())?;

        let conc_var = file
            .variable(VARIABLE_NAME)
            .ok_or_else(|| missing("variable", VARIABLE_NAME))?;
        let shape: Vec<usize> = conc_var.dimensions().iter().map(|d| d.len()).collect();
        let &[time_points, rows, nx] = shape.as_slice() else {
            return Err(ExportError::InvalidData(format!(
                "{VARIABLE_NAME} has {} dimensions, expected 3",
                shape.len()
            )));
        };
        let data: Vec<f64> = conc_var.get_values(..)?;
        let conc_unids = Array3::from_shape_vec((time_points, rows, nx), data)
            .map_err(|e| ExportError::InvalidData(e.to_string()))?;

        let time_var = file.variable("time").ok_or_else(|| missing("variable", "time"))?;
        let units = match time_var.attribute_value("units") {
            Some(value) => as_string(value?, "units")?,
            None => TIME_UNITS.to_string(),
        };
        let time = TimeCoordinate {
            values: time_var.get_values(..)?,
            units,
            dates: Vec::new(),
        };
        let y: Vec<f64> = file
            .variable("Y")
            .ok_or_else(|| missing("variable", "Y"))?
            .get_values(..)?;
        let x: Vec<i64> = file
            .variable("X")
            .ok_or_else(|| missing("variable", "X"))?
            .get_values(..)?;
        let x = x
            .into_iter()
            .map(|j| usize::try_from(j).map_err(|_| ExportError::InvalidData(format!("X = {j}"))))
            .collect::<Result<Vec<_>, _>>()?;

        let nx_attr = global_i64(&file, "nx")?;
        let result_kind = global_str(&file, "result_kind")?;
        let attrs = Attributes {
            velocity: global_f64(&file, "velocity")?,
            dx: global_f64(&file, "dx")?,
            dt: global_f64(&file, "dt")?,
            nx: usize::try_from(nx_attr)
                .map_err(|_| ExportError::InvalidData(format!("nx = {nx_attr}")))?,
            amplitude: global_f64(&file, "amplitude")?,
            center_cells: global_f64(&file, "center_cells")?,
            half_band_cells: global_f64(&file, "half_band_cells")?,
            profile: ProfileKind::from_str(&global_str(&file, "profile")?)?,
            nr: match file.attribute("nr") {
                Some(_) => Some(global_f64(&file, "nr")?),
                None => None,
            },
            courant_number: global_f64(&file, "CFL_number")?,
            method: global_str(&file, "method")?,
            result_kind: ResultKind::from_tag(&result_kind).ok_or_else(|| {
                ExportError::InvalidData(format!("unknown result kind '{result_kind}'"))
            })?,
            created: global_str(&file, "created")?,
            simulation_parameters: global_str(&file, "simulation_parameters")?,
            metadata: match file.attribute("metadata") {
                Some(_) => serde_json::from_str(&global_str(&file, "metadata")?)?,
                None => Default::default(),
            },
        };

        Ok(Self {
            dims: vec!["time".to_string(), "Y".to_string(), "X".to_string()],
            coords: Coordinates { time, y, x },
            conc_unids,
            attrs,
        })
    }
}

/// Reconstruct a simulation result from a NetCDF dataset
pub fn load_netcdf(path: impl AsRef<Path>) -> Result<SimulationResult, ExportError> {
    let path = path.as_ref();
    let result = Dataset::read_netcdf(path)?.into_result()?;
    log::debug!("Loaded {} snapshots from {}", result.len(), path.display());
    Ok(result)
}

// =================================================================================================
// Attribute helpers
// =================================================================================================

fn missing(what: &str, name: &str) -> ExportError {
    ExportError::InvalidData(format!("missing {what} '{name}'"))
}

fn global(file: &netcdf::File, name: &str) -> Result<netcdf::AttributeValue, ExportError> {
    Ok(file.attribute(name).ok_or_else(|| missing("attribute", name))?.value()?)
}

fn global_f64(file: &netcdf::File, name: &str) -> Result<f64, ExportError> {
    match global(file, name)? {
        netcdf::AttributeValue::Double(d) => Ok(d),
        netcdf::AttributeValue::Float(f) => Ok(f64::from(f)),
        other => Err(ExportError::InvalidData(format!("{name} is not a float: {other:?}"))),
    }
}

fn global_i64(file: &netcdf::File, name: &str) -> Result<i64, ExportError> {
    match global(file, name)? {
        netcdf::AttributeValue::Longlong(v) => Ok(v),
        netcdf::AttributeValue::Int(v) => Ok(i64::from(v)),
        other => Err(ExportError::InvalidData(format!("{name} is not an integer: {other:?}"))),
    }
}

fn global_str(file: &netcdf::File, name: &str) -> Result<String, ExportError> {
    as_string(global(file, name)?, name)
}

fn as_string(value: netcdf::AttributeValue, name: &str) -> Result<String, ExportError> {
    match value {
        netcdf::AttributeValue::Str(s) => Ok(s),
        other => Err(ExportError::InvalidData(format!("{name} is not a string: {other:?}"))),
    }
}

// =================================================================================================
// Tests
// =================================================================================================

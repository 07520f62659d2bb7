//! CSV export of simulation results
//!
//! Writes one row per time point and one column per grid index, which opens
//! directly in spreadsheet tools, pandas or MATLAB.
//!
//! # Quick Examples
//!
//! ## Minimal Export
//!
//! ```rust,ignore
//! use advect_rs::output::export::{CsvExporter, Exporter};
//!
//! CsvExporter::default().export(&result, Path::new("run.csv"))?;
//! ```
//!
//! **Output** (`run.csv`):
//! ```csv
//! Time (s),x0,x1,x2,...
//! 0.000000,0.000000,0.000000,0.000000,...
//! 40.000000,0.000000,0.000000,0.000000,...
//! ```
//!
//! ## With Metadata
//!
//! ```rust,ignore
//! let config = CsvConfig::default()
//!     .with_metadata(CsvMetadata::from_result(&result));
//! CsvExporter::new(config).export(&result, Path::new("run.csv"))?;
//! ```
//!
//! **Output** (`run.csv`):
//! ```csv
//! # Advection Simulation Data
//! # Generated: 2026-02-11T15:30:00Z
//! # Method: Euler Backward (numerical)
//! # Profile: gauss (nr = 10)
//! # Velocity: 10 m/s
//! # dx: 500 m
//! # dt: 40 s
//! # CFL: 0.80
//! #
//! Time (s),x0,x1,...
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{ensure_parent, validate_result, ExportError, Exporter};
use crate::solver::SimulationResult;

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Fields
///
/// - `delimiter`: Column separator (default: ',')
/// - `decimal_separator`: Decimal point character (default: '.')
/// - `precision`: Number of decimal places (default: 6)
/// - `include_metadata`: Add header comments with simulation info
/// - `metadata`: Simulation metadata to include
/// - `time_header`: Header of the time column
/// - `column_prefix`: Prefix of the grid index columns
///
/// # Example
///
/// ```rust
/// use advect_rs::output::export::CsvConfig;
///
/// let config = CsvConfig {
///     delimiter: ';',
///     precision: 10,
///     ..Default::default()
/// };
/// assert_eq!(config.time_header, "Time (s)");
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places for floating-point values (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<CsvMetadata>,

    /// Header of the time column (default: "Time (s)")
    pub time_header: String,

    /// Grid column headers are `{prefix}{j}` (default: "x")
    pub column_prefix: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
            time_header: "Time (s)".to_string(),
            column_prefix: "x".to_string(),
        }
    }
}

impl CsvConfig {
    /// European CSV format (semicolon, comma for decimal)
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for CSV header comments
///
/// Only non-None fields are written.
#[derive(Debug, Clone, Default)]
pub struct CsvMetadata {
    /// Method label and result kind, e.g. "Euler Backward (numerical)"
    pub method: Option<String>,

    /// Profile tag and width
    pub profile: Option<String>,

    /// Velocity u (m/s)
    pub velocity: Option<f64>,

    /// Cell width (m)
    pub dx: Option<f64>,

    /// Time step (s)
    pub dt: Option<f64>,

    /// Courant number
    pub courant: Option<f64>,

    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Collect every field from a result
    pub fn from_result(result: &SimulationResult) -> Self {
        let profile = match result.profile.width() {
            Some(width) => format!("{} (nr = {})", result.profile.kind(), width),
            None => result.profile.kind().to_string(),
        };

        Self {
            method: Some(format!("{} ({})", result.method, result.kind)),
            profile: Some(profile),
            velocity: Some(result.parameters.velocity()),
            dx: Some(result.grid.spacing()),
            dt: Some(result.dt),
            courant: Some(result.courant.value()),
            custom: Vec::new(),
        }
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: String, value: String) {
        self.custom.push((key, value));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn write_metadata_header<W: Write>(
    out: &mut W,
    metadata: &CsvMetadata,
) -> Result<(), std::io::Error> {
    writeln!(out, "# Advection Simulation Data")?;
    writeln!(out, "# Generated: {}", chrono::Utc::now().to_rfc3339())?;

    if let Some(method) = &metadata.method {
        writeln!(out, "# Method: {}", method)?;
    }
    if let Some(profile) = &metadata.profile {
        writeln!(out, "# Profile: {}", profile)?;
    }
    if let Some(u) = metadata.velocity {
        writeln!(out, "# Velocity: {} m/s", u)?;
    }
    if let Some(dx) = metadata.dx {
        writeln!(out, "# dx: {} m", dx)?;
    }
    if let Some(dt) = metadata.dt {
        writeln!(out, "# dt: {} s", dt)?;
    }
    if let Some(courant) = metadata.courant {
        writeln!(out, "# CFL: {:.2}", courant)?;
    }
    for (key, value) in &metadata.custom {
        writeln!(out, "# {}: {}", key, value)?;
    }

    writeln!(out, "#")
}

/// Format number with configured precision and decimal separator
fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$}", value, prec = config.precision);

    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

// =============================================================================
// Exporter
// =============================================================================

/// Wide CSV table: `time, x0, x1, ..., x{Nx-1}`
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    config: CsvConfig,
}

impl CsvExporter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CsvConfig {
        &self.config
    }

    /// Write the table to any writer
    pub fn write_to<W: Write>(
        &self,
        result: &SimulationResult,
        out: &mut W,
    ) -> Result<(), ExportError> {
        validate_result(result)?;
        let config = &self.config;

        if config.delimiter == config.decimal_separator {
            return Err(ExportError::InvalidData(format!(
                "delimiter and decimal separator are both '{}'",
                config.delimiter
            )));
        }

        // ============================= Write Metadata =========================

        if config.include_metadata {
            if let Some(metadata) = &config.metadata {
                write_metadata_header(out, metadata)?;
            }
        }

        // ============================= Write Header ===========================

        write!(out, "{}", config.time_header)?;
        for j in 0..result.grid.points() {
            write!(out, "{}{}{}", config.delimiter, config.column_prefix, j)?;
        }
        writeln!(out)?;

        // ============================= Write Data =============================

        for (time, snapshot) in result.time_points.iter().zip(&result.snapshots) {
            write!(out, "{}", format_number(*time, config))?;
            for value in snapshot.as_slice() {
                write!(out, "{}{}", config.delimiter, format_number(*value, config))?;
            }
            writeln!(out)?;
        }

        Ok(())
    }
}

impl Exporter for CsvExporter {
    type Error = ExportError;

    fn export(&self, result: &SimulationResult, path: &Path) -> Result<(), ExportError> {
        ensure_parent(path)?;
        let mut out = BufWriter::new(File::create(path)?);
        self.write_to(result, &mut out)?;
        out.flush()?;

        log::debug!("CSV written to {}", path.display());
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "csv"
    }
}

// =================================================================================================
// Tests
// =================================================================================================

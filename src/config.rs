//! Run configuration
//!
//! A [`SimulationConfig`] holds everything a run needs besides the command
//! itself. Every field has a default equal to the reference run, so a JSON
//! file only lists what it changes:
//!
//! ```json
//! {
//!   "physics": { "dt": 60.0 },
//!   "profile": { "kind": "rectg" }
//! }
//! ```
//!
//! Command-line flags are applied on top with the `with_*` builders.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{AdvectionError, Result};
use crate::models::{
    InitialProfile, ProfileKind, ProfileParameters, DEFAULT_AMPLITUDE, DEFAULT_CENTER_CELLS,
    DEFAULT_HALF_BAND_CELLS,
};
use crate::output::animation::{AnimationConfig, DEFAULT_CROP_DIVISIONS, DEFAULT_DELAY_MS};
use crate::output::naming::{compact_method, OutputLayout};
use crate::output::visualization::DEFAULT_CLIP;
use crate::solver::{Scenario, UpwindSolver, UPWIND_LABEL};

/// Failure while loading or interpreting a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown numerical method '{0}' (available: Euler Backward)")]
    UnknownMethod(String),
}

// =================================================================================================
// Sections
// =================================================================================================

/// Grid, velocity and time step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Advection velocity u (m/s)
    pub velocity: f64,
    /// Number of grid points Nx
    pub nx: usize,
    /// Cell width dx (m)
    pub dx: f64,
    /// Time step dt (s)
    pub dt: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            velocity: 10.0,
            nx: 101,
            dx: 500.0,
            dt: 40.0,
        }
    }
}

/// Shape and placement of the initial profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub kind: ProfileKind,
    /// Gaussian width in cells; ignored for rectangular profiles
    pub nr: Option<f64>,
    pub amplitude: f64,
    pub center_cells: f64,
    pub half_band_cells: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            kind: ProfileKind::Gaussian,
            nr: Some(10.0),
            amplitude: DEFAULT_AMPLITUDE,
            center_cells: DEFAULT_CENTER_CELLS,
            half_band_cells: DEFAULT_HALF_BAND_CELLS,
        }
    }
}

/// Length of the run and numerical method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of stored time points, initial state included
    pub time_points: usize,
    /// Method label, also used in file names
    pub method: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            time_points: 10,
            method: UPWIND_LABEL.to_string(),
        }
    }
}

/// Where and how artifacts are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub root: PathBuf,
    /// Surface values outside `±clip` are not drawn
    pub clip: f64,
    /// GIF frame delay in milliseconds
    pub delay_ms: u32,
    /// Crop divisions of the animation frames; `null` disables cropping
    pub crop_divisions: Option<u32>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("outputs"),
            clip: DEFAULT_CLIP,
            delay_ms: DEFAULT_DELAY_MS,
            crop_divisions: Some(DEFAULT_CROP_DIVISIONS),
        }
    }
}

// =================================================================================================
// Configuration
// =================================================================================================

/// Complete configuration of a run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub profile: ProfileConfig,
    pub run: RunConfig,
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Read a JSON configuration; missing fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    // ====================================== Overrides ============================================

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.physics.dt = dt;
        self
    }

    pub fn with_profile(mut self, kind: ProfileKind) -> Self {
        self.profile.kind = kind;
        self
    }

    pub fn with_nr(mut self, nr: Option<f64>) -> Self {
        self.profile.nr = nr;
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.run.method = method.into();
        self
    }

    pub fn with_time_points(mut self, time_points: usize) -> Self {
        self.run.time_points = time_points;
        self
    }

    pub fn with_delay_ms(mut self, delay_ms: u32) -> Self {
        self.output.delay_ms = delay_ms;
        self
    }

    pub fn with_crop_divisions(mut self, divisions: Option<u32>) -> Self {
        self.output.crop_divisions = divisions;
        self
    }

    // ====================================== Derived ==============================================

    /// Validated profile parameters
    pub fn parameters(&self) -> Result<ProfileParameters> {
        let physics = &self.physics;
        let params = ProfileParameters::new(physics.velocity, physics.dx, physics.nx)?
            .with_amplitude(self.profile.amplitude)?
            .with_center_cells(self.profile.center_cells)?
            .with_half_band_cells(self.profile.half_band_cells)?;
        Ok(params)
    }

    /// Initial profile; a width given for a rectangular profile is ignored
    pub fn initial_profile(&self) -> Result<InitialProfile> {
        InitialProfile::from_kind(self.profile.kind, self.profile.nr)
    }

    /// Gaussian width as it appears in file names
    pub fn name_width(&self) -> Option<f64> {
        match self.profile.kind {
            ProfileKind::Gaussian => self.profile.nr,
            ProfileKind::Rectangular => None,
        }
    }

    /// Scenario of the run
    pub fn scenario(&self) -> Result<Scenario> {
        Scenario::new(
            self.parameters()?,
            self.initial_profile()?,
            self.physics.dt,
            self.run.time_points,
        )
    }

    /// Numerical solver matching the method label
    ///
    /// Labels are compared without whitespace and case, so `"EulerBackward"`
    /// and `"euler backward"` both select the upwind scheme.
    pub fn numerical_solver(&self) -> std::result::Result<UpwindSolver, ConfigError> {
        let wanted = compact_method(&self.run.method).to_lowercase();
        if wanted == compact_method(UPWIND_LABEL).to_lowercase() || wanted == "upwind" {
            Ok(UpwindSolver::new())
        } else {
            Err(ConfigError::UnknownMethod(self.run.method.clone()))
        }
    }

    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(&self.output.root)
    }

    pub fn animation(&self) -> AnimationConfig {
        AnimationConfig {
            delay_ms: self.output.delay_ms,
            crop_divisions: self.output.crop_divisions,
        }
    }

    /// Clip bound of the surface frames
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when the bound is not a positive number.
    pub fn clip(&self) -> Result<f64> {
        let clip = self.output.clip;
        if clip.is_nan() || clip <= 0.0 {
            return Err(AdvectionError::invalid("clip", clip, "must be positive"));
        }
        Ok(clip)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_values() {
        let config = SimulationConfig::default();
        assert_eq!(config.physics.velocity, 10.0);
        assert_eq!(config.physics.nx, 101);
        assert_eq!(config.physics.dx, 500.0);
        assert_eq!(config.physics.dt, 40.0);
        assert_eq!(config.profile.kind, ProfileKind::Gaussian);
        assert_eq!(config.profile.nr, Some(10.0));
        assert_eq!(config.run.time_points, 10);
        assert_eq!(config.run.method, "Euler Backward");
        assert_eq!(config.output.root, PathBuf::from("outputs"));
        assert_eq!(config.animation(), AnimationConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{ "physics": { "dt": 60.0 }, "profile": { "kind": "rectg" } }"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.physics.dt, 60.0);
        assert_eq!(config.physics.nx, 101);
        assert_eq!(config.profile.kind, ProfileKind::Rectangular);
        assert_eq!(config.name_width(), None);
        assert_eq!(config.initial_profile().unwrap(), InitialProfile::Rectangular);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        let json = r#"{ "run": { "time_points": 4 }, "output": { "crop_divisions": null } }"#;
        file.write_all(json.as_bytes()).unwrap();

        let config = SimulationConfig::from_file(file.path()).unwrap();
        assert_eq!(config.run.time_points, 4);
        assert_eq!(config.output.crop_divisions, None);
        assert_eq!(config.scenario().unwrap().times().len(), 4);
    }

    #[test]
    fn test_missing_and_invalid_files() {
        assert!(matches!(
            SimulationConfig::from_file("/nonexistent/advect.json"),
            Err(ConfigError::Io { .. })
        ));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ physics: ").unwrap();
        assert!(matches!(
            SimulationConfig::from_file(file.path()),
            Err(ConfigError::Json { .. })
        ));
    }

    #[test]
    fn test_overrides_build_scenario() {
        let scenario = SimulationConfig::default()
            .with_dt(60.0)
            .with_nr(Some(5.0))
            .scenario()
            .unwrap();
        assert!((scenario.courant().value() - 1.2).abs() < 1e-12);
        assert_eq!(scenario.profile().width(), Some(5.0));
    }

    #[test]
    fn test_gaussian_requires_width() {
        let config = SimulationConfig::default().with_nr(None);
        assert!(config.scenario().is_err());
    }

    #[test]
    fn test_numerical_solver_lookup() {
        let config = SimulationConfig::default();
        assert!(config.numerical_solver().is_ok());
        assert!(config.clone().with_method("EulerBackward").numerical_solver().is_ok());
        assert!(matches!(
            config.with_method("Leapfrog").numerical_solver(),
            Err(ConfigError::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_clip_must_be_positive() {
        let mut config = SimulationConfig::default();
        assert_eq!(config.clip().unwrap(), 25.0);
        config.output.clip = 0.0;
        assert!(config.clip().is_err());
    }
}

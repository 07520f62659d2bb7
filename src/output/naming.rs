//! File names and directory layout of the run artifacts
//!
//! Every artifact of one run derives its name from a single base:
//!
//! ```text
//! {Method}_dt{dt}_CFL{C:.2}_dx{dx}_profile{tag}[_nr{nr}]_{kind}
//! ```
//!
//! where `{Method}` is the method label with whitespace removed. Lookups of
//! existing files ignore the Courant part, so a dataset written with another
//! velocity is still found from `dt`, `dx` and the profile alone.
//!
//! ```text
//! outputs/
//! ├── data/                 {base}.json
//! ├── figures/{Method}/     3D{ti:03}_{base}.png
//! └── animations/           {Method}_dt{dt}_profile{tag}[_nr{nr}]_{kind}_cropped.gif
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::ProfileKind;
use crate::physics::CourantNumber;
use crate::solver::{ResultKind, SimulationResult};

/// Method label without whitespace, used in file and directory names
pub fn compact_method(method: &str) -> String {
    method.split_whitespace().collect()
}

// =================================================================================================
// Run name
// =================================================================================================

/// Identity of a run as it appears in file names
#[derive(Debug, Clone, PartialEq)]
pub struct RunName {
    pub method: String,
    pub dt: f64,
    pub dx: f64,
    pub profile: ProfileKind,
    /// Gaussian width, only written for Gaussian runs
    pub width: Option<f64>,
    pub kind: ResultKind,
}

impl RunName {
    pub fn new(
        method: impl Into<String>,
        dt: f64,
        dx: f64,
        profile: ProfileKind,
        width: Option<f64>,
        kind: ResultKind,
    ) -> Self {
        Self {
            method: method.into(),
            dt,
            dx,
            profile,
            width: width.filter(|_| profile == ProfileKind::Gaussian),
            kind,
        }
    }

    pub fn from_result(result: &SimulationResult) -> Self {
        Self::new(
            result.method.clone(),
            result.dt,
            result.grid.spacing(),
            result.profile.kind(),
            result.profile.width(),
            result.kind,
        )
    }

    /// Directory name of the method (`"Euler Backward"` → `"EulerBackward"`)
    pub fn method_dir(&self) -> String {
        compact_method(&self.method)
    }

    fn width_part(&self) -> String {
        match self.width {
            Some(width) => format!("_nr{}", width),
            None => String::new(),
        }
    }

    /// Everything before the Courant value
    fn head(&self) -> String {
        format!("{}_dt{}_CFL", self.method_dir(), self.dt)
    }

    /// Everything after the Courant value
    fn tail(&self) -> String {
        format!(
            "_dx{}_profile{}{}_{}",
            self.dx,
            self.profile.tag(),
            self.width_part(),
            self.kind
        )
    }

    /// Base name of the run
    pub fn base(&self, courant: CourantNumber) -> String {
        format!("{}{}{}", self.head(), courant, self.tail())
    }

    /// Whether `stem` is the base name of this run, for any Courant value
    pub fn matches_base(&self, stem: &str) -> bool {
        stem.strip_prefix(&self.head())
            .and_then(|rest| rest.strip_suffix(&self.tail()))
            .is_some_and(|courant| courant.parse::<f64>().is_ok())
    }

    /// Dataset file name with the given extension
    pub fn dataset_file(&self, courant: CourantNumber, extension: &str) -> String {
        format!("{}.{}", self.base(courant), extension)
    }

    /// Frame file name of time index `time_index`
    pub fn frame_file(&self, courant: CourantNumber, time_index: usize) -> String {
        format!("3D{:03}_{}.png", time_index, self.base(courant))
    }

    /// Whether `file_name` is a frame of this run, for any Courant value
    pub fn matches_frame(&self, file_name: &str) -> bool {
        file_name
            .strip_suffix(".png")
            .and_then(|stem| stem.strip_prefix("3D"))
            .and_then(|stem| stem.split_once('_'))
            .is_some_and(|(index, base)| {
                !index.is_empty()
                    && index.bytes().all(|b| b.is_ascii_digit())
                    && self.matches_base(base)
            })
    }

    /// Animation file name (no Courant or dx part)
    pub fn animation_file(&self) -> String {
        format!(
            "{}_dt{}_profile{}{}_{}_cropped.gif",
            self.method_dir(),
            self.dt,
            self.profile.tag(),
            self.width_part(),
            self.kind
        )
    }
}

// =================================================================================================
// Directory layout
// =================================================================================================

/// Output directories under one root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::new("outputs")
    }
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn figures_dir(&self, name: &RunName) -> PathBuf {
        self.root.join("figures").join(name.method_dir())
    }

    pub fn animations_dir(&self) -> PathBuf {
        self.root.join("animations")
    }

    pub fn dataset_path(&self, name: &RunName, courant: CourantNumber, extension: &str) -> PathBuf {
        self.data_dir().join(name.dataset_file(courant, extension))
    }

    pub fn frame_path(&self, name: &RunName, courant: CourantNumber, time_index: usize) -> PathBuf {
        self.figures_dir(name).join(name.frame_file(courant, time_index))
    }

    pub fn animation_path(&self, name: &RunName) -> PathBuf {
        self.animations_dir().join(name.animation_file())
    }

    /// Datasets of `name` in the data directory, sorted by path
    ///
    /// A missing directory yields an empty list.
    pub fn find_datasets(&self, name: &RunName, extension: &str) -> io::Result<Vec<PathBuf>> {
        list_sorted(&self.data_dir(), |file_name| {
            Path::new(file_name)
                .extension()
                .is_some_and(|ext| ext == extension)
                && Path::new(file_name)
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .is_some_and(|stem| name.matches_base(stem))
        })
    }

    /// Frames of `name` in its figures directory, sorted by path
    pub fn find_frames(&self, name: &RunName) -> io::Result<Vec<PathBuf>> {
        list_sorted(&self.figures_dir(name), |file_name| name.matches_frame(file_name))
    }

    /// File names in the data directory, for error messages
    pub fn list_data(&self) -> io::Result<Vec<String>> {
        Ok(list_sorted(&self.data_dir(), |_| true)?
            .into_iter()
            .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(String::from))
            .collect())
    }
}

fn list_sorted(dir: &Path, keep: impl Fn(&str) -> bool) -> io::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let keep_entry = entry
            .file_name()
            .to_str()
            .is_some_and(|file_name| keep(file_name));
        if keep_entry && entry.file_type()?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();

    Ok(paths)
}

// =================================================================================================
// Tests
// =================================================================================================

//! 3D surface frames of the concentration field
//!
//! Each snapshot is drawn as a surface over the grid index `X` and the
//! synthetic axis `Y = [-dx/2, dx/2]`. Values outside `±clip` are masked and
//! left undrawn, so a diverging run shows holes instead of rescaling the axes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use advect_rs::output::visualization::{plot_surface, SurfaceFrame};
//!
//! for k in 0..result.len() {
//!     let frame = SurfaceFrame::from_result(&result, k)?;
//!     plot_surface(&frame, &format!("3D{k:03}.png"), None)?;
//! }
//! ```

use std::error::Error;

use ndarray::Array2;
use plotters::prelude::*;

use super::config::{diverging_color, PlotConfig, NO_TITLE};
use crate::error::{AdvectionError, Result};
use crate::models::ProfileKind;
use crate::physics::CourantNumber;
use crate::solver::SimulationResult;

/// Default clipping bound of the surface values
pub const DEFAULT_CLIP: f64 = 25.0;

// =================================================================================================
// Frame
// =================================================================================================

/// One snapshot ready to be drawn
///
/// `surface` is the 2 × Nx mirrored field: both rows hold the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceFrame {
    pub surface: Array2<f64>,
    /// Coordinates of the synthetic axis, `[-dx/2, dx/2]`
    pub y: [f64; 2],
    pub method: String,
    pub time_index: usize,
    pub dt: f64,
    pub courant: CourantNumber,
    pub profile: ProfileKind,
    /// Values outside `[-clip, clip]` are not drawn
    pub clip: f64,
}

impl SurfaceFrame {
    /// Frame of snapshot `time_index` of `result`, clipped at [`DEFAULT_CLIP`]
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when `time_index` is past the last snapshot.
    pub fn from_result(result: &SimulationResult, time_index: usize) -> Result<Self> {
        let snapshot = result.snapshot(time_index).ok_or(AdvectionError::invalid(
            "time_index",
            time_index as f64,
            "no snapshot at this time index",
        ))?;
        let dx = result.grid.spacing();

        Ok(Self {
            surface: snapshot.mirrored(),
            y: [-dx / 2.0, dx / 2.0],
            method: result.method.clone(),
            time_index,
            dt: result.dt,
            courant: result.courant,
            profile: result.profile.kind(),
            clip: DEFAULT_CLIP,
        })
    }

    /// Builder pattern: set the clipping bound
    pub fn with_clip(mut self, clip: f64) -> Self {
        self.clip = clip;
        self
    }

    /// Number of grid values along `X`
    pub fn nx(&self) -> usize {
        self.surface.ncols()
    }

    /// Time of the frame, `time_index * dt`
    pub fn time(&self) -> f64 {
        self.time_index as f64 * self.dt
    }

    /// Surface with values outside `[-clip, clip]` replaced by NaN
    pub fn masked(&self) -> Array2<f64> {
        let clip = self.clip;
        self.surface
            .mapv(|v| if (-clip..=clip).contains(&v) { v } else { f64::NAN })
    }

    /// Default title: method, profile, time step, Courant number and time
    pub fn title(&self) -> String {
        format!(
            "{} (Profile: {})  dt: {}, CFL: {}  t: {} s",
            self.method,
            self.profile,
            self.dt,
            self.courant,
            self.time()
        )
    }
}

// =================================================================================================
// Rendering
// =================================================================================================

/// Render a frame to PNG (or SVG when `output_path` ends in `.svg`)
///
/// # Arguments
///
/// * `frame` - Mirrored snapshot and its labels
/// * `output_path` - Path to save the plot
/// * `config` - Optional plot configuration; an empty title is replaced by
///   [`SurfaceFrame::title`]
///
/// # Example
///
/// ```rust,ignore
/// plot_surface(&frame, "outputs/figures/EulerBackward/3D000_run.png", None)?;
/// ```
pub fn plot_surface(
    frame: &SurfaceFrame,
    output_path: &str,
    config: Option<&PlotConfig>,
) -> std::result::Result<(), Box<dyn Error>> {
    if frame.nx() < 2 {
        return Err("A surface needs at least 2 grid values".into());
    }
    if frame.clip.is_nan() || frame.clip <= 0.0 {
        return Err(format!("Clipping bound must be positive, got {}", frame.clip).into());
    }

    let default_config = PlotConfig::surface(NO_TITLE);
    let config = config.unwrap_or(&default_config);

    let ext = std::path::Path::new(output_path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("png");

    match ext {
        "svg" => {
            let backend = SVGBackend::new(output_path, (config.width, config.height));
            draw_surface_on_area(backend, frame, config)
        }
        _ => {
            let backend = BitMapBackend::new(output_path, (config.width, config.height));
            draw_surface_on_area(backend, frame, config)
        }
    }?;

    log::debug!("Surface frame {} written to {}", frame.time_index, output_path);
    Ok(())
}

/// Implementation for surface plotting with concrete backend
fn draw_surface_on_area<DB: DrawingBackend>(
    backend: DB,
    frame: &SurfaceFrame,
    config: &PlotConfig,
) -> std::result::Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&config.background)?;

    let title = if config.title.is_empty() {
        frame.title()
    } else {
        config.title.clone()
    };

    let clip = frame.clip;
    let x_max = (frame.nx() - 1) as f64;
    let [y_low, y_high] = frame.y;

    // plotters 3D: x horizontal, y vertical, z depth
    let mut chart = ChartBuilder::on(&root)
        .caption(&title, ("sans-serif", 24).into_font())
        .margin(20)
        .build_cartesian_3d(-1.0..x_max, -clip..clip, y_low..y_high)?;

    chart.with_projection(|mut projection| {
        projection.pitch = config.pitch;
        projection.yaw = config.yaw;
        projection.scale = 0.9;
        projection.into_matrix()
    });

    if config.show_grid {
        chart
            .configure_axes()
            .light_grid_style(BLACK.mix(0.15))
            .max_light_lines(3)
            .draw()?;
    }

    let masked = frame.masked();
    let edge = BLACK.mix(0.3).stroke_width(1);

    // one quad per cell between X = j and X = j + 1
    let cells = (0..frame.nx() - 1).filter_map(|j| {
        let corners = [
            masked[[0, j]],
            masked[[0, j + 1]],
            masked[[1, j + 1]],
            masked[[1, j]],
        ];
        if corners.iter().any(|c| c.is_nan()) {
            return None;
        }
        let x0 = j as f64;
        let x1 = x0 + 1.0;
        Some((
            vec![
                (x0, corners[0], y_low),
                (x1, corners[1], y_low),
                (x1, corners[2], y_high),
                (x0, corners[3], y_high),
            ],
            corners.iter().sum::<f64>() / 4.0,
        ))
    });

    for (points, mean) in cells {
        let fill = diverging_color(mean, clip).mix(0.9).filled();
        chart.draw_series(std::iter::once(Polygon::new(points.clone(), fill)))?;

        let mut outline = points;
        outline.push(outline[0]);
        chart.draw_series(std::iter::once(PathElement::new(outline, edge)))?;
    }

    root.present()?;

    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InitialProfile, ProfileParameters};
    use crate::solver::{Scenario, Solver, UpwindSolver};
    use tempfile::NamedTempFile;

    fn gaussian_result() -> SimulationResult {
        let params = ProfileParameters::new(10.0, 500.0, 101).unwrap();
        let profile = InitialProfile::gaussian(10.0).unwrap();
        let scenario = Scenario::new(params, profile, 40.0, 3).unwrap();
        UpwindSolver::new().solve(&scenario).unwrap()
    }

    #[test]
    fn test_frame_from_result() {
        let frame = SurfaceFrame::from_result(&gaussian_result(), 2).unwrap();
        assert_eq!(frame.surface.dim(), (2, 101));
        assert_eq!(frame.y, [-250.0, 250.0]);
        assert_eq!(frame.time(), 80.0);
        assert_eq!(frame.clip, DEFAULT_CLIP);
        assert_eq!(
            frame.title(),
            "Euler Backward (Profile: gauss)  dt: 40, CFL: 0.80  t: 80 s"
        );
    }

    #[test]
    fn test_frame_index_out_of_range() {
        assert!(SurfaceFrame::from_result(&gaussian_result(), 3).is_err());
    }

    #[test]
    fn test_masking_outside_clip() {
        let mut frame = SurfaceFrame::from_result(&gaussian_result(), 0)
            .unwrap()
            .with_clip(5.0);
        frame.surface[[0, 3]] = -7.0;

        let masked = frame.masked();
        assert!(masked[[0, 51]].is_nan());
        assert!(masked[[0, 3]].is_nan());
        assert!(!masked[[0, 0]].is_nan());
        assert_eq!(masked[[1, 3]], frame.surface[[1, 3]]);
    }

    #[test]
    fn test_plot_surface_png() {
        let frame = SurfaceFrame::from_result(&gaussian_result(), 1).unwrap();
        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("png");

        let result = plot_surface(&frame, path.to_str().unwrap(), None);
        assert!(result.is_ok(), "{:?}", result.err());
        assert!(path.exists());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_plot_surface_svg_with_holes() {
        let frame = SurfaceFrame::from_result(&gaussian_result(), 0)
            .unwrap()
            .with_clip(5.0);
        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("svg");

        let config = PlotConfig::surface("Clipped");
        assert!(plot_surface(&frame, path.to_str().unwrap(), Some(&config)).is_ok());
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Clipped"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_plot_surface_rejects_bad_clip() {
        let frame = SurfaceFrame::from_result(&gaussian_result(), 0)
            .unwrap()
            .with_clip(0.0);
        assert!(plot_surface(&frame, "unused.png", None).is_err());
    }
}

//! Numerical vs analytical profile plots
//!
//! Overlays the two snapshots of one time point along the grid, which makes
//! the numerical diffusion of the upwind scheme (lower, wider peak) visible.
//!
//! # Usage
//!
//! ```rust,ignore
//! use advect_rs::output::visualization::plot_profile_comparison;
//!
//! let numerical = UpwindSolver::new().solve(&scenario)?;
//! let analytical = AnalyticalSolver::new().solve(&scenario)?;
//! plot_profile_comparison(&numerical, &analytical, 9, "comparison.png", None)?;
//! ```

use plotters::prelude::*;
use std::error::Error;

use super::config::PlotConfig;
use crate::solver::SimulationResult;

/// Plot the numerical and analytical snapshots at `time_index`
///
/// # Arguments
///
/// * `numerical` - Result of a time-stepping solver
/// * `analytical` - Exact solution over the same scenario
/// * `time_index` - Index of the time point to compare
/// * `output_path` - Path to save the plot (PNG or SVG)
/// * `config` - Optional plot configuration
///
/// # Errors
///
/// Fails when the grids differ or `time_index` is out of range in either result.
pub fn plot_profile_comparison(
    numerical: &SimulationResult,
    analytical: &SimulationResult,
    time_index: usize,
    output_path: &str,
    config: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    if numerical.grid != analytical.grid {
        return Err("Numerical and analytical results use different grids".into());
    }

    let numerical_snapshot = numerical
        .snapshot(time_index)
        .ok_or_else(|| format!("No numerical snapshot at time index {}", time_index))?;
    let analytical_snapshot = analytical
        .snapshot(time_index)
        .ok_or_else(|| format!("No analytical snapshot at time index {}", time_index))?;

    let positions = numerical.grid.positions();
    let time = numerical.time_points[time_index];

    let profiles = vec![
        (
            format!("{} (numerical)", numerical.method),
            numerical_snapshot.to_vec(),
        ),
        ("Analytical".to_string(), analytical_snapshot.to_vec()),
    ];

    // Create default config if needed (avoid temporary value)
    let default_config = PlotConfig::profile_comparison(format!(
        "{} vs analytical, t = {} s (CFL {})",
        numerical.method, time, numerical.courant
    ));
    let config = config.unwrap_or(&default_config);

    let ext = std::path::Path::new(output_path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("png");

    match ext {
        "svg" => {
            let backend = SVGBackend::new(output_path, (config.width, config.height));
            draw_profiles_on_area(backend, &positions, &profiles, config)
        }
        _ => {
            let backend = BitMapBackend::new(output_path, (config.width, config.height));
            draw_profiles_on_area(backend, &positions, &profiles, config)
        }
    }
}

/// Implementation for profile plotting with concrete backend
fn draw_profiles_on_area<DB: DrawingBackend>(
    backend: DB,
    positions: &[f64],
    profiles: &[(String, Vec<f64>)],
    config: &PlotConfig,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&config.background)?;

    let max_x = positions.last().copied().unwrap_or(1.0).max(1e-10);
    let (min_c, max_c) = profiles
        .iter()
        .flat_map(|(_, values)| values.iter().copied())
        .fold((0.0_f64, 1e-10_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let margin = 0.1 * (max_c - min_c);

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 32).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..max_x, (min_c - margin)..(max_c + margin))?;

    if config.show_grid {
        chart
            .configure_mesh()
            .x_desc(&config.xlabel)
            .y_desc(&config.ylabel)
            .x_label_formatter(&|x| format!("{:.0}", x))
            .y_label_formatter(&|y| format!("{:.2}", y))
            .draw()?;
    }

    for (index, (label, values)) in profiles.iter().enumerate() {
        let color = config.get_series_color(index);

        chart
            .draw_series(LineSeries::new(
                positions.iter().copied().zip(values.iter().copied()),
                ShapeStyle::from(&color).stroke_width(config.line_width),
            ))?
            .label(label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(config.background.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;

    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================

//! Example: Gaussian and rectangular pulses at several Courant numbers
//!
//! Runs the upwind scheme and the exact solution side by side for both
//! profiles and three time steps, then prints the peak height and the RMS
//! difference after the last step:
//!
//! - `dt = 25 s`: C = 0.5, diffusive
//! - `dt = 50 s`: C = 1.0, exact translation
//! - `dt = 60 s`: C = 1.2, outside the stability limit (reference run)
//!
//! **Grid**: 101 points, dx = 500 m, u = 10 m/s, nr = 10, 10 time points.
//!
//! Plots of the C = 1.2 Gaussian run are written to the system temp directory.
//!
//! ```bash
//! cargo run --example gaussian_pulse
//! ```

use advect_rs::{
    models::{InitialProfile, ProfileParameters},
    output::{plot_profile_comparison, plot_surface, SurfaceFrame},
    solver::{compare, AnalyticalSolver, Scenario, Solver, UpwindSolver},
};

use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    println!("═══════════════════════════════════════════════════════");
    println!("  1D Periodic Advection - Upwind vs Exact");
    println!("═══════════════════════════════════════════════════════\n");

    // ====== Grid and velocity ======

    let velocity = 10.0; // m/s
    let dx = 500.0; // m
    let nx = 101;
    let time_points = 10;

    let params = ProfileParameters::new(velocity, dx, nx)?;
    println!("Grid:");
    println!("  u  : {} m/s", velocity);
    println!("  dx : {} m", dx);
    println!("  Nx : {}", nx);
    println!("  L  : {} m (period)\n", params.period());

    let profiles = [
        ("Gaussian", InitialProfile::gaussian(10.0)?),
        ("Rectangular", InitialProfile::Rectangular),
    ];
    let time_steps = [25.0, 50.0, 60.0];

    println!("{:<12} {:>6} {:>6} {:>10} {:>10} {:>12} {:>10}",
             "Profile", "dt", "CFL", "Peak num", "Peak ana", "RMS (last)", "Time");
    println!("{:-<72}", "");

    for (label, profile) in &profiles {
        for &dt in &time_steps {
            let scenario = Scenario::new(params, *profile, dt, time_points)?;
            let started = Instant::now();

            let numerical = UpwindSolver::new().solve(&scenario)?;
            let analytical = AnalyticalSolver::new().solve(&scenario)?;
            let rms = compare(&numerical, &analytical)?;

            let elapsed = started.elapsed().as_secs_f64() * 1e3;
            let peak = |result: &advect_rs::solver::SimulationResult| {
                result
                    .final_snapshot()
                    .and_then(|snapshot| snapshot.peak())
                    .map_or(f64::NAN, |(_, value)| value)
            };

            println!("{:<12} {:>6} {:>6} {:>10.4} {:>10.4} {:>12.6} {:>8.2}ms",
                     label,
                     dt,
                     scenario.courant(),
                     peak(&numerical),
                     peak(&analytical),
                     rms.last().copied().unwrap_or(0.0),
                     elapsed);
        }
    }

    // ====== Plots of the reference run ======

    let scenario = Scenario::new(params, profiles[0].1, 60.0, time_points)?;
    let numerical = UpwindSolver::new().solve(&scenario)?;
    let analytical = AnalyticalSolver::new().solve(&scenario)?;

    let tmp_dir = std::env::temp_dir();
    let last = numerical.len() - 1;

    let surface_path = tmp_dir.join("advect_gaussian_surface.png");
    let frame = SurfaceFrame::from_result(&numerical, last)?;
    plot_surface(&frame, &surface_path.to_string_lossy(), None)?;

    let comparison_path = tmp_dir.join("advect_gaussian_comparison.png");
    let comparison = comparison_path.to_string_lossy();
    plot_profile_comparison(&numerical, &analytical, last, &comparison, None)?;

    println!("\nPlots written:");
    println!("  {}", surface_path.display());
    println!("  {}", comparison_path.display());

    Ok(())
}

//! Command-line driver
//!
//! ```text
//! advect run --dt 60 --profile gauss --nr 10 --plot
//! advect plot --dt 60 --profile gauss --nr 10 --numerical "Euler Backward"
//! advect animate --dt 60 --profile gauss --nr 10 --numerical "Euler Backward" --duration 200
//! ```
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` for per-step and
//! per-file messages.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};

use advect_rs::config::SimulationConfig;
use advect_rs::models::ProfileKind;
use advect_rs::output::{
    assemble_gif, load_dataset, plot_profile_comparison, plot_surface, CsvConfig, CsvExporter,
    CsvMetadata, DatasetExporter, Exporter, OutputLayout, RunName, SurfaceFrame,
};
use advect_rs::solver::{compare, AnalyticalSolver, ResultKind, SimulationResult, Solver};

type CliResult<T> = Result<T, Box<dyn Error>>;

// =================================================================================================
// Arguments
// =================================================================================================

#[derive(Debug, Parser)]
#[command(
    name = "advect",
    version,
    about = "1D periodic linear advection: upwind vs exact solution"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the simulation and store numerical and analytical datasets
    Run {
        #[command(flatten)]
        common: CommonArgs,

        /// Numerical method label
        #[arg(long)]
        method: Option<String>,

        /// Number of stored time points, initial state included
        #[arg(long)]
        steps: Option<usize>,

        /// Also render the surface frames and a profile comparison
        #[arg(long)]
        plot: bool,

        /// Also write each result as a CSV table next to its dataset
        #[arg(long)]
        csv: bool,

        /// Also write each result as NetCDF next to its dataset (`netcdf` feature)
        #[arg(long)]
        netcdf: bool,
    },

    /// Render the surface frames of a stored dataset
    Plot {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Assemble the frames of a run into a cropped GIF
    Animate {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        source: SourceArgs,

        /// Delay between frames in milliseconds
        #[arg(long)]
        duration: Option<u32>,

        /// Crop divisions: keep rows h/espacio to (espacio-1)h/espacio
        #[arg(long)]
        espacio: Option<u32>,

        /// Keep the frames uncropped
        #[arg(long, conflicts_with = "espacio")]
        no_crop: bool,
    },
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Time step in seconds
    #[arg(long)]
    dt: Option<f64>,

    /// Initial profile
    #[arg(long, value_enum)]
    profile: Option<ProfileArg>,

    /// Gaussian width in cells (required for gauss)
    #[arg(long)]
    nr: Option<f64>,

    /// JSON configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileArg {
    Gauss,
    Rectg,
}

impl From<ProfileArg> for ProfileKind {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Gauss => ProfileKind::Gaussian,
            ProfileArg::Rectg => ProfileKind::Rectangular,
        }
    }
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Use the numerical result of METHOD
    #[arg(long, value_name = "METHOD")]
    numerical: Option<String>,

    /// Use the analytical result stored alongside METHOD
    #[arg(long, value_name = "METHOD")]
    analytical: Option<String>,
}

impl SourceArgs {
    fn resolve(&self) -> CliResult<(String, ResultKind)> {
        match (&self.numerical, &self.analytical) {
            (Some(method), None) => Ok((method.clone(), ResultKind::Numerical)),
            (None, Some(method)) => Ok((method.clone(), ResultKind::Analytical)),
            _ => Err("exactly one of --numerical or --analytical is required".into()),
        }
    }
}

impl CommonArgs {
    /// Configuration file (or defaults) with the flags applied
    ///
    /// A Gaussian width comes from `--nr` or from the `--config` file, never
    /// from the built-in defaults.
    fn load(&self) -> CliResult<SimulationConfig> {
        let mut config = match self.config.as_deref() {
            Some(path) => SimulationConfig::from_file(path)?,
            None => SimulationConfig::default().with_nr(None),
        };

        if let Some(dt) = self.dt {
            config = config.with_dt(dt);
        }
        if let Some(profile) = self.profile {
            config = config.with_profile(profile.into());
        }
        if self.nr.is_some() {
            config = config.with_nr(self.nr);
        }

        match config.profile.kind {
            ProfileKind::Gaussian if config.profile.nr.is_none() => {
                return Err("--nr is required for the gauss profile".into());
            }
            ProfileKind::Rectangular => {
                if self.nr.is_some() {
                    log::warn!("--nr is ignored for the rectg profile");
                }
                config = config.with_nr(None);
            }
            ProfileKind::Gaussian => {}
        }

        Ok(config)
    }
}

// =================================================================================================
// Commands
// =================================================================================================

fn render_frames(result: &SimulationResult, layout: &OutputLayout, clip: f64) -> CliResult<()> {
    let name = RunName::from_result(result);
    std::fs::create_dir_all(layout.figures_dir(&name))?;

    for k in 0..result.len() {
        let frame = SurfaceFrame::from_result(result, k)?.with_clip(clip);
        let path = layout.frame_path(&name, result.courant, k);
        plot_surface(&frame, &path.to_string_lossy(), None)?;
    }

    log::info!(
        "{} frames written to {}",
        result.len(),
        layout.figures_dir(&name).display()
    );
    Ok(())
}

#[cfg(feature = "netcdf")]
fn write_netcdf(result: &SimulationResult, path: &Path) -> CliResult<()> {
    advect_rs::output::NetCdfExporter::new().export(result, path)?;
    log::info!("NetCDF written to {}", path.display());
    Ok(())
}

#[cfg(not(feature = "netcdf"))]
fn write_netcdf(_result: &SimulationResult, _path: &Path) -> CliResult<()> {
    Err("--netcdf needs a build with the `netcdf` feature".into())
}

fn run(
    common: &CommonArgs,
    method: Option<&str>,
    steps: Option<usize>,
    plot: bool,
    csv: bool,
    netcdf: bool,
) -> CliResult<()> {
    if netcdf && !cfg!(feature = "netcdf") {
        return Err("--netcdf needs a build with the `netcdf` feature".into());
    }

    let mut config = common.load()?;
    if let Some(method) = method {
        config = config.with_method(method);
    }
    if let Some(steps) = steps {
        config = config.with_time_points(steps);
    }

    let scenario = config.scenario()?;
    log::info!("Scenario: {}", scenario);

    let numerical = config.numerical_solver()?.solve(&scenario)?;
    let analytical = AnalyticalSolver::new().solve(&scenario)?;

    for (k, rms) in compare(&numerical, &analytical)?.iter().enumerate() {
        log::info!(
            "t = {:>6} s  RMS(numerical - analytical) = {:.6}",
            numerical.time_points[k],
            rms
        );
    }

    let layout = config.layout();
    let exporter = DatasetExporter::new();
    for result in [&numerical, &analytical] {
        let name = RunName::from_result(result);
        let path = layout.dataset_path(&name, result.courant, exporter.extension());
        exporter.export(result, &path)?;
        log::info!("Dataset written to {}", path.display());

        if csv {
            let csv_config = CsvConfig::default().with_metadata(CsvMetadata::from_result(result));
            let csv_path = path.with_extension("csv");
            CsvExporter::new(csv_config).export(result, &csv_path)?;
            log::info!("CSV written to {}", csv_path.display());
        }

        if netcdf {
            write_netcdf(result, &path.with_extension("nc"))?;
        }

        if plot {
            render_frames(result, &layout, config.clip()?)?;
        }
    }

    if plot && !numerical.is_empty() {
        let name = RunName::from_result(&numerical);
        let path = layout
            .figures_dir(&name)
            .join(format!("profile_{}.png", name.base(numerical.courant)));
        plot_profile_comparison(
            &numerical,
            &analytical,
            numerical.len() - 1,
            &path.to_string_lossy(),
            None,
        )?;
        log::info!("Profile comparison written to {}", path.display());
    }

    Ok(())
}

fn plot(common: &CommonArgs, source: &SourceArgs) -> CliResult<()> {
    let config = common.load()?;
    let (method, kind) = source.resolve()?;
    let layout = config.layout();

    let name = RunName::new(
        method,
        config.physics.dt,
        config.physics.dx,
        config.profile.kind,
        config.name_width(),
        kind,
    );

    let datasets = layout.find_datasets(&name, DatasetExporter::new().extension())?;
    let Some(path) = datasets.first() else {
        let available = layout.list_data()?;
        if available.is_empty() {
            log::error!("{} holds no datasets", layout.data_dir().display());
        } else {
            log::error!("Datasets in {}: {}", layout.data_dir().display(), available.join(", "));
        }
        return Err(format!(
            "no dataset for {} (dt {}, profile {}) in {}",
            name.method, name.dt, name.profile, layout.data_dir().display()
        )
        .into());
    };
    if datasets.len() > 1 {
        log::warn!("{} matching datasets, using {}", datasets.len(), path.display());
    }

    let result = load_dataset(path)?;
    log::info!("Loaded {}", result.summary());

    render_frames(&result, &layout, config.clip()?)
}

fn animate(
    common: &CommonArgs,
    source: &SourceArgs,
    duration: Option<u32>,
    espacio: Option<u32>,
    no_crop: bool,
) -> CliResult<()> {
    let mut config = common.load()?;
    if let Some(duration) = duration {
        config = config.with_delay_ms(duration);
    }
    if let Some(espacio) = espacio {
        config = config.with_crop_divisions(Some(espacio));
    }
    if no_crop {
        config = config.with_crop_divisions(None);
    }

    let (method, kind) = source.resolve()?;
    let layout = config.layout();
    let name = RunName::new(
        method,
        config.physics.dt,
        config.physics.dx,
        config.profile.kind,
        config.name_width(),
        kind,
    );

    let frames = layout.find_frames(&name)?;
    if frames.is_empty() {
        return Err(format!("no frames in {}", layout.figures_dir(&name).display()).into());
    }
    log::info!("{} frames found in {}", frames.len(), layout.figures_dir(&name).display());

    assemble_gif(&frames, &layout.animation_path(&name), &config.animation())?;
    Ok(())
}

// =================================================================================================
// Entry point
// =================================================================================================

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let outcome = match &cli.command {
        Command::Run {
            common,
            method,
            steps,
            plot: with_plots,
            csv,
            netcdf,
        } => run(common, method.as_deref(), *steps, *with_plots, *csv, *netcdf),
        Command::Plot { common, source } => plot(common, source),
        Command::Animate {
            common,
            source,
            duration,
            espacio,
            no_crop,
        } => animate(common, source, *duration, *espacio, *no_crop),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_source_is_mutually_exclusive() {
        let parsed = Cli::try_parse_from([
            "advect", "plot", "--dt", "60", "--numerical", "Euler Backward", "--analytical", "x",
        ]);
        assert!(parsed.is_err());

        let missing = Cli::try_parse_from(["advect", "animate", "--dt", "60"]);
        assert!(missing.is_err());
    }

    #[test]
    fn test_rectangular_drops_width() {
        let args = ["advect", "run", "--profile", "rectg", "--nr", "4"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Run { common, .. } = cli.command else {
            panic!("expected run");
        };
        let config = common.load().unwrap();
        assert_eq!(config.profile.kind, ProfileKind::Rectangular);
        assert_eq!(config.profile.nr, None);
    }

    #[test]
    fn test_profile_value_names() {
        assert!(Cli::try_parse_from(["advect", "run", "--profile", "triangle"]).is_err());
        let args = ["advect", "run", "--profile", "gauss", "--nr", "5"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Run { common, .. } = cli.command else {
            panic!("expected run");
        };
        assert_eq!(common.load().unwrap().profile.nr, Some(5.0));
    }

    #[test]
    fn test_gauss_without_nr_fails() {
        for args in [
            vec!["advect", "run", "--profile", "gauss"],
            vec!["advect", "run"],
            vec!["advect", "plot", "--dt", "60", "--numerical", "Euler Backward"],
        ] {
            let cli = Cli::try_parse_from(args).unwrap();
            let common = match cli.command {
                Command::Run { common, .. }
                | Command::Plot { common, .. }
                | Command::Animate { common, .. } => common,
            };
            assert!(common.load().is_err());
        }
    }

    #[cfg(not(feature = "netcdf"))]
    #[test]
    fn test_netcdf_flag_needs_feature() {
        let cli = Cli::try_parse_from(["advect", "run", "--nr", "10", "--netcdf"]).unwrap();
        let Command::Run { common, .. } = &cli.command else {
            panic!("expected run");
        };
        assert!(run(common, None, None, false, false, true).is_err());
    }

    #[test]
    fn test_gauss_width_from_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "profile": {{ "kind": "gauss", "nr": 4.0 }} }}"#).unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let cli = Cli::try_parse_from(["advect", "run", "--config", path.as_str()]).unwrap();
        let Command::Run { common, .. } = cli.command else {
            panic!("expected run");
        };
        assert_eq!(common.load().unwrap().profile.nr, Some(4.0));
    }
}

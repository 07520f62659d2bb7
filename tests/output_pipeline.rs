//! End-to-end output pipeline: dataset files, reload, frames and animation,
//! all under a temporary output root

use std::fs;

use advect_rs::config::SimulationConfig;
use advect_rs::output::{
    assemble_gif, load_dataset, plot_surface, CsvConfig, CsvExporter, CsvMetadata,
    DatasetExporter, Exporter, OutputLayout, RunName, SurfaceFrame,
};
use advect_rs::solver::{AnalyticalSolver, ResultKind, Solver};
use approx::assert_relative_eq;
use tempfile::TempDir;

mod common;
use common::{reference_scenario, solve_both};

#[test]
fn test_datasets_are_found_and_reloaded() {
    let dir = TempDir::new().unwrap();
    let layout = OutputLayout::new(dir.path());
    let (numerical, analytical) = solve_both(&reference_scenario(4));

    let exporter = DatasetExporter::new();
    for result in [&numerical, &analytical] {
        let name = RunName::from_result(result);
        exporter
            .export(result, &layout.dataset_path(&name, result.courant, exporter.extension()))
            .unwrap();
    }

    // Lookup by dt, dx and profile only, as the plot command does
    let query = RunName::new(
        "EulerBackward",
        60.0,
        500.0,
        numerical.profile.kind(),
        Some(10.0),
        ResultKind::Analytical,
    );
    let found = layout.find_datasets(&query, "json").unwrap();
    assert_eq!(found.len(), 1);
    assert!(found[0]
        .file_name()
        .unwrap()
        .to_string_lossy()
        .ends_with("_CFL1.20_dx500_profilegauss_nr10_analytical.json"));

    let reloaded = load_dataset(&found[0]).unwrap();
    assert_eq!(reloaded.kind, ResultKind::Analytical);
    for (a, b) in reloaded.snapshots.iter().zip(&analytical.snapshots) {
        for j in 0..a.len() {
            assert_relative_eq!(a[j], b[j], epsilon = 1e-12);
        }
    }
    assert_eq!(layout.list_data().unwrap().len(), 2);
}

#[test]
fn test_csv_next_to_dataset() {
    let dir = TempDir::new().unwrap();
    let layout = OutputLayout::new(dir.path());
    let result = AnalyticalSolver::new().solve(&reference_scenario(3)).unwrap();
    let name = RunName::from_result(&result);

    let path = layout.dataset_path(&name, result.courant, "csv");
    let config = CsvConfig::default().with_metadata(CsvMetadata::from_result(&result));
    CsvExporter::new(config).export(&result, &path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("# Method: Euler Backward (analytical)"));
    assert!(content.contains("# Profile: gauss (nr = 10)"));
    let rows: Vec<&str> = content.lines().filter(|l| !l.starts_with('#')).collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].split(',').count(), 102);
}

#[test]
fn test_frames_to_animation() {
    let dir = TempDir::new().unwrap();
    let config = SimulationConfig::default().with_dt(60.0).with_time_points(3);
    let layout = OutputLayout::new(dir.path());
    let result = config.numerical_solver().unwrap().solve(&config.scenario().unwrap()).unwrap();
    let name = RunName::from_result(&result);

    fs::create_dir_all(layout.figures_dir(&name)).unwrap();
    for k in (0..result.len()).rev() {
        let frame = SurfaceFrame::from_result(&result, k).unwrap();
        let path = layout.frame_path(&name, result.courant, k);
        plot_surface(&frame, path.to_str().unwrap(), None).unwrap();
    }

    let frames = layout.find_frames(&name).unwrap();
    assert_eq!(frames.len(), 3);
    assert!(frames[0].to_string_lossy().contains("3D000_EulerBackward_dt60_CFL1.20"));

    let gif = layout.animation_path(&name);
    assemble_gif(&frames, &gif, &config.animation()).unwrap();
    assert!(gif.ends_with("animations/EulerBackward_dt60_profilegauss_nr10_numerical_cropped.gif"));
    assert!(fs::metadata(&gif).unwrap().len() > 0);
}

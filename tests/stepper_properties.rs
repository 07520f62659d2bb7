//! Properties of the initial profiles and the upwind stencil that hold for
//! every valid grid, width and Courant number

use advect_rs::error::AdvectionError;
use advect_rs::models::{InitialProfile, ProfileParameters};
use advect_rs::physics::FieldSnapshot;
use advect_rs::solver::upwind_step;
use proptest::prelude::*;

mod common;
use common::relative_error;

fn seeded(profile: InitialProfile, params: &ProfileParameters) -> FieldSnapshot {
    profile
        .evaluate_grid(&params.grid().unwrap(), 0.0, params)
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // Grids long enough to hold the centre at cell 51 inside the period
    #[test]
    fn prop_gaussian_peak_at_centre(
        nx in 53_usize..400,
        dx in 1.0_f64..2000.0,
        width in 0.5_f64..30.0,
    ) {
        let params = ProfileParameters::new(10.0, dx, nx).unwrap();
        let snapshot = seeded(InitialProfile::gaussian(width).unwrap(), &params);

        let (index, value) = snapshot.peak().unwrap();
        prop_assert_eq!(index, params.grid().unwrap().nearest_index(params.center()));
        prop_assert_eq!(index, 51);
        prop_assert!((value - 10.0).abs() < 1e-12);
    }

    #[test]
    fn prop_rectangle_is_amplitude_on_band_zero_elsewhere(
        nx in 54_usize..400,
        dx in 100_u32..1000,
        amplitude in 0.1_f64..100.0,
    ) {
        let params = ProfileParameters::new(10.0, dx as f64, nx)
            .unwrap()
            .with_amplitude(amplitude)
            .unwrap();
        let snapshot = seeded(InitialProfile::Rectangular, &params);

        for j in 0..nx {
            let expected = if (50..=52).contains(&j) { amplitude } else { 0.0 };
            prop_assert_eq!(snapshot[j], expected, "index {}", j);
        }
    }

    #[test]
    fn prop_gaussian_is_periodic(
        nx in 53_usize..200,
        width in 1.0_f64..20.0,
        fraction in 0.0_f64..1.0,
        t in 0.0_f64..5000.0,
        k in -3_i32..=3,
    ) {
        let params = ProfileParameters::new(10.0, 500.0, nx).unwrap();
        let profile = InitialProfile::gaussian(width).unwrap();
        let x = fraction * params.period();

        let base = profile.evaluate(x, t, &params);
        let wrapped = profile.evaluate(x + k as f64 * params.period(), t, &params);
        prop_assert!((base - wrapped).abs() < 1e-9, "{} vs {}", base, wrapped);
    }

    // Integer spacing and half-cell offsets keep every position exact
    #[test]
    fn prop_rectangle_is_periodic(
        nx in 54_usize..200,
        dx in 100_u32..1000,
        cell in 0_usize..53,
        shift_cells in 0_u32..400,
        k in -3_i32..=3,
    ) {
        let dx = dx as f64;
        let params = ProfileParameters::new(10.0, dx, nx).unwrap();
        let x = (cell as f64 + 0.5) * dx;
        let t = shift_cells as f64 * dx / 10.0;

        let base = InitialProfile::Rectangular.evaluate(x, t, &params);
        let shifted = x + k as f64 * params.period();
        let wrapped = InitialProfile::Rectangular.evaluate(shifted, t, &params);
        prop_assert_eq!(base, wrapped);
    }

    #[test]
    fn prop_step_conserves_mass(
        values in prop::collection::vec(0.0_f64..100.0, 2..200),
        courant in 0.0_f64..1.5,
    ) {
        let nx = values.len();
        let current = FieldSnapshot::from_vec(values);
        // u = C * dx / dt with dx = 500, dt = 60
        let next = upwind_step(&current, courant * 500.0 / 60.0, 60.0, 500.0, nx).unwrap();

        prop_assert!((next.total() - current.total()).abs() <= 1e-9 * current.total().max(1.0));
    }

    #[test]
    fn prop_step_preserves_shape(len in 2_usize..300, extra in 1_usize..5) {
        let current = FieldSnapshot::uniform(len, 1.0);

        let next = upwind_step(&current, 10.0, 60.0, 500.0, len).unwrap();
        prop_assert_eq!(next.len(), len);

        let error = upwind_step(&current, 10.0, 60.0, 500.0, len + extra).unwrap_err();
        prop_assert_eq!(error, AdvectionError::ShapeMismatch { expected: len + extra, found: len });
    }

    #[test]
    fn prop_courant_one_translates_by_one_cell(
        values in prop::collection::vec(-50.0_f64..50.0, 2..100),
    ) {
        let nx = values.len();
        let current = FieldSnapshot::from_vec(values.clone());
        let next = upwind_step(&current, 10.0, 50.0, 500.0, nx).unwrap();

        for j in 0..nx {
            let upstream = values[(j + nx - 1) % nx];
            prop_assert!((next[j] - upstream).abs() < 1e-12);
        }
    }

    #[test]
    fn prop_gaussian_seed_step_keeps_mass(
        nx in 53_usize..300,
        width in 1.0_f64..20.0,
        dt in 1.0_f64..90.0,
    ) {
        let params = ProfileParameters::new(10.0, 500.0, nx).unwrap();
        let current = seeded(InitialProfile::gaussian(width).unwrap(), &params);
        let next = upwind_step(&current, 10.0, dt, 500.0, nx).unwrap();

        prop_assert!(relative_error(next.total(), current.total()) < 1e-3);
    }
}

#[test]
fn test_rectangle_reference_grid_has_three_cells() {
    let params = ProfileParameters::new(10.0, 500.0, 101).unwrap();
    let snapshot = seeded(InitialProfile::Rectangular, &params);

    let band: Vec<usize> = (0..101).filter(|&j| snapshot[j] == 10.0).collect();
    assert_eq!(band, vec![50, 51, 52]);
    assert!((0..101).filter(|j| !band.contains(j)).all(|j| snapshot[j] == 0.0));
}

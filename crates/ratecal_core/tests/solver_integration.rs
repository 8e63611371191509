//! Integration tests for the calibration engines.
//!
//! Exercises every engine through the public `CalibrationEngine` entry
//! point on problems with known solutions.

use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use ratecal_core::market_data::curves::{CurveBuilder, NelsonSiegelCurve, YieldCurve};
use ratecal_core::math::solvers::{
    BoxConstraints, CalibrationEngine, ConstraintSet, LevenbergMarquardtSolver, ParameterDomain,
    SolverConfig,
};

/// Zero yields of a known Nelson-Siegel curve at fixed pillars.
struct ZeroYields {
    times: Vec<f64>,
    yields: Vec<f64>,
}

fn ns_residuals(p: &[f64], data: &ZeroYields) -> Vec<f64> {
    let curve = match NelsonSiegelCurve::from_params(p) {
        Ok(c) => c,
        Err(_) => return vec![f64::NAN; data.times.len()],
    };
    data.times
        .iter()
        .zip(&data.yields)
        .map(|(&t, &y)| curve.zero_rate(t).unwrap_or(f64::NAN) - y)
        .collect()
}

fn synthetic_yields() -> ZeroYields {
    let truth = NelsonSiegelCurve::new(0.035, -0.015, 0.01, 1.8).unwrap();
    let times = vec![0.5, 1.0, 2.0, 3.0, 5.0, 7.0, 10.0];
    let yields = times.iter().map(|&t| truth.zero_rate(t).unwrap()).collect();
    ZeroYields { times, yields }
}

#[test]
fn test_lm_engines_recover_nelson_siegel_fit() {
    let data = synthetic_yields();
    let bounds = BoxConstraints::new(
        vec![f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY, 1e-2],
        vec![f64::INFINITY; 4],
    )
    .unwrap();
    let domain = ParameterDomain::boxed(&bounds);
    let config = SolverConfig::default().with_max_iterations(500);

    for engine in [
        CalibrationEngine::DefaultLeastSquares,
        CalibrationEngine::LevenbergMarquardt,
    ] {
        let result = engine
            .optimise(ns_residuals, &[0.025, 0.0, 0.0, 2.0], &data, &domain, &config)
            .unwrap();
        assert!(result.max_abs_residual() < 1e-5, "{engine}: {result:?}");
    }
}

#[test]
fn test_sqp_respects_bounds() {
    // Least squares pull x toward (2, -2); the box is [0, 1] x [-1, 0]
    let bounds = BoxConstraints::new(vec![0.0, -1.0], vec![1.0, 0.0]).unwrap();
    let domain = ParameterDomain::boxed(&bounds);
    let residuals = |p: &[f64], _: &()| vec![p[0] - 2.0, p[1] + 2.0];

    let result = CalibrationEngine::Sqp
        .optimise(residuals, &[0.5, -0.5], &(), &domain, &SolverConfig::default())
        .unwrap();

    assert!(bounds.is_feasible(&result.params));
    assert_abs_diff_eq!(result.params[0], 1.0, epsilon = 1e-8);
    assert_abs_diff_eq!(result.params[1], -1.0, epsilon = 1e-8);
}

#[test]
fn test_bootstrap_style_root_through_builder() {
    // Solve for the 1y discount factor that reprices a 2% annual deposit
    let mut builder = CurveBuilder::<f64>::new();
    let residuals = |p: &[f64], rate: &f64| vec![p[0] * (1.0 + rate) - 1.0];
    let result = LevenbergMarquardtSolver::with_defaults()
        .solve(residuals, &[1.0], &0.02)
        .unwrap();

    builder.add_knot(1.0, result.params[0]).unwrap();
    let curve = builder.build();
    assert_abs_diff_eq!(curve.forward_rate(0.0, 1.0).unwrap(), 0.02, epsilon = 1e-8);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_lm_residual_norm_non_increasing(
        a in 0.5_f64..3.0,
        b in 0.1_f64..1.5,
        x0 in 0.2_f64..2.0,
    ) {
        let xs: Vec<f64> = (0..8).map(|i| i as f64 * 0.5).collect();
        let ys: Vec<f64> = xs.iter().map(|x| a * (-b * x).exp()).collect();
        let data = (xs, ys);
        let residuals = |p: &[f64], d: &(Vec<f64>, Vec<f64>)| -> Vec<f64> {
            d.0.iter().zip(&d.1).map(|(x, y)| p[0] * (-p[1] * x).exp() - y).collect()
        };

        let result = LevenbergMarquardtSolver::with_defaults()
            .solve(residuals, &[x0, x0], &data)
            .unwrap();

        for pair in result.history.windows(2) {
            prop_assert!(pair[1] <= pair[0]);
        }
        prop_assert!(result.residual_norm <= result.history[0]);
    }
}

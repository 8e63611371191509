//! Integration tests for multi-curve construction.
//!
//! These tests run the full path from market quotes to curves and check
//! repricing, the reference pillar values and the error surface seen by
//! callers.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use ratecal_core::market_data::curves::{CurveModelKind, YieldCurve};
use ratecal_core::math::solvers::CalibrationEngine;
use ratecal_models::instruments::{OisFuture, OisSwap, RateInstrument, Swap3M};
use ratecal_optimiser::prelude::*;

fn semi_annual_ois(maturity: f64, rate: f64) -> RateInstrument {
    OisSwap::new(maturity, rate)
        .unwrap()
        .with_accrual(0.5)
        .unwrap()
        .into()
}

// ============================================================================
// Reference Values
// ============================================================================

#[test]
fn test_single_quarterly_ois_pillar() {
    let ois: Vec<RateInstrument> = vec![OisSwap::new(0.25, 0.0001).unwrap().into()];
    let result = MultiCurveBootstrapper::with_defaults()
        .bootstrap(&ois, &[])
        .unwrap();
    assert_abs_diff_eq!(
        result.curves.ois.discount_factor(0.25).unwrap(),
        0.99997500062,
        epsilon = 1e-11
    );
}

#[test]
fn test_single_3m_swap_forward() {
    let ois: Vec<RateInstrument> = vec![OisSwap::new(0.25, 0.0001).unwrap().into()];
    let swaps: Vec<RateInstrument> = vec![Swap3M::new(0.25, 0.001).unwrap().into()];
    let result = MultiCurveBootstrapper::with_defaults()
        .bootstrap(&ois, &swaps)
        .unwrap();
    assert_relative_eq!(
        result.curves.forward.forward_rate(0.0, 0.25).unwrap(),
        0.001,
        epsilon = 1e-12
    );
}

#[test]
fn test_end_to_end_semi_annual_market() {
    let ois = vec![semi_annual_ois(2.0, 0.022), semi_annual_ois(3.0, 0.024)];
    let swaps: Vec<RateInstrument> = vec![Swap3M::new(0.25, 0.023).unwrap().into()];

    let curves = CurveManager::default()
        .build(
            &ois,
            &swaps,
            CurveModelKind::BootstrappedLogLinear,
            CalibrationEngine::default(),
        )
        .unwrap();

    assert_abs_diff_eq!(curves.ois.discount_factor(2.0).unwrap(), 0.9564787, epsilon = 1e-7);
    assert_relative_eq!(
        curves.forward.forward_rate(0.0, 0.25).unwrap(),
        0.023,
        epsilon = 1e-12
    );
    assert!(curves.ois.discount_factor(3.0).unwrap() < curves.ois.discount_factor(2.0).unwrap());
}

// ============================================================================
// Repricing
// ============================================================================

#[test]
fn test_quarterly_market_reprices() {
    let mut ois: Vec<RateInstrument> = vec![
        OisSwap::new(0.25, 0.019).unwrap().into(),
        OisFuture::new(0.5, 0.9795).unwrap().into(),
        OisFuture::new(0.75, 0.979).unwrap().into(),
    ];
    ois.extend((1..=12).map(|q| -> RateInstrument {
        OisSwap::new(0.75 + 0.25 * q as f64, 0.021 + 0.0002 * q as f64)
            .unwrap()
            .into()
    }));
    let swaps: Vec<RateInstrument> = (1..=16)
        .map(|q| Swap3M::new(0.25 * q as f64, 0.023 + 0.0002 * q as f64).unwrap().into())
        .collect();

    let result = MultiCurveBootstrapper::with_defaults()
        .bootstrap(&ois, &swaps)
        .unwrap();

    assert_eq!(result.ois_residuals.len(), ois.len());
    assert_eq!(result.forward_residuals.len(), swaps.len());
    assert!(result.max_residual() < 1e-12, "max residual {}", result.max_residual());

    // Forward curve sits above OIS for a positive basis
    let spread = result.curves.basis_spread(0.75, 1.0).unwrap();
    assert!(spread > 0.0);
}

// ============================================================================
// Error Surface
// ============================================================================

#[test]
fn test_duplicate_maturity_rejected() {
    let ois = vec![semi_annual_ois(2.0, 0.022), semi_annual_ois(2.0, 0.023)];
    let err = MultiCurveBootstrapper::with_defaults()
        .bootstrap(&ois, &[])
        .unwrap_err();
    assert!(err.is_duplicate_maturity());
}

#[test]
fn test_wrong_phase_rejected() {
    let swaps: Vec<RateInstrument> = vec![Swap3M::new(1.0, 0.02).unwrap().into()];
    let err = CurveManager::default()
        .build(
            &swaps,
            &[],
            CurveModelKind::BootstrappedLogLinear,
            CalibrationEngine::default(),
        )
        .unwrap_err();
    match err {
        OptimiserError::Bootstrap(inner) => assert!(inner.is_configuration()),
        other => panic!("unexpected error {other}"),
    }
}

// ============================================================================
// Parametric Curves
// ============================================================================

#[test]
fn test_parametric_curves_reprice_bootstrapped_market() {
    let ois: Vec<RateInstrument> = (1..=8)
        .map(|t| OisSwap::new(t as f64, 0.02 + 0.0015 * (t as f64).ln_1p()).unwrap().into())
        .collect();
    let boot = MultiCurveBootstrapper::with_defaults()
        .bootstrap_ois(&ois)
        .unwrap();

    // Reprice on the bootstrapped curve so the quotes are mutually consistent
    let quotes: Vec<RateInstrument> = (1..=8)
        .map(|t| {
            let probe = OisSwap::new(t as f64, 0.0).unwrap();
            OisSwap::new(t as f64, probe.par_rate(&boot).unwrap()).unwrap().into()
        })
        .collect();

    for engine in [
        CalibrationEngine::DefaultLeastSquares,
        CalibrationEngine::LevenbergMarquardt,
    ] {
        let fit = OisCurveCalibrator::new(CurveCalibrationConfig::default().with_engine(engine))
            .calibrate(&quotes)
            .unwrap();
        // Par rate errors below 1bp
        for inst in &quotes {
            if let RateInstrument::OisSwap(swap) = inst {
                let fitted = swap.par_rate(&fit.curve).unwrap();
                assert_abs_diff_eq!(fitted, swap.rate(), epsilon = 1e-4);
            }
        }
    }
}

//! Integration tests for volatility calibration.
//!
//! Covers the calibrators and surfaces together with curves from
//! ratecal_core.

use approx::assert_abs_diff_eq;
use ratecal_core::market_data::{CurveBuilder, DiscountCurve, YieldCurve};
use ratecal_core::math::solvers::CalibrationEngine;
use ratecal_models::calibration::{CalibrationError, VolCalibrationConfig, VolQuote};
use ratecal_models::instruments::{Caplet3M, Swap3M};
use ratecal_models::models::SabrParams;
use ratecal_models::surfaces::{Caplet3MVolSurface, VolSurface};

fn forward_curve() -> DiscountCurve<f64> {
    let mut builder = CurveBuilder::<f64>::new();
    for (i, rate) in [0.030_f64, 0.031, 0.032, 0.033, 0.034, 0.035].iter().enumerate() {
        let t = 0.5 * (i + 1) as f64;
        builder.add_knot(t, (-rate * t).exp()).unwrap();
    }
    builder.build().into()
}

// ========================================
// VolSurface
// ========================================

#[test]
fn test_surface_single_quote_every_bounded_engine() {
    for engine in [CalibrationEngine::DefaultLeastSquares, CalibrationEngine::Sqp] {
        let mut surface = VolSurface::new(VolCalibrationConfig::default().with_engine(engine));
        surface.add_market_vol(1.0, 100.0, 0.2, 99.0).unwrap();
        surface.calibrate().unwrap();

        let vol = surface.get_vol(1.0, 100.0, 99.0).unwrap();
        assert_abs_diff_eq!(vol, 0.2, epsilon = 1e-4);
    }
}

#[test]
fn test_surface_recovers_multi_expiry_smiles() {
    let truths = [
        (0.5, SabrParams::new(0.22, -0.25, 0.7).unwrap()),
        (1.0, SabrParams::new(0.20, -0.20, 0.5).unwrap()),
        (2.0, SabrParams::new(0.18, -0.10, 0.4).unwrap()),
    ];
    let forward = 0.03;

    let mut quotes = Vec::new();
    for (expiry, params) in truths {
        for k in [0.022, 0.026, 0.03, 0.034, 0.038] {
            quotes.push(VolQuote::new(expiry, k, params.implied_vol(expiry, k, forward), forward));
        }
    }
    let mut surface = VolSurface::with_quotes(VolCalibrationConfig::default(), quotes.clone());
    let smiles = surface.calibrate().unwrap();
    assert_eq!(smiles.len(), 3);
    assert!(smiles.iter().all(|s| s.diagnostics.rms_error < 1e-4));

    for q in &quotes {
        let vol = surface.get_vol(q.expiry, q.strike, q.forward).unwrap();
        assert_abs_diff_eq!(vol, q.market_vol, epsilon = 1e-4);
    }

    // Between expiries the vol lies between the bracketing smiles
    let v_short = surface.get_vol(1.0, 0.03, forward).unwrap();
    let v_long = surface.get_vol(2.0, 0.03, forward).unwrap();
    let v_mid = surface.get_vol(1.5, 0.03, forward).unwrap();
    assert!(v_mid <= v_short.max(v_long) && v_mid >= v_short.min(v_long));

    assert!(matches!(
        surface.get_vol(5.0, 0.03, forward),
        Err(CalibrationError::ExpiryOutOfRange { .. })
    ));
}

// ========================================
// Caplet surface
// ========================================

#[test]
fn test_caplet_surface_on_bootstrapped_curve() {
    let curve = forward_curve();
    let mut surface = Caplet3MVolSurface::new(curve.clone(), VolCalibrationConfig::default());
    for (expiry, strike, vol) in [(1.0, 0.03, 0.24), (1.0, 0.035, 0.22), (2.0, 0.035, 0.21)] {
        surface.add_caplet(Caplet3M::new(expiry, strike, vol).unwrap());
    }
    surface.calibrate().unwrap();

    let forward = curve.forward_rate(2.0, 2.25).unwrap();
    assert_abs_diff_eq!(surface.forward(2.0).unwrap(), forward, epsilon = 1e-15);
    assert_abs_diff_eq!(surface.vol_at(2.0, 0.035).unwrap(), 0.21, epsilon = 1e-5);
}

#[test]
fn test_swap_priced_off_same_curves() {
    // The 3M curve doubles as discount curve: par rate reproduces itself
    let curve = forward_curve();
    let par = Swap3M::new(3.0, 0.0).unwrap().par_rate(&curve, &curve).unwrap();
    let swap = Swap3M::new(3.0, par).unwrap();
    assert_abs_diff_eq!(swap.residual(&curve, &curve).unwrap(), 0.0, epsilon = 1e-14);
}

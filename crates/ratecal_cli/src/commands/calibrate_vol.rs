//! Calibrate-vol command implementation
//!
//! Fits one SABR smile per expiry to the caplet quotes (forwards read from
//! the 3M curve) and to the explicit-forward volatility quotes.

use std::path::Path;

use ratecal_core::math::solvers::CalibrationEngine;
use ratecal_models::calibration::SmileCalibration;
use ratecal_models::surfaces::{Caplet3MVolSurface, VolSurface};
use serde::Serialize;
use tracing::{info, warn};

use super::{render, OutputFormat, Tabular};
use crate::market::MarketFile;
use crate::settings::Settings;
use crate::{CliError, Result};

/// Calibrated smile at one expiry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmileRow {
    /// `caplets` or `vol_quotes`
    pub source: &'static str,
    pub expiry: f64,
    pub alpha: f64,
    pub rho: f64,
    pub nu: f64,
    pub rms_error: f64,
    pub max_abs_residual: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl SmileRow {
    fn new(source: &'static str, smile: &SmileCalibration) -> Self {
        Self {
            source,
            expiry: smile.expiry,
            alpha: smile.params.alpha(),
            rho: smile.params.rho(),
            nu: smile.params.nu(),
            rms_error: smile.diagnostics.rms_error,
            max_abs_residual: smile.diagnostics.max_abs_residual,
            iterations: smile.diagnostics.iterations,
            converged: smile.diagnostics.converged,
        }
    }
}

/// Output of `ratecal calibrate-vol`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolReport {
    pub engine: CalibrationEngine,
    pub smiles: Vec<SmileRow>,
}

impl Tabular for VolReport {
    fn headers(&self) -> Vec<&'static str> {
        vec![
            "Source", "Expiry", "Alpha", "Rho", "Nu", "RMS", "Max resid", "Iter", "Converged",
        ]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.smiles
            .iter()
            .map(|s| {
                vec![
                    s.source.to_string(),
                    format!("{:.4}", s.expiry),
                    format!("{:.6}", s.alpha),
                    format!("{:.6}", s.rho),
                    format!("{:.6}", s.nu),
                    format!("{:.3e}", s.rms_error),
                    format!("{:.3e}", s.max_abs_residual),
                    s.iterations.to_string(),
                    s.converged.to_string(),
                ]
            })
            .collect()
    }

    fn footer(&self) -> Vec<String> {
        vec![format!("Engine: {}", self.engine)]
    }
}

/// Run the calibrate-vol command
pub fn run(settings: &Settings, market: &Path, engine: Option<&str>, format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let engine = engine.map(str::parse::<CalibrationEngine>).transpose()?;
    info!("Starting volatility calibration...");
    info!("  Market file: {}", market.display());

    let market = MarketFile::load(market)?;
    let report = report(settings, &market, engine)?;

    for smile in report.smiles.iter().filter(|s| !s.converged) {
        warn!(source = smile.source, expiry = smile.expiry, "Smile did not converge");
    }
    println!("{}", render(&report, format)?);
    info!("Volatility calibration complete");
    Ok(())
}

/// Calibrate every smile in `market` with `engine` (or the configured one).
pub fn report(settings: &Settings, market: &MarketFile, engine: Option<CalibrationEngine>) -> Result<VolReport> {
    if market.caplets.is_empty() && market.vol_quotes.is_empty() {
        return Err(CliError::InvalidArgument(
            "Market file has neither caplets nor vol_quotes".to_string(),
        ));
    }
    let config = settings.vol_config(engine);
    let mut smiles = Vec::new();

    if !market.caplets.is_empty() {
        let ois = market.ois_instruments()?;
        let swaps = market.swap_3m_instruments()?;
        if swaps.is_empty() {
            return Err(CliError::InvalidArgument(
                "Caplets need 3M swap quotes for their forwards".to_string(),
            ));
        }
        let curves = settings
            .curve_manager()
            .build(&ois, &swaps, settings.curve_model, config.engine)?;

        let mut surface = Caplet3MVolSurface::new(curves.forward, config);
        for caplet in market.caplets()? {
            surface.add_caplet(caplet);
        }
        smiles.extend(surface.calibrate()?.iter().map(|s| SmileRow::new("caplets", s)));
    }

    if !market.vol_quotes.is_empty() {
        let mut surface = VolSurface::with_quotes(config, market.vol_quotes());
        smiles.extend(surface.calibrate()?.iter().map(|s| SmileRow::new("vol_quotes", s)));
    }

    Ok(VolReport {
        engine: config.engine,
        smiles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::tests::SAMPLE;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_caplets_and_quotes() {
        let market = MarketFile::from_toml(SAMPLE).unwrap();
        let report = report(&Settings::default(), &market, None).unwrap();

        assert_eq!(report.engine, CalibrationEngine::DefaultLeastSquares);
        assert_eq!(report.smiles.len(), 2);
        assert_eq!(report.smiles[0].source, "caplets");
        assert_eq!(report.smiles[0].expiry, 0.5);
        assert_eq!(report.smiles[1].source, "vol_quotes");
        assert!(report.smiles.iter().all(|s| s.alpha > 0.0 && s.rho.abs() < 1.0));
    }

    #[test]
    fn test_single_quote_reproduced() {
        let market = MarketFile::from_toml(
            "[[vol_quotes]]\nexpiry = 1.0\nstrike = 100.0\nvol = 0.2\nforward = 99.0",
        )
        .unwrap();
        let report = report(&Settings::default(), &market, None).unwrap();
        assert_abs_diff_eq!(report.smiles[0].max_abs_residual, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_engine_override() {
        let market = MarketFile::from_toml(
            "[[vol_quotes]]\nexpiry = 1.0\nstrike = 100.0\nvol = 0.2\nforward = 99.0",
        )
        .unwrap();
        let report = report(&Settings::default(), &market, Some(CalibrationEngine::Sqp)).unwrap();
        assert_eq!(report.engine, CalibrationEngine::Sqp);
    }

    #[test]
    fn test_no_vol_data_rejected() {
        let market = MarketFile::from_toml("[[ois]]\ntype = \"swap\"\nmaturity = 1.0\nrate = 0.02").unwrap();
        assert!(matches!(
            report(&Settings::default(), &market, None),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_caplets_without_forward_curve_rejected() {
        let market = MarketFile::from_toml("[[caplets]]\nexpiry = 1.0\nstrike = 0.02\nvol = 0.2").unwrap();
        assert!(matches!(
            report(&Settings::default(), &market, None),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_unknown_engine_rejected() {
        let err = run(&Settings::default(), Path::new("market.toml"), Some("simplex"), "table").unwrap_err();
        assert!(matches!(err, CliError::Configuration(_)));
    }
}

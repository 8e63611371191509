//! Compare command implementation
//!
//! Builds the curves with both curve models and runs every calibration
//! engine on the same market. A failing engine is reported in its row and
//! does not stop the comparison.

use std::path::Path;

use ratecal_core::market_data::curves::CurveModelKind;
use ratecal_core::math::solvers::CalibrationEngine;
use ratecal_models::calibration::{caplet_quotes, SmileCalibration, VolCalibrator, VolQuote};
use ratecal_models::instruments::RateInstrument;
use serde::Serialize;
use tracing::{info, warn};

use super::{max_abs, render, repricing_residuals, OutputFormat, Tabular};
use crate::market::MarketFile;
use crate::settings::Settings;
use crate::{CliError, Result};

/// One model or engine run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareRow {
    /// `curves`, `caplets` or `vol_quotes`
    pub target: &'static str,
    pub model: Option<CurveModelKind>,
    pub engine: Option<CalibrationEngine>,
    pub max_abs_residual: Option<f64>,
    pub iterations: Option<usize>,
    pub error: Option<String>,
}

impl CompareRow {
    fn curves(model: CurveModelKind, engine: Option<CalibrationEngine>, outcome: Result<f64>) -> Self {
        let (max_abs_residual, error) = split(outcome);
        Self {
            target: "curves",
            model: Some(model),
            engine,
            max_abs_residual,
            iterations: None,
            error,
        }
    }

    fn smiles(
        target: &'static str,
        engine: CalibrationEngine,
        outcome: Result<Vec<SmileCalibration>>,
    ) -> Self {
        let (summary, error) = split(outcome.map(|smiles| {
            let residual = smiles
                .iter()
                .fold(0.0_f64, |acc, s| acc.max(s.diagnostics.max_abs_residual));
            let iterations = smiles.iter().map(|s| s.diagnostics.iterations).sum::<usize>();
            (residual, iterations)
        }));
        Self {
            target,
            model: None,
            engine: Some(engine),
            max_abs_residual: summary.map(|(r, _)| r),
            iterations: summary.map(|(_, n)| n),
            error,
        }
    }
}

fn split<T>(outcome: Result<T>) -> (Option<T>, Option<String>) {
    match outcome {
        Ok(value) => (Some(value), None),
        Err(err) => (None, Some(err.to_string())),
    }
}

/// Output of `ratecal compare`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareReport {
    pub rows: Vec<CompareRow>,
}

impl Tabular for CompareReport {
    fn headers(&self) -> Vec<&'static str> {
        vec!["Target", "Model", "Engine", "Max resid", "Iter", "Error"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let dash = || "-".to_string();
        self.rows
            .iter()
            .map(|r| {
                vec![
                    r.target.to_string(),
                    r.model.map_or_else(dash, |m| m.to_string()),
                    r.engine.map_or_else(dash, |e| e.to_string()),
                    r.max_abs_residual.map_or_else(dash, |v| format!("{:.3e}", v)),
                    r.iterations.map_or_else(dash, |n| n.to_string()),
                    r.error.clone().unwrap_or_else(dash),
                ]
            })
            .collect()
    }
}

/// Run the compare command
pub fn run(settings: &Settings, market: &Path, format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    info!("Starting comparison...");
    info!("  Market file: {}", market.display());

    let market = MarketFile::load(market)?;
    let report = report(settings, &market)?;

    for row in report.rows.iter().filter(|r| r.error.is_some()) {
        warn!(target_name = row.target, engine = ?row.engine, error = ?row.error, "Run failed");
    }
    println!("{}", render(&report, format)?);
    info!("Comparison complete");
    Ok(())
}

/// Run both curve models and every engine.
///
/// Market file errors abort; calibration errors are recorded per row.
pub fn report(settings: &Settings, market: &MarketFile) -> Result<CompareReport> {
    let ois = market.ois_instruments()?;
    let swaps = market.swap_3m_instruments()?;
    let vol_quotes = market.vol_quotes();
    let caplets = market.caplets()?;
    if ois.is_empty() && vol_quotes.is_empty() {
        return Err(CliError::InvalidArgument(
            "Market file has neither OIS quotes nor vol_quotes".to_string(),
        ));
    }

    let mut rows = Vec::new();
    if !ois.is_empty() {
        rows.push(CompareRow::curves(
            CurveModelKind::BootstrappedLogLinear,
            None,
            curve_residual(settings, &ois, &swaps, CurveModelKind::BootstrappedLogLinear, settings.engine),
        ));
        for engine in CalibrationEngine::ALL {
            rows.push(CompareRow::curves(
                CurveModelKind::SmoothParametric,
                Some(engine),
                curve_residual(settings, &ois, &swaps, CurveModelKind::SmoothParametric, engine),
            ));
        }
    }

    // Caplet forwards come from the configured curve model
    if !caplets.is_empty() {
        let quotes = settings
            .curve_manager()
            .build(&ois, &swaps, settings.curve_model, settings.engine)
            .map_err(CliError::from)
            .and_then(|curves| Ok(caplet_quotes(&caplets, &curves.forward)?));
        for engine in CalibrationEngine::ALL {
            let outcome = match &quotes {
                Ok(quotes) => calibrate_smiles(settings, engine, quotes),
                Err(err) => Err(CliError::InvalidArgument(err.to_string())),
            };
            rows.push(CompareRow::smiles("caplets", engine, outcome));
        }
    }

    if !vol_quotes.is_empty() {
        for engine in CalibrationEngine::ALL {
            let outcome = calibrate_smiles(settings, engine, &vol_quotes);
            rows.push(CompareRow::smiles("vol_quotes", engine, outcome));
        }
    }

    Ok(CompareReport { rows })
}

fn curve_residual(
    settings: &Settings,
    ois: &[RateInstrument],
    swaps: &[RateInstrument],
    model: CurveModelKind,
    engine: CalibrationEngine,
) -> Result<f64> {
    let curves = settings.curve_manager().build(ois, swaps, model, engine)?;
    Ok(max_abs(&repricing_residuals(&curves, ois, swaps)?))
}

fn calibrate_smiles(
    settings: &Settings,
    engine: CalibrationEngine,
    quotes: &[VolQuote],
) -> Result<Vec<SmileCalibration>> {
    Ok(VolCalibrator::new(settings.vol_config(Some(engine))).calibrate(quotes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::tests::SAMPLE;

    #[test]
    fn test_compare_rows() {
        let market = MarketFile::from_toml(SAMPLE).unwrap();
        let report = report(&Settings::default(), &market).unwrap();

        let n = CalibrationEngine::ALL.len();
        assert_eq!(report.rows.len(), 1 + 3 * n);

        let bootstrap = &report.rows[0];
        assert_eq!(bootstrap.model, Some(CurveModelKind::BootstrappedLogLinear));
        assert!(bootstrap.error.is_none());
        assert!(bootstrap.max_abs_residual.is_some());

        for target in ["caplets", "vol_quotes"] {
            let engines: Vec<_> = report
                .rows
                .iter()
                .filter(|r| r.target == target)
                .filter_map(|r| r.engine)
                .collect();
            assert_eq!(engines, CalibrationEngine::ALL.to_vec());
        }
    }

    #[test]
    fn test_rows_carry_value_or_error() {
        let market = MarketFile::from_toml(SAMPLE).unwrap();
        let report = report(&Settings::default(), &market).unwrap();
        for row in &report.rows {
            assert!(row.max_abs_residual.is_some() != row.error.is_some());
        }
    }

    #[test]
    fn test_vol_only_market() {
        let market = MarketFile::from_toml(
            "[[vol_quotes]]\nexpiry = 1.0\nstrike = 100.0\nvol = 0.2\nforward = 99.0",
        )
        .unwrap();
        let report = report(&Settings::default(), &market).unwrap();
        assert_eq!(report.rows.len(), CalibrationEngine::ALL.len());
        assert!(report.rows.iter().all(|r| r.target == "vol_quotes"));
    }

    #[test]
    fn test_empty_market_rejected() {
        assert!(matches!(
            report(&Settings::default(), &MarketFile::default()),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_table_has_one_line_per_row() {
        let market = MarketFile::from_toml(SAMPLE).unwrap();
        let report = report(&Settings::default(), &market).unwrap();
        let out = render(&report, OutputFormat::Table).unwrap();
        assert_eq!(out.lines().count(), report.rows.len() + 4);
    }
}

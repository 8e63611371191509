//! Bootstrap command implementation
//!
//! Builds the OIS discount curve and the 3M forward curve from a market file
//! and prints them on the instrument maturities.

use std::path::Path;

use ratecal_core::market_data::curves::{CurveModelKind, DiscountCurve, YieldCurve};
use ratecal_models::instruments::{RateInstrument, CAPLET_ACCRUAL};
use ratecal_optimiser::CurvePair;
use serde::Serialize;
use tracing::info;

use super::{max_abs, render, repricing_residuals, OutputFormat, Tabular};
use crate::market::MarketFile;
use crate::settings::Settings;
use crate::{CliError, Result};

/// Curve values at one pillar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveRow {
    pub t: f64,
    pub ois_df: f64,
    pub ois_zero: f64,
    pub forward_df: f64,
    pub forward_3m: f64,
}

/// Output of `ratecal bootstrap`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootstrapReport {
    pub model: CurveModelKind,
    pub rows: Vec<CurveRow>,
    pub residuals: Vec<f64>,
    pub max_residual: f64,
}

impl Tabular for BootstrapReport {
    fn headers(&self) -> Vec<&'static str> {
        vec!["T", "OIS DF", "OIS zero", "3M DF", "3M forward"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    format!("{:.4}", r.t),
                    format!("{:.8}", r.ois_df),
                    format!("{:.6}", r.ois_zero),
                    format!("{:.8}", r.forward_df),
                    format!("{:.6}", r.forward_3m),
                ]
            })
            .collect()
    }

    fn footer(&self) -> Vec<String> {
        vec![
            format!("Curve model: {}", self.model),
            format!("Max repricing residual: {:.3e}", self.max_residual),
        ]
    }
}

/// Run the bootstrap command
pub fn run(settings: &Settings, market: &Path, model: Option<&str>, format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    info!("Starting curve construction...");
    info!("  Market file: {}", market.display());

    let market = MarketFile::load(market)?;
    let model = match model {
        Some(name) => name.parse()?,
        None => settings.curve_model,
    };
    let report = report(settings, &market, model)?;

    println!("{}", render(&report, format)?);
    info!("Curve construction complete");
    Ok(())
}

/// Build both curves with `model` and tabulate them.
pub fn report(settings: &Settings, market: &MarketFile, model: CurveModelKind) -> Result<BootstrapReport> {
    let ois = market.ois_instruments()?;
    let swaps = market.swap_3m_instruments()?;
    if ois.is_empty() {
        return Err(CliError::InvalidArgument(
            "Market file has no OIS quotes".to_string(),
        ));
    }

    let curves = settings
        .curve_manager()
        .build(&ois, &swaps, model, settings.engine)?;
    let residuals = repricing_residuals(&curves, &ois, &swaps)?;

    let rows = pillars(&ois, &swaps)
        .into_iter()
        .map(|t| curve_row(&curves, t))
        .collect::<Result<Vec<_>>>()?;

    Ok(BootstrapReport {
        model,
        rows,
        max_residual: max_abs(&residuals),
        residuals,
    })
}

/// Distinct instrument maturities in ascending order.
fn pillars(ois: &[RateInstrument], swaps: &[RateInstrument]) -> Vec<f64> {
    let mut times: Vec<f64> = ois.iter().chain(swaps).map(RateInstrument::maturity).collect();
    times.sort_by(f64::total_cmp);
    times.dedup();
    times
}

fn curve_row(curves: &CurvePair<DiscountCurve<f64>>, t: f64) -> Result<CurveRow> {
    Ok(CurveRow {
        t,
        ois_df: curves.ois.discount_factor(t)?,
        ois_zero: curves.ois.zero_rate(t)?,
        forward_df: curves.forward.discount_factor(t)?,
        forward_3m: curves.forward.forward_rate(t, t + CAPLET_ACCRUAL)?,
    })
}

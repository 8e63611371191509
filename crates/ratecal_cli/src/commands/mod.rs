//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Commands build a
//! serialisable report first and render it afterwards, so reports can be
//! checked without capturing stdout.

pub mod bootstrap;
pub mod calibrate_vol;
pub mod compare;

use std::str::FromStr;

use ratecal_core::market_data::curves::DiscountCurve;
use ratecal_models::instruments::{InstrumentError, RateInstrument};
use ratecal_optimiser::CurvePair;
use serde::Serialize;

use crate::{CliError, Result};

/// Report rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: table, json",
                other
            ))),
        }
    }
}

/// Reports that can be printed as a table.
pub trait Tabular: Serialize {
    /// Column headers
    fn headers(&self) -> Vec<&'static str>;

    /// Formatted rows
    fn rows(&self) -> Vec<Vec<String>>;

    /// Lines printed under the table
    fn footer(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Render `report` in `format`.
pub fn render<R: Tabular>(report: &R, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Table => {
            let mut out = table(&report.headers(), &report.rows());
            for line in report.footer() {
                out.push_str(&line);
                out.push('\n');
            }
            Ok(out)
        }
    }
}

fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = rule(&widths, "┌", "┬", "┐");
    out.push_str(&line(&widths, headers.iter().copied()));
    out.push_str(&rule(&widths, "├", "┼", "┤"));
    if rows.is_empty() {
        out.push_str(&line(&widths, std::iter::once("(no data)").chain(std::iter::repeat(""))));
    }
    for row in rows {
        out.push_str(&line(&widths, row.iter().map(String::as_str)));
    }
    out.push_str(&rule(&widths, "└", "┴", "┘"));
    out
}

fn rule(widths: &[usize], left: &str, mid: &str, right: &str) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}\n", left, segments.join(mid), right)
}

fn line<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let cells: Vec<String> = widths
        .iter()
        .zip(cells)
        .map(|(w, c)| format!(" {:<width$} ", c, width = w))
        .collect();
    format!("│{}│\n", cells.join("│"))
}

/// Model-minus-market residual of each instrument on `curves`, OIS first.
pub fn repricing_residuals(
    curves: &CurvePair<DiscountCurve<f64>>,
    ois_instruments: &[RateInstrument],
    swaps_3m: &[RateInstrument],
) -> std::result::Result<Vec<f64>, InstrumentError> {
    ois_instruments
        .iter()
        .chain(swaps_3m)
        .map(|instrument| match instrument {
            RateInstrument::OisSwap(swap) => swap.residual(&curves.ois),
            RateInstrument::OisFuture(future) => future.residual(&curves.ois),
            RateInstrument::Swap3M(swap) => swap.residual(&curves.ois, &curves.forward),
        })
        .collect()
}

/// Largest absolute value, zero when empty.
pub fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

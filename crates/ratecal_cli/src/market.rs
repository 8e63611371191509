//! TOML market files.
//!
//! ```toml
//! [[ois]]
//! type = "swap"
//! maturity = 2.0
//! rate = 0.022
//! accrual = 0.5        # optional, default 0.25
//!
//! [[ois]]
//! type = "future"
//! maturity = 0.5
//! price = 0.9795
//!
//! [[swaps_3m]]
//! maturity = 1.0
//! rate = 0.025
//!
//! [[caplets]]
//! expiry = 1.0
//! strike = 0.025
//! vol = 0.22
//!
//! [[vol_quotes]]       # quotes with an explicit forward
//! expiry = 1.0
//! strike = 100.0
//! vol = 0.2
//! forward = 99.0
//! ```
//!
//! Instruments keep the order they appear in the file.

use std::path::Path;

use ratecal_models::calibration::VolQuote;
use ratecal_models::instruments::{Caplet3M, InstrumentError, OisFuture, OisSwap, RateInstrument, Swap3M};
use serde::Deserialize;

use crate::{CliError, Result};

/// Overnight curve quote
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OisQuote {
    /// Overnight-indexed swap
    Swap {
        maturity: f64,
        rate: f64,
        accrual: Option<f64>,
        notional: Option<f64>,
    },
    /// Overnight-rate future
    Future {
        maturity: f64,
        price: f64,
        notional: Option<f64>,
    },
}

impl OisQuote {
    fn to_instrument(&self) -> std::result::Result<RateInstrument, InstrumentError> {
        Ok(match *self {
            OisQuote::Swap {
                maturity,
                rate,
                accrual,
                notional,
            } => {
                let mut swap = OisSwap::new(maturity, rate)?;
                if let Some(accrual) = accrual {
                    swap = swap.with_accrual(accrual)?;
                }
                if let Some(notional) = notional {
                    swap = swap.with_notional(notional)?;
                }
                swap.into()
            }
            OisQuote::Future {
                maturity,
                price,
                notional,
            } => {
                let mut future = OisFuture::new(maturity, price)?;
                if let Some(notional) = notional {
                    future = future.with_notional(notional)?;
                }
                future.into()
            }
        })
    }
}

/// Fixed versus 3M swap quote
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Swap3MQuote {
    pub maturity: f64,
    pub rate: f64,
    pub notional: Option<f64>,
}

/// 3M caplet volatility quote
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CapletQuote {
    pub expiry: f64,
    pub strike: f64,
    pub vol: f64,
    pub notional: Option<f64>,
}

/// Volatility quote with an explicit forward
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VolQuoteRow {
    pub expiry: f64,
    pub strike: f64,
    pub vol: f64,
    pub forward: f64,
}

/// Parsed market file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarketFile {
    pub ois: Vec<OisQuote>,
    pub swaps_3m: Vec<Swap3MQuote>,
    pub caplets: Vec<CapletQuote>,
    pub vol_quotes: Vec<VolQuoteRow>,
}

impl MarketFile {
    /// Read and parse a market file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse market file contents.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// OIS curve instruments in file order.
    pub fn ois_instruments(&self) -> Result<Vec<RateInstrument>> {
        Ok(self
            .ois
            .iter()
            .map(OisQuote::to_instrument)
            .collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// 3M swaps in file order.
    pub fn swap_3m_instruments(&self) -> Result<Vec<RateInstrument>> {
        let mut swaps = Vec::with_capacity(self.swaps_3m.len());
        for quote in &self.swaps_3m {
            let mut swap = Swap3M::new(quote.maturity, quote.rate)?;
            if let Some(notional) = quote.notional {
                swap = swap.with_notional(notional)?;
            }
            swaps.push(swap.into());
        }
        Ok(swaps)
    }

    /// Caplet quotes.
    pub fn caplets(&self) -> Result<Vec<Caplet3M>> {
        let mut caplets = Vec::with_capacity(self.caplets.len());
        for quote in &self.caplets {
            let mut caplet = Caplet3M::new(quote.expiry, quote.strike, quote.vol)?;
            if let Some(notional) = quote.notional {
                caplet = caplet.with_notional(notional)?;
            }
            caplets.push(caplet);
        }
        Ok(caplets)
    }

    /// Explicit-forward volatility quotes.
    pub fn vol_quotes(&self) -> Vec<VolQuote> {
        self.vol_quotes
            .iter()
            .map(|q| VolQuote::new(q.expiry, q.strike, q.vol, q.forward))
            .collect()
    }
}

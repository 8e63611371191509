//! Instrument error types.
//!
//! This module provides structured error handling for instrument
//! construction and instrument pricing against curves.

use ratecal_core::market_data::MarketDataError;
use thiserror::Error;

/// Instrument-related errors.
///
/// # Variants
/// - `InvalidMaturity`: Maturity or expiry outside `(0, MAX_MATURITY]`
/// - `InvalidAccrual`: Accrual fraction below `MIN_ACCRUAL` or not finite
/// - `InvalidStrike`: Caplet strike is non-positive
/// - `InvalidNotional`: Notional is zero or not finite
/// - `InvalidQuote`: Quoted rate, price or volatility is not finite
/// - `MarketData`: Curve lookup failed while pricing
///
/// # Examples
/// ```
/// use ratecal_models::instruments::InstrumentError;
///
/// let err = InstrumentError::InvalidMaturity { maturity: -1.0 };
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// Non-positive maturity.
    #[error("Invalid maturity: T = {maturity}")]
    InvalidMaturity {
        /// The invalid maturity value
        maturity: f64,
    },

    /// Non-positive accrual fraction.
    #[error("Invalid accrual: {accrual}")]
    InvalidAccrual {
        /// The invalid accrual value
        accrual: f64,
    },

    /// Non-positive strike.
    #[error("Invalid strike: K = {strike}")]
    InvalidStrike {
        /// The invalid strike value
        strike: f64,
    },

    /// Invalid notional amount.
    #[error("Invalid notional: N = {notional}")]
    InvalidNotional {
        /// The invalid notional value
        notional: f64,
    },

    /// Quote that is not a finite number.
    #[error("Invalid quote for {field}: {value}")]
    InvalidQuote {
        /// Which quote field was rejected
        field: &'static str,
        /// The rejected value
        value: f64,
    },

    /// Curve lookup failure.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),
}

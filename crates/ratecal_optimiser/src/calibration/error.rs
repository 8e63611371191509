//! Curve calibration errors.

use ratecal_core::market_data::MarketDataError;
use ratecal_core::types::{ConfigurationError, SolverError};
use ratecal_models::instruments::InstrumentError;
use thiserror::Error;

/// Errors from fitting a parametric curve to instruments.
///
/// # Examples
///
/// ```
/// use ratecal_optimiser::calibration::CurveCalibrationError;
///
/// let err = CurveCalibrationError::EmptyInstruments;
/// assert!(format!("{}", err).contains("No instruments"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveCalibrationError {
    /// Nothing to calibrate to.
    #[error("No instruments to calibrate the curve to")]
    EmptyInstruments,

    /// Instrument not supported by this calibrator, or a bad solver setting.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The optimiser failed.
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    /// The fitted parameters do not form a valid curve.
    #[error("Fitted curve parameters {params:?} are invalid (residual norm {residual_norm}): {source}")]
    InvalidFit {
        /// Parameters returned by the optimiser
        params: Vec<f64>,
        /// Residual norm at those parameters
        residual_norm: f64,
        /// Why the curve rejected them
        source: MarketDataError,
    },

    /// Pricing an instrument on a candidate curve failed.
    #[error("Instrument error: {0}")]
    Instrument(#[from] InstrumentError),
}

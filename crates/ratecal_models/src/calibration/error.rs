//! Calibration error types.
//!
//! This module defines the error type shared by the volatility
//! calibrators and surfaces.

use ratecal_core::types::{ConfigurationError, SolverError};
use thiserror::Error;

use crate::instruments::InstrumentError;
use crate::models::SabrError;

/// Calibration error type.
///
/// Solver failures keep the last parameter vector and residual norm the
/// solver saw, through the wrapped [`SolverError`].
///
/// # Examples
///
/// ```
/// use ratecal_models::calibration::CalibrationError;
///
/// let err = CalibrationError::expiry_out_of_range(7.0, 1.0, 5.0);
/// assert!(err.to_string().contains("7"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Surface queried before `calibrate()`.
    #[error("Model is not yet calibrated, run calibrate() first")]
    Uncalibrated,

    /// Expiry outside the calibrated expiry range.
    #[error("Expiry {expiry} is outside the calibrated range [{min}, {max}]")]
    ExpiryOutOfRange {
        /// Requested expiry
        expiry: f64,
        /// First calibrated expiry
        min: f64,
        /// Last calibrated expiry
        max: f64,
    },

    /// No quotes to calibrate to.
    #[error("No market quotes to calibrate to")]
    EmptyQuotes,

    /// Quote failed validation.
    #[error("Invalid quote {index}: {field} = {value}")]
    InvalidQuote {
        /// Position of the quote in the input
        index: usize,
        /// Rejected field
        field: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Solver finished at parameters outside the model's domain.
    #[error("Calibrated parameters {params:?} are invalid (residual norm {residual_norm:.6e}): {source}")]
    InvalidFit {
        /// Final solver parameters
        params: Vec<f64>,
        /// Residual norm at those parameters
        residual_norm: f64,
        /// Why the parameters were rejected
        source: SabrError,
    },

    /// Solver failure.
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    /// Instrument or curve failure while preparing quotes.
    #[error("Instrument error: {0}")]
    Instrument(#[from] InstrumentError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl CalibrationError {
    /// Create an expiry out of range error.
    pub fn expiry_out_of_range(expiry: f64, min: f64, max: f64) -> Self {
        CalibrationError::ExpiryOutOfRange { expiry, min, max }
    }

    /// Create an invalid quote error.
    pub fn invalid_quote(index: usize, field: &'static str, value: f64) -> Self {
        CalibrationError::InvalidQuote {
            index,
            field,
            value,
        }
    }

    /// Check if the solver failed numerically.
    ///
    /// These failures might succeed from a different initial guess or
    /// with another engine.
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            CalibrationError::Solver(
                SolverError::SingularMatrix { .. } | SolverError::NumericalInstability { .. }
            ) | CalibrationError::InvalidFit { .. }
        )
    }
}

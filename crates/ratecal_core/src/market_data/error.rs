//! Market data error types.
//!
//! This module provides structured error handling for curve construction
//! and curve queries.

use crate::types::{ConfigurationError, InterpolationError};
use thiserror::Error;

/// Market data operation errors.
///
/// # Variants
///
/// - `InvalidMaturity`: Negative query time, or non-positive time for a zero rate
/// - `DegenerateInterval`: Forward-rate interval with `t2 <= t1`
/// - `NonIncreasingKnot`: Appended knot not later than the last knot
/// - `InvalidDiscountFactor`: Knot discount factor not positive and finite
/// - `InvalidParameter`: Curve parameter outside its domain
/// - `Interpolation`: Wrapped interpolation error
/// - `Configuration`: Wrapped configuration error
///
/// # Examples
///
/// ```
/// use ratecal_core::market_data::MarketDataError;
///
/// let err = MarketDataError::InvalidMaturity { t: -1.0 };
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Invalid maturity.
    #[error("Invalid maturity: t = {t}")]
    InvalidMaturity {
        /// The invalid maturity value
        t: f64,
    },

    /// Forward-rate interval of non-positive length.
    #[error("Degenerate interval: t1 = {t1}, t2 = {t2}")]
    DegenerateInterval {
        /// Start of the interval
        t1: f64,
        /// End of the interval
        t2: f64,
    },

    /// Knot time not strictly after the previous knot.
    #[error("Knot at t = {t} does not follow previous knot at t = {previous}")]
    NonIncreasingKnot {
        /// Time of the last existing knot
        previous: f64,
        /// Time of the rejected knot
        t: f64,
    },

    /// Knot discount factor outside `(0, ∞)`.
    #[error("Invalid discount factor {df} at t = {t}")]
    InvalidDiscountFactor {
        /// Knot time
        t: f64,
        /// Rejected discount factor
        df: f64,
    },

    /// Curve parameter outside its domain.
    #[error("Invalid parameter {name} = {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Interpolation error.
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_maturity_display() {
        let err = MarketDataError::InvalidMaturity { t: -1.5 };
        assert_eq!(format!("{}", err), "Invalid maturity: t = -1.5");
    }

    #[test]
    fn test_degenerate_interval_display() {
        let err = MarketDataError::DegenerateInterval { t1: 2.0, t2: 1.0 };
        assert_eq!(format!("{}", err), "Degenerate interval: t1 = 2, t2 = 1");
    }

    #[test]
    fn test_non_increasing_knot_display() {
        let err = MarketDataError::NonIncreasingKnot {
            previous: 1.0,
            t: 0.5,
        };
        assert_eq!(
            format!("{}", err),
            "Knot at t = 0.5 does not follow previous knot at t = 1"
        );
    }

    #[test]
    fn test_from_interpolation_error() {
        let interp_err = InterpolationError::InsufficientData { got: 1, need: 2 };
        let mkt_err: MarketDataError = interp_err.into();
        match mkt_err {
            MarketDataError::Interpolation(_) => {}
            _ => panic!("Expected Interpolation variant"),
        }
    }

    #[test]
    fn test_from_configuration_error() {
        let err: MarketDataError = ConfigurationError::UnsupportedCurveModel("spline".into()).into();
        assert!(matches!(err, MarketDataError::Configuration(_)));
    }

    #[test]
    fn test_error_trait_implementation() {
        let err: Box<dyn std::error::Error> =
            Box::new(MarketDataError::InvalidParameter { name: "tau", value: 0.0 });
        assert_eq!(err.to_string(), "Invalid parameter tau = 0");
    }
}

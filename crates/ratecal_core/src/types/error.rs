//! Error types for structured error handling.
//!
//! This module provides:
//! - `InterpolationError`: Knot validation failures (the interpolation domain errors)
//! - `SolverError`: Failures inside the least-squares and SQP solvers
//! - `ConfigurationError`: Unsupported engine, curve model or instrument selections

use thiserror::Error;

/// Interpolation errors.
///
/// Raised when knot arrays handed to an interpolator fall outside the
/// domain where log-linear interpolation is defined.
///
/// # Variants
/// - `InsufficientData`: Fewer knots than the interpolator needs
/// - `NonMonotonicData`: Knot times are not strictly increasing
/// - `NonPositiveValue`: A discount factor is zero, negative or not finite
/// - `InvalidInput`: General invalid input error
///
/// # Examples
/// ```
/// use ratecal_core::types::InterpolationError;
///
/// let err = InterpolationError::InsufficientData { got: 1, need: 2 };
/// assert_eq!(format!("{}", err), "Insufficient data points: got 1, need at least 2");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// Insufficient data points for interpolation.
    #[error("Insufficient data points: got {got}, need at least {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// Knot times are not strictly increasing.
    #[error("Data is not strictly increasing at index {index}")]
    NonMonotonicData {
        /// Index where the ordering violation was detected
        index: usize,
    },

    /// Value outside the positive domain required by the logarithm.
    #[error("Non-positive value {value} at index {index}")]
    NonPositiveValue {
        /// Index of the offending value
        index: usize,
        /// The offending value
        value: f64,
    },

    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Least-squares solver errors.
///
/// Every numerical failure carries the last parameter vector the solver
/// attempted and the residual norm observed there, so that a failed
/// calibration can be diagnosed from the error alone.
///
/// # Variants
/// - `SingularMatrix`: Normal equations or KKT system could not be solved
/// - `NumericalInstability`: Residuals or parameters became non-finite
/// - `DimensionMismatch`: Inconsistent vector lengths
/// - `InvalidInput`: Empty parameter or residual vectors, bad configuration
///
/// # Examples
/// ```
/// use ratecal_core::types::SolverError;
///
/// let err = SolverError::singular("normal equations", vec![1.0, 2.0], 0.5);
/// assert!(format!("{}", err).contains("Singular matrix"));
/// assert_eq!(err.last_params(), Some(&[1.0, 2.0][..]));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Linear system could not be solved.
    #[error("Singular matrix in {context} (residual norm {residual_norm:.6e}, params {params:?})")]
    SingularMatrix {
        /// Which linear system failed
        context: String,
        /// Last attempted parameters
        params: Vec<f64>,
        /// Residual norm at those parameters
        residual_norm: f64,
    },

    /// Non-finite residuals or parameters.
    #[error("Numerical instability: {reason} (residual norm {residual_norm:.6e}, params {params:?})")]
    NumericalInstability {
        /// Description of the failure
        reason: String,
        /// Last attempted parameters
        params: Vec<f64>,
        /// Residual norm at those parameters
        residual_norm: f64,
    },

    /// Vector dimensions disagree.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// Invalid solver input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SolverError {
    /// Create a singular matrix error.
    pub fn singular(context: impl Into<String>, params: Vec<f64>, residual_norm: f64) -> Self {
        Self::SingularMatrix {
            context: context.into(),
            params,
            residual_norm,
        }
    }

    /// Create a numerical instability error.
    pub fn unstable(reason: impl Into<String>, params: Vec<f64>, residual_norm: f64) -> Self {
        Self::NumericalInstability {
            reason: reason.into(),
            params,
            residual_norm,
        }
    }

    /// Last parameter vector attempted before the failure, if recorded.
    pub fn last_params(&self) -> Option<&[f64]> {
        match self {
            Self::SingularMatrix { params, .. } | Self::NumericalInstability { params, .. } => {
                Some(params)
            }
            _ => None,
        }
    }

    /// Residual norm at the last attempted parameters, if recorded.
    pub fn residual_norm(&self) -> Option<f64> {
        match self {
            Self::SingularMatrix { residual_norm, .. }
            | Self::NumericalInstability { residual_norm, .. } => Some(*residual_norm),
            _ => None,
        }
    }

    /// Check if the error is a singular linear system.
    pub fn is_singular(&self) -> bool {
        matches!(self, Self::SingularMatrix { .. })
    }
}

/// Configuration errors.
///
/// Raised for names and selections the library does not support:
/// calibration engines, curve models, or instruments handed to a
/// component that cannot process them.
///
/// # Examples
/// ```
/// use ratecal_core::types::ConfigurationError;
///
/// let err = ConfigurationError::UnsupportedEngine("simplex".to_string());
/// assert_eq!(format!("{}", err), "Calibration engine 'simplex' is not supported");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Unknown calibration engine name.
    #[error("Calibration engine '{0}' is not supported")]
    UnsupportedEngine(String),

    /// Unknown curve model name.
    #[error("Curve model '{0}' is not supported")]
    UnsupportedCurveModel(String),

    /// Instrument kind not handled by the receiving component.
    #[error("Instrument {instrument} is not supported for {context}")]
    UnsupportedInstrument {
        /// Description of the offending instrument
        instrument: String,
        /// The operation that rejected it
        context: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue {
        /// Configuration key
        key: String,
        /// Reason the value was rejected
        message: String,
    },
}

impl ConfigurationError {
    /// Create an unsupported instrument error.
    pub fn unsupported_instrument(instrument: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnsupportedInstrument {
            instrument: instrument.into(),
            context: context.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // InterpolationError Tests
    // ========================================

    #[test]
    fn test_insufficient_data_display() {
        let err = InterpolationError::InsufficientData { got: 1, need: 2 };
        assert_eq!(
            format!("{}", err),
            "Insufficient data points: got 1, need at least 2"
        );
    }

    #[test]
    fn test_non_monotonic_display() {
        let err = InterpolationError::NonMonotonicData { index: 3 };
        assert_eq!(format!("{}", err), "Data is not strictly increasing at index 3");
    }

    #[test]
    fn test_non_positive_display() {
        let err = InterpolationError::NonPositiveValue {
            index: 1,
            value: -0.5,
        };
        assert_eq!(format!("{}", err), "Non-positive value -0.5 at index 1");
    }

    // ========================================
    // SolverError Tests
    // ========================================

    #[test]
    fn test_singular_carries_diagnostics() {
        let err = SolverError::singular("KKT system", vec![0.1, 0.2, 0.3], 1e-3);
        assert!(err.is_singular());
        assert_eq!(err.last_params(), Some(&[0.1, 0.2, 0.3][..]));
        assert_eq!(err.residual_norm(), Some(1e-3));
        assert!(format!("{}", err).starts_with("Singular matrix in KKT system"));
    }

    #[test]
    fn test_unstable_carries_diagnostics() {
        let err = SolverError::unstable("non-finite residuals", vec![1.0], f64::NAN);
        assert!(!err.is_singular());
        assert_eq!(err.last_params(), Some(&[1.0][..]));
        assert!(format!("{}", err).contains("non-finite residuals"));
    }

    #[test]
    fn test_dimension_mismatch_has_no_params() {
        let err = SolverError::DimensionMismatch {
            expected: 3,
            got: 2,
        };
        assert_eq!(err.last_params(), None);
        assert_eq!(err.residual_norm(), None);
        assert_eq!(format!("{}", err), "Dimension mismatch: expected 3, got 2");
    }

    // ========================================
    // ConfigurationError Tests
    // ========================================

    #[test]
    fn test_unsupported_instrument_display() {
        let err = ConfigurationError::unsupported_instrument("Swap3M(T=1)", "OIS bootstrapping");
        assert_eq!(
            format!("{}", err),
            "Instrument Swap3M(T=1) is not supported for OIS bootstrapping"
        );
    }

    #[test]
    fn test_unsupported_model_display() {
        let err = ConfigurationError::UnsupportedCurveModel("cubic".to_string());
        assert_eq!(format!("{}", err), "Curve model 'cubic' is not supported");
    }

    #[test]
    fn test_invalid_value_display() {
        let err = ConfigurationError::invalid_value("tolerance", "must be positive");
        assert_eq!(
            format!("{}", err),
            "Invalid configuration value for 'tolerance': must be positive"
        );
    }
}

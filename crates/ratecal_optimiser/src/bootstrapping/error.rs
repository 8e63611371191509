//! Bootstrap-specific error types.
//!
//! This module provides structured error handling for multi-curve
//! bootstrapping with the maturity and value at fault for each failure mode.

use ratecal_core::market_data::MarketDataError;
use ratecal_core::types::ConfigurationError;
use ratecal_models::instruments::InstrumentError;
use thiserror::Error;

/// Errors that can occur during multi-curve bootstrapping.
///
/// # Variants
///
/// - `DuplicateMaturity`: Two instruments of one phase share a maturity
/// - `NonIncreasingMaturity`: Instruments of one phase are out of order
/// - `InvalidMaturity`: Maturity not positive or beyond the configured maximum
/// - `InvalidDiscountFactor`: A solved pillar is not finite and positive
/// - `Configuration`: An instrument was supplied to the wrong phase
/// - `MarketData`: Wrapped curve error
/// - `Instrument`: Wrapped instrument pricing error
///
/// # Examples
///
/// ```
/// use ratecal_optimiser::bootstrapping::BootstrapError;
///
/// let err = BootstrapError::duplicate_maturity(2.5);
/// assert!(format!("{}", err).contains("2.5"));
/// assert!(err.is_duplicate_maturity());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BootstrapError {
    /// Duplicate maturity within one bootstrap phase.
    #[error("Duplicate maturity detected: {maturity}")]
    DuplicateMaturity {
        /// The duplicated maturity value
        maturity: f64,
    },

    /// Maturity earlier than the preceding instrument's.
    #[error("Maturity {maturity} follows later maturity {previous}; instruments must be ordered")]
    NonIncreasingMaturity {
        /// Maturity of the preceding instrument
        previous: f64,
        /// Offending maturity
        maturity: f64,
    },

    /// Invalid maturity range.
    #[error("Invalid maturity: {maturity} (must be > 0 and <= {max_maturity})")]
    InvalidMaturity {
        /// The invalid maturity value
        maturity: f64,
        /// Maximum allowed maturity
        max_maturity: f64,
    },

    /// Solved discount factor is not finite and positive.
    #[error("Invalid discount factor {df} solved at maturity {maturity}")]
    InvalidDiscountFactor {
        /// Pillar maturity
        maturity: f64,
        /// Solved value
        df: f64,
    },

    /// Instrument not supported by the phase it was given to.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Wrapped market data error.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),

    /// Wrapped instrument error.
    #[error("Instrument error: {0}")]
    Instrument(#[from] InstrumentError),
}

impl BootstrapError {
    /// Create a duplicate maturity error.
    pub fn duplicate_maturity(maturity: f64) -> Self {
        Self::DuplicateMaturity { maturity }
    }

    /// Create a non-increasing maturity error.
    pub fn non_increasing_maturity(previous: f64, maturity: f64) -> Self {
        Self::NonIncreasingMaturity { previous, maturity }
    }

    /// Create an invalid maturity error.
    pub fn invalid_maturity(maturity: f64, max_maturity: f64) -> Self {
        Self::InvalidMaturity {
            maturity,
            max_maturity,
        }
    }

    /// Create an invalid discount factor error.
    pub fn invalid_discount_factor(maturity: f64, df: f64) -> Self {
        Self::InvalidDiscountFactor { maturity, df }
    }

    /// Check if this is a duplicate maturity error.
    pub fn is_duplicate_maturity(&self) -> bool {
        matches!(self, Self::DuplicateMaturity { .. })
    }

    /// Check if this is an ordering error.
    pub fn is_non_increasing_maturity(&self) -> bool {
        matches!(self, Self::NonIncreasingMaturity { .. })
    }

    /// Check if this is an invalid maturity error.
    pub fn is_invalid_maturity(&self) -> bool {
        matches!(self, Self::InvalidMaturity { .. })
    }

    /// Check if this is an invalid discount factor error.
    pub fn is_invalid_discount_factor(&self) -> bool {
        matches!(self, Self::InvalidDiscountFactor { .. })
    }

    /// Check if this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

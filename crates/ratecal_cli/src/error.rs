//! CLI error types.

use ratecal_core::market_data::MarketDataError;
use ratecal_core::types::ConfigurationError;
use ratecal_models::calibration::CalibrationError;
use ratecal_models::instruments::InstrumentError;
use ratecal_optimiser::OptimiserError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Market file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Argument or market content that cannot be acted on
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed market file
    #[error("Failed to parse market file: {0}")]
    MarketFile(#[from] toml::de::Error),

    /// Settings could not be loaded
    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    /// Unknown engine or curve model
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Invalid instrument quote
    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    /// Curve lookup outside its domain
    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    /// Curve construction failed
    #[error(transparent)]
    Curves(#[from] OptimiserError),

    /// Volatility calibration failed
    #[error(transparent)]
    Calibration(#[from] CalibrationError),

    /// JSON output failed
    #[error("Failed to serialise output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

//! Crate-level error type.

use thiserror::Error;

use crate::bootstrapping::BootstrapError;
use crate::calibration::CurveCalibrationError;

/// Any failure while building a curve pair.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimiserError {
    /// Bootstrapping failed.
    #[error("Bootstrap failed: {0}")]
    Bootstrap(#[from] BootstrapError),

    /// Parametric calibration failed.
    #[error("Curve calibration failed: {0}")]
    Calibration(#[from] CurveCalibrationError),
}

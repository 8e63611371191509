//! Model calibration infrastructure.
//!
//! This module provides:
//! - [`VolCalibrator`]: Per-expiry SABR calibration with a selectable engine
//! - [`Caplet3MVolCalibrator`]: The same fit driven by 3M caplet quotes
//! - [`CalibrationDiagnostics`]: RMS error, max residual and convergence of a fit
//! - [`CalibrationError`]: Error type shared by calibrators and surfaces
//!
//! ## Engines
//!
//! Every calibrator accepts a
//! [`CalibrationEngine`](ratecal_core::math::solvers::CalibrationEngine):
//! the default bounded least squares, Gauss-Newton, Levenberg-Marquardt or
//! SQP. The bounded engine uses the SABR box bounds, SQP the
//! [`SabrConstraints`](crate::models::SabrConstraints).

mod caplet_calibrator;
mod error;
mod result;
mod vol_calibrator;

pub use caplet_calibrator::{caplet_quotes, Caplet3MVolCalibrator};
pub use error::CalibrationError;
pub use result::{CalibrationDiagnostics, SmileCalibration};
pub use vol_calibrator::{VolCalibrationConfig, VolCalibrator, VolQuote};

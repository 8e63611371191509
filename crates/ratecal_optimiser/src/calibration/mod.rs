//! Parametric curve calibration.
//!
//! This module provides:
//! - [`OisCurveCalibrator`]: Nelson-Siegel discount curve from OIS swaps and futures
//! - [`ForwardCurveCalibrator`]: Nelson-Siegel 3M curve from 3M swaps
//! - [`CurveCalibrationConfig`]: Engine, solver tolerances and starting point
//! - [`CurveCalibrationError`]: Calibration failures

mod curve_calibrator;
mod error;

pub use curve_calibrator::{
    nelson_siegel_bounds, CurveCalibration, CurveCalibrationConfig, ForwardCurveCalibrator,
    NelsonSiegelConstraints, OisCurveCalibrator, TAU_FLOOR,
};
pub use error::CurveCalibrationError;

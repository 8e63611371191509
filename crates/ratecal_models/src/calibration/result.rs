//! Calibration result types.
//!
//! This module defines the diagnostics reported after every calibration
//! and the per-expiry SABR calibration result.

use ratecal_core::math::solvers::{CalibrationEngine, OptimisationResult};
use tracing::{info, warn};

use crate::models::SabrParams;

/// Calibration diagnostics.
///
/// Summarises the fit quality of one solver run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CalibrationDiagnostics {
    /// Engine that produced the fit
    pub engine: CalibrationEngine,
    /// Number of iterations performed
    pub iterations: usize,
    /// Whether the step-norm criterion was met
    pub converged: bool,
    /// Euclidean norm of the final residuals
    pub residual_norm: f64,
    /// Root mean squared residual
    pub rms_error: f64,
    /// Maximum absolute residual
    pub max_abs_residual: f64,
    /// Fitted parameter vector
    pub params: Vec<f64>,
    /// Individual residuals (model - market)
    pub residuals: Vec<f64>,
}

impl CalibrationDiagnostics {
    /// Build diagnostics from a solver result.
    pub fn from_result(engine: CalibrationEngine, result: &OptimisationResult) -> Self {
        Self {
            engine,
            iterations: result.iterations,
            converged: result.converged,
            residual_norm: result.residual_norm,
            rms_error: result.rmse(),
            max_abs_residual: result.max_abs_residual(),
            params: result.params.clone(),
            residuals: result.residuals.clone(),
        }
    }

    /// Check if calibration quality is acceptable.
    ///
    /// # Arguments
    ///
    /// * `tolerance` - Maximum acceptable RMS error
    pub fn is_quality_acceptable(&self, tolerance: f64) -> bool {
        self.rms_error <= tolerance
    }

    /// Emit the summary at `info`, or at `warn` when unconverged.
    pub fn log(&self, target: &str) {
        if self.converged {
            info!(
                target_name = target,
                engine = %self.engine,
                iterations = self.iterations,
                rms_error = self.rms_error,
                max_abs_residual = self.max_abs_residual,
                params = ?self.params,
                "Calibration finished"
            );
        } else {
            warn!(
                target_name = target,
                engine = %self.engine,
                iterations = self.iterations,
                rms_error = self.rms_error,
                max_abs_residual = self.max_abs_residual,
                params = ?self.params,
                "Calibration did not converge"
            );
        }
    }
}

/// SABR smile calibrated at one expiry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SmileCalibration {
    /// Expiry of the smile
    pub expiry: f64,
    /// Fitted parameters
    pub params: SabrParams,
    /// Fit diagnostics
    pub diagnostics: CalibrationDiagnostics,
}

impl SmileCalibration {
    /// Model volatility at this smile's expiry.
    pub fn vol(&self, strike: f64, forward: f64) -> f64 {
        self.params.implied_vol(self.expiry, strike, forward)
    }
}

//! Least-squares optimisers for curve and volatility calibration.
//!
//! Every solver minimises a residual vector `r(x; ctx)` where the context is
//! passed explicitly to the residual function:
//!
//! ```text
//! F: Fn(&[f64], &C) -> Vec<f64>
//! ```
//!
//! ## Available Solvers
//!
//! - [`GaussNewtonSolver`]: Damped Gauss-Newton on the normal equations
//! - [`LevenbergMarquardtSolver`]: Adaptive damping, optionally projected onto bounds
//! - [`SqpSolver`]: Active-set SQP with BFGS updates over a [`ConstraintSet`]
//!
//! [`CalibrationEngine`] selects among them by name.
//!
//! ## Configuration
//!
//! All solvers share [`SolverConfig`]:
//! - `tolerance`: Step-norm tolerance (default: 1e-6)
//! - `max_iterations`: Maximum iteration count (default: 100)
//! - `fd_step`: Forward-difference bump (default: 0.01)
//!
//! ## Example
//!
//! ```
//! use ratecal_core::math::solvers::{
//!     BoxConstraints, CalibrationEngine, ParameterDomain, SolverConfig,
//! };
//!
//! // Fit y = a + b x through three points
//! let data = [(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)];
//! let residuals = |p: &[f64], pts: &[(f64, f64)]| -> Vec<f64> {
//!     pts.iter().map(|(x, y)| p[0] + p[1] * x - y).collect()
//! };
//!
//! let bounds = BoxConstraints::unbounded(2);
//! let result = CalibrationEngine::LevenbergMarquardt
//!     .optimise(
//!         residuals,
//!         &[0.0, 0.0],
//!         &data[..],
//!         &ParameterDomain::boxed(&bounds),
//!         &SolverConfig::default(),
//!     )
//!     .unwrap();
//!
//! assert!(result.converged);
//! assert!((result.params[1] - 2.0).abs() < 1e-6);
//! ```

mod config;
mod constraints;
mod engine;
mod gauss_newton;
mod jacobian;
mod levenberg_marquardt;
mod result;
mod sqp;

// Re-export public types at module level
pub use config::SolverConfig;
pub use constraints::{BoxConstraints, ConstraintSet, Unconstrained};
pub use engine::{CalibrationEngine, ParameterDomain};
pub use gauss_newton::GaussNewtonSolver;
pub use jacobian::{forward_difference_jacobian, no_projection};
pub use levenberg_marquardt::{LMConfig, LevenbergMarquardtSolver};
pub use result::OptimisationResult;
pub use sqp::{SqpConfig, SqpSolver};

use crate::math::linalg::norm;
use crate::types::SolverError;

/// Evaluate residuals, rejecting non-finite output.
pub(crate) fn evaluate<C, F>(residuals: &F, x: &[f64], ctx: &C) -> Result<Vec<f64>, SolverError>
where
    C: ?Sized,
    F: Fn(&[f64], &C) -> Vec<f64>,
{
    let r = residuals(x, ctx);
    if r.iter().any(|v| !v.is_finite()) {
        return Err(SolverError::unstable(
            "non-finite residuals",
            x.to_vec(),
            norm(&r),
        ));
    }
    Ok(r)
}

/// Reject empty problems and non-finite starting points.
pub(crate) fn validate_start(x: &[f64], r: &[f64]) -> Result<(), SolverError> {
    if x.is_empty() {
        return Err(SolverError::InvalidInput("Empty parameter vector".to_string()));
    }
    if r.is_empty() {
        return Err(SolverError::InvalidInput("Empty residual vector".to_string()));
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(SolverError::InvalidInput(format!(
            "Non-finite initial parameters: {:?}",
            x
        )));
    }
    Ok(())
}

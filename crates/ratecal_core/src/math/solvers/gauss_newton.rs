//! Damped Gauss-Newton solver.
//!
//! Each iteration solves the normal equations `JᵀJ p = -Jᵀr` exactly and
//! moves a fixed fraction of the full step:
//!
//! ```text
//! x_{k+1} = x_k + damping * p
//! ```
//!
//! Convergence is declared when the full Gauss-Newton step `‖p‖` falls below
//! the tolerance. With the default damping of 0.1 the solver contracts by
//! roughly 10% per iteration on linear problems, so it often finishes the
//! iteration budget unconverged; callers check `converged` and log.

use super::jacobian::{forward_difference_jacobian, no_projection};
use super::{evaluate, validate_start, OptimisationResult, SolverConfig};
use crate::math::linalg::{jtj, jtr, norm, solve_linear};
use crate::types::SolverError;
use tracing::debug;

/// Default fraction of the Gauss-Newton step applied per iteration.
pub const DEFAULT_DAMPING: f64 = 0.1;

/// Damped Gauss-Newton solver.
///
/// # Example
///
/// ```
/// use ratecal_core::math::solvers::{GaussNewtonSolver, SolverConfig};
///
/// let solver = GaussNewtonSolver::new(SolverConfig::default()).with_damping(1.0);
/// let residuals = |p: &[f64], _: &()| vec![p[0] - 2.0, p[1] - 3.0];
///
/// let result = solver.solve(residuals, &[0.0, 0.0], &()).unwrap();
/// assert!(result.converged);
/// assert!((result.params[1] - 3.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct GaussNewtonSolver {
    config: SolverConfig,
    damping: f64,
}

impl GaussNewtonSolver {
    /// Create a solver with the default damping.
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            damping: DEFAULT_DAMPING,
        }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Override the step multiplier.
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Get the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Step multiplier.
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Run damped Gauss-Newton from `x0`.
    ///
    /// # Errors
    ///
    /// * `SolverError::SingularMatrix` - `JᵀJ` is singular, e.g. fewer
    ///   residuals than parameters
    /// * `SolverError::NumericalInstability` - residuals became non-finite
    pub fn solve<C, F>(
        &self,
        residuals: F,
        x0: &[f64],
        ctx: &C,
    ) -> Result<OptimisationResult, SolverError>
    where
        C: ?Sized,
        F: Fn(&[f64], &C) -> Vec<f64>,
    {
        let mut x = x0.to_vec();
        let mut r = evaluate(&residuals, &x, ctx)?;
        validate_start(&x, &r)?;
        let n = x.len();
        let mut history = vec![norm(&r)];

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            iterations += 1;

            let jacobian =
                forward_difference_jacobian(&residuals, &x, ctx, &r, self.config.fd_step, no_projection);
            let a = jtj(&jacobian, n);
            let g: Vec<f64> = jtr(&jacobian, &r, n).iter().map(|v| -v).collect();

            let p = solve_linear(&a, &g)
                .ok_or_else(|| SolverError::singular("normal equations", x.clone(), norm(&r)))?;

            for (xi, pi) in x.iter_mut().zip(&p) {
                *xi += self.damping * pi;
            }
            r = evaluate(&residuals, &x, ctx)?;
            let residual_norm = norm(&r);
            history.push(residual_norm);

            let step_norm = norm(&p);
            debug!(
                iteration = iterations,
                residual_norm,
                step_norm,
                params = ?x,
                "Gauss-Newton step"
            );

            if step_norm < self.config.tolerance {
                converged = true;
                break;
            }
        }

        let residual_norm = norm(&r);
        Ok(OptimisationResult {
            params: x,
            residuals: r,
            residual_norm,
            iterations,
            converged,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_damping() {
        let solver = GaussNewtonSolver::with_defaults();
        assert_eq!(solver.damping(), 0.1);
        assert_eq!(solver.config().max_iterations, 100);
    }

    #[test]
    fn test_damped_linear_converges_with_budget() {
        let residuals = |p: &[f64], _: &()| vec![p[0] - 2.0, p[1] - 3.0];
        let solver = GaussNewtonSolver::new(SolverConfig::default().with_max_iterations(400));

        let result = solver.solve(residuals, &[0.0, 0.0], &()).unwrap();

        assert!(result.converged);
        assert_abs_diff_eq!(result.params[0], 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(result.params[1], 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_default_budget_returns_unconverged() {
        let residuals = |p: &[f64], _: &()| vec![p[0] - 2.0, p[1] - 3.0];
        let result = GaussNewtonSolver::with_defaults()
            .solve(residuals, &[0.0, 0.0], &())
            .unwrap();

        assert!(!result.converged);
        assert_eq!(result.iterations, 100);
        // 0.9^100 of the initial error remains
        assert!(result.residual_norm < 1e-3);
    }

    #[test]
    fn test_underdetermined_is_singular() {
        // One residual, two parameters: JᵀJ has rank one
        let residuals = |p: &[f64], _: &()| vec![p[0] + p[1] - 1.0];
        let result = GaussNewtonSolver::with_defaults().solve(residuals, &[0.0, 0.0], &());

        match result {
            Err(err) => {
                assert!(err.is_singular());
                assert_eq!(err.last_params(), Some(&[0.0, 0.0][..]));
            }
            Ok(_) => panic!("expected singular normal equations"),
        }
    }

    #[test]
    fn test_non_finite_residuals_are_error() {
        // Full step from 1.0 lands just below zero, outside the log's domain
        let residuals = |p: &[f64], _: &()| vec![p[0].ln() + 1.0];
        let solver = GaussNewtonSolver::with_defaults().with_damping(1.0);
        let result = solver.solve(residuals, &[1.0], &());
        assert!(matches!(
            result,
            Err(SolverError::NumericalInstability { .. })
        ));
    }
}

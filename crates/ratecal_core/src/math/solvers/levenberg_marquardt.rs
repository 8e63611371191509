//! Levenberg-Marquardt nonlinear least-squares solver.
//!
//! This module provides the [`LevenbergMarquardtSolver`] used for both the
//! `levenberg_marquardt` engine and, with box projection, the
//! `default_least_squares` engine.
//!
//! # Algorithm
//!
//! ```text
//! (JᵀJ + λI) δ = -Jᵀr
//! p_{n+1} = P(p_n + δ)
//! ```
//!
//! where:
//! - `J` is the forward-difference Jacobian of the residuals
//! - `λ` is the damping factor, divided by 10 on an accepted step and
//!   multiplied by 10 on a rejected one
//! - `P` is the projection of the active constraint set (identity when
//!   unconstrained)
//!
//! A trial step is accepted only when it strictly lowers the residual norm,
//! so the accepted residual norm is non-increasing. Rejected trials count as
//! iterations. The Jacobian is recomputed only after an accepted step.
//!
//! The run converges once an accepted step is shorter than the tolerance, or
//! once the projected trial step is exactly zero. Shrinking rejected steps
//! caused by growing damping do not count as convergence.
//!
//! # Example
//!
//! ```
//! use ratecal_core::math::solvers::{LMConfig, LevenbergMarquardtSolver};
//!
//! // Fit y = a * exp(-b * x) to data
//! let x_data = vec![0.0, 1.0, 2.0, 3.0, 4.0];
//! let y_data: Vec<f64> = x_data.iter().map(|x: &f64| 2.0 * (-0.5 * x).exp()).collect();
//!
//! let solver = LevenbergMarquardtSolver::new(LMConfig::default());
//!
//! // Residual function: model(x) - y
//! let residuals = |params: &[f64], data: &(Vec<f64>, Vec<f64>)| -> Vec<f64> {
//!     data.0
//!         .iter()
//!         .zip(&data.1)
//!         .map(|(&x, &y)| params[0] * (-params[1] * x).exp() - y)
//!         .collect()
//! };
//!
//! let result = solver.solve(residuals, &[1.0, 1.0], &(x_data, y_data)).unwrap();
//! assert!(result.converged);
//! assert!((result.params[0] - 2.0).abs() < 1e-4);
//! ```

use super::constraints::{ConstraintSet, Unconstrained};
use super::jacobian::forward_difference_jacobian;
use super::{evaluate, validate_start, OptimisationResult, SolverConfig};
use crate::math::linalg::{add_diagonal, jtj, jtr, norm, solve_cholesky};
use crate::types::SolverError;
use tracing::debug;

/// Configuration for the Levenberg-Marquardt solver.
///
/// # Fields
///
/// * `tolerance` - Convergence tolerance on the step norm
/// * `max_iterations` - Maximum number of iterations, rejected trials included
/// * `fd_step` - Forward-difference bump
/// * `initial_lambda` - Initial damping factor
/// * `lambda_up` - Factor to increase lambda when a step is rejected
/// * `lambda_down` - Factor to decrease lambda when a step is accepted
/// * `min_lambda` - Minimum value for lambda
/// * `max_lambda` - Maximum value for lambda
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LMConfig {
    /// Convergence tolerance on the step norm.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Forward-difference bump.
    pub fd_step: f64,
    /// Initial damping factor.
    pub initial_lambda: f64,
    /// Factor to increase lambda on rejected step.
    pub lambda_up: f64,
    /// Factor to decrease lambda on accepted step.
    pub lambda_down: f64,
    /// Minimum damping factor.
    pub min_lambda: f64,
    /// Maximum damping factor.
    pub max_lambda: f64,
}

impl Default for LMConfig {
    fn default() -> Self {
        Self::from_solver_config(&SolverConfig::default())
    }
}

impl LMConfig {
    /// Create a new LM configuration.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Default::default()
        }
    }

    /// Take tolerance, iteration cap and bump from a shared configuration,
    /// keeping the default damping schedule.
    pub fn from_solver_config(config: &SolverConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            max_iterations: config.max_iterations,
            fd_step: config.fd_step,
            initial_lambda: 1e-3,
            lambda_up: 10.0,
            lambda_down: 0.1,
            min_lambda: 1e-12,
            max_lambda: 1e12,
        }
    }
}

/// Levenberg-Marquardt nonlinear least-squares solver.
///
/// Solves problems of the form:
/// ```text
/// min_p ||r(p; ctx)||²
/// ```
///
/// where the residual function receives the problem context explicitly.
///
/// # Example
///
/// ```
/// use ratecal_core::math::solvers::LevenbergMarquardtSolver;
///
/// let solver = LevenbergMarquardtSolver::with_defaults();
///
/// // Minimize (p[0] - 2)² + (p[1] - 3)²
/// let residuals = |p: &[f64], _: &()| vec![p[0] - 2.0, p[1] - 3.0];
///
/// let result = solver.solve(residuals, &[0.0, 0.0], &()).unwrap();
/// assert!(result.converged);
/// assert!((result.params[0] - 2.0).abs() < 1e-6);
/// assert!((result.params[1] - 3.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct LevenbergMarquardtSolver {
    config: LMConfig,
}

impl LevenbergMarquardtSolver {
    /// Create a new LM solver with the given configuration.
    pub fn new(config: LMConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(LMConfig::default())
    }

    /// Get the solver configuration.
    pub fn config(&self) -> &LMConfig {
        &self.config
    }

    /// Solve the unconstrained least-squares problem.
    ///
    /// # Returns
    ///
    /// * `Ok(OptimisationResult)` - Final parameters, converged or not
    /// * `Err(SolverError::NumericalInstability)` - Residuals not finite at the start
    /// * `Err(SolverError::SingularMatrix)` - Damped normal equations unsolvable even at maximum damping
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
        self.solve_projected(residuals, x0, ctx, &Unconstrained)
    }

    /// Solve with every trial point and finite-difference bump projected
    /// onto the feasible region of `constraints`.
    ///
    /// With [`BoxConstraints`](super::BoxConstraints) this is a bounded
    /// least-squares solver.
    pub fn solve_projected<C, F, K>(
        &self,
        residuals: F,
        x0: &[f64],
        ctx: &C,
        constraints: &K,
    ) -> Result<OptimisationResult, SolverError>
    where
        C: ?Sized,
        F: Fn(&[f64], &C) -> Vec<f64>,
        K: ConstraintSet + ?Sized,
    {
        let cfg = &self.config;
        let mut x = x0.to_vec();
        constraints.project(&mut x);

        let mut r = evaluate(&residuals, &x, ctx)?;
        validate_start(&x, &r)?;
        let n = x.len();
        let mut current_norm = norm(&r);
        let mut history = vec![current_norm];
        let mut lambda = cfg.initial_lambda;

        let project = |p: &mut [f64]| constraints.project(p);
        let mut jacobian = forward_difference_jacobian(&residuals, &x, ctx, &r, cfg.fd_step, project);

        let mut iterations = 0;
        let mut converged = false;

        while iterations < cfg.max_iterations {
            iterations += 1;

            let mut a = jtj(&jacobian, n);
            add_diagonal(&mut a, lambda);
            let g: Vec<f64> = jtr(&jacobian, &r, n).iter().map(|v| -v).collect();

            let delta = match solve_cholesky(&a, &g) {
                Some(d) => d,
                None => {
                    if lambda >= cfg.max_lambda {
                        return Err(SolverError::singular(
                            "damped normal equations",
                            x,
                            current_norm,
                        ));
                    }
                    lambda = (lambda * cfg.lambda_up).min(cfg.max_lambda);
                    continue;
                }
            };

            let mut candidate: Vec<f64> = x.iter().zip(&delta).map(|(p, d)| p + d).collect();
            constraints.project(&mut candidate);
            let step: Vec<f64> = candidate.iter().zip(&x).map(|(c, p)| c - p).collect();
            let step_norm = norm(&step);

            let candidate_r = residuals(&candidate, ctx);
            let candidate_norm = norm(&candidate_r);

            // NaN compares false, so a non-finite trial is always rejected
            let accepted = candidate_norm < current_norm;
            if accepted {
                x = candidate;
                r = candidate_r;
                current_norm = candidate_norm;
                history.push(current_norm);
                lambda = (lambda * cfg.lambda_down).max(cfg.min_lambda);
                jacobian = forward_difference_jacobian(&residuals, &x, ctx, &r, cfg.fd_step, project);
                debug!(
                    iteration = iterations,
                    residual_norm = current_norm,
                    lambda,
                    params = ?x,
                    "LM step accepted"
                );
            } else {
                lambda = (lambda * cfg.lambda_up).min(cfg.max_lambda);
                debug!(
                    iteration = iterations,
                    trial_norm = candidate_norm,
                    lambda,
                    "LM step rejected"
                );
            }

            // A rejected trial only signals convergence when it left the point unchanged
            if step_norm < cfg.tolerance && (accepted || step_norm == 0.0) {
                converged = true;
                break;
            }
        }

        Ok(OptimisationResult {
            params: x,
            residuals: r,
            residual_norm: current_norm,
            iterations,
            converged,
            history,
        })
    }
}

//! Sequential quadratic programming with BFGS Hessian updates.
//!
//! Minimises `½‖r(x)‖²` subject to `g(x) <= 0` from a [`ConstraintSet`].
//!
//! # Algorithm
//!
//! Each iteration:
//! 1. Gradient `∇f = Jᵀr` from the forward-difference Jacobian (bumps
//!    projected onto the feasible region).
//! 2. Constraints with `g_i >= -active_tolerance` form the active set `A`.
//! 3. With active constraints, solve the regularised KKT system
//!    ```text
//!    [ B + εI  Aᵀ ] [ p ]     [ ∇f ]
//!    [ A       0  ] [ λ ] = - [ c  ]
//!    ```
//!    dropping the constraint with the most negative multiplier and
//!    re-solving until every multiplier is non-negative. With no active
//!    constraints take the damped quasi-Newton step `p = -(B + μI)⁻¹∇f`.
//! 4. Project `x + p`, then update `B` by BFGS with `s` the step actually
//!    taken and `y` the gradient change. The update is skipped when
//!    `yᵀs` or `sᵀBs` is not safely positive.
//!
//! Terminates when `‖s‖` falls below the tolerance.

use super::constraints::ConstraintSet;
use super::jacobian::forward_difference_jacobian;
use super::{evaluate, validate_start, OptimisationResult, SolverConfig};
use crate::math::linalg::{add_diagonal, dot, identity, jtr, mat_vec, norm, solve_cholesky, solve_linear};
use crate::types::SolverError;
use tracing::debug;

/// Multipliers above `-MULTIPLIER_EPSILON` keep their constraint active.
const MULTIPLIER_EPSILON: f64 = 1e-12;

/// Configuration for the SQP solver.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SqpConfig {
    /// Convergence tolerance on the step norm.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Forward-difference bump.
    pub fd_step: f64,
    /// Constraints with `g_i >= -active_tolerance` are treated as active.
    pub active_tolerance: f64,
    /// Diagonal shift added to `B` inside the KKT matrix.
    pub kkt_regularisation: f64,
    /// Diagonal shift `μ` for the unconstrained quasi-Newton step.
    pub newton_damping: f64,
    /// Minimum `yᵀs` and `sᵀBs` for a BFGS update.
    pub curvature_threshold: f64,
}

impl Default for SqpConfig {
    fn default() -> Self {
        Self::from_solver_config(&SolverConfig::default())
    }
}

impl SqpConfig {
    /// Take tolerance, iteration cap and bump from a shared configuration.
    pub fn from_solver_config(config: &SolverConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            max_iterations: config.max_iterations,
            fd_step: config.fd_step,
            active_tolerance: 1e-3,
            kkt_regularisation: 1e-8,
            newton_damping: 1e-3,
            curvature_threshold: 1e-10,
        }
    }
}

/// Constrained least-squares solver.
///
/// # Example
///
/// ```
/// use ratecal_core::math::solvers::{BoxConstraints, SqpSolver};
///
/// // Unconstrained minimum at -1, feasible region x >= 0
/// let bounds = BoxConstraints::new(vec![0.0], vec![f64::INFINITY]).unwrap();
/// let solver = SqpSolver::with_defaults(bounds);
///
/// let result = solver.solve(|p: &[f64], _: &()| vec![p[0] + 1.0], &[0.5], &()).unwrap();
/// assert!(result.converged);
/// assert!(result.params[0].abs() < 1e-8);
/// ```
#[derive(Debug, Clone)]
pub struct SqpSolver<K> {
    config: SqpConfig,
    constraints: K,
}

impl<K: ConstraintSet> SqpSolver<K> {
    /// Create a solver over `constraints`.
    pub fn new(config: SqpConfig, constraints: K) -> Self {
        Self {
            config,
            constraints,
        }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults(constraints: K) -> Self {
        Self::new(SqpConfig::default(), constraints)
    }

    /// Get the solver configuration.
    pub fn config(&self) -> &SqpConfig {
        &self.config
    }

    /// The constraint set.
    pub fn constraints(&self) -> &K {
        &self.constraints
    }

    /// Minimise `½‖r(x)‖²` from the projection of `x0`.
    ///
    /// # Errors
    ///
    /// * `SolverError::SingularMatrix` - KKT system or quasi-Newton system singular
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
        let cfg = &self.config;
        let project = |p: &mut [f64]| self.constraints.project(p);

        let mut x = x0.to_vec();
        project(&mut x);
        let mut r = evaluate(&residuals, &x, ctx)?;
        validate_start(&x, &r)?;
        let n = x.len();
        let mut history = vec![norm(&r)];

        let mut b = identity(n);
        let mut grad = {
            let jac = forward_difference_jacobian(&residuals, &x, ctx, &r, cfg.fd_step, project);
            jtr(&jac, &r, n)
        };

        let mut iterations = 0;
        let mut converged = false;

        while iterations < cfg.max_iterations {
            iterations += 1;

            let g = self.constraints.values(&x);
            let rows = self.constraints.gradients(&x);
            let mut active: Vec<usize> = (0..g.len())
                .filter(|&i| g[i] >= -cfg.active_tolerance)
                .collect();

            let p = loop {
                if active.is_empty() {
                    break self.quasi_newton_step(&b, &grad).ok_or_else(|| {
                        SolverError::singular("quasi-Newton step", x.clone(), norm(&r))
                    })?;
                }
                let a: Vec<&[f64]> = active.iter().map(|&i| rows[i].as_slice()).collect();
                let c: Vec<f64> = active.iter().map(|&i| g[i]).collect();
                let (p, multipliers) = self
                    .kkt_step(&b, &grad, &a, &c)
                    .ok_or_else(|| SolverError::singular("KKT system", x.clone(), norm(&r)))?;

                // Release the constraint with the most negative multiplier
                match most_negative(&multipliers) {
                    Some(k) => {
                        active.remove(k);
                    }
                    None => break p,
                }
            };

            let mut candidate: Vec<f64> = x.iter().zip(&p).map(|(xi, pi)| xi + pi).collect();
            project(&mut candidate);
            let candidate_r = evaluate(&residuals, &candidate, ctx)?;

            let jac = forward_difference_jacobian(
                &residuals,
                &candidate,
                ctx,
                &candidate_r,
                cfg.fd_step,
                project,
            );
            let candidate_grad = jtr(&jac, &candidate_r, n);

            let s: Vec<f64> = candidate.iter().zip(&x).map(|(c, xi)| c - xi).collect();
            let y: Vec<f64> = candidate_grad.iter().zip(&grad).map(|(gn, go)| gn - go).collect();
            self.bfgs_update(&mut b, &s, &y);

            x = candidate;
            r = candidate_r;
            grad = candidate_grad;

            let residual_norm = norm(&r);
            history.push(residual_norm);
            let step_norm = norm(&s);
            debug!(
                iteration = iterations,
                residual_norm,
                step_norm,
                active = active.len(),
                params = ?x,
                "SQP step"
            );

            if step_norm < cfg.tolerance {
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

    /// `p = -(B + μI)⁻¹ ∇f`
    fn quasi_newton_step(&self, b: &[Vec<f64>], grad: &[f64]) -> Option<Vec<f64>> {
        let mut m = b.to_vec();
        add_diagonal(&mut m, self.config.newton_damping);
        let rhs: Vec<f64> = grad.iter().map(|v| -v).collect();
        solve_cholesky(&m, &rhs).or_else(|| solve_linear(&m, &rhs))
    }

    /// Step and multipliers from the KKT system of the active constraints.
    fn kkt_step(
        &self,
        b: &[Vec<f64>],
        grad: &[f64],
        active_rows: &[&[f64]],
        active_values: &[f64],
    ) -> Option<(Vec<f64>, Vec<f64>)> {
        let n = grad.len();
        let m = active_rows.len();
        let size = n + m;

        let mut kkt = vec![vec![0.0; size]; size];
        for i in 0..n {
            kkt[i][..n].copy_from_slice(&b[i]);
            kkt[i][i] += self.config.kkt_regularisation;
        }
        for (k, row) in active_rows.iter().enumerate() {
            for j in 0..n {
                kkt[n + k][j] = row[j];
                kkt[j][n + k] = row[j];
            }
        }

        let mut rhs = Vec::with_capacity(size);
        rhs.extend(grad.iter().map(|v| -v));
        rhs.extend(active_values.iter().map(|v| -v));

        let mut step = solve_linear(&kkt, &rhs)?;
        let multipliers = step.split_off(n);
        Some((step, multipliers))
    }

    fn bfgs_update(&self, b: &mut [Vec<f64>], s: &[f64], y: &[f64]) {
        let ys = dot(y, s);
        let bs = mat_vec(b, s);
        let sbs = dot(s, &bs);
        if ys <= self.config.curvature_threshold || sbs <= self.config.curvature_threshold {
            return;
        }

        for (i, row) in b.iter_mut().enumerate() {
            for (j, bij) in row.iter_mut().enumerate() {
                *bij += y[i] * y[j] / ys - bs[i] * bs[j] / sbs;
            }
        }
    }
}

/// Index of the most negative multiplier, ignoring round-off.
fn most_negative(multipliers: &[f64]) -> Option<usize> {
    multipliers
        .iter()
        .enumerate()
        .filter(|(_, m)| **m < -MULTIPLIER_EPSILON)
        .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
}

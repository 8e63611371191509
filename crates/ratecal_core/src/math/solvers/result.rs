//! Optimisation outcome shared by every solver.

/// Outcome of a least-squares optimisation.
///
/// Non-convergence is not an error: a solver that exhausts its iteration
/// budget returns its best estimate with `converged == false` and leaves
/// the decision to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimisationResult {
    /// Final parameters
    pub params: Vec<f64>,
    /// Residuals at the final parameters
    pub residuals: Vec<f64>,
    /// Euclidean norm of `residuals`
    pub residual_norm: f64,
    /// Number of iterations performed
    pub iterations: usize,
    /// Whether the step-norm tolerance was reached
    pub converged: bool,
    /// Residual norm at the initial point followed by the norm after every
    /// accepted step
    pub history: Vec<f64>,
}

impl OptimisationResult {
    /// Root-mean-square of the residuals.
    ///
    /// # Example
    ///
    /// ```
    /// use ratecal_core::math::solvers::OptimisationResult;
    ///
    /// let result = OptimisationResult {
    ///     params: vec![1.0],
    ///     residuals: vec![3.0, -4.0],
    ///     residual_norm: 5.0,
    ///     iterations: 1,
    ///     converged: true,
    ///     history: vec![5.0],
    /// };
    /// assert!((result.rmse() - 12.5_f64.sqrt()).abs() < 1e-15);
    /// assert_eq!(result.max_abs_residual(), 4.0);
    /// ```
    pub fn rmse(&self) -> f64 {
        if self.residuals.is_empty() {
            return 0.0;
        }
        (self.sum_of_squares() / self.residuals.len() as f64).sqrt()
    }

    /// Largest absolute residual.
    pub fn max_abs_residual(&self) -> f64 {
        self.residuals.iter().fold(0.0_f64, |acc, r| acc.max(r.abs()))
    }

    /// Sum of squared residuals.
    pub fn sum_of_squares(&self) -> f64 {
        self.residuals.iter().map(|r| r * r).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(residuals: Vec<f64>) -> OptimisationResult {
        let norm = residuals.iter().map(|r| r * r).sum::<f64>().sqrt();
        OptimisationResult {
            params: vec![0.0],
            residuals,
            residual_norm: norm,
            iterations: 0,
            converged: false,
            history: vec![norm],
        }
    }

    #[test]
    fn test_statistics() {
        let r = sample(vec![1.0, -1.0, 1.0, -1.0]);
        assert_eq!(r.rmse(), 1.0);
        assert_eq!(r.max_abs_residual(), 1.0);
        assert_eq!(r.sum_of_squares(), 4.0);
    }

    #[test]
    fn test_empty_residuals() {
        let r = sample(vec![]);
        assert_eq!(r.rmse(), 0.0);
        assert_eq!(r.max_abs_residual(), 0.0);
    }
}

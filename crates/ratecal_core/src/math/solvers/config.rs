//! Solver configuration types.

use crate::types::ConfigurationError;

/// Configuration shared by every least-squares solver.
///
/// # Example
///
/// ```
/// use ratecal_core::math::solvers::SolverConfig;
///
/// // Use default configuration
/// let config = SolverConfig::default();
/// assert_eq!(config.tolerance, 1e-6);
/// assert_eq!(config.max_iterations, 100);
/// assert_eq!(config.fd_step, 0.01);
///
/// // Custom configuration
/// let custom = SolverConfig::default().with_max_iterations(500);
/// assert_eq!(custom.max_iterations, 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Convergence tolerance on the Euclidean norm of the parameter step.
    pub tolerance: f64,

    /// Maximum number of iterations before returning unconverged.
    ///
    /// Rejected Levenberg-Marquardt trial steps count as iterations.
    pub max_iterations: usize,

    /// Forward-difference bump applied to each parameter when building
    /// the Jacobian.
    pub fd_step: f64,
}

impl Default for SolverConfig {
    /// Default values:
    /// - `tolerance`: 1e-6
    /// - `max_iterations`: 100
    /// - `fd_step`: 0.01
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 100,
            fd_step: 0.01,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with specified tolerance and iteration cap.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Default::default()
        }
    }

    /// Set the step-norm tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the finite-difference bump.
    pub fn with_fd_step(mut self, fd_step: f64) -> Self {
        self.fd_step = fd_step;
        self
    }

    /// Check that every field is usable.
    ///
    /// # Example
    ///
    /// ```
    /// use ratecal_core::math::solvers::SolverConfig;
    ///
    /// assert!(SolverConfig::default().validate().is_ok());
    /// assert!(SolverConfig::default().with_fd_step(0.0).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.tolerance <= 0.0 || self.tolerance.is_nan() {
            return Err(ConfigurationError::invalid_value(
                "tolerance",
                format!("must be positive, got {}", self.tolerance),
            ));
        }
        if self.max_iterations == 0 {
            return Err(ConfigurationError::invalid_value(
                "max_iterations",
                "must be at least 1",
            ));
        }
        if self.fd_step <= 0.0 || !self.fd_step.is_finite() {
            return Err(ConfigurationError::invalid_value(
                "fd_step",
                format!("must be positive and finite, got {}", self.fd_step),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = SolverConfig::default();
        assert_eq!(config.tolerance, 1e-6);
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.fd_step, 0.01);
    }

    #[test]
    fn test_new_keeps_default_bump() {
        let config = SolverConfig::new(1e-8, 50);
        assert_eq!(config.tolerance, 1e-8);
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.fd_step, 0.01);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(SolverConfig::default().with_tolerance(-1.0).validate().is_err());
        assert!(SolverConfig::default().with_tolerance(f64::NAN).validate().is_err());
        assert!(SolverConfig::default().with_max_iterations(0).validate().is_err());
        assert!(SolverConfig::default()
            .with_fd_step(f64::INFINITY)
            .validate()
            .is_err());
    }
}

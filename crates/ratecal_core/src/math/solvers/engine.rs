//! Calibration engine selection.

use super::constraints::{BoxConstraints, ConstraintSet};
use super::{
    GaussNewtonSolver, LMConfig, LevenbergMarquardtSolver, OptimisationResult, SolverConfig,
    SqpConfig, SqpSolver,
};
use crate::types::{ConfigurationError, SolverError};
use std::fmt;
use std::str::FromStr;

/// Optimisation engine used by every calibrator.
///
/// Names are parsed and displayed in snake_case.
///
/// # Example
///
/// ```
/// use ratecal_core::math::solvers::CalibrationEngine;
///
/// let engine: CalibrationEngine = "levenberg_marquardt".parse().unwrap();
/// assert_eq!(engine, CalibrationEngine::LevenbergMarquardt);
/// assert_eq!(engine.to_string(), "levenberg_marquardt");
///
/// assert!("simplex".parse::<CalibrationEngine>().is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CalibrationEngine {
    /// Levenberg-Marquardt with trial points projected onto box bounds.
    #[default]
    DefaultLeastSquares,
    /// Damped Gauss-Newton, unconstrained.
    GaussNewton,
    /// Levenberg-Marquardt, unconstrained.
    LevenbergMarquardt,
    /// Active-set SQP with BFGS Hessian over the model's constraint set.
    Sqp,
}

impl CalibrationEngine {
    /// Every engine, in display order.
    pub const ALL: [CalibrationEngine; 4] = [
        CalibrationEngine::DefaultLeastSquares,
        CalibrationEngine::GaussNewton,
        CalibrationEngine::LevenbergMarquardt,
        CalibrationEngine::Sqp,
    ];

    /// Canonical snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CalibrationEngine::DefaultLeastSquares => "default_least_squares",
            CalibrationEngine::GaussNewton => "gauss_newton",
            CalibrationEngine::LevenbergMarquardt => "levenberg_marquardt",
            CalibrationEngine::Sqp => "sqp",
        }
    }

    /// Run this engine on `residuals` from `x0`.
    ///
    /// The default engine projects onto `domain.bounds`; SQP enforces
    /// `domain.constraints`; Gauss-Newton and Levenberg-Marquardt ignore
    /// both.
    pub fn optimise<C, F>(
        &self,
        residuals: F,
        x0: &[f64],
        ctx: &C,
        domain: &ParameterDomain<'_>,
        config: &SolverConfig,
    ) -> Result<OptimisationResult, SolverError>
    where
        C: ?Sized,
        F: Fn(&[f64], &C) -> Vec<f64>,
    {
        match self {
            CalibrationEngine::DefaultLeastSquares => {
                LevenbergMarquardtSolver::new(LMConfig::from_solver_config(config))
                    .solve_projected(residuals, x0, ctx, domain.bounds)
            }
            CalibrationEngine::GaussNewton => {
                GaussNewtonSolver::new(*config).solve(residuals, x0, ctx)
            }
            CalibrationEngine::LevenbergMarquardt => {
                LevenbergMarquardtSolver::new(LMConfig::from_solver_config(config))
                    .solve(residuals, x0, ctx)
            }
            CalibrationEngine::Sqp => {
                SqpSolver::new(SqpConfig::from_solver_config(config), domain.constraints)
                    .solve(residuals, x0, ctx)
            }
        }
    }
}

impl fmt::Display for CalibrationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalibrationEngine {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default_least_squares" | "default" => Ok(CalibrationEngine::DefaultLeastSquares),
            "gauss_newton" => Ok(CalibrationEngine::GaussNewton),
            "levenberg_marquardt" | "lm" => Ok(CalibrationEngine::LevenbergMarquardt),
            "sqp" => Ok(CalibrationEngine::Sqp),
            _ => Err(ConfigurationError::UnsupportedEngine(s.to_string())),
        }
    }
}

/// Feasible region handed to [`CalibrationEngine::optimise`].
#[derive(Clone, Copy)]
pub struct ParameterDomain<'a> {
    /// Box bounds for the default least-squares engine.
    pub bounds: &'a BoxConstraints,
    /// Inequality constraints for SQP.
    pub constraints: &'a dyn ConstraintSet,
}

impl<'a> ParameterDomain<'a> {
    /// Domain from box bounds and a constraint set.
    pub fn new(bounds: &'a BoxConstraints, constraints: &'a dyn ConstraintSet) -> Self {
        Self {
            bounds,
            constraints,
        }
    }

    /// Domain where the box bounds double as the SQP constraints.
    pub fn boxed(bounds: &'a BoxConstraints) -> Self {
        Self::new(bounds, bounds)
    }
}

impl fmt::Debug for ParameterDomain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterDomain")
            .field("bounds", self.bounds)
            .finish_non_exhaustive()
    }
}

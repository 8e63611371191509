//! Nelson-Siegel curve calibration.
//!
//! [`OisCurveCalibrator`] fits a [`NelsonSiegelCurve`] to overnight swaps
//! and futures; [`ForwardCurveCalibrator`] fits a second one to 3M swaps
//! discounted on a completed OIS curve. Both minimise the instruments'
//! model-minus-market residuals with the configured engine.
//!
//! `tau` is floored at [`TAU_FLOOR`]: the bounded and SQP engines enforce
//! it directly and every trial point is projected before the curve is
//! built, so the unconstrained engines never see a degenerate curve.

use ratecal_core::market_data::curves::{nelson_siegel, NelsonSiegelCurve, YieldCurve};
use ratecal_core::market_data::MarketDataError;
use ratecal_core::math::solvers::{
    BoxConstraints, CalibrationEngine, ConstraintSet, OptimisationResult, ParameterDomain,
    SolverConfig,
};
use ratecal_core::types::{ConfigurationError, SolverError};
use ratecal_models::calibration::CalibrationDiagnostics;
use ratecal_models::instruments::{RateInstrument, Swap3M};
use tracing::debug;

use super::error::CurveCalibrationError;

/// Smallest admissible Nelson-Siegel decay time.
pub const TAU_FLOOR: f64 = 1e-4;

/// `tau >= TAU_FLOOR` as a constraint set.
#[derive(Debug, Clone, Copy, Default)]
pub struct NelsonSiegelConstraints;

impl ConstraintSet for NelsonSiegelConstraints {
    fn values(&self, x: &[f64]) -> Vec<f64> {
        vec![TAU_FLOOR - x[3]]
    }

    fn gradients(&self, _x: &[f64]) -> Vec<Vec<f64>> {
        vec![vec![0.0, 0.0, 0.0, -1.0]]
    }

    fn project(&self, x: &mut [f64]) {
        x[3] = x[3].max(TAU_FLOOR);
    }
}

/// Box bounds leaving the betas free and flooring `tau`.
pub fn nelson_siegel_bounds() -> Result<BoxConstraints, SolverError> {
    BoxConstraints::new(
        vec![f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY, TAU_FLOOR],
        vec![f64::INFINITY; 4],
    )
}

/// Curve calibration configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CurveCalibrationConfig {
    /// Optimisation engine
    pub engine: CalibrationEngine,
    /// Solver tolerances
    pub solver: SolverConfig,
    /// Starting point `[beta0, beta1, beta2, tau]`
    pub initial_guess: [f64; 4],
}

impl Default for CurveCalibrationConfig {
    fn default() -> Self {
        Self {
            engine: CalibrationEngine::default(),
            solver: SolverConfig::default(),
            initial_guess: nelson_siegel::INITIAL_GUESS,
        }
    }
}

impl CurveCalibrationConfig {
    /// Set the engine.
    pub fn with_engine(mut self, engine: CalibrationEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Set the solver configuration.
    pub fn with_solver_config(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Set the initial guess.
    pub fn with_initial_guess(mut self, initial_guess: [f64; 4]) -> Self {
        self.initial_guess = initial_guess;
        self
    }
}

/// Fitted curve with its diagnostics.
#[derive(Debug, Clone)]
pub struct CurveCalibration {
    /// Fitted curve
    pub curve: NelsonSiegelCurve<f64>,
    /// Fit diagnostics
    pub diagnostics: CalibrationDiagnostics,
}

/// Context for the OIS residual function.
struct OisContext<'a> {
    instruments: &'a [RateInstrument],
}

/// Context for the 3M residual function.
struct ForwardContext<'a, O: ?Sized> {
    ois: &'a O,
    swaps: &'a [Swap3M],
}

/// Fits a Nelson-Siegel discount curve to OIS swaps and futures.
///
/// # Example
///
/// ```
/// use ratecal_models::instruments::{OisSwap, RateInstrument};
/// use ratecal_optimiser::calibration::OisCurveCalibrator;
///
/// let instruments: Vec<RateInstrument> = [(1.0, 0.02), (2.0, 0.022), (5.0, 0.025)]
///     .iter()
///     .map(|(t, r)| OisSwap::new(*t, *r).unwrap().into())
///     .collect();
///
/// let fit = OisCurveCalibrator::default().calibrate(&instruments).unwrap();
/// assert!(fit.diagnostics.max_abs_residual < 1e-4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OisCurveCalibrator {
    config: CurveCalibrationConfig,
}

impl OisCurveCalibrator {
    /// Create a calibrator.
    pub fn new(config: CurveCalibrationConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &CurveCalibrationConfig {
        &self.config
    }

    /// Fit the curve to `instruments`.
    ///
    /// # Errors
    ///
    /// * `CurveCalibrationError::EmptyInstruments` - nothing to fit
    /// * `CurveCalibrationError::Configuration` - a 3M swap was supplied, or the
    ///   solver configuration is invalid
    /// * `CurveCalibrationError::Solver` - the engine failed
    pub fn calibrate(
        &self,
        instruments: &[RateInstrument],
    ) -> Result<CurveCalibration, CurveCalibrationError> {
        if instruments.is_empty() {
            return Err(CurveCalibrationError::EmptyInstruments);
        }
        if let Some(inst) = instruments.iter().find(|i| !i.is_overnight()) {
            return Err(ConfigurationError::unsupported_instrument(
                inst.to_string(),
                "OIS curve calibration",
            )
            .into());
        }

        let residuals = |p: &[f64], ctx: &OisContext<'_>| -> Vec<f64> {
            match curve_at(p) {
                Ok(curve) => ctx
                    .instruments
                    .iter()
                    .map(|inst| ois_residual(inst, &curve).unwrap_or(f64::NAN))
                    .collect(),
                Err(_) => vec![f64::NAN; ctx.instruments.len()],
            }
        };

        let ctx = OisContext { instruments };
        let result = run_engine(&self.config, residuals, &ctx, instruments.len())?;
        finish(self.config.engine, result, "ois_curve")
    }
}

/// Fits a Nelson-Siegel 3M projection curve to 3M swaps.
#[derive(Debug, Clone, Default)]
pub struct ForwardCurveCalibrator {
    config: CurveCalibrationConfig,
}

impl ForwardCurveCalibrator {
    /// Create a calibrator.
    pub fn new(config: CurveCalibrationConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &CurveCalibrationConfig {
        &self.config
    }

    /// Fit the 3M curve to `instruments`, discounting on `ois`.
    ///
    /// # Errors
    ///
    /// As [`OisCurveCalibrator::calibrate`]; here any overnight instrument
    /// is the unsupported kind.
    pub fn calibrate<O>(
        &self,
        ois: &O,
        instruments: &[RateInstrument],
    ) -> Result<CurveCalibration, CurveCalibrationError>
    where
        O: YieldCurve<f64> + ?Sized,
    {
        if instruments.is_empty() {
            return Err(CurveCalibrationError::EmptyInstruments);
        }
        let swaps = instruments
            .iter()
            .map(|inst| match inst {
                RateInstrument::Swap3M(swap) => Ok(*swap),
                other => Err(ConfigurationError::unsupported_instrument(
                    other.to_string(),
                    "3M curve calibration",
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let residuals = |p: &[f64], ctx: &ForwardContext<'_, O>| -> Vec<f64> {
            match curve_at(p) {
                Ok(forward) => ctx
                    .swaps
                    .iter()
                    .map(|swap| swap.residual(ctx.ois, &forward).unwrap_or(f64::NAN))
                    .collect(),
                Err(_) => vec![f64::NAN; ctx.swaps.len()],
            }
        };

        let ctx = ForwardContext { ois, swaps: &swaps };
        let result = run_engine(&self.config, residuals, &ctx, swaps.len())?;
        finish(self.config.engine, result, "forward_curve")
    }
}

/// Curve at the projection of `p`.
fn curve_at(p: &[f64]) -> Result<NelsonSiegelCurve<f64>, MarketDataError> {
    let mut x = p.to_vec();
    if x.len() == 4 {
        NelsonSiegelConstraints.project(&mut x);
    }
    NelsonSiegelCurve::from_params(&x)
}

fn ois_residual(
    inst: &RateInstrument,
    curve: &NelsonSiegelCurve<f64>,
) -> Result<f64, CurveCalibrationError> {
    match inst {
        RateInstrument::OisSwap(swap) => Ok(swap.residual(curve)?),
        RateInstrument::OisFuture(future) => Ok(future.residual(curve)?),
        RateInstrument::Swap3M(_) => Err(ConfigurationError::unsupported_instrument(
            inst.to_string(),
            "OIS curve calibration",
        )
        .into()),
    }
}

fn run_engine<C, F>(
    config: &CurveCalibrationConfig,
    residuals: F,
    ctx: &C,
    n_instruments: usize,
) -> Result<OptimisationResult, CurveCalibrationError>
where
    F: Fn(&[f64], &C) -> Vec<f64>,
{
    config.solver.validate()?;
    let bounds = nelson_siegel_bounds()?;
    let domain = ParameterDomain::new(&bounds, &NelsonSiegelConstraints);

    debug!(instruments = n_instruments, engine = %config.engine, "Calibrating Nelson-Siegel curve");
    Ok(config
        .engine
        .optimise(residuals, &config.initial_guess, ctx, &domain, &config.solver)?)
}

fn finish(
    engine: CalibrationEngine,
    result: OptimisationResult,
    target: &str,
) -> Result<CurveCalibration, CurveCalibrationError> {
    let curve = curve_at(&result.params).map_err(|source| CurveCalibrationError::InvalidFit {
        params: result.params.clone(),
        residual_norm: result.residual_norm,
        source,
    })?;

    let diagnostics = CalibrationDiagnostics::from_result(engine, &result);
    diagnostics.log(target);
    Ok(CurveCalibration { curve, diagnostics })
}

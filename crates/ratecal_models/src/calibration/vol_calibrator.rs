//! Per-expiry SABR calibration.
//!
//! Quotes are grouped by expiry and one SABR smile is fitted per group by
//! minimising
//!
//! ```text
//! r_i(alpha, rho, nu) = σ_SABR(T, K_i, F_i; alpha, rho, nu) - σ_market,i
//! ```
//!
//! with the configured [`CalibrationEngine`].

use ratecal_core::math::solvers::{CalibrationEngine, ParameterDomain, SolverConfig};
use tracing::debug;

use super::error::CalibrationError;
use super::result::{CalibrationDiagnostics, SmileCalibration};
use crate::models::sabr::{self, SabrConstraints, SabrParams};

/// Market implied volatility for one `(expiry, strike)` point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct VolQuote {
    /// Expiry in years
    pub expiry: f64,
    /// Strike
    pub strike: f64,
    /// Market implied volatility
    pub market_vol: f64,
    /// Forward at expiry
    pub forward: f64,
}

impl VolQuote {
    /// Create a quote.
    pub fn new(expiry: f64, strike: f64, market_vol: f64, forward: f64) -> Self {
        Self {
            expiry,
            strike,
            market_vol,
            forward,
        }
    }

    /// Check that every field is positive and finite.
    ///
    /// `index` is reported back in the error.
    pub fn validate(&self, index: usize) -> Result<(), CalibrationError> {
        for (field, value) in [
            ("expiry", self.expiry),
            ("strike", self.strike),
            ("market_vol", self.market_vol),
            ("forward", self.forward),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(CalibrationError::invalid_quote(index, field, value));
            }
        }
        Ok(())
    }

    /// Model minus market volatility under `params = [alpha, rho, nu]`.
    #[inline]
    fn residual(&self, params: &[f64]) -> f64 {
        sabr::implied_vol(
            self.expiry,
            self.strike,
            self.forward,
            params[0],
            params[1],
            params[2],
        ) - self.market_vol
    }
}

/// Volatility calibration configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VolCalibrationConfig {
    /// Optimisation engine
    pub engine: CalibrationEngine,
    /// Solver tolerances shared by every engine
    pub solver: SolverConfig,
    /// Starting point `[alpha, rho, nu]`
    pub initial_guess: [f64; 3],
}

impl Default for VolCalibrationConfig {
    fn default() -> Self {
        Self {
            engine: CalibrationEngine::default(),
            solver: SolverConfig::default(),
            initial_guess: sabr::INITIAL_GUESS,
        }
    }
}

impl VolCalibrationConfig {
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
    pub fn with_initial_guess(mut self, initial_guess: [f64; 3]) -> Self {
        self.initial_guess = initial_guess;
        self
    }
}

/// SABR volatility calibrator.
///
/// # Example
///
/// ```
/// use ratecal_models::calibration::{VolCalibrator, VolQuote};
///
/// let calibrator = VolCalibrator::default();
/// let smiles = calibrator
///     .calibrate(&[VolQuote::new(1.0, 100.0, 0.2, 99.0)])
///     .unwrap();
///
/// assert_eq!(smiles.len(), 1);
/// assert!((smiles[0].vol(100.0, 99.0) - 0.2).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VolCalibrator {
    config: VolCalibrationConfig,
}

impl VolCalibrator {
    /// Create a calibrator.
    pub fn new(config: VolCalibrationConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &VolCalibrationConfig {
        &self.config
    }

    /// Calibrate one smile per distinct expiry, in ascending expiry order.
    ///
    /// # Errors
    ///
    /// * `CalibrationError::EmptyQuotes` - `quotes` is empty
    /// * `CalibrationError::InvalidQuote` - a quote field is not positive and finite
    /// * `CalibrationError::Solver` - the engine failed
    /// * `CalibrationError::InvalidFit` - an unconstrained engine left the SABR domain
    pub fn calibrate(&self, quotes: &[VolQuote]) -> Result<Vec<SmileCalibration>, CalibrationError> {
        if quotes.is_empty() {
            return Err(CalibrationError::EmptyQuotes);
        }
        for (i, quote) in quotes.iter().enumerate() {
            quote.validate(i)?;
        }

        group_by_expiry(quotes)
            .into_iter()
            .map(|(expiry, group)| self.calibrate_smile(expiry, &group))
            .collect()
    }

    /// Calibrate a single smile to `quotes`, all quoted at `expiry`.
    pub fn calibrate_smile(
        &self,
        expiry: f64,
        quotes: &[VolQuote],
    ) -> Result<SmileCalibration, CalibrationError> {
        if quotes.is_empty() {
            return Err(CalibrationError::EmptyQuotes);
        }
        self.config.solver.validate()?;

        let bounds = sabr::default_bounds()?;
        let domain = ParameterDomain::new(&bounds, &SabrConstraints);
        let residuals = |p: &[f64], qs: &[VolQuote]| -> Vec<f64> {
            qs.iter().map(|q| q.residual(p)).collect()
        };

        debug!(expiry, quotes = quotes.len(), engine = %self.config.engine, "Calibrating SABR smile");
        let result = self.config.engine.optimise(
            residuals,
            &self.config.initial_guess,
            quotes,
            &domain,
            &self.config.solver,
        )?;

        let params =
            SabrParams::from_slice(&result.params).map_err(|source| CalibrationError::InvalidFit {
                params: result.params.clone(),
                residual_norm: result.residual_norm,
                source,
            })?;

        let diagnostics = CalibrationDiagnostics::from_result(self.config.engine, &result);
        diagnostics.log("sabr_smile");

        Ok(SmileCalibration {
            expiry,
            params,
            diagnostics,
        })
    }
}

/// Group quotes by exact expiry, ascending.
fn group_by_expiry(quotes: &[VolQuote]) -> Vec<(f64, Vec<VolQuote>)> {
    let mut sorted = quotes.to_vec();
    sorted.sort_by(|a, b| a.expiry.total_cmp(&b.expiry));

    let mut groups: Vec<(f64, Vec<VolQuote>)> = Vec::new();
    for quote in sorted {
        if let Some((expiry, group)) = groups.last_mut() {
            if *expiry == quote.expiry {
                group.push(quote);
                continue;
            }
        }
        groups.push((quote.expiry, vec![quote]));
    }
    groups
}

//! Sequential multi-curve bootstrapper.
//!
//! Phase 1 strips the OIS discount curve from overnight swaps and futures.
//! Phase 2 strips the 3M forward curve from fixed-versus-3M swaps, using the
//! completed OIS curve for discounting. Each pillar has a closed-form
//! solution given the knots already on the curve, so no root finder is
//! involved.
//!
//! ## Algorithm
//!
//! For each instrument in the caller's order:
//! 1. Check the maturity is positive, within range and after the previous pillar
//! 2. Solve the pillar discount factor from the partial curve
//! 3. Append `(T, df)` to the curve builder
//!
//! Instruments are never re-sorted.

use ratecal_core::market_data::curves::{CurveBuilder, LogLinearCurve, YieldCurve};
use ratecal_core::types::ConfigurationError;
use ratecal_models::instruments::{InstrumentError, OisFuture, OisSwap, RateInstrument, Swap3M};
use tracing::{debug, info, warn};

use super::config::BootstrapConfig;
use super::error::BootstrapError;
use crate::curve_pair::CurvePair;

/// Result of a two-phase bootstrap.
#[derive(Debug, Clone)]
pub struct BootstrapResult {
    /// Bootstrapped OIS and 3M curves
    pub curves: CurvePair<LogLinearCurve<f64>>,
    /// Repricing residual of each OIS instrument on the final OIS curve
    pub ois_residuals: Vec<f64>,
    /// Repricing residual of each 3M swap on the final curve pair
    pub forward_residuals: Vec<f64>,
}

impl BootstrapResult {
    /// Largest absolute repricing residual across both phases.
    pub fn max_residual(&self) -> f64 {
        self.ois_residuals
            .iter()
            .chain(&self.forward_residuals)
            .fold(0.0_f64, |acc, r| acc.max(r.abs()))
    }
}

/// Two-phase OIS and 3M bootstrapper.
///
/// # Example
///
/// ```
/// use ratecal_core::market_data::curves::YieldCurve;
/// use ratecal_models::instruments::{OisSwap, RateInstrument, Swap3M};
/// use ratecal_optimiser::bootstrapping::MultiCurveBootstrapper;
///
/// let ois: Vec<RateInstrument> = vec![OisSwap::new(0.25, 0.0001).unwrap().into()];
/// let swaps: Vec<RateInstrument> = vec![Swap3M::new(0.25, 0.001).unwrap().into()];
///
/// let result = MultiCurveBootstrapper::with_defaults().bootstrap(&ois, &swaps).unwrap();
///
/// let df = result.curves.ois.discount_factor(0.25).unwrap();
/// assert!((df - 0.99997500062).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MultiCurveBootstrapper {
    config: BootstrapConfig,
}

impl MultiCurveBootstrapper {
    /// Create a new bootstrapper with the given configuration.
    pub fn new(config: BootstrapConfig) -> Self {
        Self { config }
    }

    /// Create a new bootstrapper with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(BootstrapConfig::default())
    }

    /// Get the configuration.
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Bootstrap the OIS curve from `ois_instruments`, then the 3M curve
    /// from `forward_instruments`.
    ///
    /// # Errors
    ///
    /// * `BootstrapError::Configuration` - an instrument given to the wrong phase
    /// * `BootstrapError::DuplicateMaturity` / `NonIncreasingMaturity` - bad ordering
    /// * `BootstrapError::InvalidMaturity` - maturity beyond `max_maturity`
    /// * `BootstrapError::InvalidDiscountFactor` - a pillar solved to a non-positive value
    pub fn bootstrap(
        &self,
        ois_instruments: &[RateInstrument],
        forward_instruments: &[RateInstrument],
    ) -> Result<BootstrapResult, BootstrapError> {
        let ois = self.bootstrap_ois(ois_instruments)?;
        let ois_residuals = ois_instruments
            .iter()
            .map(|inst| ois_residual(inst, &ois))
            .collect::<Result<Vec<_>, _>>()?;
        self.check_repricing("ois", ois_instruments, &ois_residuals);

        let forward = self.bootstrap_forward(&ois, forward_instruments)?;
        let forward_residuals = forward_instruments
            .iter()
            .map(|inst| forward_residual(inst, &ois, &forward))
            .collect::<Result<Vec<_>, _>>()?;
        self.check_repricing("3m", forward_instruments, &forward_residuals);

        info!(
            ois_pillars = ois.len() - 1,
            forward_pillars = forward.len() - 1,
            "Multi-curve bootstrap complete"
        );

        Ok(BootstrapResult {
            curves: CurvePair::new(ois, forward),
            ois_residuals,
            forward_residuals,
        })
    }

    /// Phase 1: bootstrap the OIS discount curve.
    ///
    /// An empty slice yields the flat curve `df ≡ 1`.
    pub fn bootstrap_ois(
        &self,
        instruments: &[RateInstrument],
    ) -> Result<LogLinearCurve<f64>, BootstrapError> {
        let mut builder = CurveBuilder::new();
        for inst in instruments {
            self.check_maturity(&builder, inst.maturity())?;
            let df = match inst {
                RateInstrument::OisSwap(swap) => solve_ois_swap(&builder, swap)?,
                RateInstrument::OisFuture(future) => solve_ois_future(&builder, future)?,
                RateInstrument::Swap3M(_) => return Err(unsupported(inst, "OIS curve bootstrap")),
            };
            push_pillar(&mut builder, inst, df)?;
        }
        Ok(builder.build())
    }

    /// Phase 2: bootstrap the 3M forward curve discounted on `ois`.
    pub fn bootstrap_forward<O>(
        &self,
        ois: &O,
        instruments: &[RateInstrument],
    ) -> Result<LogLinearCurve<f64>, BootstrapError>
    where
        O: YieldCurve<f64> + ?Sized,
    {
        let mut builder = CurveBuilder::new();
        for inst in instruments {
            self.check_maturity(&builder, inst.maturity())?;
            let df = match inst {
                RateInstrument::Swap3M(swap) => solve_swap_3m(&builder, ois, swap)?,
                RateInstrument::OisSwap(_) | RateInstrument::OisFuture(_) => {
                    return Err(unsupported(inst, "3M curve bootstrap"))
                }
            };
            push_pillar(&mut builder, inst, df)?;
        }
        Ok(builder.build())
    }

    fn check_maturity(&self, builder: &CurveBuilder<f64>, maturity: f64) -> Result<(), BootstrapError> {
        if !(maturity > 0.0 && maturity <= self.config.max_maturity) {
            return Err(BootstrapError::invalid_maturity(
                maturity,
                self.config.max_maturity,
            ));
        }
        let previous = builder.last_time();
        if maturity == previous {
            return Err(BootstrapError::duplicate_maturity(maturity));
        }
        if maturity < previous {
            return Err(BootstrapError::non_increasing_maturity(previous, maturity));
        }
        Ok(())
    }

    fn check_repricing(&self, phase: &str, instruments: &[RateInstrument], residuals: &[f64]) {
        for (inst, residual) in instruments.iter().zip(residuals) {
            if residual.abs() > self.config.repricing_tolerance {
                warn!(
                    phase,
                    instrument = %inst,
                    residual,
                    "Bootstrapped curve does not reprice instrument"
                );
            }
        }
    }
}

/// `df(T) = (1 - r Σ_{i<n} α_i df(t_i)) / (1 + α_n r)` on the partial curve.
fn solve_ois_swap(builder: &CurveBuilder<f64>, swap: &OisSwap) -> Result<f64, BootstrapError> {
    let periods = swap.periods();
    let Some((last, earlier)) = periods.split_last() else {
        return Err(empty_schedule(swap.maturity()));
    };
    let mut annuity = 0.0;
    for period in earlier {
        annuity += period.accrual() * builder.discount_factor(period.end)?;
    }
    let rate = swap.rate();
    Ok((1.0 - rate * annuity) / (1.0 + last.accrual() * rate))
}

/// `df(T) = df(T - a) / (1 + a (1 - P))`.
fn solve_ois_future(builder: &CurveBuilder<f64>, future: &OisFuture) -> Result<f64, BootstrapError> {
    let df_start = builder.discount_factor(future.start())?;
    Ok(df_start / (1.0 + future.accrual() * future.market_rate()))
}

/// Closed-form pillar equating the fixed and floating legs of a 3M swap.
///
/// With `k` the floating PV of all but the last period,
/// `df(T) = FWD.df(s_n) OIS.df(T) / (OIS.df(T) + fixed_pv - k)`.
fn solve_swap_3m<O>(builder: &CurveBuilder<f64>, ois: &O, swap: &Swap3M) -> Result<f64, BootstrapError>
where
    O: YieldCurve<f64> + ?Sized,
{
    let periods = swap.periods();
    let Some((last, earlier)) = periods.split_last() else {
        return Err(empty_schedule(swap.maturity()));
    };

    let mut fixed_pv = 0.0;
    for period in &periods {
        fixed_pv += period.accrual() * ois.discount_factor(period.end)?;
    }
    fixed_pv *= swap.rate();

    let mut floating_known = 0.0;
    for period in earlier {
        let fwd = builder.forward_rate(period.start, period.end)?;
        floating_known += period.accrual() * ois.discount_factor(period.end)? * fwd;
    }

    let ois_df = ois.discount_factor(last.end)?;
    let fwd_df_start = builder.discount_factor(last.start)?;
    Ok(fwd_df_start * ois_df / (ois_df + fixed_pv - floating_known))
}

fn push_pillar(
    builder: &mut CurveBuilder<f64>,
    inst: &RateInstrument,
    df: f64,
) -> Result<(), BootstrapError> {
    let maturity = inst.maturity();
    if !(df.is_finite() && df > 0.0) {
        return Err(BootstrapError::invalid_discount_factor(maturity, df));
    }
    debug!(instrument = %inst, df, "Pillar solved");
    builder.add_knot(maturity, df)?;
    Ok(())
}

fn empty_schedule(maturity: f64) -> BootstrapError {
    InstrumentError::InvalidMaturity { maturity }.into()
}

fn unsupported(inst: &RateInstrument, context: &str) -> BootstrapError {
    ConfigurationError::unsupported_instrument(inst.to_string(), context).into()
}

fn ois_residual(inst: &RateInstrument, ois: &LogLinearCurve<f64>) -> Result<f64, BootstrapError> {
    Ok(match inst {
        RateInstrument::OisSwap(swap) => swap.residual(ois)?,
        RateInstrument::OisFuture(future) => future.residual(ois)?,
        RateInstrument::Swap3M(_) => return Err(unsupported(inst, "OIS curve bootstrap")),
    })
}

fn forward_residual(
    inst: &RateInstrument,
    ois: &LogLinearCurve<f64>,
    forward: &LogLinearCurve<f64>,
) -> Result<f64, BootstrapError> {
    match inst {
        RateInstrument::Swap3M(swap) => Ok(swap.residual(ois, forward)?),
        _ => Err(unsupported(inst, "3M curve bootstrap")),
    }
}

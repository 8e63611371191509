//! Curve instruments: overnight swaps, overnight futures and 3M swaps.
//!
//! Every instrument prices against one or two [`YieldCurve`]s and exposes a
//! residual `model value - market value` used by the curve calibrators. A
//! curve that reprices an instrument exactly gives a zero residual.
//!
//! # Pricing
//!
//! Overnight swap with rate `r` and accrual periods `α_i` ending at `t_i`:
//!
//! ```text
//! residual = N * (r * Σ α_i D(t_i) - (1 - D(T)))
//! ```
//!
//! Overnight future with price `P` and accrual `a`:
//!
//! ```text
//! residual = N * ((1 - f(T - a, T)) - P)
//! ```
//!
//! 3M swap with rate `r` over quarterly periods `[s_i, t_i]`:
//!
//! ```text
//! residual = N * Σ α_i D_ois(t_i) (f_3m(s_i, t_i) - r)
//! ```

use ratecal_core::market_data::YieldCurve;

use super::error::InstrumentError;
use super::schedule::{accrual_periods, AccrualPeriod};

/// Default fixed-leg accrual for overnight swaps (quarterly).
pub const DEFAULT_OIS_ACCRUAL: f64 = 0.25;

/// Accrual period of an overnight future.
pub const OIS_FUTURE_ACCRUAL: f64 = 0.25;

/// Accrual of the 3M forward index.
pub const SWAP_3M_ACCRUAL: f64 = 0.25;

/// Longest accepted maturity or expiry, in years.
pub const MAX_MATURITY: f64 = 100.0;

/// Shortest accepted fixed-leg accrual (one day).
pub const MIN_ACCRUAL: f64 = 1.0 / 365.0;

pub(crate) fn check_maturity(maturity: f64) -> Result<(), InstrumentError> {
    if maturity.is_finite() && maturity > 0.0 && maturity <= MAX_MATURITY {
        Ok(())
    } else {
        Err(InstrumentError::InvalidMaturity { maturity })
    }
}

fn check_quote(field: &'static str, value: f64) -> Result<(), InstrumentError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InstrumentError::InvalidQuote { field, value })
    }
}

fn check_notional(notional: f64) -> Result<(), InstrumentError> {
    if notional.is_finite() && notional != 0.0 {
        Ok(())
    } else {
        Err(InstrumentError::InvalidNotional { notional })
    }
}

/// Overnight-indexed swap quoted by its fixed rate.
///
/// # Example
///
/// ```
/// use ratecal_models::instruments::OisSwap;
///
/// let swap = OisSwap::new(2.0, 0.022).unwrap().with_accrual(0.5).unwrap();
/// assert_eq!(swap.schedule(), vec![0.5, 1.0, 1.5, 2.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OisSwap {
    maturity: f64,
    rate: f64,
    accrual: f64,
    notional: f64,
}

impl OisSwap {
    /// Create a swap with quarterly fixed accrual and unit notional.
    ///
    /// # Errors
    ///
    /// * `InstrumentError::InvalidMaturity` - `maturity <= 0` or beyond [`MAX_MATURITY`]
    /// * `InstrumentError::InvalidQuote` - `rate` is not finite
    pub fn new(maturity: f64, rate: f64) -> Result<Self, InstrumentError> {
        check_maturity(maturity)?;
        check_quote("rate", rate)?;
        Ok(Self {
            maturity,
            rate,
            accrual: DEFAULT_OIS_ACCRUAL,
            notional: 1.0,
        })
    }

    /// Override the fixed-leg accrual.
    ///
    /// # Errors
    ///
    /// * `InstrumentError::InvalidAccrual` - `accrual` shorter than [`MIN_ACCRUAL`] or not finite
    pub fn with_accrual(mut self, accrual: f64) -> Result<Self, InstrumentError> {
        if !(accrual.is_finite() && accrual >= MIN_ACCRUAL) {
            return Err(InstrumentError::InvalidAccrual { accrual });
        }
        self.accrual = accrual;
        Ok(self)
    }

    /// Override the notional.
    pub fn with_notional(mut self, notional: f64) -> Result<Self, InstrumentError> {
        check_notional(notional)?;
        self.notional = notional;
        Ok(self)
    }

    /// Maturity in years.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Quoted fixed rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Fixed-leg accrual.
    #[inline]
    pub fn accrual(&self) -> f64 {
        self.accrual
    }

    /// Notional.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Fixed-leg payment times.
    pub fn schedule(&self) -> Vec<f64> {
        super::payment_schedule(self.maturity, self.accrual)
    }

    /// Fixed-leg accrual periods.
    pub fn periods(&self) -> Vec<AccrualPeriod> {
        accrual_periods(self.maturity, self.accrual)
    }

    /// Annuity `Σ α_i D(t_i)` of the fixed leg.
    pub fn annuity<C>(&self, curve: &C) -> Result<f64, InstrumentError>
    where
        C: YieldCurve<f64> + ?Sized,
    {
        let mut annuity = 0.0;
        for period in self.periods() {
            annuity += period.accrual() * curve.discount_factor(period.end)?;
        }
        Ok(annuity)
    }

    /// Fixed-minus-floating PV on `curve`.
    pub fn residual<C>(&self, curve: &C) -> Result<f64, InstrumentError>
    where
        C: YieldCurve<f64> + ?Sized,
    {
        let fixed = self.rate * self.annuity(curve)?;
        let floating = 1.0 - curve.discount_factor(self.maturity)?;
        Ok(self.notional * (fixed - floating))
    }

    /// Rate that sets the swap's PV to zero on `curve`.
    pub fn par_rate<C>(&self, curve: &C) -> Result<f64, InstrumentError>
    where
        C: YieldCurve<f64> + ?Sized,
    {
        let floating = 1.0 - curve.discount_factor(self.maturity)?;
        Ok(floating / self.annuity(curve)?)
    }
}

/// Overnight-rate future quoted as a decimal price `P = 1 - rate`.
///
/// The future fixes on the simple forward over `[T - a, T]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OisFuture {
    maturity: f64,
    price: f64,
    accrual: f64,
    notional: f64,
}

impl OisFuture {
    /// Create a future with a quarterly accrual period.
    ///
    /// # Errors
    ///
    /// * `InstrumentError::InvalidMaturity` - `maturity <= 0` or beyond [`MAX_MATURITY`]
    /// * `InstrumentError::InvalidAccrual` - the accrual period would start before zero
    /// * `InstrumentError::InvalidQuote` - `price` is not finite
    pub fn new(maturity: f64, price: f64) -> Result<Self, InstrumentError> {
        check_maturity(maturity)?;
        check_quote("price", price)?;
        if maturity < OIS_FUTURE_ACCRUAL {
            return Err(InstrumentError::InvalidAccrual {
                accrual: OIS_FUTURE_ACCRUAL,
            });
        }
        Ok(Self {
            maturity,
            price,
            accrual: OIS_FUTURE_ACCRUAL,
            notional: 1.0,
        })
    }

    /// Override the notional.
    pub fn with_notional(mut self, notional: f64) -> Result<Self, InstrumentError> {
        check_notional(notional)?;
        self.notional = notional;
        Ok(self)
    }

    /// Maturity (end of the accrual period) in years.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Quoted price.
    #[inline]
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Accrual period length.
    #[inline]
    pub fn accrual(&self) -> f64 {
        self.accrual
    }

    /// Notional.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Start of the accrual period.
    #[inline]
    pub fn start(&self) -> f64 {
        self.maturity - self.accrual
    }

    /// Implied rate `1 - P`.
    #[inline]
    pub fn market_rate(&self) -> f64 {
        1.0 - self.price
    }

    /// Model price `N * (1 - f(T - a, T))` on `curve`.
    pub fn model_price<C>(&self, curve: &C) -> Result<f64, InstrumentError>
    where
        C: YieldCurve<f64> + ?Sized,
    {
        let forward = curve.forward_rate(self.start(), self.maturity)?;
        Ok(self.notional * (1.0 - forward))
    }

    /// Model price minus quoted price.
    pub fn residual<C>(&self, curve: &C) -> Result<f64, InstrumentError>
    where
        C: YieldCurve<f64> + ?Sized,
    {
        Ok(self.model_price(curve)? - self.notional * self.price)
    }
}

/// Swap of a fixed rate against the 3M forward index, quarterly on both legs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swap3M {
    maturity: f64,
    rate: f64,
    notional: f64,
}

impl Swap3M {
    /// Create a 3M swap with unit notional.
    ///
    /// # Errors
    ///
    /// * `InstrumentError::InvalidMaturity` - `maturity <= 0` or beyond [`MAX_MATURITY`]
    /// * `InstrumentError::InvalidQuote` - `rate` is not finite
    pub fn new(maturity: f64, rate: f64) -> Result<Self, InstrumentError> {
        check_maturity(maturity)?;
        check_quote("rate", rate)?;
        Ok(Self {
            maturity,
            rate,
            notional: 1.0,
        })
    }

    /// Override the notional.
    pub fn with_notional(mut self, notional: f64) -> Result<Self, InstrumentError> {
        check_notional(notional)?;
        self.notional = notional;
        Ok(self)
    }

    /// Maturity in years.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Quoted fixed rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Notional.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Quarterly accrual periods.
    pub fn periods(&self) -> Vec<AccrualPeriod> {
        accrual_periods(self.maturity, SWAP_3M_ACCRUAL)
    }

    /// Fixed-minus-floating mismatch discounted on `ois`, with floating
    /// rates projected from `forward`.
    ///
    /// Sign convention: positive when the projected floating leg exceeds
    /// the fixed rate.
    pub fn residual<O, F>(&self, ois: &O, forward: &F) -> Result<f64, InstrumentError>
    where
        O: YieldCurve<f64> + ?Sized,
        F: YieldCurve<f64> + ?Sized,
    {
        let mut pv = 0.0;
        for period in self.periods() {
            let fwd = forward.forward_rate(period.start, period.end)?;
            pv += period.accrual() * ois.discount_factor(period.end)? * (fwd - self.rate);
        }
        Ok(self.notional * pv)
    }

    /// Fixed rate that sets the swap's PV to zero.
    pub fn par_rate<O, F>(&self, ois: &O, forward: &F) -> Result<f64, InstrumentError>
    where
        O: YieldCurve<f64> + ?Sized,
        F: YieldCurve<f64> + ?Sized,
    {
        let mut floating = 0.0;
        let mut annuity = 0.0;
        for period in self.periods() {
            let weight = period.accrual() * ois.discount_factor(period.end)?;
            floating += weight * forward.forward_rate(period.start, period.end)?;
            annuity += weight;
        }
        Ok(floating / annuity)
    }
}

//! 3M caplet quotes for volatility calibration.

use ratecal_core::market_data::YieldCurve;

use super::error::InstrumentError;
use super::rates::check_maturity;

/// Accrual of the caplet's underlying 3M rate.
pub const CAPLET_ACCRUAL: f64 = 0.25;

/// Caplet on the 3M rate fixing at `expiry`, quoted by implied volatility.
///
/// The underlying forward is read from the 3M curve over
/// `[expiry, expiry + 0.25]`.
///
/// # Example
///
/// ```
/// use ratecal_models::instruments::Caplet3M;
///
/// let caplet = Caplet3M::new(1.0, 0.03, 0.25).unwrap();
/// assert_eq!(caplet.accrual_end(), 1.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Caplet3M {
    expiry: f64,
    strike: f64,
    market_vol: f64,
    notional: f64,
}

impl Caplet3M {
    /// Create a caplet quote with unit notional.
    ///
    /// # Errors
    ///
    /// * `InstrumentError::InvalidMaturity` - `expiry <= 0` or beyond [`MAX_MATURITY`](super::MAX_MATURITY)
    /// * `InstrumentError::InvalidStrike` - `strike <= 0`
    /// * `InstrumentError::InvalidQuote` - `market_vol` is not positive and finite
    pub fn new(expiry: f64, strike: f64, market_vol: f64) -> Result<Self, InstrumentError> {
        check_maturity(expiry)?;
        if !(strike.is_finite() && strike > 0.0) {
            return Err(InstrumentError::InvalidStrike { strike });
        }
        if !(market_vol.is_finite() && market_vol > 0.0) {
            return Err(InstrumentError::InvalidQuote {
                field: "market_vol",
                value: market_vol,
            });
        }
        Ok(Self {
            expiry,
            strike,
            market_vol,
            notional: 1.0,
        })
    }

    /// Override the notional.
    pub fn with_notional(mut self, notional: f64) -> Result<Self, InstrumentError> {
        if !notional.is_finite() || notional == 0.0 {
            return Err(InstrumentError::InvalidNotional { notional });
        }
        self.notional = notional;
        Ok(self)
    }

    /// Fixing time in years.
    #[inline]
    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    /// Strike rate.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Quoted implied volatility.
    #[inline]
    pub fn market_vol(&self) -> f64 {
        self.market_vol
    }

    /// Notional.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// End of the underlying accrual period.
    #[inline]
    pub fn accrual_end(&self) -> f64 {
        self.expiry + CAPLET_ACCRUAL
    }

    /// Forward 3M rate underlying the caplet.
    pub fn forward_rate<C>(&self, forward_curve: &C) -> Result<f64, InstrumentError>
    where
        C: YieldCurve<f64> + ?Sized,
    {
        Ok(forward_curve.forward_rate(self.expiry, self.accrual_end())?)
    }
}

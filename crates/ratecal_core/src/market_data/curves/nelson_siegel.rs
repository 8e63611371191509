//! Nelson-Siegel parametric discount curve.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Maturity below which discount factors are interpolated linearly from 1.
pub const SHORT_END: f64 = 0.25;

/// Starting parameters `[beta0, beta1, beta2, tau]` for calibration.
pub const INITIAL_GUESS: [f64; 4] = [0.025, 0.0, 0.0, 2.0];

/// Nelson-Siegel discount curve.
///
/// For `t > 0.25`:
///
/// ```text
/// D(t) = exp(-(β0 t + (β1 + β2) τ (1 - e^{-t/τ}) - β2 t e^{-t/τ}))
/// ```
///
/// which is `exp(-y(t) t)` for the Nelson-Siegel zero yield `y(t)`. On
/// `[0, 0.25]` the discount factor is linear between `D(0) = 1` and
/// `D(0.25)`.
///
/// # Example
///
/// ```
/// use ratecal_core::market_data::curves::{NelsonSiegelCurve, YieldCurve};
///
/// let curve = NelsonSiegelCurve::<f64>::new(0.03, -0.01, 0.005, 2.0).unwrap();
/// assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
///
/// let short = curve.discount_factor(0.125).unwrap();
/// let pillar = curve.discount_factor(0.25).unwrap();
/// assert!((short - (1.0 + pillar) / 2.0).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelsonSiegelCurve<T: Float> {
    beta0: T,
    beta1: T,
    beta2: T,
    tau: T,
}

impl<T: Float> NelsonSiegelCurve<T> {
    /// Create a curve.
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidParameter` if any parameter is not finite
    /// or `tau <= 0`.
    pub fn new(beta0: T, beta1: T, beta2: T, tau: T) -> Result<Self, MarketDataError> {
        for (name, value) in [("beta0", beta0), ("beta1", beta1), ("beta2", beta2), ("tau", tau)] {
            if !value.is_finite() {
                return Err(invalid(name, value));
            }
        }
        if tau <= T::zero() {
            return Err(invalid("tau", tau));
        }
        Ok(Self {
            beta0,
            beta1,
            beta2,
            tau,
        })
    }

    /// Create a curve from `[beta0, beta1, beta2, tau]`.
    pub fn from_params(params: &[T]) -> Result<Self, MarketDataError> {
        match params {
            [b0, b1, b2, tau] => Self::new(*b0, *b1, *b2, *tau),
            _ => Err(MarketDataError::InvalidParameter {
                name: "params",
                value: params.len() as f64,
            }),
        }
    }

    /// Parameters as `[beta0, beta1, beta2, tau]`.
    pub fn params(&self) -> [T; 4] {
        [self.beta0, self.beta1, self.beta2, self.tau]
    }

    /// Long-run level.
    pub fn beta0(&self) -> T {
        self.beta0
    }

    /// Slope loading.
    pub fn beta1(&self) -> T {
        self.beta1
    }

    /// Curvature loading.
    pub fn beta2(&self) -> T {
        self.beta2
    }

    /// Decay time scale.
    pub fn tau(&self) -> T {
        self.tau
    }

    /// Closed-form discount factor, valid for `t > 0`.
    #[inline]
    fn closed_form(&self, t: T) -> T {
        let decay = (-t / self.tau).exp();
        let exponent = self.beta0 * t + (self.beta1 + self.beta2) * self.tau * (T::one() - decay)
            - self.beta2 * t * decay;
        (-exponent).exp()
    }
}

impl<T: Float> YieldCurve<T> for NelsonSiegelCurve<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() || t.is_nan() {
            return Err(invalid_maturity(t));
        }
        let short_end = T::from(SHORT_END).unwrap_or_else(T::zero);
        if t > short_end {
            return Ok(self.closed_form(t));
        }
        let pillar = self.closed_form(short_end);
        Ok(T::one() + (pillar - T::one()) * t / short_end)
    }
}

fn invalid<T: Float>(name: &'static str, value: T) -> MarketDataError {
    MarketDataError::InvalidParameter {
        name,
        value: value.to_f64().unwrap_or(f64::NAN),
    }
}

fn invalid_maturity<T: Float>(t: T) -> MarketDataError {
    MarketDataError::InvalidMaturity {
        t: t.to_f64().unwrap_or(f64::NAN),
    }
}

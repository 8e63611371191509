//! Knot-based curves with log-linear interpolation.
//!
//! [`CurveBuilder`] owns the growing knot array during bootstrapping and is
//! consumed by [`CurveBuilder::build`] into an immutable [`LogLinearCurve`].

use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use crate::math::interpolators::{log_linear_interpolate, LogLinearInterpolator};
use num_traits::Float;

/// Append-only knot array seeded with `(0, 1)`.
///
/// # Example
///
/// ```
/// use ratecal_core::market_data::curves::{CurveBuilder, YieldCurve};
///
/// let mut builder = CurveBuilder::<f64>::new();
/// assert_eq!(builder.discount_factor(5.0).unwrap(), 1.0);
///
/// builder.add_knot(0.5, 0.99).unwrap();
/// assert!(builder.add_knot(0.5, 0.98).is_err());
///
/// let curve = builder.build();
/// assert_eq!(curve.times(), &[0.0, 0.5]);
/// ```
#[derive(Debug, Clone)]
pub struct CurveBuilder<T: Float> {
    times: Vec<T>,
    dfs: Vec<T>,
}

impl<T: Float> Default for CurveBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> CurveBuilder<T> {
    /// Builder holding only the `(0, 1)` knot.
    pub fn new() -> Self {
        Self {
            times: vec![T::zero()],
            dfs: vec![T::one()],
        }
    }

    /// Append a knot.
    ///
    /// # Errors
    ///
    /// * `MarketDataError::NonIncreasingKnot` - `t` not after the last knot
    /// * `MarketDataError::InvalidDiscountFactor` - `df` not positive and finite
    pub fn add_knot(&mut self, t: T, df: T) -> Result<(), MarketDataError> {
        let previous = self.last_time();
        if t <= previous || !t.is_finite() {
            return Err(MarketDataError::NonIncreasingKnot {
                previous: previous.to_f64().unwrap_or(f64::NAN),
                t: t.to_f64().unwrap_or(f64::NAN),
            });
        }
        if df <= T::zero() || !df.is_finite() {
            return Err(MarketDataError::InvalidDiscountFactor {
                t: t.to_f64().unwrap_or(f64::NAN),
                df: df.to_f64().unwrap_or(f64::NAN),
            });
        }
        self.times.push(t);
        self.dfs.push(df);
        Ok(())
    }

    /// Time of the last knot; zero for a fresh builder.
    #[inline]
    pub fn last_time(&self) -> T {
        self.times[self.times.len() - 1]
    }

    /// Number of knots, seed included.
    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Never true: the seed knot is always present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Knot times.
    pub fn times(&self) -> &[T] {
        &self.times
    }

    /// Knot discount factors.
    pub fn dfs(&self) -> &[T] {
        &self.dfs
    }

    /// Freeze the knots into an immutable curve.
    pub fn build(self) -> LogLinearCurve<T> {
        // Knots were validated on insertion
        let interpolator = LogLinearInterpolator::new(&self.times, &self.dfs).ok();
        LogLinearCurve {
            times: self.times,
            dfs: self.dfs,
            interpolator,
        }
    }
}

impl<T: Float> YieldCurve<T> for CurveBuilder<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        check_maturity(t)?;
        if self.times.len() < 2 {
            return Ok(self.dfs[0]);
        }
        Ok(log_linear_interpolate(&self.times, &self.dfs, t)?)
    }
}

/// Immutable knot curve with log-linear interpolation.
///
/// Beyond the last knot the final discount factor is held constant.
#[derive(Debug, Clone)]
pub struct LogLinearCurve<T: Float> {
    times: Vec<T>,
    dfs: Vec<T>,
    /// `None` while only the seed knot exists
    interpolator: Option<LogLinearInterpolator<T>>,
}

impl<T: Float> LogLinearCurve<T> {
    /// Curve from explicit knots, which must start at `(0, 1)`.
    ///
    /// # Errors
    ///
    /// Same validation as [`CurveBuilder::add_knot`] for every knot after
    /// the first; `InvalidParameter` if the first knot is not `(0, 1)`.
    pub fn from_knots(times: &[T], dfs: &[T]) -> Result<Self, MarketDataError> {
        if times.len() != dfs.len() || times.is_empty() {
            return Err(MarketDataError::InvalidParameter {
                name: "knots",
                value: times.len() as f64,
            });
        }
        if times[0] != T::zero() || dfs[0] != T::one() {
            return Err(MarketDataError::InvalidParameter {
                name: "first knot",
                value: times[0].to_f64().unwrap_or(f64::NAN),
            });
        }
        let mut builder = CurveBuilder::new();
        for (&t, &df) in times.iter().zip(dfs).skip(1) {
            builder.add_knot(t, df)?;
        }
        Ok(builder.build())
    }

    /// Knot times, seed included.
    pub fn times(&self) -> &[T] {
        &self.times
    }

    /// Knot discount factors, seed included.
    pub fn dfs(&self) -> &[T] {
        &self.dfs
    }

    /// Iterate `(t, df)` knot pairs.
    pub fn knots(&self) -> impl Iterator<Item = (T, T)> + '_ {
        self.times.iter().copied().zip(self.dfs.iter().copied())
    }

    /// Time of the last knot.
    pub fn max_time(&self) -> T {
        self.times[self.times.len() - 1]
    }

    /// Number of knots, seed included.
    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Never true for a built curve.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

impl<T: Float> YieldCurve<T> for LogLinearCurve<T> {
    #[inline]
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        check_maturity(t)?;
        Ok(match &self.interpolator {
            Some(interp) => interp.interpolate(t),
            None => self.dfs[0],
        })
    }
}

#[inline]
fn check_maturity<T: Float>(t: T) -> Result<(), MarketDataError> {
    if t < T::zero() || t.is_nan() {
        return Err(MarketDataError::InvalidMaturity {
            t: t.to_f64().unwrap_or(f64::NAN),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ========================================
    // CurveBuilder Tests
    // ========================================

    #[test]
    fn test_builder_seed() {
        let builder = CurveBuilder::<f64>::new();
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.last_time(), 0.0);
        assert_eq!(builder.discount_factor(0.0).unwrap(), 1.0);
        assert_eq!(builder.discount_factor(3.0).unwrap(), 1.0);
    }

    #[test]
    fn test_builder_rejects_non_increasing() {
        let mut builder = CurveBuilder::<f64>::new();
        builder.add_knot(1.0, 0.98).unwrap();
        assert_eq!(
            builder.add_knot(0.5, 0.99).unwrap_err(),
            MarketDataError::NonIncreasingKnot {
                previous: 1.0,
                t: 0.5
            }
        );
        assert!(builder.add_knot(0.0, 1.0).is_err());
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn test_builder_rejects_bad_df() {
        let mut builder = CurveBuilder::<f64>::new();
        assert!(matches!(
            builder.add_knot(1.0, -0.1),
            Err(MarketDataError::InvalidDiscountFactor { .. })
        ));
        assert!(builder.add_knot(1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_builder_and_curve_agree() {
        let mut builder = CurveBuilder::<f64>::new();
        builder.add_knot(0.25, 0.995).unwrap();
        builder.add_knot(1.0, 0.98).unwrap();

        let probes = [0.1, 0.25, 0.6, 1.0, 4.0];
        let from_builder: Vec<f64> = probes
            .iter()
            .map(|&t| builder.discount_factor(t).unwrap())
            .collect();

        let curve = builder.build();
        for (&t, &expected) in probes.iter().zip(&from_builder) {
            assert_relative_eq!(curve.discount_factor(t).unwrap(), expected, epsilon = 1e-15);
        }
    }

    // ========================================
    // LogLinearCurve Tests
    // ========================================

    #[test]
    fn test_seed_only_curve_is_flat_one() {
        let curve = CurveBuilder::<f64>::new().build();
        assert_eq!(curve.discount_factor(10.0).unwrap(), 1.0);
        assert_eq!(curve.zero_rate(1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_curve_len_counts_seed() {
        let seed_only = CurveBuilder::<f64>::new().build();
        assert_eq!(seed_only.len(), 1);
        assert!(!seed_only.is_empty());

        let curve = LogLinearCurve::from_knots(&[0.0, 0.5, 1.0], &[1.0, 0.99, 0.97]).unwrap();
        assert_eq!(curve.len(), 3);
        assert_eq!(curve.len(), curve.times().len());
    }

    #[test]
    fn test_extrapolation_holds_last_df() {
        let curve = LogLinearCurve::from_knots(&[0.0, 1.0], &[1.0, 0.97]).unwrap();
        assert_eq!(curve.discount_factor(1.0).unwrap(), 0.97);
        assert_eq!(curve.discount_factor(30.0).unwrap(), 0.97);
        assert_eq!(curve.max_time(), 1.0);
    }

    #[test]
    fn test_negative_time_rejected() {
        let curve = CurveBuilder::<f64>::new().build();
        assert_eq!(
            curve.discount_factor(-0.1).unwrap_err(),
            MarketDataError::InvalidMaturity { t: -0.1 }
        );
    }

    #[test]
    fn test_forward_rate_single_period() {
        // One quarterly knot: simple forward over [0, 0.25] equals the quoted rate
        let r = 0.02;
        let df = 1.0 / (1.0 + 0.25 * r);
        let curve = LogLinearCurve::from_knots(&[0.0, 0.25], &[1.0, df]).unwrap();
        assert_relative_eq!(curve.forward_rate(0.0, 0.25).unwrap(), r, epsilon = 1e-14);
    }

    #[test]
    fn test_from_knots_requires_seed() {
        assert!(LogLinearCurve::from_knots(&[0.5, 1.0], &[0.99, 0.98]).is_err());
        assert!(LogLinearCurve::from_knots(&[0.0, 1.0], &[1.0, 0.98]).is_ok());
        let knots: Vec<(f64, f64)> = LogLinearCurve::from_knots(&[0.0, 1.0], &[1.0, 0.98])
            .unwrap()
            .knots()
            .collect();
        assert_eq!(knots, vec![(0.0, 1.0), (1.0, 0.98)]);
    }
}

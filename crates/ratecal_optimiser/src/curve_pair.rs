//! Discount and forward curve pair produced by every curve construction path.

use ratecal_core::market_data::curves::{CurveModelKind, DiscountCurve, YieldCurve};
use ratecal_core::market_data::MarketDataError;

/// OIS discount curve and the dependent 3M forward curve.
///
/// Immutable once built; both curves are `Send + Sync` whenever `C` is.
///
/// # Example
///
/// ```
/// use ratecal_core::market_data::curves::{DiscountCurve, NelsonSiegelCurve};
/// use ratecal_optimiser::CurvePair;
///
/// let ois = NelsonSiegelCurve::new(0.02, 0.0, 0.0, 1.0).unwrap();
/// let fwd = NelsonSiegelCurve::new(0.025, 0.0, 0.0, 1.0).unwrap();
/// let pair = CurvePair::new(ois, fwd).map(DiscountCurve::from);
///
/// assert!(pair.basis_spread(0.0, 0.25).unwrap() > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct CurvePair<C> {
    /// OIS discount curve
    pub ois: C,
    /// 3M forward projection curve
    pub forward: C,
}

impl<C> CurvePair<C> {
    /// Pair `ois` with `forward`.
    pub fn new(ois: C, forward: C) -> Self {
        Self { ois, forward }
    }

    /// Convert both curves.
    pub fn map<D>(self, f: impl Fn(C) -> D) -> CurvePair<D> {
        CurvePair {
            ois: f(self.ois),
            forward: f(self.forward),
        }
    }
}

impl<C: YieldCurve<f64>> CurvePair<C> {
    /// Forward-curve rate minus OIS rate over `[t1, t2]`.
    pub fn basis_spread(&self, t1: f64, t2: f64) -> Result<f64, MarketDataError> {
        Ok(self.forward.forward_rate(t1, t2)? - self.ois.forward_rate(t1, t2)?)
    }
}

impl CurvePair<DiscountCurve<f64>> {
    /// Curve model both curves were built with.
    pub fn model(&self) -> CurveModelKind {
        self.ois.kind()
    }
}

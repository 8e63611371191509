//! Curve model selection and static dispatch.
//!
//! This module provides:
//! - [`CurveModelKind`]: Configuration selector for the curve model
//! - [`DiscountCurve`]: Static dispatch enum over the concrete curve models

use super::{LogLinearCurve, NelsonSiegelCurve, YieldCurve};
use crate::market_data::error::MarketDataError;
use crate::types::ConfigurationError;
use num_traits::Float;
use std::fmt;
use std::str::FromStr;

/// Curve model selector.
///
/// # Example
///
/// ```
/// use ratecal_core::market_data::curves::CurveModelKind;
///
/// let kind: CurveModelKind = "smooth_parametric".parse().unwrap();
/// assert_eq!(kind, CurveModelKind::SmoothParametric);
/// assert_eq!(kind.as_str(), "smooth_parametric");
/// assert!("cubic_spline".parse::<CurveModelKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CurveModelKind {
    /// Sequentially bootstrapped knots with log-linear interpolation
    #[default]
    BootstrappedLogLinear,
    /// Nelson-Siegel curve fitted by least squares
    SmoothParametric,
}

impl CurveModelKind {
    /// Canonical snake_case name.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            CurveModelKind::BootstrappedLogLinear => "bootstrapped_log_linear",
            CurveModelKind::SmoothParametric => "smooth_parametric",
        }
    }
}

impl fmt::Display for CurveModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurveModelKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bootstrapped_log_linear" | "bootstrap" => Ok(CurveModelKind::BootstrappedLogLinear),
            "smooth_parametric" | "nelson_siegel" => Ok(CurveModelKind::SmoothParametric),
            _ => Err(ConfigurationError::UnsupportedCurveModel(s.to_string())),
        }
    }
}

/// Static dispatch enum wrapping the concrete curve models.
///
/// # Example
///
/// ```
/// use ratecal_core::market_data::curves::{DiscountCurve, NelsonSiegelCurve, YieldCurve};
///
/// let curve = DiscountCurve::NelsonSiegel(NelsonSiegelCurve::new(0.03_f64, 0.0, 0.0, 1.0).unwrap());
/// assert!(curve.discount_factor(2.0).unwrap() < 1.0);
/// ```
#[derive(Debug, Clone)]
pub enum DiscountCurve<T: Float> {
    /// Bootstrapped knot curve
    LogLinear(LogLinearCurve<T>),
    /// Parametric curve
    NelsonSiegel(NelsonSiegelCurve<T>),
}

impl<T: Float> DiscountCurve<T> {
    /// Model kind of this curve.
    pub fn kind(&self) -> CurveModelKind {
        match self {
            DiscountCurve::LogLinear(_) => CurveModelKind::BootstrappedLogLinear,
            DiscountCurve::NelsonSiegel(_) => CurveModelKind::SmoothParametric,
        }
    }

    /// Return a reference to the knot curve if this is one.
    pub fn as_log_linear(&self) -> Option<&LogLinearCurve<T>> {
        match self {
            DiscountCurve::LogLinear(c) => Some(c),
            DiscountCurve::NelsonSiegel(_) => None,
        }
    }

    /// Return a reference to the parametric curve if this is one.
    pub fn as_nelson_siegel(&self) -> Option<&NelsonSiegelCurve<T>> {
        match self {
            DiscountCurve::LogLinear(_) => None,
            DiscountCurve::NelsonSiegel(c) => Some(c),
        }
    }
}

impl<T: Float> From<LogLinearCurve<T>> for DiscountCurve<T> {
    fn from(curve: LogLinearCurve<T>) -> Self {
        DiscountCurve::LogLinear(curve)
    }
}

impl<T: Float> From<NelsonSiegelCurve<T>> for DiscountCurve<T> {
    fn from(curve: NelsonSiegelCurve<T>) -> Self {
        DiscountCurve::NelsonSiegel(curve)
    }
}

impl<T: Float> YieldCurve<T> for DiscountCurve<T> {
    #[inline]
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        match self {
            DiscountCurve::LogLinear(c) => c.discount_factor(t),
            DiscountCurve::NelsonSiegel(c) => c.discount_factor(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::curves::CurveBuilder;

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            CurveModelKind::BootstrappedLogLinear,
            CurveModelKind::SmoothParametric,
        ] {
            assert_eq!(kind.to_string().parse::<CurveModelKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind() {
        assert_eq!(
            "svensson".parse::<CurveModelKind>().unwrap_err(),
            ConfigurationError::UnsupportedCurveModel("svensson".to_string())
        );
    }

    #[test]
    fn test_dispatch_matches_inner() {
        let mut builder = CurveBuilder::<f64>::new();
        builder.add_knot(1.0, 0.97).unwrap();
        let inner = builder.build();
        let curve: DiscountCurve<f64> = inner.clone().into();

        assert_eq!(curve.kind(), CurveModelKind::BootstrappedLogLinear);
        assert!(curve.as_log_linear().is_some());
        assert!(curve.as_nelson_siegel().is_none());
        assert_eq!(
            curve.discount_factor(0.5).unwrap(),
            inner.discount_factor(0.5).unwrap()
        );
    }
}

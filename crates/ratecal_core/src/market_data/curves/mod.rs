//! Curve abstractions for discounting and forward projection.
//!
//! This module provides:
//! - [`YieldCurve`]: Generic trait for discount factor and rate calculations
//! - [`CurveBuilder`]: Append-only knot array used during bootstrapping
//! - [`LogLinearCurve`]: Immutable knot curve with log-linear interpolation
//! - [`NelsonSiegelCurve`]: Parametric smooth curve
//! - [`DiscountCurve`]: Static dispatch enum over the concrete curve models
//! - [`CurveModelKind`]: Curve model selector

mod curve_enum;
mod log_linear;
pub mod nelson_siegel;
mod traits;

pub use curve_enum::{CurveModelKind, DiscountCurve};
pub use log_linear::{CurveBuilder, LogLinearCurve};
pub use nelson_siegel::NelsonSiegelCurve;
pub use traits::YieldCurve;

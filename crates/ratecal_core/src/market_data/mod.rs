//! Market data structures for rate curve calibration.
//!
//! # Architecture
//!
//! Curves are generic over `T: Float`. Calibration runs in `f64`; the
//! generic parameter keeps the curve types usable with other float types.
//!
//! # Components
//!
//! - [`curves`]: Yield curve trait and implementations (log-linear, Nelson-Siegel)
//! - [`error`]: Market data error types (MarketDataError)
//!
//! # Example
//!
//! ```
//! use ratecal_core::market_data::curves::{CurveBuilder, YieldCurve};
//!
//! let mut builder = CurveBuilder::<f64>::new();
//! builder.add_knot(1.0, 0.97).unwrap();
//! let curve = builder.build();
//!
//! let df = curve.discount_factor(0.5).unwrap();
//! assert!((df - 0.97_f64.sqrt()).abs() < 1e-14);
//! ```

pub mod curves;
pub mod error;

// Re-export commonly used types
pub use curves::{
    CurveBuilder, CurveModelKind, DiscountCurve, LogLinearCurve, NelsonSiegelCurve, YieldCurve,
};
pub use error::MarketDataError;

//! # ratecal_core: Numerical Foundation for Curve Construction and Calibration
//!
//! ## Layer 1 (Foundation) Role
//!
//! ratecal_core is the bottom layer of the workspace, providing:
//! - Error types: `InterpolationError`, `SolverError`, `ConfigurationError` (`types::error`)
//! - Log-linear discount factor interpolation (`math::interpolators`)
//! - Dense linear solves for small normal-equation and KKT systems (`math::linalg`)
//! - Nonlinear least-squares solvers: Gauss-Newton, Levenberg-Marquardt, SQP
//!   and the bounded default engine (`math::solvers`)
//! - Yield curve trait and curve models: knot-based log-linear curves built
//!   through `CurveBuilder`, and the Nelson-Siegel parametric curve (`market_data`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other ratecal_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Structured error enums
//! - tracing: Solver iteration diagnostics
//! - serde: Deserialisation of configuration and selectors (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use ratecal_core::market_data::curves::{CurveBuilder, YieldCurve};
//!
//! let mut builder = CurveBuilder::<f64>::new();
//! builder.add_knot(1.0, 0.97).unwrap();
//! builder.add_knot(2.0, 0.94).unwrap();
//! let curve = builder.build();
//!
//! let df = curve.discount_factor(1.5).unwrap();
//! assert!(df < 0.97 && df > 0.94);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable deserialisation for solver configuration and selector enums

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod types;

//! Interpolation methods for discount factor curves.
//!
//! ## Available Interpolators
//!
//! - [`LogLinearInterpolator`]: Piecewise linear interpolation of `ln(df)`,
//!   equivalent to a piecewise constant forward rate between knots
//! - [`log_linear_interpolate`]: Single-shot interpolation over raw knot slices
//!
//! ## Extrapolation
//!
//! Queries outside the knot range hold the boundary discount factor
//! constant. Every curve in the workspace shares this policy.
//!
//! ## Example
//!
//! ```
//! use ratecal_core::math::interpolators::LogLinearInterpolator;
//!
//! let times = [0.0, 1.0, 2.0];
//! let dfs: [f64; 3] = [1.0, 0.97, 0.94];
//!
//! let interp = LogLinearInterpolator::new(&times, &dfs).unwrap();
//! assert_eq!(interp.domain(), (0.0, 2.0));
//!
//! // Exact at knots
//! assert!((interp.interpolate(1.0) - 0.97).abs() < 1e-15);
//!
//! // Flat beyond the last knot
//! assert!((interp.interpolate(5.0) - 0.94).abs() < 1e-15);
//! ```

mod log_linear;

pub use log_linear::{log_linear_interpolate, LogLinearInterpolator};

//! Multi-curve bootstrapping from OIS and 3M swap quotes.
//!
//! ## Architecture
//!
//! - [`MultiCurveBootstrapper`]: OIS discount curve, then the dependent 3M curve
//! - [`BootstrapConfig`]: Maturity limit and repricing tolerance
//! - [`BootstrapResult`]: Curve pair plus per-instrument repricing residuals
//! - [`BootstrapError`]: Ordering, range and phase errors
//!
//! Each phase pattern-matches the closed
//! [`RateInstrument`](ratecal_models::instruments::RateInstrument) enum, so an
//! instrument handed to the wrong phase is reported rather than ignored.

mod config;
mod engine;
mod error;

pub use config::BootstrapConfig;
pub use engine::{BootstrapResult, MultiCurveBootstrapper};
pub use error::BootstrapError;

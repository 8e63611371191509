//! # ratecal_optimiser
//!
//! Curve construction for ratecal: multi-curve bootstrapping and
//! Nelson-Siegel curve calibration.
//!
//! This crate sits on top of the instruments in `ratecal_models` and turns
//! market quotes into an OIS discount curve and a dependent 3M forward curve.
//!
//! ## Architecture Position
//!
//! Layer 2.5 of the workspace.
//! Depends on `ratecal_core` (L1) for curves and solvers and on
//! `ratecal_models` (L2) for instrument pricing and calibration diagnostics.
//!
//! ## Modules
//!
//! - `bootstrapping`: Sequential OIS then 3M curve stripping
//! - `calibration`: Nelson-Siegel curve fits with any calibration engine
//! - `manager`: Curve pair construction dispatched on the curve model
//!
//! ## Example
//!
//! ```rust
//! use ratecal_core::market_data::curves::YieldCurve;
//! use ratecal_models::instruments::{OisSwap, RateInstrument, Swap3M};
//! use ratecal_optimiser::prelude::*;
//!
//! let ois: Vec<RateInstrument> = vec![OisSwap::new(1.0, 0.02).unwrap().into()];
//! let swaps: Vec<RateInstrument> = vec![Swap3M::new(1.0, 0.025).unwrap().into()];
//!
//! let result = MultiCurveBootstrapper::with_defaults().bootstrap(&ois, &swaps).unwrap();
//! assert!(result.curves.forward.discount_factor(1.0).unwrap() < 1.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod bootstrapping;
pub mod calibration;
pub mod manager;

mod curve_pair;
mod error;

pub use curve_pair::CurvePair;
pub use error::OptimiserError;
pub use manager::CurveManager;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bootstrapping::*;
    pub use crate::calibration::*;
    pub use crate::{CurveManager, CurvePair, OptimiserError};
}

//! # ratecal_models (L2: Business Logic)
//!
//! Rate instruments, the SABR smile model and volatility calibration.
//!
//! This crate provides:
//! - Instrument definitions: overnight swaps and futures, 3M forward swaps,
//!   3M caplets (`instruments`)
//! - Par and residual functions used by the bootstrapper and curve calibrators
//! - The SABR implied volatility formula with beta fixed at 1 (`models`)
//! - Per-expiry SABR calibration with a selectable engine (`calibration`)
//! - Volatility surfaces interpolating calibrated expiries (`surfaces`)
//!
//! ## Design Principles
//!
//! - **Enum-based instruments** for exhaustive dispatch in the bootstrapper
//! - **Explicit residual contexts** passed to `ratecal_core` solvers
//! - **Validation at construction**: instruments and quotes reject
//!   non-positive maturities, accruals, strikes and forwards up front

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod calibration;
pub mod instruments;
pub mod models;
pub mod surfaces;

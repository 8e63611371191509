//! Core error types.
//!
//! This module provides:
//! - `error`: Structured error types for interpolation, solver and configuration failures
//!
//! # Re-exports
//!
//! For convenience, the error enums are re-exported at this module level:
//! - [`InterpolationError`], [`SolverError`], [`ConfigurationError`] from `error`

pub mod error;

pub use error::{ConfigurationError, InterpolationError, SolverError};

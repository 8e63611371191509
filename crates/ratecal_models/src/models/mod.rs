//! Volatility models.
//!
//! - [`sabr`]: SABR smile with `beta = 1`, its constraint set and default bounds

pub mod sabr;

pub use sabr::{SabrConstraints, SabrError, SabrParams};

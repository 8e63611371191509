//! Volatility surfaces.
//!
//! - [`VolSurface`]: Quotes → per-expiry SABR smiles, interpolated in expiry
//! - [`Caplet3MVolSurface`]: Caplet quotes with forwards read from a 3M curve

mod caplet_surface;
mod vol_surface;

pub use caplet_surface::Caplet3MVolSurface;
pub use vol_surface::VolSurface;

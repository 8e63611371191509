//! Instruments used to build curves and calibrate volatility.
//!
//! This module provides:
//! - [`OisSwap`], [`OisFuture`]: Overnight-indexed instruments for the discount curve
//! - [`Swap3M`]: Fixed versus 3M swaps for the forward curve
//! - [`Caplet3M`]: Caplet volatility quotes on the 3M rate
//! - [`payment_schedule`]: Fixed-accrual payment times
//!
//! # Architecture
//!
//! Curve instruments are wrapped in the closed [`RateInstrument`] enum so
//! the bootstrapper and calibrators dispatch with exhaustive `match`
//! statements. Instruments are immutable after construction.
//!
//! # Examples
//!
//! ```
//! use ratecal_models::instruments::{OisSwap, RateInstrument, Swap3M};
//!
//! let instruments: Vec<RateInstrument> = vec![
//!     OisSwap::new(1.0, 0.02).unwrap().into(),
//!     Swap3M::new(1.0, 0.025).unwrap().into(),
//! ];
//!
//! assert!(instruments[0].is_overnight());
//! assert_eq!(instruments[1].maturity(), 1.0);
//! ```

mod caplet;
mod error;
mod rates;
mod schedule;

pub use caplet::{Caplet3M, CAPLET_ACCRUAL};
pub use error::InstrumentError;
pub use rates::{
    OisFuture, OisSwap, Swap3M, DEFAULT_OIS_ACCRUAL, MAX_MATURITY, MIN_ACCRUAL, OIS_FUTURE_ACCRUAL,
    SWAP_3M_ACCRUAL,
};
pub use schedule::{accrual_periods, payment_schedule, AccrualPeriod};

use std::fmt;

/// Curve instrument enum for static dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateInstrument {
    /// Overnight-indexed swap
    OisSwap(OisSwap),
    /// Overnight-rate future
    OisFuture(OisFuture),
    /// Fixed versus 3M swap
    Swap3M(Swap3M),
}

impl RateInstrument {
    /// Maturity in years.
    pub fn maturity(&self) -> f64 {
        match self {
            RateInstrument::OisSwap(swap) => swap.maturity(),
            RateInstrument::OisFuture(future) => future.maturity(),
            RateInstrument::Swap3M(swap) => swap.maturity(),
        }
    }

    /// Short kind name used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            RateInstrument::OisSwap(_) => "ois_swap",
            RateInstrument::OisFuture(_) => "ois_future",
            RateInstrument::Swap3M(_) => "swap_3m",
        }
    }

    /// Whether the instrument belongs to the overnight (discount) curve.
    pub fn is_overnight(&self) -> bool {
        matches!(
            self,
            RateInstrument::OisSwap(_) | RateInstrument::OisFuture(_)
        )
    }

    /// Whether the instrument belongs to the 3M forward curve.
    pub fn is_3m(&self) -> bool {
        matches!(self, RateInstrument::Swap3M(_))
    }
}

impl fmt::Display for RateInstrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateInstrument::OisSwap(swap) => write!(
                f,
                "OIS swap (T = {}, rate = {}, accrual = {})",
                swap.maturity(),
                swap.rate(),
                swap.accrual()
            ),
            RateInstrument::OisFuture(future) => write!(
                f,
                "OIS future (T = {}, price = {})",
                future.maturity(),
                future.price()
            ),
            RateInstrument::Swap3M(swap) => {
                write!(f, "3M swap (T = {}, rate = {})", swap.maturity(), swap.rate())
            }
        }
    }
}

impl From<OisSwap> for RateInstrument {
    fn from(swap: OisSwap) -> Self {
        RateInstrument::OisSwap(swap)
    }
}

impl From<OisFuture> for RateInstrument {
    fn from(future: OisFuture) -> Self {
        RateInstrument::OisFuture(future)
    }
}

impl From<Swap3M> for RateInstrument {
    fn from(swap: Swap3M) -> Self {
        RateInstrument::Swap3M(swap)
    }
}

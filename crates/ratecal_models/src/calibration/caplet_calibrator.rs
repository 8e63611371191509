//! SABR calibration to 3M caplet quotes.

use ratecal_core::market_data::YieldCurve;

use super::error::CalibrationError;
use super::result::SmileCalibration;
use super::vol_calibrator::{VolCalibrationConfig, VolCalibrator, VolQuote};
use crate::instruments::Caplet3M;

/// Convert caplets to volatility quotes, reading each forward from
/// `forward_curve` over `[expiry, expiry + 0.25]`.
pub fn caplet_quotes<C>(caplets: &[Caplet3M], forward_curve: &C) -> Result<Vec<VolQuote>, CalibrationError>
where
    C: YieldCurve<f64> + ?Sized,
{
    caplets
        .iter()
        .map(|caplet| -> Result<VolQuote, CalibrationError> {
            Ok(VolQuote::new(
                caplet.expiry(),
                caplet.strike(),
                caplet.market_vol(),
                caplet.forward_rate(forward_curve)?,
            ))
        })
        .collect()
}

/// Calibrates SABR smiles to 3M caplets.
///
/// Forwards come from the 3M curve; the fit itself is delegated to
/// [`VolCalibrator`].
#[derive(Debug, Clone, Default)]
pub struct Caplet3MVolCalibrator {
    calibrator: VolCalibrator,
}

impl Caplet3MVolCalibrator {
    /// Create a calibrator.
    pub fn new(config: VolCalibrationConfig) -> Self {
        Self {
            calibrator: VolCalibrator::new(config),
        }
    }

    /// Underlying volatility calibrator.
    pub fn vol_calibrator(&self) -> &VolCalibrator {
        &self.calibrator
    }

    /// Calibrate one smile per caplet expiry.
    pub fn calibrate<C>(
        &self,
        caplets: &[Caplet3M],
        forward_curve: &C,
    ) -> Result<Vec<SmileCalibration>, CalibrationError>
    where
        C: YieldCurve<f64> + ?Sized,
    {
        let quotes = caplet_quotes(caplets, forward_curve)?;
        self.calibrator.calibrate(&quotes)
    }
}

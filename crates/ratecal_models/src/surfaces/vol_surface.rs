//! Volatility surface backed by per-expiry SABR smiles.

use tracing::info;

use crate::calibration::{
    CalibrationError, SmileCalibration, VolCalibrationConfig, VolCalibrator, VolQuote,
};

/// Expiries closer than this are treated as equal when looking up a smile.
const EXPIRY_EPSILON: f64 = 1e-12;

/// Volatility surface `vol = f(expiry, strike, forward)`.
///
/// Market quotes are collected with [`add_quote`](Self::add_quote), then
/// [`calibrate`](Self::calibrate) fits one SABR smile per expiry. Between
/// calibrated expiries the surface interpolates linearly in volatility.
///
/// Adding a quote after calibration discards the fitted smiles.
///
/// # Example
///
/// ```
/// use ratecal_models::surfaces::VolSurface;
///
/// let mut surface = VolSurface::default();
/// surface.add_market_vol(1.0, 100.0, 0.2, 99.0).unwrap();
/// surface.calibrate().unwrap();
///
/// let vol = surface.get_vol(1.0, 100.0, 99.0).unwrap();
/// assert!((vol - 0.2).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VolSurface {
    quotes: Vec<VolQuote>,
    config: VolCalibrationConfig,
    smiles: Option<Vec<SmileCalibration>>,
}

impl VolSurface {
    /// Create an empty surface calibrated with `config`.
    pub fn new(config: VolCalibrationConfig) -> Self {
        Self {
            quotes: Vec::new(),
            config,
            smiles: None,
        }
    }

    /// Create a surface from existing quotes.
    pub fn with_quotes(config: VolCalibrationConfig, quotes: Vec<VolQuote>) -> Self {
        Self {
            quotes,
            config,
            smiles: None,
        }
    }

    /// Add a market quote.
    ///
    /// # Errors
    ///
    /// * `CalibrationError::InvalidQuote` - a field is not positive and finite
    pub fn add_quote(&mut self, quote: VolQuote) -> Result<(), CalibrationError> {
        quote.validate(self.quotes.len())?;
        self.quotes.push(quote);
        self.smiles = None;
        Ok(())
    }

    /// Add a market quote from its fields.
    pub fn add_market_vol(
        &mut self,
        expiry: f64,
        strike: f64,
        vol: f64,
        forward: f64,
    ) -> Result<(), CalibrationError> {
        self.add_quote(VolQuote::new(expiry, strike, vol, forward))
    }

    /// Collected quotes.
    pub fn quotes(&self) -> &[VolQuote] {
        &self.quotes
    }

    /// Calibration configuration.
    pub fn config(&self) -> &VolCalibrationConfig {
        &self.config
    }

    /// Whether [`calibrate`](Self::calibrate) has succeeded since the last quote.
    pub fn is_calibrated(&self) -> bool {
        self.smiles.is_some()
    }

    /// Fit one SABR smile per expiry.
    pub fn calibrate(&mut self) -> Result<&[SmileCalibration], CalibrationError> {
        let smiles = VolCalibrator::new(self.config).calibrate(&self.quotes)?;
        info!(
            expiries = smiles.len(),
            quotes = self.quotes.len(),
            engine = %self.config.engine,
            "Volatility surface calibrated"
        );
        Ok(self.smiles.insert(smiles).as_slice())
    }

    /// Calibrated smiles in ascending expiry order.
    pub fn smiles(&self) -> Result<&[SmileCalibration], CalibrationError> {
        self.smiles.as_deref().ok_or(CalibrationError::Uncalibrated)
    }

    /// Calibrated expiry range `(first, last)`.
    pub fn expiry_range(&self) -> Result<(f64, f64), CalibrationError> {
        let smiles = self.smiles()?;
        match (smiles.first(), smiles.last()) {
            (Some(first), Some(last)) => Ok((first.expiry, last.expiry)),
            _ => Err(CalibrationError::Uncalibrated),
        }
    }

    /// Volatility at `(expiry, strike, forward)`.
    ///
    /// An expiry matching a calibrated smile uses that smile; an expiry
    /// strictly between two smiles interpolates linearly between the two
    /// smiles' volatilities at `(strike, forward)`.
    ///
    /// # Errors
    ///
    /// * `CalibrationError::Uncalibrated` - `calibrate()` has not run
    /// * `CalibrationError::ExpiryOutOfRange` - expiry outside the calibrated range
    /// * `CalibrationError::InvalidQuote` - strike or forward not positive and finite
    pub fn get_vol(&self, expiry: f64, strike: f64, forward: f64) -> Result<f64, CalibrationError> {
        let smiles = self.smiles()?;
        for (field, value) in [("strike", strike), ("forward", forward)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(CalibrationError::invalid_quote(0, field, value));
            }
        }
        interpolate_smiles(smiles, expiry, strike, forward)
    }
}

/// Exact match or linear interpolation in expiry over sorted smiles.
fn interpolate_smiles(
    smiles: &[SmileCalibration],
    expiry: f64,
    strike: f64,
    forward: f64,
) -> Result<f64, CalibrationError> {
    let (first, last) = match (smiles.first(), smiles.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(CalibrationError::Uncalibrated),
    };

    if let Some(smile) = smiles
        .iter()
        .find(|s| (s.expiry - expiry).abs() <= EXPIRY_EPSILON)
    {
        return Ok(smile.vol(strike, forward));
    }
    if !(expiry > first.expiry && expiry < last.expiry) {
        return Err(CalibrationError::expiry_out_of_range(
            expiry,
            first.expiry,
            last.expiry,
        ));
    }

    // expiry is strictly inside the range, so a bracketing pair exists
    let upper = smiles.partition_point(|s| s.expiry < expiry);
    let (lo, hi) = (&smiles[upper - 1], &smiles[upper]);
    let w = (expiry - lo.expiry) / (hi.expiry - lo.expiry);
    Ok((1.0 - w) * lo.vol(strike, forward) + w * hi.vol(strike, forward))
}

//! Volatility surface for 3M caplets.

use ratecal_core::market_data::YieldCurve;

use super::vol_surface::VolSurface;
use crate::calibration::{caplet_quotes, CalibrationError, SmileCalibration, VolCalibrationConfig};
use crate::instruments::{Caplet3M, InstrumentError, CAPLET_ACCRUAL};

/// Volatility surface calibrated to 3M caplets.
///
/// Caplet forwards are read from the owned 3M curve, so lookups can be made
/// by `(expiry, strike)` alone through [`vol_at`](Self::vol_at).
#[derive(Debug, Clone)]
pub struct Caplet3MVolSurface<C> {
    caplets: Vec<Caplet3M>,
    forward_curve: C,
    surface: VolSurface,
}

impl<C: YieldCurve<f64>> Caplet3MVolSurface<C> {
    /// Create an empty surface over `forward_curve`.
    pub fn new(forward_curve: C, config: VolCalibrationConfig) -> Self {
        Self {
            caplets: Vec::new(),
            forward_curve,
            surface: VolSurface::new(config),
        }
    }

    /// Add a caplet quote; discards any previous calibration.
    pub fn add_caplet(&mut self, caplet: Caplet3M) {
        self.caplets.push(caplet);
        self.surface = VolSurface::new(*self.surface.config());
    }

    /// Collected caplets.
    pub fn caplets(&self) -> &[Caplet3M] {
        &self.caplets
    }

    /// The 3M curve supplying forwards.
    pub fn forward_curve(&self) -> &C {
        &self.forward_curve
    }

    /// Forward 3M rate fixing at `expiry`.
    pub fn forward(&self, expiry: f64) -> Result<f64, CalibrationError> {
        let forward = self
            .forward_curve
            .forward_rate(expiry, expiry + CAPLET_ACCRUAL)
            .map_err(InstrumentError::from)?;
        Ok(forward)
    }

    /// Fit one SABR smile per caplet expiry.
    pub fn calibrate(&mut self) -> Result<&[SmileCalibration], CalibrationError> {
        let quotes = caplet_quotes(&self.caplets, &self.forward_curve)?;
        self.surface = VolSurface::with_quotes(*self.surface.config(), quotes);
        self.surface.calibrate()
    }

    /// Whether the surface has been calibrated since the last caplet.
    pub fn is_calibrated(&self) -> bool {
        self.surface.is_calibrated()
    }

    /// Volatility at `(expiry, strike, forward)`.
    pub fn get_vol(&self, expiry: f64, strike: f64, forward: f64) -> Result<f64, CalibrationError> {
        self.surface.get_vol(expiry, strike, forward)
    }

    /// Volatility at `(expiry, strike)` with the forward taken from the curve.
    pub fn vol_at(&self, expiry: f64, strike: f64) -> Result<f64, CalibrationError> {
        let forward = self.forward(expiry)?;
        self.get_vol(expiry, strike, forward)
    }

    /// Volatilities on an `expiries × strikes` grid, one row per expiry.
    pub fn vol_grid(
        &self,
        expiries: &[f64],
        strikes: &[f64],
    ) -> Result<Vec<Vec<f64>>, CalibrationError> {
        expiries
            .iter()
            .map(|&t| {
                strikes
                    .iter()
                    .map(|&k| self.vol_at(t, k))
                    .collect::<Result<Vec<f64>, _>>()
            })
            .collect()
    }

    /// Underlying calibrated surface.
    pub fn surface(&self) -> &VolSurface {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ratecal_core::market_data::NelsonSiegelCurve;

    fn surface() -> Caplet3MVolSurface<NelsonSiegelCurve<f64>> {
        let curve = NelsonSiegelCurve::new(0.03, -0.01, 0.005, 2.0).unwrap();
        Caplet3MVolSurface::new(curve, VolCalibrationConfig::default())
    }

    #[test]
    fn test_uncalibrated() {
        let mut s = surface();
        s.add_caplet(Caplet3M::new(1.0, 0.03, 0.25).unwrap());
        assert_eq!(s.vol_at(1.0, 0.03).unwrap_err(), CalibrationError::Uncalibrated);
    }

    #[test]
    fn test_calibrated_caplets_reprice() {
        let mut s = surface();
        s.add_caplet(Caplet3M::new(1.0, 0.03, 0.25).unwrap());
        s.add_caplet(Caplet3M::new(2.0, 0.03, 0.22).unwrap());
        s.calibrate().unwrap();

        assert_abs_diff_eq!(s.vol_at(1.0, 0.03).unwrap(), 0.25, epsilon = 1e-6);
        assert_abs_diff_eq!(s.vol_at(2.0, 0.03).unwrap(), 0.22, epsilon = 1e-6);
    }

    #[test]
    fn test_grid_shape_and_range() {
        let mut s = surface();
        s.add_caplet(Caplet3M::new(1.0, 0.03, 0.25).unwrap());
        s.add_caplet(Caplet3M::new(2.0, 0.03, 0.22).unwrap());
        s.calibrate().unwrap();

        let grid = s.vol_grid(&[1.0, 1.5, 2.0], &[0.02, 0.03]).unwrap();
        assert_eq!(grid.len(), 3);
        assert!(grid.iter().all(|row| row.len() == 2));
        assert!(s.vol_grid(&[2.5], &[0.03]).is_err());
    }

    #[test]
    fn test_adding_caplet_resets() {
        let mut s = surface();
        s.add_caplet(Caplet3M::new(1.0, 0.03, 0.25).unwrap());
        s.calibrate().unwrap();
        s.add_caplet(Caplet3M::new(2.0, 0.03, 0.22).unwrap());
        assert!(!s.is_calibrated());
    }
}

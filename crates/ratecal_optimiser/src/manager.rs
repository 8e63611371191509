//! Curve pair construction for either curve model.

use ratecal_core::market_data::curves::{CurveModelKind, DiscountCurve};
use ratecal_core::math::solvers::CalibrationEngine;
use ratecal_models::instruments::RateInstrument;
use tracing::info;

use crate::bootstrapping::{BootstrapConfig, MultiCurveBootstrapper};
use crate::calibration::{CurveCalibrationConfig, ForwardCurveCalibrator, OisCurveCalibrator};
use crate::curve_pair::CurvePair;
use crate::OptimiserError;

/// Builds the OIS and 3M curves with the selected curve model.
///
/// - [`CurveModelKind::BootstrappedLogLinear`] runs the
///   [`MultiCurveBootstrapper`]; the engine is not used.
/// - [`CurveModelKind::SmoothParametric`] fits two Nelson-Siegel curves,
///   OIS first, with the given engine.
///
/// # Example
///
/// ```
/// use ratecal_core::market_data::curves::{CurveModelKind, YieldCurve};
/// use ratecal_core::math::solvers::CalibrationEngine;
/// use ratecal_models::instruments::{OisSwap, RateInstrument, Swap3M};
/// use ratecal_optimiser::CurveManager;
///
/// let ois: Vec<RateInstrument> = vec![
///     OisSwap::new(2.0, 0.022).unwrap().with_accrual(0.5).unwrap().into(),
///     OisSwap::new(3.0, 0.024).unwrap().with_accrual(0.5).unwrap().into(),
/// ];
/// let swaps: Vec<RateInstrument> = vec![Swap3M::new(0.25, 0.023).unwrap().into()];
///
/// let curves = CurveManager::default()
///     .build(&ois, &swaps, CurveModelKind::BootstrappedLogLinear, CalibrationEngine::default())
///     .unwrap();
/// assert!((curves.ois.discount_factor(2.0).unwrap() - 0.9564787).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CurveManager {
    bootstrap: BootstrapConfig,
    calibration: CurveCalibrationConfig,
}

impl CurveManager {
    /// Create a manager.
    ///
    /// The engine in `calibration` is overridden by the one passed to
    /// [`build`](Self::build).
    pub fn new(bootstrap: BootstrapConfig, calibration: CurveCalibrationConfig) -> Self {
        Self {
            bootstrap,
            calibration,
        }
    }

    /// Bootstrap configuration.
    pub fn bootstrap_config(&self) -> &BootstrapConfig {
        &self.bootstrap
    }

    /// Parametric calibration configuration.
    pub fn calibration_config(&self) -> &CurveCalibrationConfig {
        &self.calibration
    }

    /// Build the curve pair.
    pub fn build(
        &self,
        ois_instruments: &[RateInstrument],
        swaps_3m: &[RateInstrument],
        model: CurveModelKind,
        engine: CalibrationEngine,
    ) -> Result<CurvePair<DiscountCurve<f64>>, OptimiserError> {
        let curves = match model {
            CurveModelKind::BootstrappedLogLinear => {
                let result = MultiCurveBootstrapper::new(self.bootstrap)
                    .bootstrap(ois_instruments, swaps_3m)?;
                info!(max_residual = result.max_residual(), "Curves bootstrapped");
                result.curves.map(DiscountCurve::from)
            }
            CurveModelKind::SmoothParametric => {
                let config = self.calibration.with_engine(engine);
                let ois = OisCurveCalibrator::new(config).calibrate(ois_instruments)?;
                let forward = ForwardCurveCalibrator::new(config).calibrate(&ois.curve, swaps_3m)?;
                info!(
                    engine = %engine,
                    ois_rms = ois.diagnostics.rms_error,
                    forward_rms = forward.diagnostics.rms_error,
                    "Nelson-Siegel curves calibrated"
                );
                CurvePair::new(ois.curve, forward.curve).map(DiscountCurve::from)
            }
        };
        Ok(curves)
    }
}

//! SABR stochastic volatility model with lognormal backbone.
//!
//! The SABR model is described by the SDEs
//!
//! ```text
//! dF = alpha * F^beta * dW_F
//! d(alpha) = nu * alpha * dW_alpha
//! E[dW_F * dW_alpha] = rho * dt
//! ```
//!
//! Beta is fixed at 1, leaving `(alpha, rho, nu)` to calibrate.
//!
//! ## Hagan Formula
//!
//! Implied Black volatility is approximated by
//!
//! ```text
//! σ_B(K, F) = α / [(FK)^((1-β)/2) * D(F/K)]
//!             × z/x(z)
//!             × [1 + correction * T]
//! ```
//!
//! where
//! - `D(F/K) = 1 + (1-β)²/24 ln²(F/K) + (1-β)⁴/1920 ln⁴(F/K)`
//! - `z = (ν/α) (FK)^((1-β)/2) ln(F/K)`
//! - `x(z) = ln((√(1-2ρz+z²) + z - ρ) / (1-ρ))`
//! - `correction = (1-β)²/24 α²/(FK)^(1-β) + ¼ ρβνα/(FK)^((1-β)/2) + (2-3ρ²)/24 ν²`
//!
//! At the money (`|F - K| < 1e-12`) the formula reduces to
//! `α / F^(1-β) * (1 + correction * T)`.
//!
//! ## Example
//!
//! ```
//! use ratecal_models::models::sabr::SabrParams;
//!
//! let params = SabrParams::new(0.2, -0.3, 0.4).unwrap();
//!
//! let atm = params.implied_vol(1.0, 0.03, 0.03);
//! let otm = params.implied_vol(1.0, 0.04, 0.03);
//! assert!(atm > 0.0 && otm > 0.0);
//! ```

use ratecal_core::math::solvers::{BoxConstraints, ConstraintSet};
use ratecal_core::types::SolverError;
use thiserror::Error;

/// CEV exponent, fixed.
pub const SABR_BETA: f64 = 1.0;

/// Distance `|F - K|` under which the ATM formula is used.
pub const ATM_THRESHOLD: f64 = 1e-12;

/// `|z|` under which `z / x(z)` takes its limit 1.
const Z_THRESHOLD: f64 = 1e-12;

/// Floor applied to alpha and nu by [`SabrConstraints`].
pub const POSITIVE_FLOOR: f64 = 1e-8;

/// Bound applied to `|rho|` by [`SabrConstraints`].
pub const RHO_LIMIT: f64 = 0.999;

/// Starting point `[alpha, rho, nu]` for calibration.
pub const INITIAL_GUESS: [f64; 3] = [0.2, 0.2, 0.5];

/// Lower box bounds `[alpha, rho, nu]` for the bounded least-squares engine.
pub const LOWER_BOUNDS: [f64; 3] = [POSITIVE_FLOOR, -RHO_LIMIT, POSITIVE_FLOOR];

/// Upper box bounds `[alpha, rho, nu]` for the bounded least-squares engine.
pub const UPPER_BOUNDS: [f64; 3] = [10.0, RHO_LIMIT, 5.0];

/// SABR parameter errors.
///
/// # Examples
///
/// ```
/// use ratecal_models::models::sabr::SabrError;
///
/// let err = SabrError::InvalidAlpha(-0.1);
/// assert!(format!("{}", err).contains("-0.1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SabrError {
    /// Alpha not positive and finite.
    #[error("Invalid alpha: {0} (must be positive)")]
    InvalidAlpha(f64),

    /// Rho outside `(-1, 1)`.
    #[error("Invalid rho: {0} (must lie in (-1, 1))")]
    InvalidRho(f64),

    /// Nu not positive and finite.
    #[error("Invalid nu: {0} (must be positive)")]
    InvalidNu(f64),

    /// Parameter vector of the wrong length.
    #[error("Expected 3 SABR parameters, got {0}")]
    WrongLength(usize),
}

/// Calibrated SABR parameters with `beta = 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SabrParams {
    alpha: f64,
    rho: f64,
    nu: f64,
}

impl SabrParams {
    /// Create validated parameters.
    ///
    /// # Errors
    ///
    /// * `SabrError::InvalidAlpha` - `alpha <= 0` or not finite
    /// * `SabrError::InvalidRho` - `|rho| >= 1` or not finite
    /// * `SabrError::InvalidNu` - `nu <= 0` or not finite
    pub fn new(alpha: f64, rho: f64, nu: f64) -> Result<Self, SabrError> {
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(SabrError::InvalidAlpha(alpha));
        }
        if !(rho.is_finite() && rho.abs() < 1.0) {
            return Err(SabrError::InvalidRho(rho));
        }
        if !(nu.is_finite() && nu > 0.0) {
            return Err(SabrError::InvalidNu(nu));
        }
        Ok(Self { alpha, rho, nu })
    }

    /// Create from a solver vector `[alpha, rho, nu]`.
    pub fn from_slice(params: &[f64]) -> Result<Self, SabrError> {
        match params {
            [alpha, rho, nu] => Self::new(*alpha, *rho, *nu),
            _ => Err(SabrError::WrongLength(params.len())),
        }
    }

    /// Solver vector `[alpha, rho, nu]`.
    pub fn to_array(&self) -> [f64; 3] {
        [self.alpha, self.rho, self.nu]
    }

    /// Initial volatility.
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Forward/volatility correlation.
    #[inline]
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Volatility of volatility.
    #[inline]
    pub fn nu(&self) -> f64 {
        self.nu
    }

    /// Implied Black volatility at `(expiry, strike, forward)`.
    pub fn implied_vol(&self, expiry: f64, strike: f64, forward: f64) -> f64 {
        implied_vol(expiry, strike, forward, self.alpha, self.rho, self.nu)
    }
}

/// Hagan implied volatility with `beta = 1`.
///
/// Pure function of its inputs; parameters are not validated so it can be
/// evaluated at any point a solver visits.
pub fn implied_vol(expiry: f64, strike: f64, forward: f64, alpha: f64, rho: f64, nu: f64) -> f64 {
    let beta = SABR_BETA;
    let one_minus_beta = 1.0 - beta;
    let fk = forward * strike;
    let fk_pow_half = fk.powf(one_minus_beta / 2.0);

    let correction = one_minus_beta * one_minus_beta / 24.0 * alpha * alpha
        / fk.powf(one_minus_beta)
        + 0.25 * rho * beta * nu * alpha / fk_pow_half
        + (2.0 - 3.0 * rho * rho) / 24.0 * nu * nu;
    let expansion = 1.0 + correction * expiry;

    if (forward - strike).abs() < ATM_THRESHOLD {
        return alpha / forward.powf(one_minus_beta) * expansion;
    }

    let log_fk = (forward / strike).ln();
    let log_fk_2 = log_fk * log_fk;
    let one_minus_beta_2 = one_minus_beta * one_minus_beta;
    let d = 1.0
        + one_minus_beta_2 / 24.0 * log_fk_2
        + one_minus_beta_2 * one_minus_beta_2 / 1920.0 * log_fk_2 * log_fk_2;

    let z = (nu / alpha) * fk_pow_half * log_fk;
    let z_over_x = if z.abs() < Z_THRESHOLD {
        1.0
    } else {
        z / x_of_z(z, rho)
    };

    alpha / (fk_pow_half * d) * z_over_x * expansion
}

fn x_of_z(z: f64, rho: f64) -> f64 {
    let disc = (1.0 - 2.0 * rho * z + z * z).sqrt();
    // ln(1 + u) with u formed without cancellation, exact enough near z = 0
    let disc_minus_one = z * (z - 2.0 * rho) / (disc + 1.0);
    ((disc_minus_one + z) / (1.0 - rho)).ln_1p()
}

/// Feasible region of the SABR parameters for SQP.
///
/// ```text
/// g(x) = [-alpha, rho - 1, -1 - rho, -nu] <= 0
/// ```
///
/// Projection floors alpha and nu at `1e-8` and clips rho to
/// `[-0.999, 0.999]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SabrConstraints;

impl ConstraintSet for SabrConstraints {
    fn values(&self, x: &[f64]) -> Vec<f64> {
        vec![-x[0], x[1] - 1.0, -1.0 - x[1], -x[2]]
    }

    fn gradients(&self, _x: &[f64]) -> Vec<Vec<f64>> {
        vec![
            vec![-1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, -1.0, 0.0],
            vec![0.0, 0.0, -1.0],
        ]
    }

    fn project(&self, x: &mut [f64]) {
        x[0] = x[0].max(POSITIVE_FLOOR);
        x[1] = x[1].clamp(-RHO_LIMIT, RHO_LIMIT);
        x[2] = x[2].max(POSITIVE_FLOOR);
    }
}

/// Box bounds `[1e-8, -0.999, 1e-8]` to `[10, 0.999, 5]`.
pub fn default_bounds() -> Result<BoxConstraints, SolverError> {
    BoxConstraints::new(LOWER_BOUNDS.to_vec(), UPPER_BOUNDS.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use proptest::prelude::*;

    // ========================================
    // Parameter Tests
    // ========================================

    #[test]
    fn test_params_validation() {
        assert!(SabrParams::new(0.2, 0.0, 0.3).is_ok());
        assert_eq!(
            SabrParams::new(0.0, 0.0, 0.3).unwrap_err(),
            SabrError::InvalidAlpha(0.0)
        );
        assert_eq!(
            SabrParams::new(0.2, 1.0, 0.3).unwrap_err(),
            SabrError::InvalidRho(1.0)
        );
        assert!(matches!(
            SabrParams::new(0.2, 0.0, f64::NAN),
            Err(SabrError::InvalidNu(_))
        ));
    }

    #[test]
    fn test_from_slice() {
        let params = SabrParams::from_slice(&[0.2, -0.1, 0.5]).unwrap();
        assert_eq!(params.to_array(), [0.2, -0.1, 0.5]);
        assert_eq!(
            SabrParams::from_slice(&[0.2, 0.1]).unwrap_err(),
            SabrError::WrongLength(2)
        );
    }

    // ========================================
    // Implied Volatility Tests
    // ========================================

    #[test]
    fn test_atm_formula() {
        let (alpha, rho, nu, t) = (0.2, -0.3, 0.4, 2.0);
        let correction = 0.25 * rho * nu * alpha + (2.0 - 3.0 * rho * rho) / 24.0 * nu * nu;
        let expected = alpha * (1.0 + correction * t);
        assert_relative_eq!(
            implied_vol(t, 0.03, 0.03, alpha, rho, nu),
            expected,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_zero_vol_of_vol_is_flat() {
        // nu = 0 and beta = 1 is Black with constant volatility alpha
        for strike in [0.01, 0.02, 0.05, 0.1] {
            assert_relative_eq!(
                implied_vol(1.0, strike, 0.03, 0.25, 0.0, 0.0),
                0.25,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_negative_rho_gives_downward_skew() {
        let params = SabrParams::new(0.2, -0.5, 0.5).unwrap();
        let low = params.implied_vol(1.0, 80.0, 100.0);
        let high = params.implied_vol(1.0, 120.0, 100.0);
        assert!(low > high);
    }

    #[test]
    fn test_smile_is_convex_with_zero_rho() {
        let params = SabrParams::new(0.2, 0.0, 0.8).unwrap();
        let atm = params.implied_vol(1.0, 100.0, 100.0);
        assert!(params.implied_vol(1.0, 70.0, 100.0) > atm);
        assert!(params.implied_vol(1.0, 130.0, 100.0) > atm);
    }

    proptest! {
        #[test]
        fn prop_continuous_at_the_money(
            alpha in 0.05f64..1.0,
            rho in -0.9f64..0.9,
            nu in 0.05f64..2.0,
            expiry in 0.1f64..5.0,
            forward in 0.005f64..0.1,
        ) {
            let atm = implied_vol(expiry, forward, forward, alpha, rho, nu);
            let near = implied_vol(expiry, forward * (1.0 + 1e-7), forward, alpha, rho, nu);
            prop_assert!((atm - near).abs() <= 1e-4 * atm.abs() + 1e-12);
        }
    }

    #[test]
    fn test_continuous_across_branch_switch() {
        // Strikes on both sides of the 1e-12 ATM threshold
        for forward in [0.03, 1.0, 100.0] {
            let atm = implied_vol(1.5, forward, forward, 0.25, -0.4, 0.8);
            for bump in [-1e-10, -1e-11, 1e-11, 1e-10] {
                let near = implied_vol(1.5, forward * (1.0 + bump), forward, 0.25, -0.4, 0.8);
                assert_relative_eq!(near, atm, max_relative = 1e-8);
            }
        }
    }

    // ========================================
    // Constraint Tests
    // ========================================

    #[test]
    fn test_constraint_values() {
        let g = SabrConstraints.values(&[0.2, 0.5, 0.3]);
        assert_eq!(g, vec![-0.2, -0.5, -1.5, -0.3]);
        assert!(SabrConstraints.is_feasible(&[0.2, 0.5, 0.3]));
        assert!(!SabrConstraints.is_feasible(&[-0.2, 0.5, 0.3]));
    }

    #[test]
    fn test_projection() {
        let mut x = [-1.0, 1.5, 0.0];
        SabrConstraints.project(&mut x);
        assert_eq!(x, [1e-8, 0.999, 1e-8]);

        let mut inside = [0.3, -0.2, 0.7];
        SabrConstraints.project(&mut inside);
        assert_eq!(inside, [0.3, -0.2, 0.7]);
    }

    #[test]
    fn test_default_bounds() {
        let bounds = default_bounds().unwrap();
        assert_eq!(bounds.lower(), &LOWER_BOUNDS[..]);
        assert_eq!(bounds.upper(), &UPPER_BOUNDS[..]);
        assert!(bounds.is_feasible(&INITIAL_GUESS));
        assert_abs_diff_eq!(bounds.upper()[2], 5.0);
    }
}

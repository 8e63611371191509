//! Inequality constraints for the bounded and SQP solvers.
//!
//! Constraints are expressed as `g(x) <= 0`. Every set also supplies a
//! projection onto its feasible region, applied to trial points and
//! finite-difference bumps.

use crate::types::SolverError;

/// Set of inequality constraints `g_i(x) <= 0`.
pub trait ConstraintSet {
    /// Constraint values `g(x)`; feasible when every entry is `<= 0`.
    fn values(&self, x: &[f64]) -> Vec<f64>;

    /// Constraint gradients, one row per constraint.
    fn gradients(&self, x: &[f64]) -> Vec<Vec<f64>>;

    /// Move `x` into the feasible region in place.
    fn project(&self, x: &mut [f64]);

    /// Whether `x` satisfies every constraint.
    fn is_feasible(&self, x: &[f64]) -> bool {
        self.values(x).iter().all(|g| *g <= 0.0)
    }
}

impl<K: ConstraintSet + ?Sized> ConstraintSet for &K {
    fn values(&self, x: &[f64]) -> Vec<f64> {
        (**self).values(x)
    }

    fn gradients(&self, x: &[f64]) -> Vec<Vec<f64>> {
        (**self).gradients(x)
    }

    fn project(&self, x: &mut [f64]) {
        (**self).project(x)
    }
}

/// No constraints at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unconstrained;

impl ConstraintSet for Unconstrained {
    fn values(&self, _x: &[f64]) -> Vec<f64> {
        Vec::new()
    }

    fn gradients(&self, _x: &[f64]) -> Vec<Vec<f64>> {
        Vec::new()
    }

    fn project(&self, _x: &mut [f64]) {}
}

/// Per-parameter box bounds `lower_i <= x_i <= upper_i`.
///
/// Infinite bounds contribute no constraint rows.
///
/// # Example
///
/// ```
/// use ratecal_core::math::solvers::{BoxConstraints, ConstraintSet};
///
/// let bounds = BoxConstraints::new(vec![0.0, f64::NEG_INFINITY], vec![1.0, f64::INFINITY]).unwrap();
/// let mut x = [1.5, -7.0];
/// bounds.project(&mut x);
/// assert_eq!(x, [1.0, -7.0]);
/// assert_eq!(bounds.values(&x).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BoxConstraints {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl BoxConstraints {
    /// Create box bounds.
    ///
    /// # Errors
    ///
    /// * `SolverError::DimensionMismatch` - `lower` and `upper` lengths differ
    /// * `SolverError::InvalidInput` - a bound is NaN or `lower > upper`
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, SolverError> {
        if lower.len() != upper.len() {
            return Err(SolverError::DimensionMismatch {
                expected: lower.len(),
                got: upper.len(),
            });
        }
        for (i, (lo, hi)) in lower.iter().zip(&upper).enumerate() {
            if lo.is_nan() || hi.is_nan() || lo > hi {
                return Err(SolverError::InvalidInput(format!(
                    "invalid bounds [{}, {}] for parameter {}",
                    lo, hi, i
                )));
            }
        }
        Ok(Self { lower, upper })
    }

    /// Bounds that leave all `n` parameters free.
    pub fn unbounded(n: usize) -> Self {
        Self {
            lower: vec![f64::NEG_INFINITY; n],
            upper: vec![f64::INFINITY; n],
        }
    }

    /// Lower bounds.
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper bounds.
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Number of bounded parameters.
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// True when the box has no parameters.
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }
}

impl ConstraintSet for BoxConstraints {
    fn values(&self, x: &[f64]) -> Vec<f64> {
        let mut g = Vec::new();
        for (i, &xi) in x.iter().enumerate().take(self.len()) {
            if self.lower[i].is_finite() {
                g.push(self.lower[i] - xi);
            }
            if self.upper[i].is_finite() {
                g.push(xi - self.upper[i]);
            }
        }
        g
    }

    fn gradients(&self, x: &[f64]) -> Vec<Vec<f64>> {
        let n = x.len();
        let mut rows = Vec::new();
        for i in 0..n.min(self.len()) {
            if self.lower[i].is_finite() {
                let mut row = vec![0.0; n];
                row[i] = -1.0;
                rows.push(row);
            }
            if self.upper[i].is_finite() {
                let mut row = vec![0.0; n];
                row[i] = 1.0;
                rows.push(row);
            }
        }
        rows
    }

    fn project(&self, x: &mut [f64]) {
        for (xi, (lo, hi)) in x.iter_mut().zip(self.lower.iter().zip(&self.upper)) {
            *xi = xi.max(*lo).min(*hi);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_rejects_mismatched_lengths() {
        let result = BoxConstraints::new(vec![0.0], vec![1.0, 2.0]);
        assert!(matches!(
            result,
            Err(SolverError::DimensionMismatch { expected: 1, got: 2 })
        ));
    }

    #[test]
    fn test_box_rejects_inverted_bounds() {
        assert!(BoxConstraints::new(vec![1.0], vec![0.0]).is_err());
        assert!(BoxConstraints::new(vec![f64::NAN], vec![0.0]).is_err());
    }

    #[test]
    fn test_box_values_and_gradients() {
        let bounds = BoxConstraints::new(vec![0.0, -1.0], vec![f64::INFINITY, 1.0]).unwrap();
        let x = [0.5, 0.25];
        assert_eq!(bounds.values(&x), vec![-0.5, -1.25, -0.75]);
        assert_eq!(
            bounds.gradients(&x),
            vec![vec![-1.0, 0.0], vec![0.0, -1.0], vec![0.0, 1.0]]
        );
        assert!(bounds.is_feasible(&x));
        assert!(!bounds.is_feasible(&[-0.1, 0.0]));
    }

    #[test]
    fn test_unbounded_is_inert() {
        let bounds = BoxConstraints::unbounded(2);
        let mut x = [1e9, -1e9];
        bounds.project(&mut x);
        assert_eq!(x, [1e9, -1e9]);
        assert!(bounds.values(&x).is_empty());
    }

    #[test]
    fn test_unconstrained() {
        let mut x = [3.0];
        Unconstrained.project(&mut x);
        assert_eq!(x, [3.0]);
        assert!(Unconstrained.is_feasible(&x));
    }
}

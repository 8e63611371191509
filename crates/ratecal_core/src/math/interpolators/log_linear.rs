//! Log-linear discount factor interpolation.

use crate::types::InterpolationError;
use num_traits::Float;

/// Piecewise log-linear interpolator over `(time, discount factor)` knots.
///
/// Between bracketing knots `i` and `i + 1`:
///
/// ```text
/// df(t) = df_i * exp((ln df_{i+1} - ln df_i) * (t - t_i) / (t_{i+1} - t_i))
/// ```
///
/// Outside `[t_0, t_{n-1}]` the boundary discount factor is held constant.
///
/// # Type Parameters
///
/// * `T` - Floating-point type (e.g., `f64`)
///
/// # Example
///
/// ```
/// use ratecal_core::math::interpolators::LogLinearInterpolator;
///
/// let interp = LogLinearInterpolator::new(&[0.0, 1.0], &[1.0, 0.95]).unwrap();
///
/// // Halfway in time is the geometric mean in discount factor
/// let mid = interp.interpolate(0.5);
/// assert!((mid - 0.95_f64.sqrt()).abs() < 1e-14);
/// ```
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator<T: Float> {
    /// Strictly increasing knot times
    times: Vec<T>,
    /// Discount factors at the knots
    dfs: Vec<T>,
    /// Cached natural logarithms of `dfs`
    log_dfs: Vec<T>,
}

impl<T: Float> LogLinearInterpolator<T> {
    /// Construct an interpolator from knot arrays.
    ///
    /// Knots are used in the order given; they are not sorted.
    ///
    /// # Returns
    ///
    /// * `Ok(LogLinearInterpolator)` - Successfully constructed interpolator
    /// * `Err(InterpolationError::InsufficientData)` - Fewer than 2 knots
    /// * `Err(InterpolationError::InvalidInput)` - Mismatched array lengths
    /// * `Err(InterpolationError::NonMonotonicData)` - Times not strictly increasing
    /// * `Err(InterpolationError::NonPositiveValue)` - Discount factor not positive and finite
    ///
    /// # Example
    ///
    /// ```
    /// use ratecal_core::math::interpolators::LogLinearInterpolator;
    ///
    /// let result = LogLinearInterpolator::new(&[0.0], &[1.0]);
    /// assert!(result.is_err());
    /// ```
    pub fn new(times: &[T], dfs: &[T]) -> Result<Self, InterpolationError> {
        validate_knots(times, dfs)?;

        Ok(Self {
            times: times.to_vec(),
            dfs: dfs.to_vec(),
            log_dfs: dfs.iter().map(|df| df.ln()).collect(),
        })
    }

    /// Interpolate the discount factor at `t`.
    #[inline]
    pub fn interpolate(&self, t: T) -> T {
        let n = self.times.len();
        if t <= self.times[0] {
            return self.dfs[0];
        }
        if t >= self.times[n - 1] {
            return self.dfs[n - 1];
        }

        let i = find_segment(&self.times, t);
        let w = (t - self.times[i]) / (self.times[i + 1] - self.times[i]);
        self.dfs[i] * ((self.log_dfs[i + 1] - self.log_dfs[i]) * w).exp()
    }

    /// Return the knot time range `(t_min, t_max)`.
    #[inline]
    pub fn domain(&self) -> (T, T) {
        (self.times[0], self.times[self.times.len() - 1])
    }

    /// Knot times.
    #[inline]
    pub fn times(&self) -> &[T] {
        &self.times
    }

    /// Knot discount factors.
    #[inline]
    pub fn dfs(&self) -> &[T] {
        &self.dfs
    }

    /// Number of knots.
    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false for a constructed interpolator.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Interpolate directly over knot slices without building an interpolator.
///
/// Applies the same validation and extrapolation policy as
/// [`LogLinearInterpolator`]. Intended for curves that are still growing,
/// where caching logarithms would be invalidated by every appended knot.
///
/// # Example
///
/// ```
/// use ratecal_core::math::interpolators::log_linear_interpolate;
///
/// let df = log_linear_interpolate(&[0.0, 2.0], &[1.0, 0.9], 1.0).unwrap();
/// assert!((df - 0.9_f64.sqrt()).abs() < 1e-14);
/// ```
pub fn log_linear_interpolate<T: Float>(
    times: &[T],
    dfs: &[T],
    t: T,
) -> Result<T, InterpolationError> {
    validate_knots(times, dfs)?;

    let n = times.len();
    if t <= times[0] {
        return Ok(dfs[0]);
    }
    if t >= times[n - 1] {
        return Ok(dfs[n - 1]);
    }

    let i = find_segment(times, t);
    let w = (t - times[i]) / (times[i + 1] - times[i]);
    Ok(dfs[i] * ((dfs[i + 1].ln() - dfs[i].ln()) * w).exp())
}

/// Index `i` such that `times[i] <= t < times[i + 1]`, clamped to `[0, n-2]`.
#[inline]
fn find_segment<T: Float>(times: &[T], t: T) -> usize {
    let pos = times.partition_point(|&ti| ti <= t);
    pos.saturating_sub(1).min(times.len() - 2)
}

fn validate_knots<T: Float>(times: &[T], dfs: &[T]) -> Result<(), InterpolationError> {
    if times.len() != dfs.len() {
        return Err(InterpolationError::InvalidInput(format!(
            "times and dfs must have same length: got {} and {}",
            times.len(),
            dfs.len()
        )));
    }

    if times.len() < 2 {
        return Err(InterpolationError::InsufficientData {
            got: times.len(),
            need: 2,
        });
    }

    for (i, &df) in dfs.iter().enumerate() {
        if df <= T::zero() || !df.is_finite() {
            return Err(InterpolationError::NonPositiveValue {
                index: i,
                value: df.to_f64().unwrap_or(f64::NAN),
            });
        }
        if i > 0 && times[i] <= times[i - 1] {
            return Err(InterpolationError::NonMonotonicData { index: i });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    // ========================================
    // Construction Tests
    // ========================================

    #[test]
    fn test_new_valid() {
        let interp = LogLinearInterpolator::new(&[0.0, 1.0, 2.0], &[1.0, 0.98, 0.95]).unwrap();
        assert_eq!(interp.len(), 3);
        assert!(!interp.is_empty());
        assert_eq!(interp.domain(), (0.0, 2.0));
    }

    #[test]
    fn test_new_single_knot_rejected() {
        let result = LogLinearInterpolator::new(&[0.0_f64], &[1.0]);
        assert_eq!(
            result.unwrap_err(),
            InterpolationError::InsufficientData { got: 1, need: 2 }
        );
    }

    #[test]
    fn test_new_mismatched_lengths() {
        let result = LogLinearInterpolator::new(&[0.0, 1.0], &[1.0]);
        assert!(matches!(result, Err(InterpolationError::InvalidInput(_))));
    }

    #[test]
    fn test_new_non_increasing_times() {
        let result = LogLinearInterpolator::new(&[0.0, 1.0, 1.0], &[1.0, 0.99, 0.98]);
        assert_eq!(
            result.unwrap_err(),
            InterpolationError::NonMonotonicData { index: 2 }
        );
    }

    #[test]
    fn test_new_non_positive_df() {
        let result = LogLinearInterpolator::new(&[0.0, 1.0], &[1.0, 0.0]);
        assert!(matches!(
            result,
            Err(InterpolationError::NonPositiveValue { index: 1, .. })
        ));
    }

    // ========================================
    // Interpolation Tests
    // ========================================

    #[test]
    fn test_interpolate_constant_forward() {
        // Constant forward of 3% between 1y and 2y
        let df1 = (-0.02_f64).exp();
        let df2 = (-0.05_f64).exp();
        let interp = LogLinearInterpolator::new(&[0.0, 1.0, 2.0], &[1.0, df1, df2]).unwrap();

        let df = interp.interpolate(1.25);
        assert_relative_eq!(df, (-0.02 - 0.03 * 0.25_f64).exp(), epsilon = 1e-14);
    }

    #[test]
    fn test_extrapolation_holds_boundary() {
        let interp = LogLinearInterpolator::new(&[0.5, 1.0], &[0.99, 0.97]).unwrap();
        assert_eq!(interp.interpolate(0.1), 0.99);
        assert_eq!(interp.interpolate(10.0), 0.97);
    }

    #[test]
    fn test_free_function_matches_struct() {
        let times = [0.0, 0.25, 0.5, 1.0];
        let dfs = [1.0, 0.999, 0.997, 0.99];
        let interp = LogLinearInterpolator::new(&times, &dfs).unwrap();

        for &t in &[0.1, 0.3, 0.75, 2.0] {
            let a = interp.interpolate(t);
            let b = log_linear_interpolate(&times, &dfs, t).unwrap();
            assert_relative_eq!(a, b, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_free_function_rejects_single_knot() {
        let result = log_linear_interpolate(&[0.0], &[1.0], 0.5);
        assert!(matches!(
            result,
            Err(InterpolationError::InsufficientData { got: 1, need: 2 })
        ));
    }

    // ========================================
    // Property Tests
    // ========================================

    fn knots_strategy() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
        prop::collection::vec((0.01_f64..2.0, 0.5_f64..1.2), 2..12).prop_map(|steps| {
            let mut t = 0.0;
            let mut times = Vec::with_capacity(steps.len());
            let mut dfs = Vec::with_capacity(steps.len());
            for (dt, df) in steps {
                t += dt;
                times.push(t);
                dfs.push(df);
            }
            (times, dfs)
        })
    }

    proptest! {
        #[test]
        fn prop_exact_at_knots((times, dfs) in knots_strategy()) {
            let interp = LogLinearInterpolator::new(&times, &dfs).unwrap();
            for (t, df) in times.iter().zip(&dfs) {
                prop_assert!((interp.interpolate(*t) - df).abs() <= 1e-14 * df.abs().max(1.0));
            }
        }

        #[test]
        fn prop_bounded_by_bracketing_knots((times, dfs) in knots_strategy(), u in 0.0_f64..1.0) {
            let interp = LogLinearInterpolator::new(&times, &dfs).unwrap();
            let (lo, hi) = interp.domain();
            let t = lo + u * (hi - lo);
            let df = interp.interpolate(t);
            let min = dfs.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = dfs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(df >= min * (1.0 - 1e-12) && df <= max * (1.0 + 1e-12));
        }
    }
}

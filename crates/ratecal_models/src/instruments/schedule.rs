//! Fixed-accrual payment schedules in year fractions.

/// One accrual period `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccrualPeriod {
    /// Period start time
    pub start: f64,
    /// Period end (payment) time
    pub end: f64,
}

impl AccrualPeriod {
    /// Year fraction of the period.
    #[inline]
    pub fn accrual(&self) -> f64 {
        self.end - self.start
    }
}

/// Payment times `{δ, 2δ, …, T}` for a leg with accrual `δ` maturing at `T`.
///
/// The number of periods is `max(1, floor(T/δ))`; the last payment time is
/// always exactly `T`, so a maturity that is not a multiple of `δ` stretches
/// the final period.
///
/// # Example
///
/// ```
/// use ratecal_models::instruments::payment_schedule;
///
/// assert_eq!(payment_schedule(1.0, 0.25), vec![0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(payment_schedule(0.6, 0.25), vec![0.25, 0.6]);
/// assert_eq!(payment_schedule(0.1, 0.25), vec![0.1]);
/// ```
pub fn payment_schedule(maturity: f64, accrual: f64) -> Vec<f64> {
    let n = ((maturity / accrual + 1e-9).floor() as usize).max(1);
    let mut times: Vec<f64> = (1..=n).map(|i| i as f64 * accrual).collect();
    if let Some(last) = times.last_mut() {
        *last = maturity;
    }
    times
}

/// Accrual periods for [`payment_schedule`], starting at zero.
pub fn accrual_periods(maturity: f64, accrual: f64) -> Vec<AccrualPeriod> {
    let mut start = 0.0;
    payment_schedule(maturity, accrual)
        .into_iter()
        .map(|end| {
            let period = AccrualPeriod { start, end };
            start = end;
            period
        })
        .collect()
}

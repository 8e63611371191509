//! Bootstrap configuration.

/// Configuration for multi-curve bootstrapping.
///
/// The bootstrapper itself solves each pillar in closed form, so the
/// configuration only controls input validation and the post-build
/// repricing check.
///
/// # Examples
///
/// ```
/// use ratecal_optimiser::bootstrapping::BootstrapConfig;
///
/// let config = BootstrapConfig::default();
/// assert_eq!(config.max_maturity, 50.0);
///
/// let config = BootstrapConfig::default()
///     .with_max_maturity(30.0)
///     .with_repricing_tolerance(1e-8);
/// assert_eq!(config.repricing_tolerance, 1e-8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BootstrapConfig {
    /// Maximum supported maturity in years.
    ///
    /// Instruments with maturity beyond this value are rejected.
    /// Default: 50.0
    pub max_maturity: f64,

    /// Largest repricing residual accepted silently.
    ///
    /// After each phase every instrument is repriced on the finished
    /// curve; residuals above this value are logged at `warn`. Pillars
    /// that are not multiples of the accrual period legitimately leave a
    /// small residual, so this never fails the build.
    /// Default: 1e-10
    pub repricing_tolerance: f64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            max_maturity: 50.0,
            repricing_tolerance: 1e-10,
        }
    }
}

impl BootstrapConfig {
    /// Set the maximum maturity.
    pub fn with_max_maturity(mut self, max_maturity: f64) -> Self {
        self.max_maturity = max_maturity;
        self
    }

    /// Set the repricing tolerance.
    pub fn with_repricing_tolerance(mut self, tolerance: f64) -> Self {
        self.repricing_tolerance = tolerance;
        self
    }
}

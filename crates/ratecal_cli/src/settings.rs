//! Layered CLI settings.
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. Settings file (`ratecal.toml` in the working directory, or `--config`)
//! 3. `RATECAL_` environment variables, with `__` separating nested keys
//!    (e.g. `RATECAL_ENGINE=sqp`, `RATECAL_SOLVER__TOLERANCE=1e-8`)

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use ratecal_core::market_data::curves::CurveModelKind;
use ratecal_core::math::solvers::{CalibrationEngine, SolverConfig};
use ratecal_core::types::ConfigurationError;
use ratecal_models::calibration::VolCalibrationConfig;
use ratecal_optimiser::bootstrapping::BootstrapConfig;
use ratecal_optimiser::calibration::CurveCalibrationConfig;
use ratecal_optimiser::CurveManager;
use serde::{Deserialize, Deserializer};

use crate::Result;

/// Default settings file, looked up without extension.
const DEFAULT_SETTINGS_FILE: &str = "ratecal";

/// Environment variable prefix.
const ENV_PREFIX: &str = "RATECAL";

/// Log levels accepted in settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigurationError::invalid_value(
                "log_level",
                format!("'{}' is not one of trace, debug, info, warn, error", s),
            )),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

/// CLI settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default calibration engine
    #[serde(deserialize_with = "deserialize_from_str")]
    pub engine: CalibrationEngine,
    /// Default curve model
    #[serde(deserialize_with = "deserialize_from_str")]
    pub curve_model: CurveModelKind,
    /// Log level when `--verbose` is not given
    #[serde(deserialize_with = "deserialize_from_str")]
    pub log_level: LogLevel,
    /// Solver tolerances shared by every calibration
    pub solver: SolverConfig,
    /// Bootstrap settings
    pub bootstrap: BootstrapConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: CalibrationEngine::default(),
            curve_model: CurveModelKind::default(),
            log_level: LogLevel::default(),
            solver: SolverConfig::default(),
            bootstrap: BootstrapConfig::default(),
        }
    }
}

fn deserialize_from_str<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let s = String::deserialize(deserializer)?;
    T::from_str(&s).map_err(serde::de::Error::custom)
}

impl Settings {
    /// Load settings from `path` (required) or the optional default file,
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_SETTINGS_FILE).required(false),
        };
        let builder = config::Config::builder().add_source(file).add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.solver.validate()?;
        Ok(settings)
    }

    /// Volatility calibration configuration, with an optional engine override.
    pub fn vol_config(&self, engine: Option<CalibrationEngine>) -> VolCalibrationConfig {
        VolCalibrationConfig::default()
            .with_engine(engine.unwrap_or(self.engine))
            .with_solver_config(self.solver)
    }

    /// Curve manager configured from these settings.
    pub fn curve_manager(&self) -> CurveManager {
        CurveManager::new(
            self.bootstrap,
            CurveCalibrationConfig::default().with_solver_config(self.solver),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(s: &str) -> Result<Settings> {
        Settings::from_builder(config::Config::builder().add_source(File::from_str(s, FileFormat::Toml)))
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.engine, CalibrationEngine::DefaultLeastSquares);
        assert_eq!(settings.curve_model, CurveModelKind::BootstrappedLogLinear);
        assert_eq!(settings.log_level, LogLevel::Info);
        assert_eq!(settings.solver, SolverConfig::default());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("warn").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("verbose").is_err());
        assert_eq!(LogLevel::Trace.to_string(), "trace");
    }

    #[test]
    fn test_toml_settings() {
        let settings = from_toml(
            r#"
            engine = "sqp"
            curve_model = "smooth_parametric"
            log_level = "debug"

            [solver]
            tolerance = 1e-8
            max_iterations = 250

            [bootstrap]
            max_maturity = 30.0
            "#,
        )
        .unwrap();
        assert_eq!(settings.engine, CalibrationEngine::Sqp);
        assert_eq!(settings.curve_model, CurveModelKind::SmoothParametric);
        assert_eq!(settings.log_level, LogLevel::Debug);
        assert_eq!(settings.solver.tolerance, 1e-8);
        assert_eq!(settings.solver.max_iterations, 250);
        assert_eq!(settings.solver.fd_step, 0.01);
        assert_eq!(settings.bootstrap.max_maturity, 30.0);
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings = from_toml("engine = \"gauss_newton\"").unwrap();
        assert_eq!(settings.engine, CalibrationEngine::GaussNewton);
        assert_eq!(settings.curve_model, CurveModelKind::BootstrappedLogLinear);
    }

    #[test]
    fn test_unknown_engine_rejected() {
        assert!(from_toml("engine = \"simplex\"").is_err());
    }

    #[test]
    fn test_invalid_solver_rejected() {
        let err = from_toml("[solver]\nmax_iterations = 0").unwrap_err();
        assert!(matches!(err, crate::CliError::Configuration(_)));
    }

    #[test]
    fn test_engine_override() {
        let settings = Settings::default();
        assert_eq!(
            settings.vol_config(Some(CalibrationEngine::Sqp)).engine,
            CalibrationEngine::Sqp
        );
        assert_eq!(settings.vol_config(None).engine, settings.engine);
    }
}

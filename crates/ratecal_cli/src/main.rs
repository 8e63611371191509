//! Ratecal CLI - curve construction and volatility calibration
//!
//! # Commands
//!
//! - `ratecal bootstrap --market <file>` - Build the OIS and 3M curves
//! - `ratecal calibrate-vol --market <file>` - Fit SABR smiles to caplet and volatility quotes
//! - `ratecal compare --market <file>` - Compare curve models and calibration engines
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate loads settings and market
//! files and drives the library crates; it holds no numerics of its own.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod error;
mod market;
mod settings;

pub use error::{CliError, Result};

use settings::Settings;

/// Multi-curve bootstrapping and SABR calibration
#[derive(Parser)]
#[command(name = "ratecal")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file path (defaults to ./ratecal.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the OIS discount curve and the 3M forward curve
    Bootstrap {
        /// Path to market file (TOML)
        #[arg(short, long)]
        market: PathBuf,

        /// Curve model (bootstrapped_log_linear, smooth_parametric)
        #[arg(long)]
        model: Option<String>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Calibrate SABR smiles to caplet and volatility quotes
    CalibrateVol {
        /// Path to market file (TOML)
        #[arg(short, long)]
        market: PathBuf,

        /// Calibration engine (default_least_squares, gauss_newton, levenberg_marquardt, sqp)
        #[arg(short, long)]
        engine: Option<String>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Compare curve models and calibration engines on one market
    Compare {
        /// Path to market file (TOML)
        #[arg(short, long)]
        market: PathBuf,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    let level = if cli.verbose {
        "debug"
    } else {
        settings.log_level.as_filter_str()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    debug!(?settings, "Settings loaded");

    match cli.command {
        Commands::Bootstrap {
            market,
            model,
            format,
        } => commands::bootstrap::run(&settings, &market, model.as_deref(), &format),
        Commands::CalibrateVol {
            market,
            engine,
            format,
        } => commands::calibrate_vol::run(&settings, &market, engine.as_deref(), &format),
        Commands::Compare { market, format } => {
            commands::compare::run(&settings, &market, &format)
        }
    }
}

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use config_engine::{ConfigEngine, ConfigSource, EngineConfig};

/// Practice management calculations
#[derive(Parser, Debug)]
#[command(name = "practice")]
#[command(about = "Copay collection, referral usage and payment statements")]
#[command(version)]
pub struct Cli {
    /// Configuration file path (YAML or TOML)
    #[arg(short, long, global = true, env = "PRACTICE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Amount to collect from a patient at a visit
    Collect {
        /// Patient JSON file
        #[arg(long)]
        patient: PathBuf,

        /// Benefits JSON file; omit to fall back to the default copay
        #[arg(long)]
        benefits: Option<PathBuf>,

        /// Evaluate as of this date (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },

    /// Visit usage and default referral per patient
    Referrals {
        /// Referrals JSON array
        #[arg(long)]
        referrals: PathBuf,

        /// Visits JSON array
        #[arg(long)]
        visits: PathBuf,

        /// Evaluate as of this date (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },

    /// Year-end payment statement per patient
    Statement {
        /// Payments JSON array
        #[arg(long)]
        payments: PathBuf,

        /// Calendar year to summarize
        #[arg(long)]
        year: i32,
    },
}

impl Cli {
    /// Configuration for this invocation
    ///
    /// An explicit `--config` file must exist, otherwise `practice.yaml` is
    /// optional. Environment variables override either. `-v` forces debug
    /// logging, even over `RUST_LOG`.
    ///
    /// # Errors
    ///
    /// Fails when the explicit file is missing or a value does not parse.
    pub fn load_config(&self) -> config_engine::Result<EngineConfig> {
        let engine = match &self.config {
            Some(path) => ConfigEngine::new()
                .add_source(ConfigSource::required_file(path))
                .add_source(ConfigSource::env()),
            None => ConfigEngine::with_defaults(),
        };
        let mut config = engine.load()?;
        if self.verbose {
            config.logging.level = "debug".to_string();
            config.logging.respect_rust_log = false;
        }
        Ok(config)
    }
}

/// Evaluation date: the command's `--as-of`, then `practice.as_of`, then `today`
pub fn resolve_as_of(flag: Option<NaiveDate>, config: &EngineConfig, today: NaiveDate) -> NaiveDate {
    flag.or(config.practice.as_of).unwrap_or(today)
}

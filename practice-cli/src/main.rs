use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use error_common::{log_error, Result};
use serde::Serialize;
use tracing::debug;

use practice_cli::input::read_json;
use practice_cli::report::{exit_status, render_error};
use practice_cli::{commands, resolve_as_of, Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log_error("practice", &err);
            eprintln!("{}", render_error(&err));
            ExitCode::from(exit_status(&err))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;
    logger_redacted::init(&config.logging)?;
    debug!(command = ?cli.command, "Starting");

    let today = Utc::now().date_naive();

    match cli.command {
        Command::Collect {
            patient,
            benefits,
            as_of,
        } => {
            let patient = read_json(&patient)?;
            let benefits = benefits.as_deref().map(read_json).transpose()?;
            let report = commands::collect(
                patient,
                benefits,
                resolve_as_of(as_of, &config, today),
                config.practice.name.clone(),
            )
            .await?;
            print_json(&report)
        }
        Command::Referrals {
            referrals,
            visits,
            as_of,
        } => {
            let referrals: Vec<_> = read_json(&referrals)?;
            let visits: Vec<_> = read_json(&visits)?;
            let report = commands::referrals(
                &referrals,
                &visits,
                resolve_as_of(as_of, &config, today),
                config.referrals.expiring_soon_days,
            );
            print_json(&report)
        }
        Command::Statement { payments, year } => {
            let payments: Vec<_> = read_json(&payments)?;
            print_json(&commands::statement(&payments, year))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

mod cli;
mod commands;
mod envelope;
mod error;
mod metadata;
mod output;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::{ticker_exit_code, CliError};

const DEFAULT_LOG_FILTER: &str = "tickerdeck=warn,tickerdeck_core=warn";

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

/// Logs go to stderr so stdout stays machine readable.
fn init_tracing() {
    let (filter, env_err) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new(DEFAULT_LOG_FILTER), Some(e)),
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .init();
    if let Some(e) = env_err {
        if std::env::var_os("RUST_LOG").is_some() {
            tracing::warn!(error = %e, "invalid RUST_LOG filter, using default");
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    if let Command::Explore(args) = &cli.command {
        commands::explore::run(&cli, args).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let executed = commands::run(&cli).await?;
    output::render(&executed.envelope, cli.format, cli.pretty)?;

    if let Some(failure) = &executed.failure {
        return Ok(ExitCode::from(ticker_exit_code(failure)));
    }

    Ok(ExitCode::SUCCESS)
}

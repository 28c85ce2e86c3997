//! Catalog Sync command line entry point.

use std::env;
use std::process::ExitCode;

use catalog_sync::cli::{self, Cli};
use catalog_sync::pipeline::StderrProgress;
use catalog_sync::{Dependencies, SyncConfig, SyncError};
use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
///
/// Logs go to stderr so that command output on stdout stays clean.
fn init_tracing() -> Result<(), SyncError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("catalog_sync=info,catalog_sync_repository=info"));

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let result = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| SyncError::config(format!("Failed to initialize tracing: {}", e)))
}

async fn run(cli: Cli) -> Result<String, SyncError> {
    let config = SyncConfig::from_env()?;
    let deps = Dependencies::new(&config).await?;
    let engine = deps.into_engine(config)?;

    info!(index = engine.index_name(), command = ?cli.command, "Running command");
    cli::execute(&cli.command, &engine, &StderrProgress).await
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = init_tracing() {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

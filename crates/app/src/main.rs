//! Hireloop command line client.

mod cli;
mod context;
mod error;

use std::process::ExitCode;

use clap::Parser;
use hireloop_infrastructure::ClientConfig;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::context::Context;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            if let Some(body) = err.backend_body() {
                eprintln!("{body}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ClientConfig::load(cli.config.as_deref())?;
    tracing::debug!("Starting hireloop v{}", env!("CARGO_PKG_VERSION"));

    let context = Context::build(config).await?;
    let result = context.run(cli.command).await;
    if let Some(reason) = context.forced_logout() {
        eprintln!("You have been logged out ({reason}). Run `hireloop login` to continue.");
    }
    result
}

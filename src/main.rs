//! # jirabot Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use jirabot::BotConfig;
use jirabot::cli::{Cli, Commands};
use tokio::runtime::Runtime;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
  let cmd = Cli::parse();

  // Set up tracing based on verbosity level
  let level = match cmd.verbose {
    0 => tracing::Level::WARN,  // Default: warnings and errors
    1 => tracing::Level::INFO,  // -v: info, warnings, and errors
    2 => tracing::Level::DEBUG, // -vv: debug, info, warnings, and errors
    _ => tracing::Level::TRACE, // -vvv or more: trace and everything else
  };

  tracing_subscriber::registry()
    .with(fmt::layer())
    .with(EnvFilter::from_default_env().add_directive(level.into()))
    .init();

  debug!("Tracing initialized with level: {}", level);

  match dotenv::dotenv() {
    Ok(path) => debug!("Loaded environment from {}", path.display()),
    Err(e) if e.not_found() => debug!("No .env file found"),
    Err(e) => return Err(e).context("Failed to load .env file"),
  }

  let config = BotConfig::from_env().context("Invalid configuration")?;
  debug!(?config, "Configuration loaded");

  let rt = Runtime::new().context("Failed to create async runtime")?;
  match cmd.resolved_command() {
    Commands::Run => rt.block_on(jirabot::app::run(config)),
    Commands::Check => rt.block_on(jirabot::app::check(config)),
  }
}

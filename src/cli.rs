//! # Command Line Interface

use clap::{ArgAction, Parser, Subcommand};

/// Top-level CLI command for the bot
#[derive(Debug, Parser)]
#[command(name = "jirabot")]
#[command(about = "A Slack bot that answers questions about Jira projects")]
#[command(
  long_about = "Jirabot listens to Slack over Socket Mode, looks up the Jira issues a question\n\
        refers to, and replies with a summary written by an OpenAI-compatible model.\n\n\
        Configuration is read from the environment (and a .env file when present)."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  #[command(subcommand)]
  pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
  /// Connect to Slack and answer messages until interrupted (default)
  Run,

  /// Verify Jira and Slack credentials, then exit
  #[command(long_about = "Verify Jira and Slack credentials, then exit.\n\n\
            Calls Jira's /myself endpoint and Slack's auth.test. Exits with a\n\
            non-zero status if either check fails.")]
  Check,
}

impl Cli {
  /// The requested subcommand, defaulting to `run`.
  pub fn resolved_command(&self) -> Commands {
    self.command.unwrap_or(Commands::Run)
  }
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn test_cli_is_well_formed() {
    <Cli as CommandFactory>::command().debug_assert();
  }

  #[test]
  fn test_default_command_is_run() {
    let cli = Cli::parse_from(["jirabot"]);
    assert_eq!(cli.resolved_command(), Commands::Run);
    assert_eq!(cli.verbose, 0);
  }

  #[test]
  fn test_check_with_verbosity() {
    let cli = Cli::parse_from(["jirabot", "check", "-vv"]);
    assert_eq!(cli.resolved_command(), Commands::Check);
    assert_eq!(cli.verbose, 2);
  }
}

//! # Application Wiring
//!
//! Builds the shared clients from configuration and runs the bot or the
//! credential check.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use jirabot_jira::{JiraClient, TrackerGateway, create_jira_client};
use jirabot_llm::OpenAiClient;
use jirabot_slack::{SlackClient, SocketModeRunner};
use tracing::{info, warn};

use crate::config::BotConfig;
use crate::generator::ResponseGenerator;
use crate::output::{print_error, print_success};
use crate::router::Router;

/// Long-lived clients shared by every message task.
pub struct Services {
  pub jira: Arc<JiraClient>,
  pub slack: Arc<SlackClient>,
  pub completion: Arc<OpenAiClient>,
}

impl Services {
  pub fn from_config(config: &BotConfig) -> Result<Self> {
    let mut jira = create_jira_client(&config.jira.host, &config.jira.email, &config.jira.api_token)
      .context("Failed to create Jira client")?;
    if let Some(field) = &config.jira.story_points_field {
      jira = jira.with_story_points_field(field);
    }

    let slack = SlackClient::new(config.slack.clone()).context("Failed to create Slack client")?;
    let completion = OpenAiClient::new(&config.openai.base_url, &config.openai.api_key)
      .context("Failed to create completion client")?;

    Ok(Self {
      jira: Arc::new(jira),
      slack: Arc::new(slack),
      completion: Arc::new(completion),
    })
  }
}

/// Connect to Slack and handle events until Ctrl-C.
pub async fn run(config: BotConfig) -> Result<()> {
  let services = Services::from_config(&config)?;

  let identity = services
    .slack
    .auth_test()
    .await
    .context("Slack authentication failed")?;

  if !services.jira.test_connection().await {
    warn!("Jira connection check failed; questions will fail until it is fixed");
  }

  let generator = ResponseGenerator::new(services.completion.clone(), config.openai.generator.clone());
  let router = Router::new(
    services.jira.clone(),
    generator,
    services.slack.clone(),
    identity.user_id.clone(),
  );

  let runner = Arc::new(SocketModeRunner::new(services.slack.clone(), Arc::new(router)));
  let signal_runner = Arc::clone(&runner);
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      signal_runner.shutdown();
    }
  });

  info!(bot_user = %identity.user_id, "⚡️ jirabot is running");
  runner.run().await.context("Socket Mode loop failed")
}

/// Verify Jira and Slack credentials.
pub async fn check(config: BotConfig) -> Result<()> {
  let services = Services::from_config(&config)?;
  let mut failures = 0;

  if services.jira.test_connection().await {
    print_success(&format!("Connected to Jira at {}", services.jira.base_url()));
  } else {
    print_error(&format!("Failed to connect to Jira at {}", services.jira.base_url()));
    failures += 1;
  }

  match services.slack.auth_test().await {
    Ok(identity) => print_success(&format!(
      "Authenticated to Slack as {} ({})",
      identity.user.as_deref().unwrap_or("bot"),
      identity.user_id
    )),
    Err(e) => {
      print_error(&format!("Slack authentication failed: {e}"));
      failures += 1;
    }
  }

  if failures > 0 {
    bail!("{failures} connectivity check(s) failed");
  }
  Ok(())
}

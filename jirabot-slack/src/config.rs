//! Configuration for Slack integration.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use crate::error::{SlackError, SlackResult};

/// Tokens for a Socket Mode Slack app.
#[derive(Clone)]
pub struct SlackConfig {
  /// Bot OAuth token (xoxb-...).
  bot_token: SecretString,
  /// App-level token for Socket Mode (xapp-...).
  app_token: SecretString,
  /// Signing secret; unused by Socket Mode but required by the app manifest.
  signing_secret: SecretString,
}

impl fmt::Debug for SlackConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SlackConfig")
      .field("bot_token", &"[REDACTED]")
      .field("app_token", &"[REDACTED]")
      .field("signing_secret", &"[REDACTED]")
      .finish()
  }
}

impl SlackConfig {
  pub fn new(bot_token: impl Into<String>, app_token: impl Into<String>, signing_secret: impl Into<String>) -> Self {
    Self {
      bot_token: SecretString::new(bot_token.into().into()),
      app_token: SecretString::new(app_token.into().into()),
      signing_secret: SecretString::new(signing_secret.into().into()),
    }
  }

  pub fn bot_token(&self) -> &str {
    self.bot_token.expose_secret()
  }

  pub fn app_token(&self) -> &str {
    self.app_token.expose_secret()
  }

  pub fn signing_secret(&self) -> &str {
    self.signing_secret.expose_secret()
  }

  /// Reject empty tokens and warn about unexpected token prefixes.
  pub fn validate(&self) -> SlackResult<()> {
    if self.bot_token().is_empty() {
      return Err(SlackError::Config("Bot token is empty".to_string()));
    }
    if self.app_token().is_empty() {
      return Err(SlackError::Config("App token is empty".to_string()));
    }

    if !self.bot_token().starts_with("xoxb-") {
      warn!("Bot token doesn't start with 'xoxb-', this may be incorrect");
    }
    if !self.app_token().starts_with("xapp-") {
      warn!("App token doesn't start with 'xapp-', this may be incorrect");
    }

    Ok(())
  }
}

//! # Configuration
//!
//! Process configuration read once from the environment at startup.

use std::fmt;

use jirabot_core::consts::{
  ENV_JIRA_API_TOKEN, ENV_JIRA_EMAIL, ENV_JIRA_HOST, ENV_JIRA_STORY_POINTS_FIELD, ENV_OPENAI_API_KEY,
  ENV_OPENAI_BASE_URL, ENV_OPENAI_MAX_TOKENS, ENV_OPENAI_MODEL, ENV_SLACK_APP_TOKEN, ENV_SLACK_BOT_TOKEN,
  ENV_SLACK_SIGNING_SECRET,
};
use jirabot_core::{ConfigError, EnvReader, ensure_url_scheme};
use jirabot_llm::{DEFAULT_MODEL, DEFAULT_OPENAI_BASE_URL};
use jirabot_slack::SlackConfig;

use crate::generator::{DEFAULT_MAX_TOKENS, GeneratorSettings};

#[derive(Clone)]
pub struct JiraSettings {
  /// Normalized base URL (scheme included, no trailing slash).
  pub host: String,
  pub email: String,
  pub api_token: String,
  pub story_points_field: Option<String>,
}

impl fmt::Debug for JiraSettings {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("JiraSettings")
      .field("host", &self.host)
      .field("email", &self.email)
      .field("api_token", &"[REDACTED]")
      .field("story_points_field", &self.story_points_field)
      .finish()
  }
}

#[derive(Clone)]
pub struct OpenAiSettings {
  pub api_key: String,
  pub base_url: String,
  pub generator: GeneratorSettings,
}

impl fmt::Debug for OpenAiSettings {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("OpenAiSettings")
      .field("api_key", &"[REDACTED]")
      .field("base_url", &self.base_url)
      .field("generator", &self.generator)
      .finish()
  }
}

/// Everything the bot needs to start.
#[derive(Debug, Clone)]
pub struct BotConfig {
  pub slack: SlackConfig,
  pub jira: JiraSettings,
  pub openai: OpenAiSettings,
}

impl BotConfig {
  /// Read configuration from the process environment.
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_reader(EnvReader::process())
  }

  /// Read configuration through `lookup` instead of the process environment.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    Self::from_reader(EnvReader::from_fn(lookup))
  }

  fn from_reader(mut env: EnvReader<'_>) -> Result<Self, ConfigError> {
    let bot_token = env.required(ENV_SLACK_BOT_TOKEN);
    let app_token = env.required(ENV_SLACK_APP_TOKEN);
    let signing_secret = env.required(ENV_SLACK_SIGNING_SECRET);
    let jira_host = env.required(ENV_JIRA_HOST);
    let email = env.required(ENV_JIRA_EMAIL);
    let jira_token = env.required(ENV_JIRA_API_TOKEN);
    let openai_key = env.required(ENV_OPENAI_API_KEY);

    let story_points_field = env.optional(ENV_JIRA_STORY_POINTS_FIELD);
    let base_url = env
      .optional(ENV_OPENAI_BASE_URL)
      .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());
    let model = env
      .optional(ENV_OPENAI_MODEL)
      .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let max_tokens = env.parsed_or(ENV_OPENAI_MAX_TOKENS, DEFAULT_MAX_TOKENS)?;

    env.finish()?;

    Ok(Self {
      slack: SlackConfig::new(bot_token, app_token, signing_secret),
      jira: JiraSettings {
        host: ensure_url_scheme(&jira_host)?,
        email,
        api_token: jira_token,
        story_points_field,
      },
      openai: OpenAiSettings {
        api_key: openai_key,
        base_url: ensure_url_scheme(&base_url)?,
        generator: GeneratorSettings { model, max_tokens },
      },
    })
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;

  fn full_env() -> HashMap<&'static str, &'static str> {
    HashMap::from([
      (ENV_SLACK_BOT_TOKEN, "xoxb-1"),
      (ENV_SLACK_APP_TOKEN, "xapp-1"),
      (ENV_SLACK_SIGNING_SECRET, "signing"),
      (ENV_JIRA_HOST, "acme.atlassian.net/"),
      (ENV_JIRA_EMAIL, "bot@acme.com"),
      (ENV_JIRA_API_TOKEN, "jira-token"),
      (ENV_OPENAI_API_KEY, "sk-1"),
    ])
  }

  fn config_from(env: &HashMap<&'static str, &'static str>) -> Result<BotConfig, ConfigError> {
    BotConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()))
  }

  #[test]
  fn test_defaults() -> anyhow::Result<()> {
    let config = config_from(&full_env())?;

    assert_eq!(config.jira.host, "https://acme.atlassian.net");
    assert_eq!(config.jira.story_points_field, None);
    assert_eq!(config.openai.base_url, DEFAULT_OPENAI_BASE_URL);
    assert_eq!(config.openai.generator, GeneratorSettings::default());
    assert_eq!(config.slack.bot_token(), "xoxb-1");
    Ok(())
  }

  #[test]
  fn test_overrides() -> anyhow::Result<()> {
    let mut env = full_env();
    env.insert(ENV_JIRA_STORY_POINTS_FIELD, "customfield_10016");
    env.insert(ENV_OPENAI_BASE_URL, "http://localhost:11434/v1");
    env.insert(ENV_OPENAI_MODEL, "llama3");
    env.insert(ENV_OPENAI_MAX_TOKENS, "800");

    let config = config_from(&env)?;

    assert_eq!(config.jira.story_points_field.as_deref(), Some("customfield_10016"));
    assert_eq!(config.openai.base_url, "http://localhost:11434/v1");
    assert_eq!(config.openai.generator.model, "llama3");
    assert_eq!(config.openai.generator.max_tokens, 800);
    Ok(())
  }

  #[test]
  fn test_reports_every_missing_variable() {
    let mut env = full_env();
    env.remove(ENV_SLACK_APP_TOKEN);
    env.remove(ENV_OPENAI_API_KEY);

    assert_eq!(
      config_from(&env).unwrap_err(),
      ConfigError::Missing(vec![ENV_SLACK_APP_TOKEN.to_string(), ENV_OPENAI_API_KEY.to_string()])
    );
  }

  #[test]
  fn test_invalid_max_tokens() {
    let mut env = full_env();
    env.insert(ENV_OPENAI_MAX_TOKENS, "lots");

    assert!(matches!(
      config_from(&env),
      Err(ConfigError::Invalid { ref key, .. }) if key == ENV_OPENAI_MAX_TOKENS
    ));
  }

  #[test]
  fn test_debug_redacts_secrets() -> anyhow::Result<()> {
    let config = config_from(&full_env())?;
    let debug = format!("{config:?}");
    assert!(!debug.contains("jira-token"));
    assert!(!debug.contains("sk-1"));
    assert!(!debug.contains("xoxb-1"));
    Ok(())
  }
}

//! Slack Web API client.

use std::time::Duration;

use async_trait::async_trait;
use jirabot_core::consts::USER_AGENT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::ChatPoster;
use crate::config::SlackConfig;
use crate::error::{SlackError, SlackResult, from_api_code};
use crate::messages::OutgoingMessage;

/// Default Web API root.
pub const SLACK_API_BASE: &str = "https://slack.com/api";

/// Identity returned by `auth.test`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthIdentity {
  pub user_id: String,
  #[serde(default)]
  pub user: Option<String>,
  #[serde(default)]
  pub bot_id: Option<String>,
  #[serde(default)]
  pub team: Option<String>,
  #[serde(default)]
  pub team_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
  ts: String,
}

#[derive(Debug, Deserialize)]
struct ConnectionsOpenResponse {
  url: String,
}

/// Which token authorizes a call.
#[derive(Debug, Clone, Copy)]
enum TokenKind {
  Bot,
  App,
}

/// Client for the Slack Web API methods the bot uses.
#[derive(Debug, Clone)]
pub struct SlackClient {
  http: reqwest::Client,
  api_base: String,
  config: SlackConfig,
}

impl SlackClient {
  /// Create a client after validating the configured tokens.
  pub fn new(config: SlackConfig) -> SlackResult<Self> {
    config.validate()?;

    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .user_agent(USER_AGENT)
      .build()
      .map_err(|e| SlackError::Config(format!("Failed to create HTTP client: {e}")))?;

    Ok(Self {
      http,
      api_base: SLACK_API_BASE.to_string(),
      config,
    })
  }

  /// Point the client at a different API root.
  pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
    self.api_base = api_base.into().trim_end_matches('/').to_string();
    self
  }

  /// Call `auth.test` and return the bot's identity.
  pub async fn auth_test(&self) -> SlackResult<AuthIdentity> {
    debug!("Testing Slack authentication...");
    let identity: AuthIdentity = self.api_call("auth.test", TokenKind::Bot, &json!({})).await?;
    info!("Authenticated as bot user: {}", identity.user_id);
    Ok(identity)
  }

  /// Post a message and return its timestamp.
  pub async fn post_message(&self, message: &OutgoingMessage) -> SlackResult<String> {
    let payload = serde_json::to_value(message)?;
    let response: PostMessageResponse = self.api_call("chat.postMessage", TokenKind::Bot, &payload).await?;
    debug!(channel = %message.channel, ts = %response.ts, "Posted message");
    Ok(response.ts)
  }

  /// Request a fresh Socket Mode WebSocket URL.
  pub async fn open_socket_url(&self) -> SlackResult<String> {
    let response: ConnectionsOpenResponse = self
      .api_call("apps.connections.open", TokenKind::App, &json!({}))
      .await?;
    Ok(response.url)
  }

  /// Make an API call to Slack.
  async fn api_call<T: DeserializeOwned>(&self, method: &str, token: TokenKind, payload: &Value) -> SlackResult<T> {
    let url = format!("{}/{}", self.api_base, method);
    let token = match token {
      TokenKind::Bot => self.config.bot_token(),
      TokenKind::App => self.config.app_token(),
    };

    debug!("POST {url}");
    let response = self
      .http
      .post(&url)
      .bearer_auth(token)
      .header("Content-Type", "application/json; charset=utf-8")
      .json(payload)
      .send()
      .await?;

    if response.status() == 429 {
      let retry_after = response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(30);
      return Err(SlackError::RateLimited {
        retry_after_secs: retry_after,
      });
    }

    if !response.status().is_success() {
      let status = response.status();
      let body = response.text().await.unwrap_or_default();
      return Err(SlackError::Api(format!("{method} returned {status}: {body}")));
    }

    let body: Value = response.json().await?;
    if body.get("ok").and_then(Value::as_bool) != Some(true) {
      let code = body.get("error").and_then(Value::as_str).unwrap_or("unknown");
      return Err(from_api_code(method, code));
    }

    Ok(serde_json::from_value(body)?)
  }
}

#[async_trait]
impl ChatPoster for SlackClient {
  async fn post(&self, message: &OutgoingMessage) -> SlackResult<String> {
    self.post_message(message).await
  }
}

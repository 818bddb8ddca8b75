//! Error types for Slack integration.

use thiserror::Error;

/// Errors that can occur during Slack operations.
#[derive(Error, Debug)]
pub enum SlackError {
  /// Configuration error (missing or invalid config).
  #[error("Configuration error: {0}")]
  Config(String),

  /// Authentication error (invalid token, revoked app, etc.).
  #[error("Authentication error: {0}")]
  Auth(String),

  /// API request returned `ok: false`.
  #[error("Slack API error: {0}")]
  Api(String),

  /// Channel not found or bot not in channel.
  #[error("Channel error: {0}")]
  Channel(String),

  #[error("Rate limited: retry after {retry_after_secs} seconds")]
  RateLimited { retry_after_secs: u64 },

  /// Network/HTTP error.
  #[error("Network error: {0}")]
  Network(String),

  /// WebSocket connection error.
  #[error("WebSocket error: {0}")]
  WebSocket(String),

  /// JSON serialization/deserialization error.
  #[error("JSON error: {0}")]
  Json(String),

  /// Invalid payload received from Slack.
  #[error("Invalid payload: {0}")]
  InvalidPayload(String),
}

impl From<reqwest::Error> for SlackError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_connect() {
      SlackError::Network(format!("Connection failed: {err}"))
    } else {
      SlackError::Network(err.to_string())
    }
  }
}

impl From<serde_json::Error> for SlackError {
  fn from(err: serde_json::Error) -> Self {
    SlackError::Json(err.to_string())
  }
}

impl From<tokio_tungstenite::tungstenite::Error> for SlackError {
  fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
    SlackError::WebSocket(err.to_string())
  }
}

/// Result type for Slack operations.
pub type SlackResult<T> = std::result::Result<T, SlackError>;

/// Map a Web API `error` code to a [`SlackError`].
pub fn from_api_code(method: &str, code: &str) -> SlackError {
  match code {
    "invalid_auth" | "not_authed" | "account_inactive" | "token_revoked" => {
      SlackError::Auth(format!("{method} failed: {code}"))
    }
    "channel_not_found" | "not_in_channel" | "is_archived" => SlackError::Channel(format!("{method} failed: {code}")),
    "ratelimited" | "rate_limited" => SlackError::RateLimited { retry_after_secs: 30 },
    _ => SlackError::Api(format!("{method} failed: {code}")),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_display() {
    let err = SlackError::Config("missing token".to_string());
    assert_eq!(err.to_string(), "Configuration error: missing token");

    let err = SlackError::RateLimited { retry_after_secs: 60 };
    assert_eq!(err.to_string(), "Rate limited: retry after 60 seconds");
  }

  #[test]
  fn test_api_code_mapping() {
    assert!(matches!(from_api_code("auth.test", "invalid_auth"), SlackError::Auth(_)));
    assert!(matches!(
      from_api_code("chat.postMessage", "not_in_channel"),
      SlackError::Channel(_)
    ));
    assert!(matches!(
      from_api_code("chat.postMessage", "ratelimited"),
      SlackError::RateLimited { .. }
    ));

    let err = from_api_code("chat.postMessage", "msg_too_long");
    assert_eq!(err.to_string(), "Slack API error: chat.postMessage failed: msg_too_long");
  }
}

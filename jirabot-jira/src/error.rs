//! Tracker error type and response checking shared by all endpoints.

use std::collections::BTreeMap;

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

/// A failed call to the Jira API.
#[derive(Debug, Error)]
pub enum TrackerError {
  #[error("Authentication failed (HTTP {status}). Please check your Jira credentials: {message}")]
  Auth { status: u16, message: String },

  #[error("{message}")]
  NotFound { message: String },

  #[error("Jira returned HTTP {status}: {message}")]
  Api { status: u16, message: String },

  #[error("Failed to reach Jira: {0}")]
  Transport(#[source] reqwest::Error),

  #[error("Failed to parse Jira response: {0}")]
  Decode(#[source] reqwest::Error),
}

impl TrackerError {
  /// HTTP status returned by Jira, if the request got that far.
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::Auth { status, .. } | Self::Api { status, .. } => Some(*status),
      Self::NotFound { .. } => Some(StatusCode::NOT_FOUND.as_u16()),
      Self::Transport(e) | Self::Decode(e) => e.status().map(|s| s.as_u16()),
    }
  }

  /// Human-readable message without the status prefix.
  pub fn message(&self) -> String {
    match self {
      Self::Auth { message, .. } | Self::Api { message, .. } | Self::NotFound { message } => message.clone(),
      Self::Transport(e) | Self::Decode(e) => e.to_string(),
    }
  }
}

/// Jira's standard error body.
#[derive(Debug, Default, Deserialize)]
struct JiraErrorBody {
  #[serde(default, rename = "errorMessages")]
  error_messages: Vec<String>,
  #[serde(default)]
  errors: BTreeMap<String, String>,
}

fn error_message(status: StatusCode, body: &str) -> String {
  if let Ok(parsed) = serde_json::from_str::<JiraErrorBody>(body) {
    let mut parts = parsed.error_messages;
    parts.extend(parsed.errors.into_iter().map(|(field, msg)| format!("{field}: {msg}")));
    if !parts.is_empty() {
      return parts.join("; ");
    }
  }

  let trimmed = body.trim();
  if trimmed.is_empty() {
    status.canonical_reason().unwrap_or("no response body").to_string()
  } else {
    trimmed.to_string()
  }
}

/// Pass successful responses through and map everything else to a
/// [`TrackerError`]. `resource` names what was requested for 404 messages.
pub(crate) async fn check_response(response: Response, resource: &str) -> Result<Response, TrackerError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }

  let body = response.text().await.unwrap_or_default();
  let message = error_message(status, &body);

  Err(match status {
    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TrackerError::Auth {
      status: status.as_u16(),
      message,
    },
    StatusCode::NOT_FOUND => TrackerError::NotFound {
      message: format!("{resource} not found: {message}"),
    },
    _ => TrackerError::Api {
      status: status.as_u16(),
      message,
    },
  })
}

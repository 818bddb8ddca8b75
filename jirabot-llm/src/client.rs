//! OpenAI-compatible HTTP client

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use jirabot_core::consts::USER_AGENT;
use tracing::{debug, error};

use crate::models::{ApiErrorBody, ChatRequest, ChatResponse};
use crate::{CompletionApi, CompletionError, Result};

/// Completions can take a while on long prompts.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for an OpenAI-compatible chat completion endpoint
#[derive(Clone)]
pub struct OpenAiClient {
  client: reqwest::Client,
  base_url: String,
  api_key: String,
}

impl fmt::Debug for OpenAiClient {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("OpenAiClient")
      .field("base_url", &self.base_url)
      .field("api_key", &"[REDACTED]")
      .finish()
  }
}

impl OpenAiClient {
  /// Create a client for the API rooted at `base_url` (e.g. `https://api.openai.com/v1`)
  pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
    let client = reqwest::Client::builder()
      .connect_timeout(Duration::from_secs(10))
      .timeout(REQUEST_TIMEOUT)
      .user_agent(USER_AGENT)
      .build()
      .map_err(CompletionError::Transport)?;

    Ok(Self {
      client,
      base_url: base_url.into().trim_end_matches('/').to_string(),
      api_key: api_key.into(),
    })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Send a chat completion request
  pub async fn create_chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse> {
    let url = format!("{}/chat/completions", self.base_url);
    debug!(model = %request.model, messages = request.messages.len(), "Requesting chat completion");

    let response = self
      .client
      .post(&url)
      .bearer_auth(&self.api_key)
      .json(request)
      .send()
      .await
      .map_err(CompletionError::Transport)?;

    let status = response.status();
    if status.is_success() {
      return response.json::<ChatResponse>().await.map_err(CompletionError::Decode);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
      .map(|parsed| parsed.error.message)
      .unwrap_or(body);
    error!(status = status.as_u16(), "Chat completion failed: {message}");

    Err(CompletionError::Api {
      status: status.as_u16(),
      message,
    })
  }
}

#[async_trait]
impl CompletionApi for OpenAiClient {
  async fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse> {
    self.create_chat_completion(request).await
  }
}

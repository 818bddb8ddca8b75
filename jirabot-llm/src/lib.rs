//! Chat completion client for jirabot
//!
//! Talks to any server implementing the OpenAI `/chat/completions` API. The
//! [`CompletionApi`] trait is the seam the response generator depends on.

mod client;
mod models;

use async_trait::async_trait;
pub use client::OpenAiClient;
pub use models::{ChatChoice, ChatMessage, ChatRequest, ChatResponse, ChoiceMessage};

/// Default API root when `OPENAI_BASE_URL` is unset.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model when `OPENAI_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";

/// Error types for completion calls
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
  #[error("Completion API returned HTTP {status}: {message}")]
  Api { status: u16, message: String },

  #[error("Request failed: {0}")]
  Transport(#[source] reqwest::Error),

  #[error("Failed to parse completion response: {0}")]
  Decode(#[source] reqwest::Error),
}

impl CompletionError {
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::Api { status, .. } => Some(*status),
      Self::Transport(e) | Self::Decode(e) => e.status().map(|s| s.as_u16()),
    }
  }
}

/// Result type for completion calls
pub type Result<T> = std::result::Result<T, CompletionError>;

/// A remote service that turns a prompt into completions.
#[async_trait]
pub trait CompletionApi: Send + Sync {
  async fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse>;
}

//! Request and response types for the chat completion API

use serde::{Deserialize, Serialize};

/// Chat message for completions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
  /// Role of the message author (system, user, assistant)
  pub role: String,
  pub content: String,
}

impl ChatMessage {
  pub fn system(content: impl Into<String>) -> Self {
    Self {
      role: "system".to_string(),
      content: content.into(),
    }
  }

  pub fn user(content: impl Into<String>) -> Self {
    Self {
      role: "user".to_string(),
      content: content.into(),
    }
  }
}

/// Chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
  pub model: String,
  pub messages: Vec<ChatMessage>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_tokens: Option<u32>,
  /// Sampling temperature (0.0 to 2.0)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub temperature: Option<f64>,
}

impl ChatRequest {
  pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
    Self {
      model: model.into(),
      messages,
      max_tokens: None,
      temperature: None,
    }
  }

  pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
    self.max_tokens = Some(max_tokens);
    self
  }

  pub fn with_temperature(mut self, temperature: f64) -> Self {
    self.temperature = Some(temperature);
    self
  }
}

/// Chat completion response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default)]
  pub model: Option<String>,
  #[serde(default)]
  pub choices: Vec<ChatChoice>,
}

impl ChatResponse {
  /// Text of the first choice, if the API returned any.
  pub fn first_content(&self) -> Option<&str> {
    self
      .choices
      .first()
      .and_then(|choice| choice.message.content.as_deref())
  }

  /// Build a response with a single assistant choice.
  pub fn from_text(text: impl Into<String>) -> Self {
    Self {
      id: None,
      model: None,
      choices: vec![ChatChoice {
        index: 0,
        message: ChoiceMessage {
          role: "assistant".to_string(),
          content: Some(text.into()),
        },
        finish_reason: Some("stop".to_string()),
      }],
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
  #[serde(default)]
  pub index: u32,
  pub message: ChoiceMessage,
  #[serde(default)]
  pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceMessage {
  #[serde(default)]
  pub role: String,
  /// Null when the model produced no text
  #[serde(default)]
  pub content: Option<String>,
}

/// OpenAI error envelope: `{"error": {"message": ..., "type": ...}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
  pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
  pub message: String,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_request_serialization() {
    let request = ChatRequest::new(
      "gpt-4-turbo-preview",
      vec![ChatMessage::system("be brief"), ChatMessage::user("hi")],
    )
    .with_max_tokens(500)
    .with_temperature(0.5);

    assert_eq!(
      serde_json::to_value(&request).unwrap(),
      json!({
          "model": "gpt-4-turbo-preview",
          "messages": [
              { "role": "system", "content": "be brief" },
              { "role": "user", "content": "hi" }
          ],
          "max_tokens": 500,
          "temperature": 0.5
      })
    );
  }

  #[test]
  fn test_first_content() {
    let response: ChatResponse = serde_json::from_value(json!({
        "id": "chatcmpl-1",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": "first" } },
            { "index": 1, "message": { "role": "assistant", "content": "second" } }
        ]
    }))
    .unwrap();
    assert_eq!(response.first_content(), Some("first"));

    let empty = ChatResponse::default();
    assert_eq!(empty.first_content(), None);

    let null_content: ChatResponse = serde_json::from_value(json!({
        "choices": [{ "message": { "role": "assistant", "content": null } }]
    }))
    .unwrap();
    assert_eq!(null_content.first_content(), None);
  }
}

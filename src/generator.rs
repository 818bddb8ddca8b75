//! # Response Generator
//!
//! Turns a question plus tracker data into a prose summary by prompting the
//! completion API with the filtered bundle.

use std::sync::Arc;

use jirabot_llm::{ChatMessage, ChatRequest, CompletionApi, CompletionError, DEFAULT_MODEL};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::bundle::QueryResultBundle;
use crate::filter::{FilteredBundle, filter};

/// Sampling temperature for every summary.
pub const TEMPERATURE: f64 = 0.7;

/// Default cap on completion length.
pub const DEFAULT_MAX_TOKENS: u32 = 500;

pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant that provides concise summaries of Jira projects and tickets. Analyze the data based on the type of information provided:

For recent updates:
- Number of issues updated
- Key themes or areas of activity
- Important status changes
- High priority items

For sprint information:
- Total number of issues in sprint
- Distribution of story points
- Progress (completed vs in progress)
- Key deliverables

For blocked issues:
- Number of blocked items
- Common blockers or themes
- Suggestions for resolution
- Impact on delivery

For high priority issues:
- Number of high priority items
- Upcoming deadlines
- Risk assessment
- Areas needing attention

For team workload:
- Team member task distribution
- Potential bottlenecks
- Balanced vs overloaded team members
- Recommendations for workload balancing

Format the response in a clear, bulleted structure. Avoid listing raw ticket data unless specifically asked. If you're not sure about something, say so.";

#[derive(Debug, Error)]
pub enum GenerationError {
  #[error("Completion request failed: {0}")]
  Completion(#[from] CompletionError),

  #[error("Completion API returned no text")]
  EmptyResponse,

  #[error("Failed to serialize Jira data: {0}")]
  Serialize(#[from] serde_json::Error),
}

/// Model settings for summaries.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
  pub model: String,
  pub max_tokens: u32,
}

impl Default for GeneratorSettings {
  fn default() -> Self {
    Self {
      model: DEFAULT_MODEL.to_string(),
      max_tokens: DEFAULT_MAX_TOKENS,
    }
  }
}

#[derive(Clone)]
pub struct ResponseGenerator {
  api: Arc<dyn CompletionApi>,
  settings: GeneratorSettings,
}

impl ResponseGenerator {
  pub fn new(api: Arc<dyn CompletionApi>, settings: GeneratorSettings) -> Self {
    Self { api, settings }
  }

  pub fn settings(&self) -> &GeneratorSettings {
    &self.settings
  }

  /// Summarize `bundle` as an answer to `question`.
  pub async fn generate(&self, question: &str, bundle: &QueryResultBundle) -> Result<String, GenerationError> {
    let filtered = filter(bundle);
    let messages = build_messages(question, &filtered)?;
    let request = ChatRequest::new(&self.settings.model, messages)
      .with_max_tokens(self.settings.max_tokens)
      .with_temperature(TEMPERATURE);

    debug!(model = %self.settings.model, "Generating summary");
    let response = self.api.chat_completion(&request).await.inspect_err(|e| {
      error!(status = ?e.status(), "Error generating AI response: {e}");
    })?;

    let text = response
      .first_content()
      .map(str::to_string)
      .ok_or(GenerationError::EmptyResponse)?;
    info!(chars = text.len(), "Generated summary");
    Ok(text)
  }
}

/// System instruction plus the user message carrying the data and question.
pub fn build_messages(question: &str, filtered: &FilteredBundle) -> Result<Vec<ChatMessage>, GenerationError> {
  let data = serde_json::to_string_pretty(filtered)?;
  Ok(vec![
    ChatMessage::system(SYSTEM_PROMPT),
    ChatMessage::user(format!("Here is the Jira data: {data}\n\nQuestion: {question}")),
  ])
}

#[cfg(test)]
mod tests {
  use jirabot_llm::ChatResponse;
  use jirabot_test_utils::ScriptedCompletion;
  use jirabot_test_utils::fixtures::search_results;

  use super::*;

  fn recent_only() -> QueryResultBundle {
    QueryResultBundle {
      recent_updates: Some(search_results("R2", 2)),
      ..Default::default()
    }
  }

  #[tokio::test]
  async fn test_generate_returns_first_choice_verbatim() -> anyhow::Result<()> {
    let api = Arc::new(ScriptedCompletion::replying("Summary: two issues moved this week."));
    let generator = ResponseGenerator::new(api.clone(), GeneratorSettings::default());

    let text = generator.generate("what changed?", &recent_only()).await?;

    assert_eq!(text, "Summary: two issues moved this week.");
    assert_eq!(api.call_count(), 1);
    Ok(())
  }

  #[tokio::test]
  async fn test_request_shape() -> anyhow::Result<()> {
    let api = Arc::new(ScriptedCompletion::default());
    let settings = GeneratorSettings {
      model: "gpt-4o-mini".to_string(),
      max_tokens: 256,
    };
    let generator = ResponseGenerator::new(api.clone(), settings);

    generator.generate("what changed?", &recent_only()).await?;

    let request = &api.requests()[0];
    assert_eq!(request.model, "gpt-4o-mini");
    assert_eq!(request.max_tokens, Some(256));
    assert_eq!(request.temperature, Some(TEMPERATURE));
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, "system");
    assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
    assert_eq!(request.messages[1].role, "user");

    let user = &request.messages[1].content;
    assert!(user.starts_with("Here is the Jira data: {\n  \"recentUpdates\": {"));
    assert!(user.ends_with("\n\nQuestion: what changed?"));
    Ok(())
  }

  #[tokio::test]
  async fn test_completion_error_is_wrapped() {
    let api = Arc::new(ScriptedCompletion::default().then_fail(429, "Rate limit reached"));
    let generator = ResponseGenerator::new(api, GeneratorSettings::default());

    let err = generator.generate("q", &recent_only()).await.unwrap_err();
    assert!(matches!(err, GenerationError::Completion(CompletionError::Api { status: 429, .. })));
  }

  #[tokio::test]
  async fn test_empty_choices() {
    let api = Arc::new(ScriptedCompletion::default().then(ChatResponse::default()));
    let generator = ResponseGenerator::new(api, GeneratorSettings::default());

    let err = generator.generate("q", &recent_only()).await.unwrap_err();
    assert!(matches!(err, GenerationError::EmptyResponse));
  }

  #[test]
  fn test_build_messages_with_empty_bundle() -> anyhow::Result<()> {
    let messages = build_messages("status", &FilteredBundle::default())?;
    assert_eq!(messages[1].content, "Here is the Jira data: {}\n\nQuestion: status");
    Ok(())
  }
}

//! Scripted completion API

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use jirabot_llm::{ChatRequest, ChatResponse, CompletionApi, CompletionError};

/// Replies with queued responses in order, then with a fixed default text.
/// Every request is kept for inspection.
pub struct ScriptedCompletion {
  script: Mutex<VecDeque<Result<ChatResponse, CompletionError>>>,
  requests: Mutex<Vec<ChatRequest>>,
  default_text: String,
}

impl Default for ScriptedCompletion {
  fn default() -> Self {
    Self::replying("Summary: nothing notable")
  }
}

impl ScriptedCompletion {
  /// Always answer with `text`.
  pub fn replying(text: impl Into<String>) -> Self {
    Self {
      script: Mutex::new(VecDeque::new()),
      requests: Mutex::new(Vec::new()),
      default_text: text.into(),
    }
  }

  /// Queue a response for the next call.
  pub fn then(self, response: ChatResponse) -> Self {
    self.script.lock().expect("script lock poisoned").push_back(Ok(response));
    self
  }

  /// Queue an API failure for the next call.
  pub fn then_fail(self, status: u16, message: &str) -> Self {
    self.script.lock().expect("script lock poisoned").push_back(Err(CompletionError::Api {
      status,
      message: message.to_string(),
    }));
    self
  }

  pub fn requests(&self) -> Vec<ChatRequest> {
    self.requests.lock().expect("requests lock poisoned").clone()
  }

  pub fn call_count(&self) -> usize {
    self.requests.lock().expect("requests lock poisoned").len()
  }
}

#[async_trait]
impl CompletionApi for ScriptedCompletion {
  async fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse, CompletionError> {
    self
      .requests
      .lock()
      .expect("requests lock poisoned")
      .push(request.clone());

    match self.script.lock().expect("script lock poisoned").pop_front() {
      Some(scripted) => scripted,
      None => Ok(ChatResponse::from_text(self.default_text.clone())),
    }
  }
}

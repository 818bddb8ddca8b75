//! Recording chat poster

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use jirabot_slack::{ChatPoster, OutgoingMessage, SlackError, SlackResult};

/// Keeps every posted message; optionally fails all posts.
#[derive(Default)]
pub struct RecordingChat {
  posted: Mutex<Vec<OutgoingMessage>>,
  fail: AtomicBool,
  counter: AtomicUsize,
}

impl RecordingChat {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reject every post with `channel_not_found`.
  pub fn failing() -> Self {
    let chat = Self::default();
    chat.fail.store(true, Ordering::SeqCst);
    chat
  }

  pub fn posted(&self) -> Vec<OutgoingMessage> {
    self.posted.lock().expect("posted lock poisoned").clone()
  }

  /// Text of every posted message, in order.
  pub fn texts(&self) -> Vec<String> {
    self.posted().into_iter().map(|m| m.text).collect()
  }
}

#[async_trait]
impl ChatPoster for RecordingChat {
  async fn post(&self, message: &OutgoingMessage) -> SlackResult<String> {
    if self.fail.load(Ordering::SeqCst) {
      return Err(SlackError::Channel("chat.postMessage failed: channel_not_found".to_string()));
    }

    self
      .posted
      .lock()
      .expect("posted lock poisoned")
      .push(message.clone());
    let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
    Ok(format!("1700000000.{n:06}"))
  }
}

//! Outgoing message payloads for `chat.postMessage`.

use serde::{Deserialize, Serialize};

/// Slack Block Kit block types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlackBlock {
  Section { text: SlackTextObject },
}

impl SlackBlock {
  /// Section block rendering `text` as mrkdwn.
  pub fn markdown_section(text: impl Into<String>) -> Self {
    SlackBlock::Section {
      text: SlackTextObject::mrkdwn(text),
    }
  }
}

/// Text object used inside blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackTextObject {
  /// Always "mrkdwn" for blocks built here
  #[serde(rename = "type")]
  pub kind: String,
  pub text: String,
}

impl SlackTextObject {
  pub fn mrkdwn(text: impl Into<String>) -> Self {
    Self {
      kind: "mrkdwn".to_string(),
      text: text.into(),
    }
  }
}

/// A message to post to a channel, optionally inside a thread.
///
/// `text` is always sent; when blocks are present Slack uses it as the
/// notification fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
  pub channel: String,
  pub text: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub thread_ts: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub blocks: Option<Vec<SlackBlock>>,
}

impl OutgoingMessage {
  pub fn new(channel: impl Into<String>, text: impl Into<String>) -> Self {
    Self {
      channel: channel.into(),
      text: text.into(),
      thread_ts: None,
      blocks: None,
    }
  }

  pub fn in_thread(mut self, thread_ts: impl Into<String>) -> Self {
    self.thread_ts = Some(thread_ts.into());
    self
  }

  pub fn with_blocks(mut self, blocks: Vec<SlackBlock>) -> Self {
    self.blocks = Some(blocks);
    self
  }
}

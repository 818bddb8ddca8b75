//! Event model for Slack Socket Mode.
//!
//! Only two event types matter to the bot:
//! - `message` - channel, group and direct messages
//! - `member_joined_channel` - used to greet a channel when the bot is added
//!
//! Everything else parses to [`SlackEvent::Unknown`] and is dropped.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SlackError, SlackResult};

/// Slack event types that we handle.
#[derive(Debug, Clone, PartialEq)]
pub enum SlackEvent {
  Message(MessageEvent),
  MemberJoinedChannel(MemberJoinedChannelEvent),
  /// Unknown event type (for forward compatibility).
  Unknown(String),
}

/// Event payload for messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEvent {
  /// User who sent the message. Absent for bot and system messages.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub user: Option<String>,
  #[serde(default)]
  pub text: String,
  pub channel: String,
  /// Channel type (im, channel, group, mpim).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub channel_type: Option<String>,
  pub ts: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub thread_ts: Option<String>,
  /// Subtype of message (e.g., "bot_message", "message_changed").
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub subtype: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bot_id: Option<String>,
}

impl MessageEvent {
  /// Check if this is a bot message (should be ignored).
  pub fn is_bot_message(&self) -> bool {
    self.bot_id.is_some() || self.subtype.as_deref() == Some("bot_message")
  }

  /// Check if this is an edit or deletion notification rather than a new message.
  pub fn is_edit_or_delete(&self) -> bool {
    matches!(self.subtype.as_deref(), Some("message_changed" | "message_deleted"))
  }

  /// Thread to reply in: the existing thread, or a new one rooted at this message.
  pub fn reply_thread_ts(&self) -> &str {
    self.thread_ts.as_deref().unwrap_or(&self.ts)
  }
}

/// Event payload for `member_joined_channel`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberJoinedChannelEvent {
  pub user: String,
  pub channel: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub channel_type: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub team: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub inviter: Option<String>,
}

/// Socket Mode envelope wrapping events.
///
/// `hello` and `disconnect` frames carry no envelope id and need no ack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocketModeEnvelope {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub envelope_id: Option<String>,
  #[serde(rename = "type")]
  pub envelope_type: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub payload: Option<EventPayload>,
  /// Reason given on `disconnect` frames (e.g. "refresh_requested").
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reason: Option<String>,
}

/// Event callback payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventPayload {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub team_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub api_app_id: Option<String>,
  /// The actual event.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub event: Option<serde_json::Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub event_id: Option<String>,
}

/// Socket Mode acknowledgment response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketModeAck {
  pub envelope_id: String,
}

impl SocketModeAck {
  pub fn new(envelope_id: impl Into<String>) -> Self {
    Self {
      envelope_id: envelope_id.into(),
    }
  }
}

/// Receives events delivered over Socket Mode.
///
/// Each event is handled on its own task, so implementations must not assume
/// any ordering between calls.
#[async_trait]
pub trait SlackEventHandler: Send + Sync {
  async fn on_message(&self, event: MessageEvent);

  async fn on_member_joined(&self, event: MemberJoinedChannelEvent);
}

/// Route a parsed event to the matching handler method.
pub async fn dispatch(handler: &dyn SlackEventHandler, event: SlackEvent) {
  match event {
    SlackEvent::Message(event) => handler.on_message(event).await,
    SlackEvent::MemberJoinedChannel(event) => handler.on_member_joined(event).await,
    SlackEvent::Unknown(event_type) => debug!("Ignoring event type: {event_type}"),
  }
}

/// Parse a raw event from the Socket Mode envelope.
pub fn parse_event(payload: &EventPayload) -> SlackResult<SlackEvent> {
  let event_json = payload
    .event
    .as_ref()
    .ok_or_else(|| SlackError::InvalidPayload("Missing event field".to_string()))?;

  let event_type = event_json
    .get("type")
    .and_then(|t| t.as_str())
    .unwrap_or("unknown");

  debug!("Parsing event type: {}", event_type);

  match event_type {
    "message" => Ok(SlackEvent::Message(serde_json::from_value(event_json.clone())?)),
    "member_joined_channel" => Ok(SlackEvent::MemberJoinedChannel(serde_json::from_value(
      event_json.clone(),
    )?)),
    other => Ok(SlackEvent::Unknown(other.to_string())),
  }
}

/// Remove one leading `<@U...>` mention (with optional `|name`) and trim.
///
/// Mentions later in the text are left alone.
pub fn strip_leading_mention(text: &str) -> &str {
  let trimmed = text.trim();
  if let Some(rest) = trimmed.strip_prefix("<@")
    && let Some(end) = rest.find('>')
  {
    return rest[end + 1..].trim();
  }
  trimmed
}

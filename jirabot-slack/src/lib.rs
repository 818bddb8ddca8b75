//! Slack integration for jirabot
//!
//! Provides:
//! - A Web API client for `auth.test`, `chat.postMessage` and `apps.connections.open`
//! - A Socket Mode loop that acknowledges envelopes and dispatches events
//! - The event model and the [`SlackEventHandler`] / [`ChatPoster`] seams
//!
//! Required environment variables (read by the binary):
//! - `SLACK_BOT_TOKEN` - Bot OAuth token (xoxb-...)
//! - `SLACK_APP_TOKEN` - App-level token for Socket Mode (xapp-...)
//! - `SLACK_SIGNING_SECRET` - Signing secret

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod messages;
pub mod socket;

use async_trait::async_trait;
pub use client::{AuthIdentity, SlackClient};
pub use config::SlackConfig;
pub use error::{SlackError, SlackResult};
pub use events::{MemberJoinedChannelEvent, MessageEvent, SlackEvent, SlackEventHandler, strip_leading_mention};
pub use messages::{OutgoingMessage, SlackBlock, SlackTextObject};
pub use socket::{SocketModeRunner, SocketOptions};

/// Something that can post messages to a chat channel.
#[async_trait]
pub trait ChatPoster: Send + Sync {
  /// Post `message` and return the new message's timestamp.
  async fn post(&self, message: &OutgoingMessage) -> SlackResult<String>;
}

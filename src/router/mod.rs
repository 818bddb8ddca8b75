//! # Conversation Router
//!
//! Handles chat events: recognizes commands, runs the question flow and posts
//! replies. Holds no state between messages.

pub mod intent;
pub mod replies;

use std::sync::Arc;

use async_trait::async_trait;
use jirabot_jira::TrackerGateway;
use jirabot_slack::{
  ChatPoster, MemberJoinedChannelEvent, MessageEvent, OutgoingMessage, SlackBlock, SlackError, SlackEventHandler,
  strip_leading_mention,
};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use self::intent::{Command, QueryPlan, parse_command};
use crate::gather::gather;
use crate::generator::{GenerationError, ResponseGenerator};

#[derive(Debug, Error)]
pub enum RouterError {
  /// No issue slot could be filled for a question.
  #[error("No usable Jira data for the question")]
  NoUsableData,

  #[error(transparent)]
  Generation(#[from] GenerationError),

  #[error("Failed to post reply: {0}")]
  Post(#[from] SlackError),
}

pub struct Router {
  tracker: Arc<dyn TrackerGateway>,
  generator: ResponseGenerator,
  chat: Arc<dyn ChatPoster>,
  bot_user_id: String,
}

impl Router {
  pub fn new(
    tracker: Arc<dyn TrackerGateway>,
    generator: ResponseGenerator,
    chat: Arc<dyn ChatPoster>,
    bot_user_id: impl Into<String>,
  ) -> Self {
    Self {
      tracker,
      generator,
      chat,
      bot_user_id: bot_user_id.into(),
    }
  }

  fn is_own_message(&self, event: &MessageEvent) -> bool {
    event.is_bot_message() || event.user.as_deref() == Some(self.bot_user_id.as_str())
  }

  /// Handle one chat message. Never fails; errors become replies or logs.
  #[instrument(skip_all, fields(channel = %event.channel, ts = %event.ts))]
  pub async fn handle_message(&self, event: &MessageEvent) {
    if self.is_own_message(event) || event.is_edit_or_delete() {
      debug!("Ignoring bot or edited message");
      return;
    }
    let Some(user) = event.user.as_deref() else {
      return;
    };

    let Some(command) = parse_command(strip_leading_mention(&event.text)) else {
      return;
    };
    info!(user, ?command, "Handling command");

    let result = match command {
      Command::Greeting => self.send_greeting(event, user).await,
      Command::Help => self.reply(event, replies::HELP).await,
      Command::TestJira => self.test_jira(event).await,
      Command::Projects => self.list_projects(event).await,
      Command::Ask(question) if question.is_empty() => self.reply(event, replies::EMPTY_QUESTION).await,
      Command::Ask(question) => self.answer(event, &question).await,
    };

    match result {
      Ok(()) => {}
      Err(RouterError::NoUsableData) => {
        warn!("No usable Jira data, sending guidance");
        self.reply_logged(event, replies::NO_USABLE_DATA).await;
      }
      Err(RouterError::Post(e)) => error!("Failed to post reply: {e}"),
      Err(e) => {
        error!("Error processing message: {e}");
        self.reply_logged(event, replies::GENERIC_ERROR).await;
      }
    }
  }

  /// Greet a channel the bot was just added to.
  pub async fn handle_member_joined(&self, event: &MemberJoinedChannelEvent) {
    if event.user != self.bot_user_id {
      return;
    }
    info!(channel = %event.channel, "Joined channel, sending welcome");
    if let Err(e) = self.chat.post(&OutgoingMessage::new(&event.channel, replies::WELCOME)).await {
      error!(channel = %event.channel, "Failed to send welcome message: {e}");
    }
  }

  /// Run the question flow and post the summary in the thread.
  async fn answer(&self, event: &MessageEvent, question: &str) -> Result<(), RouterError> {
    let plan = QueryPlan::for_question(question);
    debug!(?plan, "Planned tracker queries");

    let gathered = gather(self.tracker.as_ref(), &plan).await;
    if !gathered.bundle.has_issue_data() {
      return Err(RouterError::NoUsableData);
    }

    let text = self.generator.generate(question, &gathered.bundle).await?;
    self.reply(event, &text).await
  }

  async fn test_jira(&self, event: &MessageEvent) -> Result<(), RouterError> {
    let text = if self.tracker.test_connection().await {
      replies::JIRA_CONNECTED
    } else {
      replies::JIRA_CONNECTION_FAILED
    };
    self.reply(event, text).await
  }

  async fn list_projects(&self, event: &MessageEvent) -> Result<(), RouterError> {
    let text = match self.tracker.list_projects().await {
      Ok(projects) => replies::project_list(&projects),
      Err(e) => {
        error!(status = ?e.status(), "Failed to list projects: {e}");
        replies::PROJECTS_FAILED.to_string()
      }
    };
    self.reply(event, &text).await
  }

  async fn send_greeting(&self, event: &MessageEvent, user: &str) -> Result<(), RouterError> {
    let text = replies::greeting(user);
    let message = OutgoingMessage::new(&event.channel, &text).with_blocks(vec![SlackBlock::markdown_section(&text)]);
    self.chat.post(&message).await?;
    Ok(())
  }

  /// Post `text` as a threaded reply to `event`.
  async fn reply(&self, event: &MessageEvent, text: &str) -> Result<(), RouterError> {
    let message = OutgoingMessage::new(&event.channel, text).in_thread(event.reply_thread_ts());
    self.chat.post(&message).await?;
    Ok(())
  }

  async fn reply_logged(&self, event: &MessageEvent, text: &str) {
    if let Err(e) = self.reply(event, text).await {
      error!("Failed to post reply: {e}");
    }
  }
}

#[async_trait]
impl SlackEventHandler for Router {
  async fn on_message(&self, event: MessageEvent) {
    self.handle_message(&event).await;
  }

  async fn on_member_joined(&self, event: MemberJoinedChannelEvent) {
    self.handle_member_joined(&event).await;
  }
}

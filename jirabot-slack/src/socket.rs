//! Socket Mode connection loop.
//!
//! The runner opens a WebSocket via `apps.connections.open`, acknowledges every
//! envelope as soon as it arrives, and hands each event to the
//! [`SlackEventHandler`] on its own task. Dropped connections are re-opened
//! after [`SocketOptions::reconnect_delay`]; [`SocketModeRunner::shutdown`]
//! ends the loop.

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tokio::time::interval;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};

use crate::client::SlackClient;
use crate::error::{SlackError, SlackResult};
use crate::events::{SlackEvent, SlackEventHandler, SocketModeAck, SocketModeEnvelope, dispatch, parse_event};

/// How long queued frames (acks, Close) get to reach the socket when a session ends.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Timing knobs for the socket loop.
#[derive(Debug, Clone)]
pub struct SocketOptions {
  /// Delay between reconnection attempts.
  pub reconnect_delay: Duration,
  /// Ping interval for WebSocket keep-alive.
  pub ping_interval: Duration,
}

impl Default for SocketOptions {
  fn default() -> Self {
    Self {
      reconnect_delay: Duration::from_secs(5),
      ping_interval: Duration::from_secs(30),
    }
  }
}

/// What a single text frame asks the loop to do.
#[derive(Debug, PartialEq)]
pub(crate) enum Inbound {
  /// Acknowledge, then handle the event if there is one.
  Event {
    ack: SocketModeAck,
    event: Option<SlackEvent>,
  },
  /// Acknowledge only (slash commands, interactivity).
  AckOnly(SocketModeAck),
  Hello,
  /// Slack is about to close this socket; open a new one.
  Disconnect(Option<String>),
  Ignore,
}

/// Decode one Socket Mode text frame.
pub(crate) fn decode_frame(text: &str) -> SlackResult<Inbound> {
  let envelope: SocketModeEnvelope = serde_json::from_str(text)?;

  match envelope.envelope_type.as_str() {
    "hello" => Ok(Inbound::Hello),
    "disconnect" => Ok(Inbound::Disconnect(envelope.reason)),
    envelope_type => {
      let Some(envelope_id) = envelope.envelope_id else {
        debug!("Envelope without id: {envelope_type}");
        return Ok(Inbound::Ignore);
      };
      let ack = SocketModeAck::new(envelope_id);

      if envelope_type != "events_api" {
        debug!("Acknowledging unsupported envelope type: {envelope_type}");
        return Ok(Inbound::AckOnly(ack));
      }

      let event = match envelope.payload.as_ref().map(parse_event) {
        Some(Ok(event)) => Some(event),
        Some(Err(e)) => {
          warn!("Failed to parse event: {e}");
          None
        }
        None => None,
      };
      Ok(Inbound::Event { ack, event })
    }
  }
}

/// How a single connection ended.
enum SessionEnd {
  Shutdown,
  Reconnect,
}

/// Drives a Socket Mode connection until shut down.
pub struct SocketModeRunner {
  client: Arc<SlackClient>,
  handler: Arc<dyn SlackEventHandler>,
  options: SocketOptions,
  shutdown_tx: broadcast::Sender<()>,
}

impl SocketModeRunner {
  pub fn new(client: Arc<SlackClient>, handler: Arc<dyn SlackEventHandler>) -> Self {
    let (shutdown_tx, _) = broadcast::channel(1);
    Self {
      client,
      handler,
      options: SocketOptions::default(),
      shutdown_tx,
    }
  }

  pub fn with_options(mut self, options: SocketOptions) -> Self {
    self.options = options;
    self
  }

  /// Ask a running loop to stop.
  pub fn shutdown(&self) {
    info!("Shutting down Socket Mode loop...");
    let _ = self.shutdown_tx.send(());
  }

  /// Run until [`shutdown`](Self::shutdown) is called or authentication fails.
  pub async fn run(&self) -> SlackResult<()> {
    let mut shutdown_rx = self.shutdown_tx.subscribe();

    loop {
      let outcome = match self.client.open_socket_url().await {
        Ok(ws_url) => {
          info!("Connecting to Socket Mode...");
          self.connect_and_run(&ws_url, &mut shutdown_rx).await
        }
        Err(e) => Err(e),
      };

      match outcome {
        Ok(SessionEnd::Shutdown) => break,
        Ok(SessionEnd::Reconnect) => {
          info!("Socket Mode connection closed, reconnecting");
          continue;
        }
        Err(e @ SlackError::Auth(_)) => {
          error!("Socket Mode authentication failed: {e}");
          return Err(e);
        }
        Err(e) => {
          error!("Socket Mode connection error: {e}");
        }
      }

      info!("Reconnecting in {:?}...", self.options.reconnect_delay);
      tokio::select! {
        _ = shutdown_rx.recv() => break,
        _ = tokio::time::sleep(self.options.reconnect_delay) => {}
      }
    }

    info!("Socket Mode loop stopped");
    Ok(())
  }

  async fn connect_and_run(&self, ws_url: &str, shutdown_rx: &mut broadcast::Receiver<()>) -> SlackResult<SessionEnd> {
    let (ws_stream, _) = connect_async(ws_url).await?;
    let (mut write, mut read) = ws_stream.split();

    let (msg_tx, mut msg_rx) = mpsc::channel::<WsMessage>(100);

    let mut write_task = tokio::spawn(async move {
      while let Some(msg) = msg_rx.recv().await {
        if let Err(e) = write.send(msg).await {
          error!("Failed to send WebSocket message: {e}");
          return;
        }
      }
      let _ = write.close().await;
    });

    let ping_tx = msg_tx.clone();
    let ping_interval = self.options.ping_interval;
    let ping_task = tokio::spawn(async move {
      let mut interval = interval(ping_interval);
      loop {
        interval.tick().await;
        if ping_tx.send(WsMessage::Ping(Vec::new())).await.is_err() {
          break;
        }
      }
    });

    let result = loop {
      tokio::select! {
        _ = shutdown_rx.recv() => {
          info!("Received shutdown signal");
          let _ = msg_tx.send(WsMessage::Close(None)).await;
          break Ok(SessionEnd::Shutdown);
        }
        msg = read.next() => {
          match msg {
            Some(Ok(WsMessage::Text(text))) => {
              if let Some(end) = self.handle_text(&text, &msg_tx).await {
                break Ok(end);
              }
            }
            Some(Ok(WsMessage::Ping(data))) => {
              let _ = msg_tx.send(WsMessage::Pong(data)).await;
            }
            Some(Ok(WsMessage::Close(_))) => {
              info!("WebSocket closed by server");
              break Ok(SessionEnd::Reconnect);
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => break Err(SlackError::from(e)),
            None => break Ok(SessionEnd::Reconnect),
          }
        }
      }
    };

    ping_task.abort();
    let _ = ping_task.await;

    // The writer exits once every sender is gone, after flushing what is queued.
    drop(msg_tx);
    if tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut write_task).await.is_err() {
      warn!("WebSocket writer did not finish within {WRITER_DRAIN_TIMEOUT:?}");
      write_task.abort();
    }

    result
  }

  /// Returns `Some` when the frame ends the session.
  async fn handle_text(&self, text: &str, msg_tx: &mpsc::Sender<WsMessage>) -> Option<SessionEnd> {
    let inbound = match decode_frame(text) {
      Ok(inbound) => inbound,
      Err(e) => {
        warn!("Failed to parse Socket Mode envelope: {e}");
        return None;
      }
    };

    match inbound {
      Inbound::Hello => info!("Socket Mode connection established"),
      Inbound::Disconnect(reason) => {
        info!("Received disconnect request from Slack: {}", reason.as_deref().unwrap_or("unspecified"));
        return Some(SessionEnd::Reconnect);
      }
      Inbound::AckOnly(ack) => self.send_ack(&ack, msg_tx).await,
      Inbound::Event { ack, event } => {
        self.send_ack(&ack, msg_tx).await;
        if let Some(event) = event {
          let handler = Arc::clone(&self.handler);
          tokio::spawn(async move {
            dispatch(handler.as_ref(), event).await;
          });
        }
      }
      Inbound::Ignore => {}
    }

    None
  }

  async fn send_ack(&self, ack: &SocketModeAck, msg_tx: &mpsc::Sender<WsMessage>) {
    match serde_json::to_string(ack) {
      Ok(json) => {
        if msg_tx.send(WsMessage::Text(json)).await.is_err() {
          warn!("WebSocket writer closed before ack {}", ack.envelope_id);
        }
      }
      Err(e) => error!("Failed to serialize ack: {e}"),
    }
  }
}

#[cfg(test)]
mod tests {
  use async_trait::async_trait;
  use serde_json::json;
  use tokio::net::TcpListener;
  use tokio::sync::oneshot;
  use wiremock::matchers::{method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::config::SlackConfig;
  use crate::events::{MemberJoinedChannelEvent, MessageEvent};

  struct IgnoreEvents;

  #[async_trait]
  impl SlackEventHandler for IgnoreEvents {
    async fn on_message(&self, _event: MessageEvent) {}

    async fn on_member_joined(&self, _event: MemberJoinedChannelEvent) {}
  }

  #[tokio::test]
  async fn test_shutdown_sends_close_frame() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let ws_url = format!("ws://{}", listener.local_addr()?);

    let (connected_tx, connected_rx) = oneshot::channel();
    let socket_server = tokio::spawn(async move {
      let (stream, _) = listener.accept().await?;
      let mut ws = tokio_tungstenite::accept_async(stream).await?;
      let _ = connected_tx.send(());
      ws.send(WsMessage::Text(json!({ "type": "hello" }).to_string())).await?;

      while let Some(msg) = ws.next().await {
        if let WsMessage::Close(_) = msg? {
          return Ok::<bool, anyhow::Error>(true);
        }
      }
      Ok(false)
    });

    let api = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/apps.connections.open"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "url": ws_url })))
      .mount(&api)
      .await;

    let client = SlackClient::new(SlackConfig::new("xoxb-test", "xapp-test", "secret"))?.with_api_base(api.uri());
    let runner = Arc::new(SocketModeRunner::new(Arc::new(client), Arc::new(IgnoreEvents)));

    let loop_runner = Arc::clone(&runner);
    let run = tokio::spawn(async move { loop_runner.run().await });

    tokio::time::timeout(Duration::from_secs(5), connected_rx).await??;
    runner.shutdown();

    tokio::time::timeout(Duration::from_secs(5), run).await???;
    let saw_close = tokio::time::timeout(Duration::from_secs(5), socket_server).await???;
    assert!(saw_close);

    Ok(())
  }

  #[test]
  fn test_socket_options_default() {
    let options = SocketOptions::default();
    assert_eq!(options.reconnect_delay, Duration::from_secs(5));
    assert_eq!(options.ping_interval, Duration::from_secs(30));
  }

  #[test]
  fn test_decode_hello_and_disconnect() {
    let hello = json!({ "type": "hello", "num_connections": 1 }).to_string();
    assert_eq!(decode_frame(&hello).unwrap(), Inbound::Hello);

    let disconnect = json!({ "type": "disconnect", "reason": "refresh_requested" }).to_string();
    assert_eq!(
      decode_frame(&disconnect).unwrap(),
      Inbound::Disconnect(Some("refresh_requested".to_string()))
    );
  }

  #[test]
  fn test_decode_events_api_acks_and_parses() {
    let frame = json!({
        "envelope_id": "env-7",
        "type": "events_api",
        "payload": {
            "event": {
                "type": "member_joined_channel",
                "user": "UBOT",
                "channel": "C1"
            }
        }
    })
    .to_string();

    match decode_frame(&frame).unwrap() {
      Inbound::Event { ack, event } => {
        assert_eq!(ack, SocketModeAck::new("env-7"));
        assert!(matches!(event, Some(SlackEvent::MemberJoinedChannel(ref e)) if e.channel == "C1"));
      }
      other => panic!("unexpected frame: {other:?}"),
    }
  }

  #[test]
  fn test_decode_malformed_event_still_acks() {
    let frame = json!({
        "envelope_id": "env-8",
        "type": "events_api",
        "payload": { "event": { "type": "message" } }
    })
    .to_string();

    assert_eq!(
      decode_frame(&frame).unwrap(),
      Inbound::Event {
        ack: SocketModeAck::new("env-8"),
        event: None,
      }
    );
  }

  #[test]
  fn test_decode_other_envelopes() {
    let slash = json!({ "envelope_id": "env-9", "type": "slash_commands", "payload": {} }).to_string();
    assert_eq!(decode_frame(&slash).unwrap(), Inbound::AckOnly(SocketModeAck::new("env-9")));

    let no_id = json!({ "type": "events_api" }).to_string();
    assert_eq!(decode_frame(&no_id).unwrap(), Inbound::Ignore);

    assert!(matches!(decode_frame("not json"), Err(SlackError::Json(_))));
  }
}

//! WebSocket connections and the bus that addresses them.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use dashmap::DashMap;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

use searchlens_core::Router;
use searchlens_protocols::bus::{BusMessage, BusReply, MessageBus};
use searchlens_protocols::error::BusError;
use searchlens_protocols::types::ContextId;

use crate::BridgeState;

/// Outbound frames buffered per connection before sends start failing.
const OUTBOUND_CAPACITY: usize = 32;

/// Reply to an inbound frame. `replyTo` names the action being answered and
/// is absent when the frame could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyFrame {
    #[serde(rename = "replyTo", default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(flatten)]
    pub reply: BusReply,
}

impl ReplyFrame {
    fn to(action: &str, reply: BusReply) -> Self {
        Self {
            reply_to: Some(action.to_string()),
            reply,
        }
    }

    fn unrouted(reply: BusReply) -> Self {
        Self {
            reply_to: None,
            reply,
        }
    }
}

/// Message bus over live WebSocket connections.
#[derive(Default)]
pub struct WsBus {
    connections: DashMap<ContextId, mpsc::Sender<String>>,
}

impl WsBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and return the receiver of its outbound frames.
    pub fn register(&self, id: ContextId) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(OUTBOUND_CAPACITY);
        self.connections.insert(id, tx);
        rx
    }

    pub fn unregister(&self, id: &ContextId) {
        if self.connections.remove(id).is_some() {
            debug!("WebSocket context removed: {}", id);
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

#[async_trait]
impl MessageBus for WsBus {
    async fn send(&self, target: &ContextId, message: BusMessage) -> Result<BusReply, BusError> {
        let sender = self
            .connections
            .get(target)
            .map(|s| s.clone())
            .ok_or_else(|| BusError::ContextGone(target.to_string()))?;

        let frame =
            serde_json::to_string(&message).map_err(|e| BusError::SendFailed(e.to_string()))?;

        // try_send: the connection task may itself be the sender (status
        // broadcast during a toggle), so waiting for capacity could deadlock.
        match sender.try_send(frame) {
            Ok(()) => Ok(BusReply::success()),
            Err(TrySendError::Full(_)) => Err(BusError::SendFailed(format!(
                "outbound queue full for {}",
                target
            ))),
            Err(TrySendError::Closed(_)) => {
                self.connections.remove(target);
                Err(BusError::ContextGone(target.to_string()))
            }
        }
    }

    fn contexts(&self) -> Vec<ContextId> {
        self.connections.iter().map(|e| e.key().clone()).collect()
    }
}

/// Serve one accepted socket until either side closes it.
pub(crate) async fn handle_connection(socket: WebSocket, state: Arc<BridgeState>) {
    let id = ContextId::generate();
    let mut outbound_rx = state.bus.register(id.clone());
    let (mut ws_tx, mut ws_rx) = socket.split();

    info!("WebSocket context connected: {}", id);

    loop {
        tokio::select! {
            Some(frame) = outbound_rx.recv() => {
                if let Err(e) = ws_tx.send(Message::Text(frame.into())).await {
                    warn!("Failed to push to {}: {}", id, e);
                    break;
                }
            }

            result = ws_rx.next() => {
                match result {
                    Some(Ok(Message::Text(text))) => {
                        let Some(reply) = handle_text(&id, text.as_str(), &state.router).await else {
                            continue;
                        };
                        let frame = match serde_json::to_string(&reply) {
                            Ok(frame) => frame,
                            Err(e) => {
                                warn!("Failed to encode reply for {}: {}", id, e);
                                continue;
                            }
                        };
                        if let Err(e) = ws_tx.send(Message::Text(frame.into())).await {
                            warn!("Failed to reply to {}: {}", id, e);
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("WebSocket context closed: {}", id);
                        break;
                    }
                    Some(Ok(_)) => {
                        debug!("Ignoring non-text frame from {}", id);
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error from {}: {}", id, e);
                        break;
                    }
                }
            }
        }
    }

    state.bus.unregister(&id);
}

/// Route one inbound text frame. Returns the reply frame, if any.
pub(crate) async fn handle_text(
    origin: &ContextId,
    text: &str,
    router: &Router,
) -> Option<ReplyFrame> {
    let message: BusMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            warn!("Invalid frame from {}: {}", origin, e);
            return Some(ReplyFrame::unrouted(BusReply::error(format!(
                "Invalid message: {}",
                e
            ))));
        }
    };

    let action = message.action();
    router
        .handle(origin, message)
        .await
        .map(|reply| ReplyFrame::to(action, reply))
}

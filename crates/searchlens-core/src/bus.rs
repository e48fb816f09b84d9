//! In-process message bus.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use searchlens_protocols::bus::{BusMessage, BusReply, MessageBus};
use searchlens_protocols::error::BusError;
use searchlens_protocols::types::ContextId;

/// Message bus whose contexts live in the same process.
///
/// Each attached context receives its messages on an unbounded channel; a
/// context whose receiver was dropped counts as gone.
#[derive(Default)]
pub struct LocalBus {
    contexts: DashMap<ContextId, mpsc::UnboundedSender<BusMessage>>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a context and return the receiving end of its inbox.
    pub fn attach(&self, id: ContextId) -> mpsc::UnboundedReceiver<BusMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.contexts.insert(id.clone(), tx);
        debug!("Context attached: {}", id);
        rx
    }

    pub fn detach(&self, id: &ContextId) {
        if self.contexts.remove(id).is_some() {
            debug!("Context detached: {}", id);
        }
    }
}

#[async_trait]
impl MessageBus for LocalBus {
    async fn send(&self, target: &ContextId, message: BusMessage) -> Result<BusReply, BusError> {
        let sender = self
            .contexts
            .get(target)
            .map(|s| s.clone())
            .ok_or_else(|| BusError::ContextGone(target.to_string()))?;

        if sender.send(message).is_err() {
            self.contexts.remove(target);
            return Err(BusError::ContextGone(target.to_string()));
        }

        Ok(BusReply::success())
    }

    fn contexts(&self) -> Vec<ContextId> {
        self.contexts.iter().map(|e| e.key().clone()).collect()
    }
}

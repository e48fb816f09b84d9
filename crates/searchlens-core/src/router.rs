//! Routing of inbound bus messages to their handlers.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, info, warn};

use searchlens_protocols::bus::{BusMessage, BusReply, MessageBus};
use searchlens_protocols::provider::OriginalPageOpener;
use searchlens_protocols::store::{ConfigStore, StoreValues, keys};
use searchlens_protocols::types::ContextId;

use crate::dispatcher::Dispatcher;

/// Handles every action a page context can send.
pub struct Router {
    store: Arc<dyn ConfigStore>,
    dispatcher: Arc<Dispatcher>,
    bus: Arc<dyn MessageBus>,
    opener: Option<Arc<dyn OriginalPageOpener>>,
}

impl Router {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        dispatcher: Arc<Dispatcher>,
        bus: Arc<dyn MessageBus>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            bus,
            opener: None,
        }
    }

    pub fn with_opener(mut self, opener: Arc<dyn OriginalPageOpener>) -> Self {
        self.opener = Some(opener);
        self
    }

    /// Handle `message` from `origin`. Returns the reply to send back, if the
    /// action has one.
    pub async fn handle(&self, origin: &ContextId, message: BusMessage) -> Option<BusReply> {
        debug!("Received {} from {}", message.action(), origin);

        match message {
            BusMessage::SearchDetected { query } => {
                self.dispatcher.handle(query, origin.clone());
                None
            }
            BusMessage::GetStatus => Some(self.status().await),
            BusMessage::ToggleStatus => Some(self.toggle().await),
            BusMessage::OpenOriginalPage => Some(self.open_original_page().await),
            BusMessage::DisplayAnswer { .. } | BusMessage::StatusChanged { .. } => {
                debug!("Ignoring outbound-only action {} from {}", message.action(), origin);
                None
            }
        }
    }

    async fn status(&self) -> BusReply {
        match self.store.is_enabled().await {
            Ok(enabled) => BusReply::enabled(enabled),
            Err(e) => {
                warn!("Failed to read enabled flag: {}", e);
                BusReply::error(e.to_string())
            }
        }
    }

    async fn toggle(&self) -> BusReply {
        let current = match self.store.is_enabled().await {
            Ok(enabled) => enabled,
            Err(e) => {
                warn!("Failed to read enabled flag: {}", e);
                return BusReply::error(e.to_string());
            }
        };

        let enabled = !current;
        let mut values = StoreValues::new();
        values.insert(keys::ENABLED.to_string(), Value::Bool(enabled));
        if let Err(e) = self.store.set(values).await {
            warn!("Failed to persist enabled flag: {}", e);
            return BusReply::error(e.to_string());
        }

        info!("Extension {}", if enabled { "enabled" } else { "disabled" });
        self.broadcast_status(enabled).await;
        BusReply::toggled(enabled)
    }

    /// Tell every known context about the new flag. Failures are ignored.
    async fn broadcast_status(&self, enabled: bool) {
        let contexts = self.bus.contexts();
        let sends = contexts.iter().map(|id| {
            let bus = Arc::clone(&self.bus);
            async move {
                if let Err(e) = bus.send(id, BusMessage::StatusChanged { enabled }).await {
                    debug!("Status broadcast to {} failed: {}", id, e);
                }
            }
        });
        join_all(sends).await;
    }

    async fn open_original_page(&self) -> BusReply {
        let Some(opener) = &self.opener else {
            return BusReply::error("Opening the original page is not available");
        };

        match opener.open_original_page().await {
            Ok(()) => BusReply::success(),
            Err(e) => {
                warn!("Failed to open original page: {}", e);
                BusReply::error(e.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;

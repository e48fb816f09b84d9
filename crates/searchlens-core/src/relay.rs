//! Delivery of final payloads to the originating context.

use std::sync::Arc;

use tracing::{debug, warn};

use searchlens_protocols::bus::{BusMessage, MessageBus};
use searchlens_protocols::types::{ContextId, ResponsePayload};

/// Sends each payload to its originating context, once, best-effort.
#[derive(Clone)]
pub struct ResponseRelay {
    bus: Arc<dyn MessageBus>,
}

impl ResponseRelay {
    pub fn new(bus: Arc<dyn MessageBus>) -> Self {
        Self { bus }
    }

    /// Deliver `payload` to `origin` as a `display-answer` message.
    ///
    /// Takes the payload by value so it cannot be delivered twice. A failed
    /// delivery (origin closed or navigated away) is logged and dropped.
    pub async fn deliver(&self, origin: &ContextId, payload: ResponsePayload) {
        let kind = payload.kind;
        let message = BusMessage::DisplayAnswer {
            response: payload.text,
        };

        match self.bus.send(origin, message).await {
            Ok(_) => debug!("Delivered {:?} payload to {}", kind, origin),
            Err(e) => warn!("Failed to deliver {:?} payload to {}: {}", kind, origin, e),
        }
    }
}

//! Entry point for detected searches.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use searchlens_protocols::error::AnswerError;
use searchlens_protocols::store::ConfigStore;
use searchlens_protocols::types::{ContextId, PayloadKind, ResponsePayload, SearchRequest};

use crate::registry::ProviderRegistry;
use crate::relay::ResponseRelay;

/// What became of one detected search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The extension is disabled; nothing ran and nothing was sent.
    Disabled,
    /// The query was blank; nothing ran and nothing was sent.
    EmptyQuery,
    /// A payload of this kind was handed to the relay.
    Relayed(PayloadKind),
}

/// Turns each detected search into one relayed payload.
///
/// Configuration is read from the store on every request, so a change made
/// while a request is in flight only affects later requests. Requests are
/// independent tasks; a second search from the same context does not cancel
/// the first.
pub struct Dispatcher {
    store: Arc<dyn ConfigStore>,
    providers: Arc<ProviderRegistry>,
    relay: ResponseRelay,
    shutdown: CancellationToken,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        providers: Arc<ProviderRegistry>,
        relay: ResponseRelay,
    ) -> Self {
        Self {
            store,
            providers,
            relay,
            shutdown: CancellationToken::new(),
        }
    }

    /// Fire-and-forget dispatch. The returned handle may be dropped.
    pub fn handle(self: &Arc<Self>, query: String, origin: ContextId) -> JoinHandle<DispatchOutcome> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.process(&query, origin).await })
    }

    /// Run one request to completion.
    pub async fn process(&self, query: &str, origin: ContextId) -> DispatchOutcome {
        let config = match self.store.load_config().await {
            Ok(config) => config,
            Err(e) => {
                warn!("Config lookup failed for request from {}: {}", origin, e);
                let error = AnswerError::Unknown(e.to_string());
                self.relay
                    .deliver(&origin, ResponsePayload::error(error.user_message()))
                    .await;
                return DispatchOutcome::Relayed(PayloadKind::Error);
            }
        };

        if !config.enabled {
            debug!("Extension disabled, dropping search from {}", origin);
            return DispatchOutcome::Disabled;
        }

        let query = query.trim();
        if query.is_empty() {
            debug!("Empty query from {}, ignoring", origin);
            return DispatchOutcome::EmptyQuery;
        }

        let request = SearchRequest::new(query, origin);
        info!(
            "Dispatching request {} from {} to {} provider",
            request.id, request.origin, config.provider
        );

        let payload = match self.providers.require(config.provider) {
            Ok(provider) => {
                let cancel = self.shutdown.child_token();
                provider.answer(&request, &config, &cancel).await
            }
            Err(e) => {
                warn!("{}", e);
                ResponsePayload::error(AnswerError::Unknown(e.to_string()).user_message())
            }
        };

        let kind = payload.kind;
        debug!("Request {} resolved with {:?}", request.id, kind);
        self.relay.deliver(&request.origin, payload).await;
        DispatchOutcome::Relayed(kind)
    }

    /// Cancel every in-flight provider run.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;

use std::sync::Arc;

use async_trait::async_trait;

use searchlens_config::MemoryStore;
use searchlens_core::{Dispatcher, ProviderRegistry, ResponseRelay, Router};
use searchlens_protocols::prelude::*;

use crate::{BridgeState, WsBus};

/// Answers every query with `answer: <query>`.
pub(crate) struct EchoProvider;

#[async_trait]
impl AnswerProvider for EchoProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Direct
    }

    async fn answer(
        &self,
        request: &SearchRequest,
        _config: &ExtensionConfig,
        _cancel: &CancellationToken,
    ) -> ResponsePayload {
        ResponsePayload::answer(format!("answer: {}", request.query))
    }
}

/// Wire a bus, dispatcher and router over `store`, the way the binary does.
pub(crate) fn bridge_state(store: Arc<MemoryStore>) -> Arc<BridgeState> {
    let bus = Arc::new(WsBus::new());
    let providers = Arc::new(ProviderRegistry::new());
    providers.register(Arc::new(EchoProvider)).unwrap();

    let relay = ResponseRelay::new(bus.clone());
    let dispatcher = Arc::new(Dispatcher::new(store.clone(), providers, relay));
    let router = Arc::new(Router::new(store, dispatcher, bus.clone()));
    Arc::new(BridgeState { bus, router })
}

//! Fakes shared by the core unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use searchlens_protocols::prelude::*;

/// Provider returning a fixed payload and counting its invocations.
pub struct StaticProvider {
    kind: ProviderKind,
    answer: Option<String>,
    error: Option<String>,
    delay: Duration,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl StaticProvider {
    pub fn answering(kind: ProviderKind, text: &str) -> Self {
        Self {
            kind,
            answer: Some(text.to_string()),
            error: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(kind: ProviderKind, message: &str) -> Self {
        Self {
            answer: None,
            error: Some(message.to_string()),
            ..Self::answering(kind, "")
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl AnswerProvider for StaticProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn answer(
        &self,
        request: &SearchRequest,
        _config: &ExtensionConfig,
        _cancel: &CancellationToken,
    ) -> ResponsePayload {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().push(request.query.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match (&self.answer, &self.error) {
            (_, Some(message)) => ResponsePayload::error(message.clone()),
            (Some(text), None) => ResponsePayload::answer(text.clone()),
            (None, None) => ResponsePayload::error("no answer"),
        }
    }
}

/// Bus that records delivered messages. Sends to unknown contexts fail.
pub struct RecordingBus {
    known: Vec<ContextId>,
    sent: Mutex<Vec<(ContextId, BusMessage)>>,
    attempts: AtomicUsize,
}

impl RecordingBus {
    pub fn with_contexts(ids: &[&str]) -> Self {
        Self {
            known: ids.iter().map(|id| ContextId::from(*id)).collect(),
            sent: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn sent(&self) -> Vec<(ContextId, BusMessage)> {
        self.sent.lock().clone()
    }

    /// Messages delivered to `target` with the given action name.
    pub fn sent_to(&self, target: &str, action: &str) -> Vec<BusMessage> {
        self.sent
            .lock()
            .iter()
            .filter(|(id, msg)| id.as_str() == target && msg.action() == action)
            .map(|(_, msg)| msg.clone())
            .collect()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageBus for RecordingBus {
    async fn send(&self, target: &ContextId, message: BusMessage) -> Result<BusReply, BusError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if !self.known.contains(target) {
            return Err(BusError::ContextGone(target.to_string()));
        }
        self.sent.lock().push((target.clone(), message));
        Ok(BusReply::success())
    }

    fn contexts(&self) -> Vec<ContextId> {
        self.known.clone()
    }
}

/// Store whose every operation fails.
pub struct FailingStore;

#[async_trait]
impl ConfigStore for FailingStore {
    async fn get(&self, _keys: &[&str]) -> Result<StoreValues, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    async fn set(&self, _values: StoreValues) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}

/// Opener that records calls and optionally fails.
#[derive(Default)]
pub struct RecordingOpener {
    pub fail_with: Option<String>,
    pub opened: AtomicUsize,
}

#[async_trait]
impl OriginalPageOpener for RecordingOpener {
    async fn open_original_page(&self) -> Result<(), AnswerError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(message) => Err(AnswerError::Unknown(message.clone())),
            None => Ok(()),
        }
    }
}

/// Build a store value map from JSON object literal.
pub fn values(json: serde_json::Value) -> StoreValues {
    match json {
        serde_json::Value::Object(map) => map,
        _ => StoreValues::new(),
    }
}

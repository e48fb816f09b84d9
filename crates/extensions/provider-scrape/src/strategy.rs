//! Scrape automation strategy.
//!
//! One run moves through
//!
//! ```text
//! Created → Loading → Discovering → Filling → Submitting → AwaitingAnswer
//!         → Extracted | Challenge | TimedOut → Closed
//! ```
//!
//! and owns a single [`EphemeralContext`] which is closed on every path out.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info, warn};

use searchlens_protocols::CancellationToken;
use searchlens_protocols::challenge::is_verification_challenge;
use searchlens_protocols::error::AnswerError;
use searchlens_protocols::provider::AnswerProvider;
use searchlens_protocols::types::{
    ExtensionConfig, ProviderKind, ResponsePayload, SearchRequest,
};

use crate::context::EphemeralContext;
use crate::driver::AutomationDriver;
use crate::error::ScrapeError;
use crate::host::BrowsingHost;
use crate::poll::{Poller, pause};

pub const DEFAULT_CHAT_URL: &str = "https://chat.qwen.ai/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeState {
    Created,
    Loading,
    Discovering,
    Filling,
    Submitting,
    AwaitingAnswer,
    Extracted,
    Challenge,
    TimedOut,
    Closed,
}

/// Timing and bounds for one run.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub chat_url: String,
    /// Settle time after load complete, for client-side rendering.
    pub load_grace: Duration,
    pub discovery_max_attempts: u32,
    pub answer_max_attempts: u32,
    pub poll_interval: Duration,
    /// Wait after switching the chat into search mode.
    pub search_mode_settle: Duration,
    /// Wait between filling the input and submitting.
    pub submit_delay: Duration,
    /// Limit on contexts open at once. `None` is unlimited.
    pub max_open_contexts: Option<usize>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            chat_url: DEFAULT_CHAT_URL.to_string(),
            load_grace: Duration::from_millis(1500),
            discovery_max_attempts: 30,
            answer_max_attempts: 30,
            poll_interval: Duration::from_millis(2000),
            search_mode_settle: Duration::from_millis(2000),
            submit_delay: Duration::from_millis(1000),
            max_open_contexts: None,
        }
    }
}

/// How a run that reached the page ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Answer(String),
    /// The chat page showed a verification interstitial instead of an answer.
    Challenge(String),
}

/// Answers a query by driving a hidden chat page.
pub struct ScrapeProvider {
    host: Arc<dyn BrowsingHost>,
    options: ScrapeOptions,
    slots: Option<Arc<Semaphore>>,
}

impl ScrapeProvider {
    pub fn new(host: Arc<dyn BrowsingHost>, options: ScrapeOptions) -> Self {
        let slots = options
            .max_open_contexts
            .map(|n| Arc::new(Semaphore::new(n.max(1))));
        Self {
            host,
            options,
            slots,
        }
    }

    pub fn options(&self) -> &ScrapeOptions {
        &self.options
    }

    /// Run the full state machine for `query`.
    pub async fn scrape(&self, query: &str, cancel: &CancellationToken) -> Result<Extraction, ScrapeError> {
        let _permit = self.acquire_slot(cancel).await?;

        let mut run = Run::new();
        let mut context = EphemeralContext::open(self.host.as_ref(), &self.options.chat_url).await?;
        debug!("Context {} opened", context.context_id());

        let result = self.drive(&mut run, &mut context, query, cancel).await;
        if let Err(ScrapeError::Timeout(_)) = &result {
            run.enter(ScrapeState::TimedOut);
        }

        context.close().await;
        run.enter(ScrapeState::Closed);
        result
    }

    async fn acquire_slot(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Option<OwnedSemaphorePermit>, ScrapeError> {
        let Some(slots) = &self.slots else {
            return Ok(None);
        };
        tokio::select! {
            permit = slots.clone().acquire_owned() => permit
                .map(Some)
                .map_err(|_| ScrapeError::ContextClosed),
            _ = cancel.cancelled() => Err(ScrapeError::Cancelled),
        }
    }

    async fn drive(
        &self,
        run: &mut Run,
        context: &mut EphemeralContext,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Extraction, ScrapeError> {
        run.enter(ScrapeState::Loading);
        context.wait_loaded().await?;
        self.pause(self.options.load_grace, cancel).await?;

        run.enter(ScrapeState::Discovering);
        let driver = AutomationDriver::new(
            context.page(),
            Poller::new(self.options.discovery_max_attempts, self.options.poll_interval),
            Poller::new(self.options.answer_max_attempts, self.options.poll_interval),
        );
        let controls = driver.discover(cancel).await?;

        if controls.search_mode.is_some() {
            driver.activate_search_mode().await?;
            self.pause(self.options.search_mode_settle, cancel).await?;
        }

        run.enter(ScrapeState::Filling);
        driver.fill(query).await?;
        self.pause(self.options.submit_delay, cancel).await?;

        run.enter(ScrapeState::Submitting);
        driver.submit(&controls).await?;

        run.enter(ScrapeState::AwaitingAnswer);
        let (text, source) = driver.await_answer(cancel).await?;
        debug!("Extracted {} chars from {:?}", text.chars().count(), source);

        if is_verification_challenge(&text) {
            run.enter(ScrapeState::Challenge);
            Ok(Extraction::Challenge(text))
        } else {
            run.enter(ScrapeState::Extracted);
            Ok(Extraction::Answer(text))
        }
    }

    async fn pause(&self, duration: Duration, cancel: &CancellationToken) -> Result<(), ScrapeError> {
        if pause(duration, cancel).await {
            Ok(())
        } else {
            Err(ScrapeError::Cancelled)
        }
    }
}

#[async_trait]
impl AnswerProvider for ScrapeProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Scrape
    }

    async fn answer(
        &self,
        request: &SearchRequest,
        _config: &ExtensionConfig,
        cancel: &CancellationToken,
    ) -> ResponsePayload {
        match self.scrape(&request.query, cancel).await {
            Ok(Extraction::Answer(text)) => ResponsePayload::answer(text),
            Ok(Extraction::Challenge(text)) => {
                info!("Request {} hit a verification challenge", request.id);
                ResponsePayload::answer(text)
            }
            Err(e) => {
                warn!("Scrape for request {} failed: {}", request.id, e);
                ResponsePayload::error(AnswerError::from(e).user_message())
            }
        }
    }
}

/// State tracking for one run.
struct Run {
    state: ScrapeState,
}

impl Run {
    fn new() -> Self {
        Self {
            state: ScrapeState::Created,
        }
    }

    fn enter(&mut self, next: ScrapeState) {
        debug!("Scrape state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
#[path = "strategy_tests.rs"]
mod tests;

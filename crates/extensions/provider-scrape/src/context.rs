//! Ephemeral browsing context owned by one scrape run.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use searchlens_protocols::types::ContextId;

use crate::error::ScrapeError;
use crate::host::{BrowsingHost, EphemeralPage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Loaded,
    Closed,
}

/// A hidden page created for exactly one request.
///
/// [`close`](Self::close) consumes the context, so it cannot be used or closed
/// twice. Dropping it without closing leaves the browser page open and is
/// reported as a leak.
pub struct EphemeralContext {
    context_id: ContextId,
    created_at: DateTime<Utc>,
    state: Lifecycle,
    page: Box<dyn EphemeralPage>,
}

impl EphemeralContext {
    /// Open `url` in a new hidden page.
    pub async fn open(host: &dyn BrowsingHost, url: &str) -> Result<Self, ScrapeError> {
        let page = host.open_hidden(url).await?;
        let context = Self {
            context_id: ContextId::new(page.target_id()),
            created_at: Utc::now(),
            state: Lifecycle::Created,
            page,
        };
        debug!("Ephemeral context {} created for {}", context.context_id, url);
        Ok(context)
    }

    pub fn context_id(&self) -> &ContextId {
        &self.context_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn page(&self) -> &dyn EphemeralPage {
        self.page.as_ref()
    }

    /// Wait for load complete and move to `Loaded`.
    pub async fn wait_loaded(&mut self) -> Result<(), ScrapeError> {
        self.page.wait_for_load().await?;
        self.state = Lifecycle::Loaded;
        Ok(())
    }

    /// Close the page. Failures are logged and otherwise ignored.
    pub async fn close(mut self) {
        if let Err(e) = self.page.close().await {
            warn!("Failed to close ephemeral context {}: {}", self.context_id, e);
        }
        self.state = Lifecycle::Closed;
        let lived = Utc::now() - self.created_at;
        debug!(
            "Ephemeral context {} closed after {} ms",
            self.context_id,
            lived.num_milliseconds()
        );
    }
}

impl Drop for EphemeralContext {
    fn drop(&mut self) {
        if self.state != Lifecycle::Closed {
            warn!("Ephemeral context {} dropped without being closed", self.context_id);
        }
    }
}

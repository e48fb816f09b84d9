//! Automation driver: locating controls, entering the query, reading the reply.

use tracing::{debug, info, warn};

use searchlens_protocols::CancellationToken;

use crate::error::ScrapeError;
use crate::host::EphemeralPage;
use crate::locator::{ANSWER_CONTAINERS, Capability, Locator};
use crate::poll::{PollOutcome, Poller};

/// Which controls discovery found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub search_mode: Option<Locator>,
    pub input: Option<Locator>,
    pub send: Option<Locator>,
}

impl Controls {
    fn get_mut(&mut self, capability: Capability) -> &mut Option<Locator> {
        match capability {
            Capability::SearchMode => &mut self.search_mode,
            Capability::Input => &mut self.input,
            Capability::Send => &mut self.send,
        }
    }

    /// An input plus at least one way to act on it.
    pub fn is_usable(&self) -> bool {
        self.input.is_some() && (self.search_mode.is_some() || self.send.is_some())
    }
}

/// Where the extracted text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerSource {
    Container(Locator),
    PageBody,
}

/// Drives one chat page.
pub struct AutomationDriver<'a> {
    page: &'a dyn EphemeralPage,
    discovery: Poller,
    answer: Poller,
}

impl<'a> AutomationDriver<'a> {
    pub fn new(page: &'a dyn EphemeralPage, discovery: Poller, answer: Poller) -> Self {
        Self {
            page,
            discovery,
            answer,
        }
    }

    /// Run each capability's chain once. The first matching locator wins.
    pub async fn locate(&self) -> Controls {
        let mut controls = Controls::default();
        for capability in Capability::ALL {
            for locator in capability.chain() {
                match self.page.mark(locator, capability.tag()).await {
                    Ok(true) => {
                        *controls.get_mut(capability) = Some(*locator);
                        break;
                    }
                    Ok(false) => {}
                    Err(e) => {
                        debug!("Locating {:?} via {} failed: {}", capability, locator, e);
                    }
                }
            }
        }
        controls
    }

    /// Poll [`locate`](Self::locate) until the controls are usable.
    pub async fn discover(&self, cancel: &CancellationToken) -> Result<Controls, ScrapeError> {
        let outcome = self
            .discovery
            .run(cancel, |attempt| async move {
                let controls = self.locate().await;
                debug!(
                    "Discovery attempt {}/{}: {:?}",
                    attempt.count, attempt.max_attempts, controls
                );
                controls.is_usable().then_some(controls)
            })
            .await;

        match outcome {
            PollOutcome::Found { value, attempts } => {
                info!("Controls found after {} attempt(s)", attempts);
                Ok(value)
            }
            PollOutcome::Exhausted { attempts } => Err(ScrapeError::Timeout(format!(
                "chat controls not found after {} attempts",
                attempts
            ))),
            PollOutcome::Cancelled { .. } => Err(ScrapeError::Cancelled),
        }
    }

    pub async fn activate_search_mode(&self) -> Result<(), ScrapeError> {
        self.page.click(Capability::SearchMode.tag()).await
    }

    pub async fn fill(&self, query: &str) -> Result<(), ScrapeError> {
        self.page.fill(Capability::Input.tag(), query).await
    }

    /// Click send if it was found, otherwise press Enter in the input.
    pub async fn submit(&self, controls: &Controls) -> Result<(), ScrapeError> {
        if controls.send.is_some() {
            debug!("Clicking send control");
            self.page.click(Capability::Send.tag()).await
        } else {
            debug!("No send control, pressing Enter");
            self.page.press_enter(Capability::Input.tag()).await
        }
    }

    /// First non-empty reply container text across the answer chain.
    async fn read_answer(&self) -> Option<(String, Locator)> {
        for locator in ANSWER_CONTAINERS {
            match self.page.text(locator).await {
                Ok(Some(text)) if !text.trim().is_empty() => return Some((text, *locator)),
                Ok(_) => {}
                Err(e) => debug!("Reading {} failed: {}", locator, e),
            }
        }
        None
    }

    /// Poll the reply containers; when they stay empty, fall back to the page
    /// body text.
    pub async fn await_answer(
        &self,
        cancel: &CancellationToken,
    ) -> Result<(String, AnswerSource), ScrapeError> {
        let outcome = self
            .answer
            .run(cancel, |_| async move { self.read_answer().await })
            .await;

        match outcome {
            PollOutcome::Found {
                value: (text, locator),
                attempts,
            } => {
                info!("Answer found in {} after {} attempt(s)", locator, attempts);
                Ok((text, AnswerSource::Container(locator)))
            }
            PollOutcome::Exhausted { attempts } => {
                warn!(
                    "No answer container after {} attempts, using page text",
                    attempts
                );
                let body = self.page.body_text().await?;
                Ok((body.trim().to_string(), AnswerSource::PageBody))
            }
            PollOutcome::Cancelled { .. } => Err(ScrapeError::Cancelled),
        }
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;

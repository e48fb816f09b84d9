//! Scrape answer provider for searchlens.
//!
//! Opens the chat web application in a hidden browser page over the Chrome
//! DevTools Protocol, types the query, and reads the rendered reply.

pub mod cdp;
mod context;
mod driver;
mod error;
mod host;
mod locator;
pub mod manager;
mod poll;
mod strategy;

#[cfg(test)]
mod fake;

pub use context::{EphemeralContext, Lifecycle};
pub use driver::{AnswerSource, AutomationDriver, Controls};
pub use error::ScrapeError;
pub use host::{BrowsingHost, CdpHost, CdpPage, EphemeralPage, MARKER_PREFIX, marker_attribute};
pub use locator::{ANSWER_CONTAINERS, Capability, Locator};
pub use manager::{BrowserError, BrowserManager, BrowserOptions};
pub use poll::{ExtractionAttempt, PollOutcome, Poller};
pub use strategy::{DEFAULT_CHAT_URL, Extraction, ScrapeOptions, ScrapeProvider, ScrapeState};

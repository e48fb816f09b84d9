//! Scrape strategy errors.

use thiserror::Error;

use searchlens_protocols::error::AnswerError;

use crate::cdp::CdpError;
use crate::manager::BrowserError;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("Required control not found: {0}")]
    ElementNotFound(String),

    /// A bounded wait ran out of attempts.
    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Cancelled")]
    Cancelled,

    #[error("Context closed")]
    ContextClosed,
}

impl From<CdpError> for ScrapeError {
    fn from(e: CdpError) -> Self {
        ScrapeError::Browser(e.into())
    }
}

impl From<ScrapeError> for AnswerError {
    fn from(e: ScrapeError) -> Self {
        match e {
            ScrapeError::Timeout(msg) => AnswerError::Timeout(msg),
            ScrapeError::Browser(BrowserError::LoadTimeout(msg)) => AnswerError::Timeout(msg),
            ScrapeError::Browser(BrowserError::ConnectionFailed(msg)) => AnswerError::NetworkFailure(msg),
            other => AnswerError::Unknown(other.to_string()),
        }
    }
}

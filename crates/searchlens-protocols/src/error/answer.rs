//! Answer production errors and their user-facing messages.

use thiserror::Error;

/// Why a strategy could not produce an answer.
///
/// Strategies convert these into a single readable string with
/// [`AnswerError::user_message`]; the variant never leaves the strategy.
#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("Offline: no network connectivity")]
    Offline,

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("HTTP error! status: {code}, message: {body}")]
    HttpStatus { code: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("{0}")]
    Unknown(String),
}

impl AnswerError {
    /// Message shown on the page in place of an answer.
    pub fn user_message(&self) -> String {
        match self {
            AnswerError::Offline => {
                "The browser is offline, please check your network connection".to_string()
            }
            AnswerError::NetworkFailure(_) => {
                "Network connection error, please check your network settings or try again later"
                    .to_string()
            }
            AnswerError::HttpStatus { code: 401, .. } => {
                "Authentication failed, please check the Authorization Token setting".to_string()
            }
            AnswerError::HttpStatus { code: 403, .. } => {
                "Access denied, please check your permission settings".to_string()
            }
            AnswerError::HttpStatus { code: 429, .. } => {
                "Too many requests (rate limited), please try again later".to_string()
            }
            AnswerError::Timeout(_) => {
                "Request timed out, please check your network connection or try again later"
                    .to_string()
            }
            other => format!("Error while getting the AI reply: {}", other),
        }
    }
}

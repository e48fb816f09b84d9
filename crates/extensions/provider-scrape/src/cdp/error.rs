//! DevTools client errors.

use thiserror::Error;

use super::protocol::RemoteError;

#[derive(Debug, Error)]
pub enum CdpError {
    /// Nothing answered `/json/version` on the debug port.
    #[error("No browser debugging endpoint at {endpoint}: {reason}")]
    EndpointUnavailable { endpoint: String, reason: String },

    /// The DevTools socket could not be opened or failed mid-session.
    #[error("DevTools socket error: {0}")]
    Socket(String),

    /// The browser answered a command with an error object.
    #[error("Browser rejected command: {message} (code {code})")]
    Rejected { code: i64, message: String },

    /// A script evaluated in the page threw.
    #[error("Page script threw: {0}")]
    ScriptThrew(String),

    #[error("{0} timed out")]
    TimedOut(String),

    /// The socket closed while a command was waiting for its reply.
    #[error("DevTools connection closed")]
    Disconnected,

    /// A reply lacked a field the caller depends on.
    #[error("{method} reply has no {field}")]
    MissingField {
        method: &'static str,
        field: &'static str,
    },

    #[error("Malformed DevTools message: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<RemoteError> for CdpError {
    fn from(e: RemoteError) -> Self {
        CdpError::Rejected {
            code: e.code,
            message: e.message,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::Socket(e.to_string())
    }
}

//! DevTools wire messages, limited to what the chat automation exchanges.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outgoing command. Page commands carry the session they target.
#[derive(Debug, Serialize)]
pub struct Command<'a> {
    pub id: u64,
    pub method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

/// Error object the browser returns in place of a result.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteError {
    pub code: i64,
    pub message: String,
}

/// Anything read from the socket. Replies carry an `id`; events carry a
/// `method` instead and are ignored.
#[derive(Debug, Deserialize)]
pub struct Incoming {
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<RemoteError>,
    pub method: Option<String>,
}

impl Incoming {
    /// The reply's command id and outcome, or `None` for events.
    pub fn into_reply(self) -> Option<(u64, Result<Value, RemoteError>)> {
        let id = self.id?;
        let outcome = match self.error {
            Some(error) => Err(error),
            None => Ok(self.result.unwrap_or(Value::Null)),
        };
        Some((id, outcome))
    }
}

/// The fields of `/json/version` needed to open the browser socket.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub socket_url: String,
}

/// Phases of an Enter key press for `Input.dispatchKeyEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyPhase {
    RawKeyDown,
    Char,
    KeyUp,
}

impl KeyPhase {
    pub const ENTER_SEQUENCE: [KeyPhase; 3] = [KeyPhase::RawKeyDown, KeyPhase::Char, KeyPhase::KeyUp];
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;

//! Message bus protocol between page contexts and the orchestrator.
//!
//! Messages are JSON objects discriminated by an `action` field:
//!
//! ```json
//! {"action": "search-detected", "query": "rust async"}
//! {"action": "display-answer", "response": "..."}
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BusError;
use crate::types::ContextId;

/// A named message travelling over the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum BusMessage {
    /// Page → orchestrator: a search was detected. Fire-and-forget.
    SearchDetected { query: String },
    /// Page → orchestrator: ask whether the extension is enabled.
    GetStatus,
    /// Page → orchestrator: flip the enabled flag.
    ToggleStatus,
    /// Orchestrator → page: the final answer or error text.
    DisplayAnswer { response: String },
    /// Orchestrator → every page: the enabled flag changed.
    StatusChanged { enabled: bool },
    /// Page → orchestrator: open the chat page visibly.
    OpenOriginalPage,
}

impl BusMessage {
    /// Action name as it appears on the wire.
    pub fn action(&self) -> &'static str {
        match self {
            BusMessage::SearchDetected { .. } => "search-detected",
            BusMessage::GetStatus => "get-status",
            BusMessage::ToggleStatus => "toggle-status",
            BusMessage::DisplayAnswer { .. } => "display-answer",
            BusMessage::StatusChanged { .. } => "status-changed",
            BusMessage::OpenOriginalPage => "open-original-page",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Success,
    Error,
}

/// Reply to a bus message. Fields absent from a given action are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReplyStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BusReply {
    /// `{status: "success"}`
    pub fn success() -> Self {
        Self {
            status: Some(ReplyStatus::Success),
            ..Default::default()
        }
    }

    /// `{status: "error", message}`
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Some(ReplyStatus::Error),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// `{enabled}`
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Default::default()
        }
    }

    /// `{status: "success", enabled}`
    pub fn toggled(enabled: bool) -> Self {
        Self {
            status: Some(ReplyStatus::Success),
            enabled: Some(enabled),
            message: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(ReplyStatus::Success)
    }
}

/// Asynchronous delivery of messages to page contexts.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Deliver `message` to `target`. Fails with [`BusError::ContextGone`] when
    /// the target no longer exists.
    async fn send(&self, target: &ContextId, message: BusMessage) -> Result<BusReply, BusError>;

    /// Contexts currently reachable.
    fn contexts(&self) -> Vec<ContextId>;
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;

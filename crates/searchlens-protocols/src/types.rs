//! Request, response and configuration types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{keys, StoreValues};

/// Default completion model.
pub const DEFAULT_MODEL: &str = "Qwen/Qwen3-8B";

/// Default completion token budget.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Instruction prepended to the query when no prefix has been stored.
pub const DEFAULT_PROMPT_PREFIX: &str = "You are an assistant that gathers information from the internet. \
The user will enter search keywords next. Find what you know about these keywords, \
summarize it, and extract the key information.";

/// Identity of an execution context that can receive bus messages (a page, a tab).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(String);

impl ContextId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random context id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContextId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ContextId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A detected search waiting for an answer.
///
/// Lives only until its outcome has been relayed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub id: Uuid,
    pub query: String,
    pub origin: ContextId,
    pub requested_at: DateTime<Utc>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, origin: ContextId) -> Self {
        Self {
            id: Uuid::new_v4(),
            query: query.into(),
            origin,
            requested_at: Utc::now(),
        }
    }
}

/// Whether a payload carries an answer or a user-facing error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    Answer,
    Error,
}

/// The single outcome of a [`SearchRequest`].
///
/// Not `Clone`: a payload is moved into the relay, which consumes it.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub kind: PayloadKind,
    pub text: String,
}

impl ResponsePayload {
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            kind: PayloadKind::Answer,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: PayloadKind::Error,
            text: text.into(),
        }
    }

    pub fn is_answer(&self) -> bool {
        self.kind == PayloadKind::Answer
    }

    pub fn is_error(&self) -> bool {
        self.kind == PayloadKind::Error
    }

    /// True when the answer text is a verification interstitial rather than content.
    pub fn is_verification_challenge(&self) -> bool {
        self.is_answer() && crate::challenge::is_verification_challenge(&self.text)
    }
}

/// Which answer provider strategy handles a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// One HTTP call to a chat-completion endpoint.
    #[default]
    Direct,
    /// Scripted interaction with a chat web app in a hidden browsing context.
    Scrape,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Direct => "direct",
            ProviderKind::Scrape => "scrape",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Some(ProviderKind::Direct),
            "scrape" => Some(ProviderKind::Scrape),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings read from the config store for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionConfig {
    pub enabled: bool,
    pub provider: ProviderKind,
    pub model: String,
    pub max_tokens: u32,
    pub prompt_prefix: String,
    pub auth_token: String,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: ProviderKind::Direct,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            prompt_prefix: DEFAULT_PROMPT_PREFIX.to_string(),
            auth_token: String::new(),
        }
    }
}

impl ExtensionConfig {
    /// Build a config from raw store values, applying defaults for absent keys.
    ///
    /// `extensionEnabled` is only false when stored as literal `false`. Empty
    /// model names and zero token budgets fall back to the defaults. A stored
    /// empty `promptPrefix` is kept as-is and disables the prefix.
    pub fn from_values(values: &StoreValues) -> Self {
        let defaults = Self::default();

        let enabled = values
            .get(keys::ENABLED)
            .and_then(|v| v.as_bool())
            .unwrap_or(true);

        let provider = values
            .get(keys::PROVIDER)
            .and_then(|v| v.as_str())
            .and_then(ProviderKind::parse)
            .unwrap_or(defaults.provider);

        let model = values
            .get(keys::MODEL)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or(defaults.model);

        let max_tokens = values
            .get(keys::MAX_TOKENS)
            .and_then(|v| v.as_u64())
            .filter(|n| *n > 0)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(defaults.max_tokens);

        let prompt_prefix = values
            .get(keys::PROMPT_PREFIX)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or(defaults.prompt_prefix);

        let auth_token = values
            .get(keys::AUTH_TOKEN)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        Self {
            enabled,
            provider,
            model,
            max_tokens,
            prompt_prefix,
            auth_token,
        }
    }

    /// The prompt sent to the completion service for `query`.
    pub fn compose_prompt(&self, query: &str) -> String {
        if self.prompt_prefix.is_empty() {
            query.to_string()
        } else {
            format!("{}\n\n{}", self.prompt_prefix, query)
        }
    }

    /// Auth token shortened for logs.
    pub fn redacted_token(&self) -> String {
        let visible: String = self.auth_token.chars().take(10).collect();
        format!("{}...", visible)
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;

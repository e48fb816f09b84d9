//! Settings file schema.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub completion: CompletionSettings,

    #[serde(default)]
    pub scrape: ScrapeSettings,

    #[serde(default)]
    pub defaults: DefaultsSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// WebSocket bridge listen address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8765
}

/// Where the key/value store is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    searchlens_dir().join("store.json")
}

/// Direct completion endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Unset means the request may wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Check for a network route before sending, to report an offline machine.
    #[serde(default = "default_true")]
    pub probe_connectivity: bool,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: None,
            probe_connectivity: true,
        }
    }
}

fn default_endpoint() -> String {
    "https://api.siliconflow.cn/v1/chat/completions".to_string()
}

/// Hidden chat-page automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeSettings {
    #[serde(default = "default_chat_url")]
    pub chat_url: String,

    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default)]
    pub profile_dir: Option<PathBuf>,

    #[serde(default = "default_load_grace_ms")]
    pub load_grace_ms: u64,

    #[serde(default = "default_max_attempts")]
    pub discovery_max_attempts: u32,

    #[serde(default = "default_max_attempts")]
    pub answer_max_attempts: u32,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_search_mode_settle_ms")]
    pub search_mode_settle_ms: u64,

    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,

    /// Unset means no cap on concurrently open hidden contexts.
    #[serde(default)]
    pub max_open_contexts: Option<usize>,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            chat_url: default_chat_url(),
            debug_port: default_debug_port(),
            headless: true,
            profile_dir: None,
            load_grace_ms: default_load_grace_ms(),
            discovery_max_attempts: default_max_attempts(),
            answer_max_attempts: default_max_attempts(),
            poll_interval_ms: default_poll_interval_ms(),
            search_mode_settle_ms: default_search_mode_settle_ms(),
            submit_delay_ms: default_submit_delay_ms(),
            max_open_contexts: None,
        }
    }
}

fn default_chat_url() -> String {
    "https://chat.qwen.ai/".to_string()
}

fn default_debug_port() -> u16 {
    9222
}

fn default_load_grace_ms() -> u64 {
    1500
}

fn default_max_attempts() -> u32 {
    30
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_search_mode_settle_ms() -> u64 {
    2000
}

fn default_submit_delay_ms() -> u64 {
    1000
}

/// Values seeded into an empty key/value store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Left unset, requests use the built-in summarisation instruction.
    #[serde(default)]
    pub prompt_prefix: Option<String>,

    #[serde(default)]
    pub auth_token: Option<String>,
}

impl Default for DefaultsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: default_provider(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            prompt_prefix: None,
            auth_token: None,
        }
    }
}

fn default_provider() -> String {
    "direct".to_string()
}

fn default_model() -> String {
    searchlens_protocols::types::DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    searchlens_protocols::types::DEFAULT_MAX_TOKENS
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_dir() -> PathBuf {
    searchlens_dir().join("logs")
}

fn default_max_log_files() -> usize {
    14
}

pub(crate) fn default_true() -> bool {
    true
}

/// The `~/.searchlens` directory.
pub fn searchlens_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".searchlens"))
        .unwrap_or_else(|| PathBuf::from(".searchlens"))
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;

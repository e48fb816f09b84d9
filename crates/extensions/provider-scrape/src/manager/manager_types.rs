//! Browser manager errors and options.

use std::path::PathBuf;

use thiserror::Error;

use crate::cdp::CdpError;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("Page load timed out: {0}")]
    LoadTimeout(String),

    #[error("Browser not connected")]
    NotConnected,

    #[error("Chrome not found. Please install Google Chrome.")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),
}

impl From<CdpError> for BrowserError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::EndpointUnavailable { endpoint, reason } => {
                BrowserError::ConnectionFailed(format!("{}: {}", endpoint, reason))
            }
            CdpError::Socket(msg) => BrowserError::ConnectionFailed(msg),
            CdpError::ScriptThrew(msg) => BrowserError::ActionFailed(format!("JS error: {}", msg)),
            CdpError::TimedOut(what) => BrowserError::LoadTimeout(what),
            CdpError::Disconnected => BrowserError::NotConnected,
            _ => BrowserError::ActionFailed(e.to_string()),
        }
    }
}

/// How to reach or start the browser.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Chrome remote-debugging port.
    pub debug_port: u16,
    /// Profile directory for persistent login state.
    pub profile_dir: Option<PathBuf>,
    /// Launch Chrome headless when it is not already running.
    pub headless: bool,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            debug_port: 9222,
            profile_dir: None,
            headless: true,
        }
    }
}

impl BrowserOptions {
    /// Profile directory, defaulting to `~/.searchlens/browser-profile`.
    pub fn get_profile_dir(&self) -> PathBuf {
        self.profile_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".searchlens")
                .join("browser-profile")
        })
    }

    /// CDP HTTP endpoint.
    pub fn endpoint(&self) -> String {
        format!("http://localhost:{}", self.debug_port)
    }
}

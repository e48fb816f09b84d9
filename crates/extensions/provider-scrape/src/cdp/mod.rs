//! Chrome DevTools Protocol (CDP) client.
//!
//! Connects to Chrome/Chromium through its remote-debugging WebSocket and
//! speaks the CDP JSON-RPC protocol. Only the commands the chat automation
//! needs are wrapped: target creation and teardown, script evaluation, load
//! detection and key input.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222").await?;
//! let page = client.create_page("https://chat.qwen.ai/", true).await?;
//! page.wait_for_load().await?;
//! let title = page.evaluate("document.title").await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;

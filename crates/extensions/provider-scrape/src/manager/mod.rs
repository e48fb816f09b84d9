//! Browser instance manager.
//!
//! Connects to a Chrome already listening on the debug port, or launches one
//! with a dedicated profile so chat-site login state survives restarts.

mod manager_core;
mod manager_types;

pub use manager_core::BrowserManager;
pub use manager_types::{BrowserError, BrowserOptions};

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;

//! Direct completion answer provider for searchlens.
//!
//! Sends the composed prompt to an OpenAI-compatible chat-completion endpoint
//! in a single request and relays whatever the first choice contains.

mod api;
mod connectivity;
mod provider;

pub use api::NO_CONTENT_PLACEHOLDER;
pub use connectivity::{DEFAULT_ROUTE_TARGET, RouteConnectivity};
pub use provider::{CompletionOptions, DEFAULT_ENDPOINT, DirectCompletionProvider};

//! # searchlens bridge - WebSocket
//!
//! Exposes the orchestrator to page contexts over WebSocket. Every accepted
//! connection is one originating context: inbound frames are bus messages
//! (`{"action": "search-detected", "query": "..."}`) routed through
//! [`Router`], and outbound frames are the messages the orchestrator pushes to
//! that context (`display-answer`, `status-changed`) or replies to a request.
//!
//! ## Usage
//!
//! ```ignore
//! let bus = Arc::new(WsBus::new());
//! let router = Arc::new(Router::new(store, dispatcher, bus.clone()));
//! let bridge = WsBridge::new("127.0.0.1", 8765, bus, router);
//! let (addr, handle) = bridge.start(shutdown.clone()).await?;
//! ```

mod connection;
mod error;
mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use searchlens_core::Router;
use searchlens_protocols::CancellationToken;

pub use connection::{ReplyFrame, WsBus};
pub use error::BridgeError;
pub use server::create_router;

/// State shared by every handler.
pub struct BridgeState {
    pub bus: Arc<WsBus>,
    pub router: Arc<Router>,
}

/// WebSocket bridge bound to one listen address.
pub struct WsBridge {
    host: String,
    port: u16,
    state: Arc<BridgeState>,
}

impl WsBridge {
    /// The router must have been built with `bus` as its message bus so that
    /// relayed answers reach the socket they came from.
    pub fn new(host: impl Into<String>, port: u16, bus: Arc<WsBus>, router: Arc<Router>) -> Self {
        Self {
            host: host.into(),
            port,
            state: Arc::new(BridgeState { bus, router }),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn state(&self) -> Arc<BridgeState> {
        Arc::clone(&self.state)
    }

    /// Bind and serve until `shutdown` is cancelled. Returns the bound address
    /// (useful with port 0) and the server task.
    pub async fn start(
        &self,
        shutdown: CancellationToken,
    ) -> Result<(SocketAddr, JoinHandle<()>), BridgeError> {
        let addr = self.address();
        let listener_addr: SocketAddr = addr
            .parse()
            .map_err(|e| BridgeError::InvalidAddress(format!("{}: {}", addr, e)))?;

        let listener = tokio::net::TcpListener::bind(listener_addr)
            .await
            .map_err(|e| BridgeError::Bind(format!("{}: {}", addr, e)))?;
        let bound = listener
            .local_addr()
            .map_err(|e| BridgeError::Bind(e.to_string()))?;

        let router = create_router(self.state());
        info!("WebSocket bridge listening on ws://{}/ws", bound);

        let handle = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await;
            if let Err(e) = result {
                error!("WebSocket bridge error: {}", e);
            }
            info!("WebSocket bridge stopped");
        });

        Ok((bound, handle))
    }
}

#[cfg(test)]
mod test_support;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

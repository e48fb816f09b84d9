//! HTTP routes.

use std::sync::Arc;

use axum::{
    Router,
    extract::{State, ws::WebSocketUpgrade},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};

use crate::BridgeState;
use crate::connection::handle_connection;

/// Create the Axum router for the bridge.
pub fn create_router(state: Arc<BridgeState>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_check))
        .route("/api/info", get(api_info))
        .with_state(state)
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<BridgeState>>) -> Response {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn health_check(State(state): State<Arc<BridgeState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        serde_json::json!({
            "status": "ok",
            "connections": state.bus.connection_count(),
        })
        .to_string(),
    )
}

async fn api_info() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        serde_json::json!({
            "name": "searchlens bridge",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "websocket": "/ws",
                "health": "/health",
                "info": "/api/info"
            },
            "actions": [
                "search-detected",
                "get-status",
                "toggle-status",
                "open-original-page"
            ]
        })
        .to_string(),
    )
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
